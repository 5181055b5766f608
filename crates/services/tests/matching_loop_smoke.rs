use std::sync::{Arc, Mutex};

use refika_core::model::{GameId, MatchingGame, MatchingGameDraft, PairDraft, TermId};
use refika_core::time::fixed_clock;
use services::matching::DeferredKind;
use services::{
    CatalogService, MatchEvent, MatchingError, MatchingLoopService, Notifier, SessionStatus,
};
use storage::repository::{GameSummary, MatchingGameRepository, TermRepository};
use storage::{InMemoryRepository, ListQuery, Page, StorageError};

#[tokio::test]
async fn catalog_to_won_game() {
    let repo = InMemoryRepository::new();
    let term = repo.insert_term("2024 Fall").await.unwrap();
    repo.insert_game(MatchingGameDraft {
        term_id: term.id(),
        title: "Meyveler".into(),
        pairs: [
            ("elma", "apple"),
            ("armut", "pear"),
            ("muz", "banana"),
            ("kiraz", "cherry"),
            ("erik", "plum"),
            ("incir", "fig"),
            ("nar", "pomegranate"),
        ]
        .into_iter()
        .map(|(l, r)| PairDraft::new(l, r))
        .collect(),
    })
    .await
    .unwrap();

    let catalog = CatalogService::new(
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    let listing = catalog.games(term.id(), &ListQuery::default()).await.unwrap();
    assert_eq!(listing.items.len(), 1);
    let game_id = listing.items[0].id;

    let service = MatchingLoopService::new(fixed_clock(), Arc::new(repo.clone())).with_seed(Some(1));
    let mut loaded = service.start_game(game_id).await.unwrap();
    let session = &mut loaded.session;

    let mut log = Vec::new();
    while session.status() == SessionStatus::InProgress {
        let ids = session.round().unwrap().left_order().to_vec();
        for id in ids {
            log.extend(session.select_left(id));
            log.extend(session.select_right(id));
        }
        let pending = session.pending().unwrap();
        assert!(matches!(pending.kind(), DeferredKind::NextRound | DeferredKind::Win));
        log.extend(session.resolve(pending));
    }

    assert_eq!(session.status(), SessionStatus::Won);
    assert_eq!(session.completed_count(), 7);
    let matched = log
        .iter()
        .filter(|e| matches!(e, MatchEvent::PairMatched { .. }))
        .count();
    assert_eq!(matched, 7);
    assert_eq!(log.last(), Some(&MatchEvent::Won { completed: 7 }));
}

#[tokio::test]
async fn deleted_game_cannot_start() {
    let repo = InMemoryRepository::new();
    let term = repo.insert_term("Fall").await.unwrap();
    let game = repo
        .insert_game(MatchingGameDraft {
            term_id: term.id(),
            title: "Short".into(),
            pairs: vec![PairDraft::new("a", "b")],
        })
        .await
        .unwrap();
    repo.delete_game(game.id()).await.unwrap();

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let notifier = Notifier::new();
    notifier.register(move |toast| sink.lock().unwrap().push(toast.message.clone()));

    let service = MatchingLoopService::new(fixed_clock(), Arc::new(repo)).with_notifier(notifier);
    assert!(service.start_game(game.id()).await.is_err());
    assert_eq!(messages.lock().unwrap().len(), 1);
}

struct OfflineGames;

#[async_trait::async_trait]
impl MatchingGameRepository for OfflineGames {
    async fn insert_game(&self, _draft: MatchingGameDraft) -> Result<MatchingGame, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn upsert_game(&self, _game: &MatchingGame) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_game(&self, _id: GameId) -> Result<Option<MatchingGame>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn list_games(
        &self,
        _term_id: TermId,
        _query: &ListQuery,
    ) -> Result<Page<GameSummary>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn delete_game(&self, _id: GameId) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn backend_failure_surfaces_as_storage_error() {
    let service = MatchingLoopService::new(fixed_clock(), Arc::new(OfflineGames));
    let err = service.start_game(GameId::generate()).await.unwrap_err();
    assert!(matches!(err, MatchingError::Storage(StorageError::Connection(_))));
}
