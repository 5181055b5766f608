use std::collections::HashSet;

use refika_core::model::{MatchingPair, PairId};
use refika_core::time::fixed_clock;
use services::matching::{MatchEvent, MatchingSession, SET_SIZE, SessionStatus};

fn pairs(n: u128) -> Vec<MatchingPair> {
    (1..=n)
        .map(|i| MatchingPair::new(PairId::from_u128(i), format!("L{i}"), format!("R{i}")).unwrap())
        .collect()
}

fn start(n: u128, seed: u64) -> MatchingSession {
    MatchingSession::builder()
        .clock(fixed_clock())
        .seed(seed)
        .start(pairs(n))
        .unwrap()
}

/// Plays every round perfectly, matching in right-column order, and returns
/// the pair ids seen per round.
fn play_to_the_end(session: &mut MatchingSession) -> Vec<Vec<PairId>> {
    let mut rounds = Vec::new();
    while let Some(round) = session.round() {
        let ids = round.right_order().to_vec();
        rounds.push(ids.clone());
        for id in ids {
            session.select_left(id);
            session.select_right(id);
        }
        session.flush_pending();
    }
    rounds
}

#[test]
fn every_pair_is_played_exactly_once() {
    for n in 1..=23 {
        let mut session = start(n, n as u64);
        let rounds = play_to_the_end(&mut session);

        let seen: Vec<PairId> = rounds.iter().flatten().copied().collect();
        let unique: HashSet<PairId> = seen.iter().copied().collect();
        assert_eq!(seen.len(), n as usize, "n = {n}");
        assert_eq!(unique.len(), n as usize, "n = {n}");
        assert_eq!(session.status(), SessionStatus::Won);
        assert_eq!(session.completed_count(), n as usize);
    }
}

#[test]
fn only_the_last_round_may_be_short() {
    for n in 1..=23_usize {
        let mut session = start(n as u128, 7);
        let sizes: Vec<usize> = play_to_the_end(&mut session)
            .iter()
            .map(Vec::len)
            .collect();

        let (last, full) = sizes.split_last().unwrap();
        assert!(full.iter().all(|&size| size == SET_SIZE), "n = {n}: {sizes:?}");
        let expected_last = if n % SET_SIZE == 0 { SET_SIZE } else { n % SET_SIZE };
        assert_eq!(*last, expected_last, "n = {n}");
    }
}

#[test]
fn mismatch_after_cleared_rounds_still_loses() {
    let mut session = start(12, 3);
    for _ in 0..2 {
        let ids = session.round().unwrap().left_order().to_vec();
        for id in ids {
            session.select_left(id);
            session.select_right(id);
        }
        session.flush_pending();
    }
    assert_eq!(session.completed_count(), 10);

    let ids = session.round().unwrap().left_order().to_vec();
    session.select_left(ids[0]);
    session.select_right(ids[1]);
    assert_eq!(session.flush_pending(), vec![MatchEvent::Lost { completed: 10 }]);
    assert_eq!(session.status(), SessionStatus::Lost);
}

#[test]
fn restart_from_terminal_states_gives_fresh_session() {
    let mut won = start(4, 11);
    play_to_the_end(&mut won);
    assert_eq!(won.status(), SessionStatus::Won);

    let mut lost = start(9, 11);
    let ids = lost.round().unwrap().left_order().to_vec();
    lost.select_left(ids[0]);
    lost.select_right(ids[1]);
    lost.flush_pending();
    assert_eq!(lost.status(), SessionStatus::Lost);

    for session in [&mut won, &mut lost] {
        let total = session.total_pairs();
        session.restart();
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.completed_count(), 0);
        let on_board = session.round().unwrap().len();
        assert_eq!(on_board + session.remaining_in_pool(), total);
    }
}

#[test]
fn restarts_reshuffle() {
    let mut session = start(20, 99);
    let first = session.round().unwrap().pairs().to_vec();

    let reshuffled = (0..10).any(|_| {
        session.restart();
        session.round().unwrap().pairs() != first.as_slice()
    });
    assert!(reshuffled);
}

#[test]
fn same_seed_gives_same_board() {
    let a = start(10, 2024);
    let b = start(10, 2024);
    assert_eq!(a.round().unwrap(), b.round().unwrap());
}
