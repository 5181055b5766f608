use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use refika_core::model::{GameId, QuizId, TermId};
use services::matching::{MISMATCH_DELAY, NEXT_ROUND_DELAY, SET_SIZE};
use services::{
    CatalogService, Clock, MatchingLoopService, MatchingSettings, Notifier, QuizLoopService,
    ToastKind,
};
use storage::{ListQuery, SeedData, Storage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod input;
mod play;
mod quiz;

#[derive(Parser)]
#[command(name = "refika")]
#[command(about = "Play Refika quizzes and matching games in the terminal")]
#[command(version)]
struct Cli {
    /// JSON catalog with terms, quizzes and matching games
    #[arg(long, env = "REFIKA_DATA")]
    data: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a matching game
    Play {
        #[arg(long)]
        game: GameId,

        /// Seed the shuffles for a reproducible board
        #[arg(long, env = "REFIKA_SEED")]
        seed: Option<u64>,

        /// Pairs shown per round
        #[arg(long, default_value_t = SET_SIZE)]
        set_size: usize,

        /// Apply round and mismatch transitions immediately
        #[arg(long)]
        no_delay: bool,
    },
    /// Take a quiz
    Quiz {
        #[arg(long)]
        quiz: QuizId,
    },
    /// List terms, or the quizzes and games of one term
    List {
        #[arg(long)]
        term: Option<TermId>,

        /// Case-insensitive title filter
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
}

fn init_logging(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn load_storage(path: &Path) -> Result<Storage, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let seed = SeedData::from_json(&raw)?;
    tracing::info!(
        path = %path.display(),
        terms = seed.terms.len(),
        quizzes = seed.quizzes.len(),
        games = seed.games.len(),
        "catalog loaded"
    );

    let storage = Storage::in_memory();
    seed.load_into(&storage).await?;
    Ok(storage)
}

fn terminal_notifier() -> Notifier {
    let notifier = Notifier::new();
    notifier.register(|toast| match toast.kind {
        ToastKind::Success => println!("[ok] {}", toast.message),
        ToastKind::Error => eprintln!("[error] {}", toast.message),
    });
    notifier
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let storage = load_storage(&cli.data).await?;
    let notifier = terminal_notifier();

    match cli.command {
        Command::Play {
            game,
            seed,
            set_size,
            no_delay,
        } => {
            let mut settings = MatchingSettings::new(set_size, NEXT_ROUND_DELAY, MISMATCH_DELAY)?;
            if no_delay {
                settings = settings.without_delays();
            }
            let service = MatchingLoopService::new(Clock::default_clock(), Arc::clone(&storage.games))
                .with_settings(settings)
                .with_notifier(notifier)
                .with_seed(seed);
            let loaded = service.start_game(game).await?;
            play::run(loaded).await?;
        }
        Command::Quiz { quiz } => {
            let service =
                QuizLoopService::new(Arc::clone(&storage.quizzes)).with_notifier(notifier);
            let loaded = service.start_quiz(quiz).await?;
            quiz::run(loaded).await?;
        }
        Command::List {
            term,
            search,
            page,
            limit,
        } => {
            let catalog = CatalogService::new(
                Arc::clone(&storage.terms),
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.games),
            );
            let mut query = ListQuery::page(page, limit);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            list(&catalog, term, &query).await?;
        }
    }
    Ok(())
}

async fn list(
    catalog: &CatalogService,
    term: Option<TermId>,
    query: &ListQuery,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(term) = term else {
        for term in catalog.terms().await? {
            println!("{}  {}", term.id(), term.name());
        }
        return Ok(());
    };

    let quizzes = catalog.quizzes(term, query).await?;
    println!("Quizzes ({} total, page {})", quizzes.total, quizzes.page);
    for quiz in &quizzes.items {
        println!("  {}  {} ({} questions)", quiz.id, quiz.title, quiz.question_count);
    }

    let games = catalog.games(term, query).await?;
    println!("Matching games ({} total, page {})", games.total, games.page);
    for game in &games.items {
        println!("  {}  {} ({} pairs)", game.id, game.title, game.pair_count);
    }

    if quizzes.has_next() || games.has_next() {
        println!("more on page {}", query.page.max(1) + 1);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
