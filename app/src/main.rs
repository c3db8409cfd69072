#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use mnemos_config::Config;
use mnemos_core::scheduler::{Quality, ReviewMode, ReviewOutcome};
use mnemos_review::ReviewService;
use mnemos_storage::{
    DatabaseAccessRepo, DatabaseCardRepo, DatabaseDueRepo, DatabaseStateRepo, TracingAuditSink,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "mnemos")]
#[command(about = "spaced-repetition review engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Fetch the deck-grouped "due today" batch for a user
    Due {
        #[arg(short, long)]
        user: Uuid,
    },
    /// Fetch the shuffled training set for a deck
    Training {
        #[arg(short, long)]
        user: Uuid,

        #[arg(short, long)]
        deck: Uuid,
    },
    /// Submit a self-evaluated review with a 0-5 quality grade
    Review {
        #[arg(short, long)]
        user: Uuid,

        #[arg(short, long)]
        card: Uuid,

        #[arg(short, long)]
        quality: u8,
    },
    /// Submit a free-text answer for validation and scheduling
    Answer {
        #[arg(short, long)]
        user: Uuid,

        #[arg(short, long)]
        card: Uuid,

        #[arg(short, long)]
        response: String,

        /// Practice only: the persisted schedule is not touched
        #[arg(short, long, default_value_t = false)]
        training: bool,
    },
    /// Subscribe a user to a public deck
    Subscribe {
        #[arg(short, long)]
        user: Uuid,

        #[arg(short, long)]
        deck: Uuid,
    },
    /// Show version
    Version,
}

/// Wire the database-backed repositories into the engine.
async fn build_service(config: &Config) -> anyhow::Result<ReviewService> {
    let db = mnemos_storage::connect(&config.database.url).await?;
    Ok(ReviewService::new(
        Arc::new(DatabaseStateRepo::new(db.clone())),
        Arc::new(DatabaseDueRepo::new(db.clone())),
        Arc::new(DatabaseAccessRepo::new(db.clone())),
        Arc::new(DatabaseCardRepo::new(db)),
        Arc::new(TracingAuditSink),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            Config::create_config()?;
        }
        Commands::Due { user } => {
            let config = Config::load()?;
            let service = build_service(&config).await?;
            let batch = service.fetch_today(&user).await?;
            info!(total = batch.total, decks = batch.decks.len(), "assembled today batch");
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
        Commands::Training { user, deck } => {
            let config = Config::load()?;
            let service = build_service(&config).await?;
            let cards = service.fetch_training(&user, &deck).await?;
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        Commands::Review {
            user,
            card,
            quality,
        } => {
            let config = Config::load()?;
            let service = build_service(&config).await?;
            let outcome = ReviewOutcome::Graded(Quality::new(quality)?);
            let state = service
                .submit_review(&user, &card, outcome, ReviewMode::SelfEvaluated)
                .await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Answer {
            user,
            card,
            response,
            training,
        } => {
            let config = Config::load()?;
            let service = build_service(&config).await?;
            let (check, state) = service.submit_answer(&user, &card, &response, training).await?;
            println!("{}", check.message);
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Commands::Subscribe { user, deck } => {
            let config = Config::load()?;
            let service = build_service(&config).await?;
            let created = service.subscribe(&user, &deck).await?;
            println!("Subscribed: {created} cards scheduled for review");
        }
        Commands::Version => {
            println!("mnemos {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
