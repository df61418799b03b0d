//! EB Rescue terminal front-end.
//!
//! Run with: cargo run -p rescue-app --bin eb-rescue
//!
//! Configuration via .env file or environment variables:
//!   EB_RESCUE_DATABASE_URL   - Session store (default: sqlite:eb_rescue.db?mode=rwc)
//!   SUPABASE_URL / SUPABASE_ANON_KEY - Remote database (optional)
//!   AI_PROVIDER              - huggingface | openai | gemini | replicate
//!   EB_RESCUE_OPEN_COMMAND   - Program used to open links (e.g. xdg-open)
//!   EB_RESCUE_LATITUDE / EB_RESCUE_LONGITUDE - Device position (optional)

use std::sync::Arc;

use clap::Parser;
use dispatch::DispatchConfig;
use rescue_app::{AppConfig, Console, Verifier, ViewRouter};
use session_store::{SessionStore, SqliteSessionStore};
use tire_vision::VisionConfig;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "eb-rescue")]
#[command(about = "EB Rescue tire service app in the terminal")]
struct Args {
    /// SQLite URL for the local session (overrides EB_RESCUE_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Clear the stored phone, profile and history before starting
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let store = SqliteSessionStore::open(&config.database_url).await?;
    if args.reset {
        store.clear_all().await?;
        info!("Session cleared");
    }

    let vision = VisionConfig::from_env();
    let dispatch = DispatchConfig::from_env();
    let verifier = Verifier::new(config.verification_code.clone(), config.code_delay);

    let router = ViewRouter::builder(Arc::new(store))
        .database(supabase_client::connect_from_env())
        .opener(dispatch.build_opener())
        .resolver(dispatch.build_resolver()?)
        .analyzer(vision.build_chain())
        .rim_designer(vision.build_rim_designer())
        .business_number(dispatch.business_number.clone())
        .config(config)
        .build()
        .await?;

    info!("Starting at {}", router.view());

    let mut console = Console::new(
        router,
        verifier,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    );
    console.run().await?;

    Ok(())
}
