mod config;
mod deck;
mod errors;
mod layout;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Command, Config, ImportConfig};
use crate::deck::catalog_import::import_catalog;
use crate::deck::{default_slide_layout, BackgroundCycle, Catalog, Deck, DeckPlanner, Worklist};
use crate::errors::AppError;
use crate::layout::{FontFamily, TableMetrics, TextFitEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let arg = std::env::args().nth(1);
    match Command::parse(arg.as_deref())? {
        Command::Plan => run_plan().await,
        Command::ImportCatalog => run_import(),
    }
}

fn init_tracing(rust_log: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_plan() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;
    init_tracing(&config.rust_log);

    info!("Starting slidefit v{}", env!("CARGO_PKG_VERSION"));

    let deck = match build_deck(&config).await {
        Ok(deck) => deck,
        Err(e) => {
            error!(code = e.code(), "Deck planning failed: {e}");
            return Err(e).context("planning deck");
        }
    };

    let json = serde_json::to_string_pretty(&deck).context("serializing deck plan")?;
    write_output(config.output_path.as_deref(), &json, "deck plan")?;

    info!(
        slides = deck.total_slides,
        overflow = deck.overflow_count,
        word_entries = deck.cache.word_entries,
        height_entries = deck.cache.height_entries,
        fit_entries = deck.cache.fit_entries,
        hits = deck.cache.hits,
        misses = deck.cache.misses,
        "Done"
    );
    Ok(())
}

fn run_import() -> Result<()> {
    let config = ImportConfig::from_env()?;
    init_tracing(&config.rust_log);

    let raw = std::fs::read_to_string(&config.raw_path)
        .with_context(|| format!("reading songbook {}", config.raw_path.display()))?;
    let catalog = import_catalog(&raw, config.starting_id);
    if catalog.bhajans.is_empty() {
        warn!("No bhajans found in {}", config.raw_path.display());
    }

    let json = serde_json::to_string_pretty(&catalog).context("serializing catalog")?;
    write_output(config.output_path.as_deref(), &json, "catalog")?;

    info!(bhajans = catalog.bhajans.len(), "Catalog imported");
    Ok(())
}

fn write_output(path: Option<&Path>, json: &str, what: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing {what} to {}", path.display()))?;
            info!("{what} written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn build_deck(config: &Config) -> Result<Deck, AppError> {
    let worklist = Worklist::from_path(&config.worklist_path)?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::default(),
    };
    info!(
        entries = worklist.entries.len(),
        catalog_bhajans = catalog.bhajans.len(),
        catalog_prayers = catalog.prayers.len(),
        "Inputs loaded"
    );

    if FontFamily::from_name(&config.font_family).is_none() {
        warn!(
            "No width table for '{}'; measuring with Calibri",
            config.font_family
        );
    }

    let engine = TextFitEngine::new(TableMetrics::default());
    let mut planner = DeckPlanner::new(engine, default_slide_layout(&config.font_family))
        .with_backgrounds(BackgroundCycle::numbered(config.background_count))
        .with_yield_every(config.yield_every);

    planner
        .plan(
            &worklist,
            &catalog,
            config.deck_title.as_deref(),
            config.deck_subtitle.as_deref(),
            chrono::Local::now().date_naive(),
        )
        .await
}
