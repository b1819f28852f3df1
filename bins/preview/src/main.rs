//! Timebill reconciliation preview
//!
//! Reads a reconciliation input document and prints what reconciling it
//! would create and update.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use timebill_core::facts::RandomUuids;
use timebill_core::reconciliation::{ReconciliationInput, calculate_reconciliation_view};
use timebill_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let fmt = if config.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry().with(filter).with(fmt).init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: timebill-preview <input.json>")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let input: ReconciliationInput =
        serde_json::from_str(&raw).with_context(|| format!("Invalid input document {path}"))?;
    info!(
        %path,
        entries = input.report.time_entries.len(),
        "Loaded reconciliation input"
    );

    let preview = calculate_reconciliation_view(&input, &RandomUuids, &config.reconciliation)?;
    let output = serde_json::json!({
        "summary": preview.summary(),
        "preview": preview,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
