use anyhow::{Context, Result};
use std::path::PathBuf;
use ytetl::{init_tracing_once, CommentETL, EtlConfig, YouTubeClient};

const DEFAULT_CONFIG: &str = "config.json";

fn main() -> Result<()> {
    init_tracing_once();

    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = EtlConfig::load(&config_path)?;
    let client = YouTubeClient::new(&config.api_base_url, config.require_api_key()?)?;

    tracing::info!("Starting extraction. This may take a while...");
    let mut etl = CommentETL::new(config, client)?;
    let summary = etl.run().with_context(|| format!("ETL run failed ({:?} stage)", etl.failed_in()))?;

    println!(
        "Data saved to {} ({} rows written, {} dropped, {} extracted)",
        summary.output.display(),
        summary.rows_written,
        summary.rows_dropped,
        summary.raw_records
    );
    Ok(())
}
