use anyhow::Result;
use clap::Parser;
use searcher::{run, Config};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = Config::parse();
    let summary = run(&config)?;

    for failure in &summary.failures {
        match failure.query_id {
            Some(id) => eprintln!("query {id} (line {}) failed: {}", failure.line, failure.error),
            None => eprintln!("line {} skipped: {}", failure.line, failure.error),
        }
    }
    tracing::info!(
        queries_ok = summary.queries_ok,
        queries_failed = summary.failures.len(),
        rows_written = summary.rows_written,
        "search complete"
    );
    Ok(())
}
