// League analytics entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Load config from BASE_DIR (default: current directory)
// 3. Build the league source and run the pipeline
// 4. Write the report

use std::path::PathBuf;

use anyhow::Context;
use lfl_app::{config, output, pipeline};
use tracing::info;

const DEFAULT_FILTER: &str = "lfl=info,lfl_app=info,lfl_core=info,lfl_sleeper=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let base_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    info!(league = %config.league.name, "config loaded from {}", base_dir.display());

    // 3. Run the pipeline
    let source = pipeline::source_for(&config);
    let report = pipeline::run(&config, source.as_ref()).await?;

    // 4. Write the report
    let path = config.output.path.as_ref().map(|p| config.resolve(p));
    output::write_report(&report, config.output.format, path.as_deref())
        .context("failed to write report")?;

    info!(teams = report.teams.len(), weeks = report.weeks_played, "done");
    Ok(())
}

/// Initialize tracing to stderr so the report can be piped from stdout.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
