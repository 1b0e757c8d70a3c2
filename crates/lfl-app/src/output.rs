// Report rendering: pretty JSON or one CSV row per team.

use std::io::Write;
use std::path::{Path, PathBuf};

use lfl_core::{LeagueReport, TeamReport};
use serde::Serialize;
use tracing::info;

use crate::config::OutputFormat;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Write(#[source] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// CSV row
// ---------------------------------------------------------------------------

/// Flat per-team row. The win distribution is joined with `;` so the row
/// keeps a fixed column count.
#[derive(Debug, Serialize)]
struct TeamRow<'a> {
    seed: Option<u32>,
    league_seed: Option<u32>,
    division_seed: Option<u32>,
    roster_id: u32,
    name: &'a str,
    short_name: &'a str,
    division: Option<&'a str>,
    wins: u32,
    losses: u32,
    division_wins: u32,
    division_losses: u32,
    mean_points: f64,
    std_dev_points: f64,
    median_points: f64,
    recent_mean_points: f64,
    expected_wins: f64,
    win_delta: f64,
    schedule_strength: f64,
    win_distribution: String,
}

impl<'a> From<&'a TeamReport> for TeamRow<'a> {
    fn from(team: &'a TeamReport) -> Self {
        let m = &team.metrics;
        Self {
            seed: team.seed,
            league_seed: team.league_seed,
            division_seed: team.division_seed,
            roster_id: team.roster_id,
            name: &team.name,
            short_name: &team.short_name,
            division: team.division.as_deref(),
            wins: team.record.wins,
            losses: team.record.losses,
            division_wins: team.division_record.wins,
            division_losses: team.division_record.losses,
            mean_points: m.mean_points,
            std_dev_points: m.std_dev_points,
            median_points: m.median_points,
            recent_mean_points: m.recent_mean_points,
            expected_wins: m.expected_wins,
            win_delta: team.win_delta,
            schedule_strength: m.schedule_strength,
            win_distribution: m
                .win_distribution
                .iter()
                .map(|p| format!("{p:.6}"))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn write_json<W: Write>(report: &LeagueReport, mut writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer).map_err(OutputError::Write)?;
    writer.flush().map_err(OutputError::Write)?;
    Ok(())
}

pub fn write_csv<W: Write>(report: &LeagueReport, writer: W) -> Result<(), OutputError> {
    let mut csv = csv::Writer::from_writer(writer);
    for team in &report.teams {
        csv.serialize(TeamRow::from(team))?;
    }
    csv.flush().map_err(OutputError::Write)?;
    Ok(())
}

pub fn render<W: Write>(report: &LeagueReport, format: OutputFormat, writer: W) -> Result<(), OutputError> {
    match format {
        OutputFormat::Json => write_json(report, writer),
        OutputFormat::Csv => write_csv(report, writer),
    }
}

/// Write the report to `path`, creating parent directories, or to stdout
/// when no path is given.
pub fn write_report(
    report: &LeagueReport,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<(), OutputError> {
    let Some(path) = path else {
        let stdout = std::io::stdout();
        return render(report, format, stdout.lock());
    };

    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    render(report, format, std::io::BufWriter::new(file))?;
    info!("report written to {}", path.display());
    Ok(())
}
