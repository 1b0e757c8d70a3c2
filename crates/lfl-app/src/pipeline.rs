// Source selection and the load, ingest, seed and report sequence.

use anyhow::Context;
use lfl_core::{League, LeagueReport, LeagueSource, SnapshotSource};
use lfl_sleeper::{SleeperClient, SleeperSource, DEFAULT_BASE_URL};
use tracing::info;

use crate::config::{Config, SourceConfig};

/// Build the league source described by the config.
pub fn source_for(config: &Config) -> Box<dyn LeagueSource> {
    match &config.source {
        SourceConfig::Sleeper {
            league_id,
            base_url,
            through_week,
        } => {
            let client = SleeperClient::new(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
            Box::new(SleeperSource::new(client, league_id.clone()).through_week(*through_week))
        }
        SourceConfig::Snapshot { path } => Box::new(SnapshotSource::File(config.resolve(path))),
    }
}

/// Load league data from `source`, compute metrics and seeds, and build the
/// report.
pub async fn run(config: &Config, source: &dyn LeagueSource) -> anyhow::Result<LeagueReport> {
    let snapshot = source.load().await.context("failed to load league data")?;
    info!(
        teams = snapshot.teams.len(),
        weeks = snapshot.weeks.len(),
        "league data loaded"
    );

    let mut league =
        League::from_snapshot(config.settings(), &snapshot).context("failed to ingest league data")?;
    let seeding = league.seed().context("failed to seed league")?;
    info!(
        order = ?seeding.league.order(),
        divisions = seeding.division.divisions().len(),
        "seeding complete"
    );

    Ok(league.report())
}
