// League data-loading boundary.
//
// A source produces a `LeagueSnapshot`: the teams plus every completed
// week's raw matchups. Network-backed sources live in their own crates; this
// module ships the JSON snapshot source used for offline runs and tests.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::team::RosterId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub roster_id: RosterId,
    pub name: String,
}

/// One team's score in one week. `matchup_id` pairs the two teams that
/// played each other; it is absent for teams without a game that week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub roster_id: RosterId,
    pub points: f64,
    #[serde(default)]
    pub matchup_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMatchups {
    pub week: u32,
    pub matchups: Vec<MatchupEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub teams: Vec<TeamEntry>,
    #[serde(default)]
    pub weeks: Vec<WeekMatchups>,
}

/// Anything that can deliver a league snapshot.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<LeagueSnapshot>;
}

/// Snapshot read from a JSON file or held in memory.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    File(PathBuf),
    Memory(LeagueSnapshot),
}

impl SnapshotSource {
    pub fn parse(json: &str) -> anyhow::Result<LeagueSnapshot> {
        serde_json::from_str(json).context("failed to parse league snapshot")
    }
}

#[async_trait]
impl LeagueSource for SnapshotSource {
    async fn load(&self) -> anyhow::Result<LeagueSnapshot> {
        match self {
            SnapshotSource::File(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read snapshot {}", path.display()))?;
                let snapshot = Self::parse(&text)
                    .with_context(|| format!("invalid snapshot {}", path.display()))?;
                info!(
                    teams = snapshot.teams.len(),
                    weeks = snapshot.weeks.len(),
                    "loaded snapshot from {}",
                    path.display()
                );
                Ok(snapshot)
            }
            SnapshotSource::Memory(snapshot) => Ok(snapshot.clone()),
        }
    }
}
