// Sleeper REST client and the league source built on it.
//
// All endpoints are public and unauthenticated. Weekly matchups are fetched
// concurrently once the number of completed weeks is known.

use anyhow::Context;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use lfl_core::{LeagueSnapshot, LeagueSource};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::types::{completed_weeks, to_snapshot, SleeperMatchup, SleeperRoster, SleeperState, SleeperUser};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.sleeper.app/v1";

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// Thin typed wrapper over the Sleeper endpoints used for analytics.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn users(&self, league_id: &str) -> anyhow::Result<Vec<SleeperUser>> {
        self.get(&format!("league/{league_id}/users")).await
    }

    pub async fn rosters(&self, league_id: &str) -> anyhow::Result<Vec<SleeperRoster>> {
        self.get(&format!("league/{league_id}/rosters")).await
    }

    pub async fn state(&self) -> anyhow::Result<SleeperState> {
        self.get("state/nfl").await
    }

    pub async fn matchups(&self, league_id: &str, week: u32) -> anyhow::Result<Vec<SleeperMatchup>> {
        self.get(&format!("league/{league_id}/matchups/{week}")).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("{url} returned an error status"))?;
        response
            .json()
            .await
            .with_context(|| format!("unexpected payload from {url}"))
    }
}

impl Default for SleeperClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// ---------------------------------------------------------------------------
// SleeperSource
// ---------------------------------------------------------------------------

/// League source reading one Sleeper league.
#[derive(Debug, Clone)]
pub struct SleeperSource {
    client: SleeperClient,
    league_id: String,
    through_week: Option<u32>,
}

impl SleeperSource {
    pub fn new(client: SleeperClient, league_id: impl Into<String>) -> Self {
        Self {
            client,
            league_id: league_id.into(),
            through_week: None,
        }
    }

    /// Stop at `week` instead of the week before the current NFL week.
    pub fn through_week(mut self, week: Option<u32>) -> Self {
        self.through_week = week;
        self
    }
}

#[async_trait]
impl LeagueSource for SleeperSource {
    async fn load(&self) -> anyhow::Result<LeagueSnapshot> {
        let league_id = self.league_id.as_str();
        let (users, rosters, state) = futures_util::try_join!(
            self.client.users(league_id),
            self.client.rosters(league_id),
            self.client.state(),
        )?;

        let weeks: Vec<u32> = completed_weeks(state.week, self.through_week).collect();
        info!(
            league_id,
            current_week = state.week,
            weeks = weeks.len(),
            "fetching matchups"
        );
        let matchups = try_join_all(weeks.iter().map(|&week| async move {
            self.client
                .matchups(league_id, week)
                .await
                .map(|m| (week, m))
        }))
        .await?;

        let snapshot = to_snapshot(&users, &rosters, matchups);
        info!(league_id, teams = snapshot.teams.len(), "loaded league from Sleeper");
        Ok(snapshot)
    }
}
