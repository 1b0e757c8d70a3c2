// Team aggregate: weekly history, record, metrics and seeds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConsistencyError, LeagueError};
use crate::metrics::SeasonMetrics;
use crate::outcome::WeekOutcome;

/// Stable roster identifier assigned by the league platform.
pub type RosterId = u32;

/// Wins and losses over some subset of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Fraction of games won; 0.0 when no games were played.
    pub fn win_percentage(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            n => f64::from(self.wins) / f64::from(n),
        }
    }

    fn add(&mut self, win: bool) {
        if win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Derive the short display name: the second whitespace-separated token of
/// `name`, or the whole name when it has a single token.
pub fn short_name(name: &str) -> String {
    name.split_whitespace()
        .nth(1)
        .unwrap_or_else(|| name.trim())
        .to_string()
}

#[derive(Debug, Clone)]
pub struct Team {
    roster_id: RosterId,
    name: String,
    short_name: String,
    division: Option<String>,
    weeks: Vec<WeekOutcome>,
    record: Record,
    metrics: SeasonMetrics,
    pub(crate) division_seed: Option<u32>,
    pub(crate) league_seed: Option<u32>,
    seed_override: Option<u32>,
}

impl Team {
    pub fn new(roster_id: RosterId, name: impl Into<String>, division: Option<String>) -> Self {
        let name = name.into();
        Self {
            roster_id,
            short_name: short_name(&name),
            name,
            division,
            weeks: Vec::new(),
            record: Record::default(),
            metrics: SeasonMetrics::default(),
            division_seed: None,
            league_seed: None,
            seed_override: None,
        }
    }

    pub fn with_seed_override(mut self, seed: Option<u32>) -> Self {
        self.seed_override = seed;
        self
    }

    /// Insert one week's outcome, keeping weeks sorted and recomputing the
    /// record and metrics. Seeds from an earlier seeding run are cleared.
    /// On error the team is left unchanged.
    pub fn insert_week(&mut self, outcome: WeekOutcome) -> Result<(), LeagueError> {
        if outcome.week == 0 {
            return Err(ConsistencyError::InvalidWeek {
                roster_id: self.roster_id,
            }
            .into());
        }
        let index = match self.weeks.binary_search_by_key(&outcome.week, |w| w.week) {
            Ok(_) => {
                return Err(ConsistencyError::DuplicateWeek {
                    roster_id: self.roster_id,
                    week: outcome.week,
                }
                .into())
            }
            Err(index) => index,
        };

        let mut weeks = self.weeks.clone();
        weeks.insert(index, outcome);
        let metrics = SeasonMetrics::compute(&weeks)?;

        let mut record = Record::default();
        for w in &weeks {
            record.add(w.win);
        }

        debug!(
            roster_id = self.roster_id,
            games = weeks.len(),
            expected_wins = metrics.expected_wins,
            "recomputed season metrics"
        );
        self.weeks = weeks;
        self.record = record;
        self.metrics = metrics;
        self.division_seed = None;
        self.league_seed = None;
        Ok(())
    }

    pub fn roster_id(&self) -> RosterId {
        self.roster_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn division(&self) -> Option<&str> {
        self.division.as_deref()
    }

    pub fn weeks(&self) -> &[WeekOutcome] {
        &self.weeks
    }

    pub fn week(&self, week: u32) -> Option<&WeekOutcome> {
        self.weeks
            .binary_search_by_key(&week, |w| w.week)
            .ok()
            .map(|i| &self.weeks[i])
    }

    pub fn record(&self) -> Record {
        self.record
    }

    pub fn wins(&self) -> u32 {
        self.record.wins
    }

    pub fn losses(&self) -> u32 {
        self.record.losses
    }

    pub fn metrics(&self) -> &SeasonMetrics {
        &self.metrics
    }

    pub fn division_seed(&self) -> Option<u32> {
        self.division_seed
    }

    pub fn league_seed(&self) -> Option<u32> {
        self.league_seed
    }

    pub fn seed_override(&self) -> Option<u32> {
        self.seed_override
    }

    pub fn points_by_week(&self) -> Vec<f64> {
        self.weeks.iter().map(|w| w.points).collect()
    }

    pub fn rank_by_week(&self) -> Vec<u32> {
        self.weeks.iter().map(|w| w.rank).collect()
    }

    /// Both teams carry the same division label.
    pub fn shares_division_with(&self, other: &Team) -> bool {
        matches!((self.division(), other.division()), (Some(a), Some(b)) if a == b)
    }

    /// Record in games played against `opponent`.
    pub fn head_to_head_record(&self, opponent: RosterId) -> Record {
        let mut record = Record::default();
        for w in self.weeks.iter().filter(|w| w.opponent_id == opponent) {
            record.add(w.win);
        }
        record
    }

    /// Fraction of games won against `opponent`, or `None` when the two
    /// teams never met. `Some(0.0)` means they met and this team lost every
    /// game.
    pub fn head_to_head(&self, opponent: RosterId) -> Option<f64> {
        let record = self.head_to_head_record(opponent);
        (record.games() > 0).then(|| record.win_percentage())
    }

    /// Record restricted to division games.
    pub fn division_record(&self) -> Record {
        let mut record = Record::default();
        for w in self.weeks.iter().filter(|w| w.is_division_game) {
            record.add(w.win);
        }
        record
    }
}
