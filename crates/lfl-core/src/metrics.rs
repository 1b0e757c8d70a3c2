// Season summary statistics over a team's weekly outcomes.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::outcome::WeekOutcome;
use crate::probability::win_distribution;

/// Number of most recent games averaged by [`MetricKind::RecentMean`].
pub const RECENT_GAMES: usize = 5;

/// Scalar metrics computed over an ordered outcome sequence.
///
/// Every kind returns 0.0 for an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    Mean,
    /// Population standard deviation (N denominator).
    StdDev,
    Median,
    /// Mean of the last [`RECENT_GAMES`] games by week order.
    RecentMean,
    /// Sum of weekly win probabilities.
    ExpectedWins,
    /// Sum of weekly schedule probabilities.
    ScheduleStrength,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Mean,
        MetricKind::StdDev,
        MetricKind::Median,
        MetricKind::RecentMean,
        MetricKind::ExpectedWins,
        MetricKind::ScheduleStrength,
    ];

    pub fn compute(self, weeks: &[WeekOutcome]) -> f64 {
        if weeks.is_empty() {
            return 0.0;
        }
        match self {
            MetricKind::Mean => mean(weeks.iter().map(|w| w.points)),
            MetricKind::StdDev => {
                let avg = mean(weeks.iter().map(|w| w.points));
                mean(weeks.iter().map(|w| (w.points - avg).powi(2))).sqrt()
            }
            MetricKind::Median => {
                let mut points: Vec<f64> = weeks.iter().map(|w| w.points).collect();
                points.sort_by(f64::total_cmp);
                let mid = points.len() / 2;
                if points.len() % 2 == 1 {
                    points[mid]
                } else {
                    (points[mid - 1] + points[mid]) / 2.0
                }
            }
            MetricKind::RecentMean => {
                let start = weeks.len().saturating_sub(RECENT_GAMES);
                mean(weeks[start..].iter().map(|w| w.points))
            }
            MetricKind::ExpectedWins => weeks.iter().map(|w| w.win_probability).sum(),
            MetricKind::ScheduleStrength => weeks.iter().map(|w| w.schedule_probability).sum(),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

/// Snapshot of a team's season, replaced wholesale after every new week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonMetrics {
    pub mean_points: f64,
    pub std_dev_points: f64,
    pub median_points: f64,
    pub recent_mean_points: f64,
    pub expected_wins: f64,
    pub schedule_strength: f64,
    /// `win_distribution[k]` is the probability of exactly `k` wins over the
    /// games played so far.
    pub win_distribution: Vec<f64>,
}

impl SeasonMetrics {
    /// Compute every metric from `weeks`, which must already be in week order.
    pub fn compute(weeks: &[WeekOutcome]) -> Result<Self, DomainError> {
        let probabilities: Vec<f64> = weeks.iter().map(|w| w.win_probability).collect();
        Ok(Self {
            mean_points: MetricKind::Mean.compute(weeks),
            std_dev_points: MetricKind::StdDev.compute(weeks),
            median_points: MetricKind::Median.compute(weeks),
            recent_mean_points: MetricKind::RecentMean.compute(weeks),
            expected_wins: MetricKind::ExpectedWins.compute(weeks),
            schedule_strength: MetricKind::ScheduleStrength.compute(weeks),
            win_distribution: win_distribution(&probabilities)?,
        })
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Mean => self.mean_points,
            MetricKind::StdDev => self.std_dev_points,
            MetricKind::Median => self.median_points,
            MetricKind::RecentMean => self.recent_mean_points,
            MetricKind::ExpectedWins => self.expected_wins,
            MetricKind::ScheduleStrength => self.schedule_strength,
        }
    }

    /// Most likely final win count. Ties go to the lower count.
    pub fn most_likely_wins(&self) -> usize {
        let mut best = 0;
        for (k, &p) in self.win_distribution.iter().enumerate() {
            if p > self.win_distribution[best] {
                best = k;
            }
        }
        best
    }
}

impl Default for SeasonMetrics {
    fn default() -> Self {
        Self {
            mean_points: 0.0,
            std_dev_points: 0.0,
            median_points: 0.0,
            recent_mean_points: 0.0,
            expected_wins: 0.0,
            schedule_strength: 0.0,
            win_distribution: vec![1.0],
        }
    }
}
