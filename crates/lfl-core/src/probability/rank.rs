// Rank-to-probability conversion.

use crate::error::DomainError;

/// Linear mapping from a weekly rank to a win probability.
///
/// A team that posts the best score of the week (rank 1) would have beaten
/// every other team, so its win probability is 1.0. The worst score maps to
/// 0.0, with every rank in between spaced evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinProbabilityModel {
    team_count: u32,
}

impl WinProbabilityModel {
    /// Build a model for a week in which `team_count` teams were ranked.
    pub fn new(team_count: u32) -> Result<Self, DomainError> {
        if team_count < 2 {
            return Err(DomainError::SingleTeamLeague { team_count });
        }
        Ok(Self { team_count })
    }

    pub fn team_count(&self) -> u32 {
        self.team_count
    }

    /// `(N - rank) / (N - 1)`: rank 1 maps to 1.0, rank N to 0.0.
    pub fn win_probability(&self, rank: u32) -> Result<f64, DomainError> {
        self.check_rank(rank)?;
        Ok(f64::from(self.team_count - rank) / self.denominator())
    }

    /// Complementary mapping applied to an opponent's rank:
    /// `(rank - 1) / (N - 1)`.
    pub fn schedule_probability(&self, opponent_rank: u32) -> Result<f64, DomainError> {
        self.check_rank(opponent_rank)?;
        Ok(f64::from(opponent_rank - 1) / self.denominator())
    }

    fn denominator(&self) -> f64 {
        f64::from(self.team_count - 1)
    }

    fn check_rank(&self, rank: u32) -> Result<(), DomainError> {
        if rank == 0 || rank > self.team_count {
            return Err(DomainError::RankOutOfRange {
                rank,
                team_count: self.team_count,
            });
        }
        Ok(())
    }
}

/// Convenience wrapper for a one-off conversion.
pub fn probability(rank: u32, team_count: u32) -> Result<f64, DomainError> {
    WinProbabilityModel::new(team_count)?.win_probability(rank)
}
