// A single team's result for one week.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::probability::WinProbabilityModel;
use crate::team::RosterId;

/// Raw weekly result as delivered by a league data source, before any of the
/// derived fields are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekInput {
    pub week: u32,
    pub points: f64,
    /// Rank among all teams that week, 1 = highest score.
    pub rank: u32,
    pub opponent_id: RosterId,
    pub opponent_points: f64,
    pub opponent_rank: u32,
    pub is_division_game: bool,
}

/// Immutable weekly result with its derived probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOutcome {
    pub week: u32,
    pub points: f64,
    pub rank: u32,
    /// Win probability implied by `rank`.
    pub win_probability: f64,
    /// Complementary probability implied by `opponent_rank`.
    pub schedule_probability: f64,
    pub is_division_game: bool,
    pub opponent_id: RosterId,
    pub opponent_points: f64,
    pub opponent_rank: u32,
    /// Strictly more points than the opponent. A tied score is a loss for
    /// both sides.
    pub win: bool,
}

impl WeekOutcome {
    /// Derive an outcome from raw input, using `model` for the week's team
    /// count. Fails if either rank is out of range or points are invalid.
    pub fn from_input(input: &WeekInput, model: &WinProbabilityModel) -> Result<Self, DomainError> {
        check_points(input.points)?;
        check_points(input.opponent_points)?;
        let win_probability = model.win_probability(input.rank)?;
        let schedule_probability = model.schedule_probability(input.opponent_rank)?;

        Ok(Self {
            week: input.week,
            points: input.points,
            rank: input.rank,
            win_probability,
            schedule_probability,
            is_division_game: input.is_division_game,
            opponent_id: input.opponent_id,
            opponent_points: input.opponent_points,
            opponent_rank: input.opponent_rank,
            win: input.points > input.opponent_points,
        })
    }
}

fn check_points(value: f64) -> Result<(), DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvalidPoints { value });
    }
    Ok(())
}
