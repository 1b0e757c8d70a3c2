// Error taxonomy for the standings core.

use thiserror::Error;

use crate::team::RosterId;

/// Invalid inputs to the probability model and metric computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("win probability needs at least two teams, got {team_count}")]
    SingleTeamLeague { team_count: u32 },

    #[error("rank {rank} is outside 1..={team_count}")]
    RankOutOfRange { rank: u32, team_count: u32 },

    #[error("probability at index {index} is {value}, expected a value in [0, 1]")]
    ProbabilityOutOfRange { index: usize, value: f64 },

    #[error("points must be finite and non-negative, got {value}")]
    InvalidPoints { value: f64 },

    #[error("exhaustive enumeration supports at most {max} events, got {count}")]
    TooManyEvents { count: usize, max: usize },
}

/// Precondition violations in ingestion and seeding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsistencyError {
    #[error("team {roster_id} already has a result for week {week}")]
    DuplicateWeek { roster_id: RosterId, week: u32 },

    #[error("week numbers start at 1, got week 0 for team {roster_id}")]
    InvalidWeek { roster_id: RosterId },

    #[error("unknown team {roster_id}")]
    UnknownTeam { roster_id: RosterId },

    #[error("team {roster_id} is listed more than once")]
    DuplicateTeam { roster_id: RosterId },

    #[error("teams {first} and {second} share the configured short name {short_name}")]
    AmbiguousShortName {
        short_name: String,
        first: RosterId,
        second: RosterId,
    },

    #[error("team {roster_id} belongs to a division but has no division seed")]
    MissingDivisionSeed { roster_id: RosterId },

    #[error("division seeding does not match the current teams (team {roster_id})")]
    StaleDivisionSeeding { roster_id: RosterId },

    #[error("matchup {matchup_id} in week {week} has {entries} entries, expected 2")]
    MalformedMatchup {
        week: u32,
        matchup_id: u32,
        entries: usize,
    },
}

/// Any failure of a league computation. One failing team aborts the whole
/// computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeagueError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}
