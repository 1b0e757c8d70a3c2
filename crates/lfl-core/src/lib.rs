// Fantasy league analytics: win probabilities, season metrics and seeding.

pub mod error;
pub mod league;
pub mod metrics;
pub mod outcome;
pub mod probability;
pub mod report;
pub mod seeding;
pub mod settings;
pub mod source;
pub mod team;

pub use error::{ConsistencyError, DomainError, LeagueError};
pub use league::League;
pub use metrics::{MetricKind, SeasonMetrics};
pub use outcome::{WeekInput, WeekOutcome};
pub use report::{HeadToHeadCell, HeadToHeadRow, LeagueReport, TeamReport};
pub use seeding::{CriteriaChain, Criterion, SeedEngine, Seeding};
pub use settings::LeagueSettings;
pub use source::{LeagueSnapshot, LeagueSource, MatchupEntry, SnapshotSource, TeamEntry, WeekMatchups};
pub use team::{Record, RosterId, Team};
