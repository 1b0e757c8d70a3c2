// Seeding: tiebreak criteria, criteria chains, division and league seeders.

pub mod chain;
pub mod criteria;
pub mod seeder;

pub use chain::CriteriaChain;
pub use criteria::Criterion;
pub use seeder::{DivisionSeeder, DivisionSeeding, LeagueSeeder, LeagueSeeding, SeedEngine, Seeding};
