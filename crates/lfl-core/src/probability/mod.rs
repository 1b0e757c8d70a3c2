// Probability model: rank-derived win odds and the win-count distribution.

pub mod rank;
pub mod scenario;

pub use rank::{probability, WinProbabilityModel};
pub use scenario::{exhaustive_distribution, win_distribution};
