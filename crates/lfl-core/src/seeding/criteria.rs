// Pairwise tiebreak criteria.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::ConsistencyError;
use crate::team::{RosterId, Team};

/// A single comparison rule between two teams.
///
/// `compare(a, b)` returns `Greater` when `a` ranks better, `Less` when `b`
/// ranks better, and `Equal` when the rule cannot separate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// More wins ranks better.
    Record,
    /// Winning more of the direct meetings than were lost ranks better.
    /// Pairs that never met are tied on this criterion.
    HeadToHead,
    /// Higher win percentage in division games ranks better.
    DivisionRecord,
    /// Higher expected wins ranks better.
    ExpectedWins,
    /// For two teams of the same division, the better division seed ranks
    /// better. No effect across divisions.
    SameDivision,
    /// A division winner ranks above a team that did not win its division.
    DivisionLeader,
    /// Lower division seed ranks better.
    DivisionSeed,
}

impl Criterion {
    pub fn compare(self, a: &Team, b: &Team) -> Result<Ordering, ConsistencyError> {
        let ordering = match self {
            Criterion::Record => a.wins().cmp(&b.wins()),
            Criterion::HeadToHead => head_to_head(a, b),
            Criterion::DivisionRecord => a
                .division_record()
                .win_percentage()
                .total_cmp(&b.division_record().win_percentage()),
            Criterion::ExpectedWins => a
                .metrics()
                .expected_wins
                .total_cmp(&b.metrics().expected_wins),
            Criterion::SameDivision => {
                if a.shares_division_with(b) {
                    required_seed(b)?.cmp(&required_seed(a)?)
                } else {
                    Ordering::Equal
                }
            }
            Criterion::DivisionLeader => {
                match (is_division_leader(a)?, is_division_leader(b)?) {
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ => Ordering::Equal,
                }
            }
            Criterion::DivisionSeed => required_seed(b)?.cmp(&required_seed(a)?),
        };
        Ok(ordering)
    }
}

/// Meetings won against meetings lost, read from `a`'s history and falling
/// back to `b`'s when `a` has none. A tied score counts on neither side.
fn head_to_head(a: &Team, b: &Team) -> Ordering {
    if let Some((won, lost)) = meetings(a, b.roster_id()) {
        return won.cmp(&lost);
    }
    meetings(b, a.roster_id()).map_or(Ordering::Equal, |(won, lost)| lost.cmp(&won))
}

fn meetings(team: &Team, opponent: RosterId) -> Option<(u32, u32)> {
    let mut played = false;
    let (mut won, mut lost) = (0, 0);
    for w in team.weeks().iter().filter(|w| w.opponent_id == opponent) {
        played = true;
        if w.win {
            won += 1;
        } else if w.opponent_points > w.points {
            lost += 1;
        }
    }
    played.then_some((won, lost))
}

fn required_seed(team: &Team) -> Result<u32, ConsistencyError> {
    team.division_seed()
        .ok_or(ConsistencyError::MissingDivisionSeed {
            roster_id: team.roster_id(),
        })
}

/// Divisionless teams can never lead a division. A divisioned team without
/// a seed means division seeding has not run.
fn is_division_leader(team: &Team) -> Result<bool, ConsistencyError> {
    if team.division().is_none() {
        return Ok(false);
    }
    Ok(required_seed(team)? == 1)
}
