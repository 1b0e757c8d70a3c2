// Ordered criteria lists and the chain sort.

use std::cmp::Ordering;

use crate::error::ConsistencyError;
use crate::seeding::criteria::Criterion;
use crate::team::Team;

/// Criteria evaluated in declared order; the first one that separates two
/// teams decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaChain {
    criteria: Vec<Criterion>,
}

impl CriteriaChain {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// Record, head-to-head, division record, expected wins.
    pub fn division() -> Self {
        Self::new(vec![
            Criterion::Record,
            Criterion::HeadToHead,
            Criterion::DivisionRecord,
            Criterion::ExpectedWins,
        ])
    }

    /// Record, same-division seed, division leader, head-to-head, expected
    /// wins. Reads division seeds, so division seeding must run first.
    pub fn league() -> Self {
        Self::new(vec![
            Criterion::Record,
            Criterion::SameDivision,
            Criterion::DivisionLeader,
            Criterion::HeadToHead,
            Criterion::ExpectedWins,
        ])
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// `Greater` means `a` ranks better. `Equal` only when every criterion
    /// ties.
    pub fn compare(&self, a: &Team, b: &Team) -> Result<Ordering, ConsistencyError> {
        for criterion in &self.criteria {
            let ordering = criterion.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }

    /// Order `teams` best first.
    ///
    /// Tiebreak chains are not guaranteed to be transitive (three teams can
    /// beat each other in a head-to-head cycle), so this uses a stable
    /// insertion sort instead of `slice::sort_by`, which requires a total
    /// order. Teams that tie on every criterion keep their input order.
    pub fn sort(&self, teams: &mut [&Team]) -> Result<(), ConsistencyError> {
        for i in 1..teams.len() {
            let mut j = i;
            while j > 0 && self.compare(teams[j], teams[j - 1])? == Ordering::Greater {
                teams.swap(j, j - 1);
                j -= 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{WeekInput, WeekOutcome};
    use crate::probability::WinProbabilityModel;
    use crate::team::RosterId;

    fn play(team: &mut Team, week: u32, opponent: RosterId, rank: u32, won: bool) {
        let model = WinProbabilityModel::new(6).unwrap();
        let input = WeekInput {
            week,
            points: if won { 110.0 } else { 90.0 },
            rank,
            opponent_id: opponent,
            opponent_points: 100.0,
            opponent_rank: 3,
            is_division_game: false,
        };
        team.insert_week(WeekOutcome::from_input(&input, &model).unwrap()).unwrap();
    }

    fn ids(teams: &[&Team]) -> Vec<RosterId> {
        teams.iter().map(|t| t.roster_id()).collect()
    }

    #[test]
    fn first_separating_criterion_decides() {
        let mut a = Team::new(1, "Team A", None);
        let mut b = Team::new(2, "Team B", None);
        // Same record; b has more expected wins.
        play(&mut a, 1, 9, 4, true);
        play(&mut b, 1, 8, 2, true);
        let chain = CriteriaChain::division();
        assert_eq!(chain.compare(&a, &b), Ok(Ordering::Less));

        // Record comes first and overrides expected wins.
        play(&mut a, 2, 9, 6, true);
        play(&mut b, 2, 8, 1, false);
        assert_eq!(chain.compare(&a, &b), Ok(Ordering::Greater));
    }

    #[test]
    fn empty_chain_ties_everything() {
        let a = Team::new(1, "Team A", None);
        let b = Team::new(2, "Team B", None);
        assert_eq!(CriteriaChain::new(vec![]).compare(&a, &b), Ok(Ordering::Equal));
    }

    #[test]
    fn sort_orders_best_first_and_is_stable_on_full_ties() {
        let mut a = Team::new(1, "Team A", None);
        let mut b = Team::new(2, "Team B", None);
        let c = Team::new(3, "Team C", None);
        let d = Team::new(4, "Team D", None);
        play(&mut a, 1, 9, 3, true);
        play(&mut b, 1, 9, 3, true);
        play(&mut b, 2, 9, 3, true);

        let mut order = vec![&c, &a, &d, &b];
        CriteriaChain::new(vec![Criterion::Record]).sort(&mut order).unwrap();
        assert_eq!(ids(&order), vec![2, 1, 3, 4]);
    }

    #[test]
    fn sort_terminates_on_head_to_head_cycle() {
        let mut a = Team::new(1, "Team A", None);
        let mut b = Team::new(2, "Team B", None);
        let mut c = Team::new(3, "Team C", None);
        // a beat b, b beat c, c beat a: everyone 1-1.
        play(&mut a, 1, 2, 1, true);
        play(&mut b, 1, 1, 6, false);
        play(&mut b, 2, 3, 1, true);
        play(&mut c, 2, 2, 6, false);
        play(&mut c, 3, 1, 1, true);
        play(&mut a, 3, 3, 6, false);

        let chain = CriteriaChain::new(vec![Criterion::Record, Criterion::HeadToHead]);
        let mut order = vec![&a, &b, &c];
        chain.sort(&mut order).unwrap();
        let mut again = vec![&a, &b, &c];
        chain.sort(&mut again).unwrap();
        assert_eq!(ids(&order), ids(&again));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn canonical_chains_have_declared_order() {
        assert_eq!(
            CriteriaChain::division().criteria(),
            &[
                Criterion::Record,
                Criterion::HeadToHead,
                Criterion::DivisionRecord,
                Criterion::ExpectedWins
            ]
        );
        assert_eq!(
            CriteriaChain::league().criteria(),
            &[
                Criterion::Record,
                Criterion::SameDivision,
                Criterion::DivisionLeader,
                Criterion::HeadToHead,
                Criterion::ExpectedWins
            ]
        );
    }

    #[test]
    fn sort_propagates_comparator_errors() {
        let a = Team::new(1, "Team A", Some("North".into()));
        let b = Team::new(2, "Team B", Some("North".into()));
        let mut order = vec![&a, &b];
        assert!(CriteriaChain::league().sort(&mut order).is_err());
    }
}
