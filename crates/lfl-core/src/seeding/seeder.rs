// Division and league seeders, and the engine that sequences them.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::ConsistencyError;
use crate::seeding::chain::CriteriaChain;
use crate::team::{RosterId, Team};

/// Proof that division seeding ran, and the order it produced.
///
/// The league seeder takes this as an argument, so league seeding cannot be
/// requested before division seeding. It also records every team's seed and
/// game count, so a proof is rejected once either has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionSeeding {
    divisions: BTreeMap<String, Vec<RosterId>>,
    seeds: BTreeMap<RosterId, SeededState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SeededState {
    division_seed: Option<u32>,
    games: usize,
}

impl SeededState {
    fn of(team: &Team) -> Self {
        Self {
            division_seed: team.division_seed(),
            games: team.weeks().len(),
        }
    }
}

impl DivisionSeeding {
    /// Division name to roster ids, best seed first.
    pub fn divisions(&self) -> &BTreeMap<String, Vec<RosterId>> {
        &self.divisions
    }

    fn verify(&self, teams: &[Team]) -> Result<(), ConsistencyError> {
        for team in teams {
            if self.seeds.get(&team.roster_id()) != Some(&SeededState::of(team)) {
                return Err(ConsistencyError::StaleDivisionSeeding {
                    roster_id: team.roster_id(),
                });
            }
        }
        if let Some(&roster_id) = self
            .seeds
            .keys()
            .find(|id| !teams.iter().any(|t| t.roster_id() == **id))
        {
            return Err(ConsistencyError::StaleDivisionSeeding { roster_id });
        }
        Ok(())
    }
}

/// League-wide order, best seed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSeeding {
    order: Vec<RosterId>,
}

impl LeagueSeeding {
    pub fn order(&self) -> &[RosterId] {
        &self.order
    }
}

/// Both phases of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seeding {
    pub division: DivisionSeeding,
    pub league: LeagueSeeding,
}

/// Teams enter every sort in roster-id order, which makes a full tie resolve
/// to the lower roster id.
fn by_roster_id<'a>(teams: impl Iterator<Item = &'a Team>) -> Vec<&'a Team> {
    let mut sorted: Vec<&Team> = teams.collect();
    sorted.sort_by_key(|t| t.roster_id());
    sorted
}

#[derive(Debug, Clone)]
pub struct DivisionSeeder {
    chain: CriteriaChain,
}

impl DivisionSeeder {
    pub fn new(chain: CriteriaChain) -> Self {
        Self { chain }
    }

    /// Assign `division_seed = 1..M` within each division. Divisionless
    /// teams get no division seed. Any previous league seeds are cleared.
    pub fn seed(&self, teams: &mut [Team]) -> Result<DivisionSeeding, ConsistencyError> {
        let mut divisions: BTreeMap<String, Vec<RosterId>> = BTreeMap::new();
        {
            let mut grouped: BTreeMap<&str, Vec<&Team>> = BTreeMap::new();
            for team in teams.iter() {
                if let Some(division) = team.division() {
                    grouped.entry(division).or_default().push(team);
                }
            }
            for (name, members) in grouped {
                let mut order = by_roster_id(members.into_iter());
                self.chain.sort(&mut order)?;
                let ids: Vec<RosterId> = order.iter().map(|t| t.roster_id()).collect();
                debug!(division = name, order = ?ids, "division order");
                divisions.insert(name.to_string(), ids);
            }
        }

        let mut seeds = BTreeMap::new();
        for team in teams.iter_mut() {
            team.division_seed = team.division().and_then(|name| {
                divisions
                    .get(name)
                    .and_then(|ids| ids.iter().position(|id| *id == team.roster_id()))
                    .map(|i| i as u32 + 1)
            });
            team.league_seed = None;
            seeds.insert(team.roster_id(), SeededState::of(team));
        }

        info!(divisions = divisions.len(), "division seeding complete");
        Ok(DivisionSeeding { divisions, seeds })
    }
}

impl Default for DivisionSeeder {
    fn default() -> Self {
        Self::new(CriteriaChain::division())
    }
}

#[derive(Debug, Clone)]
pub struct LeagueSeeder {
    chain: CriteriaChain,
}

impl LeagueSeeder {
    pub fn new(chain: CriteriaChain) -> Self {
        Self { chain }
    }

    /// Assign `league_seed = 1..N` across all teams. `division` must come
    /// from a division seeding of these same teams with no changes since.
    pub fn seed(
        &self,
        teams: &mut [Team],
        division: &DivisionSeeding,
    ) -> Result<LeagueSeeding, ConsistencyError> {
        division.verify(teams)?;

        let order: Vec<RosterId> = {
            let mut sorted = by_roster_id(teams.iter());
            self.chain.sort(&mut sorted)?;
            sorted.iter().map(|t| t.roster_id()).collect()
        };

        for team in teams.iter_mut() {
            team.league_seed = order
                .iter()
                .position(|id| *id == team.roster_id())
                .map(|i| i as u32 + 1);
        }

        info!(teams = order.len(), "league seeding complete");
        Ok(LeagueSeeding { order })
    }
}

impl Default for LeagueSeeder {
    fn default() -> Self {
        Self::new(CriteriaChain::league())
    }
}

/// Runs division seeding, then league seeding.
#[derive(Debug, Clone, Default)]
pub struct SeedEngine {
    division: DivisionSeeder,
    league: LeagueSeeder,
}

impl SeedEngine {
    pub fn new(division: DivisionSeeder, league: LeagueSeeder) -> Self {
        Self { division, league }
    }

    pub fn run(&self, teams: &mut [Team]) -> Result<Seeding, ConsistencyError> {
        let division = self.division.seed(teams)?;
        let league = self.league.seed(teams, &division)?;
        Ok(Seeding { division, league })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{WeekInput, WeekOutcome};
    use crate::probability::WinProbabilityModel;

    /// Record a game between `teams[a]` and `teams[b]` for `week`, with ranks
    /// chosen so the winner has the higher win probability.
    fn game(teams: &mut [Team], week: u32, a: usize, b: usize, a_points: f64, b_points: f64) {
        let model = WinProbabilityModel::new(teams.len() as u32).unwrap();
        let (a_rank, b_rank) = if a_points > b_points { (1, 2) } else { (2, 1) };
        let division_game = teams[a].shares_division_with(&teams[b]);
        let (a_id, b_id) = (teams[a].roster_id(), teams[b].roster_id());
        let ia = WeekInput {
            week,
            points: a_points,
            rank: a_rank,
            opponent_id: b_id,
            opponent_points: b_points,
            opponent_rank: b_rank,
            is_division_game: division_game,
        };
        let ib = WeekInput {
            week,
            points: b_points,
            rank: b_rank,
            opponent_id: a_id,
            opponent_points: a_points,
            opponent_rank: a_rank,
            is_division_game: division_game,
        };
        teams[a].insert_week(WeekOutcome::from_input(&ia, &model).unwrap()).unwrap();
        teams[b].insert_week(WeekOutcome::from_input(&ib, &model).unwrap()).unwrap();
    }

    /// Four teams, two divisions.
    fn league() -> Vec<Team> {
        vec![
            Team::new(1, "Team A", Some("North".into())),
            Team::new(2, "Team B", Some("North".into())),
            Team::new(3, "Team C", Some("South".into())),
            Team::new(4, "Team D", Some("South".into())),
        ]
    }

    fn seeds(teams: &[Team]) -> Vec<(RosterId, Option<u32>, Option<u32>)> {
        teams
            .iter()
            .map(|t| (t.roster_id(), t.division_seed(), t.league_seed()))
            .collect()
    }

    #[test]
    fn division_seeds_follow_record_then_head_to_head() {
        let mut teams = league();
        game(&mut teams, 1, 0, 1, 90.0, 100.0); // B beats A
        game(&mut teams, 1, 2, 3, 120.0, 80.0); // C beats D
        game(&mut teams, 2, 0, 2, 130.0, 70.0); // A beats C
        game(&mut teams, 2, 1, 3, 60.0, 110.0); // D beats B
        // Everyone is 1-1. A/B and C/D are separated by head-to-head.

        let seeding = DivisionSeeder::default().seed(&mut teams).unwrap();
        assert_eq!(seeding.divisions()["North"], vec![2, 1]);
        assert_eq!(seeding.divisions()["South"], vec![3, 4]);
        assert_eq!(teams[0].division_seed(), Some(2));
        assert_eq!(teams[1].division_seed(), Some(1));
        assert_eq!(teams[2].division_seed(), Some(1));
        assert_eq!(teams[3].division_seed(), Some(2));
    }

    #[test]
    fn divisionless_teams_get_no_division_seed() {
        let mut teams = vec![
            Team::new(1, "Team A", Some("North".into())),
            Team::new(2, "Team B", None),
        ];
        game(&mut teams, 1, 0, 1, 100.0, 90.0);
        let seeding = SeedEngine::default().run(&mut teams).unwrap();
        assert_eq!(teams[0].division_seed(), Some(1));
        assert_eq!(teams[1].division_seed(), None);
        assert_eq!(seeding.league.order(), &[1, 2]);
    }

    #[test]
    fn league_seeding_puts_division_leader_first_on_equal_records() {
        let mut teams = league();
        game(&mut teams, 1, 0, 1, 90.0, 100.0);
        game(&mut teams, 1, 2, 3, 120.0, 80.0);
        game(&mut teams, 2, 0, 2, 130.0, 70.0);
        game(&mut teams, 2, 1, 3, 60.0, 110.0);

        let seeding = SeedEngine::default().run(&mut teams).unwrap();
        let order = seeding.league.order();
        // Division leaders (B, C) rank above the runners-up (A, D).
        assert!(order[..2].contains(&2));
        assert!(order[..2].contains(&3));
        assert!(order[2..].contains(&1));
        assert!(order[2..].contains(&4));
        // A beat C head-to-head but C leads its division.
        let pos = |id| order.iter().position(|x| *x == id).unwrap();
        assert!(pos(3) < pos(1));
    }

    #[test]
    fn seeds_are_permutations() {
        let mut teams = league();
        teams.push(Team::new(5, "Team E", Some("North".into())));
        teams.push(Team::new(6, "Team F", None));
        game(&mut teams, 1, 0, 1, 100.0, 90.0);
        game(&mut teams, 1, 2, 3, 100.0, 95.0);
        game(&mut teams, 1, 4, 5, 80.0, 85.0);

        SeedEngine::default().run(&mut teams).unwrap();

        let mut league_seeds: Vec<u32> = teams.iter().filter_map(|t| t.league_seed()).collect();
        league_seeds.sort();
        assert_eq!(league_seeds, (1..=6).collect::<Vec<_>>());

        for division in ["North", "South"] {
            let mut div_seeds: Vec<u32> = teams
                .iter()
                .filter(|t| t.division() == Some(division))
                .filter_map(|t| t.division_seed())
                .collect();
            div_seeds.sort();
            let size = div_seeds.len() as u32;
            assert_eq!(div_seeds, (1..=size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn full_ties_fall_back_to_roster_id() {
        let mut teams = vec![
            Team::new(9, "Team Z", Some("North".into())),
            Team::new(3, "Team Y", Some("North".into())),
            Team::new(5, "Team X", Some("North".into())),
        ];
        SeedEngine::default().run(&mut teams).unwrap();
        assert_eq!(seeds(&teams), vec![(9, Some(3), Some(3)), (3, Some(1), Some(1)), (5, Some(2), Some(2))]);
    }

    #[test]
    fn stale_division_seeding_is_rejected() {
        let mut teams = league();
        let division = DivisionSeeder::default().seed(&mut teams).unwrap();
        let mut other = league();
        other[0].division_seed = Some(2);
        other[1].division_seed = Some(1);
        let err = LeagueSeeder::default().seed(&mut other, &division).unwrap_err();
        assert!(matches!(err, ConsistencyError::StaleDivisionSeeding { .. }));
    }

    #[test]
    fn week_added_after_division_seeding_is_rejected() {
        let mut teams = vec![
            Team::new(1, "Team A", Some("North".into())),
            Team::new(2, "Team B", Some("North".into())),
            Team::new(3, "Team C", None),
        ];
        game(&mut teams, 1, 0, 1, 110.0, 90.0);
        let division = DivisionSeeder::default().seed(&mut teams).unwrap();
        assert_eq!(division.divisions()["North"], vec![1, 2]);

        // B overtakes A on wins.
        game(&mut teams, 2, 1, 2, 100.0, 80.0);
        game(&mut teams, 3, 1, 2, 100.0, 80.0);
        let err = LeagueSeeder::default().seed(&mut teams, &division).unwrap_err();
        assert!(matches!(err, ConsistencyError::StaleDivisionSeeding { .. }));

        let fresh = SeedEngine::default().run(&mut teams).unwrap();
        assert_eq!(fresh.division.divisions()["North"], vec![2, 1]);
        assert_eq!(fresh.league.order(), &[2, 1, 3]);
    }

    #[test]
    fn week_added_to_divisionless_team_invalidates_division_seeding() {
        let mut teams = vec![
            Team::new(1, "Team A", Some("North".into())),
            Team::new(2, "Team B", None),
            Team::new(3, "Team C", None),
        ];
        let division = DivisionSeeder::default().seed(&mut teams).unwrap();
        game(&mut teams, 1, 1, 2, 90.0, 100.0);
        assert_eq!(teams[0].division_seed(), Some(1));
        let err = LeagueSeeder::default().seed(&mut teams, &division).unwrap_err();
        assert!(matches!(err, ConsistencyError::StaleDivisionSeeding { .. }));
    }

    #[test]
    fn division_seeding_for_a_different_team_set_is_rejected() {
        let mut teams = league();
        let division = DivisionSeeder::default().seed(&mut teams).unwrap();
        teams.pop();
        let err = LeagueSeeder::default().seed(&mut teams, &division).unwrap_err();
        assert_eq!(err, ConsistencyError::StaleDivisionSeeding { roster_id: 4 });
    }

    #[test]
    fn reseeding_divisions_clears_league_seeds() {
        let mut teams = league();
        SeedEngine::default().run(&mut teams).unwrap();
        assert!(teams.iter().all(|t| t.league_seed().is_some()));
        DivisionSeeder::default().seed(&mut teams).unwrap();
        assert!(teams.iter().all(|t| t.league_seed().is_none()));
    }

    #[test]
    fn seeding_is_deterministic() {
        let build = || {
            let mut teams = league();
            game(&mut teams, 1, 0, 3, 100.0, 90.0);
            game(&mut teams, 1, 1, 2, 100.0, 90.0);
            teams
        };
        let mut first = build();
        let mut second = build();
        let a = SeedEngine::default().run(&mut first).unwrap();
        let b = SeedEngine::default().run(&mut second).unwrap();
        assert_eq!(a, b);
        assert_eq!(seeds(&first), seeds(&second));
    }
}
