// League aggregate: teams, weekly ingestion and seeding.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{ConsistencyError, LeagueError};
use crate::outcome::{WeekInput, WeekOutcome};
use crate::probability::WinProbabilityModel;
use crate::report::LeagueReport;
use crate::seeding::{SeedEngine, Seeding};
use crate::settings::LeagueSettings;
use crate::source::{LeagueSnapshot, MatchupEntry, TeamEntry};
use crate::team::{RosterId, Team};

/// All teams of one league, kept in roster-id order.
#[derive(Debug, Clone)]
pub struct League {
    settings: LeagueSettings,
    teams: Vec<Team>,
    model: WinProbabilityModel,
    engine: SeedEngine,
    seeding: Option<Seeding>,
}

impl League {
    /// Create the league's teams, resolving divisions and seed overrides by
    /// short name.
    pub fn new(settings: LeagueSettings, entries: &[TeamEntry]) -> Result<Self, LeagueError> {
        let model = WinProbabilityModel::new(entries.len() as u32)?;

        let mut teams: Vec<Team> = Vec::with_capacity(entries.len());
        for entry in entries {
            if teams.iter().any(|t| t.roster_id() == entry.roster_id) {
                return Err(ConsistencyError::DuplicateTeam {
                    roster_id: entry.roster_id,
                }
                .into());
            }
            let short = crate::team::short_name(&entry.name);
            if let Some(other) = teams.iter().find(|t| t.short_name() == short) {
                let referenced =
                    settings.division_of(&short).is_some() || settings.seed_override(&short).is_some();
                if referenced {
                    return Err(ConsistencyError::AmbiguousShortName {
                        first: other.roster_id().min(entry.roster_id),
                        second: other.roster_id().max(entry.roster_id),
                        short_name: short,
                    }
                    .into());
                }
                warn!(
                    roster_id = entry.roster_id,
                    other = other.roster_id(),
                    short_name = %short,
                    "teams share a short name"
                );
            }
            let division = settings.division_of(&short).map(String::from);
            if division.is_none() && !settings.divisions.is_empty() {
                warn!(roster_id = entry.roster_id, short_name = %short, "team is not listed in any division");
            }
            let team = Team::new(entry.roster_id, entry.name.clone(), division)
                .with_seed_override(settings.seed_override(&short));
            teams.push(team);
        }
        teams.sort_by_key(|t| t.roster_id());

        let known: BTreeSet<&str> = teams.iter().map(|t| t.short_name()).collect();
        for name in settings
            .divisions
            .values()
            .flatten()
            .chain(settings.seed_overrides.keys())
        {
            if !known.contains(name.as_str()) {
                warn!(short_name = %name, "configured team name matches no team in the league");
            }
        }

        info!(league = %settings.name, teams = teams.len(), "league created");
        Ok(Self {
            settings,
            teams,
            model,
            engine: SeedEngine::default(),
            seeding: None,
        })
    }

    /// Create the league and ingest every week of `snapshot`.
    pub fn from_snapshot(settings: LeagueSettings, snapshot: &LeagueSnapshot) -> Result<Self, LeagueError> {
        let mut league = Self::new(settings, &snapshot.teams)?;
        league.ingest_snapshot(snapshot)?;
        Ok(league)
    }

    pub fn with_engine(mut self, engine: SeedEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, roster_id: RosterId) -> Option<&Team> {
        self.index_of(roster_id).ok().map(|i| &self.teams[i])
    }

    pub fn team_by_short_name(&self, short_name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.short_name() == short_name)
    }

    /// Teams grouped by division label. Divisionless teams are omitted.
    pub fn divisions(&self) -> BTreeMap<&str, Vec<&Team>> {
        let mut divisions: BTreeMap<&str, Vec<&Team>> = BTreeMap::new();
        for team in &self.teams {
            if let Some(name) = team.division() {
                divisions.entry(name).or_default().push(team);
            }
        }
        divisions
    }

    /// Highest week number recorded for any team.
    pub fn weeks_played(&self) -> u32 {
        self.teams
            .iter()
            .filter_map(|t| t.weeks().last().map(|w| w.week))
            .max()
            .unwrap_or(0)
    }

    /// Seeding from the last [`League::seed`] call, if no week has been
    /// ingested since.
    pub fn seeding(&self) -> Option<&Seeding> {
        self.seeding.as_ref()
    }

    /// Insert one pre-ranked week for `roster_id`, with ranks relative to
    /// the whole league.
    pub fn insert(&mut self, roster_id: RosterId, input: &WeekInput) -> Result<(), LeagueError> {
        let index = self.position(roster_id)?;
        self.position(input.opponent_id)?;
        let outcome = WeekOutcome::from_input(input, &self.model)?;
        self.teams[index].insert_week(outcome)?;
        self.invalidate_seeding();
        Ok(())
    }

    /// Ingest one week of raw matchups, deriving ranks and opponents.
    ///
    /// Entries without a matchup id are skipped. The rest are ranked by
    /// points, highest first, with equal scores ordered by roster id so no
    /// two teams share a rank. The whole week is applied or none of it is.
    /// Returns the number of outcomes recorded.
    pub fn ingest_week(&mut self, week: u32, matchups: &[MatchupEntry]) -> Result<usize, LeagueError> {
        let mut played: Vec<&MatchupEntry> = Vec::with_capacity(matchups.len());
        let mut seen = BTreeSet::new();
        for entry in matchups {
            self.position(entry.roster_id)?;
            if !seen.insert(entry.roster_id) {
                return Err(ConsistencyError::DuplicateWeek {
                    roster_id: entry.roster_id,
                    week,
                }
                .into());
            }
            if entry.matchup_id.is_none() {
                debug!(week, roster_id = entry.roster_id, "no matchup this week, skipping");
                continue;
            }
            played.push(entry);
        }
        if played.is_empty() {
            warn!(week, "week has no matchups");
            return Ok(0);
        }

        played.sort_by(|a, b| {
            b.points
                .total_cmp(&a.points)
                .then_with(|| a.roster_id.cmp(&b.roster_id))
        });
        let ranks: BTreeMap<RosterId, u32> = played
            .iter()
            .enumerate()
            .map(|(i, e)| (e.roster_id, i as u32 + 1))
            .collect();
        let model = WinProbabilityModel::new(played.len() as u32)?;

        let mut pairs: BTreeMap<u32, Vec<&MatchupEntry>> = BTreeMap::new();
        for entry in &played {
            if let Some(id) = entry.matchup_id {
                pairs.entry(id).or_default().push(*entry);
            }
        }

        let mut teams = self.teams.clone();
        let mut recorded = 0;
        for (matchup_id, sides) in &pairs {
            let [a, b] = sides.as_slice() else {
                return Err(ConsistencyError::MalformedMatchup {
                    week,
                    matchup_id: *matchup_id,
                    entries: sides.len(),
                }
                .into());
            };
            for (me, them) in [(a, b), (b, a)] {
                let index = self.position(me.roster_id)?;
                let opponent = self.position(them.roster_id)?;
                let input = WeekInput {
                    week,
                    points: me.points,
                    rank: ranks[&me.roster_id],
                    opponent_id: them.roster_id,
                    opponent_points: them.points,
                    opponent_rank: ranks[&them.roster_id],
                    is_division_game: self.teams[index].shares_division_with(&self.teams[opponent]),
                };
                let outcome = WeekOutcome::from_input(&input, &model)?;
                teams[index].insert_week(outcome)?;
                recorded += 1;
            }
        }

        self.teams = teams;
        self.invalidate_seeding();
        info!(week, outcomes = recorded, "ingested week");
        Ok(recorded)
    }

    /// Ingest every week of `snapshot` in ascending week order.
    pub fn ingest_snapshot(&mut self, snapshot: &LeagueSnapshot) -> Result<(), LeagueError> {
        let mut weeks: Vec<_> = snapshot.weeks.iter().collect();
        weeks.sort_by_key(|w| w.week);
        for week in weeks {
            self.ingest_week(week.week, &week.matchups)?;
        }
        Ok(())
    }

    /// Run division then league seeding over all teams.
    pub fn seed(&mut self) -> Result<&Seeding, LeagueError> {
        let seeding = self.engine.run(&mut self.teams)?;
        Ok(&*self.seeding.insert(seeding))
    }

    /// Build the presentation report, stamped with the current time.
    pub fn report(&self) -> LeagueReport {
        self.report_at(Utc::now())
    }

    pub fn report_at(&self, generated_at: DateTime<Utc>) -> LeagueReport {
        LeagueReport::build(self, generated_at)
    }

    fn index_of(&self, roster_id: RosterId) -> Result<usize, usize> {
        self.teams.binary_search_by_key(&roster_id, |t| t.roster_id())
    }

    fn position(&self, roster_id: RosterId) -> Result<usize, ConsistencyError> {
        self.index_of(roster_id)
            .map_err(|_| ConsistencyError::UnknownTeam { roster_id })
    }

    fn invalidate_seeding(&mut self) {
        self.seeding = None;
        for team in &mut self.teams {
            team.division_seed = None;
            team.league_seed = None;
        }
    }
}
