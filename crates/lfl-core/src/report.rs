// Serializable season report: per-team standings plus the head-to-head grid.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::league::League;
use crate::metrics::SeasonMetrics;
use crate::outcome::WeekOutcome;
use crate::team::{Record, RosterId, Team};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub roster_id: RosterId,
    pub name: String,
    pub short_name: String,
    pub division: Option<String>,
    pub division_seed: Option<u32>,
    pub league_seed: Option<u32>,
    pub seed_override: Option<u32>,
    /// Published seed. In a [`LeagueReport`] overridden teams hold their
    /// configured seed and the rest fill the free slots in league-seed order.
    pub seed: Option<u32>,
    pub record: Record,
    pub division_record: Record,
    /// Expected wins minus actual wins. Positive means the team has been
    /// unlucky.
    pub win_delta: f64,
    #[serde(flatten)]
    pub metrics: SeasonMetrics,
    pub weeks: Vec<WeekOutcome>,
}

impl TeamReport {
    pub fn from_team(team: &Team) -> Self {
        let metrics = team.metrics().clone();
        Self {
            roster_id: team.roster_id(),
            name: team.name().to_string(),
            short_name: team.short_name().to_string(),
            division: team.division().map(String::from),
            division_seed: team.division_seed(),
            league_seed: team.league_seed(),
            seed_override: team.seed_override(),
            seed: team.seed_override().or(team.league_seed()),
            record: team.record(),
            division_record: team.division_record(),
            win_delta: metrics.expected_wins - f64::from(team.wins()),
            metrics,
            weeks: team.weeks().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadCell {
    pub opponent_id: RosterId,
    pub opponent: String,
    /// Fraction of meetings won, `None` when the teams never met.
    pub fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadRow {
    pub roster_id: RosterId,
    pub short_name: String,
    pub cells: Vec<HeadToHeadCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueReport {
    pub name: String,
    pub generated_at: DateTime<Utc>,
    pub weeks_played: u32,
    /// Teams ordered by published seed; unseeded teams last, by roster id.
    pub teams: Vec<TeamReport>,
    pub head_to_head: Vec<HeadToHeadRow>,
}

impl LeagueReport {
    pub fn build(league: &League, generated_at: DateTime<Utc>) -> Self {
        let mut teams: Vec<TeamReport> = league.teams().iter().map(TeamReport::from_team).collect();
        publish_seeds(&mut teams);
        teams.sort_by_key(|t| {
            (
                t.seed.unwrap_or(u32::MAX),
                t.league_seed.unwrap_or(u32::MAX),
                t.roster_id,
            )
        });

        // Rows and columns both follow report order.
        let head_to_head = teams
            .iter()
            .filter_map(|row| league.team(row.roster_id))
            .map(|team| HeadToHeadRow {
                roster_id: team.roster_id(),
                short_name: team.short_name().to_string(),
                cells: teams
                    .iter()
                    .filter(|col| col.roster_id != team.roster_id())
                    .map(|col| HeadToHeadCell {
                        opponent_id: col.roster_id,
                        opponent: col.short_name.clone(),
                        fraction: team.head_to_head(col.roster_id),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: league.settings().name.clone(),
            generated_at,
            weeks_played: league.weeks_played(),
            teams,
            head_to_head,
        }
    }

    pub fn team(&self, roster_id: RosterId) -> Option<&TeamReport> {
        self.teams.iter().find(|t| t.roster_id == roster_id)
    }
}

/// Unique overrides within `1..=N` leave the published seeds a permutation.
fn publish_seeds(teams: &mut [TeamReport]) {
    let pinned: BTreeSet<u32> = teams.iter().filter_map(|t| t.seed_override).collect();
    let mut free = (1..).filter(|s| !pinned.contains(s));

    let mut unpinned: Vec<usize> = (0..teams.len())
        .filter(|&i| teams[i].seed_override.is_none() && teams[i].league_seed.is_some())
        .collect();
    unpinned.sort_by_key(|&i| teams[i].league_seed);
    for i in unpinned {
        teams[i].seed = free.next();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::settings::LeagueSettings;
    use crate::source::{MatchupEntry, TeamEntry};

    fn settings() -> LeagueSettings {
        LeagueSettings::new("LFL")
            .with_division("North", ["Bears", "Lions"])
            .with_division("South", ["Saints", "Jets"])
    }

    fn league() -> League {
        league_with(settings())
    }

    fn league_with(settings: LeagueSettings) -> League {
        let entries: Vec<TeamEntry> = [(1, "The Bears"), (2, "The Lions"), (3, "The Saints"), (4, "The Jets")]
            .into_iter()
            .map(|(roster_id, name)| TeamEntry {
                roster_id,
                name: name.into(),
            })
            .collect();
        let mut league = League::new(settings, &entries).unwrap();
        let m = |roster_id, points, matchup_id| MatchupEntry {
            roster_id,
            points,
            matchup_id: Some(matchup_id),
        };
        league
            .ingest_week(1, &[m(1, 120.0, 1), m(2, 90.0, 1), m(3, 110.0, 2), m(4, 80.0, 2)])
            .unwrap();
        league
            .ingest_week(2, &[m(1, 100.0, 1), m(3, 95.0, 1), m(2, 85.0, 2), m(4, 70.0, 2)])
            .unwrap();
        league
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn unseeded_report_lists_teams_by_roster_id() {
        let report = league().report_at(at());
        let ids: Vec<_> = report.teams.iter().map(|t| t.roster_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(report.teams.iter().all(|t| t.seed.is_none()));
        assert_eq!(report.weeks_played, 2);
    }

    #[test]
    fn seeded_report_follows_league_seeds() {
        let mut league = league();
        league.seed().unwrap();
        let report = league.report_at(at());
        let seeds: Vec<_> = report.teams.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![Some(1), Some(2), Some(3), Some(4)]);
        // Bears at 2-0 lead the league.
        assert_eq!(report.teams[0].roster_id, 1);
    }

    #[test]
    fn overridden_team_takes_its_slot_and_others_shift_down() {
        let mut league = league_with(settings().with_seed_override("Jets", 2));
        league.seed().unwrap();
        let report = league.report_at(at());

        // Computed order is Bears, Saints, Lions, Jets.
        assert_eq!(report.team(4).unwrap().league_seed, Some(4));
        let seeds: Vec<_> = report.teams.iter().map(|t| (t.roster_id, t.seed)).collect();
        assert_eq!(seeds, vec![(1, Some(1)), (4, Some(2)), (3, Some(3)), (2, Some(4))]);
    }

    #[test]
    fn unseeded_league_publishes_only_overrides() {
        let report = league_with(settings().with_seed_override("Lions", 1)).report_at(at());
        assert_eq!(report.team(2).unwrap().seed, Some(1));
        assert!(report.teams.iter().filter(|t| t.roster_id != 2).all(|t| t.seed.is_none()));
        assert_eq!(report.teams[0].roster_id, 2);
    }

    #[test]
    fn team_report_carries_record_and_delta() {
        let report = league().report_at(at());
        let bears = report.team(1).unwrap();
        assert_eq!(bears.record, Record { wins: 2, losses: 0 });
        assert_eq!(bears.division_record, Record { wins: 1, losses: 0 });
        assert_eq!(bears.weeks.len(), 2);
        // Ranked first both weeks: expected wins equal actual wins.
        assert!((bears.metrics.expected_wins - 2.0).abs() < 1e-12);
        assert!(bears.win_delta.abs() < 1e-12);
    }

    #[test]
    fn head_to_head_grid_marks_unplayed_pairs() {
        let report = league().report_at(at());
        let bears = report
            .head_to_head
            .iter()
            .find(|row| row.roster_id == 1)
            .unwrap();
        assert_eq!(bears.cells.len(), 3);
        let cell = |id| bears.cells.iter().find(|c| c.opponent_id == id).unwrap();
        assert_eq!(cell(2).fraction, Some(1.0));
        assert_eq!(cell(3).fraction, Some(1.0));
        assert_eq!(cell(4).fraction, None);
        assert_eq!(cell(4).opponent, "Jets");
    }

    #[test]
    fn report_serializes_with_flattened_metrics() {
        let report = league().report_at(at());
        let json = serde_json::to_value(&report).unwrap();
        let team = &json["teams"][0];
        assert!(team.get("expected_wins").is_some());
        assert!(team.get("metrics").is_none());
        assert_eq!(json["teams"][0]["record"]["wins"], 2);
        assert_eq!(json["generated_at"], "2024-11-01T12:00:00Z");
    }
}
