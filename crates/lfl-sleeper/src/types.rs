// Sleeper API payloads and their conversion to a league snapshot.

use std::collections::{BTreeMap, HashMap};

use lfl_core::{LeagueSnapshot, MatchupEntry, RosterId, TeamEntry, WeekMatchups};
use serde::Deserialize;
use tracing::warn;

// ---------------------------------------------------------------------------
// Raw payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

impl SleeperUser {
    /// Custom team name when set, else the owner's display name.
    pub fn team_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.team_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .or(self.display_name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    pub roster_id: RosterId,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperState {
    pub week: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperMatchup {
    pub roster_id: RosterId,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub matchup_id: Option<u32>,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Weeks considered complete: through `through_week` when configured,
/// otherwise every week before the current one.
pub fn completed_weeks(current_week: u32, through_week: Option<u32>) -> std::ops::RangeInclusive<u32> {
    1..=through_week.unwrap_or(current_week.saturating_sub(1))
}

/// Build a snapshot from raw payloads.
///
/// Rosters without an owner are left out, along with their matchup
/// entries. An opponent left alone in its matchup by that is treated as
/// having no game that week.
pub fn to_snapshot(
    users: &[SleeperUser],
    rosters: &[SleeperRoster],
    weeks: Vec<(u32, Vec<SleeperMatchup>)>,
) -> LeagueSnapshot {
    let users_by_id: HashMap<&str, &SleeperUser> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut teams = Vec::with_capacity(rosters.len());
    for roster in rosters {
        let Some(owner) = roster.owner_id.as_deref() else {
            warn!(roster_id = roster.roster_id, "roster has no owner, skipping");
            continue;
        };
        let name = match users_by_id.get(owner).and_then(|u| u.team_name()) {
            Some(name) => name.to_string(),
            None => {
                warn!(roster_id = roster.roster_id, owner, "owner not found among league users");
                format!("Roster {}", roster.roster_id)
            }
        };
        teams.push(TeamEntry {
            roster_id: roster.roster_id,
            name,
        });
    }

    let weeks = weeks
        .into_iter()
        .map(|(week, matchups)| WeekMatchups {
            week,
            matchups: week_entries(week, &teams, matchups),
        })
        .collect();

    LeagueSnapshot { teams, weeks }
}

fn week_entries(week: u32, teams: &[TeamEntry], matchups: Vec<SleeperMatchup>) -> Vec<MatchupEntry> {
    let mut entries: Vec<MatchupEntry> = matchups
        .into_iter()
        .filter(|m| teams.iter().any(|t| t.roster_id == m.roster_id))
        .map(|m| MatchupEntry {
            roster_id: m.roster_id,
            points: m.points.unwrap_or(0.0),
            matchup_id: m.matchup_id,
        })
        .collect();

    let mut sizes: BTreeMap<u32, usize> = BTreeMap::new();
    for id in entries.iter().filter_map(|e| e.matchup_id) {
        *sizes.entry(id).or_default() += 1;
    }
    for entry in &mut entries {
        if entry.matchup_id.is_some_and(|id| sizes[&id] == 1) {
            warn!(week, roster_id = entry.roster_id, "opponent was dropped, clearing matchup");
            entry.matchup_id = None;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, display: &str, team: Option<&str>) -> SleeperUser {
        SleeperUser {
            user_id: id.into(),
            display_name: Some(display.into()),
            metadata: Some(UserMetadata {
                team_name: team.map(String::from),
            }),
        }
    }

    #[test]
    fn team_name_falls_back_to_display_name() {
        assert_eq!(user("1", "bob", Some("The Bears")).team_name(), Some("The Bears"));
        assert_eq!(user("1", "bob", None).team_name(), Some("bob"));
        assert_eq!(user("1", "bob", Some("  ")).team_name(), Some("bob"));
    }

    #[test]
    fn user_payload_tolerates_null_metadata() {
        let u: SleeperUser =
            serde_json::from_str(r#"{ "user_id": "7", "display_name": "amy", "metadata": null }"#).unwrap();
        assert_eq!(u.team_name(), Some("amy"));
    }

    #[test]
    fn completed_weeks_stop_before_current_week() {
        assert_eq!(completed_weeks(5, None), 1..=4);
        assert_eq!(completed_weeks(5, Some(2)), 1..=2);
        assert!(completed_weeks(1, None).is_empty());
        assert!(completed_weeks(0, None).is_empty());
    }

    #[test]
    fn ownerless_rosters_and_their_games_are_dropped() {
        let users = vec![user("a", "amy", Some("The Bears")), user("b", "bob", None), user("c", "cat", None)];
        let rosters = vec![
            SleeperRoster { roster_id: 1, owner_id: Some("a".into()) },
            SleeperRoster { roster_id: 2, owner_id: Some("b".into()) },
            SleeperRoster { roster_id: 3, owner_id: Some("c".into()) },
            SleeperRoster { roster_id: 4, owner_id: None },
        ];
        let matchups = vec![
            SleeperMatchup { roster_id: 1, points: Some(100.0), matchup_id: Some(1) },
            SleeperMatchup { roster_id: 2, points: Some(90.0), matchup_id: Some(1) },
            SleeperMatchup { roster_id: 3, points: Some(80.0), matchup_id: Some(2) },
            SleeperMatchup { roster_id: 4, points: None, matchup_id: Some(2) },
        ];

        let snapshot = to_snapshot(&users, &rosters, vec![(1, matchups)]);
        let names: Vec<_> = snapshot.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["The Bears", "bob", "cat"]);

        let week = &snapshot.weeks[0];
        assert_eq!(week.matchups.len(), 3);
        assert_eq!(week.matchups[0].matchup_id, Some(1));
        assert_eq!(week.matchups[2].roster_id, 3);
        assert_eq!(week.matchups[2].matchup_id, None);
    }

    #[test]
    fn unknown_owner_gets_placeholder_name() {
        let rosters = vec![SleeperRoster { roster_id: 9, owner_id: Some("ghost".into()) }];
        let snapshot = to_snapshot(&[], &rosters, Vec::new());
        assert_eq!(snapshot.teams[0].name, "Roster 9");
    }
}
