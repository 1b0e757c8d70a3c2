// Static league metadata supplied by configuration loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// League name, custom seed overrides and division membership. Teams are
/// referred to by short name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub name: String,
    /// Short name to published seed.
    #[serde(default)]
    pub seed_overrides: BTreeMap<String, u32>,
    /// Division name to member short names.
    #[serde(default)]
    pub divisions: BTreeMap<String, Vec<String>>,
}

impl LeagueSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_division<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> Self {
        self.divisions
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_seed_override(mut self, short_name: impl Into<String>, seed: u32) -> Self {
        self.seed_overrides.insert(short_name.into(), seed);
        self
    }

    /// Division whose member list contains `short_name`.
    pub fn division_of(&self, short_name: &str) -> Option<&str> {
        self.divisions
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == short_name))
            .map(|(name, _)| name.as_str())
    }

    pub fn seed_override(&self, short_name: &str) -> Option<u32> {
        self.seed_overrides.get(short_name).copied()
    }
}
