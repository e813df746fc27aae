// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::threshold::Threshold;

/// Configuration of a stewardship engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Threshold given to roles the engine creates itself, for example when seeding a
    /// self-stewarded group.
    pub(crate) default_threshold: Threshold,

    /// Once a group has this many active members the bootstrap flag of its roles is cleared and
    /// early holders need to be backed by trust like everybody else.
    ///
    /// Bootstrap roles stay bootstrap forever when this is not set.
    pub(crate) bootstrap_retire_at_members: Option<u32>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_threshold(mut self, threshold: Threshold) -> Self {
        self.default_threshold = threshold;
        self
    }

    pub fn bootstrap_retire_at_members(mut self, members: u32) -> Self {
        self.bootstrap_retire_at_members = Some(members);
        self
    }

    pub(crate) fn retires_bootstrap(&self, active_members: u32) -> bool {
        self.bootstrap_retire_at_members
            .is_some_and(|limit| active_members >= limit)
    }
}

#[cfg(test)]
mod tests {
    use crate::threshold::Threshold;

    use super::Config;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "bootstrap_retire_at_members": 3 }"#).unwrap();
        assert_eq!(config.default_threshold, Threshold::Scaled);
        assert!(!config.retires_bootstrap(2));
        assert!(config.retires_bootstrap(3));

        let config: Config = serde_json::from_str(r#"{ "default_threshold": { "count": 5 } }"#).unwrap();
        assert_eq!(config, Config::new().default_threshold(Threshold::Count(5)));
        assert!(!config.retires_bootstrap(1000));
    }
}
