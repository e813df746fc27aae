// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifiers and small enumerations shared by all stores.
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of a group, assigned by the platform.
    GroupId
);

identifier!(
    /// Identifier of a platform user.
    UserId
);

identifier!(
    /// Identifier of a role owned by a single group.
    GroupRoleId
);

identifier!(
    /// Identifier of a platform-wide role.
    CommonRoleId
);

identifier!(
    /// Identifier of a responsibility catalog entry.
    ResponsibilityId
);

identifier!(TrustExpressionId);

/// Governance mode of a group.
///
/// In `Admined` groups roles are handed out by administrators, in `SelfStewarded` groups they are
/// granted by peer trust expressions reaching a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    Admined,
    SelfStewarded,
}

/// How holders of a group role are determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// Holders are granted and revoked by an administrator.
    Admin,

    /// Holders are derived from trust expressions by the threshold evaluator.
    Trust,
}

/// Cached state of a trust-assigned role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleStatus {
    /// No counted trust was expressed for anyone.
    Vacant,

    /// Trust was expressed but nobody reached the threshold yet.
    Pending,

    /// At least one member holds the role.
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsibilityType {
    /// Built-in responsibility known to the platform, for example "Administration".
    System,

    /// Responsibility defined by a group.
    Custom,
}

#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

impl ParseVariantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseVariantError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseVariantError::new($kind, value)),
                }
            }
        }
    };
}

string_enum!(GroupMode, "group mode", {
    Admined => "admined",
    SelfStewarded => "self_stewarded",
});

string_enum!(Assignment, "assignment", {
    Admin => "admin",
    Trust => "trust",
});

string_enum!(RoleStatus, "role status", {
    Vacant => "vacant",
    Pending => "pending",
    Active => "active",
});

string_enum!(ResponsibilityType, "responsibility type", {
    System => "system",
    Custom => "custom",
});

/// Current time in seconds since the unix epoch.
pub(crate) fn now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{Assignment, GroupMode, RoleStatus};

    #[test]
    fn string_representations() {
        assert_eq!(GroupMode::SelfStewarded.as_str(), "self_stewarded");
        assert_eq!("admined".parse::<GroupMode>().unwrap(), GroupMode::Admined);
        assert_eq!("trust".parse::<Assignment>().unwrap(), Assignment::Trust);
        assert_eq!(RoleStatus::Pending.to_string(), "pending");
        assert!("contested".parse::<RoleStatus>().is_err());
    }

    #[test]
    fn serde_uses_database_names() {
        let json = serde_json::to_string(&GroupMode::SelfStewarded).unwrap();
        assert_eq!(json, "\"self_stewarded\"");
    }
}
