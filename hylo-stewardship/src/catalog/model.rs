// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::threshold::Threshold;
use crate::types::{
    Assignment, CommonRoleId, GroupId, GroupRoleId, ResponsibilityId, ResponsibilityType,
    RoleStatus,
};

/// Overall group administration and settings.
pub const ADMINISTRATION: &str = "Administration";

/// Invite and approve new members.
pub const ADD_MEMBERS: &str = "Add Members";

/// Remove members and manage membership.
pub const REMOVE_MEMBERS: &str = "Remove Members";

/// Moderate posts, comments and content.
pub const MANAGE_CONTENT: &str = "Manage Content";

/// Create and run funding rounds.
pub const MANAGE_ROUNDS: &str = "Manage Rounds";

/// Create and edit tracks.
pub const MANAGE_TRACKS: &str = "Manage Tracks";

/// A permission which can be carried by common and group roles.
///
/// Responsibilities are ordered by their id first, sets of them are deduplicated by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Responsibility {
    pub id: ResponsibilityId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResponsibilityType,

    /// Custom responsibilities may be scoped to the group which defined them.
    pub group_id: Option<GroupId>,
}

impl Responsibility {
    pub fn is_system(&self) -> bool {
        self.kind == ResponsibilityType::System
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResponsibility {
    pub title: String,
    pub description: Option<String>,
    pub kind: ResponsibilityType,
    pub group_id: Option<GroupId>,
}

impl NewResponsibility {
    /// Responsibility known to the whole platform.
    pub fn system(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            kind: ResponsibilityType::System,
            group_id: None,
        }
    }

    /// Responsibility defined by a group.
    pub fn custom(title: &str, group_id: GroupId) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            kind: ResponsibilityType::Custom,
            group_id: Some(group_id),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Platform-wide role, for example "Coordinator", "Moderator" or "Host".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommonRole {
    pub id: CommonRoleId,
    pub name: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommonRole {
    pub name: String,
    pub emoji: Option<String>,
    pub description: Option<String>,
}

impl NewCommonRole {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            emoji: None,
            description: None,
        }
    }

    pub fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = Some(emoji.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Role defined by and owned by a single group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRole {
    pub id: GroupRoleId,
    pub group_id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub active: bool,
    pub assignment: Assignment,
    pub status: RoleStatus,
    pub threshold: Threshold,

    /// Number of trust expressions required at the last evaluation.
    pub threshold_required: u32,

    /// Highest number of trust expressions any trustee had at the last evaluation.
    pub threshold_current: u32,

    /// Seeded automatically when the group was created. Holders of bootstrap roles are never
    /// revoked by the threshold evaluator.
    pub bootstrap: bool,

    /// Overrides the group setting when present.
    pub allow_self_voting: Option<bool>,
}

impl GroupRole {
    pub fn is_trust_assigned(&self) -> bool {
        self.assignment == Assignment::Trust
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroupRole {
    pub group_id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub assignment: Assignment,
    pub threshold: Threshold,
    pub bootstrap: bool,
    pub allow_self_voting: Option<bool>,
}

impl NewGroupRole {
    /// Admin-assigned role with default threshold settings.
    pub fn new(group_id: GroupId, name: &str) -> Self {
        Self {
            group_id,
            name: name.to_string(),
            description: None,
            emoji: None,
            assignment: Assignment::Admin,
            threshold: Threshold::default(),
            bootstrap: false,
            allow_self_voting: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = Some(emoji.to_string());
        self
    }

    pub fn assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = assignment;
        self
    }

    /// Trust-assigned role with the given threshold.
    pub fn trust(mut self, threshold: Threshold) -> Self {
        self.assignment = Assignment::Trust;
        self.threshold = threshold;
        self
    }

    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn allow_self_voting(mut self, allow: bool) -> Self {
        self.allow_self_voting = Some(allow);
        self
    }
}

/// Reference to either kind of role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleRef {
    Common(CommonRoleId),
    Group(GroupRoleId),
}

impl Display for RoleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleRef::Common(id) => write!(f, "common role {id}"),
            RoleRef::Group(id) => write!(f, "group role {id}"),
        }
    }
}
