// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role based responsibility resolution and trust expressions for community groups.
//!
//! Members of a group carry responsibilities ("Administration", "Manage Content", ..) through
//! roles. Common roles are known to the whole platform, group roles are defined by a single group.
//! In admined groups administrators hand out roles, in self-stewarded groups members express trust
//! in each other and a role is held by everyone whose trust reaches the threshold of the role.
//!
//! The [`Stewardship`] engine combines
//!
//! - the role catalog ([`catalog`])
//! - groups and memberships ([`groups`])
//! - the trust ledger ([`ledger`])
//! - the threshold evaluator ([`Threshold`], [`Evaluation`])
//! - role assignments ([`assignments`])
//!
//! and answers which responsibilities a user has inside a group with [`Stewardship::resolve`] and
//! [`Stewardship::has_responsibility`].
//!
//! All state lives in a store implementing the store traits of each module. An in-memory store
//! and a SQLite store are provided behind the `memory` and `sqlite` features.
pub mod assignments;
pub mod catalog;
mod config;
mod error;
pub mod groups;
pub mod ledger;
#[cfg(feature = "memory")]
mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod stewardship;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
mod threshold;
pub mod traits;
mod types;

pub use catalog::{CommonRole, GroupRole, NewCommonRole, NewGroupRole, NewResponsibility, RoleRef};
pub use config::Config;
pub use error::StewardshipError;
#[cfg(feature = "memory")]
pub use memory::{MemoryPermit, MemoryStore};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder};
pub use stewardship::{
    Candidate, Stewardship, StewardshipStore, VoteOutcome, WithdrawalOutcome,
};
pub use threshold::{Decision, Evaluation, Threshold, role_status};
pub use types::{
    Assignment, CommonRoleId, GroupId, GroupMode, GroupRoleId, ParseVariantError,
    ResponsibilityId, ResponsibilityType, RoleStatus, TrustExpressionId, UserId,
};
