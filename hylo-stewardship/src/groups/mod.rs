// SPDX-License-Identifier: MIT OR Apache-2.0

//! `GroupStore` trait for groups, their settings and memberships.
#[cfg(feature = "memory")]
pub(crate) mod memory;
mod model;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

pub use model::{Group, GroupSettings, Membership};
pub use traits::GroupStore;
