// SPDX-License-Identifier: MIT OR Apache-2.0

//! `AssignmentStore` trait holding which members carry which roles.
//!
//! Group role assignments are derived from the trust ledger for trust-assigned roles and written
//! by administrators otherwise. The store itself does not check any of this, all writes are
//! expected to go through the authorization gate of the engine.
#[cfg(feature = "memory")]
pub(crate) mod memory;
mod model;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

pub use model::CommonRoleGrant;
pub use traits::AssignmentStore;
