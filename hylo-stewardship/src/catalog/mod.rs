// SPDX-License-Identifier: MIT OR Apache-2.0

//! `CatalogStore` trait for common roles, group roles and their responsibilities, together with
//! in-memory and SQLite implementations.
#[cfg(feature = "memory")]
pub(crate) mod memory;
mod model;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

pub use model::{
    ADD_MEMBERS, ADMINISTRATION, CommonRole, GroupRole, MANAGE_CONTENT, MANAGE_ROUNDS,
    MANAGE_TRACKS, NewCommonRole, NewGroupRole, NewResponsibility, REMOVE_MEMBERS, Responsibility,
    RoleRef,
};
pub use traits::CatalogStore;
