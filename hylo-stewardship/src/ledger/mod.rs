// SPDX-License-Identifier: MIT OR Apache-2.0

//! `TrustStore` trait recording trust expressions of members towards each other for a role.
#[cfg(feature = "memory")]
pub(crate) mod memory;
mod model;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(test)]
mod tests;
mod traits;

pub use model::{TrustExpression, TrustKey};
pub use traits::TrustStore;
