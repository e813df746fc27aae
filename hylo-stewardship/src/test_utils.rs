// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers for tests of this crate and of crates building on top of it.

/// Install a `tracing` subscriber printing logs to stdout when `RUST_LOG` is set.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// Macro to run the same test logic against all store backend implementations.
///
/// The body runs inside an open transaction of each store:
/// - In-memory store (`MemoryStore`)
/// - SQLite store (`SqliteStore`)
///
/// ## Example
///
/// ```rust
/// # use hylo_stewardship::assert_all_stores;
/// # use hylo_stewardship::groups::{Group, GroupStore};
/// # use hylo_stewardship::{GroupId, GroupMode};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// assert_all_stores!(|store| async {
///     let group = Group::new(GroupId::new(1), GroupMode::Admined);
///     assert!(store.insert_group(&group).await.unwrap());
///     assert_eq!(store.group(group.id).await.unwrap(), Some(group));
/// });
/// # }
/// ```
#[macro_export]
macro_rules! assert_all_stores {
    (|$store:ident| $test_body:expr) => {
        // Test with MemoryStore.
        {
            let memory_store = $crate::MemoryStore::new();
            let permit = $crate::traits::Transaction::begin(&memory_store)
                .await
                .unwrap();
            let $store = memory_store.clone();
            $test_body.await;
            $crate::traits::Transaction::commit(&memory_store, permit)
                .await
                .unwrap();
        }

        // Test with SqliteStore.
        {
            let sqlite_store = $crate::sqlite::SqliteStoreBuilder::new()
                .random_memory_url()
                // We're running in a single test thread and can't have more parallel connections.
                .max_connections(1)
                .build()
                .await
                .unwrap();
            let permit = $crate::traits::Transaction::begin(&sqlite_store)
                .await
                .unwrap();
            let $store = sqlite_store.clone();
            $test_body.await;
            $crate::traits::Transaction::commit(&sqlite_store, permit)
                .await
                .unwrap();
        }
    };
}

/// Macro running the same test logic against a stewardship engine on top of each store backend.
///
/// Unlike [`assert_all_stores`] no transaction is opened, the engine manages them itself.
#[macro_export]
macro_rules! assert_all_engines {
    (|$stewardship:ident| $test_body:expr) => {
        $crate::assert_all_engines!($crate::Config::default(), |$stewardship| $test_body)
    };
    ($config:expr, |$stewardship:ident| $test_body:expr) => {
        // Test with MemoryStore.
        {
            let $stewardship = $crate::Stewardship::new($crate::MemoryStore::new(), $config);
            $test_body.await;
        }

        // Test with SqliteStore.
        {
            let sqlite_store = $crate::sqlite::SqliteStoreBuilder::new()
                .random_memory_url()
                .max_connections(1)
                .build()
                .await
                .unwrap();
            let $stewardship = $crate::Stewardship::new(sqlite_store, $config);
            $test_body.await;
        }
    };
}
