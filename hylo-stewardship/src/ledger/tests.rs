// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use crate::assert_all_stores;
use crate::ledger::{TrustKey, TrustStore};
use crate::types::{GroupId, GroupRoleId, UserId};

const GROUP: GroupId = GroupId::new(1);
const ROLE: GroupRoleId = GroupRoleId::new(100);
const OTHER_ROLE: GroupRoleId = GroupRoleId::new(101);

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);
const CAROL: UserId = UserId::new(3);
const DAVE: UserId = UserId::new(4);

#[tokio::test]
async fn insert_and_delete_expressions() {
    assert_all_stores!(|store| async {
        let key = TrustKey::new(GROUP, ROLE, ALICE, DAVE);

        assert!(store.insert_trust_expression(&key, 50).await.unwrap());

        // The same tuple can only be stored once.
        assert!(!store.insert_trust_expression(&key, 60).await.unwrap());

        let expressions = store.trust_expressions(ROLE).await.unwrap();
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].key(), key);
        assert_eq!(expressions[0].created_at, 50);

        assert!(store.delete_trust_expression(&key).await.unwrap());
        assert!(!store.delete_trust_expression(&key).await.unwrap());
        assert!(store.trust_expressions(ROLE).await.unwrap().is_empty());

        // Withdrawn trust can be expressed again.
        assert!(store.insert_trust_expression(&key, 70).await.unwrap());
    });
}

#[tokio::test]
async fn counts_exclude_self_votes() {
    assert_all_stores!(|store| async {
        for key in [
            TrustKey::new(GROUP, ROLE, ALICE, DAVE),
            TrustKey::new(GROUP, ROLE, BOB, DAVE),
            TrustKey::new(GROUP, ROLE, DAVE, DAVE),
            TrustKey::new(GROUP, ROLE, CAROL, CAROL),
            TrustKey::new(GROUP, ROLE, DAVE, BOB),
            TrustKey::new(GROUP, OTHER_ROLE, CAROL, DAVE),
        ] {
            assert!(store.insert_trust_expression(&key, 0).await.unwrap());
        }

        assert_eq!(store.trust_count(ROLE, DAVE).await.unwrap(), 2);
        assert_eq!(store.trust_count(ROLE, CAROL).await.unwrap(), 0);
        assert_eq!(store.trust_count(OTHER_ROLE, DAVE).await.unwrap(), 1);

        assert_eq!(
            store.trust_counts(ROLE).await.unwrap(),
            BTreeMap::from([(BOB, 1), (DAVE, 2)])
        );
        assert_eq!(store.volunteers(ROLE).await.unwrap(), vec![CAROL, DAVE]);
        assert!(store.volunteers(OTHER_ROLE).await.unwrap().is_empty());

        let given = store.trust_given_by(ROLE, DAVE).await.unwrap();
        assert_eq!(
            given.iter().map(|expression| expression.trustee_id).collect::<Vec<_>>(),
            vec![DAVE, BOB]
        );
    });
}

#[tokio::test]
async fn delete_member_trust() {
    assert_all_stores!(|store| async {
        let other_group = GroupId::new(2);
        let other_group_role = GroupRoleId::new(200);

        for key in [
            TrustKey::new(GROUP, ROLE, ALICE, DAVE),
            TrustKey::new(GROUP, ROLE, DAVE, BOB),
            TrustKey::new(GROUP, OTHER_ROLE, BOB, CAROL),
            TrustKey::new(other_group, other_group_role, ALICE, DAVE),
        ] {
            assert!(store.insert_trust_expression(&key, 0).await.unwrap());
        }

        assert_eq!(store.delete_member_trust(GROUP, DAVE).await.unwrap(), 2);
        assert_eq!(store.delete_member_trust(GROUP, DAVE).await.unwrap(), 0);

        assert!(store.trust_expressions(ROLE).await.unwrap().is_empty());
        assert_eq!(store.trust_expressions(OTHER_ROLE).await.unwrap().len(), 1);

        // Trust in other groups is kept.
        assert_eq!(
            store.trust_count(other_group_role, DAVE).await.unwrap(),
            1
        );
    });
}

#[tokio::test]
async fn trust_changes_outlive_expressions() {
    assert_all_stores!(|store| async {
        let key = TrustKey::new(GROUP, ROLE, ALICE, BOB);
        assert_eq!(store.last_trust_change(&key).await.unwrap(), None);

        store.insert_trust_expression(&key, 100).await.unwrap();
        store.record_trust_change(&key, 100).await.unwrap();
        assert_eq!(store.last_trust_change(&key).await.unwrap(), Some(100));

        store.delete_trust_expression(&key).await.unwrap();
        store.record_trust_change(&key, 250).await.unwrap();
        assert_eq!(store.last_trust_change(&key).await.unwrap(), Some(250));

        // Leaving members don't reset the window either.
        store.delete_member_trust(GROUP, ALICE).await.unwrap();
        assert_eq!(store.last_trust_change(&key).await.unwrap(), Some(250));

        let other = TrustKey::new(GROUP, OTHER_ROLE, ALICE, BOB);
        assert_eq!(store.last_trust_change(&other).await.unwrap(), None);
    });
}
