// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::assert_all_stores;
use crate::groups::{Group, GroupSettings, GroupStore, Membership};
use crate::types::{GroupId, GroupMode, UserId};

#[tokio::test]
async fn insert_and_update_groups() {
    assert_all_stores!(|store| async {
        let group = Group::new(GroupId::new(1), GroupMode::SelfStewarded).settings(GroupSettings {
            allow_self_voting: false,
            min_member_age_days: 14,
            trust_rate_limit_hours: 24,
        });

        assert!(store.insert_group(&group).await.unwrap());
        assert_eq!(store.group(group.id).await.unwrap(), Some(group.clone()));

        // Inserting the same id again keeps the first version.
        let duplicate = Group::new(group.id, GroupMode::Admined);
        assert!(!store.insert_group(&duplicate).await.unwrap());
        assert_eq!(store.group(group.id).await.unwrap(), Some(group.clone()));

        let mut updated = group.clone();
        updated.mode = GroupMode::Admined;
        updated.active = false;
        updated.settings = GroupSettings::default();
        assert!(store.update_group(&updated).await.unwrap());
        assert_eq!(store.group(group.id).await.unwrap(), Some(updated));

        let unknown = Group::new(GroupId::new(99), GroupMode::Admined);
        assert!(!store.update_group(&unknown).await.unwrap());
        assert_eq!(store.group(unknown.id).await.unwrap(), None);
    });
}

#[tokio::test]
async fn memberships() {
    assert_all_stores!(|store| async {
        let group = GroupId::new(1);
        let other_group = GroupId::new(2);
        let alice = UserId::new(10);
        let bob = UserId::new(11);
        let carol = UserId::new(12);

        for user in [carol, alice, bob] {
            store
                .upsert_membership(&Membership::new(group, user, 1_000))
                .await
                .unwrap();
        }
        store
            .upsert_membership(&Membership::new(other_group, alice, 2_000))
            .await
            .unwrap();

        assert_eq!(
            store.active_members(group).await.unwrap(),
            vec![alice, bob, carol]
        );
        assert_eq!(store.active_member_count(group).await.unwrap(), 3);
        assert_eq!(store.active_member_count(other_group).await.unwrap(), 1);

        assert!(store.deactivate_membership(group, bob).await.unwrap());
        assert!(!store.deactivate_membership(group, bob).await.unwrap());
        assert!(!store.deactivate_membership(other_group, carol).await.unwrap());

        assert_eq!(store.active_members(group).await.unwrap(), vec![alice, carol]);
        assert_eq!(store.active_member_count(group).await.unwrap(), 2);

        let membership = store.membership(group, bob).await.unwrap().unwrap();
        assert!(!membership.active);
        assert_eq!(membership.joined_at, 1_000);

        // Rejoining overwrites the old membership.
        let mut rejoined = Membership::new(group, bob, 5_000);
        rejoined.nav_order = Some(3);
        store.upsert_membership(&rejoined).await.unwrap();
        assert_eq!(store.membership(group, bob).await.unwrap(), Some(rejoined));
        assert_eq!(store.active_member_count(group).await.unwrap(), 3);

        assert_eq!(store.membership(other_group, bob).await.unwrap(), None);
    });
}
