// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::assert_all_stores;
use crate::assignments::{AssignmentStore, CommonRoleGrant};
use crate::types::{CommonRoleId, GroupId, GroupRoleId, UserId};

const GROUP: GroupId = GroupId::new(1);
const OTHER_GROUP: GroupId = GroupId::new(2);

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

#[tokio::test]
async fn group_role_assignments() {
    assert_all_stores!(|store| async {
        let editor = GroupRoleId::new(10);
        let host = GroupRoleId::new(11);
        let foreign = GroupRoleId::new(20);

        assert!(store.assign_group_role(GROUP, editor, BOB).await.unwrap());
        assert!(store.assign_group_role(GROUP, editor, ALICE).await.unwrap());
        assert!(store.assign_group_role(GROUP, host, ALICE).await.unwrap());
        assert!(
            store
                .assign_group_role(OTHER_GROUP, foreign, ALICE)
                .await
                .unwrap()
        );

        // Assigning twice is safe.
        assert!(!store.assign_group_role(GROUP, editor, BOB).await.unwrap());

        assert_eq!(store.role_holders(editor).await.unwrap(), vec![ALICE, BOB]);
        assert_eq!(
            store.assigned_group_roles(GROUP, ALICE).await.unwrap(),
            vec![editor, host]
        );

        assert!(store.unassign_group_role(GROUP, editor, BOB).await.unwrap());
        assert!(!store.unassign_group_role(GROUP, editor, BOB).await.unwrap());
        assert_eq!(store.role_holders(editor).await.unwrap(), vec![ALICE]);

        assert_eq!(store.unassign_member(GROUP, ALICE).await.unwrap(), 2);
        assert!(
            store
                .assigned_group_roles(GROUP, ALICE)
                .await
                .unwrap()
                .is_empty()
        );

        // Assignments in other groups stay.
        assert_eq!(
            store.assigned_group_roles(OTHER_GROUP, ALICE).await.unwrap(),
            vec![foreign]
        );
    });
}

#[tokio::test]
async fn common_role_grants() {
    assert_all_stores!(|store| async {
        let coordinator = CommonRoleId::new(1);
        let moderator = CommonRoleId::new(2);

        let platform = CommonRoleGrant::platform(coordinator, ALICE);
        let scoped = CommonRoleGrant::scoped(coordinator, ALICE, GROUP);
        let other = CommonRoleGrant::scoped(moderator, ALICE, OTHER_GROUP);

        assert!(store.grant_common_role(&platform).await.unwrap());
        assert!(store.grant_common_role(&scoped).await.unwrap());
        assert!(store.grant_common_role(&other).await.unwrap());

        // A missing scope is a value of its own, granting the platform-wide role twice is a no-op.
        assert!(!store.grant_common_role(&platform).await.unwrap());

        assert_eq!(
            store.common_role_grants(ALICE).await.unwrap(),
            vec![platform, scoped, other]
        );
        assert!(store.common_role_grants(BOB).await.unwrap().is_empty());

        assert!(store.revoke_common_role(&platform).await.unwrap());
        assert!(!store.revoke_common_role(&platform).await.unwrap());
        assert_eq!(
            store.common_role_grants(ALICE).await.unwrap(),
            vec![scoped, other]
        );

        assert!(scoped.applies_to(GROUP));
        assert!(!scoped.applies_to(OTHER_GROUP));
        assert!(platform.applies_to(OTHER_GROUP));
    });
}
