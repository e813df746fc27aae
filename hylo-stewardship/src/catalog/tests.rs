// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::assert_all_stores;
use crate::catalog::{
    ADMINISTRATION, CatalogStore, MANAGE_CONTENT, NewCommonRole, NewGroupRole, NewResponsibility,
    RoleRef,
};
use crate::threshold::Threshold;
use crate::types::{Assignment, GroupId, ResponsibilityType, RoleStatus};

#[tokio::test]
async fn responsibilities() {
    assert_all_stores!(|store| async {
        let group = GroupId::new(1);
        let other_group = GroupId::new(2);

        let administration = store
            .insert_responsibility(&NewResponsibility::system(ADMINISTRATION))
            .await
            .unwrap();
        assert!(administration.is_system());
        assert_eq!(administration.group_id, None);

        let custom = store
            .insert_responsibility(
                &NewResponsibility::custom("Water the plants", group).description("Twice a week"),
            )
            .await
            .unwrap();
        assert_eq!(custom.kind, ResponsibilityType::Custom);
        assert_ne!(custom.id, administration.id);

        let foreign = store
            .insert_responsibility(&NewResponsibility::custom("Sweep", other_group))
            .await
            .unwrap();

        assert_eq!(
            store.responsibility(custom.id).await.unwrap(),
            Some(custom.clone())
        );
        assert_eq!(
            store.system_responsibility(ADMINISTRATION).await.unwrap(),
            Some(administration.clone())
        );
        assert_eq!(
            store.system_responsibility(MANAGE_CONTENT).await.unwrap(),
            None
        );

        // Custom titles never resolve as system responsibilities.
        assert_eq!(
            store.system_responsibility("Water the plants").await.unwrap(),
            None
        );

        // Groups see system responsibilities and their own custom ones only.
        let listed = store.group_responsibilities(group).await.unwrap();
        assert_eq!(listed, vec![administration.clone(), custom.clone()]);

        let listed = store.group_responsibilities(other_group).await.unwrap();
        assert_eq!(listed, vec![administration, foreign]);
    });
}

#[tokio::test]
async fn system_titles_are_unique() {
    assert_all_stores!(|store| async {
        let administration = store
            .insert_responsibility(&NewResponsibility::system(ADMINISTRATION))
            .await
            .unwrap();
        let again = store
            .insert_responsibility(
                &NewResponsibility::system(ADMINISTRATION).description("Something else"),
            )
            .await
            .unwrap();
        assert_eq!(again, administration);

        // Custom responsibilities may reuse any title.
        let custom = store
            .insert_responsibility(&NewResponsibility::custom(ADMINISTRATION, GroupId::new(1)))
            .await
            .unwrap();
        assert_ne!(custom.id, administration.id);
        assert_eq!(
            store.system_responsibility(ADMINISTRATION).await.unwrap(),
            Some(administration)
        );
    });
}

#[tokio::test]
async fn common_roles() {
    assert_all_stores!(|store| async {
        let coordinator = store
            .insert_common_role(&NewCommonRole::new("Coordinator").emoji("🧭"))
            .await
            .unwrap();
        let moderator = store
            .insert_common_role(&NewCommonRole::new("Moderator").description("Keeps the peace"))
            .await
            .unwrap();

        assert_eq!(
            store.common_roles().await.unwrap(),
            vec![coordinator.clone(), moderator.clone()]
        );

        let mut renamed = coordinator.clone();
        renamed.name = "Steward".into();
        assert!(store.update_common_role(&renamed).await.unwrap());
        assert_eq!(
            store.common_role(coordinator.id).await.unwrap(),
            Some(renamed.clone())
        );

        // Updating an unknown role is a no-op.
        let mut unknown = renamed;
        unknown.id = (moderator.id.as_i64() + 100).into();
        assert!(!store.update_common_role(&unknown).await.unwrap());
        assert_eq!(store.common_role(unknown.id).await.unwrap(), None);
    });
}

#[tokio::test]
async fn group_roles() {
    assert_all_stores!(|store| async {
        let group = GroupId::new(7);

        let admin_role = store
            .insert_group_role(&NewGroupRole::new(group, "Treasurer").emoji("💰"))
            .await
            .unwrap();
        assert_eq!(admin_role.assignment, Assignment::Admin);
        assert_eq!(admin_role.status, RoleStatus::Vacant);
        assert!(admin_role.active);
        assert!(!admin_role.is_trust_assigned());

        let trust_role = store
            .insert_group_role(
                &NewGroupRole::new(group, "Facilitator")
                    .trust(Threshold::Percent(40))
                    .allow_self_voting(false),
            )
            .await
            .unwrap();
        assert!(trust_role.is_trust_assigned());
        assert_eq!(trust_role.threshold, Threshold::Percent(40));
        assert_eq!(trust_role.allow_self_voting, Some(false));

        // Roles of other groups are not listed.
        store
            .insert_group_role(&NewGroupRole::new(GroupId::new(8), "Host"))
            .await
            .unwrap();

        assert_eq!(
            store.group_roles(group).await.unwrap(),
            vec![admin_role.clone(), trust_role.clone()]
        );

        let mut updated = trust_role.clone();
        updated.status = RoleStatus::Active;
        updated.threshold_required = 3;
        updated.threshold_current = 4;
        updated.active = false;
        assert!(store.update_group_role(&updated).await.unwrap());
        assert_eq!(
            store.group_role(trust_role.id).await.unwrap(),
            Some(updated)
        );
    });
}

#[tokio::test]
async fn attach_and_detach_responsibilities() {
    assert_all_stores!(|store| async {
        let group = GroupId::new(3);

        let administration = store
            .insert_responsibility(&NewResponsibility::system(ADMINISTRATION))
            .await
            .unwrap();
        let content = store
            .insert_responsibility(&NewResponsibility::system(MANAGE_CONTENT))
            .await
            .unwrap();

        let common = store
            .insert_common_role(&NewCommonRole::new("Coordinator"))
            .await
            .unwrap();
        let role = store
            .insert_group_role(&NewGroupRole::new(group, "Editor"))
            .await
            .unwrap();

        let common_ref = RoleRef::Common(common.id);
        let group_ref = RoleRef::Group(role.id);

        assert!(
            store
                .attach_responsibility(group_ref, content.id)
                .await
                .unwrap()
        );
        assert!(
            store
                .attach_responsibility(group_ref, administration.id)
                .await
                .unwrap()
        );

        // Attaching twice does not create a second entry.
        assert!(
            !store
                .attach_responsibility(group_ref, content.id)
                .await
                .unwrap()
        );

        assert!(
            store
                .attach_responsibility(common_ref, administration.id)
                .await
                .unwrap()
        );

        assert_eq!(
            store.role_responsibilities(group_ref).await.unwrap(),
            vec![administration.clone(), content.clone()]
        );
        assert_eq!(
            store.role_responsibilities(common_ref).await.unwrap(),
            vec![administration.clone()]
        );

        assert!(
            store
                .detach_responsibility(group_ref, administration.id)
                .await
                .unwrap()
        );
        assert!(
            !store
                .detach_responsibility(group_ref, administration.id)
                .await
                .unwrap()
        );

        assert_eq!(
            store.role_responsibilities(group_ref).await.unwrap(),
            vec![content]
        );

        // Detaching from the group role leaves the common role untouched.
        assert_eq!(
            store.role_responsibilities(common_ref).await.unwrap(),
            vec![administration]
        );
    });
}
