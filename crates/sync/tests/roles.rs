mod common;

use common::*;
use tarubot_core::roles::{RolePlan, RolePolicy};
use tarubot_sync::roles::{resync_owner, sync_member_roles, RoleSyncStatus};

const OWNER: i64 = 77;

fn policy() -> RolePolicy {
    RolePolicy {
        member_role_id: Some(MEMBER_ROLE),
        guest_role_id: Some(GUEST_ROLE),
        free_company_id: Some(FC.to_string()),
    }
}

#[tokio::test]
async fn fc_member_gets_member_role_and_loses_guest() {
    let h = harness();
    h.roles.join(OWNER, &[GUEST_ROLE]);

    let outcome =
        sync_member_roles(&h.ctx, GUILD, OWNER, &policy(), &[None, Some(FC.to_string())]).await;

    assert_eq!(outcome.status, RoleSyncStatus::Evaluated);
    assert_eq!(
        outcome.applied,
        RolePlan {
            add: Some(MEMBER_ROLE),
            remove: Some(GUEST_ROLE)
        }
    );
    assert_eq!(
        h.roles.calls(),
        vec![
            RoleCall::Fetch(OWNER),
            RoleCall::Add(OWNER, MEMBER_ROLE),
            RoleCall::Remove(OWNER, GUEST_ROLE),
        ]
    );
}

#[tokio::test]
async fn second_run_is_a_noop() {
    let h = harness();
    h.roles.join(OWNER, &[]);
    let owned = [Some(OTHER_FC.to_string())];

    sync_member_roles(&h.ctx, GUILD, OWNER, &policy(), &owned).await;
    let before = h.roles.mutation_count();
    let outcome = sync_member_roles(&h.ctx, GUILD, OWNER, &policy(), &owned).await;

    assert_eq!(before, 1);
    assert_eq!(h.roles.mutation_count(), before);
    assert!(outcome.applied.is_noop());
    assert!(h.roles.held(OWNER).contains(&GUEST_ROLE));
}

#[tokio::test]
async fn no_roles_configured_means_no_calls() {
    let h = harness();
    h.roles.join(OWNER, &[MEMBER_ROLE]);
    let policy = RolePolicy {
        free_company_id: Some(FC.to_string()),
        ..RolePolicy::default()
    };

    let outcome = sync_member_roles(&h.ctx, GUILD, OWNER, &policy, &[]).await;

    assert_eq!(outcome.status, RoleSyncStatus::Disabled);
    assert!(h.roles.calls().is_empty());
}

#[tokio::test]
async fn absent_member_is_skipped() {
    let h = harness();

    let outcome = sync_member_roles(&h.ctx, GUILD, OWNER, &policy(), &[]).await;

    assert_eq!(outcome.status, RoleSyncStatus::NotInGuild);
    assert_eq!(h.roles.calls(), vec![RoleCall::Fetch(OWNER)]);
}

#[tokio::test]
async fn failed_add_does_not_prevent_remove() {
    let h = harness();
    h.roles.join(OWNER, &[MEMBER_ROLE]);
    h.roles.forbid(GUEST_ROLE);

    let outcome = sync_member_roles(&h.ctx, GUILD, OWNER, &policy(), &[]).await;

    assert_eq!(outcome.status, RoleSyncStatus::Evaluated);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].contains("403"));
    assert_eq!(outcome.applied.remove, Some(MEMBER_ROLE));
    assert!(h.roles.held(OWNER).is_empty());
}

#[tokio::test]
async fn same_role_for_both_is_never_removed() {
    let h = harness();
    h.roles.join(OWNER, &[MEMBER_ROLE]);
    let policy = RolePolicy {
        member_role_id: Some(MEMBER_ROLE),
        guest_role_id: Some(MEMBER_ROLE),
        free_company_id: Some(FC.to_string()),
    };

    let outcome = sync_member_roles(&h.ctx, GUILD, OWNER, &policy, &[]).await;

    assert!(outcome.applied.is_noop());
    assert_eq!(h.roles.mutation_count(), 0);
}

#[tokio::test]
async fn resync_owner_reads_config_and_characters() {
    let h = harness();
    h.store.seed_guild(Some(MEMBER_ROLE), Some(GUEST_ROLE), Some(FC));
    h.store.seed_character("1", "One", Some(OWNER), Some(FC), start());
    h.roles.join(OWNER, &[]);

    let outcome = resync_owner(&h.ctx, GUILD, OWNER).await;

    assert_eq!(outcome.applied.add, Some(MEMBER_ROLE));
    assert!(h.roles.held(OWNER).contains(&MEMBER_ROLE));
}

#[tokio::test]
async fn resync_owner_without_config_is_disabled() {
    let h = harness();
    h.roles.join(OWNER, &[]);

    let outcome = resync_owner(&h.ctx, GUILD, OWNER).await;

    assert_eq!(outcome.status, RoleSyncStatus::Disabled);
    assert!(h.roles.calls().is_empty());
}

#[tokio::test]
async fn resync_owner_reports_store_failure() {
    let h = harness();
    h.store.seed_guild(Some(MEMBER_ROLE), None, Some(FC));
    h.store.fail_on("list_characters_by_owner", 1);

    let outcome = resync_owner(&h.ctx, GUILD, OWNER).await;

    assert_eq!(outcome.status, RoleSyncStatus::Failed);
    assert_eq!(outcome.failures.len(), 1);
    assert!(h.roles.calls().is_empty());
}
