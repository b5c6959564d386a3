//! Member/guest role policy.
//!
//! A guild may configure a "member" role, a "guest" role, and the Free
//! Company its members are expected to belong to. An owner holding at least
//! one character in that Free Company should carry the member role and not
//! the guest role; everyone else the reverse. This module only decides; the
//! sync crate applies the decision through a role provider.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{LodestoneId, Snowflake};

/// The role-relevant slice of a guild's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePolicy {
    pub member_role_id: Option<Snowflake>,
    pub guest_role_id: Option<Snowflake>,
    pub free_company_id: Option<LodestoneId>,
}

impl RolePolicy {
    /// Role management is disabled unless at least one role is configured.
    pub fn manages_roles(&self) -> bool {
        self.member_role_id.is_some() || self.guest_role_id.is_some()
    }

    /// Whether any of the owner's characters sits in the configured FC.
    ///
    /// `owned_fc_ids` holds the FC reference of each owned character.
    pub fn is_configured_member(&self, owned_fc_ids: &[Option<LodestoneId>]) -> bool {
        match &self.free_company_id {
            Some(fc_id) => owned_fc_ids.iter().any(|owned| owned.as_ref() == Some(fc_id)),
            None => false,
        }
    }

    /// Compute the minimal role delta for one owner.
    pub fn plan(
        &self,
        owned_fc_ids: &[Option<LodestoneId>],
        held: &HashSet<Snowflake>,
    ) -> RolePlan {
        if !self.manages_roles() {
            return RolePlan::default();
        }

        let (target_add, target_remove) = if self.is_configured_member(owned_fc_ids) {
            (self.member_role_id, self.guest_role_id)
        } else {
            (self.guest_role_id, self.member_role_id)
        };

        let add = target_add.filter(|role| !held.contains(role));
        let remove = target_remove
            .filter(|role| Some(*role) != target_add)
            .filter(|role| held.contains(role));

        RolePlan { add, remove }
    }
}

/// Roles to grant and revoke. `None` means nothing to do on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RolePlan {
    pub add: Option<Snowflake>,
    pub remove: Option<Snowflake>,
}

impl RolePlan {
    pub fn is_noop(&self) -> bool {
        self.add.is_none() && self.remove.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBER: Snowflake = 100;
    const GUEST: Snowflake = 200;
    const FC: &str = "9231253336202687179";

    fn policy() -> RolePolicy {
        RolePolicy {
            member_role_id: Some(MEMBER),
            guest_role_id: Some(GUEST),
            free_company_id: Some(FC.to_string()),
        }
    }

    fn held(roles: &[Snowflake]) -> HashSet<Snowflake> {
        roles.iter().copied().collect()
    }

    #[test]
    fn owner_without_fc_character_gets_guest() {
        let plan = policy().plan(&[None, Some("1".to_string())], &held(&[MEMBER]));
        assert_eq!(
            plan,
            RolePlan {
                add: Some(GUEST),
                remove: Some(MEMBER)
            }
        );
    }

    #[test]
    fn owner_with_fc_character_gets_member() {
        let plan = policy().plan(&[None, Some(FC.to_string())], &held(&[GUEST]));
        assert_eq!(
            plan,
            RolePlan {
                add: Some(MEMBER),
                remove: Some(GUEST)
            }
        );
    }

    #[test]
    fn owner_with_no_characters_gets_guest() {
        let plan = policy().plan(&[], &held(&[]));
        assert_eq!(plan.add, Some(GUEST));
        assert_eq!(plan.remove, None);
    }

    #[test]
    fn matching_state_is_noop() {
        assert!(policy().plan(&[Some(FC.to_string())], &held(&[MEMBER])).is_noop());
        assert!(policy().plan(&[], &held(&[GUEST])).is_noop());
    }

    #[test]
    fn no_roles_configured_is_noop() {
        let policy = RolePolicy {
            free_company_id: Some(FC.to_string()),
            ..RolePolicy::default()
        };
        assert!(!policy.manages_roles());
        assert!(policy.plan(&[Some(FC.to_string())], &held(&[MEMBER, GUEST])).is_noop());
    }

    #[test]
    fn unset_fc_means_everyone_is_guest() {
        let policy = RolePolicy {
            free_company_id: None,
            ..policy()
        };
        let plan = policy.plan(&[Some(FC.to_string())], &held(&[MEMBER]));
        assert_eq!(plan.add, Some(GUEST));
        assert_eq!(plan.remove, Some(MEMBER));
    }

    #[test]
    fn only_guest_role_configured() {
        let policy = RolePolicy {
            member_role_id: None,
            ..policy()
        };
        // Member: nothing to add, guest is the remove target.
        let plan = policy.plan(&[Some(FC.to_string())], &held(&[GUEST]));
        assert_eq!(plan.add, None);
        assert_eq!(plan.remove, Some(GUEST));
    }

    #[test]
    fn same_role_for_both_is_never_removed() {
        let policy = RolePolicy {
            member_role_id: Some(MEMBER),
            guest_role_id: Some(MEMBER),
            free_company_id: Some(FC.to_string()),
        };
        let plan = policy.plan(&[], &held(&[MEMBER]));
        assert!(plan.is_noop());
    }
}
