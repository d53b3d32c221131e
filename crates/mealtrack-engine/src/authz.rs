//! Override CRUD authorization predicates.

use uuid::Uuid;

use mealtrack_core::models::override_rule::{OverrideTarget, RuleOverride};
use mealtrack_core::models::role::Role;
use mealtrack_core::models::status::StatusPriority;

/// Whether an actor role may create an override with the given target.
///
/// Global overrides change the system floor for every user, so they
/// are admin-only, like settings mutation. Managers may target a
/// specific user or all current users; regular users never create
/// overrides.
pub fn can_create_override(role: Role, target: &OverrideTarget) -> bool {
    match role {
        Role::User => false,
        Role::Manager => !matches!(target, OverrideTarget::Global),
        Role::Admin | Role::SuperAdmin => true,
    }
}

/// Whether an actor may modify (edit or deactivate) an existing
/// override.
///
/// Admins may touch anything. Managers may only touch overrides they
/// created themselves, and only manager-priority ones — an override a
/// user inherited admin priority through is out of their reach even
/// if `created_by` matches.
pub fn can_modify_override(rule: &RuleOverride, actor_id: Uuid, role: Role) -> bool {
    match role {
        Role::Admin | Role::SuperAdmin => true,
        Role::Manager => rule.created_by == actor_id && rule.priority == StatusPriority::Manager,
        Role::User => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use mealtrack_core::models::override_rule::{
        MealScope, OverrideAction, OverrideDates,
    };

    fn rule(created_by: Uuid, priority: StatusPriority) -> RuleOverride {
        RuleOverride {
            id: Uuid::new_v4(),
            target: OverrideTarget::AllUsers,
            dates: OverrideDates::Single(NaiveDate::from_ymd_opt(2026, 1, 30).unwrap()),
            meal_scope: MealScope::Both,
            action: OverrideAction::ForceOff,
            priority,
            is_active: true,
            expires_at: None,
            created_by,
            created_by_role: Role::Manager,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_permissions_by_role_and_target() {
        let user_target = OverrideTarget::User(Uuid::new_v4());

        assert!(!can_create_override(Role::User, &user_target));
        assert!(!can_create_override(Role::User, &OverrideTarget::Global));

        assert!(can_create_override(Role::Manager, &user_target));
        assert!(can_create_override(Role::Manager, &OverrideTarget::AllUsers));
        assert!(!can_create_override(Role::Manager, &OverrideTarget::Global));

        assert!(can_create_override(Role::Admin, &OverrideTarget::Global));
        assert!(can_create_override(Role::SuperAdmin, &OverrideTarget::Global));
    }

    #[test]
    fn manager_modifies_only_own_manager_overrides() {
        let manager_id = Uuid::new_v4();
        let own = rule(manager_id, StatusPriority::Manager);
        let someone_elses = rule(Uuid::new_v4(), StatusPriority::Manager);
        let own_admin_priority = rule(manager_id, StatusPriority::Admin);

        assert!(can_modify_override(&own, manager_id, Role::Manager));
        assert!(!can_modify_override(&someone_elses, manager_id, Role::Manager));
        assert!(!can_modify_override(
            &own_admin_priority,
            manager_id,
            Role::Manager
        ));
    }

    #[test]
    fn admin_modifies_anything_user_nothing() {
        let actor = Uuid::new_v4();
        let foreign = rule(Uuid::new_v4(), StatusPriority::Manager);

        assert!(can_modify_override(&foreign, actor, Role::Admin));
        assert!(can_modify_override(&foreign, actor, Role::SuperAdmin));
        assert!(!can_modify_override(&foreign, actor, Role::User));
    }
}
