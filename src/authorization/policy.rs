//! Access decisions for task and user operations.
//!
//! Two independent mechanisms compose additively:
//! - ownership: a caller may always view/edit a task they created or are
//!   assigned to, and their own user profile
//! - role flags: administrative breadth over everyone's resources
//!
//! Ownership is checked first and short-circuits to Allow; it never
//! subtracts from what the flags grant. A Deny is a plain value; callers
//! turn it into their access-denied error, nothing here panics or raises.

use uuid::Uuid;

use crate::authorization::permissions::{Permission, PermissionSet};
use crate::task_item::TaskItem;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    View,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    View,
    Edit,
    ChangeRole,
    Deactivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingPermission(Permission),
}

impl Decision {
    fn flag(permissions: &PermissionSet, required: Permission) -> Decision {
        if permissions.grants(required) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::MissingPermission(required))
        }
    }

    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// Convert to a Result for `?`-style use at call sites.
    pub fn check(self) -> Result<(), DenyReason> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(reason),
        }
    }
}

/// Can `caller_id` perform `action` on `task`?
pub fn check_task(
    permissions: &PermissionSet,
    caller_id: Uuid,
    action: TaskAction,
    task: &TaskItem,
) -> Decision {
    let owns = task.created_by == caller_id || task.is_assigned_to(caller_id);
    match action {
        TaskAction::View => {
            if owns {
                return Decision::Allow;
            }
            Decision::flag(permissions, Permission::ViewAllTasks)
        }
        TaskAction::Edit => {
            if owns {
                return Decision::Allow;
            }
            Decision::flag(permissions, Permission::EditAllTasks)
        }
        // Deletion is not an assignee privilege: only the creator or a
        // delete-flag holder may remove a task.
        TaskAction::Delete => {
            if task.created_by == caller_id {
                return Decision::Allow;
            }
            Decision::flag(permissions, Permission::DeleteTasks)
        }
    }
}

pub fn check_task_create(permissions: &PermissionSet) -> Decision {
    Decision::flag(permissions, Permission::CreateTasks)
}

/// Gate for replacing a task's assignment set. Assigning only yourself (or
/// nobody) is personal scope; any other target set needs the assign flag.
pub fn check_assignment(
    permissions: &PermissionSet,
    caller_id: Uuid,
    assignees: &[Uuid],
) -> Decision {
    if assignees.iter().all(|id| *id == caller_id) {
        return Decision::Allow;
    }
    Decision::flag(permissions, Permission::AssignTasks)
}

/// Can `caller_id` perform `action` on the `target` user record?
pub fn check_user(
    permissions: &PermissionSet,
    caller_id: Uuid,
    action: UserAction,
    target: &User,
) -> Decision {
    let is_self = target.id == caller_id;
    match action {
        UserAction::View => {
            if is_self {
                return Decision::Allow;
            }
            Decision::flag(permissions, Permission::ViewAllUsers)
        }
        UserAction::Edit => {
            if is_self {
                return Decision::Allow;
            }
            Decision::flag(permissions, Permission::EditUsers)
        }
        // Role reassignment is never an ownership grant, even on yourself.
        UserAction::ChangeRole => Decision::flag(permissions, Permission::ManageRoles),
        UserAction::Deactivate => Decision::flag(permissions, Permission::DeleteUsers),
    }
}

pub fn check_user_create(permissions: &PermissionSet) -> Decision {
    Decision::flag(permissions, Permission::CreateUsers)
}

pub fn check_user_list(permissions: &PermissionSet) -> Decision {
    Decision::flag(permissions, Permission::ViewAllUsers)
}

pub fn check_manage_roles(permissions: &PermissionSet) -> Decision {
    Decision::flag(permissions, Permission::ManageRoles)
}

pub fn check_manage_permissions(permissions: &PermissionSet) -> Decision {
    Decision::flag(permissions, Permission::ManagePermissions)
}

// ── Tests ──────────────────────────────────────────────────────
