//! The closed permission taxonomy carried by roles.
//!
//! Every permission is a named boolean on the role record. The enum below is
//! the full vocabulary; adding a permission means adding a variant, a field
//! on `PermissionSet`, and a row in the two mapping tables. The compiler
//! enforces that all three stay in sync (exhaustive matches, no string keys
//! at runtime).

use serde::{Deserialize, Serialize};

/// A single permission kind. Grouped: task, user, system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    // Task
    ViewAllTasks,
    EditAllTasks,
    CreateTasks,
    DeleteTasks,
    AssignTasks,
    // User
    ViewAllUsers,
    CreateUsers,
    EditUsers,
    DeleteUsers,
    // System
    ManageRoles,
    ManagePermissions,
    ViewReports,
    ExportData,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::ViewAllTasks,
        Permission::EditAllTasks,
        Permission::CreateTasks,
        Permission::DeleteTasks,
        Permission::AssignTasks,
        Permission::ViewAllUsers,
        Permission::CreateUsers,
        Permission::EditUsers,
        Permission::DeleteUsers,
        Permission::ManageRoles,
        Permission::ManagePermissions,
        Permission::ViewReports,
        Permission::ExportData,
    ];

    /// The external key string, as it appears in role JSON and the
    /// permission bundle endpoint.
    pub fn key(self) -> &'static str {
        match self {
            Permission::ViewAllTasks => "canViewAllTasks",
            Permission::EditAllTasks => "canEditAllTasks",
            Permission::CreateTasks => "canCreateTasks",
            Permission::DeleteTasks => "canDeleteTasks",
            Permission::AssignTasks => "canAssignTasks",
            Permission::ViewAllUsers => "canViewAllUsers",
            Permission::CreateUsers => "canCreateUsers",
            Permission::EditUsers => "canEditUsers",
            Permission::DeleteUsers => "canDeleteUsers",
            Permission::ManageRoles => "canManageRoles",
            Permission::ManagePermissions => "canManagePermissions",
            Permission::ViewReports => "canViewReports",
            Permission::ExportData => "canExportData",
        }
    }

    pub fn from_key(key: &str) -> Option<Permission> {
        match key {
            "canViewAllTasks" => Some(Permission::ViewAllTasks),
            "canEditAllTasks" => Some(Permission::EditAllTasks),
            "canCreateTasks" => Some(Permission::CreateTasks),
            "canDeleteTasks" => Some(Permission::DeleteTasks),
            "canAssignTasks" => Some(Permission::AssignTasks),
            "canViewAllUsers" => Some(Permission::ViewAllUsers),
            "canCreateUsers" => Some(Permission::CreateUsers),
            "canEditUsers" => Some(Permission::EditUsers),
            "canDeleteUsers" => Some(Permission::DeleteUsers),
            "canManageRoles" => Some(Permission::ManageRoles),
            "canManagePermissions" => Some(Permission::ManagePermissions),
            "canViewReports" => Some(Permission::ViewReports),
            "canExportData" => Some(Permission::ExportData),
            _ => None,
        }
    }
}

/// The 13 boolean flags on a role. Serializes with the external camelCase
/// keys; missing keys deserialize as false so partial bundles are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    pub can_view_all_tasks: bool,
    pub can_edit_all_tasks: bool,
    pub can_create_tasks: bool,
    pub can_delete_tasks: bool,
    pub can_assign_tasks: bool,
    pub can_view_all_users: bool,
    pub can_create_users: bool,
    pub can_edit_users: bool,
    pub can_delete_users: bool,
    pub can_manage_roles: bool,
    pub can_manage_permissions: bool,
    pub can_view_reports: bool,
    pub can_export_data: bool,
}

impl PermissionSet {
    /// No permissions at all. The starting point for new roles.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every flag set. The Admin configuration.
    pub fn all() -> Self {
        let mut set = Self::default();
        for permission in Permission::ALL {
            set.set(permission, true);
        }
        set
    }

    pub fn grants(&self, permission: Permission) -> bool {
        match permission {
            Permission::ViewAllTasks => self.can_view_all_tasks,
            Permission::EditAllTasks => self.can_edit_all_tasks,
            Permission::CreateTasks => self.can_create_tasks,
            Permission::DeleteTasks => self.can_delete_tasks,
            Permission::AssignTasks => self.can_assign_tasks,
            Permission::ViewAllUsers => self.can_view_all_users,
            Permission::CreateUsers => self.can_create_users,
            Permission::EditUsers => self.can_edit_users,
            Permission::DeleteUsers => self.can_delete_users,
            Permission::ManageRoles => self.can_manage_roles,
            Permission::ManagePermissions => self.can_manage_permissions,
            Permission::ViewReports => self.can_view_reports,
            Permission::ExportData => self.can_export_data,
        }
    }

    pub fn set(&mut self, permission: Permission, value: bool) {
        match permission {
            Permission::ViewAllTasks => self.can_view_all_tasks = value,
            Permission::EditAllTasks => self.can_edit_all_tasks = value,
            Permission::CreateTasks => self.can_create_tasks = value,
            Permission::DeleteTasks => self.can_delete_tasks = value,
            Permission::AssignTasks => self.can_assign_tasks = value,
            Permission::ViewAllUsers => self.can_view_all_users = value,
            Permission::CreateUsers => self.can_create_users = value,
            Permission::EditUsers => self.can_edit_users = value,
            Permission::DeleteUsers => self.can_delete_users = value,
            Permission::ManageRoles => self.can_manage_roles = value,
            Permission::ManagePermissions => self.can_manage_permissions = value,
            Permission::ViewReports => self.can_view_reports = value,
            Permission::ExportData => self.can_export_data = value,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
