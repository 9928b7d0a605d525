//! User management: listing, profile reads, account creation, edits with
//! self-vs-admin rules, and soft deactivation.

use chrono::Utc;
use uuid::Uuid;

use crate::authentication::auth::{self, CurrentUser};
use crate::authorization::policy::{self, UserAction};
use crate::data_access::data_context::DataContext;
use crate::role::DEFAULT_USER_ROLE_ID;
use crate::services::service_error::ServiceError;
use crate::task_status::TaskStatus;
use crate::user::User;
use crate::user_add_request::UserAddRequest;
use crate::user_detail_response::{TaskSummary, UserDetailResponse};
use crate::user_edit_request::UserEditRequest;
use crate::user_get_response::UserGetResponse;
use crate::user_list_query::UserListQuery;

pub fn list_users(
    ctx: &DataContext,
    caller: &CurrentUser,
    query: &UserListQuery,
) -> Result<Vec<UserGetResponse>, ServiceError> {
    policy::check_user_list(&caller.permissions).check()?;

    let mut users = ctx.list_users()?;
    if let Some(active) = query.active {
        users.retain(|u| u.is_active == active);
    }
    if let Some(role_id) = query.role_id {
        users.retain(|u| u.role_id == role_id);
    }
    users.sort_by(|a, b| a.full_name.cmp(&b.full_name));

    users
        .iter()
        .map(|u| Ok(u.to_get_dto(&role_name(ctx, u.role_id)?)))
        .collect()
}

/// Profile view: the record plus a summary of the user's non-deleted
/// assigned tasks. Self is always visible; anyone else needs view-all.
pub fn get_user(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: Uuid,
) -> Result<UserDetailResponse, ServiceError> {
    let target = ctx
        .get_user(id)?
        .filter(|u| u.is_active)
        .ok_or(ServiceError::NotFound("User"))?;

    policy::check_user(&caller.permissions, caller.user.id, UserAction::View, &target).check()?;

    let tasks = ctx
        .list_tasks()?
        .into_iter()
        .filter(|t| !t.is_deleted && t.is_assigned_to(target.id))
        .map(|t| TaskSummary {
            id: t.id,
            title: t.title,
            status: t.status,
            priority: t.priority,
            due_date: t.due_date,
            created_at: t.created_at,
        })
        .collect();

    let role = role_name(ctx, target.role_id)?;
    Ok(UserDetailResponse {
        user: target.to_get_dto(&role),
        tasks,
    })
}

pub fn create_user(
    ctx: &DataContext,
    caller: &CurrentUser,
    request: UserAddRequest,
) -> Result<UserGetResponse, ServiceError> {
    policy::check_user_create(&caller.permissions).check()?;

    let full_name = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ServiceError::Validation("Full name is required".to_string()));
    }
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(ServiceError::Validation("Username is required".to_string()));
    }
    let email = request.email.trim().to_string();
    if email.is_empty() {
        return Err(ServiceError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(ServiceError::Validation("Invalid email format".to_string()));
    }
    if request.password.is_empty() {
        return Err(ServiceError::Validation("Password is required".to_string()));
    }

    if ctx.get_user_by_username(&username)?.is_some() {
        return Err(ServiceError::Validation("Username already exists".to_string()));
    }
    if ctx.get_user_by_email(&email)?.is_some() {
        return Err(ServiceError::Validation("Email already exists".to_string()));
    }

    // The requested role only counts when the caller may manage roles;
    // everyone else creates plain users.
    let role_id = if policy::check_manage_roles(&caller.permissions).is_allowed() {
        request.role_id.unwrap_or(DEFAULT_USER_ROLE_ID)
    } else {
        DEFAULT_USER_ROLE_ID
    };
    let role = ctx
        .get_role(role_id)?
        .ok_or_else(|| ServiceError::Validation("Invalid role specified".to_string()))?;

    let password_hash = auth::hash_password(&request.password)
        .map_err(|e| ServiceError::Unexpected(format!("password hash: {e}")))?;

    let user = User::new(full_name, username, email, password_hash, role_id);
    ctx.create_user(&user)?;
    tracing::info!("user {} created with role {}", user.username, role.name);

    Ok(user.to_get_dto(&role.name))
}

pub fn update_user(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: Uuid,
    request: UserEditRequest,
) -> Result<UserGetResponse, ServiceError> {
    let mut user = ctx.get_user(id)?.ok_or(ServiceError::NotFound("User"))?;

    // Role reassignment and profile edits are gated independently: manage-
    // roles alone suffices for a pure role change, self/edit-users for the
    // profile fields.
    let wants_role_change = request.role_id.is_some_and(|role_id| role_id != user.role_id);
    let wants_profile_change = request.full_name.is_some() || request.email.is_some();

    if wants_profile_change || !wants_role_change {
        policy::check_user(&caller.permissions, caller.user.id, UserAction::Edit, &user).check()?;
    }
    if wants_role_change {
        policy::check_user(&caller.permissions, caller.user.id, UserAction::ChangeRole, &user)
            .check()?;
        let role_id = request.role_id.unwrap_or(user.role_id);
        if ctx.get_role(role_id)?.is_none() {
            return Err(ServiceError::Validation("Invalid role specified".to_string()));
        }
        user.role_id = role_id;
    }

    if let Some(full_name) = request.full_name {
        let full_name = full_name.trim();
        if !full_name.is_empty() {
            user.full_name = full_name.to_string();
        }
    }

    let previous_email = user.email.clone();
    if let Some(email) = request.email {
        let email = email.trim().to_string();
        if !email.is_empty() {
            if !is_valid_email(&email) {
                return Err(ServiceError::Validation("Invalid email format".to_string()));
            }
            if ctx
                .get_user_by_email(&email)?
                .is_some_and(|other| other.id != user.id)
            {
                return Err(ServiceError::Validation("Email already in use".to_string()));
            }
            user.email = email;
        }
    }

    user.updated_at = Some(Utc::now());
    ctx.update_user(&user, &previous_email)?;

    Ok(user.to_get_dto(&role_name(ctx, user.role_id)?))
}

/// Soft deactivation. Blocked while the user still has open assigned work,
/// so nothing in flight loses its owner silently.
pub fn deactivate_user(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: Uuid,
) -> Result<(), ServiceError> {
    if caller.user.id == id {
        return Err(ServiceError::Conflict(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    let mut user = ctx.get_user(id)?.ok_or(ServiceError::NotFound("User"))?;
    policy::check_user(&caller.permissions, caller.user.id, UserAction::Deactivate, &user)
        .check()?;

    let has_open_tasks = ctx.list_tasks()?.iter().any(|t| {
        !t.is_deleted && t.is_assigned_to(user.id) && t.status != TaskStatus::Completed
    });
    if has_open_tasks {
        return Err(ServiceError::Conflict(
            "User has active tasks. Reassign or complete them first.".to_string(),
        ));
    }

    user.is_active = false;
    user.updated_at = Some(Utc::now());
    let email = user.email.clone();
    ctx.update_user(&user, &email)?;
    tracing::info!("user {} deactivated", user.username);
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────

fn role_name(ctx: &DataContext, role_id: u32) -> Result<String, ServiceError> {
    Ok(ctx
        .get_role(role_id)?
        .map(|r| r.name)
        .unwrap_or_else(|| "User".to_string()))
}

/// Shape check only: one '@', non-empty local part, domain with a dot that
/// isn't at either edge.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::permissions::{Permission, PermissionSet};
    use crate::task_item::TaskItem;
    use crate::task_priority::TaskPriority;
    use std::fs;

    fn temp_context(name: &str) -> (DataContext, String) {
        let path = format!("/tmp/taskman_test_user_svc_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path);
        let ctx = DataContext::new(&path).unwrap();
        ctx.ensure_default_roles().unwrap();
        (ctx, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn seed_user(ctx: &DataContext, username: &str, role_id: u32) -> User {
        let user = User::new(
            format!("{username} person"),
            username.to_string(),
            format!("{username}@example.com"),
            "hash".to_string(),
            role_id,
        );
        ctx.create_user(&user).unwrap();
        user
    }

    fn caller(user: &User, permissions: PermissionSet) -> CurrentUser {
        CurrentUser {
            user: user.clone(),
            permissions,
            role_name: "Test".to_string(),
        }
    }

    fn add_request(username: &str, role_id: Option<u32>) -> UserAddRequest {
        UserAddRequest {
            full_name: format!("{username} person"),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "secret123".to_string(),
            role_id,
        }
    }

    fn seed_open_task(ctx: &DataContext, created_by: Uuid, assignee: Uuid, status: TaskStatus) {
        let now = Utc::now();
        let mut task = TaskItem {
            id: Uuid::new_v4(),
            title: "Work".into(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            category: None,
            due_date: now,
            created_by,
            assigned_users: vec![assignee],
            created_at: now,
            updated_at: None,
            completed_at: None,
            estimated_hours: None,
            actual_hours: None,
            is_deleted: false,
        };
        task.set_status(status, now);
        ctx.put_task(&task).unwrap();
    }

    #[test]
    fn listing_requires_view_all_and_sorts_by_name() {
        let (ctx, path) = temp_context("list");
        let admin = seed_user(&ctx, "zara", 1);
        seed_user(&ctx, "anna", 4);

        let denied = list_users(&ctx, &caller(&admin, PermissionSet::none()), &UserListQuery::default());
        assert!(matches!(denied, Err(ServiceError::AccessDenied)));

        let listed = list_users(
            &ctx,
            &caller(&admin, PermissionSet::all()),
            &UserListQuery::default(),
        )
        .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].username, "anna");
        assert_eq!(listed[1].username, "zara");

        let filtered = list_users(
            &ctx,
            &caller(&admin, PermissionSet::all()),
            &UserListQuery {
                role_id: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].username, "anna");

        cleanup(&path);
    }

    #[test]
    fn self_profile_is_readable_without_flags() {
        let (ctx, path) = temp_context("self_read");
        let admin = seed_user(&ctx, "admin", 1);
        let worker = seed_user(&ctx, "wendy", 4);
        seed_open_task(&ctx, admin.id, worker.id, TaskStatus::Pending);

        let own = get_user(&ctx, &caller(&worker, PermissionSet::none()), worker.id).unwrap();
        assert_eq!(own.user.username, "wendy");
        assert_eq!(own.user.role, "User");
        assert_eq!(own.tasks.len(), 1);

        let foreign = get_user(&ctx, &caller(&worker, PermissionSet::none()), admin.id);
        assert!(matches!(foreign, Err(ServiceError::AccessDenied)));

        cleanup(&path);
    }

    #[test]
    fn create_validates_input_and_uniqueness() {
        let (ctx, path) = temp_context("create");
        let admin = seed_user(&ctx, "admin", 1);
        let admin_caller = caller(&admin, PermissionSet::all());

        create_user(&ctx, &admin_caller, add_request("jane", None)).unwrap();

        let duplicate_username = create_user(&ctx, &admin_caller, add_request("jane", None));
        assert!(matches!(duplicate_username, Err(ServiceError::Validation(_))));

        let mut duplicate_email = add_request("janet", None);
        duplicate_email.email = "jane@example.com".to_string();
        assert!(matches!(
            create_user(&ctx, &admin_caller, duplicate_email),
            Err(ServiceError::Validation(_))
        ));

        let mut bad_email = add_request("juno", None);
        bad_email.email = "not-an-address".to_string();
        assert!(matches!(
            create_user(&ctx, &admin_caller, bad_email),
            Err(ServiceError::Validation(_))
        ));

        let unknown_role = create_user(&ctx, &admin_caller, add_request("jim", Some(99)));
        assert!(matches!(unknown_role, Err(ServiceError::Validation(_))));

        cleanup(&path);
    }

    #[test]
    fn requested_role_needs_manage_roles() {
        let (ctx, path) = temp_context("role_force");
        let admin = seed_user(&ctx, "admin", 1);

        // Creator without manage-roles: requested Director is ignored
        let mut hr = PermissionSet::none();
        hr.set(Permission::CreateUsers, true);
        let created = create_user(&ctx, &caller(&admin, hr), add_request("norm", Some(2))).unwrap();
        assert_eq!(created.role_id, DEFAULT_USER_ROLE_ID);

        // With manage-roles the request is honored
        let created =
            create_user(&ctx, &caller(&admin, PermissionSet::all()), add_request("dana", Some(2)))
                .unwrap();
        assert_eq!(created.role_id, 2);
        assert_eq!(created.role, "Director");

        cleanup(&path);
    }

    #[test]
    fn password_is_hashed_and_never_in_responses() {
        let (ctx, path) = temp_context("hash");
        let admin = seed_user(&ctx, "admin", 1);

        create_user(
            &ctx,
            &caller(&admin, PermissionSet::all()),
            add_request("jane", None),
        )
        .unwrap();

        let stored = ctx.get_user_by_username("jane").unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert!(auth::verify_password("secret123", &stored.password_hash));

        let json = serde_json::to_string(&stored.to_get_dto("User")).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains(&stored.password_hash));

        cleanup(&path);
    }

    #[test]
    fn self_edit_of_profile_fields_is_allowed() {
        let (ctx, path) = temp_context("self_edit");
        let worker = seed_user(&ctx, "wendy", 4);

        let updated = update_user(
            &ctx,
            &caller(&worker, PermissionSet::none()),
            worker.id,
            UserEditRequest {
                full_name: Some("Wendy Prime".to_string()),
                email: Some("wendy.prime@example.com".to_string()),
                role_id: None,
            },
        )
        .unwrap();
        assert_eq!(updated.full_name, "Wendy Prime");
        assert_eq!(updated.email, "wendy.prime@example.com");

        // Old email is freed, new one is indexed
        assert!(ctx.get_user_by_email("wendy@example.com").unwrap().is_none());
        assert!(ctx.get_user_by_email("wendy.prime@example.com").unwrap().is_some());

        cleanup(&path);
    }

    #[test]
    fn email_collision_with_another_user_is_rejected() {
        let (ctx, path) = temp_context("email_taken");
        let worker = seed_user(&ctx, "wendy", 4);
        seed_user(&ctx, "walt", 4);

        let result = update_user(
            &ctx,
            &caller(&worker, PermissionSet::none()),
            worker.id,
            UserEditRequest {
                email: Some("walt@example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        // Keeping your own address is not a collision
        let own = update_user(
            &ctx,
            &caller(&worker, PermissionSet::none()),
            worker.id,
            UserEditRequest {
                email: Some("wendy@example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(own.is_ok());

        cleanup(&path);
    }

    #[test]
    fn role_change_requires_manage_roles() {
        let (ctx, path) = temp_context("role_change");
        let admin = seed_user(&ctx, "admin", 1);
        let worker = seed_user(&ctx, "wendy", 4);

        // EditUsers alone is not enough for role changes
        let mut editor = PermissionSet::none();
        editor.set(Permission::EditUsers, true);
        let denied = update_user(
            &ctx,
            &caller(&admin, editor),
            worker.id,
            UserEditRequest {
                role_id: Some(2),
                ..Default::default()
            },
        );
        assert!(matches!(denied, Err(ServiceError::AccessDenied)));

        let changed = update_user(
            &ctx,
            &caller(&admin, PermissionSet::all()),
            worker.id,
            UserEditRequest {
                role_id: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(changed.role_id, 2);

        // Manage-roles alone carries a pure role change, but not profile edits
        let mut role_admin = PermissionSet::none();
        role_admin.set(Permission::ManageRoles, true);
        let role_only = update_user(
            &ctx,
            &caller(&admin, role_admin),
            worker.id,
            UserEditRequest {
                role_id: Some(3),
                ..Default::default()
            },
        );
        assert!(role_only.is_ok());

        let with_profile = update_user(
            &ctx,
            &caller(&admin, role_admin),
            worker.id,
            UserEditRequest {
                role_id: Some(2),
                full_name: Some("New Name".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(with_profile, Err(ServiceError::AccessDenied)));

        cleanup(&path);
    }

    #[test]
    fn deactivation_rules() {
        let (ctx, path) = temp_context("deactivate");
        let admin = seed_user(&ctx, "admin", 1);
        let busy = seed_user(&ctx, "busy", 4);
        let idle = seed_user(&ctx, "idle", 4);
        let admin_caller = caller(&admin, PermissionSet::all());

        seed_open_task(&ctx, admin.id, busy.id, TaskStatus::InProgress);
        seed_open_task(&ctx, admin.id, idle.id, TaskStatus::Completed);

        // Self-deactivation is blocked outright
        assert!(matches!(
            deactivate_user(&ctx, &admin_caller, admin.id),
            Err(ServiceError::Conflict(_))
        ));

        // Open assigned work blocks deactivation
        assert!(matches!(
            deactivate_user(&ctx, &admin_caller, busy.id),
            Err(ServiceError::Conflict(_))
        ));
        assert!(ctx.get_user(busy.id).unwrap().unwrap().is_active);

        // Only completed work: fine
        deactivate_user(&ctx, &admin_caller, idle.id).unwrap();
        assert!(!ctx.get_user(idle.id).unwrap().unwrap().is_active);

        // And the flag is required at all
        let revived = seed_user(&ctx, "late", 4);
        let denied = deactivate_user(&ctx, &caller(&busy, PermissionSet::none()), revived.id);
        assert!(matches!(denied, Err(ServiceError::AccessDenied)));

        cleanup(&path);
    }

    #[test]
    fn email_shape_checks() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@missing-local.com"));
        assert!(!is_valid_email("x@nodot"));
        assert!(!is_valid_email("x@.leading"));
        assert!(!is_valid_email("x@trailing."));
    }
}
