//! Role CRUD plus the permission bundle endpoints. Seeded default roles
//! keep their name and existence fixed, but their flags stay adjustable
//! through the bundle: structure is fixed, behavior is configurable.

use chrono::Utc;

use crate::authentication::auth::CurrentUser;
use crate::authorization::permissions::PermissionSet;
use crate::authorization::policy;
use crate::data_access::data_context::DataContext;
use crate::role::Role;
use crate::role_add_request::RoleAddRequest;
use crate::role_edit_request::RoleEditRequest;
use crate::role_get_response::RoleGetResponse;
use crate::services::service_error::ServiceError;

pub fn list_roles(ctx: &DataContext, caller: &CurrentUser) -> Result<Vec<RoleGetResponse>, ServiceError> {
    policy::check_manage_roles(&caller.permissions).check()?;

    let users = ctx.list_users()?;
    ctx.list_roles()?
        .into_iter()
        .map(|role| {
            let user_count = users.iter().filter(|u| u.role_id == role.id).count();
            Ok(to_response(role, user_count))
        })
        .collect()
}

pub fn get_role(ctx: &DataContext, caller: &CurrentUser, id: u32) -> Result<RoleGetResponse, ServiceError> {
    policy::check_manage_roles(&caller.permissions).check()?;

    let role = ctx.get_role(id)?.ok_or(ServiceError::NotFound("Role"))?;
    let user_count = count_users(ctx, id)?;
    Ok(to_response(role, user_count))
}

pub fn create_role(
    ctx: &DataContext,
    caller: &CurrentUser,
    request: RoleAddRequest,
) -> Result<RoleGetResponse, ServiceError> {
    policy::check_manage_roles(&caller.permissions).check()?;

    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(ServiceError::Validation("Role name is required".to_string()));
    }
    if ctx.get_role_by_name(&name)?.is_some() {
        return Err(ServiceError::Validation("Role name already exists".to_string()));
    }

    let role = ctx.create_role(name, request.description, request.permissions)?;
    tracing::info!("role {} created (id {})", role.name, role.id);
    Ok(to_response(role, 0))
}

/// Rename/redescribe. Default roles cannot be renamed; flags never change
/// here (that's the bundle endpoint).
pub fn update_role(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: u32,
    request: RoleEditRequest,
) -> Result<RoleGetResponse, ServiceError> {
    policy::check_manage_roles(&caller.permissions).check()?;

    let mut role = ctx.get_role(id)?.ok_or(ServiceError::NotFound("Role"))?;
    let previous_name = role.name.clone();

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if !name.is_empty() && name != role.name {
            if role.is_default() {
                return Err(ServiceError::Conflict("Cannot rename default roles".to_string()));
            }
            if ctx
                .get_role_by_name(&name)?
                .is_some_and(|other| other.id != id)
            {
                return Err(ServiceError::Validation("Role name already exists".to_string()));
            }
            role.name = name;
        }
    }
    if let Some(description) = request.description {
        role.description = Some(description);
    }

    role.updated_at = Some(Utc::now());
    ctx.update_role(&role, &previous_name)?;

    let user_count = count_users(ctx, id)?;
    Ok(to_response(role, user_count))
}

pub fn delete_role(ctx: &DataContext, caller: &CurrentUser, id: u32) -> Result<(), ServiceError> {
    policy::check_manage_roles(&caller.permissions).check()?;

    let role = ctx.get_role(id)?.ok_or(ServiceError::NotFound("Role"))?;
    if role.is_default() {
        return Err(ServiceError::Conflict("Cannot delete default roles".to_string()));
    }
    if count_users(ctx, id)? > 0 {
        return Err(ServiceError::Conflict(
            "Cannot delete role that has users assigned. Reassign users first.".to_string(),
        ));
    }

    ctx.delete_role(id)?;
    tracing::info!("role {} deleted", role.name);
    Ok(())
}

pub fn get_permissions(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: u32,
) -> Result<PermissionSet, ServiceError> {
    policy::check_manage_permissions(&caller.permissions).check()?;

    let role = ctx.get_role(id)?.ok_or(ServiceError::NotFound("Role"))?;
    Ok(role.permissions)
}

/// Replace a role's flag bundle. Works on default roles too: their
/// behavior is adjustable even though their structure is not.
pub fn update_permissions(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: u32,
    bundle: PermissionSet,
) -> Result<PermissionSet, ServiceError> {
    policy::check_manage_permissions(&caller.permissions).check()?;

    let mut role = ctx.get_role(id)?.ok_or(ServiceError::NotFound("Role"))?;
    role.permissions = bundle;
    role.updated_at = Some(Utc::now());
    let name = role.name.clone();
    ctx.update_role(&role, &name)?;

    Ok(role.permissions)
}

// ── Helpers ────────────────────────────────────────────────────

fn count_users(ctx: &DataContext, role_id: u32) -> Result<usize, ServiceError> {
    Ok(ctx.list_users()?.iter().filter(|u| u.role_id == role_id).count())
}

fn to_response(role: Role, user_count: usize) -> RoleGetResponse {
    RoleGetResponse {
        id: role.id,
        name: role.name,
        description: role.description,
        permissions: role.permissions,
        created_at: role.created_at,
        updated_at: role.updated_at,
        user_count,
    }
}

// ── Tests ──────────────────────────────────────────────────────
