//! Task lifecycle: listing with visibility scoping, create/update with
//! atomic assignment replacement, soft delete.

use chrono::Utc;
use uuid::Uuid;

use crate::authentication::auth::CurrentUser;
use crate::authorization::permissions::Permission;
use crate::authorization::policy::{self, TaskAction};
use crate::create_task_request::CreateTaskRequest;
use crate::data_access::data_context::DataContext;
use crate::services::service_error::ServiceError;
use crate::task_item::TaskItem;
use crate::task_list_query::{SortOrder, TaskListQuery, TaskSortKey};
use crate::task_response::{TaskAssignee, TaskResponse};
use crate::task_status::TaskStatus;
use crate::update_task_request::UpdateTaskRequest;

/// The caller's visible slice of the non-deleted tasks: everything with the
/// view-all flag, otherwise only what they created or are assigned to.
pub(crate) fn visible_tasks(
    ctx: &DataContext,
    caller: &CurrentUser,
) -> Result<Vec<TaskItem>, ServiceError> {
    let mut tasks: Vec<TaskItem> = ctx
        .list_tasks()?
        .into_iter()
        .filter(|t| !t.is_deleted)
        .collect();
    if !caller.permissions.grants(Permission::ViewAllTasks) {
        let id = caller.user.id;
        tasks.retain(|t| t.created_by == id || t.is_assigned_to(id));
    }
    Ok(tasks)
}

pub fn list_tasks(
    ctx: &DataContext,
    caller: &CurrentUser,
    query: &TaskListQuery,
) -> Result<Vec<TaskResponse>, ServiceError> {
    let mut tasks = visible_tasks(ctx, caller)?;

    if let Some(status) = query.status {
        tasks.retain(|t| t.status == status);
    }
    if let Some(priority) = query.priority {
        tasks.retain(|t| t.priority == priority);
    }
    if let Some(assigned_to) = query.assigned_to {
        tasks.retain(|t| t.is_assigned_to(assigned_to));
    }
    if let Some(search) = query.search.as_deref() {
        let needle = search.trim().to_lowercase();
        if !needle.is_empty() {
            tasks.retain(|t| t.matches_search(&needle));
        }
    }

    match query.sort_by.unwrap_or(TaskSortKey::CreatedAt) {
        TaskSortKey::DueDate => tasks.sort_by_key(|t| t.due_date),
        TaskSortKey::Priority => tasks.sort_by_key(|t| t.priority),
        TaskSortKey::Status => tasks.sort_by_key(|t| t.status),
        TaskSortKey::CreatedAt => tasks.sort_by_key(|t| t.created_at),
    }
    if query.sort_order.unwrap_or(SortOrder::Desc) == SortOrder::Desc {
        tasks.reverse();
    }

    tasks.iter().map(|t| build_response(ctx, t)).collect()
}

pub fn get_task(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: Uuid,
) -> Result<TaskResponse, ServiceError> {
    let task = ctx
        .get_task(id)?
        .filter(|t| !t.is_deleted)
        .ok_or(ServiceError::NotFound("Task"))?;

    policy::check_task(&caller.permissions, caller.user.id, TaskAction::View, &task).check()?;
    build_response(ctx, &task)
}

pub fn create_task(
    ctx: &DataContext,
    caller: &CurrentUser,
    request: CreateTaskRequest,
) -> Result<TaskResponse, ServiceError> {
    policy::check_task_create(&caller.permissions).check()?;

    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(ServiceError::Validation("Title is required".to_string()));
    }

    let assignees = dedup(request.assigned_user_ids);
    policy::check_assignment(&caller.permissions, caller.user.id, &assignees).check()?;
    ensure_assignees_active(ctx, &assignees)?;

    let task = TaskItem {
        id: Uuid::new_v4(),
        title,
        description: request.description,
        status: TaskStatus::Pending,
        priority: request.priority,
        category: request.category,
        due_date: request.due_date,
        created_by: caller.user.id,
        assigned_users: assignees,
        created_at: Utc::now(),
        updated_at: None,
        completed_at: None,
        estimated_hours: request.estimated_hours,
        actual_hours: None,
        is_deleted: false,
    };
    ctx.put_task(&task)?;
    build_response(ctx, &task)
}

/// Partial update. A present assignee list fully replaces the assignment
/// set, validated as a whole before the record is rewritten: the set is
/// applied entirely or not at all.
pub fn update_task(
    ctx: &DataContext,
    caller: &CurrentUser,
    id: Uuid,
    request: UpdateTaskRequest,
) -> Result<TaskResponse, ServiceError> {
    let mut task = ctx
        .get_task(id)?
        .filter(|t| !t.is_deleted)
        .ok_or(ServiceError::NotFound("Task"))?;

    policy::check_task(&caller.permissions, caller.user.id, TaskAction::Edit, &task).check()?;

    let now = Utc::now();

    if let Some(title) = request.title {
        let title = title.trim();
        if !title.is_empty() {
            task.title = title.to_string();
        }
    }
    if let Some(description) = request.description {
        task.description = Some(description);
    }
    if let Some(status) = request.status {
        task.set_status(status, now);
    }
    if let Some(priority) = request.priority {
        task.priority = priority;
    }
    if let Some(category) = request.category {
        task.category = Some(category);
    }
    if let Some(due_date) = request.due_date {
        task.due_date = due_date;
    }
    if let Some(estimated_hours) = request.estimated_hours {
        task.estimated_hours = Some(estimated_hours);
    }
    if let Some(actual_hours) = request.actual_hours {
        task.actual_hours = Some(actual_hours);
    }
    if let Some(assignee_ids) = request.assigned_user_ids {
        let assignees = dedup(assignee_ids);
        policy::check_assignment(&caller.permissions, caller.user.id, &assignees).check()?;
        ensure_assignees_active(ctx, &assignees)?;
        task.assigned_users = assignees;
    }

    task.updated_at = Some(now);
    ctx.put_task(&task)?;
    build_response(ctx, &task)
}

/// Soft delete: the record stays for historical joins but disappears from
/// every default read.
pub fn delete_task(ctx: &DataContext, caller: &CurrentUser, id: Uuid) -> Result<(), ServiceError> {
    let mut task = ctx
        .get_task(id)?
        .filter(|t| !t.is_deleted)
        .ok_or(ServiceError::NotFound("Task"))?;

    policy::check_task(&caller.permissions, caller.user.id, TaskAction::Delete, &task).check()?;

    task.is_deleted = true;
    task.updated_at = Some(Utc::now());
    ctx.put_task(&task)?;
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────

/// Every requested assignee must resolve to an active account, or the whole
/// operation is rejected. No partial assignment is ever written.
fn ensure_assignees_active(ctx: &DataContext, assignees: &[Uuid]) -> Result<(), ServiceError> {
    for id in assignees {
        let active = ctx.get_user(*id)?.is_some_and(|u| u.is_active);
        if !active {
            return Err(ServiceError::Validation(
                "Assigned user not found or inactive".to_string(),
            ));
        }
    }
    Ok(())
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn build_response(ctx: &DataContext, task: &TaskItem) -> Result<TaskResponse, ServiceError> {
    let mut assigned_users = Vec::with_capacity(task.assigned_users.len());
    for id in &task.assigned_users {
        // Accounts are never hard-deleted, so a missing row would be a
        // stale reference; skip it rather than fail the read.
        if let Some(user) = ctx.get_user(*id)? {
            let role = role_name(ctx, user.role_id)?;
            assigned_users.push(TaskAssignee {
                id: user.id,
                full_name: user.full_name,
                username: user.username,
                email: user.email,
                role,
            });
        }
    }
    let created_by_name = ctx.get_user(task.created_by)?.map(|u| u.full_name);

    Ok(TaskResponse {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        priority: task.priority,
        category: task.category.clone(),
        assigned_users,
        created_by_id: task.created_by,
        created_by_name,
        due_date: task.due_date,
        created_at: task.created_at,
        updated_at: task.updated_at,
        completed_at: task.completed_at,
        estimated_hours: task.estimated_hours,
        actual_hours: task.actual_hours,
    })
}

fn role_name(ctx: &DataContext, role_id: u32) -> Result<String, ServiceError> {
    Ok(ctx
        .get_role(role_id)?
        .map(|r| r.name)
        .unwrap_or_else(|| "User".to_string()))
}

// ── Tests ──────────────────────────────────────────────────────
