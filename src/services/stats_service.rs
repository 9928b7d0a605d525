//! Read-only rollups over tasks and users, scoped by the caller's
//! visibility. Counts come from the same filtered set a listing would
//! return, so the numbers always agree with what the caller can see.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::authentication::auth::CurrentUser;
use crate::authorization::permissions::Permission;
use crate::authorization::policy;
use crate::data_access::data_context::DataContext;
use crate::services::service_error::ServiceError;
use crate::services::task_service::visible_tasks;
use crate::task_priority::TaskPriority;
use crate::task_stats_response::{AssigneeTaskCount, TaskStatsResponse};
use crate::task_status::TaskStatus;
use crate::user_stats_response::{RoleUserCount, UserStatsResponse, UserTaskCount};

const TOP_USER_COUNT: usize = 5;

pub fn task_stats(ctx: &DataContext, caller: &CurrentUser) -> Result<TaskStatsResponse, ServiceError> {
    let tasks = visible_tasks(ctx, caller)?;
    let now = Utc::now();

    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.status == TaskStatus::Completed).count();
    let pending_tasks = tasks.iter().filter(|t| t.status == TaskStatus::Pending).count();
    let in_progress_tasks = tasks.iter().filter(|t| t.status == TaskStatus::InProgress).count();

    let high_priority_tasks = tasks.iter().filter(|t| t.priority == TaskPriority::High).count();
    let medium_priority_tasks = tasks.iter().filter(|t| t.priority == TaskPriority::Medium).count();
    let low_priority_tasks = tasks.iter().filter(|t| t.priority == TaskPriority::Low).count();

    let overdue_tasks = tasks.iter().filter(|t| t.is_overdue(now)).count();

    let completion_rate = if total_tasks > 0 {
        completed_tasks as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    // The per-user breakdown reveals other people's workloads, so it is
    // only computed for callers who can see every task anyway.
    let top_assignees = if caller.permissions.grants(Permission::ViewAllTasks) {
        Some(top_assignees(ctx, &tasks)?)
    } else {
        None
    };

    Ok(TaskStatsResponse {
        total_tasks,
        completed_tasks,
        pending_tasks,
        in_progress_tasks,
        high_priority_tasks,
        medium_priority_tasks,
        low_priority_tasks,
        overdue_tasks,
        completion_rate,
        top_assignees,
    })
}

pub fn user_stats(ctx: &DataContext, caller: &CurrentUser) -> Result<UserStatsResponse, ServiceError> {
    policy::check_user_list(&caller.permissions).check()?;

    let users = ctx.list_users()?;
    let roles = ctx.list_roles()?;
    let tasks: Vec<_> = ctx
        .list_tasks()?
        .into_iter()
        .filter(|t| !t.is_deleted)
        .collect();

    let active: Vec<_> = users.iter().filter(|u| u.is_active).collect();
    let total_users = active.len();

    let role_counts = roles
        .iter()
        .map(|role| RoleUserCount {
            role_id: role.id,
            role_name: role.name.clone(),
            user_count: active.iter().filter(|u| u.role_id == role.id).count(),
        })
        .collect();

    let role_names: HashMap<u32, &str> =
        roles.iter().map(|r| (r.id, r.name.as_str())).collect();

    let mut top_users: Vec<UserTaskCount> = active
        .iter()
        .map(|user| {
            let assigned: Vec<_> = tasks.iter().filter(|t| t.is_assigned_to(user.id)).collect();
            UserTaskCount {
                id: user.id,
                full_name: user.full_name.clone(),
                role: role_names
                    .get(&user.role_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "User".to_string()),
                task_count: assigned.len(),
                completed_tasks: assigned
                    .iter()
                    .filter(|t| t.status == TaskStatus::Completed)
                    .count(),
            }
        })
        .collect();
    top_users.sort_by(|a, b| b.task_count.cmp(&a.task_count));
    top_users.truncate(TOP_USER_COUNT);

    Ok(UserStatsResponse {
        total_users,
        role_counts,
        top_users,
    })
}

fn top_assignees(
    ctx: &DataContext,
    tasks: &[crate::task_item::TaskItem],
) -> Result<Vec<AssigneeTaskCount>, ServiceError> {
    let mut per_user: HashMap<Uuid, (usize, usize)> = HashMap::new();
    for task in tasks {
        for id in &task.assigned_users {
            let entry = per_user.entry(*id).or_insert((0, 0));
            entry.0 += 1;
            if task.status == TaskStatus::Completed {
                entry.1 += 1;
            }
        }
    }

    let mut counts: Vec<(Uuid, usize, usize)> = per_user
        .into_iter()
        .map(|(id, (task_count, completed))| (id, task_count, completed))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(TOP_USER_COUNT);

    let mut out = Vec::with_capacity(counts.len());
    for (id, task_count, completed_tasks) in counts {
        if let Some(user) = ctx.get_user(id)? {
            out.push(AssigneeTaskCount {
                id,
                full_name: user.full_name,
                task_count,
                completed_tasks,
            });
        }
    }
    Ok(out)
}

// ── Tests ──────────────────────────────────────────────────────
