//! redb-backed store. Whole records in, whole records out: every mutation
//! is one write transaction, so multi-field updates (including assignment
//! set replacement) are atomic by construction.

use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

use crate::authorization::permissions::PermissionSet;
use crate::role::{Role, DEFAULT_ROLE_COUNT};
use crate::settings::Settings;
use crate::task_item::TaskItem;
use crate::user::User;

const USERS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("users");
const USERNAME_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("username_index");
const EMAIL_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("email_index");
const ROLES_TABLE: TableDefinition<u32, &[u8]> = TableDefinition::new("roles");
const ROLE_NAME_INDEX: TableDefinition<&str, u32> = TableDefinition::new("role_name_index");
const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");
const META_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

const NEXT_ROLE_ID_KEY: &str = "next_role_id";

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
}

impl DataContext {
    /// Open (or create) the database at the given path, creating tables if
    /// they don't exist.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(USERS_TABLE)?;
            let _ = txn.open_table(USERNAME_INDEX)?;
            let _ = txn.open_table(EMAIL_INDEX)?;
            let _ = txn.open_table(ROLES_TABLE)?;
            let _ = txn.open_table(ROLE_NAME_INDEX)?;
            let _ = txn.open_table(TASKS_TABLE)?;
            let _ = txn.open_table(META_TABLE)?;
        }
        txn.commit()?;

        Ok(DataContext { db: Arc::new(db) })
    }

    // ── Users ──────────────────────────────────────────────────

    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            let mut by_username = txn.open_table(USERNAME_INDEX)?;
            let mut by_email = txn.open_table(EMAIL_INDEX)?;

            let bytes = encode(user)?;
            let id_bytes = user.id.as_bytes();
            users.insert(id_bytes.as_slice(), bytes.as_slice())?;
            by_username.insert(user.username.as_str(), id_bytes.as_slice())?;
            by_email.insert(user.email.as_str(), id_bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Rewrite a user record. Usernames are immutable; the email index is
    /// maintained when the address changed.
    pub fn update_user(&self, user: &User, previous_email: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            let mut by_email = txn.open_table(EMAIL_INDEX)?;

            let bytes = encode(user)?;
            let id_bytes = user.id.as_bytes();
            users.insert(id_bytes.as_slice(), bytes.as_slice())?;
            if user.email != previous_email {
                by_email.remove(previous_email)?;
            }
            by_email.insert(user.email.as_str(), id_bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS_TABLE)?;
        match users.get(id.as_bytes().as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let index = txn.open_table(USERNAME_INDEX)?;
        let id_bytes = match index.get(username)? {
            Some(entry) => entry.value().to_vec(),
            None => return Ok(None),
        };
        let users = txn.open_table(USERS_TABLE)?;
        match users.get(id_bytes.as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let index = txn.open_table(EMAIL_INDEX)?;
        let id_bytes = match index.get(email)? {
            Some(entry) => entry.value().to_vec(),
            None => return Ok(None),
        };
        let users = txn.open_table(USERS_TABLE)?;
        match users.get(id_bytes.as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS_TABLE)?;

        let mut out = Vec::new();
        for entry in users.iter()? {
            let (_, value) = entry?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }

    // ── Roles ──────────────────────────────────────────────────

    /// Create a role with the next id from the persistent counter.
    /// Allocation and insertion happen in one transaction.
    pub fn create_role(
        &self,
        name: String,
        description: Option<String>,
        permissions: PermissionSet,
    ) -> Result<Role, StoreError> {
        let txn = self.db.begin_write()?;
        let role;
        {
            let mut meta = txn.open_table(META_TABLE)?;
            let id = match meta.get(NEXT_ROLE_ID_KEY)? {
                Some(bytes) => decode_u32(bytes.value()),
                None => DEFAULT_ROLE_COUNT + 1,
            };
            meta.insert(NEXT_ROLE_ID_KEY, (id + 1).to_le_bytes().as_slice())?;

            role = Role {
                id,
                name,
                description,
                permissions,
                created_at: Utc::now(),
                updated_at: None,
            };

            let mut roles = txn.open_table(ROLES_TABLE)?;
            let mut by_name = txn.open_table(ROLE_NAME_INDEX)?;
            roles.insert(role.id, encode(&role)?.as_slice())?;
            by_name.insert(role.name.as_str(), role.id)?;
        }
        txn.commit()?;
        Ok(role)
    }

    /// Rewrite a role record, maintaining the name index on rename.
    pub fn update_role(&self, role: &Role, previous_name: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut roles = txn.open_table(ROLES_TABLE)?;
            let mut by_name = txn.open_table(ROLE_NAME_INDEX)?;
            roles.insert(role.id, encode(role)?.as_slice())?;
            if role.name != previous_name {
                by_name.remove(previous_name)?;
            }
            by_name.insert(role.name.as_str(), role.id)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn delete_role(&self, id: u32) -> Result<bool, StoreError> {
        let txn = self.db.begin_write()?;
        let deleted;
        {
            let mut roles = txn.open_table(ROLES_TABLE)?;
            let removed = match roles.remove(id)? {
                Some(bytes) => Some(decode::<Role>(bytes.value())?),
                None => None,
            };
            deleted = removed.is_some();
            if let Some(role) = removed {
                let mut by_name = txn.open_table(ROLE_NAME_INDEX)?;
                by_name.remove(role.name.as_str())?;
            }
        }
        txn.commit()?;
        Ok(deleted)
    }

    pub fn get_role(&self, id: u32) -> Result<Option<Role>, StoreError> {
        let txn = self.db.begin_read()?;
        let roles = txn.open_table(ROLES_TABLE)?;
        match roles.get(id)? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_role_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let txn = self.db.begin_read()?;
        let index = txn.open_table(ROLE_NAME_INDEX)?;
        let id = match index.get(name)? {
            Some(entry) => entry.value(),
            None => return Ok(None),
        };
        let roles = txn.open_table(ROLES_TABLE)?;
        match roles.get(id)? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    /// All roles, ordered by id (seeded defaults first).
    pub fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let txn = self.db.begin_read()?;
        let roles = txn.open_table(ROLES_TABLE)?;

        let mut out: Vec<Role> = Vec::new();
        for entry in roles.iter()? {
            let (_, value) = entry?;
            out.push(decode(value.value())?);
        }
        out.sort_by_key(|r| r.id);
        Ok(out)
    }

    // ── Tasks ──────────────────────────────────────────────────

    /// Write a task record; create and update are the same operation. The
    /// whole record (assignment set included) lands in one transaction.
    pub fn put_task(&self, task: &TaskItem) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut tasks = txn.open_table(TASKS_TABLE)?;
            tasks.insert(task.id.as_bytes().as_slice(), encode(task)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<TaskItem>, StoreError> {
        let txn = self.db.begin_read()?;
        let tasks = txn.open_table(TASKS_TABLE)?;
        match tasks.get(id.as_bytes().as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    /// All task records (soft-deleted included; callers filter), newest
    /// creation first.
    pub fn list_tasks(&self) -> Result<Vec<TaskItem>, StoreError> {
        let txn = self.db.begin_read()?;
        let tasks = txn.open_table(TASKS_TABLE)?;

        let mut out: Vec<TaskItem> = Vec::new();
        for entry in tasks.iter()? {
            let (_, value) = entry?;
            out.push(decode(value.value())?);
        }
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    // ── Seeding ────────────────────────────────────────────────

    /// Seed the default roles if the role table is empty. Returns how many
    /// were created. Ids 1–4 are fixed; the counter continues after them.
    pub fn ensure_default_roles(&self) -> Result<usize, StoreError> {
        if !self.list_roles()?.is_empty() {
            return Ok(0);
        }

        let defaults = [
            (
                1,
                "Admin",
                "Full system administrator with all permissions",
                PermissionSet::all(),
            ),
            (
                2,
                "Director",
                "Department director with extensive permissions",
                PermissionSet {
                    can_delete_users: false,
                    can_manage_roles: false,
                    can_manage_permissions: false,
                    ..PermissionSet::all()
                },
            ),
            (
                3,
                "Division",
                "Division manager with task and user management for their division",
                PermissionSet {
                    can_delete_users: false,
                    can_manage_roles: false,
                    can_manage_permissions: false,
                    can_export_data: false,
                    ..PermissionSet::all()
                },
            ),
            (
                4,
                "User",
                "Regular user with basic task management",
                PermissionSet {
                    can_create_tasks: true,
                    ..PermissionSet::none()
                },
            ),
        ];

        let txn = self.db.begin_write()?;
        {
            let mut roles = txn.open_table(ROLES_TABLE)?;
            let mut by_name = txn.open_table(ROLE_NAME_INDEX)?;
            let mut meta = txn.open_table(META_TABLE)?;

            for (id, name, description, permissions) in &defaults {
                let role = Role {
                    id: *id,
                    name: (*name).to_string(),
                    description: Some((*description).to_string()),
                    permissions: *permissions,
                    created_at: Utc::now(),
                    updated_at: None,
                };
                roles.insert(role.id, encode(&role)?.as_slice())?;
                by_name.insert(role.name.as_str(), role.id)?;
            }
            meta.insert(
                NEXT_ROLE_ID_KEY,
                (DEFAULT_ROLE_COUNT + 1).to_le_bytes().as_slice(),
            )?;
        }
        txn.commit()?;

        Ok(defaults.len())
    }

    /// Seed the admin account from settings if no users exist. Returns true
    /// if created.
    pub fn ensure_default_admin(&self, settings: &Settings) -> Result<bool, StoreError> {
        if !self.list_users()?.is_empty() {
            return Ok(false);
        }

        use argon2::{
            password_hash::{rand_core::OsRng, SaltString},
            Argon2, PasswordHasher,
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(settings.default_admin_password.as_bytes(), &salt)
            .map_err(|e| StoreError::Encode(format!("password hash: {e}")))?
            .to_string();

        let admin = User::new(
            settings.default_admin_full_name.clone(),
            settings.default_admin_username.clone(),
            settings.default_admin_email.clone(),
            password_hash,
            1,
        );
        self.create_user(&admin)?;
        Ok(true)
    }
}

// ── Row encoding ───────────────────────────────────────────────

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    postcard::to_allocvec(value).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    postcard::from_bytes(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

fn decode_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    if bytes.len() == 4 {
        buf.copy_from_slice(bytes);
    }
    u32::from_le_bytes(buf)
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    Redb(String),
    Encode(String),
    Decode(String),
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Redb(e) => write!(f, "redb: {e}"),
            StoreError::Encode(e) => write!(f, "encode: {e}"),
            StoreError::Decode(e) => write!(f, "decode: {e}"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_priority::TaskPriority;
    use crate::task_status::TaskStatus;
    use std::fs;

    /// Create a temp database that auto-cleans.
    fn temp_context(name: &str) -> (DataContext, String) {
        let path = format!("/tmp/taskman_test_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path); // clean up any leftover
        let ctx = DataContext::new(&path).unwrap();
        (ctx, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn test_settings() -> Settings {
        Settings {
            tcp_socket_binding: "127.0.0.1".into(),
            tcp_socket_port: 0,
            database_path: String::new(),
            jwt_secret: "test-secret".into(),
            jwt_expiration_in_minutes: 120,
            default_admin_username: "admin".into(),
            default_admin_password: "admin123".into(),
            default_admin_email: "admin@taskmanager.com".into(),
            default_admin_full_name: "Administrator".into(),
        }
    }

    fn sample_user(username: &str, email: &str) -> User {
        User::new(
            "Test Person".into(),
            username.into(),
            email.into(),
            "hash".into(),
            4,
        )
    }

    #[test]
    fn seed_roles_and_admin_once() {
        let (ctx, path) = temp_context("seed");

        assert_eq!(ctx.ensure_default_roles().unwrap(), 4);
        assert!(ctx.ensure_default_admin(&test_settings()).unwrap());

        // Reopening-style second pass is a no-op
        assert_eq!(ctx.ensure_default_roles().unwrap(), 0);
        assert!(!ctx.ensure_default_admin(&test_settings()).unwrap());

        let roles = ctx.list_roles().unwrap();
        assert_eq!(roles.len(), 4);
        assert_eq!(roles[0].name, "Admin");
        assert!(roles[0].permissions.can_manage_roles);
        assert_eq!(roles[3].name, "User");
        assert!(roles[3].permissions.can_create_tasks);
        assert!(!roles[3].permissions.can_view_all_tasks);

        let admin = ctx.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.role_id, 1);
        assert!(admin.is_active);

        cleanup(&path);
    }

    #[test]
    fn role_ids_continue_after_the_seeded_defaults() {
        let (ctx, path) = temp_context("role_ids");
        ctx.ensure_default_roles().unwrap();

        let first = ctx
            .create_role("Auditor".into(), None, PermissionSet::none())
            .unwrap();
        let second = ctx
            .create_role("Support".into(), None, PermissionSet::none())
            .unwrap();
        assert_eq!(first.id, 5);
        assert_eq!(second.id, 6);

        cleanup(&path);
    }

    #[test]
    fn user_lookup_by_username_and_email() {
        let (ctx, path) = temp_context("user_lookup");

        let user = sample_user("jane", "jane@example.com");
        ctx.create_user(&user).unwrap();

        assert_eq!(
            ctx.get_user_by_username("jane").unwrap().unwrap().id,
            user.id
        );
        assert_eq!(
            ctx.get_user_by_email("jane@example.com").unwrap().unwrap().id,
            user.id
        );
        assert!(ctx.get_user_by_username("john").unwrap().is_none());

        cleanup(&path);
    }

    #[test]
    fn email_change_moves_the_index_entry() {
        let (ctx, path) = temp_context("email_reindex");

        let mut user = sample_user("jane", "jane@example.com");
        ctx.create_user(&user).unwrap();

        let previous = user.email.clone();
        user.email = "jane.d@example.com".into();
        ctx.update_user(&user, &previous).unwrap();

        assert!(ctx.get_user_by_email("jane@example.com").unwrap().is_none());
        assert!(ctx.get_user_by_email("jane.d@example.com").unwrap().is_some());

        cleanup(&path);
    }

    #[test]
    fn role_rename_and_delete_maintain_the_name_index() {
        let (ctx, path) = temp_context("role_index");
        ctx.ensure_default_roles().unwrap();

        let mut role = ctx
            .create_role("Auditor".into(), None, PermissionSet::none())
            .unwrap();
        let previous = role.name.clone();
        role.name = "Compliance".into();
        ctx.update_role(&role, &previous).unwrap();

        assert!(ctx.get_role_by_name("Auditor").unwrap().is_none());
        assert_eq!(
            ctx.get_role_by_name("Compliance").unwrap().unwrap().id,
            role.id
        );

        assert!(ctx.delete_role(role.id).unwrap());
        assert!(ctx.get_role_by_name("Compliance").unwrap().is_none());
        assert!(!ctx.delete_role(role.id).unwrap());

        cleanup(&path);
    }

    #[test]
    fn tasks_round_trip_and_list_newest_first() {
        let (ctx, path) = temp_context("tasks");

        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let now = Utc::now();
        let mut older = TaskItem {
            id: Uuid::new_v4(),
            title: "Older".into(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Low,
            category: None,
            due_date: now,
            created_by: creator,
            assigned_users: vec![assignee, creator],
            created_at: now - chrono::Duration::hours(1),
            updated_at: None,
            completed_at: None,
            estimated_hours: Some(3),
            actual_hours: None,
            is_deleted: false,
        };
        let newer = TaskItem {
            id: Uuid::new_v4(),
            title: "Newer".into(),
            created_at: now,
            ..older.clone()
        };
        ctx.put_task(&older).unwrap();
        ctx.put_task(&newer).unwrap();

        let listed = ctx.list_tasks().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Newer");
        assert_eq!(listed[1].title, "Older");

        let loaded = ctx.get_task(older.id).unwrap().unwrap();
        assert_eq!(loaded.assigned_users, vec![assignee, creator]);
        assert_eq!(loaded.estimated_hours, Some(3));

        // Rewrite overwrites in place
        older.title = "Older, renamed".into();
        ctx.put_task(&older).unwrap();
        assert_eq!(ctx.get_task(older.id).unwrap().unwrap().title, "Older, renamed");
        assert_eq!(ctx.list_tasks().unwrap().len(), 2);

        cleanup(&path);
    }
}
