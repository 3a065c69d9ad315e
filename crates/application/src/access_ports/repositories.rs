use async_trait::async_trait;
use chrono::{DateTime, Utc};

use talentgate_core::AppResult;
use talentgate_domain::{Role, RoleId, User, UserId};

/// Repository port for role storage.
///
/// Implementations that also store users must evaluate the cross-entity
/// checks of [`RoleRepository::delete_role`] and [`UserRepository`] writes
/// atomically with respect to each other.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every stored role.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by name, ignoring case.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Stores a new role. Fails with `Conflict` on a duplicate id or name.
    async fn insert_role(&self, role: Role) -> AppResult<()>;

    /// Replaces a stored role whose `updated_at` still equals
    /// `expected_updated_at`. Fails with `NotFound` for unknown ids and
    /// `Conflict` when the stored role changed since it was read or the new
    /// name belongs to another role.
    async fn update_role(&self, role: Role, expected_updated_at: DateTime<Utc>) -> AppResult<()>;

    /// Removes a role. Fails with `NotFound` for unknown ids, `Forbidden` for
    /// system roles and `Conflict` while any user references the role.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;
}

/// Repository port for the user directory.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists every stored user.
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Finds a user by identifier.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>>;

    /// Finds a user by normalized email address.
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Stores a new user. Fails with `Validation` when the role or manager
    /// does not exist and `Conflict` on a duplicate id or email.
    async fn insert_user(&self, user: User) -> AppResult<()>;

    /// Replaces a stored user whose `updated_at` still equals
    /// `expected_updated_at`. Fails with `NotFound` for unknown ids,
    /// `Validation` when the role or manager does not exist and `Conflict`
    /// when the stored user changed since it was read, on a duplicate email
    /// or a reporting cycle.
    async fn update_user(&self, user: User, expected_updated_at: DateTime<Utc>) -> AppResult<()>;

    /// Removes a user. Fails with `NotFound` for unknown ids and `Conflict`
    /// while other users report to it.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;
}
