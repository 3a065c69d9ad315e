use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use talentgate_application::{RoleRepository, UserRepository};
use talentgate_core::{AppError, AppResult};
use talentgate_domain::{Role, RoleId, TeamGraph, User, UserId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::AccessSnapshot;

mod roles;
mod users;


#[derive(Debug, Default)]
struct AccessState {
    roles: HashMap<RoleId, Role>,
    users: HashMap<UserId, User>,
}

/// In-memory role and user store.
///
/// Roles and users share one lock so that cross-entity checks, such as
/// refusing to delete a role that is still assigned, see a consistent view.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    state: RwLock<AccessState>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the contents of a validated snapshot.
    pub fn from_snapshot(snapshot: AccessSnapshot) -> AppResult<Self> {
        snapshot.validate()?;

        let state = AccessState {
            roles: snapshot
                .roles
                .into_iter()
                .map(|role| (role.id(), role))
                .collect(),
            users: snapshot
                .users
                .into_iter()
                .map(|user| (user.id(), user))
                .collect(),
        };
        debug!(
            roles = state.roles.len(),
            users = state.users.len(),
            "in-memory access store restored"
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Captures the current contents, roles from least to most senior and
    /// users by name.
    pub async fn snapshot(&self) -> AccessSnapshot {
        let state = self.state.read().await;

        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|left, right| {
            left.level()
                .cmp(&right.level())
                .then_with(|| left.name().as_str().cmp(right.name().as_str()))
        });
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().cmp(&right.id()))
        });

        AccessSnapshot { roles, users }
    }
}

#[async_trait]
impl RoleRepository for InMemoryAccessRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.state.read().await.roles.get(&role_id).cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.find_role_by_name_impl(name).await
    }

    async fn insert_role(&self, role: Role) -> AppResult<()> {
        self.insert_role_impl(role).await
    }

    async fn update_role(&self, role: Role, expected_updated_at: DateTime<Utc>) -> AppResult<()> {
        self.update_role_impl(role, expected_updated_at).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }
}

#[async_trait]
impl UserRepository for InMemoryAccessRepository {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.list_users_impl().await
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_user_by_email_impl(email).await
    }

    async fn insert_user(&self, user: User) -> AppResult<()> {
        self.insert_user_impl(user).await
    }

    async fn update_user(&self, user: User, expected_updated_at: DateTime<Utc>) -> AppResult<()> {
        self.update_user_impl(user, expected_updated_at).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.delete_user_impl(user_id).await
    }
}
