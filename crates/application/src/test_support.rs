use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use talentgate_core::{AppError, AppResult};
use talentgate_domain::{Role, RoleId, TeamGraph, User, UserId};

use crate::access_ports::{AuditEvent, AuditRepository, RoleRepository, UserRepository};

#[derive(Default)]
pub(crate) struct FakeAccessStore {
    roles: Mutex<Vec<Role>>,
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl RoleRepository for FakeAccessStore {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.has_name(name))
            .cloned())
    }

    async fn insert_role(&self, role: Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles.iter().any(|stored| stored.has_name(role.name().as_str())) {
            return Err(AppError::Conflict("duplicate role".to_owned()));
        }
        roles.push(role);
        Ok(())
    }

    async fn update_role(&self, role: Role, expected_updated_at: DateTime<Utc>) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let stored = roles
            .iter_mut()
            .find(|stored| stored.id() == role.id())
            .ok_or_else(|| AppError::NotFound("role".to_owned()))?;
        if stored.updated_at() != expected_updated_at {
            return Err(AppError::Conflict("stale role".to_owned()));
        }
        *stored = role;
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let users = self.users.lock().await;
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound("role".to_owned()))?;
        if role.is_system_role() {
            return Err(AppError::Forbidden("system role".to_owned()));
        }
        if users.iter().any(|user| user.role_id() == role_id) {
            return Err(AppError::Conflict("role in use".to_owned()));
        }
        roles.retain(|role| role.id() != role_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeAccessStore {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().await.clone())
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id() == user_id)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email().as_str() == email)
            .cloned())
    }

    async fn insert_user(&self, user: User) -> AppResult<()> {
        self.users.lock().await.push(user);
        Ok(())
    }

    async fn update_user(&self, user: User, expected_updated_at: DateTime<Utc>) -> AppResult<()> {
        let mut users = self.users.lock().await;
        if let Some(manager_id) = user.manager_id() {
            TeamGraph::from_users(users.iter()).ensure_manager_assignable(user.id(), manager_id)?;
        }
        let stored = users
            .iter_mut()
            .find(|stored| stored.id() == user.id())
            .ok_or_else(|| AppError::NotFound("user".to_owned()))?;
        if stored.updated_at() != expected_updated_at {
            return Err(AppError::Conflict("stale user".to_owned()));
        }
        *stored = user;
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.users.lock().await.retain(|user| user.id() != user_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}
