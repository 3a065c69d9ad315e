//! User CRUD and team-graph traversal.

mod team;


use std::sync::Arc;

use chrono::Utc;
use talentgate_core::{AppError, AppResult};
use talentgate_domain::{EmailAddress, RoleId, TeamGraph, User, UserId};
use tracing::info;

use crate::access_ports::{
    CreateUserInput, ManagerUpdate, RoleRepository, UpdateUserInput, UserRepository,
};

/// Application service owning users and their reporting lines.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl UserDirectory {
    /// Creates a directory over user and role repositories.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { users, roles }
    }

    /// Returns all users ordered by name.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let mut users = self.users.list_users().await?;
        sort_by_name(&mut users);
        Ok(users)
    }

    /// Returns one user or `NotFound`.
    pub async fn get_user(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    /// Finds a user by email address.
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = EmailAddress::new(email)?;
        self.users.find_user_by_email(email.as_str()).await
    }

    /// Creates a user referencing an existing role and, optionally, manager.
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        let user = User::new(
            UserId::new(),
            input.name,
            input.email,
            input.role_id,
            input.department,
            input.manager_id,
            Utc::now(),
        )?;

        self.ensure_role_exists(user.role_id()).await?;
        if let Some(manager_id) = user.manager_id() {
            self.ensure_manager_exists(manager_id).await?;
        }
        self.ensure_email_available(&user).await?;

        self.users.insert_user(user.clone()).await?;

        info!(
            user_id = %user.id(),
            role_id = %user.role_id(),
            manager_id = ?user.manager_id().map(|id| id.to_string()),
            "user created"
        );

        Ok(user)
    }

    /// Merges the provided fields into a user and bumps its update timestamp.
    pub async fn update_user(&self, user_id: UserId, input: UpdateUserInput) -> AppResult<User> {
        let mut user = self.get_user(user_id).await?;
        let read_at = user.updated_at();

        if let Some(name) = input.name {
            user.rename(name)?;
        }
        if let Some(email) = input.email {
            user.change_email(email)?;
            self.ensure_email_available(&user).await?;
        }
        if let Some(role_id) = input.role_id {
            self.ensure_role_exists(role_id).await?;
            user.assign_role(role_id);
        }
        if let Some(department) = input.department {
            user.set_department(Some(department));
        }
        match input.manager {
            ManagerUpdate::Keep => {}
            ManagerUpdate::Clear => user.set_manager(None)?,
            ManagerUpdate::Assign(manager_id) => {
                self.ensure_manager_exists(manager_id).await?;
                self.team_graph()
                    .await?
                    .ensure_manager_assignable(user_id, manager_id)?;
                user.set_manager(Some(manager_id))?;
            }
        }
        user.touch(Utc::now());

        self.users.update_user(user.clone(), read_at).await?;

        info!(
            user_id = %user.id(),
            role_id = %user.role_id(),
            manager_id = ?user.manager_id().map(|id| id.to_string()),
            "user updated"
        );

        Ok(user)
    }

    /// Deletes a user that no longer manages anyone.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        let user = self.get_user(user_id).await?;
        let reports = self.team_graph().await?.direct_reports(user_id);
        if !reports.is_empty() {
            return Err(AppError::Conflict(format!(
                "user '{}' still manages {} user(s); reassign them first",
                user.name(),
                reports.len()
            )));
        }

        self.users.delete_user(user_id).await?;

        info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: RoleId) -> AppResult<()> {
        if self.roles.find_role(role_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "role '{role_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn ensure_manager_exists(&self, manager_id: UserId) -> AppResult<()> {
        if self.users.find_user(manager_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "manager '{manager_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn ensure_email_available(&self, user: &User) -> AppResult<()> {
        match self.users.find_user_by_email(user.email().as_str()).await? {
            Some(existing) if existing.id() != user.id() => Err(AppError::Conflict(format!(
                "email '{}' is already in use",
                user.email().as_str()
            ))),
            _ => Ok(()),
        }
    }

    async fn team_graph(&self) -> AppResult<TeamGraph> {
        let users = self.users.list_users().await?;
        Ok(TeamGraph::from_users(users.iter()))
    }
}

pub(crate) fn sort_by_name(users: &mut [User]) {
    users.sort_by(|left, right| {
        left.name()
            .as_str()
            .cmp(right.name().as_str())
            .then_with(|| left.id().cmp(&right.id()))
    });
}
