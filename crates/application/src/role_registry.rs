//! Role lifecycle management.

mod seed;


use std::sync::Arc;

use chrono::Utc;
use talentgate_core::{AppError, AppResult};
use talentgate_domain::{PermissionSet, Role, RoleId, RoleLevel};
use tracing::info;

use crate::access_ports::{CreateRoleInput, RoleRepository, UpdateRoleInput};

pub use seed::default_role_ladder;

/// Application service owning built-in and custom roles.
#[derive(Clone)]
pub struct RoleRegistry {
    repository: Arc<dyn RoleRepository>,
}

impl RoleRegistry {
    /// Creates a registry over a role repository.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Returns all roles, most senior first and then by name.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles = self.repository.list_roles().await?;
        sort_by_seniority(&mut roles);
        Ok(roles)
    }

    /// Returns one role or `NotFound`.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    /// Finds a role by name, ignoring case.
    pub async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.repository.find_role_by_name(name).await
    }

    /// Returns the highest level held by any role.
    pub async fn max_level(&self) -> AppResult<Option<RoleLevel>> {
        Ok(self
            .repository
            .list_roles()
            .await?
            .iter()
            .map(Role::level)
            .max())
    }

    /// Creates a role with a fresh identifier and timestamps.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let level = RoleLevel::new(input.level)?;
        let permissions = PermissionSet::new(input.permissions)?;
        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            level,
            permissions,
            input.is_system_role,
            Utc::now(),
        )?;

        self.ensure_name_available(role.name().as_str(), None)
            .await?;
        self.repository.insert_role(role.clone()).await?;

        info!(
            role_id = %role.id(),
            role_name = role.name().as_str(),
            level = role.level().value(),
            permission_count = role.permissions().len(),
            is_system_role = role.is_system_role(),
            "role created"
        );

        Ok(role)
    }

    /// Merges the provided fields into a role and bumps its update timestamp.
    ///
    /// System roles stay editable; only their deletion is blocked.
    pub async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let mut role = self.get_role(role_id).await?;
        let read_at = role.updated_at();

        if let Some(name) = input.name {
            role.rename(name)?;
            self.ensure_name_available(role.name().as_str(), Some(role_id))
                .await?;
        }
        if let Some(description) = input.description {
            role.set_description(Some(description));
        }
        if let Some(level) = input.level {
            role.set_level(RoleLevel::new(level)?);
        }
        if let Some(permissions) = input.permissions {
            role.set_permissions(PermissionSet::new(permissions)?);
        }
        role.touch(Utc::now());

        self.repository.update_role(role.clone(), read_at).await?;

        info!(
            role_id = %role.id(),
            role_name = role.name().as_str(),
            level = role.level().value(),
            permission_count = role.permissions().len(),
            "role updated"
        );

        Ok(role)
    }

    /// Deletes a custom role that no user references.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let role = self.get_role(role_id).await?;
        if role.is_system_role() {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name()
            )));
        }

        self.repository.delete_role(role_id).await?;

        info!(role_id = %role_id, role_name = role.name().as_str(), "role deleted");
        Ok(())
    }

    async fn ensure_name_available(&self, name: &str, owner: Option<RoleId>) -> AppResult<()> {
        match self.repository.find_role_by_name(name).await? {
            Some(existing) if Some(existing.id()) != owner => Err(AppError::Conflict(format!(
                "role name '{name}' is already in use"
            ))),
            _ => Ok(()),
        }
    }
}

pub(crate) fn sort_by_seniority(roles: &mut [Role]) {
    roles.sort_by(|left, right| {
        right
            .level()
            .cmp(&left.level())
            .then_with(|| left.name().as_str().cmp(right.name().as_str()))
    });
}
