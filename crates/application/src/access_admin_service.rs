//! Permission-guarded role and user administration.

mod roles;
mod users;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use talentgate_core::{AppError, AppResult};
use talentgate_domain::{Action, AuditAction, Role, RoleId, RoleLevel, Subject, User, UserId};

use crate::access_ports::{AuditEvent, AuditRepository};
use crate::{AuthorizationService, RoleRegistry, UserDirectory};

/// Application service that checks the acting user's permissions before
/// delegating to the registry and the directory, then records an audit event.
#[derive(Clone)]
pub struct AccessAdminService {
    authorization: AuthorizationService,
    registry: RoleRegistry,
    directory: UserDirectory,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AccessAdminService {
    /// Creates a new administration service.
    #[must_use]
    pub fn new(
        authorization: AuthorizationService,
        registry: RoleRegistry,
        directory: UserDirectory,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization,
            registry,
            directory,
            audit_repository,
        }
    }

    async fn resolve_actor(&self, actor_id: UserId) -> AppResult<User> {
        match self.directory.get_user(actor_id).await {
            Ok(actor) => Ok(actor),
            Err(AppError::NotFound(_)) => Err(AppError::Unauthorized(format!(
                "acting user '{actor_id}' is not known"
            ))),
            Err(error) => Err(error),
        }
    }

    async fn authorize(
        &self,
        actor_id: UserId,
        action: Action,
        subject: Subject,
    ) -> AppResult<User> {
        let actor = self.resolve_actor(actor_id).await?;
        self.authorization
            .require_permission(&actor, action, &subject)
            .await?;
        Ok(actor)
    }

    async fn require_accessible(&self, actor: &User, target_id: UserId) -> AppResult<User> {
        let target = self.directory.get_user(target_id).await?;
        if self.authorization.can_access_user(actor, target_id).await? {
            return Ok(target);
        }

        Err(AppError::Forbidden(format!(
            "user '{}' cannot manage user '{target_id}'",
            actor.email().as_str()
        )))
    }

    async fn require_assignable_role(&self, actor: &User, role_id: RoleId) -> AppResult<Role> {
        let role = match self.registry.get_role(role_id).await {
            Ok(role) => role,
            Err(AppError::NotFound(message)) => return Err(AppError::Validation(message)),
            Err(error) => return Err(error),
        };
        let actor_role = self.authorization.role_for_user(actor).await?;

        if actor_role.is_some_and(|actor_role| actor_role.level().covers(role.level())) {
            return Ok(role);
        }

        Err(AppError::Forbidden(format!(
            "user '{}' cannot grant role '{}' above their own level",
            actor.email().as_str(),
            role.name()
        )))
    }

    async fn require_level_within_reach(&self, actor: &User, level: u32) -> AppResult<()> {
        let level = RoleLevel::new(level)?;
        let actor_role = self.authorization.role_for_user(actor).await?;

        if actor_role.is_some_and(|actor_role| actor_role.level().covers(level)) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' cannot manage roles above their own level",
            actor.email().as_str()
        )))
    }

    async fn record(
        &self,
        actor: &User,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.id().to_string(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
