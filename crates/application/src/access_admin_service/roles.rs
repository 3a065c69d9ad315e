use super::*;

use crate::access_ports::{CreateRoleInput, UpdateRoleInput};

impl AccessAdminService {
    /// Returns all roles for users allowed to read them.
    pub async fn list_roles(&self, actor_id: UserId) -> AppResult<Vec<Role>> {
        self.authorize(actor_id, Action::Read, Subject::roles())
            .await?;
        self.registry.list_roles().await
    }

    /// Creates a role and emits an audit event.
    pub async fn create_role(&self, actor_id: UserId, input: CreateRoleInput) -> AppResult<Role> {
        let actor = self
            .authorize(actor_id, Action::Create, Subject::roles())
            .await?;
        self.require_level_within_reach(&actor, input.level).await?;

        let role = self.registry.create_role(input).await?;

        self.record(
            &actor,
            AuditAction::RoleCreated,
            "access_role",
            role.id().to_string(),
            format!("created role '{}' at level {}", role.name(), role.level().value()),
        )
        .await?;

        Ok(role)
    }

    /// Updates a role and emits an audit event.
    pub async fn update_role(
        &self,
        actor_id: UserId,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        let actor = self
            .authorize(actor_id, Action::Update, Subject::roles())
            .await?;
        let current = self.registry.get_role(role_id).await?;
        self.require_level_within_reach(&actor, current.level().value())
            .await?;
        if let Some(level) = input.level {
            self.require_level_within_reach(&actor, level).await?;
        }

        let role = self.registry.update_role(role_id, input).await?;

        self.record(
            &actor,
            AuditAction::RoleUpdated,
            "access_role",
            role.id().to_string(),
            format!(
                "updated role '{}' ({} permission(s))",
                role.name(),
                role.permissions().len()
            ),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a role and emits an audit event.
    pub async fn delete_role(&self, actor_id: UserId, role_id: RoleId) -> AppResult<()> {
        let actor = self
            .authorize(actor_id, Action::Delete, Subject::roles())
            .await?;

        let role = self.registry.get_role(role_id).await?;
        self.registry.delete_role(role_id).await?;

        self.record(
            &actor,
            AuditAction::RoleDeleted,
            "access_role",
            role_id.to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await
    }
}
