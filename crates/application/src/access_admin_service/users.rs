use super::*;

use crate::access_ports::{CreateUserInput, UpdateUserInput};

impl AccessAdminService {
    /// Returns the users visible to the actor.
    pub async fn list_users(&self, actor_id: UserId) -> AppResult<Vec<User>> {
        let actor = self
            .authorize(actor_id, Action::Read, Subject::users())
            .await?;

        let mut users = self.authorization.get_accessible_users(&actor).await?;
        crate::user_directory::sort_by_name(&mut users);
        Ok(users)
    }

    /// Creates a user and emits an audit event.
    ///
    /// The new user's role may not rank above the actor's own role.
    pub async fn create_user(&self, actor_id: UserId, input: CreateUserInput) -> AppResult<User> {
        let actor = self
            .authorize(actor_id, Action::Create, Subject::users())
            .await?;
        self.require_assignable_role(&actor, input.role_id).await?;

        let user = self.directory.create_user(input).await?;

        self.record(
            &actor,
            AuditAction::UserCreated,
            "access_user",
            user.id().to_string(),
            format!("created user '{}'", user.email().as_str()),
        )
        .await?;

        Ok(user)
    }

    /// Updates a user the actor can see and emits an audit event.
    pub async fn update_user(
        &self,
        actor_id: UserId,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<User> {
        let actor = self
            .authorize(actor_id, Action::Update, Subject::users())
            .await?;
        self.require_accessible(&actor, user_id).await?;
        if let Some(role_id) = input.role_id {
            self.require_assignable_role(&actor, role_id).await?;
        }

        let user = self.directory.update_user(user_id, input).await?;

        self.record(
            &actor,
            AuditAction::UserUpdated,
            "access_user",
            user.id().to_string(),
            format!("updated user '{}'", user.email().as_str()),
        )
        .await?;

        Ok(user)
    }

    /// Moves a user the actor can see to another role and emits an audit
    /// event.
    pub async fn assign_role(
        &self,
        actor_id: UserId,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<User> {
        let actor = self
            .authorize(actor_id, Action::Update, Subject::users())
            .await?;
        self.require_accessible(&actor, user_id).await?;
        let role = self.require_assignable_role(&actor, role_id).await?;

        let user = self
            .directory
            .update_user(
                user_id,
                UpdateUserInput {
                    role_id: Some(role_id),
                    ..UpdateUserInput::default()
                },
            )
            .await?;

        self.record(
            &actor,
            AuditAction::UserRoleAssigned,
            "access_user",
            user.id().to_string(),
            format!(
                "assigned role '{}' to '{}'",
                role.name(),
                user.email().as_str()
            ),
        )
        .await?;

        Ok(user)
    }

    /// Deletes a user the actor can see and emits an audit event.
    pub async fn delete_user(&self, actor_id: UserId, user_id: UserId) -> AppResult<()> {
        let actor = self
            .authorize(actor_id, Action::Delete, Subject::users())
            .await?;
        if actor.id() == user_id {
            return Err(AppError::Conflict(
                "users cannot delete their own account".to_owned(),
            ));
        }
        let user = self.require_accessible(&actor, user_id).await?;

        self.directory.delete_user(user_id).await?;

        self.record(
            &actor,
            AuditAction::UserDeleted,
            "access_user",
            user_id.to_string(),
            format!("deleted user '{}'", user.email().as_str()),
        )
        .await
    }
}
