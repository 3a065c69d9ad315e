use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by access administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a custom role is created.
    RoleCreated,
    /// Emitted when a role's name, description, level or grants change.
    RoleUpdated,
    /// Emitted when a custom role is deleted.
    RoleDeleted,
    /// Emitted when a user is added to the directory.
    UserCreated,
    /// Emitted when a user's profile or manager changes.
    UserUpdated,
    /// Emitted when a user is moved to another role.
    UserRoleAssigned,
    /// Emitted when a user is removed from the directory.
    UserDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "access.role.created",
            Self::RoleUpdated => "access.role.updated",
            Self::RoleDeleted => "access.role.deleted",
            Self::UserCreated => "access.user.created",
            Self::UserUpdated => "access.user.updated",
            Self::UserRoleAssigned => "access.user.role_assigned",
            Self::UserDeleted => "access.user.deleted",
        }
    }
}
