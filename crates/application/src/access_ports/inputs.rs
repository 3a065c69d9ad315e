use serde::{Deserialize, Serialize};

use talentgate_domain::{Permission, RoleId, UserId};

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Hierarchy level, at least 1.
    pub level: u32,
    /// Grants to attach to the role. Duplicated pairs are rejected.
    pub permissions: Vec<Permission>,
    /// Marks the role as built-in and therefore non-deletable.
    pub is_system_role: bool,
}

/// Partial update for an existing role. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New unique name.
    pub name: Option<String>,
    /// New description; a blank value clears it.
    pub description: Option<String>,
    /// New hierarchy level.
    pub level: Option<u32>,
    /// Replacement grant list.
    pub permissions: Option<Vec<Permission>>,
}

/// One rung of the built-in role ladder.
///
/// Ladders are listed from the least to the most senior role; levels are
/// assigned from that position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRoleSeed {
    /// Role name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Grants attached to the role.
    pub permissions: Vec<Permission>,
}

/// Input payload for creating users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Assigned role; must exist.
    pub role_id: RoleId,
    /// Optional department label.
    pub department: Option<String>,
    /// Optional direct manager; must exist.
    pub manager_id: Option<UserId>,
}

/// Change applied to a user's manager link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManagerUpdate {
    /// Leaves the manager untouched.
    #[default]
    Keep,
    /// Removes the manager.
    Clear,
    /// Sets a new manager.
    Assign(UserId),
}

/// Partial update for an existing user. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// New display name.
    pub name: Option<String>,
    /// New unique email address.
    pub email: Option<String>,
    /// New role; must exist.
    pub role_id: Option<RoleId>,
    /// New department; a blank value clears it.
    pub department: Option<String>,
    /// Manager link change.
    pub manager: ManagerUpdate,
}
