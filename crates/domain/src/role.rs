//! Role entity and hierarchy level.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use talentgate_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::permission::{Action, PermissionSet, Subject};

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Position of a role in the authority ladder. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoleLevel(u32);

impl RoleLevel {
    /// Lowest valid level.
    pub const MIN: Self = Self(1);

    /// Creates a validated level.
    pub fn new(value: u32) -> AppResult<Self> {
        if value < Self::MIN.0 {
            return Err(AppError::Validation(format!(
                "role level must be at least {}, got {value}",
                Self::MIN.0
            )));
        }

        Ok(Self(value))
    }

    /// Returns the numeric level.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns whether a holder of this level may see a holder of `other`.
    #[must_use]
    pub fn covers(&self, other: RoleLevel) -> bool {
        self.0 >= other.0
    }
}

impl TryFrom<u32> for RoleLevel {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleLevel> for u32 {
    fn from(value: RoleLevel) -> Self {
        value.0
    }
}

impl Display for RoleLevel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Named bundle of permissions with a hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: Option<String>,
    level: RoleLevel,
    permissions: PermissionSet,
    is_system_role: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a role stamped with `now` for both timestamps.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: Option<String>,
        level: RoleLevel,
        permissions: PermissionSet,
        is_system_role: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: normalize_description(description),
            level,
            permissions,
            is_system_role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the stable identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the hierarchy level.
    #[must_use]
    pub fn level(&self) -> RoleLevel {
        self.level
    }

    /// Returns the explicit grants.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether the role was seeded at initialization.
    #[must_use]
    pub fn is_system_role(&self) -> bool {
        self.is_system_role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the role explicitly grants the action on the subject.
    #[must_use]
    pub fn allows(&self, action: Action, subject: &Subject) -> bool {
        self.permissions.allows(action, subject)
    }

    /// Returns whether two roles carry the same name, ignoring case.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_str().eq_ignore_ascii_case(name.trim())
    }

    /// Replaces the display name.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name)?;
        Ok(())
    }

    /// Replaces the description. Blank descriptions are stored as absent.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = normalize_description(description);
    }

    /// Replaces the hierarchy level.
    pub fn set_level(&mut self, level: RoleLevel) {
        self.level = level;
    }

    /// Replaces the grants.
    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = permissions;
    }

    /// Records a modification. The update timestamp never moves backwards
    /// and changes on every call.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at + TimeDelta::nanoseconds(1));
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
