//! User domain types and validation rules.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use talentgate_core::{AppError, AppResult, NonEmptyString};
use uuid::Uuid;

use crate::role::RoleId;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Directory entry for a person using the tracking system.
///
/// The manager link is the only stored edge of the team graph; a manager's
/// team members are derived from the reports that point at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: NonEmptyString,
    email: EmailAddress,
    role_id: RoleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manager_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user stamped with `now` for both timestamps.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        role_id: RoleId,
        department: Option<String>,
        manager_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        if manager_id == Some(id) {
            return Err(AppError::Conflict(format!("user '{id}' cannot manage itself")));
        }

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            email: EmailAddress::new(email)?,
            role_id,
            department: normalize_department(department),
            manager_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the assigned role.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the optional department.
    #[must_use]
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// Returns the direct manager, if any.
    #[must_use]
    pub fn manager_id(&self) -> Option<UserId> {
        self.manager_id
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

    /// Replaces the display name.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name)?;
        Ok(())
    }

    /// Replaces the email address.
    pub fn change_email(&mut self, email: impl Into<String>) -> AppResult<()> {
        self.email = EmailAddress::new(email)?;
        Ok(())
    }

    /// Reassigns the role.
    pub fn assign_role(&mut self, role_id: RoleId) {
        self.role_id = role_id;
    }

    /// Replaces the department. Blank values are stored as absent.
    pub fn set_department(&mut self, department: Option<String>) {
        self.department = normalize_department(department);
    }

    /// Replaces the direct manager.
    pub fn set_manager(&mut self, manager_id: Option<UserId>) -> AppResult<()> {
        if manager_id == Some(self.id) {
            return Err(AppError::Conflict(format!(
                "user '{}' cannot manage itself",
                self.id
            )));
        }

        self.manager_id = manager_id;
        Ok(())
    }

    /// Records a modification. The update timestamp never moves backwards
    /// and changes on every call.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at + TimeDelta::nanoseconds(1));
    }
}

fn normalize_department(department: Option<String>) -> Option<String> {
    department
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
