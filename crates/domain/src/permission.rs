//! Permission vocabulary: actions, subjects and `(action, subject)` grants.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use talentgate_core::{AppError, AppResult};

/// Subjects every deployment knows about.
pub const KNOWN_SUBJECTS: &[&str] = &[
    "candidates",
    "jobs",
    "interviews",
    "users",
    "roles",
    "settings",
    "reports",
    "recruitment",
];

/// Mutation or read verb applied to a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new records.
    Create,
    /// Read existing records.
    Read,
    /// Update existing records.
    Update,
    /// Delete existing records.
    Delete,
}

impl Action {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns all actions in declaration order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Action] = &[Action::Create, Action::Read, Action::Update, Action::Delete];

        ALL
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(AppError::Validation(format!("unknown action '{other}'"))),
        }
    }
}

impl Display for Action {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Protected resource category.
///
/// Subjects form an open vocabulary: any lowercase token made of ASCII
/// letters, digits, `_` and `-` that starts with a letter is accepted, so new
/// resource categories need no engine change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    /// Creates a validated subject, normalising case and surrounding whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_ascii_lowercase();

        let mut characters = value.chars();
        let starts_with_letter = characters
            .next()
            .map(|first| first.is_ascii_lowercase())
            .unwrap_or(false);
        let rest_is_valid = characters.all(|character| {
            character.is_ascii_lowercase()
                || character.is_ascii_digit()
                || character == '_'
                || character == '-'
        });

        if !starts_with_letter || !rest_is_valid {
            return Err(AppError::Validation(format!(
                "subject '{value}' must start with a letter and contain only [a-z0-9_-]"
            )));
        }

        Ok(Self(value))
    }

    /// Candidate records.
    #[must_use]
    pub fn candidates() -> Self {
        Self("candidates".to_owned())
    }

    /// Job postings.
    #[must_use]
    pub fn jobs() -> Self {
        Self("jobs".to_owned())
    }

    /// Interview schedules.
    #[must_use]
    pub fn interviews() -> Self {
        Self("interviews".to_owned())
    }

    /// User accounts.
    #[must_use]
    pub fn users() -> Self {
        Self("users".to_owned())
    }

    /// Role definitions.
    #[must_use]
    pub fn roles() -> Self {
        Self("roles".to_owned())
    }

    /// Application settings.
    #[must_use]
    pub fn settings() -> Self {
        Self("settings".to_owned())
    }

    /// Analytics reports.
    #[must_use]
    pub fn reports() -> Self {
        Self("reports".to_owned())
    }

    /// Returns the well-known subjects in their canonical order.
    #[must_use]
    pub fn known() -> Vec<Self> {
        KNOWN_SUBJECTS
            .iter()
            .map(|value| Self((*value).to_owned()))
            .collect()
    }

    /// Returns whether the subject is part of the well-known vocabulary.
    #[must_use]
    pub fn is_well_known(&self) -> bool {
        KNOWN_SUBJECTS.contains(&self.0.as_str())
    }

    /// Returns the subject token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Subject {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.0
    }
}

impl Display for Subject {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Atomic grant: one action on one subject.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Permission {
    action: Action,
    subject: Subject,
}

impl Permission {
    /// Creates a permission from its parts.
    #[must_use]
    pub fn new(action: Action, subject: Subject) -> Self {
        Self { action, subject }
    }

    /// Parses a permission from raw action and subject values.
    pub fn parse(action: &str, subject: &str) -> AppResult<Self> {
        Ok(Self::new(Action::from_str(action)?, Subject::new(subject)?))
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the protected subject.
    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Returns whether this grant covers the requested action and subject.
    #[must_use]
    pub fn matches(&self, action: Action, subject: &Subject) -> bool {
        self.action == action && &self.subject == subject
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.action, self.subject)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    /// Parses the `action:subject` transport form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (action, subject) = value.split_once(':').ok_or_else(|| {
            AppError::Validation(format!(
                "permission '{value}' must use the 'action:subject' form"
            ))
        })?;

        Self::parse(action, subject)
    }
}

/// Duplicate-free set of permissions attached to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Permission>", into = "Vec<Permission>")]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Creates a set from a list, rejecting structurally duplicated pairs.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> AppResult<Self> {
        let mut set = BTreeSet::new();
        for permission in permissions {
            if set.contains(&permission) {
                return Err(AppError::Validation(format!(
                    "permission '{permission}' is listed more than once"
                )));
            }
            set.insert(permission);
        }

        Ok(Self(set))
    }

    /// Returns whether the set grants the action on the subject.
    #[must_use]
    pub fn allows(&self, action: Action, subject: &Subject) -> bool {
        self.0
            .iter()
            .any(|permission| permission.matches(action, subject))
    }

    /// Returns whether the exact permission is part of the set.
    #[must_use]
    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    /// Iterates permissions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }

    /// Returns the distinct subjects referenced by the set.
    #[must_use]
    pub fn subjects(&self) -> BTreeSet<Subject> {
        self.0
            .iter()
            .map(|permission| permission.subject().clone())
            .collect()
    }

    /// Returns the number of grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Permission>> for PermissionSet {
    type Error = AppError;

    fn try_from(value: Vec<Permission>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionSet> for Vec<Permission> {
    fn from(value: PermissionSet) -> Self {
        value.0.into_iter().collect()
    }
}
