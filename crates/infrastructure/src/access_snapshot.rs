//! JSON snapshot of the access store.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use talentgate_core::{AppError, AppResult};
use talentgate_domain::{Role, TeamGraph, User};
use tracing::info;

/// Serialized roles and users, as written to and read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSnapshot {
    /// Stored roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Stored users.
    #[serde(default)]
    pub users: Vec<User>,
}

impl AccessSnapshot {
    /// Checks identifier and name uniqueness, role and manager references
    /// and the absence of reporting cycles.
    pub fn validate(&self) -> AppResult<()> {
        let mut role_ids = HashSet::new();
        let mut role_names = HashSet::new();
        for role in &self.roles {
            if !role_ids.insert(role.id()) {
                return Err(AppError::Validation(format!(
                    "snapshot lists role '{}' more than once",
                    role.id()
                )));
            }
            if !role_names.insert(role.name().as_str().to_lowercase()) {
                return Err(AppError::Validation(format!(
                    "snapshot lists role name '{}' more than once",
                    role.name()
                )));
            }
        }

        let mut user_ids = HashSet::new();
        let mut emails = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id()) {
                return Err(AppError::Validation(format!(
                    "snapshot lists user '{}' more than once",
                    user.id()
                )));
            }
            if !emails.insert(user.email().as_str()) {
                return Err(AppError::Validation(format!(
                    "snapshot lists email '{}' more than once",
                    user.email().as_str()
                )));
            }
            if !role_ids.contains(&user.role_id()) {
                return Err(AppError::Validation(format!(
                    "user '{}' references unknown role '{}'",
                    user.id(),
                    user.role_id()
                )));
            }
        }

        let graph = TeamGraph::from_users(self.users.iter());
        for user in &self.users {
            let Some(manager_id) = user.manager_id() else {
                continue;
            };
            if !user_ids.contains(&manager_id) {
                return Err(AppError::Validation(format!(
                    "user '{}' references unknown manager '{manager_id}'",
                    user.id()
                )));
            }
            graph
                .ensure_manager_assignable(user.id(), manager_id)
                .map_err(|error| AppError::Validation(error.to_string()))?;
        }

        Ok(())
    }

    /// Reads and validates a snapshot file.
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read snapshot '{}': {error}",
                path.display()
            ))
        })?;
        let snapshot: Self = serde_json::from_str(&raw).map_err(|error| {
            AppError::Validation(format!(
                "snapshot '{}' is not valid JSON: {error}",
                path.display()
            ))
        })?;
        snapshot.validate()?;

        info!(
            path = %path.display(),
            roles = snapshot.roles.len(),
            users = snapshot.users.len(),
            "access snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Writes the snapshot as pretty-printed JSON, creating parent
    /// directories when needed.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        let payload = serde_json::to_string_pretty(self).map_err(|error| {
            AppError::Internal(format!("failed to encode access snapshot: {error}"))
        })?;

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create snapshot directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }
        tokio::fs::write(path, payload).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write snapshot '{}': {error}",
                path.display()
            ))
        })?;

        info!(
            path = %path.display(),
            roles = self.roles.len(),
            users = self.users.len(),
            "access snapshot saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use talentgate_core::AppError;
    use talentgate_domain::{
        Action, Permission, PermissionSet, Role, RoleId, RoleLevel, User, UserId,
    };

    use super::AccessSnapshot;

    fn role(name: &str, level: u32) -> Role {
        Role::new(
            RoleId::new(),
            name,
            None,
            RoleLevel::new(level).unwrap_or_else(|_| unreachable!()),
            PermissionSet::new([Permission::new(
                Action::Read,
                talentgate_domain::Subject::candidates(),
            )])
            .unwrap_or_else(|_| unreachable!()),
            true,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn user(name: &str, role: &Role, manager_id: Option<UserId>) -> User {
        User::new(
            UserId::new(),
            name,
            format!("{}@example.com", name.to_lowercase()),
            role.id(),
            None,
            manager_id,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn temp_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("talentgate-{label}-{}", UserId::new()))
            .join("snapshot.json")
    }

    #[test]
    fn valid_snapshot_passes() {
        let recruiter = role("Recruiter", 1);
        let manager = role("Manager", 2);
        let lead = user("lead", &manager, None);
        let report = user("report", &recruiter, Some(lead.id()));

        let snapshot = AccessSnapshot {
            roles: vec![recruiter, manager],
            users: vec![lead, report],
        };

        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn duplicate_role_names_are_rejected() {
        let snapshot = AccessSnapshot {
            roles: vec![role("Recruiter", 1), role("recruiter", 2)],
            users: Vec::new(),
        };

        assert!(matches!(snapshot.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn dangling_role_reference_is_rejected() {
        let recruiter = role("Recruiter", 1);
        let snapshot = AccessSnapshot {
            roles: Vec::new(),
            users: vec![user("orphan", &recruiter, None)],
        };

        assert!(matches!(snapshot.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn reporting_cycle_is_rejected() {
        let recruiter = role("Recruiter", 1);
        let left = user("left", &recruiter, None);
        let right = user("right", &recruiter, Some(left.id()));
        let mut json = serde_json::to_value(AccessSnapshot {
            roles: vec![recruiter],
            users: vec![left.clone(), right.clone()],
        })
        .unwrap_or_default();
        json["users"][0]["managerId"] = serde_json::Value::String(right.id().to_string());

        let snapshot: AccessSnapshot =
            serde_json::from_value(json).unwrap_or_else(|_| unreachable!());

        assert!(matches!(snapshot.validate(), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn save_then_load_restores_the_snapshot() {
        let recruiter = role("Recruiter", 1);
        let snapshot = AccessSnapshot {
            users: vec![user("alice", &recruiter, None)],
            roles: vec![recruiter],
        };
        let path = temp_path("roundtrip");

        assert!(snapshot.save(&path).await.is_ok());
        let loaded = AccessSnapshot::load(&path).await;

        assert_eq!(loaded.ok(), Some(snapshot));
        if let Some(parent) = path.parent() {
            let _ = tokio::fs::remove_dir_all(parent).await;
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_internal_error() {
        let loaded = AccessSnapshot::load(&temp_path("missing")).await;

        assert!(matches!(loaded, Err(AppError::Internal(_))));
    }
}
