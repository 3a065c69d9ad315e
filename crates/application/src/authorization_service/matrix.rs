use std::collections::BTreeSet;

use serde::Serialize;
use talentgate_domain::{Action, RoleId, Subject};

use super::*;
use crate::role_registry::sort_by_seniority;

/// Role column of the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrixRole {
    /// Role identifier.
    pub role_id: RoleId,
    /// Role name.
    pub name: String,
    /// Role level.
    pub level: u32,
    /// Whether the role is built-in.
    pub is_system_role: bool,
}

/// One `(subject, action)` row of the permission matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrixRow {
    /// Protected subject.
    pub subject: Subject,
    /// Action on the subject.
    pub action: Action,
    /// Grant flag per role, aligned with [`PermissionMatrix::roles`].
    pub granted: Vec<bool>,
}

/// Roles against every known permission pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionMatrix {
    /// Columns, most senior role first.
    pub roles: Vec<PermissionMatrixRole>,
    /// Rows grouped by subject, actions in canonical order.
    pub rows: Vec<PermissionMatrixRow>,
}

impl PermissionMatrix {
    /// Looks up one cell of the matrix.
    #[must_use]
    pub fn is_granted(&self, role_id: RoleId, action: Action, subject: &Subject) -> bool {
        let Some(column) = self.roles.iter().position(|role| role.role_id == role_id) else {
            return false;
        };

        self.rows
            .iter()
            .find(|row| row.action == action && &row.subject == subject)
            .and_then(|row| row.granted.get(column).copied())
            .unwrap_or(false)
    }
}

impl AuthorizationService {
    /// Builds the role/permission matrix over the well-known subjects and
    /// every custom subject granted by some role.
    pub async fn permission_matrix(&self) -> AppResult<PermissionMatrix> {
        let mut roles = self.roles.list_roles().await?;
        sort_by_seniority(&mut roles);

        let custom: BTreeSet<Subject> = roles
            .iter()
            .flat_map(|role| role.permissions().subjects())
            .filter(|subject| !subject.is_well_known())
            .collect();

        let rows = Subject::known()
            .into_iter()
            .chain(custom)
            .flat_map(|subject| {
                Action::all()
                    .iter()
                    .map(|action| PermissionMatrixRow {
                        granted: roles
                            .iter()
                            .map(|role| role.allows(*action, &subject))
                            .collect(),
                        subject: subject.clone(),
                        action: *action,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(PermissionMatrix {
            roles: roles
                .iter()
                .map(|role| PermissionMatrixRole {
                    role_id: role.id(),
                    name: role.name().as_str().to_owned(),
                    level: role.level().value(),
                    is_system_role: role.is_system_role(),
                })
                .collect(),
            rows,
        })
    }
}
