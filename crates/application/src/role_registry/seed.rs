use std::collections::HashSet;

use talentgate_domain::{Action, Permission, Subject};
use tracing::{debug, info};

use super::*;
use crate::access_ports::SystemRoleSeed;

impl RoleRegistry {
    /// Installs the built-in role ladder.
    ///
    /// Seeds are ordered from the least to the most senior role and receive
    /// levels `1..=n`. The ladder is installed only into a store without any
    /// system role, so later start-ups keep renames and other edits made to
    /// the built-in roles. Returns the system roles, most senior first.
    pub async fn seed_system_roles(&self, seeds: &[SystemRoleSeed]) -> AppResult<Vec<Role>> {
        if seeds.is_empty() {
            return Err(AppError::Validation(
                "the system role ladder must contain at least one role".to_owned(),
            ));
        }

        let mut seen_names = HashSet::new();
        for seed in seeds {
            if !seen_names.insert(seed.name.trim().to_lowercase()) {
                return Err(AppError::Validation(format!(
                    "system role '{}' is listed more than once",
                    seed.name.trim()
                )));
            }
        }

        let installed = self
            .repository
            .list_roles()
            .await?
            .iter()
            .filter(|role| role.is_system_role())
            .count();
        if installed > 0 {
            debug!(installed, "system roles already present; ladder not reinstalled");
        } else {
            for (position, seed) in seeds.iter().enumerate() {
                let level = u32::try_from(position + 1).map_err(|_| {
                    AppError::Validation("the system role ladder is too long".to_owned())
                })?;
                self.create_role(CreateRoleInput {
                    name: seed.name.clone(),
                    description: seed.description.clone(),
                    level,
                    permissions: seed.permissions.clone(),
                    is_system_role: true,
                })
                .await?;
            }
        }

        let mut system_roles: Vec<Role> = self
            .repository
            .list_roles()
            .await?
            .into_iter()
            .filter(Role::is_system_role)
            .collect();
        sort_by_seniority(&mut system_roles);

        info!(count = system_roles.len(), "system roles seeded");
        Ok(system_roles)
    }
}

/// Returns the four-tier ladder shipped with the tracking system.
#[must_use]
pub fn default_role_ladder() -> Vec<SystemRoleSeed> {
    use Action::{Create, Delete, Read, Update};

    let crud = [Create, Read, Update, Delete];

    vec![
        SystemRoleSeed {
            name: "Recruiter".to_owned(),
            description: Some("Can manage candidates and basic recruitment tasks".to_owned()),
            permissions: [
                grants(&[Create, Read, Update], Subject::candidates()),
                grants(&[Read], Subject::jobs()),
                grants(&[Create, Read, Update], Subject::interviews()),
                grants(&[Read], Subject::users()),
            ]
            .concat(),
        },
        SystemRoleSeed {
            name: "Hiring Manager".to_owned(),
            description: Some("Can manage hiring process and review candidates".to_owned()),
            permissions: [
                grants(&[Read, Update], Subject::candidates()),
                grants(&[Read], Subject::jobs()),
                grants(&[Create, Read, Update], Subject::interviews()),
                grants(&[Read], Subject::users()),
                grants(&[Read], Subject::reports()),
            ]
            .concat(),
        },
        SystemRoleSeed {
            name: "Associate Manager".to_owned(),
            description: Some("Advanced management with limited admin access".to_owned()),
            permissions: [
                grants(&crud, Subject::candidates()),
                grants(&crud, Subject::jobs()),
                grants(&crud, Subject::interviews()),
                grants(&[Read, Update], Subject::users()),
                grants(&[Read], Subject::reports()),
            ]
            .concat(),
        },
        SystemRoleSeed {
            name: "Manager".to_owned(),
            description: Some("Full system access and management capabilities".to_owned()),
            permissions: [
                grants(&crud, Subject::candidates()),
                grants(&crud, Subject::jobs()),
                grants(&crud, Subject::interviews()),
                grants(&crud, Subject::users()),
                grants(&crud, Subject::roles()),
                grants(&[Read, Update], Subject::settings()),
                grants(&[Read], Subject::reports()),
            ]
            .concat(),
        },
    ]
}

fn grants(actions: &[Action], subject: Subject) -> Vec<Permission> {
    actions
        .iter()
        .map(|action| Permission::new(*action, subject.clone()))
        .collect()
}
