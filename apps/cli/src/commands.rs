use std::str::FromStr;

use serde::Serialize;
use serde_json::json;
use talentgate_application::{AccessAdminService, AuthorizationService, RoleRegistry, UserDirectory};
use talentgate_core::{AppError, AppResult};
use talentgate_domain::{Action, Subject, User};

use crate::demo_team;

pub const USAGE: &str = "usage: talentgate <command>

commands:
  roles                                  list roles, most senior first
  users                                  list users
  matrix                                 print the role/permission matrix
  check <email> <action> <subject>       evaluate one permission
  visible <email>                        list users visible to a user
  assign <actor-email> <email> <role>    move a user to another role
  seed-snapshot                          write the seeded store to the snapshot path
  seed-demo                              add the demo team and write the snapshot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Roles,
    Users,
    Matrix,
    Check {
        email: String,
        action: Action,
        subject: Subject,
    },
    Visible {
        email: String,
    },
    Assign {
        actor_email: String,
        email: String,
        role_name: String,
    },
    SeedSnapshot,
    SeedDemo,
}

impl Command {
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let words: Vec<&str> = args.iter().map(String::as_str).collect();

        match words.as_slice() {
            ["roles"] => Ok(Self::Roles),
            ["users"] => Ok(Self::Users),
            ["matrix"] => Ok(Self::Matrix),
            ["check", email, action, subject] => Ok(Self::Check {
                email: (*email).to_owned(),
                action: Action::from_str(action)?,
                subject: Subject::new(*subject)?,
            }),
            ["visible", email] => Ok(Self::Visible {
                email: (*email).to_owned(),
            }),
            ["assign", actor_email, email, role_name] => Ok(Self::Assign {
                actor_email: (*actor_email).to_owned(),
                email: (*email).to_owned(),
                role_name: (*role_name).to_owned(),
            }),
            ["seed-snapshot"] => Ok(Self::SeedSnapshot),
            ["seed-demo"] => Ok(Self::SeedDemo),
            _ => Err(AppError::Validation(USAGE.to_owned())),
        }
    }

    pub fn writes_snapshot(&self) -> bool {
        matches!(
            self,
            Self::Assign { .. } | Self::SeedSnapshot | Self::SeedDemo
        )
    }
}

#[derive(Clone)]
pub struct CliServices {
    pub registry: RoleRegistry,
    pub directory: UserDirectory,
    pub authorization: AuthorizationService,
    pub admin: AccessAdminService,
}

pub async fn run(command: Command, services: &CliServices) -> AppResult<()> {
    match command {
        Command::Roles => print_json(&services.registry.list_roles().await?),
        Command::Users => print_json(&services.directory.list_users().await?),
        Command::Matrix => print_json(&services.authorization.permission_matrix().await?),
        Command::Check {
            email,
            action,
            subject,
        } => {
            let user = find_user(services, &email).await?;
            let granted = services
                .authorization
                .has_permission(&user, action, &subject)
                .await?;
            print_json(&json!({
                "email": user.email().as_str(),
                "action": action,
                "subject": subject,
                "granted": granted,
            }))
        }
        Command::Visible { email } => {
            let user = find_user(services, &email).await?;
            print_json(&services.authorization.get_accessible_users(&user).await?)
        }
        Command::Assign {
            actor_email,
            email,
            role_name,
        } => {
            let actor = find_user(services, &actor_email).await?;
            let user = find_user(services, &email).await?;
            let role = services
                .registry
                .find_role_by_name(&role_name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("role '{role_name}' was not found")))?;

            let updated = services
                .admin
                .assign_role(actor.id(), user.id(), role.id())
                .await?;
            print_json(&updated)
        }
        Command::SeedSnapshot => Ok(()),
        Command::SeedDemo => {
            demo_team::ensure_demo_team(&services.registry, &services.directory).await?;
            print_json(&services.directory.list_users().await?)
        }
    }
}

async fn find_user(services: &CliServices, email: &str) -> AppResult<User> {
    services
        .directory
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no user with email '{email}'")))
}

fn print_json(value: &impl Serialize) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to encode output: {error}")))?;
    println!("{rendered}");
    Ok(())
}
