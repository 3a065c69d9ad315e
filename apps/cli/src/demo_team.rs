use talentgate_application::{CreateUserInput, RoleRegistry, UserDirectory};
use talentgate_core::{AppError, AppResult};
use talentgate_domain::User;
use tracing::info;

struct DemoMember {
    name: &'static str,
    email: &'static str,
    role: &'static str,
    department: Option<&'static str>,
    manager_email: Option<&'static str>,
}

// Managers are listed before their reports.
const DEMO_TEAM: &[DemoMember] = &[
    DemoMember {
        name: "System Manager",
        email: "manager@example.com",
        role: "Manager",
        department: None,
        manager_email: None,
    },
    DemoMember {
        name: "Associate Manager",
        email: "associate@example.com",
        role: "Associate Manager",
        department: Some("HR"),
        manager_email: Some("manager@example.com"),
    },
    DemoMember {
        name: "Hiring Manager",
        email: "hiring@example.com",
        role: "Hiring Manager",
        department: Some("Engineering"),
        manager_email: Some("associate@example.com"),
    },
    DemoMember {
        name: "Recruiter One",
        email: "recruiter1@example.com",
        role: "Recruiter",
        department: Some("HR"),
        manager_email: Some("hiring@example.com"),
    },
    DemoMember {
        name: "Recruiter Two",
        email: "recruiter2@example.com",
        role: "Recruiter",
        department: Some("Engineering"),
        manager_email: Some("hiring@example.com"),
    },
];

/// Installs the five-person demo hierarchy, skipping members whose email
/// already exists.
pub async fn ensure_demo_team(registry: &RoleRegistry, directory: &UserDirectory) -> AppResult<()> {
    let mut created = 0_usize;

    for member in DEMO_TEAM {
        if directory.find_user_by_email(member.email).await?.is_some() {
            continue;
        }

        let role = registry
            .find_role_by_name(member.role)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "demo team requires a role named '{}'",
                    member.role
                ))
            })?;
        let manager_id = match member.manager_email {
            Some(email) => directory
                .find_user_by_email(email)
                .await?
                .as_ref()
                .map(User::id),
            None => None,
        };

        directory
            .create_user(CreateUserInput {
                name: member.name.to_owned(),
                email: member.email.to_owned(),
                role_id: role.id(),
                department: member.department.map(str::to_owned),
                manager_id,
            })
            .await?;
        created += 1;
    }

    info!(created, "demo team ensured");
    Ok(())
}
