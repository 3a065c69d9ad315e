use std::sync::Arc;

use talentgate_core::AppError;
use talentgate_domain::{Action, AuditAction, Permission, Role, Subject, User, UserId};

use crate::access_ports::{CreateRoleInput, CreateUserInput, UpdateUserInput};
use crate::test_support::{FakeAccessStore, FakeAuditRepository};
use crate::{AuthorizationService, RoleRegistry, UserDirectory, default_role_ladder};

use super::AccessAdminService;

struct Fixture {
    registry: RoleRegistry,
    directory: UserDirectory,
    audit: Arc<FakeAuditRepository>,
    service: AccessAdminService,
}

impl Fixture {
    async fn seeded() -> Self {
        let store = Arc::new(FakeAccessStore::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let registry = RoleRegistry::new(store.clone());
        registry
            .seed_system_roles(&default_role_ladder())
            .await
            .unwrap_or_else(|_| unreachable!());
        let directory = UserDirectory::new(store.clone(), store.clone());
        let authorization = AuthorizationService::new(store.clone(), store);

        Self {
            service: AccessAdminService::new(
                authorization,
                registry.clone(),
                directory.clone(),
                audit.clone(),
            ),
            registry,
            directory,
            audit,
        }
    }

    async fn role(&self, name: &str) -> Role {
        self.registry
            .find_role_by_name(name)
            .await
            .ok()
            .flatten()
            .unwrap_or_else(|| unreachable!())
    }

    async fn user(&self, name: &str, role: &str, manager: Option<&User>) -> User {
        self.directory
            .create_user(self.input(name, role, manager).await)
            .await
            .unwrap_or_else(|error| panic!("failed to create {name}: {error}"))
    }

    async fn input(&self, name: &str, role: &str, manager: Option<&User>) -> CreateUserInput {
        CreateUserInput {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role_id: self.role(role).await.id(),
            department: None,
            manager_id: manager.map(User::id),
        }
    }

    async fn audit_actions(&self) -> Vec<AuditAction> {
        self.audit
            .events
            .lock()
            .await
            .iter()
            .map(|event| event.action)
            .collect()
    }
}

#[tokio::test]
async fn unknown_actor_is_unauthorized() {
    let fixture = Fixture::seeded().await;

    let result = fixture.service.list_roles(UserId::new()).await;

    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn recruiter_cannot_manage_roles() {
    let fixture = Fixture::seeded().await;
    let recruiter = fixture.user("Recruiter", "Recruiter", None).await;

    let listed = fixture.service.list_roles(recruiter.id()).await;
    let created = fixture
        .service
        .create_role(
            recruiter.id(),
            CreateRoleInput {
                name: "Sourcer".to_owned(),
                description: None,
                level: 1,
                permissions: Vec::new(),
                is_system_role: false,
            },
        )
        .await;

    assert!(matches!(listed, Err(AppError::Forbidden(_))));
    assert!(matches!(created, Err(AppError::Forbidden(_))));
    assert!(fixture.audit_actions().await.is_empty());
}

#[tokio::test]
async fn manager_role_lifecycle_is_audited() {
    let fixture = Fixture::seeded().await;
    let manager = fixture.user("Manager", "Manager", None).await;

    let role = fixture
        .service
        .create_role(
            manager.id(),
            CreateRoleInput {
                name: "Sourcer".to_owned(),
                description: Some("Finds candidates".to_owned()),
                level: 1,
                permissions: vec![Permission::new(Action::Read, Subject::candidates())],
                is_system_role: false,
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = fixture
        .service
        .update_role(
            manager.id(),
            role.id(),
            crate::access_ports::UpdateRoleInput {
                level: Some(2),
                ..Default::default()
            },
        )
        .await;
    assert_eq!(updated.ok().map(|role| role.level().value()), Some(2));

    assert!(fixture.service.delete_role(manager.id(), role.id()).await.is_ok());

    let system = fixture.role("Recruiter").await;
    let blocked = fixture.service.delete_role(manager.id(), system.id()).await;
    assert!(matches!(blocked, Err(AppError::Forbidden(_))));

    assert_eq!(
        fixture.audit_actions().await,
        vec![
            AuditAction::RoleCreated,
            AuditAction::RoleUpdated,
            AuditAction::RoleDeleted
        ]
    );
    let events = fixture.audit.events.lock().await;
    assert!(events.iter().all(|event| event.subject == manager.id().to_string()));
}

#[tokio::test]
async fn list_users_is_limited_to_visible_users() {
    let fixture = Fixture::seeded().await;
    let manager = fixture.user("Manager", "Manager", None).await;
    let hiring = fixture
        .user("Hiring Manager", "Hiring Manager", Some(&manager))
        .await;
    let recruiter = fixture.user("Recruiter", "Recruiter", Some(&hiring)).await;

    let visible: Vec<UserId> = fixture
        .service
        .list_users(hiring.id())
        .await
        .unwrap_or_default()
        .iter()
        .map(User::id)
        .collect();

    assert_eq!(visible, vec![hiring.id(), recruiter.id()]);
}

#[tokio::test]
async fn team_lead_cannot_create_a_more_senior_user() {
    let fixture = Fixture::seeded().await;
    let team_lead_role = fixture
        .registry
        .create_role(CreateRoleInput {
            name: "Team Lead".to_owned(),
            description: None,
            level: 2,
            permissions: vec![
                Permission::new(Action::Create, Subject::users()),
                Permission::new(Action::Read, Subject::users()),
            ],
            is_system_role: false,
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let team_lead = fixture
        .directory
        .create_user(CreateUserInput {
            name: "Team Lead".to_owned(),
            email: "lead@example.com".to_owned(),
            role_id: team_lead_role.id(),
            department: None,
            manager_id: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let senior = fixture.input("New Manager", "Manager", None).await;
    let escalated = fixture.service.create_user(team_lead.id(), senior).await;
    assert!(matches!(escalated, Err(AppError::Forbidden(_))));

    let junior = fixture.input("New Recruiter", "Recruiter", None).await;
    let created = fixture.service.create_user(team_lead.id(), junior).await;
    assert!(created.is_ok());
    assert_eq!(fixture.audit_actions().await, vec![AuditAction::UserCreated]);
}

#[tokio::test]
async fn role_editor_cannot_create_or_raise_roles_above_own_level() {
    let fixture = Fixture::seeded().await;
    let editor_role = fixture
        .registry
        .create_role(CreateRoleInput {
            name: "Role Editor".to_owned(),
            description: None,
            level: 2,
            permissions: vec![
                Permission::new(Action::Create, Subject::roles()),
                Permission::new(Action::Update, Subject::roles()),
            ],
            is_system_role: false,
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let editor = fixture
        .directory
        .create_user(CreateUserInput {
            name: "Role Editor".to_owned(),
            email: "editor@example.com".to_owned(),
            role_id: editor_role.id(),
            department: None,
            manager_id: None,
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let senior_input = |name: &str| CreateRoleInput {
        name: name.to_owned(),
        description: None,
        level: 5,
        permissions: vec![Permission::new(Action::Delete, Subject::users())],
        is_system_role: false,
    };

    let senior = fixture
        .service
        .create_role(editor.id(), senior_input("Director"))
        .await;
    assert!(matches!(senior, Err(AppError::Forbidden(_))));

    let peer = fixture
        .service
        .create_role(
            editor.id(),
            CreateRoleInput {
                level: 2,
                ..senior_input("Coordinator")
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    let raised = fixture
        .service
        .update_role(
            editor.id(),
            peer.id(),
            crate::access_ports::UpdateRoleInput {
                level: Some(3),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(raised, Err(AppError::Forbidden(_))));

    let hiring = fixture.role("Hiring Manager").await;
    let demoted = fixture
        .service
        .update_role(
            editor.id(),
            hiring.id(),
            crate::access_ports::UpdateRoleInput {
                level: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(demoted, Err(AppError::Forbidden(_))));

    assert_eq!(fixture.role("Hiring Manager").await.level(), hiring.level());
    assert_eq!(
        fixture
            .registry
            .get_role(peer.id())
            .await
            .ok()
            .map(|role| role.level().value()),
        Some(2)
    );
    assert_eq!(fixture.audit_actions().await, vec![AuditAction::RoleCreated]);
}

#[tokio::test]
async fn associate_cannot_create_users_without_permission() {
    let fixture = Fixture::seeded().await;
    let associate = fixture
        .user("Associate", "Associate Manager", None)
        .await;
    let input = fixture.input("New Recruiter", "Recruiter", None).await;

    let attempt = fixture.service.create_user(associate.id(), input).await;

    assert!(matches!(attempt, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn manager_creates_and_reassigns_users() {
    let fixture = Fixture::seeded().await;
    let manager = fixture.user("Manager", "Manager", None).await;
    let input = fixture
        .input("New Recruiter", "Recruiter", Some(&manager))
        .await;

    let created = fixture
        .service
        .create_user(manager.id(), input)
        .await
        .unwrap_or_else(|_| unreachable!());

    let hiring_role = fixture.role("Hiring Manager").await;
    let assigned = fixture
        .service
        .assign_role(manager.id(), created.id(), hiring_role.id())
        .await;
    assert_eq!(assigned.ok().map(|user| user.role_id()), Some(hiring_role.id()));

    let renamed = fixture
        .service
        .update_user(
            manager.id(),
            created.id(),
            UpdateUserInput {
                department: Some("Sourcing".to_owned()),
                ..UpdateUserInput::default()
            },
        )
        .await;
    assert_eq!(
        renamed.ok().and_then(|user| user.department().map(str::to_owned)),
        Some("Sourcing".to_owned())
    );

    assert_eq!(
        fixture.audit_actions().await,
        vec![
            AuditAction::UserCreated,
            AuditAction::UserRoleAssigned,
            AuditAction::UserUpdated
        ]
    );
}

#[tokio::test]
async fn associate_cannot_edit_users_outside_their_team() {
    let fixture = Fixture::seeded().await;
    let associate = fixture
        .user("Associate", "Associate Manager", None)
        .await;
    let own_report = fixture.user("Own Report", "Recruiter", Some(&associate)).await;
    let stranger = fixture.user("Stranger", "Recruiter", None).await;
    let edit = UpdateUserInput {
        department: Some("Sales".to_owned()),
        ..UpdateUserInput::default()
    };

    let blocked = fixture
        .service
        .update_user(associate.id(), stranger.id(), edit.clone())
        .await;
    assert!(matches!(blocked, Err(AppError::Forbidden(_))));

    let allowed = fixture
        .service
        .update_user(associate.id(), own_report.id(), edit)
        .await;
    assert!(allowed.is_ok());

    let missing = fixture
        .service
        .update_user(associate.id(), UserId::new(), UpdateUserInput::default())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn role_assignment_above_own_level_is_forbidden() {
    let fixture = Fixture::seeded().await;
    let associate = fixture
        .user("Associate", "Associate Manager", None)
        .await;
    let report = fixture.user("Report", "Recruiter", Some(&associate)).await;
    let manager_role = fixture.role("Manager").await;

    let attempt = fixture
        .service
        .assign_role(associate.id(), report.id(), manager_role.id())
        .await;

    assert!(matches!(attempt, Err(AppError::Forbidden(_))));
    let stored = fixture.directory.get_user(report.id()).await;
    assert_eq!(
        stored.ok().map(|user| user.role_id()),
        Some(report.role_id())
    );
}

#[tokio::test]
async fn manager_cannot_delete_themselves_or_a_team_lead() {
    let fixture = Fixture::seeded().await;
    let manager = fixture.user("Manager", "Manager", None).await;
    let hiring = fixture
        .user("Hiring Manager", "Hiring Manager", Some(&manager))
        .await;
    let recruiter = fixture.user("Recruiter", "Recruiter", Some(&hiring)).await;

    let own = fixture.service.delete_user(manager.id(), manager.id()).await;
    assert!(matches!(own, Err(AppError::Conflict(_))));

    let lead = fixture.service.delete_user(manager.id(), hiring.id()).await;
    assert!(matches!(lead, Err(AppError::Conflict(_))));

    assert!(
        fixture
            .service
            .delete_user(manager.id(), recruiter.id())
            .await
            .is_ok()
    );
    assert_eq!(fixture.audit_actions().await, vec![AuditAction::UserDeleted]);
}
