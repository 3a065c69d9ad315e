//! Command-line host for the talentgate access engine.

mod cli_config;
mod commands;
mod demo_team;

use std::env;
use std::sync::Arc;

use talentgate_application::{
    AccessAdminService, AuditRepository, AuthorizationService, RoleRegistry, UserDirectory,
    default_role_ladder,
};
use talentgate_core::AppError;
use talentgate_infrastructure::{
    AccessSnapshot, InMemoryAccessRepository, InMemoryAuditRepository, TracingAuditRepository,
    load_role_seeds,
};
use tracing::{debug, info};

use crate::cli_config::{AuditLogConfig, CliConfig, init_tracing};
use crate::commands::{CliServices, Command};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    let config = CliConfig::load()?;

    let snapshot_exists = tokio::fs::try_exists(&config.snapshot_path)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to inspect snapshot '{}': {error}",
                config.snapshot_path.display()
            ))
        })?;
    let store = Arc::new(if snapshot_exists {
        InMemoryAccessRepository::from_snapshot(AccessSnapshot::load(&config.snapshot_path).await?)?
    } else {
        InMemoryAccessRepository::new()
    });

    let seeds = match &config.role_seed_path {
        Some(path) => load_role_seeds(path).await?,
        None => default_role_ladder(),
    };
    let registry = RoleRegistry::new(store.clone());
    registry.seed_system_roles(&seeds).await?;

    let memory_audit = Arc::new(InMemoryAuditRepository::new());
    let audit_repository: Arc<dyn AuditRepository> = match config.audit_log {
        AuditLogConfig::Tracing => Arc::new(TracingAuditRepository::new()),
        AuditLogConfig::Memory => memory_audit.clone(),
    };

    let directory = UserDirectory::new(store.clone(), store.clone());
    let authorization = AuthorizationService::new(store.clone(), store.clone());
    let services = CliServices {
        admin: AccessAdminService::new(
            authorization.clone(),
            registry.clone(),
            directory.clone(),
            audit_repository,
        ),
        registry,
        directory,
        authorization,
    };

    let writes_snapshot = command.writes_snapshot();
    commands::run(command, &services).await?;

    if writes_snapshot {
        store.snapshot().await.save(&config.snapshot_path).await?;
        info!(path = %config.snapshot_path.display(), "snapshot written");
    }

    if matches!(config.audit_log, AuditLogConfig::Memory) {
        let exported = memory_audit.export_json_lines().await?;
        debug!(bytes = exported.len(), "audit log exported to stderr");
        eprint!("{exported}");
    }

    Ok(())
}
