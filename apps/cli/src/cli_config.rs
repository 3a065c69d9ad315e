use std::env;
use std::path::PathBuf;

use talentgate_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_SNAPSHOT_PATH: &str = "data/access-snapshot.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLogConfig {
    Tracing,
    Memory,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub role_seed_path: Option<PathBuf>,
    pub snapshot_path: PathBuf,
    pub audit_log: AuditLogConfig,
}

impl CliConfig {
    pub fn load() -> Result<Self, AppError> {
        let role_seed_path = optional_env("TALENTGATE_ROLE_SEED_PATH").map(PathBuf::from);
        let snapshot_path = optional_env("TALENTGATE_SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let audit_log = match env::var("TALENTGATE_AUDIT_LOG")
            .unwrap_or_else(|_| "tracing".to_owned())
            .as_str()
        {
            "tracing" => AuditLogConfig::Tracing,
            "memory" => AuditLogConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "TALENTGATE_AUDIT_LOG must be either 'tracing' or 'memory', got '{other}'"
                )));
            }
        };

        Ok(Self {
            role_seed_path,
            snapshot_path,
            audit_log,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
