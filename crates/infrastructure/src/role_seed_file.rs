use std::path::Path;

use talentgate_application::SystemRoleSeed;
use talentgate_core::{AppError, AppResult};
use tracing::info;

/// Reads a role ladder, least senior role first, from a JSON file.
pub async fn load_role_seeds(path: &Path) -> AppResult<Vec<SystemRoleSeed>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to read role seed file '{}': {error}",
            path.display()
        ))
    })?;
    let seeds: Vec<SystemRoleSeed> = serde_json::from_str(&raw).map_err(|error| {
        AppError::Validation(format!(
            "role seed file '{}' is invalid: {error}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), count = seeds.len(), "role seed file loaded");
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use talentgate_core::AppError;
    use talentgate_domain::{Action, Subject};

    use super::load_role_seeds;

    async fn write_temp(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "talentgate-seeds-{label}-{}.json",
            std::process::id()
        ));
        let written = tokio::fs::write(&path, contents).await;
        assert!(written.is_ok());
        path
    }

    #[tokio::test]
    async fn parses_object_form_permissions() {
        let path = write_temp(
            "valid",
            r#"[
                {"name": "Screener", "permissions": [{"action": "read", "subject": "candidates"}]},
                {"name": "Lead", "description": "Runs the team", "permissions": []}
            ]"#,
        )
        .await;

        let seeds = load_role_seeds(&path).await.unwrap_or_default();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].description, None);
        assert_eq!(seeds[0].permissions[0].action(), Action::Read);
        assert_eq!(seeds[0].permissions[0].subject(), &Subject::candidates());
        assert_eq!(seeds[1].description.as_deref(), Some("Runs the team"));
    }

    #[tokio::test]
    async fn rejects_unknown_actions() {
        let path = write_temp(
            "invalid",
            r#"[{"name": "Broken", "permissions": [{"action": "approve", "subject": "jobs"}]}]"#,
        )
        .await;

        let seeds = load_role_seeds(&path).await;
        let _ = tokio::fs::remove_file(&path).await;

        assert!(matches!(seeds, Err(AppError::Validation(_))));
    }
}
