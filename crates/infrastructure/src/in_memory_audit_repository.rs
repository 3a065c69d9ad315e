use async_trait::async_trait;
use serde::Serialize;
use talentgate_application::{AuditEvent, AuditRepository};
use talentgate_core::{AppError, AppResult};
use tokio::sync::RwLock;

/// Audit repository that keeps events in memory, in append order.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    /// Renders every recorded event as one JSON object per line.
    pub async fn export_json_lines(&self) -> AppResult<String> {
        let events = self.events.read().await;
        let mut output = String::new();

        for event in events.iter() {
            let line = serde_json::to_string(&AuditRecord::from(event)).map_err(|error| {
                AppError::Internal(format!("failed to encode audit event: {error}"))
            })?;
            output.push_str(&line);
            output.push('\n');
        }

        Ok(output)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuditRecord<'a> {
    action: &'static str,
    subject: &'a str,
    resource_type: &'a str,
    resource_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

impl<'a> From<&'a AuditEvent> for AuditRecord<'a> {
    fn from(event: &'a AuditEvent) -> Self {
        Self {
            action: event.action.as_str(),
            subject: &event.subject,
            resource_type: &event.resource_type,
            resource_id: &event.resource_id,
            detail: event.detail.as_deref(),
        }
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}
