use std::collections::BTreeSet;

use talentgate_core::AppError;
use talentgate_domain::{Action, Subject};
use tracing::debug;

use super::*;

impl AuthorizationService {
    /// Returns whether the user's role grants `action` on `subject`.
    ///
    /// A user whose role cannot be resolved holds no permissions.
    pub async fn has_permission(
        &self,
        user: &User,
        action: Action,
        subject: &Subject,
    ) -> AppResult<bool> {
        let granted = self
            .role_for_user(user)
            .await?
            .is_some_and(|role| role.allows(action, subject));

        debug!(
            user_id = %user.id(),
            action = action.as_str(),
            subject = subject.as_str(),
            granted,
            "permission evaluated"
        );

        Ok(granted)
    }

    /// Ensures the user holds the permission, failing with `Forbidden`.
    pub async fn require_permission(
        &self,
        user: &User,
        action: Action,
        subject: &Subject,
    ) -> AppResult<()> {
        if self.has_permission(user, action, subject).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is missing permission '{action}:{subject}'",
            user.email().as_str()
        )))
    }

    /// Returns the subjects the user may read.
    ///
    /// Well-known subjects come first in their canonical order, followed by
    /// custom subjects alphabetically.
    pub async fn readable_subjects(&self, user: &User) -> AppResult<Vec<Subject>> {
        let Some(role) = self.role_for_user(user).await? else {
            return Ok(Vec::new());
        };

        let readable: BTreeSet<Subject> = role
            .permissions()
            .iter()
            .filter(|permission| permission.action() == Action::Read)
            .map(|permission| permission.subject().clone())
            .collect();

        let mut subjects: Vec<Subject> = Subject::known()
            .into_iter()
            .filter(|subject| readable.contains(subject))
            .collect();
        subjects.extend(
            readable
                .into_iter()
                .filter(|subject| !subject.is_well_known()),
        );

        Ok(subjects)
    }
}
