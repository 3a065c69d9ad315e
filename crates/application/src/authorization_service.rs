//! Permission checks and hierarchy-based visibility.

mod matrix;
mod permissions;
mod visibility;


use std::sync::Arc;

use talentgate_core::AppResult;
use talentgate_domain::{Role, User};
use tracing::warn;

use crate::access_ports::{RoleRepository, UserRepository};

pub use matrix::{PermissionMatrix, PermissionMatrixRole, PermissionMatrixRow};

/// Application service answering "may this user do X" and "whom may this
/// user see".
///
/// Every query resolves roles and users live from the repositories; nothing
/// is cached, so edits to a role apply to the next check.
#[derive(Clone)]
pub struct AuthorizationService {
    roles: Arc<dyn RoleRepository>,
    users: Arc<dyn UserRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { roles, users }
    }

    /// Resolves the role currently assigned to a user.
    ///
    /// Returns `None` when the user references a role that no longer exists.
    pub async fn role_for_user(&self, user: &User) -> AppResult<Option<Role>> {
        let role = self.roles.find_role(user.role_id()).await?;
        if role.is_none() {
            warn!(
                user_id = %user.id(),
                role_id = %user.role_id(),
                "user references a missing role"
            );
        }

        Ok(role)
    }
}
