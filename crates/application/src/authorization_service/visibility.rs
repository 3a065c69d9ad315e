use std::collections::HashMap;

use talentgate_domain::{RoleId, RoleLevel, TeamGraph, UserId};
use tracing::debug;

use super::*;

impl AuthorizationService {
    /// Returns the users visible to `user`.
    ///
    /// Holders of the most senior level see everyone. Everyone else sees
    /// themselves plus the transitive reports whose role level does not
    /// exceed their own. The acting user is always part of the result.
    pub async fn get_accessible_users(&self, user: &User) -> AppResult<Vec<User>> {
        let users = self.users.list_users().await?;
        let me = users
            .iter()
            .find(|stored| stored.id() == user.id())
            .cloned()
            .unwrap_or_else(|| user.clone());

        let Some(role) = self.role_for_user(&me).await? else {
            return Ok(vec![me]);
        };

        let roles = self.roles.list_roles().await?;
        let top_level = roles.iter().map(Role::level).max();
        if top_level == Some(role.level()) {
            debug!(user_id = %me.id(), count = users.len(), "top-level user sees every user");
            return Ok(ensure_self(users, me));
        }

        let levels: HashMap<RoleId, RoleLevel> =
            roles.iter().map(|role| (role.id(), role.level())).collect();
        let graph = TeamGraph::from_users(users.iter());
        let mut by_id: HashMap<UserId, User> =
            users.into_iter().map(|user| (user.id(), user)).collect();

        let mut visible = vec![me.clone()];
        for report_id in graph.all_reports(me.id()) {
            let Some(report) = by_id.remove(&report_id) else {
                continue;
            };
            let covered = levels
                .get(&report.role_id())
                .is_some_and(|level| role.level().covers(*level));
            if covered {
                visible.push(report);
            }
        }

        debug!(user_id = %me.id(), count = visible.len(), "accessible users resolved");
        Ok(visible)
    }

    /// Returns whether `user` may see the user identified by `target_id`.
    pub async fn can_access_user(&self, user: &User, target_id: UserId) -> AppResult<bool> {
        if user.id() == target_id {
            return Ok(true);
        }

        Ok(self
            .get_accessible_users(user)
            .await?
            .iter()
            .any(|visible| visible.id() == target_id))
    }
}

fn ensure_self(mut users: Vec<User>, me: User) -> Vec<User> {
    if !users.iter().any(|user| user.id() == me.id()) {
        users.insert(0, me);
    }
    users
}
