use std::collections::HashMap;

use super::*;

impl UserDirectory {
    /// Returns the direct manager of a user.
    pub async fn get_manager(&self, user_id: UserId) -> AppResult<Option<User>> {
        let user = self.get_user(user_id).await?;
        match user.manager_id() {
            Some(manager_id) => self.users.find_user(manager_id).await,
            None => Ok(None),
        }
    }

    /// Returns the users reporting directly to `user_id`, ordered by name.
    pub async fn get_direct_reports(&self, user_id: UserId) -> AppResult<Vec<User>> {
        self.get_user(user_id).await?;

        let mut reports: Vec<User> = self
            .users
            .list_users()
            .await?
            .into_iter()
            .filter(|user| user.manager_id() == Some(user_id))
            .collect();
        sort_by_name(&mut reports);
        Ok(reports)
    }

    /// Returns every transitive report of `user_id` in breadth-first order.
    pub async fn get_all_reports(&self, user_id: UserId) -> AppResult<Vec<User>> {
        self.get_user(user_id).await?;

        let users = self.users.list_users().await?;
        let graph = TeamGraph::from_users(users.iter());
        let mut by_id: HashMap<UserId, User> =
            users.into_iter().map(|user| (user.id(), user)).collect();

        Ok(graph
            .all_reports(user_id)
            .into_iter()
            .filter_map(|report_id| by_id.remove(&report_id))
            .collect())
    }
}
