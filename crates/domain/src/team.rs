//! Manager/report graph derived from user manager links.

use std::collections::{HashMap, HashSet, VecDeque};

use talentgate_core::{AppError, AppResult};

use crate::user::{User, UserId};

/// Read-only view of the reporting hierarchy.
///
/// Built from a snapshot of users; traversal never loops even when the
/// snapshot itself is inconsistent.
#[derive(Debug, Clone, Default)]
pub struct TeamGraph {
    managers: HashMap<UserId, Option<UserId>>,
    reports: HashMap<UserId, Vec<UserId>>,
}

impl TeamGraph {
    /// Builds the graph from user manager links, keeping report order stable.
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        let mut managers = HashMap::new();
        let mut reports: HashMap<UserId, Vec<UserId>> = HashMap::new();

        for user in users {
            managers.insert(user.id(), user.manager_id());
            if let Some(manager_id) = user.manager_id() {
                reports.entry(manager_id).or_default().push(user.id());
            }
        }

        Self { managers, reports }
    }

    /// Returns the direct manager of a user.
    #[must_use]
    pub fn manager_of(&self, user_id: UserId) -> Option<UserId> {
        self.managers.get(&user_id).copied().flatten()
    }

    /// Returns the users whose manager is `user_id`.
    #[must_use]
    pub fn direct_reports(&self, user_id: UserId) -> Vec<UserId> {
        self.reports.get(&user_id).cloned().unwrap_or_default()
    }

    /// Returns every transitive report in breadth-first order, without duplicates.
    #[must_use]
    pub fn all_reports(&self, user_id: UserId) -> Vec<UserId> {
        let mut visited = HashSet::from([user_id]);
        let mut ordered = Vec::new();
        let mut queue = VecDeque::from(self.direct_reports(user_id));

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            ordered.push(current);
            queue.extend(self.direct_reports(current));
        }

        ordered
    }

    /// Ensures `manager_id` can become the manager of `user_id` without a cycle.
    pub fn ensure_manager_assignable(&self, user_id: UserId, manager_id: UserId) -> AppResult<()> {
        if user_id == manager_id {
            return Err(AppError::Conflict(format!(
                "user '{user_id}' cannot manage itself"
            )));
        }

        let mut visited = HashSet::new();
        let mut current = Some(manager_id);
        while let Some(ancestor) = current {
            if ancestor == user_id {
                return Err(AppError::Conflict(format!(
                    "assigning manager '{manager_id}' to user '{user_id}' would create a reporting cycle"
                )));
            }
            if !visited.insert(ancestor) {
                break;
            }
            current = self.manager_of(ancestor);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use talentgate_core::AppError;

    use super::TeamGraph;
    use crate::role::RoleId;
    use crate::user::{User, UserId};

    fn user(name: &str, manager_id: Option<UserId>) -> User {
        User::new(
            UserId::new(),
            name,
            format!("{}@example.com", name.to_lowercase()),
            RoleId::new(),
            None,
            manager_id,
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn all_reports_walks_the_whole_subtree() {
        let manager = user("Manager", None);
        let hiring = user("Hiring", Some(manager.id()));
        let recruiter_one = user("RecruiterOne", Some(hiring.id()));
        let recruiter_two = user("RecruiterTwo", Some(hiring.id()));
        let graph = TeamGraph::from_users([&manager, &hiring, &recruiter_one, &recruiter_two]);

        assert_eq!(graph.direct_reports(manager.id()), vec![hiring.id()]);
        assert_eq!(
            graph.all_reports(manager.id()),
            vec![hiring.id(), recruiter_one.id(), recruiter_two.id()]
        );
        assert!(graph.all_reports(recruiter_one.id()).is_empty());
        assert_eq!(graph.manager_of(hiring.id()), Some(manager.id()));
    }

    #[test]
    fn assigning_a_transitive_report_as_manager_conflicts() {
        let manager = user("Manager", None);
        let hiring = user("Hiring", Some(manager.id()));
        let recruiter = user("Recruiter", Some(hiring.id()));
        let graph = TeamGraph::from_users([&manager, &hiring, &recruiter]);

        let result = graph.ensure_manager_assignable(manager.id(), recruiter.id());
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let result = graph.ensure_manager_assignable(recruiter.id(), recruiter.id());
        assert!(matches!(result, Err(AppError::Conflict(_))));

        assert!(
            graph
                .ensure_manager_assignable(recruiter.id(), manager.id())
                .is_ok()
        );
    }

    #[test]
    fn traversal_terminates_on_corrupted_cycles() {
        let left_id = UserId::new();
        let right_id = UserId::new();
        let now = Utc::now();
        let left = User::new(
            left_id,
            "Left",
            "left@example.com",
            RoleId::new(),
            None,
            Some(right_id),
            now,
        )
        .unwrap_or_else(|_| unreachable!());
        let right = User::new(
            right_id,
            "Right",
            "right@example.com",
            RoleId::new(),
            None,
            Some(left_id),
            now,
        )
        .unwrap_or_else(|_| unreachable!());
        let graph = TeamGraph::from_users([&left, &right]);

        assert_eq!(graph.all_reports(left_id), vec![right_id]);
        let third = UserId::new();
        assert!(graph.ensure_manager_assignable(third, left_id).is_ok());
    }
}
