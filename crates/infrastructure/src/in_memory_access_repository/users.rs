use super::*;

impl InMemoryAccessRepository {
    pub(super) async fn list_users_impl(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;

        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(users)
    }

    pub(super) async fn find_user_by_email_impl(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.trim().to_lowercase();

        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| user.email().as_str() == email)
            .cloned())
    }

    pub(super) async fn insert_user_impl(&self, user: User) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.users.contains_key(&user.id()) {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                user.id()
            )));
        }
        ensure_references(&state, &user)?;
        ensure_email_free(&state, &user)?;

        state.users.insert(user.id(), user);
        Ok(())
    }

    pub(super) async fn update_user_impl(
        &self,
        user: User,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;

        let stored = state.users.get(&user.id()).ok_or_else(|| {
            AppError::NotFound(format!("user '{}' was not found", user.id()))
        })?;
        if stored.updated_at() != expected_updated_at {
            return Err(AppError::Conflict(format!(
                "user '{}' was modified concurrently; reload and retry",
                stored.email().as_str()
            )));
        }
        ensure_references(&state, &user)?;
        ensure_email_free(&state, &user)?;
        if let Some(manager_id) = user.manager_id() {
            TeamGraph::from_users(state.users.values())
                .ensure_manager_assignable(user.id(), manager_id)?;
        }

        state.users.insert(user.id(), user);
        Ok(())
    }

    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<()> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .get(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        let reports = state
            .users
            .values()
            .filter(|other| other.manager_id() == Some(user_id))
            .count();
        if reports > 0 {
            return Err(AppError::Conflict(format!(
                "user '{}' still manages {reports} user(s)",
                user.name()
            )));
        }

        state.users.remove(&user_id);
        Ok(())
    }
}

fn ensure_references(state: &AccessState, user: &User) -> AppResult<()> {
    if !state.roles.contains_key(&user.role_id()) {
        return Err(AppError::Validation(format!(
            "role '{}' does not exist",
            user.role_id()
        )));
    }

    if let Some(manager_id) = user.manager_id()
        && !state.users.contains_key(&manager_id)
    {
        return Err(AppError::Validation(format!(
            "manager '{manager_id}' does not exist"
        )));
    }

    Ok(())
}

fn ensure_email_free(state: &AccessState, user: &User) -> AppResult<()> {
    let taken = state
        .users
        .values()
        .any(|stored| stored.id() != user.id() && stored.email() == user.email());
    if taken {
        return Err(AppError::Conflict(format!(
            "email '{}' is already in use",
            user.email().as_str()
        )));
    }

    Ok(())
}
