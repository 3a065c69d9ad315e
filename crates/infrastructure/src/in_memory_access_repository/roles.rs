use super::*;

impl InMemoryAccessRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;

        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));

        Ok(roles)
    }

    pub(super) async fn find_role_by_name_impl(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .read()
            .await
            .roles
            .values()
            .find(|role| role.has_name(name))
            .cloned())
    }

    pub(super) async fn insert_role_impl(&self, role: Role) -> AppResult<()> {
        let mut state = self.state.write().await;

        if state.roles.contains_key(&role.id()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.id()
            )));
        }
        ensure_role_name_free(&state, &role)?;

        state.roles.insert(role.id(), role);
        Ok(())
    }

    pub(super) async fn update_role_impl(
        &self,
        role: Role,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;

        let stored = state.roles.get(&role.id()).ok_or_else(|| {
            AppError::NotFound(format!("role '{}' was not found", role.id()))
        })?;
        if stored.updated_at() != expected_updated_at {
            return Err(AppError::Conflict(format!(
                "role '{}' was modified concurrently; reload and retry",
                stored.name()
            )));
        }
        ensure_role_name_free(&state, &role)?;

        state.roles.insert(role.id(), role);
        Ok(())
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;

        let role = state
            .roles
            .get(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        if role.is_system_role() {
            return Err(AppError::Forbidden(format!(
                "system role '{}' cannot be deleted",
                role.name()
            )));
        }

        let holders = state
            .users
            .values()
            .filter(|user| user.role_id() == role_id)
            .count();
        if holders > 0 {
            return Err(AppError::Conflict(format!(
                "role '{}' is still assigned to {holders} user(s)",
                role.name()
            )));
        }

        state.roles.remove(&role_id);
        Ok(())
    }
}

fn ensure_role_name_free(state: &AccessState, role: &Role) -> AppResult<()> {
    let taken = state
        .roles
        .values()
        .any(|stored| stored.id() != role.id() && stored.has_name(role.name().as_str()));
    if taken {
        return Err(AppError::Conflict(format!(
            "role name '{}' is already in use",
            role.name()
        )));
    }

    Ok(())
}
