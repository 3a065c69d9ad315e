//! Application services and ports for role-based access control.

#![forbid(unsafe_code)]

mod access_admin_service;
mod access_ports;
mod authorization_service;
mod role_registry;
mod user_directory;

#[cfg(test)]
mod test_support;

pub use access_admin_service::AccessAdminService;
pub use access_ports::{
    AuditEvent, AuditRepository, CreateRoleInput, CreateUserInput, ManagerUpdate,
    RoleRepository, SystemRoleSeed, UpdateRoleInput, UpdateUserInput, UserRepository,
};
pub use authorization_service::{
    AuthorizationService, PermissionMatrix, PermissionMatrixRole, PermissionMatrixRow,
};
pub use role_registry::{RoleRegistry, default_role_ladder};
pub use user_directory::UserDirectory;
