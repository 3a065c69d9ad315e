mod audit;
mod inputs;
mod repositories;

pub use audit::{AuditEvent, AuditRepository};
pub use inputs::{
    CreateRoleInput, CreateUserInput, ManagerUpdate, SystemRoleSeed, UpdateRoleInput,
    UpdateUserInput,
};
pub use repositories::{RoleRepository, UserRepository};
