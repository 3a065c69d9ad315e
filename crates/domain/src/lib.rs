//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod permission;
mod role;
mod team;
mod user;

pub use audit::AuditAction;
pub use permission::{Action, KNOWN_SUBJECTS, Permission, PermissionSet, Subject};
pub use role::{Role, RoleId, RoleLevel};
pub use team::TeamGraph;
pub use user::{EmailAddress, User, UserId};
