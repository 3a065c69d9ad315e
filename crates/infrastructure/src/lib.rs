//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod access_snapshot;
mod in_memory_access_repository;
mod in_memory_audit_repository;
mod role_seed_file;
mod tracing_audit_repository;

pub use access_snapshot::AccessSnapshot;
pub use in_memory_access_repository::InMemoryAccessRepository;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use role_seed_file::load_role_seeds;
pub use tracing_audit_repository::TracingAuditRepository;
