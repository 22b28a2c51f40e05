//! Authorization domain model and the pure access policy.

#![forbid(unsafe_code)]

mod audit;
mod context;
mod policy;
mod role;

pub use audit::AuditAction;
pub use context::AuthContext;
pub use policy::{
    AccessRequest, AccessSet, ReportScope, ResourceScope, require_permission,
};
pub use role::{RoleAssignment, RoleKind};
