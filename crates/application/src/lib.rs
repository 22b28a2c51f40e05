//! Application services and ports for the authorization subsystem.

#![forbid(unsafe_code)]

mod audit;
mod authorization_service;
mod role_admin_service;
mod role_ports;

pub use audit::{AuditEvent, AuditRepository};
pub use authorization_service::AuthorizationService;
pub use role_admin_service::{RoleAdminService, RoleReconciliationInput};
pub use role_ports::RoleAssignmentRepository;
