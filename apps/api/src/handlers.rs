//! HTTP handlers for the authorization API.

pub mod authz;
pub mod health;
pub mod roles;
