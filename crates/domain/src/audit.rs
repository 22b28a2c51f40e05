use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a person's role assignments are replaced.
    RoleAssignmentsReconciled,
    /// Emitted when a person's role assignments are cleared.
    RoleAssignmentsRemoved,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleAssignmentsReconciled => "security.role_assignments.reconciled",
            Self::RoleAssignmentsRemoved => "security.role_assignments.removed",
        }
    }
}
