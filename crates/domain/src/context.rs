use flock_core::PersonId;
use serde::{Deserialize, Serialize};

use crate::RoleAssignment;

/// The authenticated actor for one request.
///
/// Holds an immutable snapshot of the person's role assignments, resolved
/// once per request and passed explicitly into every policy check. Order of
/// the assignments carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    person_id: PersonId,
    assignments: Vec<RoleAssignment>,
}

impl AuthContext {
    /// Creates a context from a person and their resolved assignments.
    #[must_use]
    pub fn new(person_id: PersonId, assignments: Vec<RoleAssignment>) -> Self {
        Self {
            person_id,
            assignments,
        }
    }

    /// Returns the person this context was resolved for.
    #[must_use]
    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    /// Returns the assignment snapshot.
    #[must_use]
    pub fn assignments(&self) -> &[RoleAssignment] {
        self.assignments.as_slice()
    }
}
