use async_trait::async_trait;
use flock_core::{AppResult, PersonId};
use flock_domain::RoleAssignment;

/// Repository port for role-assignment rows.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Lists every assignment currently held by a person.
    async fn list_for_person(&self, person: PersonId) -> AppResult<Vec<RoleAssignment>>;

    /// Atomically replaces every assignment held by a person.
    ///
    /// Implementations must apply the delete and the inserts as one
    /// transaction: concurrent replacements for the same person serialize,
    /// and readers observe either the prior or the new set, never a partial
    /// interleaving. Passing an empty set clears the person's assignments.
    async fn replace_for_person(
        &self,
        person: PersonId,
        assignments: Vec<RoleAssignment>,
    ) -> AppResult<()>;
}
