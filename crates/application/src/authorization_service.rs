use std::sync::Arc;

use flock_core::{AppResult, PersonId};
use flock_domain::AuthContext;

use crate::RoleAssignmentRepository;

/// Application service that resolves authorization contexts.
///
/// A context is resolved once per request and then passed explicitly into
/// the pure policy checks; nothing downstream re-queries the store.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn RoleAssignmentRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleAssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the immutable authorization context for a person.
    ///
    /// A person without any assignment rows yields an empty context; every
    /// policy predicate then evaluates to a denial.
    pub async fn context_for(&self, person: PersonId) -> AppResult<AuthContext> {
        let assignments = self.repository.list_for_person(person).await?;
        Ok(AuthContext::new(person, assignments))
    }
}
