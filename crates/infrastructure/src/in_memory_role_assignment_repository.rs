use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use flock_application::RoleAssignmentRepository;
use flock_core::{AppResult, PersonId};
use flock_domain::RoleAssignment;

/// In-memory role-assignment store for tests and local runs.
///
/// The single lock makes every replacement atomic: readers see the prior or
/// the new set, never a partially applied one.
#[derive(Default)]
pub struct InMemoryRoleAssignmentRepository {
    assignments: Mutex<HashMap<PersonId, Vec<RoleAssignment>>>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn list_for_person(&self, person: PersonId) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .lock()
            .await
            .get(&person)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_for_person(
        &self,
        person: PersonId,
        assignments: Vec<RoleAssignment>,
    ) -> AppResult<()> {
        let mut guard = self.assignments.lock().await;
        if assignments.is_empty() {
            guard.remove(&person);
        } else {
            guard.insert(person, assignments);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use flock_application::RoleAssignmentRepository;
    use flock_core::{CellId, NetworkId, PersonId};
    use flock_domain::RoleAssignment;

    use super::InMemoryRoleAssignmentRepository;

    #[tokio::test]
    async fn replace_swaps_the_whole_set() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let person = PersonId::new();
        let cell = CellId::new();

        let seeded = repository
            .replace_for_person(
                person,
                vec![RoleAssignment::CellLeader { cell: Some(cell) }],
            )
            .await;
        assert!(seeded.is_ok());

        let replaced = repository
            .replace_for_person(person, vec![RoleAssignment::Admin])
            .await;
        assert!(replaced.is_ok());

        let stored = repository.list_for_person(person).await;
        assert_eq!(stored.ok(), Some(vec![RoleAssignment::Admin]));
    }

    #[tokio::test]
    async fn empty_replacement_clears_the_person() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let person = PersonId::new();

        let seeded = repository
            .replace_for_person(person, vec![RoleAssignment::Admin])
            .await;
        assert!(seeded.is_ok());

        let cleared = repository.replace_for_person(person, Vec::new()).await;
        assert!(cleared.is_ok());

        let stored = repository.list_for_person(person).await;
        assert_eq!(stored.ok(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn concurrent_replacements_serialize() {
        let repository = Arc::new(InMemoryRoleAssignmentRepository::new());
        let person = PersonId::new();
        let network = NetworkId::new();
        let cell = CellId::new();

        let first_set = vec![RoleAssignment::NetworkLeader {
            network: Some(network),
        }];
        let second_set = vec![RoleAssignment::CellLeader { cell: Some(cell) }];

        let first = tokio::spawn({
            let repository = repository.clone();
            let set = first_set.clone();
            async move { repository.replace_for_person(person, set).await }
        });
        let second = tokio::spawn({
            let repository = repository.clone();
            let set = second_set.clone();
            async move { repository.replace_for_person(person, set).await }
        });

        let (first, second) = tokio::join!(first, second);
        assert!(matches!(first, Ok(Ok(()))));
        assert!(matches!(second, Ok(Ok(()))));

        // The store must equal one of the two serial outcomes, never a mix.
        let stored = repository.list_for_person(person).await.ok();
        let outcome = stored.unwrap_or_default();
        assert!(outcome == first_set || outcome == second_set);
    }
}
