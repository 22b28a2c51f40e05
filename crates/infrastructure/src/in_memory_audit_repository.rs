use async_trait::async_trait;
use tokio::sync::Mutex;

use flock_application::{AuditEvent, AuditRepository};
use flock_core::AppResult;

/// In-memory append-only audit log for tests and local runs.
#[derive(Default)]
pub struct InMemoryAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use flock_application::{AuditEvent, AuditRepository};
    use flock_core::PersonId;
    use flock_domain::AuditAction;

    use super::InMemoryAuditRepository;

    #[tokio::test]
    async fn append_preserves_order() {
        let repository = InMemoryAuditRepository::new();
        let actor = PersonId::new();

        for action in [
            AuditAction::RoleAssignmentsReconciled,
            AuditAction::RoleAssignmentsRemoved,
        ] {
            let appended = repository
                .append_event(AuditEvent {
                    actor,
                    action,
                    resource_type: "role_assignment".to_owned(),
                    resource_id: actor.to_string(),
                    detail: None,
                })
                .await;
            assert!(appended.is_ok());
        }

        let events = repository.events().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::RoleAssignmentsReconciled);
        assert_eq!(events[1].action, AuditAction::RoleAssignmentsRemoved);
    }
}
