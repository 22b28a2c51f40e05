use std::sync::Arc;

use flock_core::{AppResult, CellId, NetworkId, PersonId};
use flock_domain::{AuditAction, AuthContext, RoleAssignment, RoleKind, require_permission};

use crate::{AuditEvent, AuditRepository, RoleAssignmentRepository};

/// New role selection applied to a person during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleReconciliationInput {
    /// Elevated capability to grant; `Member` means no elevated role.
    pub role: RoleKind,
    /// Network scope for the capability and/or membership.
    pub network: Option<NetworkId>,
    /// Cell scope for the capability and/or membership.
    pub cell: Option<CellId>,
}

/// Application service for administering role assignments.
#[derive(Clone)]
pub struct RoleAdminService {
    repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleAdminService {
    /// Creates a new role administration service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Returns the current assignments of a person, for administrators.
    pub async fn list_assignments(
        &self,
        actor: &AuthContext,
        person: PersonId,
    ) -> AppResult<Vec<RoleAssignment>> {
        require_permission(
            actor.can_manage_people(),
            format!("person '{}' may not manage role assignments", actor.person_id()),
        )?;

        self.repository.list_for_person(person).await
    }

    /// Replaces a person's assignments with the set implied by the input.
    ///
    /// The whole existing set is replaced in one repository transaction
    /// rather than diffed, so re-applying the same input is idempotent and
    /// concurrent edits for the same person serialize without leaving
    /// duplicate rows behind. Returns the new assignment set.
    pub async fn reconcile_assignments(
        &self,
        actor: &AuthContext,
        person: PersonId,
        input: RoleReconciliationInput,
    ) -> AppResult<Vec<RoleAssignment>> {
        require_permission(
            actor.can_manage_people(),
            format!("person '{}' may not manage role assignments", actor.person_id()),
        )?;

        let desired = desired_assignments(&input);
        self.repository
            .replace_for_person(person, desired.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor: actor.person_id(),
                action: AuditAction::RoleAssignmentsReconciled,
                resource_type: "role_assignment".to_owned(),
                resource_id: person.to_string(),
                detail: Some(describe_input(&input)),
            })
            .await?;

        Ok(desired)
    }

    /// Clears every assignment of a person, used when the person is removed
    /// from the directory or soft-deleted.
    pub async fn remove_assignments(
        &self,
        actor: &AuthContext,
        person: PersonId,
    ) -> AppResult<()> {
        require_permission(
            actor.can_manage_people(),
            format!("person '{}' may not manage role assignments", actor.person_id()),
        )?;

        self.repository.replace_for_person(person, Vec::new()).await?;

        self.audit_repository
            .append_event(AuditEvent {
                actor: actor.person_id(),
                action: AuditAction::RoleAssignmentsRemoved,
                resource_type: "role_assignment".to_owned(),
                resource_id: person.to_string(),
                detail: None,
            })
            .await
    }
}

/// Computes the assignment set a reconciliation input resolves to.
///
/// At most one elevated capability row, plus one membership fact when any
/// scope was provided. The membership fact is independent of the capability:
/// a cell leader still belongs to their cell.
fn desired_assignments(input: &RoleReconciliationInput) -> Vec<RoleAssignment> {
    let mut desired = Vec::with_capacity(2);

    match input.role {
        RoleKind::Admin => desired.push(RoleAssignment::Admin),
        RoleKind::NetworkLeader => desired.push(RoleAssignment::NetworkLeader {
            network: input.network,
        }),
        RoleKind::CellLeader => desired.push(RoleAssignment::CellLeader { cell: input.cell }),
        RoleKind::Member => {}
    }

    if input.network.is_some() || input.cell.is_some() {
        desired.push(RoleAssignment::Member {
            network: input.network,
            cell: input.cell,
        });
    }

    desired
}

fn describe_input(input: &RoleReconciliationInput) -> String {
    let network = input
        .network
        .map_or_else(|| "none".to_owned(), |id| id.to_string());
    let cell = input
        .cell
        .map_or_else(|| "none".to_owned(), |id| id.to_string());

    format!(
        "reconciled to role '{}' (network scope: {network}, cell scope: {cell})",
        input.role.as_str()
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use flock_core::{AppResult, CellId, NetworkId, PersonId};
    use flock_domain::{AuthContext, RoleAssignment, RoleKind};
    use tokio::sync::Mutex;

    use crate::{AuditEvent, AuditRepository, RoleAssignmentRepository};

    use super::{RoleAdminService, RoleReconciliationInput, desired_assignments};

    #[derive(Default)]
    struct FakeAuditRepository {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditRepository for FakeAuditRepository {
        async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeRoleAssignmentRepository {
        map: Mutex<HashMap<PersonId, Vec<RoleAssignment>>>,
    }

    #[async_trait]
    impl RoleAssignmentRepository for FakeRoleAssignmentRepository {
        async fn list_for_person(&self, person: PersonId) -> AppResult<Vec<RoleAssignment>> {
            Ok(self.map.lock().await.get(&person).cloned().unwrap_or_default())
        }

        async fn replace_for_person(
            &self,
            person: PersonId,
            assignments: Vec<RoleAssignment>,
        ) -> AppResult<()> {
            self.map.lock().await.insert(person, assignments);
            Ok(())
        }
    }

    fn admin_actor() -> AuthContext {
        AuthContext::new(PersonId::new(), vec![RoleAssignment::Admin])
    }

    fn service(
        repository: Arc<FakeRoleAssignmentRepository>,
        audit: Arc<FakeAuditRepository>,
    ) -> RoleAdminService {
        RoleAdminService::new(repository, audit)
    }

    #[tokio::test]
    async fn reconcile_replaces_previous_assignments() {
        let repository = Arc::new(FakeRoleAssignmentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = service(repository.clone(), audit.clone());
        let actor = admin_actor();
        let person = PersonId::new();
        let network = NetworkId::new();
        let cell = CellId::new();

        let first = RoleReconciliationInput {
            role: RoleKind::CellLeader,
            network: None,
            cell: Some(cell),
        };
        let second = RoleReconciliationInput {
            role: RoleKind::NetworkLeader,
            network: Some(network),
            cell: None,
        };

        let result = service.reconcile_assignments(&actor, person, first).await;
        assert!(result.is_ok());
        let result = service.reconcile_assignments(&actor, person, second).await;
        assert!(result.is_ok());

        let stored = repository.list_for_person(person).await;
        assert_eq!(
            stored.ok(),
            Some(vec![
                RoleAssignment::NetworkLeader {
                    network: Some(network)
                },
                RoleAssignment::Member {
                    network: Some(network),
                    cell: None
                },
            ])
        );
        assert_eq!(audit.events.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let repository = Arc::new(FakeRoleAssignmentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = service(repository.clone(), audit);
        let actor = admin_actor();
        let person = PersonId::new();
        let cell = CellId::new();

        let input = RoleReconciliationInput {
            role: RoleKind::CellLeader,
            network: None,
            cell: Some(cell),
        };

        let once = service.reconcile_assignments(&actor, person, input).await;
        let after_once = repository.list_for_person(person).await;
        let twice = service.reconcile_assignments(&actor, person, input).await;
        let after_twice = repository.list_for_person(person).await;

        assert!(once.is_ok());
        assert!(twice.is_ok());
        assert_eq!(after_once.ok(), after_twice.ok());
    }

    #[tokio::test]
    async fn member_without_scopes_clears_everything() {
        let repository = Arc::new(FakeRoleAssignmentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = service(repository.clone(), audit);
        let actor = admin_actor();
        let person = PersonId::new();

        let elevate = RoleReconciliationInput {
            role: RoleKind::Admin,
            network: None,
            cell: None,
        };
        let demote = RoleReconciliationInput {
            role: RoleKind::Member,
            network: None,
            cell: None,
        };

        assert!(service.reconcile_assignments(&actor, person, elevate).await.is_ok());
        assert!(service.reconcile_assignments(&actor, person, demote).await.is_ok());

        let stored = repository.list_for_person(person).await;
        assert_eq!(stored.ok(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn non_admin_actor_is_rejected() {
        let repository = Arc::new(FakeRoleAssignmentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = service(repository.clone(), audit.clone());
        let actor = AuthContext::new(
            PersonId::new(),
            vec![RoleAssignment::CellLeader {
                cell: Some(CellId::new()),
            }],
        );

        let input = RoleReconciliationInput {
            role: RoleKind::Admin,
            network: None,
            cell: None,
        };
        let result = service
            .reconcile_assignments(&actor, PersonId::new(), input)
            .await;

        assert!(result.is_err());
        assert!(audit.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn remove_clears_and_audits() {
        let repository = Arc::new(FakeRoleAssignmentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());
        let service = service(repository.clone(), audit.clone());
        let actor = admin_actor();
        let person = PersonId::new();

        let input = RoleReconciliationInput {
            role: RoleKind::CellLeader,
            network: None,
            cell: Some(CellId::new()),
        };
        assert!(service.reconcile_assignments(&actor, person, input).await.is_ok());
        assert!(service.remove_assignments(&actor, person).await.is_ok());

        let stored = repository.list_for_person(person).await;
        assert_eq!(stored.ok(), Some(Vec::new()));
        assert_eq!(audit.events.lock().await.len(), 2);
    }

    #[test]
    fn leadership_input_keeps_membership_fact() {
        let network = NetworkId::new();
        let cell = CellId::new();
        let input = RoleReconciliationInput {
            role: RoleKind::CellLeader,
            network: Some(network),
            cell: Some(cell),
        };

        let desired = desired_assignments(&input);
        assert_eq!(
            desired,
            vec![
                RoleAssignment::CellLeader { cell: Some(cell) },
                RoleAssignment::Member {
                    network: Some(network),
                    cell: Some(cell)
                },
            ]
        );
    }

    #[test]
    fn plain_membership_input_records_single_fact() {
        let cell = CellId::new();
        let input = RoleReconciliationInput {
            role: RoleKind::Member,
            network: None,
            cell: Some(cell),
        };

        let desired = desired_assignments(&input);
        assert_eq!(
            desired,
            vec![RoleAssignment::Member {
                network: None,
                cell: Some(cell)
            }]
        );
    }
}
