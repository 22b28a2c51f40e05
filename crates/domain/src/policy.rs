//! Pure access-decision predicates evaluated over an [`AuthContext`].
//!
//! Every function here is deterministic and free of I/O. A denial is a
//! `false` return or an empty set, never an error; [`require_permission`]
//! is the single escalation point for callers that must fail fast.

use std::collections::BTreeSet;

use flock_core::{AppError, AppResult, CellId, NetworkId};

use crate::{AuthContext, RoleAssignment, RoleKind};

/// The `(network, cell)` pair attached to a resource being accessed.
///
/// A meeting belongs to a cell, a cell belongs to a network; either side may
/// be absent for resources that sit higher in the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceScope {
    /// Network the resource belongs to, if any.
    pub network: Option<NetworkId>,
    /// Cell the resource belongs to, if any.
    pub cell: Option<CellId>,
}

/// Scope of a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Reports across the whole congregation; admin only.
    Global,
    /// Reports for one network. A missing id denies the request.
    Network(Option<NetworkId>),
    /// Reports for one cell. A missing id denies the request.
    Cell(Option<CellId>),
}

/// A typed capability request, the boundary form of a policy question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequest {
    /// Manage people and their role assignments.
    ManagePeople,
    /// Manage congregation-wide events.
    ManageEvents,
    /// Manage announcements.
    ManageAnnouncements,
    /// View or operate on a network.
    AccessNetwork(NetworkId),
    /// View or operate on a cell.
    AccessCell(CellId),
    /// Log a meeting for a cell.
    LogMeeting(CellId),
    /// View reports at the given scope.
    ViewReports(ReportScope),
}

/// Resolved set of accessible resource ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessSet<T> {
    /// Every resource is accessible; callers resolve this against the full
    /// resource list themselves.
    All,
    /// Only the listed ids are accessible. Empty means none.
    Ids(BTreeSet<T>),
}

impl<T: Ord> AccessSet<T> {
    /// Returns whether the set covers the given id.
    #[must_use]
    pub fn contains(&self, id: &T) -> bool {
        match self {
            Self::All => true,
            Self::Ids(ids) => ids.contains(id),
        }
    }

    /// Returns whether the set covers every resource.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl AuthContext {
    /// Returns whether any assignment has the given role kind, scope ignored.
    #[must_use]
    pub fn has_role(&self, kind: RoleKind) -> bool {
        self.assignments()
            .iter()
            .any(|assignment| assignment.kind() == kind)
    }

    /// Returns whether the actor holds an admin assignment.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(RoleKind::Admin)
    }

    /// Returns whether the actor leads any network at all.
    ///
    /// Coarse check used for navigation visibility; admins qualify.
    #[must_use]
    pub fn leads_any_network(&self) -> bool {
        self.is_admin() || self.has_role(RoleKind::NetworkLeader)
    }

    /// Returns whether the actor leads any cell at all.
    #[must_use]
    pub fn leads_any_cell(&self) -> bool {
        self.is_admin() || self.has_role(RoleKind::CellLeader)
    }

    /// Returns whether the actor leads the given network.
    #[must_use]
    pub fn is_network_leader_of(&self, network: NetworkId) -> bool {
        self.is_admin()
            || self.assignments().iter().any(|assignment| {
                matches!(
                    assignment,
                    RoleAssignment::NetworkLeader { network: Some(scope) } if *scope == network
                )
            })
    }

    /// Returns whether the actor leads the given cell.
    #[must_use]
    pub fn is_cell_leader_of(&self, cell: CellId) -> bool {
        self.is_admin()
            || self.assignments().iter().any(|assignment| {
                matches!(
                    assignment,
                    RoleAssignment::CellLeader { cell: Some(scope) } if *scope == cell
                )
            })
    }

    /// Returns whether the actor may access the given cell.
    ///
    /// True for admins, the cell's leader, and anyone holding an assignment
    /// scoped to the cell (members are recorded with a cell-scoped row).
    /// Network leadership over the cell's parent does not count here; parent
    /// inheritance is resolved only by [`AuthContext::can_access`], which
    /// sees the full resource scope.
    #[must_use]
    pub fn can_access_cell(&self, cell: CellId) -> bool {
        self.is_cell_leader_of(cell)
            || self
                .assignments()
                .iter()
                .any(|assignment| assignment.cell_scope() == Some(cell))
    }

    /// Returns whether the actor may access the given network.
    #[must_use]
    pub fn can_access_network(&self, network: NetworkId) -> bool {
        self.is_network_leader_of(network)
            || self
                .assignments()
                .iter()
                .any(|assignment| assignment.network_scope() == Some(network))
    }

    /// Returns whether the actor may access a resource with the given scope.
    ///
    /// This is the one place where network leadership is inherited downward:
    /// leading the scope's network grants access to cells under it. A scope
    /// with neither side set is a global resource, admin only.
    #[must_use]
    pub fn can_access(&self, scope: &ResourceScope) -> bool {
        if self.is_admin() {
            return true;
        }

        scope.cell.is_some_and(|cell| self.can_access_cell(cell))
            || scope
                .network
                .is_some_and(|network| self.is_network_leader_of(network))
    }

    /// Returns whether the actor may manage people and role assignments.
    #[must_use]
    pub fn can_manage_people(&self) -> bool {
        self.is_admin()
    }

    /// Returns whether the actor may manage events.
    #[must_use]
    pub fn can_manage_events(&self) -> bool {
        self.is_admin()
    }

    /// Returns whether the actor may manage announcements.
    #[must_use]
    pub fn can_manage_announcements(&self) -> bool {
        self.is_admin()
    }

    /// Returns whether the actor may log a meeting for the given cell.
    #[must_use]
    pub fn can_log_meeting(&self, cell: CellId) -> bool {
        self.can_access_cell(cell)
    }

    /// Returns whether the actor may view reports at the given scope.
    ///
    /// Scoped requests without a concrete id are denied, not errored.
    #[must_use]
    pub fn can_view_reports(&self, scope: ReportScope) -> bool {
        match scope {
            ReportScope::Global => self.is_admin(),
            ReportScope::Network(Some(network)) => self.can_access_network(network),
            ReportScope::Cell(Some(cell)) => self.can_access_cell(cell),
            ReportScope::Network(None) | ReportScope::Cell(None) => false,
        }
    }

    /// Returns the cells the actor may access.
    #[must_use]
    pub fn accessible_cells(&self) -> AccessSet<CellId> {
        if self.is_admin() {
            return AccessSet::All;
        }

        AccessSet::Ids(
            self.assignments()
                .iter()
                .filter_map(RoleAssignment::cell_scope)
                .collect(),
        )
    }

    /// Returns the networks the actor may access.
    #[must_use]
    pub fn accessible_networks(&self) -> AccessSet<NetworkId> {
        if self.is_admin() {
            return AccessSet::All;
        }

        AccessSet::Ids(
            self.assignments()
                .iter()
                .filter_map(RoleAssignment::network_scope)
                .collect(),
        )
    }

    /// Evaluates a typed capability request.
    #[must_use]
    pub fn allows(&self, request: &AccessRequest) -> bool {
        match request {
            AccessRequest::ManagePeople => self.can_manage_people(),
            AccessRequest::ManageEvents => self.can_manage_events(),
            AccessRequest::ManageAnnouncements => self.can_manage_announcements(),
            AccessRequest::AccessNetwork(network) => self.can_access_network(*network),
            AccessRequest::AccessCell(cell) => self.can_access_cell(*cell),
            AccessRequest::LogMeeting(cell) => self.can_log_meeting(*cell),
            AccessRequest::ViewReports(scope) => self.can_view_reports(*scope),
        }
    }
}

/// Escalates a denied check into a typed authorization error.
///
/// Reserved for mutating paths that must fail fast; page-visibility checks
/// use the plain predicates and decide the user-visible behavior themselves.
pub fn require_permission(allowed: bool, message: impl Into<String>) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.into()))
    }
}
