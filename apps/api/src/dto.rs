use std::str::FromStr;

use flock_core::{AppError, AppResult, CellId, NetworkId};
use flock_domain::{AccessRequest, AccessSet, ReportScope, RoleAssignment, RoleKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming payload for a capability check.
#[derive(Debug, Deserialize)]
pub struct AccessCheckRequest {
    pub capability: String,
    pub network_id: Option<Uuid>,
    pub cell_id: Option<Uuid>,
    pub report_scope: Option<String>,
}

impl AccessCheckRequest {
    /// Translates the transport payload into a typed access request.
    ///
    /// A scoped report request without an id stays representable (it is a
    /// denial, not a malformed request); other scoped capabilities without
    /// their id are rejected as validation errors.
    pub fn into_access_request(self) -> AppResult<AccessRequest> {
        let network = self.network_id.map(NetworkId::from_uuid);
        let cell = self.cell_id.map(CellId::from_uuid);

        match self.capability.as_str() {
            "manage_people" => Ok(AccessRequest::ManagePeople),
            "manage_events" => Ok(AccessRequest::ManageEvents),
            "manage_announcements" => Ok(AccessRequest::ManageAnnouncements),
            "access_network" => network.map(AccessRequest::AccessNetwork).ok_or_else(|| {
                AppError::Validation("access_network requires network_id".to_owned())
            }),
            "access_cell" => cell
                .map(AccessRequest::AccessCell)
                .ok_or_else(|| AppError::Validation("access_cell requires cell_id".to_owned())),
            "log_meeting" => cell
                .map(AccessRequest::LogMeeting)
                .ok_or_else(|| AppError::Validation("log_meeting requires cell_id".to_owned())),
            "view_reports" => {
                let scope = match self.report_scope.as_deref() {
                    Some("global") | None => ReportScope::Global,
                    Some("network") => ReportScope::Network(network),
                    Some("cell") => ReportScope::Cell(cell),
                    Some(other) => {
                        return Err(AppError::Validation(format!(
                            "unknown report scope '{other}'"
                        )));
                    }
                };
                Ok(AccessRequest::ViewReports(scope))
            }
            other => Err(AppError::Validation(format!(
                "unknown capability '{other}'"
            ))),
        }
    }
}

/// Outcome of a capability check; denial is data, not an error.
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub allowed: bool,
}

/// One side of the actor's access summary.
#[derive(Debug, Serialize)]
pub struct AccessSetResponse {
    pub all: bool,
    pub ids: Vec<Uuid>,
}

impl AccessSetResponse {
    fn from_set<T: Ord + Copy>(set: AccessSet<T>, as_uuid: impl Fn(T) -> Uuid) -> Self {
        match set {
            AccessSet::All => Self {
                all: true,
                ids: Vec::new(),
            },
            AccessSet::Ids(ids) => Self {
                all: false,
                ids: ids.into_iter().map(as_uuid).collect(),
            },
        }
    }

    /// Builds the cell side of the summary.
    #[must_use]
    pub fn from_cells(set: AccessSet<CellId>) -> Self {
        Self::from_set(set, |id| id.as_uuid())
    }

    /// Builds the network side of the summary.
    #[must_use]
    pub fn from_networks(set: AccessSet<NetworkId>) -> Self {
        Self::from_set(set, |id| id.as_uuid())
    }
}

/// The actor's accessible networks and cells.
#[derive(Debug, Serialize)]
pub struct AccessSummaryResponse {
    pub networks: AccessSetResponse,
    pub cells: AccessSetResponse,
}

/// Incoming payload for a role reconciliation.
#[derive(Debug, Deserialize)]
pub struct ReconcileAssignmentsRequest {
    pub role: String,
    pub network_id: Option<Uuid>,
    pub cell_id: Option<Uuid>,
}

impl ReconcileAssignmentsRequest {
    /// Parses the transport role value.
    pub fn role_kind(&self) -> AppResult<RoleKind> {
        RoleKind::from_str(self.role.as_str())
    }
}

/// API representation of one role assignment.
#[derive(Debug, Serialize)]
pub struct RoleAssignmentResponse {
    pub role: &'static str,
    pub network_id: Option<Uuid>,
    pub cell_id: Option<Uuid>,
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        let (kind, network, cell) = value.into_parts();
        Self {
            role: kind.as_str(),
            network_id: network.map(|id| id.as_uuid()),
            cell_id: cell.map(|id| id.as_uuid()),
        }
    }
}
