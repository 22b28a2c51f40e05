use std::str::FromStr;

use flock_core::{AppError, CellId, NetworkId};
use serde::{Deserialize, Serialize};

/// Role categories enforced by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Unrestricted administrative capability.
    Admin,
    /// Leadership over a network of cells.
    NetworkLeader,
    /// Leadership over a single cell.
    CellLeader,
    /// Plain membership without elevated capability.
    Member,
}

impl RoleKind {
    /// Returns a stable storage value for this role kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::NetworkLeader => "network_leader",
            Self::CellLeader => "cell_leader",
            Self::Member => "member",
        }
    }

    /// Returns all known role kinds.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleKind] = &[
            RoleKind::Admin,
            RoleKind::NetworkLeader,
            RoleKind::CellLeader,
            RoleKind::Member,
        ];

        ALL
    }
}

impl FromStr for RoleKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "network_leader" => Ok(Self::NetworkLeader),
            "cell_leader" => Ok(Self::CellLeader),
            "member" => Ok(Self::Member),
            _ => Err(AppError::Validation(format!(
                "unknown role value '{value}'"
            ))),
        }
    }
}

/// One grant of capability or membership, carrying only the scope fields
/// that are valid for its role.
///
/// A person may hold any number of assignments at different scopes
/// simultaneously; nothing here assumes at most one per person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleAssignment {
    /// Unrestricted capability; never scoped.
    Admin,
    /// Network leadership, optionally tied to a specific network. A `None`
    /// scope is the capability held without a concrete assignment.
    NetworkLeader {
        /// Network this grant is tied to, if any.
        network: Option<NetworkId>,
    },
    /// Cell leadership, optionally tied to a specific cell.
    CellLeader {
        /// Cell this grant is tied to, if any.
        cell: Option<CellId>,
    },
    /// Membership fact: the person belongs to a network and/or cell,
    /// independent of any leadership capability held alongside.
    Member {
        /// Network the person belongs to, if recorded.
        network: Option<NetworkId>,
        /// Cell the person belongs to, if recorded.
        cell: Option<CellId>,
    },
}

impl RoleAssignment {
    /// Reconstructs an assignment from its stored parts.
    ///
    /// Admin rows are unrestricted regardless of any scope values the store
    /// carries, so stray scopes on them are dropped rather than rejected.
    /// Leader rows with a scope of the wrong shape are rejected.
    pub fn from_parts(
        kind: RoleKind,
        network: Option<NetworkId>,
        cell: Option<CellId>,
    ) -> Result<Self, AppError> {
        match kind {
            RoleKind::Admin => Ok(Self::Admin),
            RoleKind::NetworkLeader => {
                if cell.is_some() {
                    return Err(AppError::Validation(
                        "network leader assignment must not carry a cell scope".to_owned(),
                    ));
                }
                Ok(Self::NetworkLeader { network })
            }
            RoleKind::CellLeader => {
                if network.is_some() {
                    return Err(AppError::Validation(
                        "cell leader assignment must not carry a network scope".to_owned(),
                    ));
                }
                Ok(Self::CellLeader { cell })
            }
            RoleKind::Member => Ok(Self::Member { network, cell }),
        }
    }

    /// Returns the role kind of this assignment.
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        match self {
            Self::Admin => RoleKind::Admin,
            Self::NetworkLeader { .. } => RoleKind::NetworkLeader,
            Self::CellLeader { .. } => RoleKind::CellLeader,
            Self::Member { .. } => RoleKind::Member,
        }
    }

    /// Returns the network this assignment is scoped to, if any.
    #[must_use]
    pub fn network_scope(&self) -> Option<NetworkId> {
        match self {
            Self::Admin | Self::CellLeader { .. } => None,
            Self::NetworkLeader { network } | Self::Member { network, .. } => *network,
        }
    }

    /// Returns the cell this assignment is scoped to, if any.
    #[must_use]
    pub fn cell_scope(&self) -> Option<CellId> {
        match self {
            Self::Admin | Self::NetworkLeader { .. } => None,
            Self::CellLeader { cell } | Self::Member { cell, .. } => *cell,
        }
    }

    /// Decomposes the assignment into its stored parts.
    #[must_use]
    pub fn into_parts(self) -> (RoleKind, Option<NetworkId>, Option<CellId>) {
        (self.kind(), self.network_scope(), self.cell_scope())
    }
}
