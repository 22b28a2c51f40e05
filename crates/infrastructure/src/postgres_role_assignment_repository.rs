use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use flock_application::RoleAssignmentRepository;
use flock_core::{AppError, AppResult, CellId, NetworkId, PersonId};
use flock_domain::{RoleAssignment, RoleKind};

/// PostgreSQL-backed repository for role-assignment rows.
#[derive(Clone)]
pub struct PostgresRoleAssignmentRepository {
    pool: PgPool,
}

impl PostgresRoleAssignmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    role: String,
    network_id: Option<uuid::Uuid>,
    cell_id: Option<uuid::Uuid>,
}

impl RoleAssignmentRow {
    fn decode(self, person: PersonId) -> AppResult<RoleAssignment> {
        let kind = RoleKind::from_str(self.role.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode role '{}' for person '{person}': {error}",
                self.role
            ))
        })?;

        RoleAssignment::from_parts(
            kind,
            self.network_id.map(NetworkId::from_uuid),
            self.cell_id.map(CellId::from_uuid),
        )
        .map_err(|error| {
            AppError::Internal(format!(
                "invalid stored assignment for person '{person}': {error}"
            ))
        })
    }
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleAssignmentRepository {
    async fn list_for_person(&self, person: PersonId) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT role, network_id, cell_id
            FROM role_assignments
            WHERE person_id = $1
            ORDER BY role, network_id, cell_id
            "#,
        )
        .bind(person.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load role assignments: {error}"))
        })?;

        rows.into_iter().map(|row| row.decode(person)).collect()
    }

    async fn replace_for_person(
        &self,
        person: PersonId,
        assignments: Vec<RoleAssignment>,
    ) -> AppResult<()> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // Replacements for one person must queue behind each other: at the
        // default isolation level two delete-then-insert transactions can
        // both delete nothing and both insert, committing a merged set that
        // matches neither serial ordering. The advisory lock is released at
        // commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
            .bind(person.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to lock role assignments: {error}"))
            })?;

        sqlx::query(
            r#"
            DELETE FROM role_assignments
            WHERE person_id = $1
            "#,
        )
        .bind(person.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear role assignments: {error}"))
        })?;

        for assignment in &assignments {
            let (kind, network, cell) = assignment.into_parts();
            sqlx::query(
                r#"
                INSERT INTO role_assignments (person_id, role, network_id, cell_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(person.as_uuid())
            .bind(kind.as_str())
            .bind(network.map(|id| id.as_uuid()))
            .bind(cell.map(|id| id.as_uuid()))
            .execute(&mut *transaction)
            .await
            .map_err(map_assignment_insert_error)?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        debug!(%person, count = assignments.len(), "replaced role assignments");
        Ok(())
    }
}

fn map_assignment_insert_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(database_error) = &error {
        if database_error.code().as_deref() == Some("23505") {
            return AppError::Conflict(
                "role assignment already exists for this person and scope".to_owned(),
            );
        }
    }

    AppError::Internal(format!("failed to persist role assignment: {error}"))
}
