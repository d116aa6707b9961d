//! Repository for mentor/student connections.

use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::entities::{
    Connection, ConnectionStatus, ConnectionWithPartner, CreateConnectionRequest,
};
use crate::repos::profile_repository::map_profile_row;
use crate::types::{StoreError, StoreResult};

pub struct ConnectionRepository {
    pool: SqlitePool,
}

impl ConnectionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a pending connection between a mentor and a student.
    pub async fn create(&self, request: &CreateConnectionRequest) -> StoreResult<Connection> {
        if request.mentor_id == request.student_id {
            return Err(StoreError::validation(
                "a connection needs two distinct participants",
            ));
        }

        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO connections (public_id, mentor_id, student_id, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.mentor_id)
        .bind(&request.student_id)
        .bind(ConnectionStatus::Pending.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(
            public_id = %public_id,
            mentor_id = %request.mentor_id,
            student_id = %request.student_id,
            "created connection"
        );

        Ok(Connection {
            id: result.last_insert_rowid(),
            public_id,
            mentor_id: request.mentor_id.clone(),
            student_id: request.student_id.clone(),
            status: ConnectionStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<Connection>> {
        let row = sqlx::query(
            "SELECT id, public_id, mentor_id, student_id, status, created_at, updated_at
             FROM connections WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_connection_row).transpose()
    }

    /// Accept or reject a connection.
    pub async fn set_status(
        &self,
        public_id: &str,
        status: ConnectionStatus,
    ) -> StoreResult<Connection> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE connections SET status = ?, updated_at = ? WHERE public_id = ?",
        )
        .bind(status.as_str())
        .bind(&now)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::connection_not_found(public_id));
        }

        info!(public_id = %public_id, status = %status, "updated connection status");

        self.find_by_public_id(public_id)
            .await?
            .ok_or_else(|| StoreError::connection_not_found(public_id))
    }

    /// Connections a user participates in, joined to the partner profile.
    /// The partner is whichever side of the pairing is not `participant`.
    pub async fn list_for_participant(
        &self,
        participant: &str,
        status: Option<ConnectionStatus>,
    ) -> StoreResult<Vec<ConnectionWithPartner>> {
        let mut sql = String::from(
            "SELECT c.id AS c_id, c.public_id AS c_public_id, c.mentor_id, c.student_id,
                    c.status AS c_status, c.created_at AS c_created_at, c.updated_at AS c_updated_at,
                    p.id, p.public_id, p.email, p.display_name, p.role, p.avatar_path,
                    p.created_at, p.updated_at
             FROM connections c
             JOIN profiles p ON p.public_id =
                 CASE WHEN c.mentor_id = ? THEN c.student_id ELSE c.mentor_id END
             WHERE (c.mentor_id = ? OR c.student_id = ?)",
        );
        if status.is_some() {
            sql.push_str(" AND c.status = ?");
        }
        sql.push_str(" ORDER BY c.created_at ASC");

        let mut query = sqlx::query(&sql)
            .bind(participant)
            .bind(participant)
            .bind(participant);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| {
                let status: String = row.try_get("c_status")?;
                let connection = Connection {
                    id: row.try_get("c_id")?,
                    public_id: row.try_get("c_public_id")?,
                    mentor_id: row.try_get("mentor_id")?,
                    student_id: row.try_get("student_id")?,
                    status: ConnectionStatus::from(status.as_str()),
                    created_at: row.try_get("c_created_at")?,
                    updated_at: row.try_get("c_updated_at")?,
                };
                let partner = map_profile_row(row)?;
                Ok(ConnectionWithPartner {
                    connection,
                    partner,
                })
            })
            .collect()
    }
}

fn map_connection_row(row: sqlx::sqlite::SqliteRow) -> StoreResult<Connection> {
    let status: String = row.try_get("status")?;
    Ok(Connection {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        mentor_id: row.try_get("mentor_id")?,
        student_id: row.try_get("student_id")?,
        status: ConnectionStatus::from(status.as_str()),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
