//! Repository for message history.

use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::entities::{CreateMessageRequest, StoredMessage};
use crate::types::{StoreError, StoreResult};

pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Durably store a message. Independent of the real-time path: a
    /// message may be stored without ever being delivered live, and vice
    /// versa.
    pub async fn insert(&self, request: &CreateMessageRequest) -> StoreResult<StoredMessage> {
        if request.content.is_empty() {
            return Err(StoreError::validation("message content must not be empty"));
        }

        let public_id = cuid2::create_id();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO messages (public_id, sender_id, receiver_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.sender_id)
        .bind(&request.receiver_id)
        .bind(&request.content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(
            public_id = %public_id,
            sender_id = %request.sender_id,
            receiver_id = %request.receiver_id,
            "stored message"
        );

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            public_id,
            sender_id: request.sender_id.clone(),
            receiver_id: request.receiver_id.clone(),
            content: request.content.clone(),
            created_at: now,
        })
    }

    /// Both directions of a conversation between two users, ordered by
    /// creation time ascending.
    pub async fn conversation(
        &self,
        user_a: &str,
        user_b: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StoreResult<Vec<StoredMessage>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = sqlx::query(
            "SELECT id, public_id, sender_id, receiver_id, content, created_at
             FROM messages
             WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?)
             ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_message_row).collect()
    }
}

fn map_message_row(row: sqlx::sqlite::SqliteRow) -> StoreResult<StoredMessage> {
    Ok(StoredMessage {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
    })
}
