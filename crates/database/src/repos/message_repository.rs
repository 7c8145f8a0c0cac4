//! Repository for message data access operations.

use crate::entities::{Direction, Message};
use crate::types::InboxResult;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for message database operations
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Page through a conversation's messages.
    ///
    /// Fetches the newest `limit` messages, optionally restricted to those
    /// created strictly before `before` (backward pagination), and returns
    /// them oldest-first for chronological display.
    pub async fn page_for_conversation(
        &self,
        conversation_id: i64,
        limit: i64,
        before: Option<&str>,
    ) -> InboxResult<Vec<Message>> {
        let rows = match before {
            Some(cursor) => {
                sqlx::query(
                    "SELECT id, public_id, conversation_id, direction, content, is_read, created_at
                     FROM messages WHERE conversation_id = ? AND created_at < ?
                     ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(conversation_id)
                .bind(cursor)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, public_id, conversation_id, direction, content, is_read, created_at
                     FROM messages WHERE conversation_id = ?
                     ORDER BY created_at DESC, id DESC LIMIT ?",
                )
                .bind(conversation_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut messages = rows
            .iter()
            .map(map_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;
        messages.reverse();

        Ok(messages)
    }

    /// Record a message arriving from the messenger platform.
    ///
    /// Inserts the unread incoming message, bumps the conversation's unread
    /// counter, and advances `last_message_at`, all in one transaction.
    pub async fn record_incoming(
        &self,
        conversation_id: i64,
        content: &str,
    ) -> InboxResult<Message> {
        self.record(conversation_id, Direction::Incoming, content)
            .await
    }

    /// Record a message sent from the back office. Outgoing messages carry no
    /// unread signal; only `last_message_at` moves.
    pub async fn record_outgoing(
        &self,
        conversation_id: i64,
        content: &str,
    ) -> InboxResult<Message> {
        self.record(conversation_id, Direction::Outgoing, content)
            .await
    }

    async fn record(
        &self,
        conversation_id: i64,
        direction: Direction,
        content: &str,
    ) -> InboxResult<Message> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();
        let is_read = direction == Direction::Outgoing;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO messages (public_id, conversation_id, direction, content, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(conversation_id)
        .bind(direction.as_str())
        .bind(content)
        .bind(is_read)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let message_id = result.last_insert_rowid();

        match direction {
            Direction::Incoming => {
                sqlx::query(
                    "UPDATE conversations SET unread_count = unread_count + 1,
                            last_message_at = ?, updated_at = ?
                     WHERE id = ?",
                )
                .bind(&now)
                .bind(&now)
                .bind(conversation_id)
                .execute(&mut *tx)
                .await?;
            }
            Direction::Outgoing => {
                sqlx::query(
                    "UPDATE conversations SET last_message_at = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&now)
                .bind(&now)
                .bind(conversation_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(
            message_id,
            conversation_id,
            direction = %direction,
            "recorded message"
        );

        Ok(Message {
            id: message_id,
            public_id,
            conversation_id,
            direction,
            content: content.to_string(),
            is_read,
            created_at: now,
        })
    }
}

fn map_row(row: &SqliteRow) -> Result<Message, sqlx::Error> {
    let direction: String = row.try_get("direction")?;
    Ok(Message {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        conversation_id: row.try_get("conversation_id")?,
        direction: Direction::from(direction.as_str()),
        content: row.try_get("content")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}
