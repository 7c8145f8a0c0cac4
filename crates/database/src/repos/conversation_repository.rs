//! Repository for conversation data access operations.
//!
//! The inbox keeps a denormalized `unread_count` on each conversation. Every
//! operation that touches it pairs the counter write with the matching
//! message-flag write in one transaction, so the counter always equals the
//! number of incoming unread messages.

use crate::entities::{Conversation, ConversationProfile, ConversationSummary, Direction, Message};
use crate::types::{InboxError, InboxResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for conversation database operations
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find or create the conversation for a messenger-platform user.
    ///
    /// The platform is the source of identity: a first contact creates the
    /// conversation, a later one refreshes the profile fields and reactivates
    /// the thread if it had been closed.
    pub async fn upsert_by_platform_user(
        &self,
        profile: &ConversationProfile,
    ) -> InboxResult<Conversation> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = sqlx::query("SELECT public_id FROM conversations WHERE platform_user_id = ?")
            .bind(&profile.platform_user_id)
            .fetch_optional(&self.pool)
            .await?;

        let public_id = match existing {
            Some(row) => {
                let public_id: String = row.try_get("public_id")?;
                sqlx::query(
                    "UPDATE conversations SET display_name = ?, picture_url = ?, status_text = ?,
                            is_active = 1, updated_at = ?
                     WHERE public_id = ?",
                )
                .bind(&profile.display_name)
                .bind(&profile.picture_url)
                .bind(&profile.status_text)
                .bind(&now)
                .bind(&public_id)
                .execute(&self.pool)
                .await?;
                public_id
            }
            None => {
                let public_id = cuid2::cuid();
                sqlx::query(
                    "INSERT INTO conversations (public_id, platform_user_id, display_name, picture_url,
                                                status_text, unread_count, is_active, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, 0, 1, ?, ?)",
                )
                .bind(&public_id)
                .bind(&profile.platform_user_id)
                .bind(&profile.display_name)
                .bind(&profile.picture_url)
                .bind(&profile.status_text)
                .bind(&now)
                .bind(&now)
                .execute(&self.pool)
                .await?;

                info!(
                    public_id = %public_id,
                    platform_user_id = %profile.platform_user_id,
                    "created conversation"
                );
                public_id
            }
        };

        self.find_by_public_id(&public_id)
            .await?
            .ok_or(InboxError::ConversationNotFound)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> InboxResult<Option<Conversation>> {
        let row = sqlx::query(
            "SELECT id, public_id, platform_user_id, display_name, picture_url, status_text,
                    last_message_at, unread_count, is_active, created_at, updated_at
             FROM conversations WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_conversation(&row))
            .transpose()
            .map_err(Into::into)
    }

    /// List active conversations, most recent message first, each annotated
    /// with its latest message. `search` filters case-insensitively on the
    /// display name.
    pub async fn list_active(
        &self,
        search: Option<&str>,
        limit: i64,
    ) -> InboxResult<Vec<ConversationSummary>> {
        let select = "SELECT c.id, c.public_id, c.platform_user_id, c.display_name, c.picture_url,
                             c.status_text, c.last_message_at, c.unread_count, c.is_active,
                             c.created_at, c.updated_at,
                             m.id AS lm_id, m.public_id AS lm_public_id, m.direction AS lm_direction,
                             m.content AS lm_content, m.is_read AS lm_is_read, m.created_at AS lm_created_at
                      FROM conversations c
                      LEFT JOIN messages m ON m.id = (
                          SELECT id FROM messages WHERE conversation_id = c.id
                          ORDER BY created_at DESC, id DESC LIMIT 1
                      )
                      WHERE c.is_active = 1";

        let rows = match search {
            Some(term) => {
                let pattern = format!("%{}%", term.to_lowercase());
                let query = format!(
                    "{select} AND LOWER(c.display_name) LIKE ? ORDER BY c.last_message_at DESC LIMIT ?"
                );
                sqlx::query(&query)
                    .bind(pattern)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!("{select} ORDER BY c.last_message_at DESC LIMIT ?");
                sqlx::query(&query).bind(limit).fetch_all(&self.pool).await?
            }
        };

        let summaries = rows
            .iter()
            .map(|row| {
                let conversation = map_conversation(row)?;
                let last_message = match row.try_get::<Option<i64>, _>("lm_id")? {
                    Some(id) => {
                        let direction: String = row.try_get("lm_direction")?;
                        Some(Message {
                            id,
                            public_id: row.try_get("lm_public_id")?,
                            conversation_id: conversation.id,
                            direction: Direction::from(direction.as_str()),
                            content: row.try_get("lm_content")?,
                            is_read: row.try_get("lm_is_read")?,
                            created_at: row.try_get("lm_created_at")?,
                        })
                    }
                    None => None,
                };
                Ok(ConversationSummary {
                    conversation,
                    last_message,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(summaries)
    }

    /// Clear the unread signal for a conversation after it has been viewed.
    ///
    /// Resets the counter and marks every incoming unread message read in a
    /// single transaction, so a half-applied reset can never be observed.
    pub async fn mark_read(&self, conversation_id: i64) -> InboxResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE conversations SET unread_count = 0, updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE messages SET is_read = 1
             WHERE conversation_id = ? AND direction = 'incoming' AND is_read = 0",
        )
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Sum of unread counters across active conversations; 0 when there are
    /// none.
    pub async fn total_unread(&self) -> InboxResult<i64> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(unread_count), 0) FROM conversations WHERE is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total.0)
    }
}

fn map_conversation(row: &SqliteRow) -> Result<Conversation, sqlx::Error> {
    Ok(Conversation {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        platform_user_id: row.try_get("platform_user_id")?,
        display_name: row.try_get("display_name")?,
        picture_url: row.try_get("picture_url")?,
        status_text: row.try_get("status_text")?,
        last_message_at: row.try_get("last_message_at")?,
        unread_count: row.try_get("unread_count")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
