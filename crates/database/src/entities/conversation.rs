//! Conversation entity definitions
//!
//! A conversation is the thread with one messenger-platform user. The
//! `unread_count` column mirrors the number of incoming unread messages;
//! every write that could move the two out of step happens inside a single
//! transaction in the repositories.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub public_id: String,
    pub platform_user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub status_text: Option<String>,
    pub last_message_at: Option<String>,
    pub unread_count: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile fields supplied by the messenger platform when a conversation is
/// created or refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationProfile {
    pub platform_user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub status_text: Option<String>,
}

/// A conversation annotated with its most recent message, as shown in the
/// inbox list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation: Conversation,
    pub last_message: Option<super::message::Message>,
}
