//! Messaging inbox REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub id: String,
    pub platform_user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub status_text: Option<String>,
    pub last_message_at: Option<String>,
    pub unread_count: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl From<mealbox_database::Conversation> for ConversationResponse {
    fn from(conversation: mealbox_database::Conversation) -> Self {
        Self {
            id: conversation.public_id,
            platform_user_id: conversation.platform_user_id,
            display_name: conversation.display_name,
            picture_url: conversation.picture_url,
            status_text: conversation.status_text,
            last_message_at: conversation.last_message_at,
            unread_count: conversation.unread_count,
            is_active: conversation.is_active,
            created_at: conversation.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub direction: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<mealbox_database::Message> for MessageResponse {
    fn from(message: mealbox_database::Message) -> Self {
        Self {
            id: message.public_id,
            direction: message.direction.as_str().to_string(),
            content: message.content,
            is_read: message.is_read,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationSummaryResponse {
    #[serde(flatten)]
    pub conversation: ConversationResponse,
    pub last_message: Option<MessageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationDetailResponse {
    pub conversation: ConversationResponse,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadResponse {
    #[serde(rename = "unreadCount")]
    pub unread_count: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListConversationsQuery {
    /// Case-insensitive substring match on the display name
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConversationDetailQuery {
    pub limit: Option<i64>,
    /// Return only messages created strictly before this RFC 3339 timestamp
    pub before: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Create conversation routes
pub fn create_conversation_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/conversations", axum::routing::get(list_conversations))
        .route(
            "/conversations/:conversation_id",
            axum::routing::get(get_conversation),
        )
        .route(
            "/conversations/:conversation_id/messages",
            axum::routing::post(send_message),
        )
        .route("/unread", axum::routing::get(total_unread))
}

#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "Inbox",
    params(ListConversationsQuery),
    responses(
        (status = 200, description = "Active conversations, most recent first", body = Vec<ConversationSummaryResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_conversations(
    Query(params): Query<ListConversationsQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<ConversationSummaryResponse>>> {
    let limit = state.page_size(params.limit);
    let summaries = state
        .conversations
        .list_active(params.search.as_deref(), limit)
        .await?;

    let responses = summaries
        .into_iter()
        .map(|summary| ConversationSummaryResponse {
            conversation: summary.conversation.into(),
            last_message: summary.last_message.map(Into::into),
        })
        .collect();

    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/conversations/{conversation_id}",
    tag = "Inbox",
    params(
        ("conversation_id" = String, Path, description = "Conversation public ID"),
        ConversationDetailQuery
    ),
    responses(
        (status = 200, description = "Conversation with chronological message page", body = ConversationDetailResponse),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_conversation(
    Path(conversation_id): Path<String>,
    Query(params): Query<ConversationDetailQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<ConversationDetailResponse>> {
    let mut conversation = state
        .conversations
        .find_by_public_id(&conversation_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Conversation not found".to_string()))?;

    let limit = state.page_size(params.limit);
    let messages = state
        .messages
        .page_for_conversation(conversation.id, limit, params.before.as_deref())
        .await?;

    // Viewing the conversation clears its unread signal.
    state.conversations.mark_read(conversation.id).await?;
    conversation.unread_count = 0;

    Ok(Json(ConversationDetailResponse {
        conversation: conversation.into(),
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{conversation_id}/messages",
    tag = "Inbox",
    params(("conversation_id" = String, Path, description = "Conversation public ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Outgoing message recorded", body = MessageResponse),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn send_message(
    Path(conversation_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Json(payload): Json<SendMessageRequest>,
) -> GatewayResult<impl IntoResponse> {
    let conversation = state
        .conversations
        .find_by_public_id(&conversation_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound("Conversation not found".to_string()))?;

    let message = state
        .messages
        .record_outgoing(conversation.id, &payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

#[utoipa::path(
    get,
    path = "/api/unread",
    tag = "Inbox",
    responses(
        (status = 200, description = "Sum of unread counters across active conversations", body = UnreadResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn total_unread(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<UnreadResponse>> {
    let unread_count = state.conversations.total_unread().await?;
    Ok(Json(UnreadResponse { unread_count }))
}
