use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use campus_db::models::ConversationRow;
use campus_types::api::{
    Claims, ConversationResponse, MessageResponse, ResolveConversationRequest, SendMessageRequest,
};
use campus_types::context::ContextType;

use crate::auth::AppState;

/// Find or create the one conversation between the acting user and a target
/// user within a feature context. Repeated calls, from either side, return
/// the same conversation id.
pub async fn resolve_conversation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ResolveConversationRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();
    let target = req.target_user_id.trim().to_string();

    if target.is_empty() || req.context_id.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    // No conversations with yourself
    if target == me {
        return Err(StatusCode::BAD_REQUEST);
    }

    // Run blocking DB work off the async runtime
    let db = state.clone();
    let context_type = req.context_type;
    let context_id = req.context_id.clone();
    let title = req.context_title.clone();
    let conversation_id = tokio::task::spawn_blocking(move || {
        db.db
            .resolve_conversation(&me, &target, context_type.as_str(), &context_id, &title)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("resolve conversation failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ConversationResponse {
        conversation_id,
        context_type,
        context_label: context_type.label(),
        title: req.context_title,
    }))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();

    let db = state.clone();
    let cid = conversation_id.clone();
    let (convo, rows) = tokio::task::spawn_blocking(move || {
        let convo = db
            .db
            .get_conversation(&cid)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::NOT_FOUND)?;
        let rows = db
            .db
            .get_messages(&cid)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        Ok::<_, StatusCode>((convo, rows))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    require_participant(&convo, &me)?;

    let messages: Vec<MessageResponse> = rows
        .into_iter()
        .map(|row| MessageResponse {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            body: row.body,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();

    let body = req.body.trim().to_string();
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let message_id = Uuid::new_v4().to_string();
    let created_at = campus_db::now_ts();

    let db = state.clone();
    let cid = conversation_id.clone();
    let sender = me.clone();
    let mid = message_id.clone();
    let text = body.clone();
    let ts = created_at.clone();
    tokio::task::spawn_blocking(move || {
        let convo = db
            .db
            .get_conversation(&cid)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .ok_or(StatusCode::NOT_FOUND)?;
        require_participant(&convo, &sender)?;
        db.db
            .insert_message(&mid, &cid, &sender, &text, &ts)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })??;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            id: message_id,
            conversation_id,
            sender_id: me,
            body,
            created_at,
        }),
    ))
}

/// Conversations are private to their two participants; everyone else gets
/// 403 for both reading and sending.
fn require_participant(convo: &ConversationRow, user_id: &str) -> Result<(), StatusCode> {
    if convo.user_a == user_id || convo.user_b == user_id {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

/// Static description of each chat context, for clients that render the
/// header label and deep-link back into the owning feature.
pub async fn list_contexts() -> impl IntoResponse {
    let contexts: Vec<serde_json::Value> = [ContextType::Market, ContextType::Found, ContextType::GroupUp]
        .iter()
        .map(|ct| {
            serde_json::json!({
                "context_type": ct.as_str(),
                "label": ct.label(),
                "feature": ct.feature(),
            })
        })
        .collect();
    Json(contexts)
}
