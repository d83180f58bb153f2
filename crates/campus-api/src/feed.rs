use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use campus_types::api::{Claims, FeedItem};

use crate::auth::AppState;

const FEED_PER_TABLE: u32 = 10;

/// One merged view of recent campus activity across every feature.
pub async fn home_feed(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .recent_feed(FEED_PER_TABLE)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let items: Vec<FeedItem> = rows
        .into_iter()
        .map(|row| FeedItem {
            kind: row.kind,
            ref_id: row.ref_id,
            title: row.title,
            description: row.description,
            meta: row.meta,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(items))
}
