use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use campus_db::models::FoundItemRow;
use campus_types::api::{
    Claims, FoundItemResponse, MatchLostItemRequest, MatchResult, PostFoundItemRequest,
};

use crate::auth::AppState;
use crate::points::{POINTS_ITEM_RETURNED, award_points};

pub async fn post_found_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostFoundItemRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let tags: Vec<String> = req
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let id = Uuid::new_v4().to_string();
    let finder = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_found_item(
            &id,
            &finder,
            title,
            req.description.as_deref(),
            req.location.as_deref(),
            &tags,
            req.photo_url.as_deref(),
            &created_at,
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok((
        StatusCode::CREATED,
        Json(FoundItemResponse {
            id,
            finder_id: finder,
            title: title.to_string(),
            description: req.description,
            location: req.location,
            tags,
            photo_url: req.photo_url,
            is_returned: false,
            returned_at: None,
            created_at,
        }),
    ))
}

pub async fn list_found_items(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_found_items()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

/// Only the finder may close out their own item. Doing so credits them for
/// the successful return.
pub async fn mark_returned(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();

    let item = state
        .db
        .get_found_item(&item_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if item.finder_id != me {
        return Err(StatusCode::FORBIDDEN);
    }
    if item.is_returned {
        return Err(StatusCode::CONFLICT);
    }

    state
        .db
        .mark_item_returned(&item_id, &campus_db::now_ts())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    award_points(&state, Some(&item.finder_id), POINTS_ITEM_RETURNED).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Match a free-text lost-item description against unreturned found items by
/// counting how many of each item's tags appear among the description's
/// tokens. Zero-score items are dropped; best matches first.
pub async fn match_lost_item(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<MatchLostItemRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let items = state
        .db
        .list_found_items()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let tokens = tokenize(&req.description);
    let mut scored: Vec<MatchResult> = items
        .into_iter()
        .filter_map(|item| {
            let score = overlap_score(&item.tags, &tokens);
            (score > 0).then(|| MatchResult {
                item: to_response(item),
                score,
            })
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(Json(scored))
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn overlap_score(tags: &[String], tokens: &[String]) -> usize {
    tags.iter().filter(|tag| tokens.contains(tag)).count()
}

fn to_response(row: FoundItemRow) -> FoundItemResponse {
    FoundItemResponse {
        id: row.id,
        finder_id: row.finder_id,
        title: row.title,
        description: row.description,
        location: row.location,
        tags: row.tags,
        photo_url: row.photo_url,
        is_returned: row.is_returned,
        returned_at: row.returned_at,
        created_at: row.created_at,
    }
}
