use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use campus_db::models::GroupPostRow;
use campus_types::api::{Claims, CreateGroupPostRequest, GroupPostResponse};

use crate::auth::AppState;
use crate::points::{POINTS_POST_GROUP, award_points};

pub async fn create_group_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGroupPostRequest>,
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
    let creator = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_group_post(
            &id,
            &creator,
            title,
            req.description.as_deref(),
            &tags,
            req.meetup_info.as_deref(),
            &created_at,
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // reward for creating a group post
    award_points(&state, Some(&creator), POINTS_POST_GROUP).await;

    Ok((
        StatusCode::CREATED,
        Json(GroupPostResponse {
            id,
            creator_id: creator,
            title: title.to_string(),
            description: req.description,
            tags,
            meetup_info: req.meetup_info,
            rsvp_count: 0,
            created_at,
        }),
    ))
}

pub async fn list_group_posts(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_group_posts()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

pub async fn rsvp(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let count = state
        .db
        .rsvp_group_post(&post_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({ "rsvp_count": count })))
}

fn to_response(row: GroupPostRow) -> GroupPostResponse {
    GroupPostResponse {
        id: row.id,
        creator_id: row.creator_id,
        title: row.title,
        description: row.description,
        tags: row.tags,
        meetup_info: row.meetup_info,
        rsvp_count: row.rsvp_count,
        created_at: row.created_at,
    }
}
