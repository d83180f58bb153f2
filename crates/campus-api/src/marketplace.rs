use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use campus_db::models::ListingRow;
use campus_types::api::{Claims, CreateListingRequest, ListingResponse};

use crate::auth::AppState;
use crate::points::{POINTS_POST_LISTING, award_points};

pub async fn create_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateListingRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if req.price.is_some_and(|p| p < 0) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    let seller = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_listing(
            &id,
            &seller,
            title,
            req.description.as_deref(),
            req.price,
            req.category.as_deref(),
            req.photo_url.as_deref(),
            &created_at,
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    award_points(&state, Some(&seller), POINTS_POST_LISTING).await;

    Ok((
        StatusCode::CREATED,
        Json(ListingResponse {
            id,
            seller_id: seller,
            title: title.to_string(),
            description: req.description,
            price: req.price,
            category: req.category,
            photo_url: req.photo_url,
            created_at,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    pub category: Option<String>,
}

pub async fn list_listings(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_listings(filter.category.as_deref())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

fn to_response(row: ListingRow) -> ListingResponse {
    ListingResponse {
        id: row.id,
        seller_id: row.seller_id,
        title: row.title,
        description: row.description,
        price: row.price,
        category: row.category,
        photo_url: row.photo_url,
        created_at: row.created_at,
    }
}
