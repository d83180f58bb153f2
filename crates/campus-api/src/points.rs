use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::warn;

use campus_types::api::{Claims, LeaderboardEntry, UserStatsResponse};

use crate::auth::AppState;

// Award values for contribution actions. One table, one helper — every
// feature credits points through the same call.
pub const POINTS_REPORT_ISSUE: i64 = 1;
pub const POINTS_POST_LISTING: i64 = 1;
pub const POINTS_POST_GROUP: i64 = 1;
pub const POINTS_ASK_QUESTION: i64 = 1;
pub const POINTS_POST_ANSWER: i64 = 2;
pub const POINTS_BEST_ANSWER: i64 = 10;
pub const POINTS_ITEM_RETURNED: i64 = 5;

/// Credit `delta` points to a user as a side effect of a feature action.
/// No-op when the user id is absent. Points are a soft incentive, not a
/// ledger of record: storage failures are logged and swallowed so the
/// triggering action still succeeds.
pub async fn award_points(state: &AppState, user_id: Option<&str>, delta: i64) {
    let Some(user_id) = user_id else { return };

    let db = state.clone();
    let uid = user_id.to_string();
    match tokio::task::spawn_blocking(move || db.db.add_points(&uid, delta)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("points award for {} failed (ignored): {}", user_id, e),
        Err(e) => warn!("points award join error (ignored): {}", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .leaderboard(query.limit.min(100))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let entries: Vec<LeaderboardEntry> = rows
        .into_iter()
        .map(|u| LeaderboardEntry {
            user_id: u.id,
            username: u.username,
            points: u.points,
        })
        .collect();

    Ok(Json(entries))
}

pub async fn my_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();
    let points = state
        .db
        .get_points(&me)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .unwrap_or(0);

    Ok(Json(UserStatsResponse { user_id: me, points }))
}
