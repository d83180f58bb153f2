use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use campus_db::models::IssueRow;
use campus_types::api::{Claims, IssueResponse, ReportIssueRequest, UpdateIssueStatusRequest};

use crate::auth::AppState;
use crate::points::{POINTS_REPORT_ISSUE, award_points};

const STATUSES: [&str; 3] = ["Submitted", "In Progress", "Resolved"];

pub async fn report_issue(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReportIssueRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let title = req.title.trim();
    let description = req.description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let id = Uuid::new_v4().to_string();
    let reporter = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_issue(
            &id,
            &reporter,
            title,
            description,
            req.location.as_deref(),
            req.image_url.as_deref(),
            &created_at,
        )
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // small reward for reporting a problem
    award_points(&state, Some(&reporter), POINTS_REPORT_ISSUE).await;

    Ok((
        StatusCode::CREATED,
        Json(IssueResponse {
            id,
            reporter_id: reporter,
            title: title.to_string(),
            description: description.to_string(),
            location: req.location,
            image_url: req.image_url,
            status: "Submitted".to_string(),
            me_too_count: 0,
            created_at,
        }),
    ))
}

pub async fn list_issues(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_issues()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(to_response).collect::<Vec<_>>()))
}

/// Only the reporter may move their issue through the status states.
pub async fn update_status(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateIssueStatusRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if !STATUSES.contains(&req.status.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let issue = state
        .db
        .get_issue(&issue_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    if issue.reporter_id != claims.sub.to_string() {
        return Err(StatusCode::FORBIDDEN);
    }

    state
        .db
        .update_issue_status(&issue_id, &req.status)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_too(
    State(state): State<AppState>,
    Path(issue_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let count = state
        .db
        .bump_me_too(&issue_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({ "me_too_count": count })))
}

fn to_response(row: IssueRow) -> IssueResponse {
    IssueResponse {
        id: row.id,
        reporter_id: row.reporter_id,
        title: row.title,
        description: row.description,
        location: row.location,
        image_url: row.image_url,
        status: row.status,
        me_too_count: row.me_too_count,
        created_at: row.created_at,
    }
}
