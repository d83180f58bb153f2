use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use campus_db::models::{AnswerRow, QuestionRow};
use campus_types::api::{
    AnswerResponse, AskQuestionRequest, Claims, PostAnswerRequest, QuestionResponse,
};

use crate::auth::AppState;
use crate::points::{POINTS_ASK_QUESTION, POINTS_BEST_ANSWER, POINTS_POST_ANSWER, award_points};

pub async fn ask_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AskQuestionRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let title = req.title.trim();
    let body = req.body.trim();
    if title.is_empty() || body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let tags: Vec<String> = req
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let id = Uuid::new_v4().to_string();
    let author = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_question(&id, &author, title, body, &tags, &created_at)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    award_points(&state, Some(&author), POINTS_ASK_QUESTION).await;

    Ok((
        StatusCode::CREATED,
        Json(QuestionResponse {
            id,
            author_id: author,
            title: title.to_string(),
            body: body.to_string(),
            tags,
            best_answer_id: None,
            created_at,
        }),
    ))
}

pub async fn list_questions(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let rows = state
        .db
        .list_questions()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(question_response).collect::<Vec<_>>()))
}

pub async fn list_answers(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    // 404 for a missing question rather than an empty list
    state
        .db
        .get_question(&question_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let rows = state
        .db
        .list_answers(&question_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(rows.into_iter().map(answer_response).collect::<Vec<_>>()))
}

pub async fn post_answer(
    State(state): State<AppState>,
    Path(question_id): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<PostAnswerRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    state
        .db
        .get_question(&question_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let id = Uuid::new_v4().to_string();
    let author = claims.sub.to_string();
    let created_at = campus_db::now_ts();

    state
        .db
        .insert_answer(&id, &question_id, &author, body, &created_at)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    award_points(&state, Some(&author), POINTS_POST_ANSWER).await;

    Ok((
        StatusCode::CREATED,
        Json(AnswerResponse {
            id,
            question_id,
            author_id: author,
            body: body.to_string(),
            upvotes: 0,
            created_at,
        }),
    ))
}

pub async fn upvote_answer(
    State(state): State<AppState>,
    Path(answer_id): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let upvotes = state
        .db
        .upvote_answer(&answer_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({ "upvotes": upvotes })))
}

/// Only the person who asked the question can mark the best answer; the
/// answer's author gets the big award.
pub async fn mark_best_answer(
    State(state): State<AppState>,
    Path((question_id, answer_id)): Path<(String, String)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let me = claims.sub.to_string();

    let question = state
        .db
        .get_question(&question_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if question.author_id != me {
        return Err(StatusCode::FORBIDDEN);
    }

    let answer = state
        .db
        .get_answer(&answer_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    if answer.question_id != question_id {
        return Err(StatusCode::BAD_REQUEST);
    }

    state
        .db
        .set_best_answer(&question_id, &answer_id)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    award_points(&state, Some(&answer.author_id), POINTS_BEST_ANSWER).await;

    Ok(StatusCode::NO_CONTENT)
}

fn question_response(row: QuestionRow) -> QuestionResponse {
    QuestionResponse {
        id: row.id,
        author_id: row.author_id,
        title: row.title,
        body: row.body,
        tags: row.tags,
        best_answer_id: row.best_answer_id,
        created_at: row.created_at,
    }
}

fn answer_response(row: AnswerRow) -> AnswerResponse {
    AnswerResponse {
        id: row.id,
        question_id: row.question_id,
        author_id: row.author_id,
        body: row.body,
        upvotes: row.upvotes,
        created_at: row.created_at,
    }
}
