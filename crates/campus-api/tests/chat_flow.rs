//! End-to-end chat flow over the full router: register users, post a found
//! item, open a conversation on it, exchange a message, and check the access
//! policy edges.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use campus_api::auth::{AppState, AppStateInner};
use campus_db::Database;

fn test_app() -> Router {
    let state: AppState = Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        // matches the middleware's dev default so no env var is needed
        jwt_secret: "dev-secret-change-me".to_string(),
        email_domain: "sit.ac.in".to_string(),
    });
    campus_api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a user, returning (user_id, token).
async fn register(app: &Router, name: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": format!("{name}@sit.ac.in"),
            "username": name,
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["user_id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn found_item_conversation_round_trip() {
    let app = test_app();
    let (x_id, x_token) = register(&app, "finder").await;
    let (y_id, y_token) = register(&app, "owner").await;

    // X posts a found item
    let (status, item) = send(
        &app,
        "POST",
        "/lostfound/items",
        Some(&x_token),
        Some(json!({
            "title": "Brown leather wallet",
            "description": "Found near C-Block stairway.",
            "location": "C-Block",
            "tags": ["wallet", "brown", "leather"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = item["id"].as_str().unwrap().to_string();

    // Y opens chat on the item
    let (status, convo) = send(
        &app,
        "POST",
        "/chat/resolve",
        Some(&y_token),
        Some(json!({
            "target_user_id": x_id,
            "context_type": "found",
            "context_id": item_id,
            "context_title": "Brown leather wallet",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(convo["context_label"], "Lost & Found");
    let conversation_id = convo["conversation_id"].as_str().unwrap().to_string();

    // Resolving from the other side lands on the same conversation
    let (status, convo_again) = send(
        &app,
        "POST",
        "/chat/resolve",
        Some(&x_token),
        Some(json!({
            "target_user_id": y_id,
            "context_type": "found",
            "context_id": item_id,
            "context_title": "Brown leather wallet",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(convo_again["conversation_id"].as_str().unwrap(), conversation_id);

    // Y asks
    let messages_uri = format!("/chat/conversations/{conversation_id}/messages");
    let (status, _) = send(
        &app,
        "POST",
        &messages_uri,
        Some(&y_token),
        Some(json!({ "body": "is this yours?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // X reads exactly that one message back
    let (status, messages) = send(&app, "GET", &messages_uri, Some(&x_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["body"], "is this yours?");
    assert_eq!(messages[0]["sender_id"].as_str().unwrap(), y_id);
}

#[tokio::test]
async fn whitespace_message_is_rejected() {
    let app = test_app();
    let (x_id, _) = register(&app, "seller").await;
    let (_, y_token) = register(&app, "buyer").await;

    let (_, convo) = send(
        &app,
        "POST",
        "/chat/resolve",
        Some(&y_token),
        Some(json!({
            "target_user_id": x_id,
            "context_type": "market",
            "context_id": "listing-42",
            "context_title": "Calc textbook",
        })),
    )
    .await;
    let conversation_id = convo["conversation_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/chat/conversations/{conversation_id}/messages"),
        Some(&y_token),
        Some(json!({ "body": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn outsiders_cannot_read_or_post() {
    let app = test_app();
    let (x_id, _) = register(&app, "alpha").await;
    let (_, y_token) = register(&app, "beta").await;
    let (_, z_token) = register(&app, "gamma").await;

    let (_, convo) = send(
        &app,
        "POST",
        "/chat/resolve",
        Some(&y_token),
        Some(json!({
            "target_user_id": x_id,
            "context_type": "groupup",
            "context_id": "g-1",
            "context_title": "Badminton 6pm",
        })),
    )
    .await;
    let uri = format!(
        "/chat/conversations/{}/messages",
        convo["conversation_id"].as_str().unwrap()
    );

    let (status, _) = send(&app, "GET", &uri, Some(&z_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", &uri, Some(&z_token), Some(json!({ "body": "hi" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // and no token at all means 401 before any lookup
    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chatting_with_yourself_is_rejected() {
    let app = test_app();
    let (x_id, x_token) = register(&app, "solo").await;

    let (status, _) = send(
        &app,
        "POST",
        "/chat/resolve",
        Some(&x_token),
        Some(json!({
            "target_user_id": x_id,
            "context_type": "market",
            "context_id": "listing-1",
            "context_title": "Lamp",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn actions_accumulate_points() {
    let app = test_app();
    let (_, token) = register(&app, "contributor").await;

    // question (+1), answer on it (+2), group post (+1)
    let (status, question) = send(
        &app,
        "POST",
        "/questions",
        Some(&token),
        Some(json!({ "title": "Best DS notes?", "body": "Any pointers?", "tags": ["dsa"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let question_id = question["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/questions/{question_id}/answers"),
        Some(&token),
        Some(json!({ "body": "Library shelf 3." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/groups",
        Some(&token),
        Some(json!({ "title": "Badminton 6pm", "tags": ["sports"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, stats) = send(&app, "GET", "/me/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["points"], 4);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = test_app();
    register(&app, "taken").await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": "taken@sit.ac.in",
            "username": "taken-again",
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn best_answer_is_author_only_and_awards_the_answerer() {
    let app = test_app();
    let (_, asker_token) = register(&app, "asker").await;
    let (_, answerer_token) = register(&app, "answerer").await;

    let ask = |title: &str| {
        json!({ "title": title, "body": "details inside", "tags": [] })
    };
    let (_, q1) = send(&app, "POST", "/questions", Some(&asker_token), Some(ask("Q one"))).await;
    let (_, q2) = send(&app, "POST", "/questions", Some(&asker_token), Some(ask("Q two"))).await;
    let q1_id = q1["id"].as_str().unwrap();
    let q2_id = q2["id"].as_str().unwrap();

    let (_, a1) = send(
        &app,
        "POST",
        &format!("/questions/{q1_id}/answers"),
        Some(&answerer_token),
        Some(json!({ "body": "try the notice board" })),
    )
    .await;
    let (_, a2) = send(
        &app,
        "POST",
        &format!("/questions/{q2_id}/answers"),
        Some(&answerer_token),
        Some(json!({ "body": "ask the office" })),
    )
    .await;
    let a1_id = a1["id"].as_str().unwrap();
    let a2_id = a2["id"].as_str().unwrap();

    // only the asker may pick the best answer
    let (status, _) = send(
        &app,
        "POST",
        &format!("/questions/{q1_id}/best/{a1_id}"),
        Some(&answerer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // an answer belonging to a different question is rejected
    let (status, _) = send(
        &app,
        "POST",
        &format!("/questions/{q1_id}/best/{a2_id}"),
        Some(&asker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // and an unknown answer id is 404
    let (status, _) = send(
        &app,
        "POST",
        &format!("/questions/{q1_id}/best/nope"),
        Some(&asker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/questions/{q1_id}/best/{a1_id}"),
        Some(&asker_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, questions) = send(&app, "GET", "/questions", Some(&asker_token), None).await;
    let marked = questions
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["id"] == *q1_id)
        .unwrap();
    assert_eq!(marked["best_answer_id"].as_str().unwrap(), a1_id);

    // two answers (+2 each) plus the best-answer award (+10)
    let (_, stats) = send(&app, "GET", "/me/stats", Some(&answerer_token), None).await;
    assert_eq!(stats["points"], 14);
}

#[tokio::test]
async fn issue_status_is_reporter_only_and_me_too_counts_up() {
    let app = test_app();
    let (_, reporter_token) = register(&app, "reporter").await;
    let (_, other_token) = register(&app, "bystander").await;

    let (status, issue) = send(
        &app,
        "POST",
        "/issues",
        Some(&reporter_token),
        Some(json!({
            "title": "Broken bench",
            "description": "Bench near the canteen lost a leg.",
            "location": "Canteen",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let issue_id = issue["id"].as_str().unwrap();
    let status_uri = format!("/issues/{issue_id}/status");

    // someone else cannot move the issue along
    let (status, _) = send(
        &app,
        "POST",
        &status_uri,
        Some(&other_token),
        Some(json!({ "status": "Resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the reporter can, but only to a known state
    let (status, _) = send(
        &app,
        "POST",
        &status_uri,
        Some(&reporter_token),
        Some(json!({ "status": "Fixed-ish" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &status_uri,
        Some(&reporter_token),
        Some(json!({ "status": "In Progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "POST",
        "/issues/missing/status",
        Some(&reporter_token),
        Some(json!({ "status": "Resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, issues) = send(&app, "GET", "/issues", Some(&other_token), None).await;
    assert_eq!(issues.as_array().unwrap()[0]["status"], "In Progress");

    // me-too is open to everyone and increments in place
    let me_too_uri = format!("/issues/{issue_id}/me-too");
    let (_, first) = send(&app, "POST", &me_too_uri, Some(&other_token), None).await;
    assert_eq!(first["me_too_count"], 1);
    let (_, second) = send(&app, "POST", &me_too_uri, Some(&reporter_token), None).await;
    assert_eq!(second["me_too_count"], 2);

    let (status, _) = send(&app, "POST", "/issues/missing/me-too", Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_campus_email_cannot_register() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "email": "someone@gmail.com",
            "username": "someone",
            "password": "hunter2hunter2",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
