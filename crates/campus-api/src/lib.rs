pub mod auth;
pub mod chat;
pub mod feed;
pub mod groups;
pub mod issues;
pub mod lostfound;
pub mod marketplace;
pub mod middleware;
pub mod points;
pub mod qa;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

/// Full API surface. Auth endpoints are public; everything else requires a
/// valid bearer token.
pub fn router(state: auth::AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/feed", get(feed::home_feed))
        .route("/leaderboard", get(points::leaderboard))
        .route("/me/stats", get(points::my_stats))
        .route("/chat/contexts", get(chat::list_contexts))
        .route("/chat/resolve", post(chat::resolve_conversation))
        .route(
            "/chat/conversations/{conversation_id}/messages",
            get(chat::get_messages).post(chat::send_message),
        )
        .route("/issues", get(issues::list_issues).post(issues::report_issue))
        .route("/issues/{issue_id}/status", post(issues::update_status))
        .route("/issues/{issue_id}/me-too", post(issues::me_too))
        .route(
            "/marketplace/listings",
            get(marketplace::list_listings).post(marketplace::create_listing),
        )
        .route(
            "/lostfound/items",
            get(lostfound::list_found_items).post(lostfound::post_found_item),
        )
        .route("/lostfound/items/{item_id}/returned", post(lostfound::mark_returned))
        .route("/lostfound/match", post(lostfound::match_lost_item))
        .route("/questions", get(qa::list_questions).post(qa::ask_question))
        .route(
            "/questions/{question_id}/answers",
            get(qa::list_answers).post(qa::post_answer),
        )
        .route("/questions/{question_id}/best/{answer_id}", post(qa::mark_best_answer))
        .route("/answers/{answer_id}/upvote", post(qa::upvote_answer))
        .route("/groups", get(groups::list_group_posts).post(groups::create_group_post))
        .route("/groups/{post_id}/rsvp", post(groups::rsvp))
        .layer(axum_middleware::from_fn(middleware::require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
