use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::ContextType;

// -- JWT Claims --

/// JWT claims shared between campus-api's REST middleware and the auth
/// handlers. Canonical definition lives here in campus-types to eliminate
/// duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Chat --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveConversationRequest {
    pub target_user_id: String,
    pub context_type: ContextType,
    pub context_id: String,
    pub context_title: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation_id: String,
    pub context_type: ContextType,
    pub context_label: &'static str,
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: String,
}

// -- Issues --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportIssueRequest {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateIssueStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub id: String,
    pub reporter_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub me_too_count: i64,
    pub created_at: String,
}

// -- Marketplace --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
}

// -- Lost & Found --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostFoundItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FoundItemResponse {
    pub id: String,
    pub finder_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<String>,
    pub photo_url: Option<String>,
    pub is_returned: bool,
    pub returned_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchLostItemRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResult {
    pub item: FoundItemResponse,
    pub score: usize,
}

// -- Q&A --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AskQuestionRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub best_answer_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostAnswerRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub id: String,
    pub question_id: String,
    pub author_id: String,
    pub body: String,
    pub upvotes: i64,
    pub created_at: String,
}

// -- GroupUp --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGroupPostRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub meetup_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupPostResponse {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub meetup_info: Option<String>,
    pub rsvp_count: i64,
    pub created_at: String,
}

// -- Leaderboard / stats --

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub user_id: String,
    pub points: i64,
}

// -- Home feed --

#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub kind: String,
    pub ref_id: String,
    pub title: String,
    pub description: String,
    pub meta: Option<String>,
    pub created_at: String,
}
