/// Database row types — these map directly to SQLite rows.
/// Distinct from campus-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub points: i64,
    pub show_profile: bool,
    pub created_at: String,
}

pub struct ConversationRow {
    pub id: String,
    pub user_a: String,
    pub user_b: String,
    pub context_type: String,
    pub context_id: String,
    pub title: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: String,
}

pub struct IssueRow {
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

pub struct ListingRow {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
}

pub struct FoundItemRow {
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

pub struct QuestionRow {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub best_answer_id: Option<String>,
    pub created_at: String,
}

pub struct AnswerRow {
    pub id: String,
    pub question_id: String,
    pub author_id: String,
    pub body: String,
    pub upvotes: i64,
    pub created_at: String,
}

pub struct GroupPostRow {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub meetup_info: Option<String>,
    pub rsvp_count: i64,
    pub created_at: String,
}

pub struct FeedRow {
    pub kind: String,
    pub ref_id: String,
    pub title: String,
    pub description: String,
    pub meta: Option<String>,
    pub created_at: String,
}

/// Tags are stored as a single comma-joined TEXT column.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

pub fn split_tags(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
