use rusqlite::Connection;
use uuid::Uuid;

use crate::models::{
    AnswerRow, ConversationRow, FeedRow, FoundItemRow, GroupPostRow, IssueRow, ListingRow,
    MessageRow, QuestionRow, UserRow, join_tags, split_tags,
};
use crate::pair::normalize_pair;
use crate::{Database, Result};

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, username: &str, password_hash: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, username, password) VALUES (?1, ?2, ?3, ?4)",
                (id, email, username, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Points ledger --

    /// Atomic in-place increment. The old read-then-write pattern could lose
    /// awards when two features credited the same user at once; pushing the
    /// addition into the UPDATE closes that race.
    pub fn add_points(&self, user_id: &str, delta: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET points = points + ?1 WHERE id = ?2",
                rusqlite::params![delta, user_id],
            )?;
            Ok(())
        })
    }

    pub fn get_points(&self, user_id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT points FROM users WHERE id = ?1", [user_id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    /// Top users by points, hidden profiles excluded.
    pub fn leaderboard(&self, limit: u32) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, username, password, points, show_profile, created_at
                 FROM users
                 WHERE show_profile = 1
                 ORDER BY points DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Conversations --

    /// Find or lazily create the single conversation for a participant pair
    /// within a context. The pair is normalized first, so either participant
    /// may initiate; the UNIQUE constraint plus INSERT OR IGNORE means a
    /// concurrent first contact still converges on one row. The title is
    /// fixed at creation and never updated.
    pub fn resolve_conversation(
        &self,
        participant_a: &str,
        participant_b: &str,
        context_type: &str,
        context_id: &str,
        title: &str,
    ) -> Result<String> {
        let (user_a, user_b) = normalize_pair(participant_a, participant_b);

        self.with_conn(|conn| {
            if let Some(id) = query_conversation_id(conn, user_a, user_b, context_type, context_id)? {
                return Ok(id);
            }

            conn.execute(
                "INSERT OR IGNORE INTO conversations
                     (id, user_a, user_b, context_type, context_id, title, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    Uuid::new_v4().to_string(),
                    user_a,
                    user_b,
                    context_type,
                    context_id,
                    title,
                    crate::now_ts(),
                ],
            )?;

            // Re-select rather than trusting our insert: if the IGNORE fired,
            // someone else's row won and that id is the conversation.
            let id = conn.query_row(
                "SELECT id FROM conversations
                 WHERE user_a = ?1 AND user_b = ?2 AND context_type = ?3 AND context_id = ?4",
                rusqlite::params![user_a, user_b, context_type, context_id],
                |row| row.get(0),
            )?;
            Ok(id)
        })
    }

    pub fn get_conversation(&self, id: &str) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_a, user_b, context_type, context_id, title, created_at
                 FROM conversations WHERE id = ?1",
            )?;
            stmt.query_row([id], |row| {
                Ok(ConversationRow {
                    id: row.get(0)?,
                    user_a: row.get(1)?,
                    user_b: row.get(2)?,
                    context_type: row.get(3)?,
                    context_id: row.get(4)?,
                    title: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })
            .optional()
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        conversation_id: &str,
        sender_id: &str,
        body: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, conversation_id, sender_id, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, conversation_id, sender_id, body, created_at],
            )?;
            Ok(())
        })
    }

    /// All messages of a conversation, oldest first.
    pub fn get_messages(&self, conversation_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, sender_id, body, created_at
                 FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt
                .query_map([conversation_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        conversation_id: row.get(1)?,
                        sender_id: row.get(2)?,
                        body: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Issues --

    pub fn insert_issue(
        &self,
        id: &str,
        reporter_id: &str,
        title: &str,
        description: &str,
        location: Option<&str>,
        image_url: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO issues (id, reporter_id, title, description, location, image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![id, reporter_id, title, description, location, image_url, created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_issues(&self) -> Result<Vec<IssueRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, reporter_id, title, description, location, image_url, status, me_too_count, created_at
                 FROM issues ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_issue)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_issue(&self, id: &str) -> Result<Option<IssueRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, reporter_id, title, description, location, image_url, status, me_too_count, created_at
                 FROM issues WHERE id = ?1",
            )?;
            stmt.query_row([id], map_issue).optional()
        })
    }

    /// Returns false if no such issue.
    pub fn update_issue_status(&self, id: &str, status: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE issues SET status = ?1 WHERE id = ?2",
                rusqlite::params![status, id],
            )?;
            Ok(n > 0)
        })
    }

    /// Atomic counter bump; returns the new count, or None if no such issue.
    pub fn bump_me_too(&self, id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE issues SET me_too_count = me_too_count + 1 WHERE id = ?1",
                [id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            conn.query_row("SELECT me_too_count FROM issues WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    // -- Marketplace --

    pub fn insert_listing(
        &self,
        id: &str,
        seller_id: &str,
        title: &str,
        description: Option<&str>,
        price: Option<i64>,
        category: Option<&str>,
        photo_url: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO market_listings
                     (id, seller_id, title, description, price, category, photo_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![id, seller_id, title, description, price, category, photo_url, created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_listings(&self, category: Option<&str>) -> Result<Vec<ListingRow>> {
        self.with_conn(|conn| {
            let sql = "SELECT id, seller_id, title, description, price, category, photo_url, created_at
                       FROM market_listings";
            let rows = match category {
                Some(cat) => {
                    let mut stmt = conn.prepare(&format!(
                        "{sql} WHERE category = ?1 ORDER BY created_at DESC"
                    ))?;
                    stmt.query_map([cat], map_listing)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!("{sql} ORDER BY created_at DESC"))?;
                    stmt.query_map([], map_listing)?
                        .collect::<std::result::Result<Vec<_>, _>>()?
                }
            };
            Ok(rows)
        })
    }

    // -- Lost & Found --

    pub fn insert_found_item(
        &self,
        id: &str,
        finder_id: &str,
        title: &str,
        description: Option<&str>,
        location: Option<&str>,
        tags: &[String],
        photo_url: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO found_items
                     (id, finder_id, title, description, location, tags, photo_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    finder_id,
                    title,
                    description,
                    location,
                    join_tags(tags),
                    photo_url,
                    created_at
                ],
            )?;
            Ok(())
        })
    }

    /// Unreturned items only, newest first.
    pub fn list_found_items(&self) -> Result<Vec<FoundItemRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, finder_id, title, description, location, tags, photo_url, is_returned, returned_at, created_at
                 FROM found_items
                 WHERE is_returned = 0
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_found_item)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_found_item(&self, id: &str) -> Result<Option<FoundItemRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, finder_id, title, description, location, tags, photo_url, is_returned, returned_at, created_at
                 FROM found_items WHERE id = ?1",
            )?;
            stmt.query_row([id], map_found_item).optional()
        })
    }

    pub fn mark_item_returned(&self, id: &str, returned_at: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE found_items SET is_returned = 1, returned_at = ?1 WHERE id = ?2",
                rusqlite::params![returned_at, id],
            )?;
            Ok(n > 0)
        })
    }

    // -- Q&A --

    pub fn insert_question(
        &self,
        id: &str,
        author_id: &str,
        title: &str,
        body: &str,
        tags: &[String],
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO peer_questions (id, author_id, title, body, tags, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![id, author_id, title, body, join_tags(tags), created_at],
            )?;
            Ok(())
        })
    }

    pub fn list_questions(&self) -> Result<Vec<QuestionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, title, body, tags, best_answer_id, created_at
                 FROM peer_questions ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_question)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_question(&self, id: &str) -> Result<Option<QuestionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, author_id, title, body, tags, best_answer_id, created_at
                 FROM peer_questions WHERE id = ?1",
            )?;
            stmt.query_row([id], map_question).optional()
        })
    }

    pub fn insert_answer(
        &self,
        id: &str,
        question_id: &str,
        author_id: &str,
        body: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO peer_answers (id, question_id, author_id, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, question_id, author_id, body, created_at],
            )?;
            Ok(())
        })
    }

    /// Answers of a question, oldest first.
    pub fn list_answers(&self, question_id: &str) -> Result<Vec<AnswerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question_id, author_id, body, upvotes, created_at
                 FROM peer_answers
                 WHERE question_id = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt
                .query_map([question_id], map_answer)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_answer(&self, id: &str) -> Result<Option<AnswerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question_id, author_id, body, upvotes, created_at
                 FROM peer_answers WHERE id = ?1",
            )?;
            stmt.query_row([id], map_answer).optional()
        })
    }

    pub fn upvote_answer(&self, id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE peer_answers SET upvotes = upvotes + 1 WHERE id = ?1",
                [id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            conn.query_row("SELECT upvotes FROM peer_answers WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    pub fn set_best_answer(&self, question_id: &str, answer_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE peer_questions SET best_answer_id = ?1 WHERE id = ?2",
                rusqlite::params![answer_id, question_id],
            )?;
            Ok(n > 0)
        })
    }

    // -- GroupUp --

    pub fn insert_group_post(
        &self,
        id: &str,
        creator_id: &str,
        title: &str,
        description: Option<&str>,
        tags: &[String],
        meetup_info: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO groupup_posts
                     (id, creator_id, title, description, tags, meetup_info, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id,
                    creator_id,
                    title,
                    description,
                    join_tags(tags),
                    meetup_info,
                    created_at
                ],
            )?;
            Ok(())
        })
    }

    pub fn list_group_posts(&self) -> Result<Vec<GroupPostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, creator_id, title, description, tags, meetup_info, rsvp_count, created_at
                 FROM groupup_posts ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], map_group_post)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn rsvp_group_post(&self, id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE groupup_posts SET rsvp_count = rsvp_count + 1 WHERE id = ?1",
                [id],
            )?;
            if n == 0 {
                return Ok(None);
            }
            conn.query_row("SELECT rsvp_count FROM groupup_posts WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    // -- Home feed --

    /// Most recent rows from each feature table, normalized into one list
    /// sorted newest first.
    pub fn recent_feed(&self, per_table: u32) -> Result<Vec<FeedRow>> {
        self.with_conn(|conn| {
            let mut feed = Vec::new();

            collect_feed(
                conn,
                &mut feed,
                "issue",
                "SELECT id, title, description, 'Status: ' || status, created_at
                 FROM issues ORDER BY created_at DESC LIMIT ?1",
                per_table,
            )?;
            collect_feed(
                conn,
                &mut feed,
                "found",
                "SELECT id, title, COALESCE(description, ''), location, created_at
                 FROM found_items ORDER BY created_at DESC LIMIT ?1",
                per_table,
            )?;
            collect_feed(
                conn,
                &mut feed,
                "question",
                "SELECT id, title, body, NULL, created_at
                 FROM peer_questions ORDER BY created_at DESC LIMIT ?1",
                per_table,
            )?;
            collect_feed(
                conn,
                &mut feed,
                "market",
                "SELECT id, title, COALESCE(description, ''), category, created_at
                 FROM market_listings ORDER BY created_at DESC LIMIT ?1",
                per_table,
            )?;
            collect_feed(
                conn,
                &mut feed,
                "groupup",
                "SELECT id, title, COALESCE(description, ''), meetup_info, created_at
                 FROM groupup_posts ORDER BY created_at DESC LIMIT ?1",
                per_table,
            )?;

            feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(feed)
        })
    }
}

fn collect_feed(
    conn: &Connection,
    feed: &mut Vec<FeedRow>,
    kind: &str,
    sql: &str,
    limit: u32,
) -> Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([limit], |row| {
        Ok(FeedRow {
            kind: kind.to_string(),
            ref_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            meta: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    for row in rows {
        feed.push(row?);
    }
    Ok(())
}

fn query_conversation_id(
    conn: &Connection,
    user_a: &str,
    user_b: &str,
    context_type: &str,
    context_id: &str,
) -> Result<Option<String>> {
    conn.query_row(
        "SELECT id FROM conversations
         WHERE user_a = ?1 AND user_b = ?2 AND context_type = ?3 AND context_id = ?4",
        rusqlite::params![user_a, user_b, context_type, context_id],
        |row| row.get(0),
    )
    .optional()
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, email, username, password, points, show_profile, created_at
         FROM users WHERE {column} = ?1"
    ))?;
    stmt.query_row([value], map_user).optional()
}

fn map_user(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password: row.get(3)?,
        points: row.get(4)?,
        show_profile: row.get::<_, i64>(5)? != 0,
        created_at: row.get(6)?,
    })
}

fn map_issue(row: &rusqlite::Row<'_>) -> std::result::Result<IssueRow, rusqlite::Error> {
    Ok(IssueRow {
        id: row.get(0)?,
        reporter_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        image_url: row.get(5)?,
        status: row.get(6)?,
        me_too_count: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn map_listing(row: &rusqlite::Row<'_>) -> std::result::Result<ListingRow, rusqlite::Error> {
    Ok(ListingRow {
        id: row.get(0)?,
        seller_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        category: row.get(5)?,
        photo_url: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_found_item(row: &rusqlite::Row<'_>) -> std::result::Result<FoundItemRow, rusqlite::Error> {
    Ok(FoundItemRow {
        id: row.get(0)?,
        finder_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        tags: split_tags(&row.get::<_, String>(5)?),
        photo_url: row.get(6)?,
        is_returned: row.get::<_, i64>(7)? != 0,
        returned_at: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_question(row: &rusqlite::Row<'_>) -> std::result::Result<QuestionRow, rusqlite::Error> {
    Ok(QuestionRow {
        id: row.get(0)?,
        author_id: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        tags: split_tags(&row.get::<_, String>(4)?),
        best_answer_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn map_answer(row: &rusqlite::Row<'_>) -> std::result::Result<AnswerRow, rusqlite::Error> {
    Ok(AnswerRow {
        id: row.get(0)?,
        question_id: row.get(1)?,
        author_id: row.get(2)?,
        body: row.get(3)?,
        upvotes: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_group_post(row: &rusqlite::Row<'_>) -> std::result::Result<GroupPostRow, rusqlite::Error> {
    Ok(GroupPostRow {
        id: row.get(0)?,
        creator_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        tags: split_tags(&row.get::<_, String>(4)?),
        meetup_info: row.get(5)?,
        rsvp_count: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed_user(db: &Database, id: &str) {
        db.create_user(id, &format!("{id}@sit.ac.in"), id, "hash")
            .unwrap();
    }

    #[test]
    fn resolve_is_idempotent_and_order_independent() {
        let db = test_db();
        seed_user(&db, "user-1");
        seed_user(&db, "user-2");

        let c1 = db
            .resolve_conversation("user-1", "user-2", "market", "listing-42", "Calc textbook")
            .unwrap();
        let c2 = db
            .resolve_conversation("user-2", "user-1", "market", "listing-42", "Calc textbook")
            .unwrap();
        assert_eq!(c1, c2);

        // a different context gets its own conversation
        let c3 = db
            .resolve_conversation("user-1", "user-2", "market", "listing-43", "Lamp")
            .unwrap();
        assert_ne!(c1, c3);
    }

    #[test]
    fn resolve_title_fixed_at_creation() {
        let db = test_db();
        seed_user(&db, "a");
        seed_user(&db, "b");

        let id = db
            .resolve_conversation("a", "b", "found", "item-1", "Brown wallet")
            .unwrap();
        let same = db
            .resolve_conversation("b", "a", "found", "item-1", "A different title")
            .unwrap();
        assert_eq!(id, same);

        let convo = db.get_conversation(&id).unwrap().unwrap();
        assert_eq!(convo.title, "Brown wallet");
        assert_eq!(convo.context_type, "found");
    }

    #[test]
    fn messages_come_back_oldest_first() {
        let db = test_db();
        seed_user(&db, "a");
        seed_user(&db, "b");
        let convo = db
            .resolve_conversation("a", "b", "groupup", "g-1", "Study group")
            .unwrap();

        // insert out of chronological order
        db.insert_message("m3", &convo, "a", "third", "2026-08-23T10:00:03.000000Z")
            .unwrap();
        db.insert_message("m1", &convo, "b", "first", "2026-08-23T10:00:01.000000Z")
            .unwrap();
        db.insert_message("m2", &convo, "a", "second", "2026-08-23T10:00:02.000000Z")
            .unwrap();

        let bodies: Vec<String> = db
            .get_messages(&convo)
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, ["first", "second", "third"]);
    }

    #[test]
    fn empty_conversation_lists_no_messages() {
        let db = test_db();
        seed_user(&db, "a");
        seed_user(&db, "b");
        let convo = db
            .resolve_conversation("a", "b", "market", "l-1", "Desk")
            .unwrap();
        assert!(db.get_messages(&convo).unwrap().is_empty());
    }

    #[test]
    fn points_increment_in_place() {
        let db = test_db();
        seed_user(&db, "u");

        db.add_points("u", 10).unwrap();
        db.add_points("u", 5).unwrap();
        assert_eq!(db.get_points("u").unwrap(), Some(15));

        // two back-to-back awards both land; the increment happens inside
        // the UPDATE, so there is no read-then-write window to lose one
        db.add_points("u", 1).unwrap();
        db.add_points("u", 1).unwrap();
        assert_eq!(db.get_points("u").unwrap(), Some(17));
    }

    #[test]
    fn points_for_unknown_user_do_not_error() {
        let db = test_db();
        db.add_points("nobody", 5).unwrap();
        assert_eq!(db.get_points("nobody").unwrap(), None);
    }

    #[test]
    fn leaderboard_orders_by_points_and_hides_profiles() {
        let db = test_db();
        seed_user(&db, "first");
        seed_user(&db, "second");
        seed_user(&db, "hidden");
        db.add_points("first", 20).unwrap();
        db.add_points("second", 10).unwrap();
        db.add_points("hidden", 99).unwrap();
        db.with_conn(|conn| {
            conn.execute("UPDATE users SET show_profile = 0 WHERE id = 'hidden'", [])?;
            Ok(())
        })
        .unwrap();

        let board = db.leaderboard(10).unwrap();
        let ids: Vec<&str> = board.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn found_item_chat_flow() {
        // X posts a found item; Y opens chat on it and asks; X reads it back.
        let db = test_db();
        seed_user(&db, "x");
        seed_user(&db, "y");

        db.insert_found_item(
            "item-7",
            "x",
            "Brown leather wallet",
            Some("Found near C-Block stairway."),
            Some("C-Block"),
            &["wallet".into(), "brown".into(), "leather".into()],
            None,
            "2026-08-23T09:00:00.000000Z",
        )
        .unwrap();

        let item = db.get_found_item("item-7").unwrap().unwrap();
        let convo = db
            .resolve_conversation("y", &item.finder_id, "found", &item.id, &item.title)
            .unwrap();

        db.insert_message("m1", &convo, "y", "is this yours?", &crate::now_ts())
            .unwrap();

        let msgs = db.get_messages(&convo).unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].body, "is this yours?");
        assert_eq!(msgs[0].sender_id, "y");

        let convo_row = db.get_conversation(&convo).unwrap().unwrap();
        assert_eq!(convo_row.title, "Brown leather wallet");
        assert_eq!(convo_row.context_id, "item-7");
    }

    #[test]
    fn counters_bump_atomically() {
        let db = test_db();
        seed_user(&db, "u");
        db.insert_group_post("g1", "u", "Badminton 6pm", None, &[], None, &crate::now_ts())
            .unwrap();

        assert_eq!(db.rsvp_group_post("g1").unwrap(), Some(1));
        assert_eq!(db.rsvp_group_post("g1").unwrap(), Some(2));
        assert_eq!(db.rsvp_group_post("missing").unwrap(), None);
    }
}
