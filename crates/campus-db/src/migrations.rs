use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            username      TEXT NOT NULL,
            password      TEXT NOT NULL,
            points        INTEGER NOT NULL DEFAULT 0,
            show_profile  INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- (user_a, user_b) is the normalized participant pair, user_a <= user_b.
        -- The UNIQUE constraint is what makes concurrent first contact converge
        -- on a single conversation per (pair, context) instead of duplicating.
        CREATE TABLE IF NOT EXISTS conversations (
            id            TEXT PRIMARY KEY,
            user_a        TEXT NOT NULL,
            user_b        TEXT NOT NULL,
            context_type  TEXT NOT NULL,
            context_id    TEXT NOT NULL,
            title         TEXT NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_a, user_b, context_type, context_id)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id               TEXT PRIMARY KEY,
            conversation_id  TEXT NOT NULL REFERENCES conversations(id),
            sender_id        TEXT NOT NULL REFERENCES users(id),
            body             TEXT NOT NULL,
            created_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_conversation
            ON messages(conversation_id, created_at);

        CREATE TABLE IF NOT EXISTS issues (
            id            TEXT PRIMARY KEY,
            reporter_id   TEXT NOT NULL REFERENCES users(id),
            title         TEXT NOT NULL,
            description   TEXT NOT NULL,
            location      TEXT,
            image_url     TEXT,
            status        TEXT NOT NULL DEFAULT 'Submitted',
            me_too_count  INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS market_listings (
            id           TEXT PRIMARY KEY,
            seller_id    TEXT NOT NULL REFERENCES users(id),
            title        TEXT NOT NULL,
            description  TEXT,
            price        INTEGER,
            category     TEXT,
            photo_url    TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS found_items (
            id           TEXT PRIMARY KEY,
            finder_id    TEXT NOT NULL REFERENCES users(id),
            title        TEXT NOT NULL,
            description  TEXT,
            location     TEXT,
            tags         TEXT NOT NULL DEFAULT '',
            photo_url    TEXT,
            is_returned  INTEGER NOT NULL DEFAULT 0,
            returned_at  TEXT,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS peer_questions (
            id              TEXT PRIMARY KEY,
            author_id       TEXT NOT NULL REFERENCES users(id),
            title           TEXT NOT NULL,
            body            TEXT NOT NULL,
            tags            TEXT NOT NULL DEFAULT '',
            best_answer_id  TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS peer_answers (
            id           TEXT PRIMARY KEY,
            question_id  TEXT NOT NULL REFERENCES peer_questions(id),
            author_id    TEXT NOT NULL REFERENCES users(id),
            body         TEXT NOT NULL,
            upvotes      INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_answers_question
            ON peer_answers(question_id, created_at);

        CREATE TABLE IF NOT EXISTS groupup_posts (
            id           TEXT PRIMARY KEY,
            creator_id   TEXT NOT NULL REFERENCES users(id),
            title        TEXT NOT NULL,
            description  TEXT,
            tags         TEXT NOT NULL DEFAULT '',
            meetup_info  TEXT,
            rsvp_count   INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
