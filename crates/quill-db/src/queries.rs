use crate::models::{MessageRow, UserRow, format_timestamp};
use crate::Database;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row};

use quill_types::ObjectId;
use quill_types::models::{Message, MessageChanges, User};

const MESSAGE_COLUMNS: &str = "id, title, body, author, created_at, updated_at";

impl Database {
    // -- Users --

    /// Returns `false` if a user with the same id already exists.
    pub fn insert_user(&self, user: &User) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password, created_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                (
                    user.id.to_hex(),
                    &user.username,
                    &user.password,
                    format_timestamp(&user.created_at),
                ),
            )?;
            Ok(inserted == 1)
        })
    }

    pub fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password, created_at FROM users WHERE id = ?1",
                [id.to_hex()],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(User::try_from)
            .transpose()
        })
    }

    /// Deletes every user whose username is in `usernames`. Returns the count.
    pub fn delete_users_by_username(&self, usernames: &[&str]) -> Result<usize> {
        self.with_conn(|conn| delete_where_in(conn, "users", "username", usernames))
    }

    // -- Messages --

    /// Returns `false` if a message with the same id already exists.
    pub fn insert_message(&self, message: &Message) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO messages (id, title, body, author, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO NOTHING",
                (
                    message.id.to_hex(),
                    &message.title,
                    &message.body,
                    message.author.to_hex(),
                    format_timestamp(&message.created_at),
                    format_timestamp(&message.updated_at),
                ),
            )?;
            Ok(inserted == 1)
        })
    }

    /// Whole collection in insertion order.
    pub fn find_all_messages(&self) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {MESSAGE_COLUMNS} FROM messages ORDER BY rowid"))?;

            let rows = stmt
                .query_map([], message_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(Message::try_from).collect()
        })
    }

    pub fn find_message_by_id(&self, id: &ObjectId) -> Result<Option<Message>> {
        self.with_conn(|conn| query_message_by_id(conn, id))
    }

    /// First message (in insertion order) with exactly this title.
    pub fn find_message_by_title(&self, title: &str) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages WHERE title = ?1 ORDER BY rowid LIMIT 1"
                ),
                [title],
                message_row,
            )
            .optional()?
            .map(Message::try_from)
            .transpose()
        })
    }

    /// Applies the set fields of `changes` and returns the stored result,
    /// or `None` if no message has this id.
    pub fn update_message(
        &self,
        id: &ObjectId,
        changes: &MessageChanges,
    ) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            if changes.is_empty() {
                return query_message_by_id(conn, id);
            }

            let updated = conn.execute(
                "UPDATE messages SET
                    title = COALESCE(?2, title),
                    body = COALESCE(?3, body),
                    author = COALESCE(?4, author),
                    updated_at = ?5
                 WHERE id = ?1",
                (
                    id.to_hex(),
                    changes.title.as_deref(),
                    changes.body.as_deref(),
                    changes.author.as_ref().map(ObjectId::to_hex),
                    format_timestamp(&Utc::now()),
                ),
            )?;

            if updated == 0 {
                return Ok(None);
            }
            query_message_by_id(conn, id)
        })
    }

    /// Returns whether a message was removed.
    pub fn delete_message(&self, id: &ObjectId) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM messages WHERE id = ?1", [id.to_hex()])?;
            Ok(deleted > 0)
        })
    }

    /// Deletes every message whose title is in `titles`. Returns the count.
    pub fn delete_messages_by_title(&self, titles: &[&str]) -> Result<usize> {
        self.with_conn(|conn| delete_where_in(conn, "messages", "title", titles))
    }
}

fn message_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        author: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn query_message_by_id(conn: &Connection, id: &ObjectId) -> Result<Option<Message>> {
    conn.query_row(
        &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
        [id.to_hex()],
        message_row,
    )
    .optional()?
    .map(Message::try_from)
    .transpose()
}

/// `table` and `column` are always crate-internal literals.
fn delete_where_in(conn: &Connection, table: &str, column: &str, values: &[&str]) -> Result<usize> {
    if values.is_empty() {
        return Ok(0);
    }

    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "DELETE FROM {} WHERE {} IN ({})",
        table,
        column,
        placeholders.join(", ")
    );

    let deleted = conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
    Ok(deleted)
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
