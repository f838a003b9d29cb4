//! Database row types. These map directly to SQLite rows and are converted
//! into the quill-types models at the edge of the store.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use quill_types::models::{Message, User};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id.parse().with_context(|| format!("corrupt user id '{}'", row.id))?,
            created_at: parse_timestamp(&row.created_at, &row.id),
            username: row.username,
            password: row.password,
        })
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self> {
        let id = row.id.parse().with_context(|| format!("corrupt message id '{}'", row.id))?;
        let author = row
            .author
            .parse()
            .with_context(|| format!("corrupt author '{}' on message '{}'", row.author, row.id))?;

        Ok(Message {
            id,
            author,
            created_at: parse_timestamp(&row.created_at, &row.id),
            updated_at: parse_timestamp(&row.updated_at, &row.id),
            title: row.title,
            body: row.body,
        })
    }
}

/// Timestamps are written as RFC 3339. A row that was edited by hand falls
/// back to the epoch rather than failing the whole read.
fn parse_timestamp(raw: &str, record_id: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on record '{}': {}", raw, record_id, e);
            DateTime::default()
        })
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}
