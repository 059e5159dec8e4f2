use crate::domain::errors::DomainError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

/// Fixed size of every feed page.
pub const FEED_PAGE_SIZE: i64 = 10;

const KEYSET_SEPARATOR: char = '|';

/// Position in the newest-first feed.
///
/// Cursors are emitted as `"{created_at}|{id}"` so that posts sharing a
/// timestamp are still ordered (and paged) deterministically. A bare RFC 3339
/// timestamp is accepted for older clients and pages by time alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCursor {
    Timestamp(DateTime<Utc>),
    Keyset { created_at: DateTime<Utc>, id: Uuid },
}

impl FeedCursor {
    pub fn after(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self::Keyset { created_at, id }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        let invalid = || DomainError::ValidationError(format!("Invalid cursor: {}", raw));

        match raw.split_once(KEYSET_SEPARATOR) {
            Some((ts, id)) => Ok(Self::Keyset {
                created_at: parse_timestamp(ts).ok_or_else(invalid)?,
                id: Uuid::parse_str(id).map_err(|_| invalid())?,
            }),
            None => Ok(Self::Timestamp(parse_timestamp(raw).ok_or_else(invalid)?)),
        }
    }

    /// True when a post at `(created_at, id)` comes after this cursor in feed order.
    pub fn precedes(&self, created_at: DateTime<Utc>, id: Uuid) -> bool {
        match self {
            Self::Timestamp(ts) => created_at < *ts,
            Self::Keyset {
                created_at: ts,
                id: last_id,
            } => (created_at, id) < (*ts, *last_id),
        }
    }
}

impl fmt::Display for FeedCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{}", format_timestamp(ts)),
            Self::Keyset { created_at, id } => {
                write!(f, "{}{}{}", format_timestamp(created_at), KEYSET_SEPARATOR, id)
            }
        }
    }
}

/// Microsecond precision matches what Postgres stores in `timestamptz`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// What a repository needs to fetch one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub cursor: Option<FeedCursor>,
    pub include_unpublished: bool,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            cursor: None,
            include_unpublished: false,
            limit: FEED_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// `None` once the final page has been served.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Builds a page, emitting a cursor only when the page came back full.
    pub fn from_items(items: Vec<T>, limit: i64, cursor_of: impl Fn(&T) -> FeedCursor) -> Self {
        let next_cursor = if items.len() as i64 == limit {
            items.last().map(|last| cursor_of(last).to_string())
        } else {
            None
        };
        Self { items, next_cursor }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
