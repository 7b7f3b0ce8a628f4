//! Sort keys and time windows
//!
//! The canonical sort key is `<timestamp>#<suffix>`: a second-precision UTC
//! timestamp (`2015-12-21T17:42:34Z`, fixed width) followed by 32 lowercase
//! hex characters. Lexicographic order of the key is chronological order of
//! the timestamp; orders within the same second are ordered by suffix.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use super::errors::{ModelError, ModelResult};

/// Separator between timestamp and random suffix
pub const SORT_KEY_SEPARATOR: char = '#';

/// Width of the random suffix in characters
pub const SUFFIX_WIDTH: usize = 32;

/// Renders a timestamp in sort-key form
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC 3339 timestamp into UTC
pub fn parse_timestamp(s: &str) -> ModelResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ModelError::InvalidTimestamp(s.to_string()))
}

/// Builds a sort key for `at` with a fresh random suffix
pub fn sort_key(at: DateTime<Utc>) -> String {
    format!(
        "{}{}{}",
        format_timestamp(at),
        SORT_KEY_SEPARATOR,
        Uuid::new_v4().simple()
    )
}

/// Builds a sort key with an explicit suffix.
///
/// The suffix must be exactly [`SUFFIX_WIDTH`] lowercase hex characters.
pub fn sort_key_with_suffix(at: DateTime<Utc>, suffix: &str) -> ModelResult<String> {
    let key = format!("{}{}{}", format_timestamp(at), SORT_KEY_SEPARATOR, suffix);
    if !is_valid_suffix(suffix) {
        return Err(ModelError::InvalidSortKey(key));
    }
    Ok(key)
}

/// Splits a sort key into its timestamp and suffix
pub fn parse_sort_key(key: &str) -> ModelResult<(DateTime<Utc>, &str)> {
    let (ts, suffix) = key
        .split_once(SORT_KEY_SEPARATOR)
        .ok_or_else(|| ModelError::InvalidSortKey(key.to_string()))?;
    if !is_valid_suffix(suffix) {
        return Err(ModelError::InvalidSortKey(key.to_string()));
    }
    Ok((parse_timestamp(ts)?, suffix))
}

fn is_valid_suffix(suffix: &str) -> bool {
    suffix.len() == SUFFIX_WIDTH
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Inclusive time range over order timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window; `start` must not be after `end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ModelResult<Self> {
        if start > end {
            return Err(ModelError::InvalidTimeWindow {
                start: format_timestamp(start),
                end: format_timestamp(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both ends from RFC 3339 strings
    pub fn parse(start: &str, end: &str) -> ModelResult<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns inclusive sort-key bounds covering every order in the window.
    ///
    /// The upper bound carries the largest possible suffix so that orders
    /// placed during the final second are included.
    pub fn sort_key_bounds(&self) -> (String, String) {
        let lower = format_timestamp(self.start);
        let upper = format!(
            "{}{}{}",
            format_timestamp(self.end),
            SORT_KEY_SEPARATOR,
            "f".repeat(SUFFIX_WIDTH)
        );
        (lower, upper)
    }
}
