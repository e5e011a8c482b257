//! Note entity and identity.
//!
//! # Responsibility
//! - Define the canonical note record shared by store, codec and views.
//! - Generate collision-resistant ids from clock millis plus a random suffix.
//! - Derive title/content previews for list rendering.
//!
//! # Invariants
//! - `id` is stable for the whole note lifetime.
//! - `updated_at` is epoch milliseconds and is only ever moved forward by
//!   `Note::apply`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Placeholder shown when a note title is empty.
pub const DEFAULT_TITLE: &str = "Untitled note";

const ID_PREFIX: &str = "note_";
const ID_SUFFIX_CHARS: usize = 12;
const ELLIPSIS: char = '…';

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Opaque note identifier.
///
/// Serialized as a bare string so persisted blobs stay `{"id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh id of the form `note_<millis>_<random>`.
    pub fn generate(now_millis: i64) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        let suffix = &random[..ID_SUFFIX_CHARS];
        Self(format!("{ID_PREFIX}{now_millis}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One short text document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// May be empty; views render `DEFAULT_TITLE` instead.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Last write marker in epoch milliseconds.
    pub updated_at: i64,
}

impl Note {
    /// Creates an empty note with the default title.
    pub fn new(id: NoteId, updated_at: i64) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            content: String::new(),
            updated_at,
        }
    }

    /// Applies a partial edit and stamps the write.
    ///
    /// `stamp` lower than the current `updated_at` is ignored so the marker
    /// never moves backwards.
    pub fn apply(&mut self, patch: NotePatch, stamp: i64) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.updated_at = self.updated_at.max(stamp);
    }

    /// Title for display, falling back to the placeholder when blank.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            self.title.as_str()
        }
    }

    /// Single-line title summary capped at `max_chars`.
    pub fn title_preview(&self, max_chars: usize) -> String {
        truncate_chars(self.display_title(), max_chars)
    }

    /// Single-line content summary capped at `max_chars`.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.content, max_chars)
    }

    /// Case-insensitive substring match on title or content.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// Partial edit for `title` and/or `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            content: None,
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(value.into()),
        }
    }

    pub fn with_title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn with_content(mut self, value: impl Into<String>) -> Self {
        self.content = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Collapses whitespace runs and truncates to `max_chars`, ending with `…`
/// when something was cut.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.chars().count() <= max_chars {
        return collapsed.into_owned();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut truncated: String = collapsed.chars().take(max_chars - 1).collect();
    truncated.push(ELLIPSIS);
    truncated
}
