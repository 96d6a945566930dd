use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether a comment documents the code that follows it, or the whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    #[default]
    Normal,
    /// A file-level comment whose annotations seed every other comment of the
    /// same parse call.
    Poster,
}

/// First and last line (1-based, inclusive) a comment occupies in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommentRange {
    pub start: usize,
    pub end: usize,
}

/// What the code following a comment is, as classified by a context resolver.
///
/// `kind` groups parsed comments and gates annotations restricted with
/// `allowed_on`. `extra` carries whatever else the resolver wants to attach.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Context {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Context {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A documentation comment as found in the source, with comment syntax
/// stripped and indentation normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComment {
    pub lines: Vec<String>,
    pub comment_type: CommentType,
    pub comment_range: CommentRange,
    pub context: Context,
}

impl RawComment {
    /// Builds a normal comment from already cleaned lines.
    pub fn new<I, S>(lines: I, context: Context) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            comment_type: CommentType::Normal,
            comment_range: CommentRange::default(),
            context,
        }
    }

    #[must_use]
    pub fn poster(mut self) -> Self {
        self.comment_type = CommentType::Poster;
        self
    }

    #[must_use]
    pub fn is_poster(&self) -> bool {
        self.comment_type == CommentType::Poster
    }
}
