use crate::parser::ParsedComment;
use crate::value::{FieldValue, Value};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Turns the content following `@name` into a value. `None` leaves the
/// comment untouched; a boolean makes the annotation a flag.
pub type ParseFn = dyn Fn(&str) -> Option<Value> + Send + Sync;

/// Computes a field from the comment parsed so far (defaults and autofills).
pub type ComputeFn = dyn Fn(&ParsedComment) -> Option<FieldValue> + Send + Sync;

/// How one annotation is parsed, defaulted and restricted.
pub struct AnnotationSpec {
    parse: Option<Box<ParseFn>>,
    default: Option<Box<ComputeFn>>,
    autofill: Option<Box<ComputeFn>>,
    allowed_on: Option<BTreeSet<String>>,
    multiple: bool,
}

impl fmt::Debug for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationSpec")
            .field("parse", &self.parse.is_some())
            .field("default", &self.default.is_some())
            .field("autofill", &self.autofill.is_some())
            .field("allowed_on", &self.allowed_on)
            .field("multiple", &self.multiple)
            .finish()
    }
}

impl AnnotationSpec {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            parse: Some(Box::new(parse)),
            ..Self::without_parser()
        }
    }

    /// A spec that only computes its field. Writing the annotation in a
    /// comment is reported as an unknown annotation.
    pub fn without_parser() -> Self {
        Self {
            parse: None,
            default: None,
            autofill: None,
            allowed_on: None,
            multiple: true,
        }
    }

    #[must_use]
    pub fn with_default<F>(mut self, default: F) -> Self
    where
        F: Fn(&ParsedComment) -> Option<FieldValue> + Send + Sync + 'static,
    {
        self.default = Some(Box::new(default));
        self
    }

    #[must_use]
    pub fn with_autofill<F>(mut self, autofill: F) -> Self
    where
        F: Fn(&ParsedComment) -> Option<FieldValue> + Send + Sync + 'static,
    {
        self.autofill = Some(Box::new(autofill));
        self
    }

    /// Restricts the annotation to comments whose context has one of `kinds`.
    #[must_use]
    pub fn allowed_on<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_on = Some(kinds.into_iter().map(Into::into).collect());
        self
    }

    /// Keeps only the first value of the annotation per comment.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.multiple = false;
        self
    }

    #[must_use]
    pub fn parser(&self) -> Option<&ParseFn> {
        self.parse.as_deref()
    }

    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    #[must_use]
    pub fn is_allowed_on(&self, kind: &str) -> bool {
        self.allowed_on
            .as_ref()
            .map_or(true, |allowed| allowed.contains(kind))
    }

    pub(crate) fn default_for(&self, comment: &ParsedComment) -> Option<FieldValue> {
        self.default.as_ref().and_then(|default| default(comment))
    }

    pub(crate) fn has_autofill(&self) -> bool {
        self.autofill.is_some()
    }

    pub(crate) fn autofill_for(&self, comment: &ParsedComment) -> Option<FieldValue> {
        self.autofill.as_ref().and_then(|autofill| autofill(comment))
    }
}

/// Known annotations by canonical name, plus shorthand aliases.
///
/// Registration order is kept: defaults and autofills run in that order.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    entries: IndexMap<String, AnnotationSpec>,
    aliases: HashMap<String, String>,
}

impl AnnotationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, spec: AnnotationSpec) -> Self {
        self.insert(name, spec);
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.insert_alias(alias, canonical);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: AnnotationSpec) {
        self.entries.insert(name.into(), spec);
    }

    pub fn insert_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.aliases.insert(alias.into(), canonical.into());
    }

    /// Resolves `name` through the alias table. Unaliased names map to themselves.
    #[must_use]
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Looks up a spec by canonical name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnnotationSpec> {
        self.entries.get(self.canonical_name(name))
    }

    /// Looks up a spec by its canonical name, without alias resolution.
    #[must_use]
    pub fn spec(&self, canonical: &str) -> Option<&AnnotationSpec> {
        self.entries.get(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
