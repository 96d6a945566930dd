use crate::annotation::AnnotationRegistry;
use crate::comment::{CommentRange, Context, RawComment};
use crate::error::ParseWarning;
use crate::value::{FieldValue, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Parsed comments grouped by context type, in discovery order.
pub type ParseResult = IndexMap<String, Vec<ParsedComment>>;

/// A comment with its annotations resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedComment {
    /// Every line that is not an annotation, each followed by `\n`.
    pub description: String,
    pub context: Context,
    pub comment_range: CommentRange,
    #[serde(flatten)]
    fields: IndexMap<String, FieldValue>,
}

impl ParsedComment {
    fn new(comment: &RawComment) -> Self {
        Self {
            description: String::new(),
            context: comment.context.clone(),
            comment_range: comment.comment_range,
            fields: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Values of a repeatable annotation; empty when absent or not a list.
    #[must_use]
    pub fn values(&self, name: &str) -> &[Value] {
        self.field(name).and_then(FieldValue::as_list).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Which annotations run their autofill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Autofill {
    /// `true` enables every autofill, `false` none.
    Enabled(bool),
    Only(Vec<String>),
}

impl Default for Autofill {
    fn default() -> Self {
        Autofill::Enabled(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub autofill: Autofill,
}

/// Receives warnings as they are detected.
pub trait WarningSink {
    fn warning(&mut self, warning: ParseWarning);
}

impl<F> WarningSink for F
where
    F: FnMut(ParseWarning),
{
    fn warning(&mut self, warning: ParseWarning) {
        self(warning);
    }
}

/// Parsed comments together with the warnings raised while parsing them.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub result: ParseResult,
    pub warnings: Vec<ParseWarning>,
}

/// Resolves the `@annotations` of extracted comments.
///
/// The parser only holds its registry and configuration. Poster comment state
/// lives in each `parse` call, so one parser can serve any number of calls.
#[derive(Debug)]
pub struct CommentParser {
    registry: AnnotationRegistry,
    config: ParserConfig,
}

impl CommentParser {
    pub fn new(registry: AnnotationRegistry) -> Self {
        Self::with_config(registry, ParserConfig::default())
    }

    pub fn with_config(registry: AnnotationRegistry, mut config: ParserConfig) -> Self {
        if let Autofill::Only(names) = &mut config.autofill {
            for name in names.iter_mut() {
                *name = registry.canonical_name(name).to_string();
            }
        }
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    /// Parses `comments` and collects every warning into the report.
    pub fn parse(&self, comments: &[RawComment]) -> ParseReport {
        let mut warnings = Vec::new();
        let result = self.parse_with_sink(comments, &mut |warning: ParseWarning| {
            warnings.push(warning);
        });
        ParseReport { result, warnings }
    }

    /// Parses `comments`, handing each warning to `sink` as soon as it is found.
    pub fn parse_with_sink<S>(&self, comments: &[RawComment], sink: &mut S) -> ParseResult
    where
        S: WarningSink + ?Sized,
    {
        let mut result = ParseResult::new();
        let mut poster: Option<ParsedComment> = None;

        for comment in comments {
            let mut parsed = self.parse_comment(comment, sink);

            if comment.is_poster() {
                if poster.is_none() {
                    poster = Some(parsed);
                } else {
                    emit(sink, ParseWarning::MultiplePosters);
                }
                continue;
            }

            if let Some(poster) = &poster {
                self.merge_poster(&mut parsed, poster);
            }
            self.apply_computed(&mut parsed);

            result
                .entry(parsed.context.kind.clone())
                .or_default()
                .push(parsed);
        }

        log::debug!(
            "parsed {} comments into {} context types",
            comments.len(),
            result.len()
        );
        result
    }

    fn parse_comment<S>(&self, comment: &RawComment, sink: &mut S) -> ParsedComment
    where
        S: WarningSink + ?Sized,
    {
        let mut parsed = ParsedComment::new(comment);
        let kind = comment.context.kind.as_str();

        for line in &comment.lines {
            let Some((raw_name, content)) = split_directive(line) else {
                parsed.description.push_str(line);
                parsed.description.push('\n');
                continue;
            };

            let name = self.registry.canonical_name(raw_name);
            let Some((spec, parse)) = self
                .registry
                .spec(name)
                .and_then(|spec| spec.parser().map(|parse| (spec, parse)))
            else {
                emit(sink, ParseWarning::UnknownAnnotation { name: name.to_string() });
                continue;
            };

            if !comment.is_poster() && !spec.is_allowed_on(kind) {
                emit(
                    sink,
                    ParseWarning::NotAllowed {
                        name: name.to_string(),
                        context_type: kind.to_string(),
                    },
                );
                continue;
            }

            log::trace!("@{name} on `{kind}`: {content:?}");

            match parse(content) {
                None => {}
                Some(Value::Boolean(flag)) => {
                    parsed.fields.insert(name.to_string(), FieldValue::Flag(flag));
                }
                Some(value) if !spec.is_multiple() => {
                    if parsed.contains(name) {
                        emit(sink, ParseWarning::Duplicate { name: name.to_string() });
                    } else {
                        parsed.fields.insert(name.to_string(), FieldValue::Scalar(value));
                    }
                }
                Some(value) => match parsed.fields.get_mut(name) {
                    Some(FieldValue::List(values)) => values.push(value),
                    // A flag set earlier gives way to a fresh list.
                    _ => {
                        parsed
                            .fields
                            .insert(name.to_string(), FieldValue::List(vec![value]));
                    }
                },
            }
        }

        parsed
    }

    /// Copies poster fields the comment does not set itself.
    fn merge_poster(&self, parsed: &mut ParsedComment, poster: &ParsedComment) {
        for (name, value) in &poster.fields {
            let allowed = self
                .registry
                .spec(name)
                .map_or(true, |spec| spec.is_allowed_on(&parsed.context.kind));
            if allowed && !parsed.contains(name) {
                parsed.fields.insert(name.clone(), value.clone());
            }
        }
    }

    /// Runs defaults, then autofills, in registration order.
    fn apply_computed(&self, parsed: &mut ParsedComment) {
        for (name, spec) in self.registry.iter() {
            if !spec.is_allowed_on(&parsed.context.kind) {
                continue;
            }

            if !parsed.contains(name) {
                if let Some(value) = spec.default_for(parsed) {
                    parsed.fields.insert(name.to_string(), value);
                }
            }

            if spec.has_autofill() && self.autofill_enabled(name) {
                if let Some(value) = spec.autofill_for(parsed) {
                    parsed.fields.insert(name.to_string(), value);
                }
            }
        }
    }

    fn autofill_enabled(&self, name: &str) -> bool {
        match &self.config.autofill {
            Autofill::Enabled(enabled) => *enabled,
            Autofill::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

fn emit<S>(sink: &mut S, warning: ParseWarning)
where
    S: WarningSink + ?Sized,
{
    log::warn!("{warning}");
    sink.warning(warning);
}

/// Splits `@name content` into the name and its trimmed content. Only lines
/// that start with `@` directly are directives.
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('@')?;
    let name_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if name_len == 0 {
        return None;
    }
    let content = rest[name_len..].trim_matches(|c: char| c == ' ' || c == '\t');
    Some((&rest[..name_len], content))
}
