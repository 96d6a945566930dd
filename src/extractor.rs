use crate::comment::{CommentRange, CommentType, Context, RawComment};
use crate::line_index::{LineIndex, LineLookup};
use crate::utils::dedent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classifies the code following a comment.
///
/// Receives the source text after the comment and a line lookup whose offsets
/// are relative to that text. Must cope with an empty string.
pub type ContextResolver = dyn Fn(&str, LineLookup<'_>) -> Context + Send + Sync;

/// Comment delimiters recognized by the extractor.
///
/// Doc comments use the style followed by one more marker character: with the
/// defaults, `/** ... */` for blocks and runs of `///` for lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    pub block_comment_style: String,
    pub line_comment_style: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            block_comment_style: "/*".to_string(),
            line_comment_style: "//".to_string(),
        }
    }
}

/// Concrete markers derived from an `ExtractorConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Markers {
    /// Doc block opener, e.g. `/**`.
    block_open: String,
    /// Block closer, e.g. `*/`.
    block_close: String,
    /// Repeated to intensify a block comment, e.g. `*`.
    block_char: char,
    /// Doc line marker, e.g. `///`.
    line_doc: String,
    /// Repeated to intensify a line comment, e.g. `/`.
    line_char: char,
}

impl Markers {
    fn from_config(config: &ExtractorConfig) -> Self {
        let defaults = ExtractorConfig::default();
        let block_style = non_empty_or(&config.block_comment_style, &defaults.block_comment_style);
        let line_style = non_empty_or(&config.line_comment_style, &defaults.line_comment_style);

        let block_char = block_style.chars().last().unwrap_or('*');
        let line_char = line_style.chars().last().unwrap_or('/');

        Self {
            block_open: format!("{block_style}{block_char}"),
            block_close: block_style.chars().rev().map(mirror).collect(),
            block_char,
            line_doc: format!("{line_style}{line_char}"),
            line_char,
        }
    }
}

fn non_empty_or<'a>(style: &'a str, fallback: &'a str) -> &'a str {
    if style.is_empty() {
        log::warn!("empty comment style, falling back to `{fallback}`");
        fallback
    } else {
        style
    }
}

/// Closing counterpart of an opening delimiter character.
fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

/// Finds documentation comments in source text.
pub struct CommentExtractor {
    resolver: Box<ContextResolver>,
    markers: Markers,
}

impl fmt::Debug for CommentExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentExtractor")
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

impl CommentExtractor {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&str, LineLookup<'_>) -> Context + Send + Sync + 'static,
    {
        Self::with_config(resolver, ExtractorConfig::default())
    }

    pub fn with_config<F>(resolver: F, config: ExtractorConfig) -> Self
    where
        F: Fn(&str, LineLookup<'_>) -> Context + Send + Sync + 'static,
    {
        Self {
            resolver: Box::new(resolver),
            markers: Markers::from_config(&config),
        }
    }

    /// Extracts every doc comment of `code`, in source order.
    ///
    /// The context resolver runs once per comment, on the text that follows it.
    pub fn extract(&self, code: &str) -> Vec<RawComment> {
        let index = LineIndex::new(code);
        let mut scanner = Scanner::new(code, &self.markers);
        let mut comments = Vec::new();

        while let Some(found) = scanner.next_comment() {
            let start = index.line_at(found.start);
            let newlines = code[found.start..found.end].matches('\n').count();
            let comment_range = CommentRange {
                start,
                end: start + newlines,
            };

            let context = (self.resolver)(&code[found.end..], LineLookup::new(&index, found.end));

            log::debug!(
                "extracted {:?} comment at lines {}-{} (context `{}`)",
                found.comment_type,
                comment_range.start,
                comment_range.end,
                context.kind
            );

            comments.push(RawComment {
                lines: found.lines,
                comment_type: found.comment_type,
                comment_range,
                context,
            });
        }

        comments
    }
}

/// A comment located by the scanner. `start..end` is the raw match.
#[derive(Debug)]
struct Found {
    start: usize,
    end: usize,
    lines: Vec<String>,
    comment_type: CommentType,
}

/// Line-oriented cursor over one `extract` call's input.
struct Scanner<'a> {
    code: &'a str,
    markers: &'a Markers,
    /// Always at the start of a line.
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(code: &'a str, markers: &'a Markers) -> Self {
        Self {
            code,
            markers,
            position: 0,
        }
    }

    fn next_comment(&mut self) -> Option<Found> {
        while self.position <= self.code.len() {
            let line_start = self.position;
            let line_end = self.line_end(line_start);
            let indent = indent_width(&self.code[line_start..line_end]);
            let rest = &self.code[line_start + indent..line_end];

            let found = if rest.starts_with(&self.markers.line_doc) {
                Some(self.read_line_run(line_start + indent))
            } else if rest.starts_with(&self.markers.block_open) {
                self.read_block(line_start, line_start + indent)
            } else {
                // A line run may also open after code, e.g. `$a: 1; /// note`.
                rest.find(&self.markers.line_doc)
                    .map(|at| self.read_line_run(line_start + indent + at))
            };

            match found {
                Some(found) => {
                    self.position = self.line_end(found.end) + 1;
                    return Some(found);
                }
                None => self.position = line_end + 1,
            }
        }
        None
    }

    /// Offset of the `\n` ending the line that contains `from`, or the input length.
    fn line_end(&self, from: usize) -> usize {
        self.code[from..]
            .find('\n')
            .map_or(self.code.len(), |i| from + i)
    }

    /// Consumes the marker at `start`, then the following lines that open
    /// with the doc line marker.
    fn read_line_run(&self, start: usize) -> Found {
        let marker = &self.markers.line_doc;
        let mut contents: Vec<&str> = Vec::new();
        let mut line_start = start;
        let mut end = start;

        while line_start <= self.code.len() {
            let line_end = self.line_end(line_start);
            let line = &self.code[line_start..line_end];
            let trimmed = &line[indent_width(line)..];
            let Some(content) = trimmed.strip_prefix(marker.as_str()) else {
                break;
            };
            contents.push(content.strip_suffix('\r').unwrap_or(content));
            end = line_end;
            line_start = line_end + 1;
        }

        let mut comment_type = CommentType::Normal;
        if contents
            .first()
            .is_some_and(|first| first.starts_with(self.markers.line_char))
        {
            // Intensified marker line, e.g. `////`: a poster comment. A
            // matching closing line is dropped as well.
            contents.remove(0);
            let line_char = self.markers.line_char;
            let is_marker_line = |content: &&str| {
                let content = content.trim();
                !content.is_empty() && content.chars().all(|c| c == line_char)
            };
            if contents.last().is_some_and(is_marker_line) {
                contents.pop();
            }
            comment_type = CommentType::Poster;
        }

        let lines = dedent(&contents.join("\n"))
            .split('\n')
            .map(str::to_string)
            .collect();

        Found {
            start,
            end,
            lines,
            comment_type,
        }
    }

    /// Reads a doc block opening at `open`. Returns `None` when it is never closed.
    fn read_block(&self, line_start: usize, open: usize) -> Option<Found> {
        let markers = self.markers;
        let body_start = open + markers.block_open.len();
        let close = body_start + self.code[body_start..].find(&markers.block_close)?;

        // Length of the marker run that closes the block, e.g. 2 for `**/`.
        let close_prefix = markers
            .block_close
            .chars()
            .take_while(|c| *c == markers.block_char)
            .count();
        let preceding = self.code[body_start..close]
            .chars()
            .rev()
            .take_while(|c| *c == markers.block_char)
            .count();
        let body_end = close - preceding * markers.block_char.len_utf8();

        let comment_type = if close_prefix + preceding > 1 {
            CommentType::Poster
        } else {
            CommentType::Normal
        };

        Some(Found {
            start: line_start,
            end: close + markers.block_close.len(),
            lines: clean_block(&self.code[body_start..body_end], markers.block_char),
            comment_type,
        })
    }
}

fn indent_width(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Drops the opener's line and the closer's line, strips one leading marker
/// character from each remaining line, then dedents.
fn clean_block(body: &str, block_char: char) -> Vec<String> {
    let mut text = body;
    if let Some(first) = text.find(is_newline) {
        text = text[first..].trim_start_matches(is_newline);
        if let Some(last) = text.rfind(is_newline) {
            text = &text[..last];
        }
    }

    let stripped = text
        .split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let trimmed = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
            trimmed.strip_prefix(block_char).unwrap_or(line)
        })
        .collect::<Vec<&str>>()
        .join("\n");

    dedent(&stripped).split('\n').map(str::to_string).collect()
}
