//! Extracts C-style documentation comments (`/** */` blocks and `///` runs)
//! from source text and parses their `@annotation` lines into structured
//! records, grouped by the context the caller's resolver assigns to the code
//! following each comment.

pub mod annotation;
pub mod api;
pub mod comment;
pub mod error;
pub mod extractor;
pub mod line_index;
pub mod parser;
pub mod utils;
pub mod value;

pub use annotation::{AnnotationRegistry, AnnotationSpec};
pub use api::DocParser;
pub use comment::{CommentRange, CommentType, Context, RawComment};
pub use error::{DocError, ParseWarning};
pub use extractor::{CommentExtractor, ExtractorConfig};
pub use line_index::{LineIndex, LineLookup};
pub use parser::{
    Autofill, CommentParser, ParseReport, ParseResult, ParsedComment, ParserConfig, WarningSink,
};
pub use value::{FieldValue, Value};
