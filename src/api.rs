use crate::annotation::AnnotationRegistry;
use crate::comment::{Context, RawComment};
use crate::error::DocError;
use crate::extractor::{CommentExtractor, ExtractorConfig};
use crate::line_index::LineLookup;
use crate::parser::{CommentParser, ParseReport, ParserConfig};
use serde::{Serialize, Serializer};
use std::path::Path;

impl Serialize for ParseReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.result.serialize(serializer)
    }
}

impl ParseReport {
    /// Serializes the grouped comments into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `DocError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, DocError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Serializes the grouped comments into a YAML string.
    ///
    /// # Errors
    /// Returns a `DocError::Yaml` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, DocError> {
        Ok(serde_yaml::to_string(&self)?)
    }
}

/// Extractor and parser wired together: source text in, grouped comments out.
///
/// ```
/// use cdocparser::{AnnotationRegistry, AnnotationSpec, Context, DocParser};
///
/// let registry = AnnotationRegistry::new()
///     .with("param", AnnotationSpec::new(|content| Some(content.into())));
/// let doc = DocParser::new(|_code: &str, _lines| Context::new("function"), registry);
///
/// let report = doc.parse_source("/**\n * Clamps a value.\n * @param $value\n */\n@function clamp() {}");
/// let function = &report.result["function"][0];
/// assert_eq!(function.description, "Clamps a value.\n");
/// assert_eq!(function.values("param").len(), 1);
/// ```
#[derive(Debug)]
pub struct DocParser {
    extractor: CommentExtractor,
    parser: CommentParser,
}

impl DocParser {
    pub fn new<F>(resolver: F, registry: AnnotationRegistry) -> Self
    where
        F: Fn(&str, LineLookup<'_>) -> Context + Send + Sync + 'static,
    {
        Self::with_config(
            resolver,
            registry,
            ExtractorConfig::default(),
            ParserConfig::default(),
        )
    }

    pub fn with_config<F>(
        resolver: F,
        registry: AnnotationRegistry,
        extractor_config: ExtractorConfig,
        parser_config: ParserConfig,
    ) -> Self
    where
        F: Fn(&str, LineLookup<'_>) -> Context + Send + Sync + 'static,
    {
        Self {
            extractor: CommentExtractor::with_config(resolver, extractor_config),
            parser: CommentParser::with_config(registry, parser_config),
        }
    }

    pub fn from_parts(extractor: CommentExtractor, parser: CommentParser) -> Self {
        Self { extractor, parser }
    }

    #[must_use]
    pub fn extractor(&self) -> &CommentExtractor {
        &self.extractor
    }

    #[must_use]
    pub fn parser(&self) -> &CommentParser {
        &self.parser
    }

    #[must_use]
    pub fn extract(&self, code: &str) -> Vec<RawComment> {
        self.extractor.extract(code)
    }

    /// Extracts and parses every doc comment of `code`.
    #[must_use]
    pub fn parse_source(&self, code: &str) -> ParseReport {
        let comments = self.extractor.extract(code);
        self.parser.parse(&comments)
    }

    /// Reads `path` and parses its doc comments.
    ///
    /// # Errors
    /// Returns a `DocError::Io` if the file cannot be read.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParseReport, DocError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| DocError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("parsing doc comments of {}", path.display());
        Ok(self.parse_source(&code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationSpec;
    use crate::value::Value;

    fn doc_parser() -> DocParser {
        let registry = AnnotationRegistry::new()
            .with("group", AnnotationSpec::new(|content| Some(content.into())))
            .with("deprecated", AnnotationSpec::new(|_| Some(true.into())));
        DocParser::new(
            |code: &str, _lines: LineLookup<'_>| {
                if code.trim_start().starts_with('$') {
                    Context::new("variable")
                } else {
                    Context::new("unknown")
                }
            },
            registry,
        )
    }

    #[test]
    fn test_parse_source_to_json() {
        let source = "////\n/// @group colors\n////\n\n/// Main color.\n/// @deprecated\n$primary: red;\n";
        let report = doc_parser().parse_source(source);
        assert!(report.warnings.is_empty());

        let expected_json = serde_json::json!({
            "variable": [{
                "description": "Main color.\n",
                "context": { "type": "variable" },
                "commentRange": { "start": 5, "end": 6 },
                "deprecated": true,
                "group": ["colors"]
            }]
        });

        let result_json: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(result_json, expected_json);
    }

    #[test]
    fn test_parse_source_to_yaml() {
        let report = doc_parser().parse_source("/**\n * Spacing.\n */\n$gap: 1rem;");

        let expected = serde_json::json!({
            "variable": [{
                "description": "Spacing.\n",
                "context": { "type": "variable" },
                "commentRange": { "start": 1, "end": 3 }
            }]
        });

        let yaml = report.to_yaml().unwrap();
        let result: serde_json::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_from_parts() {
        let extractor = CommentExtractor::with_config(
            |_code: &str, _lines: LineLookup<'_>| Context::new("rule"),
            ExtractorConfig {
                block_comment_style: "(*".to_string(),
                line_comment_style: "--".to_string(),
            },
        );
        let registry = AnnotationRegistry::new()
            .with("since", AnnotationSpec::new(|content| Some(content.into())));
        let doc = DocParser::from_parts(extractor, CommentParser::new(registry));
        assert_eq!(doc.parser().registry().len(), 1);

        let source = "(**\n * Old rule.\n * @since 1.0\n *)\nrule {}\n";
        let comments = doc.extract(source);
        assert_eq!(comments.len(), 1);
        assert_eq!(doc.extractor().extract(source), comments);

        let report = doc.parser().parse(&comments);
        assert_eq!(report.result["rule"][0].values("since"), &[Value::from("1.0")]);
        assert_eq!(doc.parse_source(source).result, report.result);
    }

    #[test]
    fn test_doc_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocParser>();
    }

    #[test]
    fn test_missing_file() {
        let err = doc_parser()
            .parse_file("definitely/not/here.scss")
            .unwrap_err();
        assert!(matches!(err, DocError::Io { .. }));
        assert_eq!(err.to_string(), "Failed to read `definitely/not/here.scss`");
    }
}
