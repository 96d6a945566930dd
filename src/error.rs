use miette::Diagnostic;
use thiserror::Error;

/// Fatal errors of the file and serialization entry points.
///
/// Extraction and parsing themselves never fail; misuse surfaces as a
/// [`ParseWarning`] instead.
#[derive(Error, Debug, Diagnostic)]
pub enum DocError {
    #[error("Failed to read `{path}`")]
    #[diagnostic(code(cdoc::io), help("Check that the file exists and is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(cdoc::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(cdoc::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

/// Non-fatal diagnostics raised while parsing comments. The offending value
/// is dropped; the rest of the comment is still parsed.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    #[error("Parser for annotation '{name}' not found.")]
    #[diagnostic(
        code(parser::unknown_annotation),
        help("Register the annotation, or an alias for it, before parsing.")
    )]
    UnknownAnnotation { name: String },

    #[error("Annotation '{name}' is not allowed on comment from type '{context_type}'.")]
    #[diagnostic(code(parser::annotation_not_allowed))]
    NotAllowed { name: String, context_type: String },

    #[error("Annotation '{name}' is only allowed once per comment, second value will be ignored.")]
    #[diagnostic(code(parser::duplicate_annotation))]
    Duplicate { name: String },

    #[error("You can't have more than one poster comment.")]
    #[diagnostic(
        code(parser::multiple_posters),
        help("Only the first poster comment of a file is used.")
    )]
    MultiplePosters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        let unknown = ParseWarning::UnknownAnnotation { name: "foo".into() };
        assert_eq!(unknown.to_string(), "Parser for annotation 'foo' not found.");

        let not_allowed = ParseWarning::NotAllowed {
            name: "param".into(),
            context_type: "variable".into(),
        };
        assert_eq!(
            not_allowed.to_string(),
            "Annotation 'param' is not allowed on comment from type 'variable'."
        );

        let duplicate = ParseWarning::Duplicate { name: "type".into() };
        assert_eq!(
            duplicate.to_string(),
            "Annotation 'type' is only allowed once per comment, second value will be ignored."
        );

        assert_eq!(
            ParseWarning::MultiplePosters.to_string(),
            "You can't have more than one poster comment."
        );
    }
}
