use cdocparser::{AnnotationRegistry, AnnotationSpec, Context, DocParser, LineLookup};

fn main() {
    let source = r#"
/**
 * Primary brand color.
 * @type Color
 * @since 1.0.0
 */
$brand: #0055ff;
"#;

    let registry = AnnotationRegistry::new()
        .with("type", AnnotationSpec::new(|content| Some(content.into())).single())
        .with("since", AnnotationSpec::new(|content| Some(content.into())));

    let doc = DocParser::new(
        |code: &str, lines: LineLookup<'_>| {
            let offset = code.len() - code.trim_start().len();
            Context::new("variable").with("line", lines.line_at(offset) as f64)
        },
        registry,
    );

    let report = doc.parse_source(source);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    match report.to_json() {
        Ok(json_output) => println!("Parsed doc comments to JSON:\n{json_output}"),
        Err(e) => eprintln!("Failed to serialize doc comments: {e:?}"),
    }
}
