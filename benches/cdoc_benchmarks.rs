use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cdocparser::{
    AnnotationRegistry, AnnotationSpec, CommentExtractor, CommentParser, Context, DocParser,
    LineLookup,
};

// ============================================================================
// Test Data
// ============================================================================

const SMALL_SCSS: &str = r#"/// Primary brand color.
/// @type Color
$primary: #0055ff;
"#;

const MEDIUM_SCSS: &str = r#"////
/// @group layout
////

/**
 * Spacing scale used by every component.
 * @type Map
 */
$spacing: (1: 4px, 2: 8px, 3: 16px);

/// Clamps a number between two bounds.
/// @param {Number} $value - Value to clamp
/// @param {Number} $min - Lower bound
/// @param {Number} $max - Upper bound
/// @return {Number}
@function clamp($value, $min, $max) {
  @return max($min, min($value, $max));
}

/// Truncates text with an ellipsis.
/// @example scss
///   .title { @include truncate; }
@mixin truncate {
  overflow: hidden;
  text-overflow: ellipsis;
}
"#;

fn generate_scss(count: usize) -> String {
    (0..count)
        .map(|i| format!("/// Variable number {i}.\n/// @type Number\n$var-{i}: {i};\n\n"))
        .collect()
}

fn resolve(code: &str, _lines: LineLookup<'_>) -> Context {
    let line = code.trim_start().lines().next().unwrap_or("");
    if line.starts_with('$') {
        Context::new("variable")
    } else if line.starts_with("@function") {
        Context::new("function")
    } else if line.starts_with("@mixin") {
        Context::new("mixin")
    } else {
        Context::new("unknown")
    }
}

fn registry() -> AnnotationRegistry {
    AnnotationRegistry::new()
        .with_alias("return", "returns")
        .with("param", AnnotationSpec::new(|c| Some(c.into())).allowed_on(["function", "mixin"]))
        .with("returns", AnnotationSpec::new(|c| Some(c.into())).single())
        .with("type", AnnotationSpec::new(|c| Some(c.into())).single())
        .with("group", AnnotationSpec::new(|c| Some(c.into())))
        .with("example", AnnotationSpec::new(|c| Some(c.into())))
}

// ============================================================================
// Extractor Benchmarks
// ============================================================================

fn bench_extract_sizes(c: &mut Criterion) {
    let extractor = CommentExtractor::new(resolve);
    let mut group = c.benchmark_group("extract_by_size");

    for (name, source) in [("small", SMALL_SCSS), ("medium", MEDIUM_SCSS)] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, src| {
            b.iter(|| extractor.extract(black_box(src)))
        });
    }

    group.finish();
}

fn bench_extract_scaling(c: &mut Criterion) {
    let extractor = CommentExtractor::new(resolve);
    let mut group = c.benchmark_group("extract_comment_scaling");

    for size in [10, 100, 1000] {
        let source = generate_scss(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| extractor.extract(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parse_scaling(c: &mut Criterion) {
    let extractor = CommentExtractor::new(resolve);
    let parser = CommentParser::new(registry());
    let mut group = c.benchmark_group("parse_comment_scaling");

    for size in [10, 100, 1000] {
        let comments = extractor.extract(&generate_scss(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &comments, |b, comments| {
            b.iter(|| parser.parse(black_box(comments)))
        });
    }

    group.finish();
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_e2e(c: &mut Criterion) {
    let doc = DocParser::new(resolve, registry());

    c.bench_function("e2e_medium", |b| b.iter(|| doc.parse_source(black_box(MEDIUM_SCSS))));

    c.bench_function("e2e_medium_to_json", |b| {
        b.iter(|| doc.parse_source(black_box(MEDIUM_SCSS)).to_json())
    });
}

criterion_group!(extractor_benches, bench_extract_sizes, bench_extract_scaling);
criterion_group!(parser_benches, bench_parse_scaling);
criterion_group!(e2e_benches, bench_e2e);

criterion_main!(extractor_benches, parser_benches, e2e_benches);
