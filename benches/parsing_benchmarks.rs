use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use filter_docstring_lint::lint::SourceFile;
use filter_docstring_lint::parser::{logical_lines, parse_module};
use filter_docstring_lint::PythonLinter;
use std::hint::black_box;

/// Generate a Python module with `classes` filter definitions
fn generate_python_module(classes: usize, pattern: &str) -> String {
    let mut content = String::from("from openedx_filters.tooling import OpenEdxPublicFilter\n\n");

    for i in 0..classes {
        match pattern {
            "documented" => content.push_str(&format!(
                "\nclass Filter{i}(OpenEdxPublicFilter):\n    \"\"\"\n    Purpose:\n        Filter number {i}.\n\n    Filter Type:\n        org.openedx.example.filter{i}.v1\n\n    Trigger: NA\n    \"\"\"\n\n    filter_type = \"org.openedx.example.filter{i}.v1\"\n\n    @classmethod\n    def run_filter(cls, data):\n        return super().run_pipeline(data=data)\n"
            )),
            "undocumented" => content.push_str(&format!(
                "\nclass Filter{i}(OpenEdxPublicFilter):\n    filter_type = \"org.openedx.example.filter{i}.v1\"\n"
            )),
            _ => content.push_str(&format!(
                "\nclass Helper{i}(\n    Base,\n    metaclass=Meta,  # comment\n):\n    x = {{'a': [1, 2, 3]}}\n"
            )),
        }
    }

    content
}

/// Benchmark logical line splitting and module scanning
fn bench_module_parsing(c: &mut Criterion) {
    let patterns = vec!["documented", "undocumented", "plain"];

    let mut group = c.benchmark_group("module_parsing");

    for pattern in patterns {
        let content = generate_python_module(200, pattern);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("lines", pattern), &content, |b, content| {
            b.iter(|| black_box(logical_lines(black_box(content))))
        });
        group.bench_with_input(BenchmarkId::new("module", pattern), &content, |b, content| {
            b.iter(|| black_box(parse_module("app.filters", false, black_box(content))))
        });
    }

    group.finish();
}

/// Benchmark a full lint pass over in-memory sources
fn bench_lint_sources(c: &mut Criterion) {
    let linter = PythonLinter::with_default_checkers(Vec::new(), Vec::new());
    let module_counts = vec![1, 10, 50];

    let mut group = c.benchmark_group("lint_sources");

    for &count in &module_counts {
        let sources: Vec<_> = (0..count)
            .map(|i| {
                let pattern = if i % 2 == 0 { "documented" } else { "undocumented" };
                SourceFile::new(
                    format!("app/filters{}.py", i),
                    &format!("app.filters{}", i),
                    generate_python_module(20, pattern),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("modules", count), &sources, |b, sources| {
            b.iter(|| black_box(linter.lint_sources(black_box(sources))))
        });
    }

    group.finish();
}

criterion_group!(parsing_benches, bench_module_parsing, bench_lint_sources);

criterion_main!(parsing_benches);
