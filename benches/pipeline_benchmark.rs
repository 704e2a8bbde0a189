//! Benchmarks for the sowdoc export pipeline.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure cleaning, parsing, and rendering at various
//! section sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sowdoc::{ProposalConfig, RenderOptions, Section, SectionStatus};

/// Creates section text with the given number of content groups.
fn create_section_text(group_count: usize) -> String {
    let mut text = String::new();

    for i in 0..group_count {
        text.push_str(&format!(
            "## Phase {}\n\n\
             This phase covers **keyword research** and campaign setup for item {}.\n\n\
             - Deliverables:\n\
             - Weekly report\n\
             - Creative refresh\n\n\
             | Task | Owner | Cost |\n\
             |---|---|---|\n\
             | Setup | Agency | $1,000 |\n\
             | Review | Client | $0 |\n\n",
            i, i
        ));
    }

    text.push_str("By: ________\nName: ________\n\n---\nThis section is designed to be edited.");
    text
}

fn create_sections(section_count: usize, groups: usize) -> Vec<Section> {
    (0..section_count)
        .map(|i| {
            Section::new(i.to_string(), format!("Section {}", i))
                .with_content(create_section_text(groups), SectionStatus::Success)
        })
        .collect()
}

/// Benchmark the cleaner.
fn bench_cleanup(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanup");

    for groups in [1, 10, 100].iter() {
        let text = create_section_text(*groups);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("groups", groups), &text, |b, text| {
            b.iter(|| sowdoc::clean(black_box(text)));
        });
    }

    group.finish();
}

/// Benchmark block parsing.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    for groups in [1, 10, 100].iter() {
        let text = sowdoc::clean(&create_section_text(*groups));
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("groups", groups), &text, |b, text| {
            b.iter(|| sowdoc::parse(black_box(text)));
        });
    }

    group.finish();
}

/// Benchmark rendering an assembled document.
fn bench_rendering(c: &mut Criterion) {
    let config = ProposalConfig::new("Intelegencia", "Acme", "Marketplace Growth");
    let options = RenderOptions::default();

    let mut group = c.benchmark_group("rendering");

    for sections in [1, 12, 50].iter() {
        let document = sowdoc::assemble(&config, &create_sections(*sections, 5));

        group.bench_with_input(BenchmarkId::new("markdown", sections), &document, |b, doc| {
            b.iter(|| sowdoc::render_markdown(black_box(doc), &options));
        });
        group.bench_with_input(BenchmarkId::new("docx", sections), &document, |b, doc| {
            b.iter(|| sowdoc::render_docx(black_box(doc), &options));
        });
    }

    group.finish();
}

/// Benchmark the full export.
fn bench_full_export(c: &mut Criterion) {
    let config = ProposalConfig::new("Intelegencia", "Acme", "Marketplace Growth");
    let sections = create_sections(12, 5);

    c.bench_function("export_docx_12_sections", |b| {
        b.iter(|| sowdoc::assemble_and_render_docx(black_box(&config), black_box(&sections)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_cleanup,
    bench_parsing,
    bench_rendering,
    bench_full_export,
);
criterion_main!(benches);
