//! Benchmarks for the resume rendering pipeline.
//!
//! Run with: cargo bench

use std::io::Cursor;

use criterion::{Criterion, criterion_group, criterion_main};

use vita::{
    BuildContext, DocxExporter, Exporter, PdfConfig, PdfExporter, ProfileUrlTable, Resume,
    StyleRegistry, build_blocks,
};

const RESUME_JSON: &str = include_str!("../tests/fixtures/resume.json");

fn bench_parse_resume(c: &mut Criterion) {
    c.bench_function("parse_resume", |b| {
        b.iter(|| Resume::from_json_str(RESUME_JSON).unwrap());
    });
}

fn bench_build_blocks(c: &mut Criterion) {
    let resume = Resume::from_json_str(RESUME_JSON).unwrap();
    let styles = StyleRegistry::builtin();
    let profiles = ProfileUrlTable::builtin();
    let ctx = BuildContext {
        style: styles.resolve("professional").unwrap(),
        profiles: &profiles,
    };

    c.bench_function("build_blocks", |b| {
        b.iter(|| build_blocks(&resume, &ctx).unwrap());
    });
}

fn bench_write_pdf(c: &mut Criterion) {
    let resume = Resume::from_json_str(RESUME_JSON).unwrap();
    let styles = StyleRegistry::builtin();
    let profiles = ProfileUrlTable::builtin();
    let style = styles.resolve("modern").unwrap();
    let blocks = build_blocks(&resume, &BuildContext { style, profiles: &profiles }).unwrap();
    let exporter = PdfExporter::new().with_config(PdfConfig {
        system_fonts: false,
        ..PdfConfig::default()
    });

    c.bench_function("write_pdf", |b| {
        b.iter(|| {
            let mut output = Cursor::new(Vec::new());
            exporter.export(&blocks, style, &mut output).unwrap();
        });
    });
}

fn bench_write_docx(c: &mut Criterion) {
    let resume = Resume::from_json_str(RESUME_JSON).unwrap();
    let styles = StyleRegistry::builtin();
    let profiles = ProfileUrlTable::builtin();
    let style = styles.resolve("modern").unwrap();
    let blocks = build_blocks(&resume, &BuildContext { style, profiles: &profiles }).unwrap();

    c.bench_function("write_docx", |b| {
        b.iter(|| {
            let mut output = Cursor::new(Vec::new());
            DocxExporter::new().export(&blocks, style, &mut output).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_parse_resume,
    bench_build_blocks,
    bench_write_pdf,
    bench_write_docx,
);
criterion_main!(benches);
