use criterion::{Criterion, criterion_group, criterion_main};
use hmd_hid_common::{ReportBuilder, ReportParser};

fn benchmark_report_parser(c: &mut Criterion) {
    let data = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x10];

    c.bench_function("ReportParser read_u8", |b| {
        b.iter(|| {
            let mut parser = ReportParser::new(std::hint::black_box(&data));
            for _ in 0..10 {
                std::hint::black_box(parser.read_u8().ok());
            }
        });
    });

    c.bench_function("ReportParser read_u16_le", |b| {
        b.iter(|| {
            let mut parser = ReportParser::new(std::hint::black_box(&data));
            for _ in 0..5 {
                std::hint::black_box(parser.read_u16_le().ok());
            }
        });
    });
}

fn benchmark_report_builder(c: &mut Criterion) {
    c.bench_function("ReportBuilder sensor config", |b| {
        b.iter(|| {
            let mut builder = ReportBuilder::with_capacity(7);
            builder
                .write_u8(0x02)
                .write_u16_le(0)
                .write_u8(0x40)
                .write_u8(1)
                .write_u16_le(1000);
            std::hint::black_box(builder.into_inner())
        });
    });
}

criterion_group!(benches, benchmark_report_parser, benchmark_report_builder);
criterion_main!(benches);
