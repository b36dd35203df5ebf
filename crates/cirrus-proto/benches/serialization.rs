//! DNS message serialization benchmarks.

use cirrus_proto::name::Name;
use cirrus_proto::wire::WireWriter;
use cirrus_proto::{Message, Question};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::str::FromStr;

fn name_serialization(c: &mut Criterion) {
    let name = Name::from_str("app-analytics-services.com.").unwrap();

    c.bench_function("name_write_wire", |b| {
        b.iter(|| {
            let mut writer = WireWriter::new(64);
            name.write_wire(&mut writer).unwrap();
            black_box(writer.freeze())
        });
    });
}

fn message_serialization(c: &mut Criterion) {
    let query = Message::query(Question::a(Name::from_str("example.com.").unwrap()));

    c.bench_function("message_to_wire_query", |b| {
        b.iter(|| black_box(query.to_wire().unwrap()));
    });
}

criterion_group!(benches, name_serialization, message_serialization);
criterion_main!(benches);
