//! DNS message parsing benchmarks.

use cirrus_proto::name::{Name, NameParser};
use cirrus_proto::{Message, Question};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::str::FromStr;

const GOOGLE_COM_WIRE: [u8; 12] = [
    0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00,
];

const APP_ANALYTICS_WIRE: [u8; 28] = [
    0x16, 0x61, 0x70, 0x70, 0x2d, 0x61, 0x6e, 0x61, 0x6c, 0x79, 0x74, 0x69, 0x63, 0x73, 0x2d,
    0x73, 0x65, 0x72, 0x76, 0x69, 0x63, 0x65, 0x73, 0x03, 0x63, 0x6f, 0x6d, 0x00,
];

fn name_parsing(c: &mut Criterion) {
    c.bench_function("name_wire_google_com", |b| {
        let parser = NameParser::new(&GOOGLE_COM_WIRE);
        b.iter(|| black_box(parser.parse_name(0).unwrap()));
    });

    c.bench_function("name_wire_app_analytics_services_com", |b| {
        let parser = NameParser::new(&APP_ANALYTICS_WIRE);
        b.iter(|| black_box(parser.parse_name(0).unwrap()));
    });

    c.bench_function("name_text_google_com", |b| {
        b.iter(|| black_box(Name::from_str("google.com").unwrap()));
    });
}

fn message_parsing(c: &mut Criterion) {
    let query = Message::query(Question::a(Name::from_str("example.com.").unwrap()));
    let wire = query.to_wire().unwrap();

    c.bench_function("message_parse_query", |b| {
        b.iter(|| black_box(Message::parse(&wire).unwrap()));
    });
}

criterion_group!(benches, name_parsing, message_parsing);
criterion_main!(benches);
