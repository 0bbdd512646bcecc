use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use toon_codec::{decode_default, encode_default, Map, Value};

fn sample_document(rows: usize) -> Value {
    let mut root = Map::new();
    root.insert("version".to_string(), Value::Number(3.0));
    root.insert(
        "tags".to_string(),
        Value::Array(vec![
            Value::String("alpha".to_string()),
            Value::String("beta".to_string()),
            Value::String("gamma".to_string()),
        ]),
    );

    let mut records = Vec::with_capacity(rows);
    for index in 0..rows {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::Number(index as f64));
        record.insert("name".to_string(), Value::String(format!("user-{index}")));
        record.insert("score".to_string(), Value::Number(index as f64 * 0.25));
        record.insert("active".to_string(), Value::Bool(index % 2 == 0));
        records.push(Value::Object(record));
    }
    root.insert("records".to_string(), Value::Array(records));
    Value::Object(root)
}

fn bench_encode(c: &mut Criterion) {
    let value = sample_document(1000);
    let encoded = encode_default(&value);

    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("tabular_1000_rows", |b| {
        b.iter(|| encode_default(black_box(&value)))
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let value = sample_document(1000);
    let encoded = encode_default(&value);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("tabular_1000_rows", |b| {
        b.iter(|| decode_default(black_box(&encoded)))
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
