//! Benchmark packing and unpacking a model with a variable number of nested records.

use bare_codec::{Codec, ModelDef, Record, Registry, TypeNode, UnionDef, Value};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(ModelDef::new(
            "PhoneNumber",
            TypeNode::structure([("number", TypeNode::string()), ("phone_type", TypeNode::int())]),
        ))
        .register(ModelDef::new(
            "Person",
            TypeNode::structure([
                ("name", TypeNode::string()),
                ("id", TypeNode::i32()),
                ("email", TypeNode::optional(TypeNode::string())),
                ("phones", TypeNode::array(TypeNode::named("PhoneNumber"))),
                ("labels", TypeNode::map(TypeNode::string(), TypeNode::u32())),
            ]),
        ))
        .register(
            UnionDef::new("Contact")
                .variant("Person")
                .and_then(|def| def.variant("PhoneNumber"))
                .unwrap(),
        );
    registry
}

fn create_person(num_phones: usize) -> Record {
    let phones = (0..num_phones)
        .map(|i| {
            Record::new("PhoneNumber")
                .with("number", format!("555-{i:04}"))
                .with("phone_type", Value::Int(i64::try_from(i % 3).unwrap()))
                .into()
        })
        .collect();
    let labels = (0..num_phones.min(8))
        .map(|i| (Value::String(format!("label-{i}")), Value::U32(u32::try_from(i).unwrap())))
        .collect();

    Record::new("Person")
        .with("name", "Alice Johnson")
        .with("id", Value::I32(12345))
        .with("email", Some("alice.johnson@example.com"))
        .with("phones", Value::Array(phones))
        .with("labels", Value::Map(labels))
}

fn encode_benchmark(c: &mut Criterion) {
    let registry = registry();
    let codec = Codec::new(&registry);

    let mut group = c.benchmark_group("encode");
    for num_phones in [0, 1, 10, 100] {
        let person = create_person(num_phones);
        let encoded_size = codec.pack(&person).unwrap().len();
        group.throughput(Throughput::Bytes(u64::try_from(encoded_size).unwrap()));

        group.bench_with_input(BenchmarkId::new("pack", num_phones), &person, |b, person| {
            b.iter(|| std::hint::black_box(codec.pack(person).unwrap()))
        });

        let member = Value::Record(person.clone());
        group.bench_with_input(
            BenchmarkId::new("pack_union", num_phones),
            &member,
            |b, member| b.iter(|| std::hint::black_box(codec.pack_union("Contact", member).unwrap())),
        );
    }
    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let registry = registry();
    let codec = Codec::new(&registry);

    let mut group = c.benchmark_group("decode");
    for num_phones in [0, 1, 10, 100] {
        let encoded = codec.pack(&create_person(num_phones)).unwrap();
        group.throughput(Throughput::Bytes(u64::try_from(encoded.len()).unwrap()));

        group.bench_with_input(BenchmarkId::new("unpack", num_phones), &encoded, |b, data| {
            b.iter(|| std::hint::black_box(codec.unpack("Person", data, 0).unwrap()))
        });

        group.bench_with_input(
            BenchmarkId::new("unpack_into", num_phones),
            &encoded,
            |b, data| {
                b.iter(|| {
                    let mut person = Record::new("Person");
                    codec.unpack_into(&mut person, data, 0).unwrap();
                    std::hint::black_box(person)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, encode_benchmark, decode_benchmark);
criterion_main!(benches);
