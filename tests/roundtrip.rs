//! Round trip tests over generated schemas and values.

use std::collections::BTreeSet;

use bare_codec::{
    AliasValue, Codec, EnumDef, EnumValue, ModelDef, Record, Registry, TypeNode, UnionDef, Value,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn integer_leaf() -> impl Strategy<Value = (TypeNode, Value)> {
    prop_oneof![
        any::<u8>().prop_map(|v| (TypeNode::u8(), Value::U8(v))),
        any::<u16>().prop_map(|v| (TypeNode::u16(), Value::U16(v))),
        any::<u32>().prop_map(|v| (TypeNode::u32(), Value::U32(v))),
        any::<u64>().prop_map(|v| (TypeNode::u64(), Value::U64(v))),
        any::<u64>().prop_map(|v| (TypeNode::uint(), Value::UInt(v))),
        any::<i8>().prop_map(|v| (TypeNode::i8(), Value::I8(v))),
        any::<i16>().prop_map(|v| (TypeNode::i16(), Value::I16(v))),
        any::<i32>().prop_map(|v| (TypeNode::i32(), Value::I32(v))),
        any::<i64>().prop_map(|v| (TypeNode::i64(), Value::I64(v))),
        any::<i64>().prop_map(|v| (TypeNode::int(), Value::Int(v))),
    ]
}

fn other_leaf() -> impl Strategy<Value = (TypeNode, Value)> {
    prop_oneof![
        (-1.0e6f32..1.0e6f32).prop_map(|v| (TypeNode::f32(), Value::F32(v))),
        (-1.0e12f64..1.0e12f64).prop_map(|v| (TypeNode::f64(), Value::F64(v))),
        any::<bool>().prop_map(|v| (TypeNode::bool(), Value::Bool(v))),
        any::<String>().prop_map(|v| (TypeNode::string(), Value::String(v))),
        vec(any::<u8>(), 0..32).prop_map(|v| (TypeNode::data(), Value::Data(v))),
        vec(any::<u8>(), 0..8).prop_map(|v| (TypeNode::data_fixed(v.len()), Value::Data(v))),
    ]
}

/// Named types the generated schemas may refer to.
fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            EnumDef::new("Suit")
                .member("Clubs")
                .member("Diamonds")
                .member("Hearts")
                .member_with_value("Spades", 300),
        )
        .register(ModelDef::new(
            "Point",
            TypeNode::structure([("x", TypeNode::i32()), ("y", TypeNode::int())]),
        ))
        .register(ModelDef::new("Id", TypeNode::uint()))
        .register(
            UnionDef::new("Item")
                .variant("Point")
                .and_then(|def| def.variant_with_tag("Suit", 5))
                .and_then(|def| def.variant("Id"))
                .unwrap(),
        );
    registry
}

/// Instances of the named types in [`registry`], without the union.
fn member_value() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        prop::sample::select(vec![0u64, 1, 2, 300])
            .prop_map(|v| ("Suit", Value::Enum(EnumValue::new("Suit", v)))),
        (any::<i32>(), any::<i64>()).prop_map(|(x, y)| {
            let point = Record::new("Point").with("x", Value::I32(x)).with("y", Value::Int(y));
            ("Point", Value::Record(point))
        }),
        any::<u64>().prop_map(|v| ("Id", Value::Alias(AliasValue::new("Id", Value::UInt(v))))),
    ]
}

fn named_leaf() -> impl Strategy<Value = (TypeNode, Value)> {
    (member_value(), any::<bool>()).prop_map(|((name, value), through_union)| {
        let name = if through_union { "Item" } else { name };
        (TypeNode::named(name), value)
    })
}

/// A schema paired with a value that is valid under it.
fn typed_value() -> impl Strategy<Value = (TypeNode, Value)> {
    let leaf = prop_oneof![integer_leaf(), other_leaf(), named_leaf()];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(|members| {
                let mut fields = Vec::with_capacity(members.len());
                let mut record = Record::untyped();
                for (idx, (ty, value)) in members.into_iter().enumerate() {
                    let name = format!("f{idx}");
                    record = record.with(&name, value);
                    fields.push((name, ty));
                }
                (TypeNode::structure(fields), Value::Record(record))
            }),
            (inner.clone(), 0..4usize).prop_map(|((ty, value), count)| {
                (TypeNode::array(ty), Value::Array(vec![value; count]))
            }),
            (inner.clone(), 0..4usize).prop_map(|((ty, value), count)| {
                (TypeNode::fixed_array(ty, count), Value::Array(vec![value; count]))
            }),
            (inner.clone(), any::<bool>()).prop_map(|((ty, value), present)| {
                let value = if present { value } else { Value::None };
                (TypeNode::optional(ty), value)
            }),
            (vec("[a-z]{0,4}", 0..4), inner).prop_map(|(keys, (ty, value))| {
                // Duplicate keys collapse on decode.
                let keys: BTreeSet<String> = keys.into_iter().collect();
                let entries = keys
                    .into_iter()
                    .map(|key| (Value::String(key), value.clone()))
                    .collect();
                (TypeNode::map(TypeNode::string(), ty), Value::Map(entries))
            }),
        ]
    })
}

proptest! {
    #[test]
    fn proptest_roundtrip((ty, value) in typed_value()) {
        let registry = registry();
        let codec = Codec::new(&registry);

        let bytes = codec.pack_value(&ty, &value).unwrap();
        let (decoded, offset) = codec.decode(&ty, &bytes, 0).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(offset, bytes.len());
    }

    #[test]
    fn proptest_roundtrip_at_offset(
        (ty, value) in typed_value(),
        prefix in vec(any::<u8>(), 0..8),
    ) {
        let registry = registry();
        let codec = Codec::new(&registry);

        let mut bytes = prefix.clone();
        codec.encode(&ty, &value, &mut bytes).unwrap();
        let (decoded, offset) = codec.decode(&ty, &bytes, prefix.len()).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(offset, bytes.len());
    }

    #[test]
    fn proptest_truncated_input_fails((ty, value) in typed_value()) {
        let registry = registry();
        let codec = Codec::new(&registry);

        let bytes = codec.pack_value(&ty, &value).unwrap();
        if let Some((_, truncated)) = bytes.split_last() {
            prop_assert!(codec.decode(&ty, truncated, 0).is_err());
        }
    }
}
