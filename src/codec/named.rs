//! Named types: enums, models and tagged unions.
//!
//! An enum is written as the uvarint value of its member. A model is written
//! as its own schema. A union is written as the uvarint tag of the variant
//! followed by the variant itself.

use bytes::{Buf, BufMut};

use super::Codec;
use crate::error::{DecodeErrorKind, EncodeErrorKind, Error, Result};
use crate::leb128::LebCodec;
use crate::registry::{EnumDef, ModelDef, NamedDef, UnionDef};
use crate::schema::TypeNode;
use crate::value::{AliasValue, EnumValue, Value};

impl<'r> Codec<'r> {
    pub(super) fn encode_named<B: BufMut>(
        &self,
        name: &str,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        let depth = self.enter_encode(depth)?;
        match self.resolve(name)? {
            NamedDef::Enum(def) => encode_enum(def, value, buf),
            NamedDef::Model(def) => self.encode_model(def, value, buf, depth),
            NamedDef::Union(def) => self.encode_union(def, value, buf, depth),
        }
    }

    pub(super) fn decode_named<B: Buf>(
        &self,
        name: &str,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        let depth = self.enter_decode(depth)?;
        match self.resolve(name)? {
            NamedDef::Enum(def) => decode_enum(def, buf),
            NamedDef::Model(def) => self.decode_model(def, buf, depth),
            NamedDef::Union(def) => self.decode_union(def, buf, depth),
        }
    }

    fn encode_model<B: BufMut>(
        &self,
        def: &ModelDef,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        match value {
            Value::Alias(alias) if alias.type_name() == def.name() => {
                self.encode_node(def.ast(), alias.value(), buf, depth)
            }
            value => self.encode_node(def.ast(), value, buf, depth),
        }
    }

    /// Struct models decode into a fresh instance of the model, anything
    /// else decodes into an [`AliasValue`] carrying the model name.
    fn decode_model<B: Buf>(&self, def: &ModelDef, buf: &mut B, depth: usize) -> Result<Value> {
        match def.ast() {
            TypeNode::Struct(fields) => {
                let mut instance = def.instantiate();
                self.decode_fields(fields, buf, depth, &mut instance)?;
                Ok(Value::Record(instance))
            }
            ast => {
                let value = self.decode_node(ast, buf, depth)?;
                Ok(Value::Alias(AliasValue::new(def.name(), value)))
            }
        }
    }

    pub(super) fn encode_union<B: BufMut>(
        &self,
        def: &UnionDef,
        member: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        let Some((tag, variant)) = member
            .type_name()
            .and_then(|name| def.tag_of(name).map(|tag| (tag, name)))
        else {
            return Err(EncodeErrorKind::NotUnionMember {
                union: def.name().into(),
                member: member.type_name().unwrap_or("<untyped>").into(),
            }
            .into());
        };

        tag.encode_leb128(buf);
        self.encode_named(variant, member, buf, depth)
    }

    pub(super) fn decode_union<B: Buf>(
        &self,
        def: &UnionDef,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        let tag = u64::decode_leb128_buf(buf)?;
        let Some(variant) = def.variant_name(tag) else {
            return Err(DecodeErrorKind::UnknownUnionTag {
                union: def.name().into(),
                tag,
            }
            .into());
        };

        tracing::debug!(union_name = def.name(), tag, variant, "decoding union variant");
        self.decode_named(variant, buf, depth)
    }
}

fn encode_enum<B: BufMut>(def: &EnumDef, value: &Value, buf: &mut B) -> Result<()> {
    let Value::Enum(member) = value else {
        return Err(Error::type_mismatch("enum", value.describe()));
    };
    if member.type_name() != def.name() || !def.contains(member.value()) {
        return Err(EncodeErrorKind::UnknownEnumValue {
            name: def.name().into(),
            value: member.value(),
        }
        .into());
    }
    member.value().encode_leb128(buf);
    Ok(())
}

fn decode_enum<B: Buf>(def: &EnumDef, buf: &mut B) -> Result<Value> {
    let value = u64::decode_leb128_buf(buf)?;
    if !def.contains(value) {
        return Err(DecodeErrorKind::UnknownEnumValue {
            name: def.name().into(),
            value,
        }
        .into());
    }
    Ok(Value::Enum(EnumValue::new(def.name(), value)))
}
