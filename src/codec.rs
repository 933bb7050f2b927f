//! Schema driven encoding and decoding.
//!
//! The [`Codec`] walks a [`TypeNode`] tree alongside a [`Value`] tree,
//! depth-first and left to right: struct fields in declaration order, array
//! elements in sequence, map entries in insertion order. Decoding mirrors the
//! walk exactly, so decoding consumes precisely the bytes encoding produced.
//!
//! No state survives a call. A [`Codec`] only borrows an immutable
//! [`Registry`] and can be shared freely between threads.

mod composite;
mod named;
mod primitive;

use bytes::{Buf, BufMut};

use crate::error::{DecodeErrorKind, EncodeErrorKind, Error, Result, SchemaMismatch};
use crate::registry::{ModelDef, NamedDef, Registry};
use crate::schema::TypeNode;
use crate::util::{unlikely, CastFrom};
use crate::value::{FieldAccess, Record, Value};

/// Default bound on how deeply types may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits applied by a [`Codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting depth of encode and decode recursion. Every type node
    /// and every resolution of a named type counts one level.
    pub(crate) max_depth: usize,
    /// Maximum length prefix or element count.
    pub(crate) max_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_len: None,
        }
    }
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound how deeply types may nest, protecting the stack from hostile input.
    ///
    /// Each struct, array, map, optional and primitive node is one level, as
    /// is each named type (enum, model or union) it resolves through. A named
    /// struct model is therefore two levels: the name and its struct.
    pub fn max_depth(&mut self, depth: usize) -> &mut Self {
        self.max_depth = depth;
        self
    }

    /// Bound the length of any string, data, array or map.
    pub fn max_len(&mut self, len: usize) -> &mut Self {
        self.max_len = Some(len);
        self
    }
}

/// Packs and unpacks [`Value`]s against [`TypeNode`]s, resolving named
/// types in a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Codec<'r> {
    registry: &'r Registry,
    config: Config,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_config(registry, Config::default())
    }

    pub fn with_config(registry: &'r Registry, config: Config) -> Self {
        Codec { registry, config }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encode `value` as an instance of `ty`, appending to `buf`.
    ///
    /// On error `buf` may hold a partial encoding and must be discarded.
    pub fn encode<B: BufMut>(&self, ty: &TypeNode, value: &Value, buf: &mut B) -> Result<()> {
        self.encode_node(ty, value, buf, 0)
    }

    /// Decode one instance of `ty` starting at `offset`, returning the value
    /// and the offset just past it.
    pub fn decode(&self, ty: &TypeNode, bytes: &[u8], offset: usize) -> Result<(Value, usize)> {
        let mut buf = slice_at(bytes, offset)?;
        let value = self.decode_node(ty, &mut buf, 0)?;
        Ok((value, bytes.len() - buf.len()))
    }

    /// Decode one instance of `ty` from the front of `buf`, advancing it.
    pub fn decode_buf<B: Buf>(&self, ty: &TypeNode, buf: &mut B) -> Result<Value> {
        self.decode_node(ty, buf, 0)
    }

    /// Encode `value` as an instance of `ty` into a new buffer.
    pub fn pack_value(&self, ty: &TypeNode, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(ty, value, &mut buf)?;
        Ok(buf)
    }

    /// Encode a model instance using the schema registered for its type.
    pub fn pack(&self, instance: &Record) -> Result<Vec<u8>> {
        let name = instance
            .type_name()
            .ok_or_else(|| Error::type_mismatch("model instance", "untyped record"))?;
        let def = self.model(name)?;
        let TypeNode::Struct(fields) = def.ast() else {
            return Err(Error::type_mismatch("struct model", def.ast().describe()));
        };

        let mut buf = Vec::new();
        self.encode_fields(fields, |field| instance.get_field(field), &mut buf, 1)?;
        tracing::trace!(model = name, len = buf.len(), "packed instance");
        Ok(buf)
    }

    /// Encode `member` as an entry of the union `union_name`: its variant tag
    /// followed by the member itself.
    pub fn pack_union(&self, union_name: &str, member: &Value) -> Result<Vec<u8>> {
        let def = match self.resolve(union_name)? {
            NamedDef::Union(def) => def,
            _ => {
                return Err(EncodeErrorKind::NotAUnion {
                    name: union_name.into(),
                }
                .into())
            }
        };

        let mut buf = Vec::new();
        self.encode_union(def, member, &mut buf, 0)?;
        tracing::trace!(union_name, len = buf.len(), "packed union member");
        Ok(buf)
    }

    /// Decode one instance of the enum, model or union named `type_name`,
    /// starting at `offset`.
    ///
    /// Unions are detected through the registry, their tag is read first.
    pub fn unpack(&self, type_name: &str, bytes: &[u8], offset: usize) -> Result<(Value, usize)> {
        let mut buf = slice_at(bytes, offset)?;
        let value = self.decode_named(type_name, &mut buf, 0)?;
        let new_offset = bytes.len() - buf.len();
        tracing::trace!(type_name, offset, new_offset, "unpacked");
        Ok((value, new_offset))
    }

    /// Like [`Codec::unpack`] but requires `union_name` to name a union.
    pub fn unpack_union(
        &self,
        union_name: &str,
        bytes: &[u8],
        offset: usize,
    ) -> Result<(Value, usize)> {
        let def = match self.resolve(union_name)? {
            NamedDef::Union(def) => def,
            _ => return Err(Error::lookup(union_name)),
        };

        let mut buf = slice_at(bytes, offset)?;
        let value = self.decode_union(def, &mut buf, 0)?;
        let new_offset = bytes.len() - buf.len();
        tracing::trace!(union_name, offset, new_offset, "unpacked union");
        Ok((value, new_offset))
    }

    /// Decode into an existing model instance, returning the new offset.
    ///
    /// Fields are set on `instance` in declaration order. On error
    /// `instance` may be partially updated.
    pub fn unpack_into(&self, instance: &mut Record, bytes: &[u8], offset: usize) -> Result<usize> {
        let name = instance
            .type_name()
            .ok_or_else(|| Error::type_mismatch("model instance", "untyped record"))?;
        let def = self.model(name)?;
        let TypeNode::Struct(fields) = def.ast() else {
            return Err(Error::type_mismatch("struct model", def.ast().describe()));
        };

        let mut buf = slice_at(bytes, offset)?;
        self.decode_fields(fields, &mut buf, 1, instance)?;
        Ok(bytes.len() - buf.len())
    }

    pub(crate) fn encode_node<B: BufMut>(
        &self,
        ty: &TypeNode,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        // A named reference takes its level when it is resolved.
        let depth = match ty {
            TypeNode::Named(_) => depth,
            _ => self.enter_encode(depth)?,
        };
        match ty {
            TypeNode::Named(name) => self.encode_named(name, value, buf, depth),
            TypeNode::Optional(subtype) => self.encode_optional(subtype, value, buf, depth),
            _ if value.is_none() => Err(SchemaMismatch::UnexpectedNone.into()),
            TypeNode::Primitive(kind) => self.encode_primitive(*kind, value, buf),
            TypeNode::Struct(fields) => self.encode_struct(fields, value, buf, depth),
            TypeNode::Array { subtype, length } => {
                self.encode_array(subtype, *length, value, buf, depth)
            }
            TypeNode::Map { key, value: value_ty } => {
                self.encode_map(key, value_ty, value, buf, depth)
            }
        }
    }

    pub(crate) fn decode_node<B: Buf>(
        &self,
        ty: &TypeNode,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        let depth = match ty {
            TypeNode::Named(_) => depth,
            _ => self.enter_decode(depth)?,
        };
        match ty {
            TypeNode::Named(name) => self.decode_named(name, buf, depth),
            TypeNode::Optional(subtype) => self.decode_optional(subtype, buf, depth),
            TypeNode::Primitive(kind) => self.decode_primitive(*kind, buf),
            TypeNode::Struct(fields) => {
                let mut record = Record::untyped();
                self.decode_fields(fields, buf, depth, &mut record)?;
                Ok(Value::Record(record))
            }
            TypeNode::Array { subtype, length } => self.decode_array(subtype, *length, buf, depth),
            TypeNode::Map { key, value } => self.decode_map(key, value, buf, depth),
        }
    }

    /// Decode struct fields in declaration order into `target`.
    pub(crate) fn decode_fields<B: Buf, T: FieldAccess + ?Sized>(
        &self,
        fields: &[(String, TypeNode)],
        buf: &mut B,
        depth: usize,
        target: &mut T,
    ) -> Result<()> {
        for (name, ty) in fields {
            let value = self.decode_node(ty, buf, depth)?;
            target.set_field(name, value);
        }
        Ok(())
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<&'r NamedDef> {
        self.registry.get(name).ok_or_else(|| Error::lookup(name))
    }

    fn model(&self, name: &str) -> Result<&'r ModelDef> {
        match self.resolve(name)? {
            NamedDef::Model(def) => Ok(def),
            NamedDef::Enum(_) => Err(Error::type_mismatch("model", "enum")),
            NamedDef::Union(_) => Err(Error::type_mismatch("model", "union")),
        }
    }

    #[inline]
    fn enter_encode(&self, depth: usize) -> Result<usize> {
        if unlikely(depth >= self.config.max_depth) {
            return Err(EncodeErrorKind::DepthLimitExceeded {
                limit: self.config.max_depth,
            }
            .into());
        }
        Ok(depth + 1)
    }

    #[inline]
    fn enter_decode(&self, depth: usize) -> Result<usize> {
        if unlikely(depth >= self.config.max_depth) {
            return Err(DecodeErrorKind::DepthLimitExceeded {
                limit: self.config.max_depth,
            }
            .into());
        }
        Ok(depth + 1)
    }

    /// Checks a length about to be written against the configured limit.
    #[inline]
    fn check_encode_len(&self, len: usize) -> Result<()> {
        match self.config.max_len {
            Some(limit) if unlikely(len > limit) => {
                Err(EncodeErrorKind::LengthLimitExceeded { len, limit }.into())
            }
            _ => Ok(()),
        }
    }

    /// Decodes a length prefix and checks it against the configured limit.
    #[inline]
    fn decode_len<B: Buf>(&self, buf: &mut B) -> Result<usize> {
        let len = crate::wire::decode_len(buf)?;
        match self.config.max_len {
            Some(limit) if unlikely(len > limit) => Err(DecodeErrorKind::LengthLimitExceeded {
                len: u64::cast_from(len),
                limit,
            }
            .into()),
            _ => Ok(len),
        }
    }
}

/// The bytes of `bytes` from `offset` onwards.
fn slice_at(bytes: &[u8], offset: usize) -> Result<&[u8]> {
    bytes.get(offset..).ok_or_else(|| {
        DecodeErrorKind::OffsetOutOfBounds {
            offset,
            len: bytes.len(),
        }
        .into()
    })
}
