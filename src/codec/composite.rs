//! Structs, arrays, maps and optionals.
//!
//! # Wire Format
//!
//! ```text
//! struct:          <field 0><field 1>...        (declaration order, no framing)
//! array<T>:        <uvarint count><T>*count
//! array<T, N>:     <T>*N
//! map<K, V>:       <uvarint count>(<K><V>)*count
//! optional<T>:     <bool>[<T>]
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use bytes::{Buf, BufMut};

use super::Codec;
use crate::error::{Error, Result, SchemaMismatch};
use crate::schema::TypeNode;
use crate::value::{FieldAccess, Value};
use crate::wire;

impl<'r> Codec<'r> {
    pub(super) fn encode_struct<B: BufMut>(
        &self,
        fields: &[(String, TypeNode)],
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        match value {
            // Attribute access.
            Value::Record(record) => {
                self.encode_fields(fields, |name| record.get_field(name), buf, depth)
            }
            // Key access.
            Value::Map(entries) => {
                let lookup = |name: &str| {
                    entries
                        .iter()
                        .find(|(key, _)| matches!(key, Value::String(key) if key == name))
                        .map(|(_, value)| value)
                };
                self.encode_fields(fields, lookup, buf, depth)
            }
            other => Err(Error::type_mismatch("struct", other.describe())),
        }
    }

    /// Encode every field of a struct in declaration order, fetching each
    /// value through `lookup`.
    pub(super) fn encode_fields<'v, B, F>(
        &self,
        fields: &[(String, TypeNode)],
        lookup: F,
        buf: &mut B,
        depth: usize,
    ) -> Result<()>
    where
        B: BufMut,
        F: Fn(&str) -> Option<&'v Value>,
    {
        for (name, ty) in fields {
            let value = lookup(name.as_str()).ok_or_else(|| SchemaMismatch::MissingField {
                field: name.clone(),
            })?;
            self.encode_node(ty, value, buf, depth)?;
        }
        Ok(())
    }

    pub(super) fn encode_array<B: BufMut>(
        &self,
        subtype: &TypeNode,
        length: Option<usize>,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        let Value::Array(items) = value else {
            return Err(Error::type_mismatch("array", value.describe()));
        };

        match length {
            // The count is part of the schema, not the wire.
            Some(expected) if items.len() != expected => {
                return Err(Error::length_mismatch(expected, items.len()));
            }
            Some(_) => (),
            None => {
                self.check_encode_len(items.len())?;
                wire::encode_len(items.len(), buf);
            }
        }

        for item in items {
            self.encode_node(subtype, item, buf, depth)?;
        }
        Ok(())
    }

    pub(super) fn decode_array<B: Buf>(
        &self,
        subtype: &TypeNode,
        length: Option<usize>,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        let count = match length {
            Some(count) => count,
            None => self.decode_len(buf)?,
        };

        // Preallocation is bounded by the input left, not the declared count.
        let mut items = Vec::with_capacity(count.min(buf.remaining()));
        for _ in 0..count {
            items.push(self.decode_node(subtype, buf, depth)?);
        }
        Ok(Value::Array(items))
    }

    pub(super) fn encode_map<B: BufMut>(
        &self,
        key_ty: &TypeNode,
        value_ty: &TypeNode,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        let Value::Map(entries) = value else {
            return Err(Error::type_mismatch("map", value.describe()));
        };

        self.check_encode_len(entries.len())?;
        wire::encode_len(entries.len(), buf);
        for (key, value) in entries {
            self.encode_node(key_ty, key, buf, depth)?;
            self.encode_node(value_ty, value, buf, depth)?;
        }
        Ok(())
    }

    /// Decodes a map. A key seen twice keeps its first position and takes the
    /// later value.
    pub(super) fn decode_map<B: Buf>(
        &self,
        key_ty: &TypeNode,
        value_ty: &TypeNode,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        let count = self.decode_len(buf)?;
        let capacity = count.min(buf.remaining());
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(capacity);

        // Keys are indexed by their canonical encoding. Values are not `Hash`,
        // and two keys are equal exactly when they encode identically.
        let mut index: HashMap<Vec<u8>, usize> = HashMap::with_capacity(capacity);
        let mut canonical = Vec::new();

        for _ in 0..count {
            let key = self.decode_node(key_ty, buf, depth)?;
            let value = self.decode_node(value_ty, buf, depth)?;

            canonical.clear();
            self.encode_node(key_ty, &key, &mut canonical, depth)?;
            match index.entry(canonical.clone()) {
                Entry::Occupied(slot) => {
                    tracing::debug!(index = *slot.get(), "duplicate map key, keeping later value");
                    entries[*slot.get()].1 = value;
                }
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push((key, value));
                }
            }
        }
        Ok(Value::Map(entries))
    }

    pub(super) fn encode_optional<B: BufMut>(
        &self,
        subtype: &TypeNode,
        value: &Value,
        buf: &mut B,
        depth: usize,
    ) -> Result<()> {
        if value.is_none() {
            wire::encode_bool(false, buf);
            return Ok(());
        }
        wire::encode_bool(true, buf);
        self.encode_node(subtype, value, buf, depth)
    }

    pub(super) fn decode_optional<B: Buf>(
        &self,
        subtype: &TypeNode,
        buf: &mut B,
        depth: usize,
    ) -> Result<Value> {
        if wire::decode_bool(buf)? {
            self.decode_node(subtype, buf, depth)
        } else {
            Ok(Value::None)
        }
    }
}
