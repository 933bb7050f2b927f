//! Primitive BARE types and their encoding/decoding implementations.
//!
//! Fixed width integers and floats are little-endian. `uint` is an unsigned
//! varint, `int` a zigzag mapped varint. `str` and `data` carry a varint byte
//! length, `data<n>` is exactly `n` raw bytes.

use bytes::{Buf, BufMut};

use super::Codec;
use crate::error::{DecodeErrorKind, Error, Result, SchemaMismatch};
use crate::leb128::{zigzag_decode, zigzag_encode, LebCodec};
use crate::schema::PrimitiveKind;
use crate::value::Value;
use crate::wire;

/// Reads a fixed width value after checking enough bytes remain.
macro_rules! get_fixed {
    ($buf:expr, $ty:ty, $get:ident) => {{
        wire::ensure_remaining($buf, core::mem::size_of::<$ty>())?;
        $buf.$get()
    }};
}

/// Converts any integer valued [`Value`] into `T`, failing if it does not fit.
fn integer<T: TryFrom<i128>>(kind: PrimitiveKind, value: &Value) -> Result<T> {
    let n = value
        .as_integer()
        .ok_or_else(|| Error::type_mismatch(kind.name(), value.describe()))?;
    T::try_from(n).map_err(|_| {
        SchemaMismatch::OutOfRange {
            target_type: kind.name(),
        }
        .into()
    })
}

impl<'r> Codec<'r> {
    pub(super) fn encode_primitive<B: BufMut>(
        &self,
        kind: PrimitiveKind,
        value: &Value,
        buf: &mut B,
    ) -> Result<()> {
        match kind {
            PrimitiveKind::U8 => buf.put_u8(integer(kind, value)?),
            PrimitiveKind::U16 => buf.put_u16_le(integer(kind, value)?),
            PrimitiveKind::U32 => buf.put_u32_le(integer(kind, value)?),
            PrimitiveKind::U64 => buf.put_u64_le(integer(kind, value)?),
            PrimitiveKind::UInt => {
                integer::<u64>(kind, value)?.encode_leb128(buf);
            }
            PrimitiveKind::I8 => buf.put_i8(integer(kind, value)?),
            PrimitiveKind::I16 => buf.put_i16_le(integer(kind, value)?),
            PrimitiveKind::I32 => buf.put_i32_le(integer(kind, value)?),
            PrimitiveKind::I64 => buf.put_i64_le(integer(kind, value)?),
            PrimitiveKind::Int => {
                zigzag_encode(integer(kind, value)?).encode_leb128(buf);
            }
            PrimitiveKind::F32 => match value {
                Value::F32(v) => buf.put_f32_le(*v),
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
            PrimitiveKind::F64 => match value {
                Value::F64(v) => buf.put_f64_le(*v),
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
            PrimitiveKind::Bool => match value {
                Value::Bool(v) => wire::encode_bool(*v, buf),
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
            PrimitiveKind::String => match value {
                Value::String(s) => self.encode_delimited(s.as_bytes(), buf)?,
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
            PrimitiveKind::Data => match value {
                Value::Data(data) => self.encode_delimited(data, buf)?,
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
            PrimitiveKind::DataFixed(len) => match value {
                Value::Data(data) if data.len() == len => buf.put_slice(data),
                Value::Data(data) => return Err(Error::length_mismatch(len, data.len())),
                other => return Err(Error::type_mismatch(kind.name(), other.describe())),
            },
        }
        Ok(())
    }

    pub(super) fn decode_primitive<B: Buf>(
        &self,
        kind: PrimitiveKind,
        buf: &mut B,
    ) -> Result<Value> {
        let value = match kind {
            PrimitiveKind::U8 => Value::U8(get_fixed!(buf, u8, get_u8)),
            PrimitiveKind::U16 => Value::U16(get_fixed!(buf, u16, get_u16_le)),
            PrimitiveKind::U32 => Value::U32(get_fixed!(buf, u32, get_u32_le)),
            PrimitiveKind::U64 => Value::U64(get_fixed!(buf, u64, get_u64_le)),
            PrimitiveKind::UInt => Value::UInt(u64::decode_leb128_buf(buf)?),
            PrimitiveKind::I8 => Value::I8(get_fixed!(buf, i8, get_i8)),
            PrimitiveKind::I16 => Value::I16(get_fixed!(buf, i16, get_i16_le)),
            PrimitiveKind::I32 => Value::I32(get_fixed!(buf, i32, get_i32_le)),
            PrimitiveKind::I64 => Value::I64(get_fixed!(buf, i64, get_i64_le)),
            PrimitiveKind::Int => Value::Int(zigzag_decode(u64::decode_leb128_buf(buf)?)),
            PrimitiveKind::F32 => Value::F32(get_fixed!(buf, f32, get_f32_le)),
            PrimitiveKind::F64 => Value::F64(get_fixed!(buf, f64, get_f64_le)),
            PrimitiveKind::Bool => Value::Bool(wire::decode_bool(buf)?),
            PrimitiveKind::String => {
                let len = self.decode_len(buf)?;
                let data = wire::take_bytes(buf, len)?;
                let s = core::str::from_utf8(&data)
                    .map_err(|_| Error::Decode(DecodeErrorKind::InvalidUtf8))?;
                Value::String(s.to_owned())
            }
            PrimitiveKind::Data => {
                let len = self.decode_len(buf)?;
                Value::Data(wire::take_bytes(buf, len)?.to_vec())
            }
            PrimitiveKind::DataFixed(len) => Value::Data(wire::take_bytes(buf, len)?.to_vec()),
        };
        Ok(value)
    }

    /// Writes a length prefix followed by `data`.
    fn encode_delimited<B: BufMut>(&self, data: &[u8], buf: &mut B) -> Result<()> {
        self.check_encode_len(data.len())?;
        wire::encode_len(data.len(), buf);
        buf.put_slice(data);
        Ok(())
    }
}
