//! Wire format helpers for BARE, the [Binary Application Record Encoding](https://baremessages.org).
//!
//! Unlike self-describing formats a BARE message carries no keys or type
//! markers, the schema alone determines how many bytes each value occupies.
//! The only framing on the wire is the unsigned varint length prefix in front
//! of strings, data, variable length arrays and maps.

use bytes::{Buf, BufMut, Bytes};

use crate::error::{DecodeErrorKind, Error, Result};
use crate::leb128::LebCodec;
use crate::util::{likely, unlikely, CastFrom};

/// Encodes a length prefix.
#[inline(always)]
pub fn encode_len<B: BufMut>(len: usize, buf: &mut B) -> usize {
    u64::cast_from(len).encode_leb128(buf)
}

/// Decodes a length prefix.
#[inline(always)]
pub fn decode_len<B: Buf>(buf: &mut B) -> Result<usize> {
    let chunk = buf.chunk();
    // Fast path, most lengths fit in one byte (< 128).
    if likely(!chunk.is_empty() && chunk[0] < 0x80) {
        let len = usize::cast_from(chunk[0]);
        buf.advance(1);
        Ok(len)
    } else {
        let len = u64::decode_leb128_buf(buf)?;
        usize::try_from(len)
            .map_err(|_| Error::Decode(DecodeErrorKind::LengthOverflow { value: len }))
    }
}

/// Returns an error if fewer than `len` bytes remain in `buf`.
#[inline(always)]
pub fn ensure_remaining<B: Buf>(buf: &B, len: usize) -> Result<()> {
    if unlikely(buf.remaining() < len) {
        return Err(Error::unexpected_end_of_buffer());
    }
    Ok(())
}

/// Splits the next `len` bytes off the front of `buf`.
#[inline]
pub fn take_bytes<B: Buf>(buf: &mut B, len: usize) -> Result<Bytes> {
    ensure_remaining(buf, len)?;
    Ok(buf.copy_to_bytes(len))
}

/// Encodes a bool as a single `0x00` or `0x01` byte.
#[inline(always)]
pub fn encode_bool<B: BufMut>(value: bool, buf: &mut B) {
    buf.put_u8(u8::from(value));
}

/// Decodes a bool, any nonzero byte is `true`.
#[inline(always)]
pub fn decode_bool<B: Buf>(buf: &mut B) -> Result<bool> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8() != 0)
}
