//! LEB128 variable-length integer encoding/decoding.
//!
//! BARE uses unsigned LEB128 for `uint`, for every length prefix and for
//! union tags. Signed `int` values are zigzag mapped first so that small
//! magnitudes of either sign stay short.

use bytes::{Buf, BufMut};

use crate::error::{DecodeErrorKind, Error, Result};
use crate::util::{likely, CastFrom};

/// Types that can be encoded as, and decoded from, a LEB128 integer.
pub trait LebCodec: Sized {
    /// Maximum number of bytes a valid encoding of `Self` can occupy.
    const MAX_LEB_BYTES: usize;

    /// Decode a LEB128 variable length integer from the front of `data`.
    ///
    /// Returns a tuple of the decoded value and the number of bytes read to
    /// decode said value. Running out of input before the terminating byte is
    /// an [`DecodeErrorKind::UnexpectedEndOfBuffer`], an encoding longer than
    /// [`LebCodec::MAX_LEB_BYTES`] or one overflowing `Self` is an
    /// [`DecodeErrorKind::InvalidVarInt`].
    fn decode_leb128(data: &[u8]) -> Result<(Self, usize)>;

    /// Decode a LEB128 variable length integer, advancing `buf` past it.
    fn decode_leb128_buf<B: Buf>(buf: &mut B) -> Result<Self> {
        let chunk = buf.chunk();

        // Fast path: the current chunk holds the whole integer.
        if likely(chunk.len() >= Self::MAX_LEB_BYTES || chunk.len() == buf.remaining()) {
            let (value, bytes_read) = Self::decode_leb128(chunk)?;
            buf.advance(bytes_read);
            return Ok(value);
        }

        // Slow path: the integer may straddle chunks, read byte by byte.
        let mut scratch = [0u8; 16];
        for i in 0..Self::MAX_LEB_BYTES {
            if !buf.has_remaining() {
                return Err(Error::unexpected_end_of_buffer());
            }
            scratch[i] = buf.get_u8();
            if scratch[i] < 0x80 {
                return Self::decode_leb128(&scratch[..=i]).map(|(value, _)| value);
            }
        }
        Err(Error::invalid_varint())
    }

    /// Encode `self` as a LEB128 variable length integer into the provided
    /// buffer, returning the number of bytes written.
    fn encode_leb128<B: BufMut>(self, buf: &mut B) -> usize;

    /// The number of bytes required to encode this integer.
    fn encoded_leb128_len(self) -> usize;
}

impl LebCodec for u64 {
    const MAX_LEB_BYTES: usize = 10;

    #[inline]
    fn decode_leb128(data: &[u8]) -> Result<(Self, usize)> {
        let mut value = 0u64;
        for (i, &byte) in data.iter().take(Self::MAX_LEB_BYTES).enumerate() {
            // The tenth byte may only carry the single remaining bit of a u64.
            if i == Self::MAX_LEB_BYTES - 1 && byte >= 0x02 {
                return Err(Error::invalid_varint());
            }
            value |= u64::cast_from(byte & 0x7f) << (7 * i);
            if byte < 0x80 {
                return Ok((value, i + 1));
            }
        }

        if data.len() < Self::MAX_LEB_BYTES {
            Err(Error::unexpected_end_of_buffer())
        } else {
            Err(Error::invalid_varint())
        }
    }

    #[inline]
    fn encode_leb128<B: BufMut>(self, buf: &mut B) -> usize {
        let mut value = self;
        let mut written = 1;
        while value >= 0x80 {
            buf.put_u8(low_bits(value) | 0x80);
            value >>= 7;
            written += 1;
        }
        buf.put_u8(low_bits(value));
        written
    }

    /// Compute the LEB128 encoded length using leading_zeros.
    ///
    /// LEB128 encodes 7 bits per byte. The number of bytes needed is
    /// ceil(significant_bits / 7), with a minimum of 1 byte for value 0.
    #[inline]
    fn encoded_leb128_len(self) -> usize {
        // Lookup table mapping leading_zeros (0-64) to LEB128 byte count.
        #[rustfmt::skip]
        const LZ_TO_LEN: [u8; 65] = [
            10,                                         // 0:     64 bits -> 10 bytes
            9, 9, 9, 9, 9, 9, 9,                        // 1-7:   63-57 bits -> 9 bytes
            8, 8, 8, 8, 8, 8, 8,                        // 8-14:  56-50 bits -> 8 bytes
            7, 7, 7, 7, 7, 7, 7,                        // 15-21: 49-43 bits -> 7 bytes
            6, 6, 6, 6, 6, 6, 6,                        // 22-28: 42-36 bits -> 6 bytes
            5, 5, 5, 5, 5, 5, 5,                        // 29-35: 35-29 bits -> 5 bytes
            4, 4, 4, 4, 4, 4, 4,                        // 36-42: 28-22 bits -> 4 bytes
            3, 3, 3, 3, 3, 3, 3,                        // 43-49: 21-15 bits -> 3 bytes
            2, 2, 2, 2, 2, 2, 2,                        // 50-56: 14-8 bits  -> 2 bytes
            1, 1, 1, 1, 1, 1, 1, 1,                     // 57-64: 7-0 bits   -> 1 byte
        ];

        let lz = self.leading_zeros();
        LZ_TO_LEN
            .get(usize::try_from(lz).unwrap_or(64))
            .map_or(1, |len| usize::cast_from(*len))
    }
}

/// The low seven bits of `value`.
#[inline(always)]
fn low_bits(value: u64) -> u8 {
    value.to_le_bytes()[0] & 0x7f
}

/// Maps a signed integer onto the unsigned range, `0, -1, 1, -2, 2, ...`
/// becoming `0, 1, 2, 3, 4, ...`.
#[inline]
pub const fn zigzag_encode(n: i64) -> u64 {
    u64::from_ne_bytes(((n << 1) ^ (n >> 63)).to_ne_bytes())
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub const fn zigzag_decode(n: u64) -> i64 {
    let half = i64::from_ne_bytes((n >> 1).to_ne_bytes());
    if n & 1 == 0 {
        half
    } else {
        // -(half + 1)
        !half
    }
}

/// Encode `value` as an unsigned varint.
pub fn encode_uvarint(value: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(value.encoded_leb128_len());
    value.encode_leb128(&mut buf);
    buf
}

/// Decode an unsigned varint starting at `offset`, returning the value and
/// the offset just past it.
pub fn decode_uvarint(buffer: &[u8], offset: usize) -> Result<(u64, usize)> {
    let data = buffer.get(offset..).ok_or(DecodeErrorKind::OffsetOutOfBounds {
        offset,
        len: buffer.len(),
    })?;
    let (value, bytes_read) = u64::decode_leb128(data)?;
    Ok((value, offset + bytes_read))
}

/// Encode `value` as a zigzag mapped signed varint.
pub fn encode_int(value: i64) -> Vec<u8> {
    encode_uvarint(zigzag_encode(value))
}

/// Decode a zigzag mapped signed varint starting at `offset`.
pub fn decode_int(buffer: &[u8], offset: usize) -> Result<(i64, usize)> {
    let (value, offset) = decode_uvarint(buffer, offset)?;
    Ok((zigzag_decode(value), offset))
}
