//! Small internal helpers shared by the codec.

/// Lossless conversion between integer types.
///
/// Exists because the crate denies `as` conversions; implementations are only
/// provided where the cast can never truncate on supported platforms.
pub(crate) trait CastFrom<T> {
    fn cast_from(from: T) -> Self;
}

#[allow(clippy::as_conversions)]
impl CastFrom<u8> for u64 {
    #[inline(always)]
    fn cast_from(from: u8) -> u64 {
        from as u64
    }
}

#[allow(clippy::as_conversions)]
impl CastFrom<u8> for usize {
    #[inline(always)]
    fn cast_from(from: u8) -> usize {
        from as usize
    }
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
#[allow(clippy::as_conversions)]
impl CastFrom<usize> for u64 {
    #[inline(always)]
    fn cast_from(from: usize) -> u64 {
        from as u64
    }
}

#[inline(always)]
#[cold]
fn cold_path() {}

/// "Annotation" to hint that a branch of an if-statement is likely to occur.
#[inline(always)]
pub(crate) fn likely(b: bool) -> bool {
    if b {
        true
    } else {
        cold_path();
        false
    }
}

/// "Annotation" to hint that a branch of an if-statement is _not likely_ to occur.
#[inline(always)]
pub(crate) fn unlikely(b: bool) -> bool {
    if b {
        cold_path();
        true
    } else {
        false
    }
}
