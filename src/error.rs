//! Errors produced while packing or unpacking BARE messages.
//!
//! Every failure is terminal for the call that produced it: a partially
//! written buffer or a partially advanced offset must be discarded.

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top level error returned by every pack/unpack entry point.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The value handed to the encoder does not have the shape the schema describes.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),
    /// Encoding failed for a reason other than a shape mismatch.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeErrorKind),
    /// The input bytes are not a valid encoding of the requested type.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeErrorKind),
    /// A named type could not be found in the registry.
    #[error("unresolved named type '{name}'")]
    Lookup { name: String },
    /// A type definition is inconsistent and was rejected while being built.
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Coarse category of an [`Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaMismatch,
    Encode,
    Decode,
    Lookup,
    Definition,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            Error::Encode(_) => ErrorKind::Encode,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Lookup { .. } => ErrorKind::Lookup,
            Error::Definition(_) => ErrorKind::Definition,
        }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn lookup(name: &str) -> Self {
        Error::Lookup { name: name.into() }
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn unexpected_end_of_buffer() -> Self {
        Error::Decode(DecodeErrorKind::UnexpectedEndOfBuffer)
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn invalid_varint() -> Self {
        Error::Decode(DecodeErrorKind::InvalidVarInt)
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::SchemaMismatch(SchemaMismatch::TypeMismatch { expected, found })
    }

    #[cold]
    #[inline(never)]
    pub(crate) fn length_mismatch(expected: usize, actual: usize) -> Self {
        Error::SchemaMismatch(SchemaMismatch::LengthMismatch { expected, actual })
    }
}

/// Ways a value can disagree with the schema it is encoded against.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("missing value for field '{field}'")]
    MissingField { field: String },
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("absent value for a non-optional type")]
    UnexpectedNone,
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value does not fit in {target_type}")]
    OutOfRange { target_type: &'static str },
}

/// Ways a named type definition can contradict itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("tag {tag} of union '{union}' is used by both '{existing}' and '{variant}'")]
    DuplicateUnionTag {
        union: String,
        tag: u64,
        existing: String,
        variant: String,
    },
    #[error("'{variant}' is listed twice in union '{union}'")]
    DuplicateUnionVariant { union: String, variant: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeErrorKind {
    #[error("'{member}' is not a member of union '{union}'")]
    NotUnionMember { union: String, member: String },
    #[error("{value} is not a member of enum '{name}'")]
    UnknownEnumValue { name: String, value: u64 },
    #[error("'{name}' is not a union")]
    NotAUnion { name: String },
    #[error("nesting exceeds the configured depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    #[error("length {len} exceeds the configured limit of {limit}")]
    LengthLimitExceeded { len: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("unexpected end of buffer")]
    UnexpectedEndOfBuffer,
    #[error("invalid leb128 varint")]
    InvalidVarInt,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("length prefix {value} exceeds platform addressable memory")]
    LengthOverflow { value: u64 },
    #[error("{value} is not a member of enum '{name}'")]
    UnknownEnumValue { name: String, value: u64 },
    #[error("unknown tag {tag} for union '{union}'")]
    UnknownUnionTag { union: String, tag: u64 },
    #[error("offset {offset} is past the end of a {len} byte buffer")]
    OffsetOutOfBounds { offset: usize, len: usize },
    #[error("nesting exceeds the configured depth limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    #[error("length {len} exceeds the configured limit of {limit}")]
    LengthLimitExceeded { len: u64, limit: usize },
}
