//! Schema driven packing and unpacking of [BARE](https://baremessages.org)
//! messages.
//!
//! A schema is a tree of [`TypeNode`]s. Named types (enums, models and unions)
//! live in a [`Registry`], and a [`Codec`] walks a [`Value`] alongside its
//! schema to produce, or consume, the exact BARE byte stream.
//!
//! ```
//! use bare_codec::{Codec, Record, Registry, TypeNode, Value};
//!
//! let ty = TypeNode::structure([("id", TypeNode::u32()), ("name", TypeNode::string())]);
//! let value = Value::Record(Record::untyped().with("id", Value::U32(7)).with("name", "x"));
//!
//! let registry = Registry::new();
//! let codec = Codec::new(&registry);
//! let bytes = codec.pack_value(&ty, &value).unwrap();
//! assert_eq!(bytes, [0x07, 0x00, 0x00, 0x00, 0x01, b'x']);
//! assert_eq!(codec.decode(&ty, &bytes, 0).unwrap(), (value, bytes.len()));
//! ```

#![deny(clippy::as_conversions)]

pub mod codec;
pub mod error;
// Publically export `leb128` because the functions are useful on their own.
pub mod leb128;
pub mod registry;
pub mod schema;
pub mod value;
pub mod wire;

mod util;

pub use codec::{Codec, Config};
pub use error::{DefinitionError, Error, ErrorKind, Result};
pub use registry::{EnumDef, ModelDef, NamedDef, Registry, UnionDef};
pub use schema::{PrimitiveKind, TypeNode};
pub use value::{AliasValue, EnumValue, FieldAccess, Record, Value};

// The registry and schemas are loaded once and shared between threads.
static_assertions::assert_impl_all!(TypeNode: Send, Sync);
static_assertions::assert_impl_all!(Registry: Send, Sync);
static_assertions::assert_impl_all!(Value: Send, Sync);
static_assertions::assert_impl_all!(Codec<'static>: Send, Sync, Copy);
