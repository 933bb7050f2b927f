//! Type descriptors that drive the codec.
//!
//! A [`TypeNode`] tree describes the shape of one BARE type. Trees are built
//! once per schema, usually by a schema parser, and are only ever read by the
//! codec. They are cheap to share across threads.

/// Primitive BARE types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    U8,
    U16,
    U32,
    U64,
    /// Unsigned varint.
    UInt,
    I8,
    I16,
    I32,
    I64,
    /// Zigzag mapped signed varint.
    Int,
    F32,
    F64,
    Bool,
    /// Length prefixed UTF-8.
    String,
    /// Length prefixed raw bytes.
    Data,
    /// Exactly `n` raw bytes without a length prefix.
    DataFixed(usize),
}

impl PrimitiveKind {
    /// Name of the kind as written in a `.bare` schema.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::UInt => "uint",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::Int => "int",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::String => "str",
            PrimitiveKind::Data => "data",
            PrimitiveKind::DataFixed(_) => "data<len>",
        }
    }
}

/// A node in a schema's type tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    /// Ordered fields. Declaration order is wire order.
    Struct(Vec<(String, TypeNode)>),
    /// Reference to an enum, model or union in a [`Registry`](crate::registry::Registry).
    Named(String),
    /// `length == None` is a variable length, count prefixed array.
    Array {
        subtype: Box<TypeNode>,
        length: Option<usize>,
    },
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    Optional(Box<TypeNode>),
}

macro_rules! primitive_ctors {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for `TypeNode::Primitive(PrimitiveKind::", stringify!($kind), ")`.")]
            pub const fn $fn_name() -> TypeNode {
                TypeNode::Primitive(PrimitiveKind::$kind)
            }
        )*
    };
}

impl TypeNode {
    primitive_ctors! {
        u8 => U8,
        u16 => U16,
        u32 => U32,
        u64 => U64,
        uint => UInt,
        i8 => I8,
        i16 => I16,
        i32 => I32,
        i64 => I64,
        int => Int,
        f32 => F32,
        f64 => F64,
        bool => Bool,
        string => String,
        data => Data,
    }

    pub const fn data_fixed(len: usize) -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::DataFixed(len))
    }

    /// A struct with fields in the given order.
    pub fn structure<I, S>(fields: I) -> TypeNode
    where
        I: IntoIterator<Item = (S, TypeNode)>,
        S: Into<String>,
    {
        TypeNode::Struct(
            fields
                .into_iter()
                .map(|(name, ty)| (name.into(), ty))
                .collect(),
        )
    }

    pub fn named(name: impl Into<String>) -> TypeNode {
        TypeNode::Named(name.into())
    }

    /// A variable length array.
    pub fn array(subtype: TypeNode) -> TypeNode {
        TypeNode::Array {
            subtype: Box::new(subtype),
            length: None,
        }
    }

    /// An array of exactly `length` elements.
    pub fn fixed_array(subtype: TypeNode, length: usize) -> TypeNode {
        TypeNode::Array {
            subtype: Box::new(subtype),
            length: Some(length),
        }
    }

    pub fn map(key: TypeNode, value: TypeNode) -> TypeNode {
        TypeNode::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn optional(subtype: TypeNode) -> TypeNode {
        TypeNode::Optional(Box::new(subtype))
    }

    /// Short description of the node, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TypeNode::Primitive(kind) => kind.name(),
            TypeNode::Struct(_) => "struct",
            TypeNode::Named(_) => "named type",
            TypeNode::Array { length: None, .. } => "array",
            TypeNode::Array { length: Some(_), .. } => "fixed array",
            TypeNode::Map { .. } => "map",
            TypeNode::Optional(_) => "optional",
        }
    }
}
