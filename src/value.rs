//! Dynamic values that are packed and unpacked against a [`TypeNode`](crate::schema::TypeNode).

/// A decoded value, or a value waiting to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    UInt(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Int(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    String(String),
    /// Both `data` and fixed length `data<n>`.
    Data(Vec<u8>),
    Enum(EnumValue),
    Record(Record),
    /// The value of a model whose schema is not a struct.
    Alias(AliasValue),
    Array(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(Value, Value)>),
    /// An absent optional.
    None,
}

impl Value {
    /// Short description of the variant, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::UInt(_) => "uint",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Int(_) => "int",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Bool(_) => "bool",
            Value::String(_) => "str",
            Value::Data(_) => "data",
            Value::Enum(_) => "enum",
            Value::Record(_) => "record",
            Value::Alias(_) => "alias",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::None => "none",
        }
    }

    /// Returns the integer held by any of the integer variants.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Value::U8(v) => Some(i128::from(v)),
            Value::U16(v) => Some(i128::from(v)),
            Value::U32(v) => Some(i128::from(v)),
            Value::U64(v) | Value::UInt(v) => Some(i128::from(v)),
            Value::I8(v) => Some(i128::from(v)),
            Value::I16(v) => Some(i128::from(v)),
            Value::I32(v) => Some(i128::from(v)),
            Value::I64(v) | Value::Int(v) => Some(i128::from(v)),
            _ => None,
        }
    }

    /// Name of the model or enum type this value is an instance of, if any.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Record(record) => record.type_name(),
            Value::Enum(value) => Some(value.type_name()),
            Value::Alias(alias) => Some(alias.type_name()),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<EnumValue> for Value {
    fn from(value: EnumValue) -> Self {
        Value::Enum(value)
    }
}

impl From<AliasValue> for Value {
    fn from(value: AliasValue) -> Self {
        Value::Alias(value)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

/// An instance of a BARE enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    ty: String,
    value: u64,
}

impl EnumValue {
    pub fn new(ty: impl Into<String>, value: u64) -> Self {
        EnumValue {
            ty: ty.into(),
            value,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.ty
    }

    /// The integer written to the wire.
    pub fn value(&self) -> u64 {
        self.value
    }
}

/// An instance of a model defined as another type, e.g. `type Id uint`.
///
/// Decoding such a model yields this wrapper so the value keeps its type name.
/// Encoding accepts either the wrapper or the bare inner value.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasValue {
    ty: String,
    value: Box<Value>,
}

impl AliasValue {
    pub fn new(ty: impl Into<String>, value: impl Into<Value>) -> Self {
        AliasValue {
            ty: ty.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_inner(self) -> Value {
        *self.value
    }
}

/// Get/set access to named fields of a struct-like value.
pub trait FieldAccess {
    fn get_field(&self, name: &str) -> Option<&Value>;

    /// Sets a field, replacing any existing value with the same name.
    fn set_field(&mut self, name: &str, value: Value);
}

/// A struct value, optionally tagged with the model type it is an instance of.
///
/// Fields keep the order they were first set in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    ty: Option<String>,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// An empty record that is an instance of the model `ty`.
    pub fn new(ty: impl Into<String>) -> Self {
        Record {
            ty: Some(ty.into()),
            fields: Vec::new(),
        }
    }

    /// An empty record with no model type, as produced by decoding a bare struct.
    pub fn untyped() -> Self {
        Record::default()
    }

    /// Builder style [`FieldAccess::set_field`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_field(name, value.into());
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldAccess for Record {
    fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    fn set_field(&mut self, name: &str, value: Value) {
        match self.fields.iter_mut().find(|(field, _)| field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name.into(), value)),
        }
    }
}
