//! Named type definitions.
//!
//! A [`TypeNode::Named`] reference is resolved against a [`Registry`] built once
//! when a schema is loaded and handed to every [`Codec`](crate::codec::Codec).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{DefinitionError, Result};
use crate::schema::TypeNode;
use crate::value::Record;

/// Factory producing the empty instance a model is decoded into.
pub type Factory = Arc<dyn Fn() -> Record + Send + Sync>;

/// Maps type names to their definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: HashMap<String, NamedDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same name.
    pub fn register(&mut self, def: impl Into<NamedDef>) -> &mut Self {
        let def = def.into();
        self.types.insert(def.name().to_owned(), def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NamedDef> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// What a name resolves to.
#[derive(Debug, Clone)]
pub enum NamedDef {
    Enum(EnumDef),
    Model(ModelDef),
    Union(UnionDef),
}

impl NamedDef {
    pub fn name(&self) -> &str {
        match self {
            NamedDef::Enum(def) => &def.name,
            NamedDef::Model(def) => &def.name,
            NamedDef::Union(def) => &def.name,
        }
    }
}

impl From<EnumDef> for NamedDef {
    fn from(def: EnumDef) -> Self {
        NamedDef::Enum(def)
    }
}

impl From<ModelDef> for NamedDef {
    fn from(def: ModelDef) -> Self {
        NamedDef::Model(def)
    }
}

impl From<UnionDef> for NamedDef {
    fn from(def: UnionDef) -> Self {
        NamedDef::Union(def)
    }
}

/// A BARE enum: named members, each with an integer value.
#[derive(Debug, Clone)]
pub struct EnumDef {
    name: String,
    members: Vec<(String, u64)>,
    next_value: u64,
}

impl EnumDef {
    pub fn new(name: impl Into<String>) -> Self {
        EnumDef {
            name: name.into(),
            members: Vec::new(),
            next_value: 0,
        }
    }

    /// Add a member valued one past the previous member.
    pub fn member(self, name: impl Into<String>) -> Self {
        let value = self.next_value;
        self.member_with_value(name, value)
    }

    pub fn member_with_value(mut self, name: impl Into<String>, value: u64) -> Self {
        self.members.push((name.into(), value));
        self.next_value = value.saturating_add(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, u64)> {
        self.members.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn contains(&self, value: u64) -> bool {
        self.member_name(value).is_some()
    }

    pub fn member_name(&self, value: u64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| name.as_str())
    }

    pub fn value_of(&self, member: &str) -> Option<u64> {
        self.members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, value)| *value)
    }
}

/// A user defined type carrying its own schema.
#[derive(Clone)]
pub struct ModelDef {
    name: String,
    ast: TypeNode,
    factory: Option<Factory>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>, ast: TypeNode) -> Self {
        ModelDef {
            name: name.into(),
            ast,
            factory: None,
        }
    }

    /// Use `factory` instead of an empty [`Record`] as the decode target.
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Record + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ast(&self) -> &TypeNode {
        &self.ast
    }

    /// A fresh, empty instance of this model.
    pub fn instantiate(&self) -> Record {
        match &self.factory {
            Some(factory) => factory(),
            None => Record::new(self.name.as_str()),
        }
    }
}

impl fmt::Debug for ModelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDef")
            .field("name", &self.name)
            .field("ast", &self.ast)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// A tagged union over named types.
///
/// Tags default to the position of the variant in declaration order and
/// continue counting from the last explicit tag. Tags and variant types are
/// unique within a union.
#[derive(Debug, Clone)]
pub struct UnionDef {
    name: String,
    variants: Vec<(u64, String)>,
    by_tag: HashMap<u64, usize>,
    by_name: HashMap<String, u64>,
    next_tag: u64,
}

impl UnionDef {
    pub fn new(name: impl Into<String>) -> Self {
        UnionDef {
            name: name.into(),
            variants: Vec::new(),
            by_tag: HashMap::new(),
            by_name: HashMap::new(),
            next_tag: 0,
        }
    }

    /// Add a variant tagged one past the previous variant.
    pub fn variant(self, type_name: impl Into<String>) -> Result<Self> {
        let tag = self.next_tag;
        self.variant_with_tag(type_name, tag)
    }

    /// Add a variant with an explicit tag.
    ///
    /// Fails if the tag or the type is already part of the union.
    pub fn variant_with_tag(mut self, type_name: impl Into<String>, tag: u64) -> Result<Self> {
        let type_name = type_name.into();
        if self.by_name.contains_key(&type_name) {
            return Err(DefinitionError::DuplicateUnionVariant {
                union: self.name,
                variant: type_name,
            }
            .into());
        }
        if let Some(existing) = self.variant_name(tag).map(str::to_owned) {
            return Err(DefinitionError::DuplicateUnionTag {
                existing,
                union: self.name,
                tag,
                variant: type_name,
            }
            .into());
        }

        self.by_tag.insert(tag, self.variants.len());
        self.by_name.insert(type_name.clone(), tag);
        self.variants.push((tag, type_name));
        self.next_tag = tag.saturating_add(1);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(tag, type name)` pairs in declaration order.
    pub fn variants(&self) -> impl Iterator<Item = (u64, &str)> {
        self.variants.iter().map(|(tag, name)| (*tag, name.as_str()))
    }

    pub fn tag_of(&self, type_name: &str) -> Option<u64> {
        self.by_name.get(type_name).copied()
    }

    pub fn variant_name(&self, tag: u64) -> Option<&str> {
        self.by_tag
            .get(&tag)
            .and_then(|idx| self.variants.get(*idx))
            .map(|(_, name)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::value::FieldAccess;
    use crate::value::Value;

    #[test]
    fn test_enum_values() {
        let def = EnumDef::new("Color")
            .member("Red")
            .member_with_value("Green", 5)
            .member("Blue");
        assert_eq!(def.value_of("Red"), Some(0));
        assert_eq!(def.value_of("Blue"), Some(6));
        assert_eq!(def.member_name(5), Some("Green"));
        assert!(!def.contains(1));
        assert_eq!(def.members().count(), 3);
    }

    #[test]
    fn test_union_tags() -> Result<()> {
        let def = UnionDef::new("Shape")
            .variant("Circle")?
            .variant("Square")?
            .variant_with_tag("Polygon", 10)?
            .variant("Line")?;
        let tags: Vec<_> = def.variants().collect();
        assert_eq!(
            tags,
            [(0, "Circle"), (1, "Square"), (10, "Polygon"), (11, "Line")]
        );
        assert_eq!(def.tag_of("Polygon"), Some(10));
        assert_eq!(def.variant_name(11), Some("Line"));
        assert_eq!(def.variant_name(2), None);
        assert_eq!(def.tag_of("Triangle"), None);
        Ok(())
    }

    #[test]
    fn test_union_tag_collision() {
        // Counting on from an explicit tag lands on one already taken.
        let err = UnionDef::new("U")
            .variant_with_tag("A", 1)
            .and_then(|def| def.variant_with_tag("B", 0))
            .and_then(|def| def.variant("C"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Definition(DefinitionError::DuplicateUnionTag {
                union: "U".into(),
                tag: 1,
                existing: "A".into(),
                variant: "C".into(),
            })
        );

        let err = UnionDef::new("U")
            .variant_with_tag("A", 3)
            .and_then(|def| def.variant_with_tag("B", 3))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Definition);
    }

    #[test]
    fn test_union_duplicate_variant() {
        let err = UnionDef::new("U")
            .variant("A")
            .and_then(|def| def.variant("A"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Definition(DefinitionError::DuplicateUnionVariant {
                union: "U".into(),
                variant: "A".into(),
            })
        );
    }

    #[test]
    fn test_model_factory() {
        let plain = ModelDef::new("Point", TypeNode::structure([("x", TypeNode::i32())]));
        assert_eq!(plain.instantiate(), Record::new("Point"));

        let seeded = plain
            .clone()
            .with_factory(|| Record::new("Point").with("x", Value::I32(0)));
        assert_eq!(seeded.instantiate().get_field("x"), Some(&Value::I32(0)));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = Registry::new();
        registry
            .register(EnumDef::new("Color").member("Red"))
            .register(ModelDef::new("Point", TypeNode::u8()));
        assert_eq!(registry.len(), 2);
        assert!(matches!(registry.get("Color"), Some(NamedDef::Enum(_))));
        assert!(matches!(registry.get("Point"), Some(NamedDef::Model(_))));
        assert!(registry.get("Shape").is_none());
    }
}
