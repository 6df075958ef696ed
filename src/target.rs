//! Target structures and field descriptors (v0.1)
//!
//! A target structure is a caller-declared composite type that configuration
//! properties bind into. Each concrete type exposes a static descriptor table
//! (`FieldDecl`) plus an indexed mutable accessor (`field_mut`), the explicit
//! descriptor-table answer to runtime reflection: the binder walks the table,
//! never the type itself.
//!
//! The descriptor table and the accessor must agree: entry `i` of `decls()`
//! describes the field returned by `field_mut(i)`.

use std::any::Any;
use std::fmt;

use crate::filter::FieldFilter;

/// A capability-typed slot: holds exactly one concrete variant at a time.
///
/// The concrete type is chosen dynamically, either pre-seeded by the caller
/// (usually via [`TargetStruct::clone_empty`] on a typed template) or supplied
/// by a [`crate::slot::SlotResolver`] at bind time.
pub type Slot = Option<Box<dyn TargetStruct>>;

/// A composite type that configuration properties can be bound into.
///
/// Implementers hand-write the descriptor table; `#[derive(Default)]` plus a
/// `Box::new(Self::default())` body for `clone_empty` is the usual pattern.
pub trait TargetStruct: Any + fmt::Debug {
    /// Static descriptor table, one entry per declared field, in declaration
    /// order.
    fn decls(&self) -> &'static [FieldDecl];

    /// Mutable access to field `index` of the descriptor table.
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;

    /// Zero-valued clone of this type's shape.
    ///
    /// The registry boundary uses this to fabricate fresh output containers
    /// from an existing typed template, and to pre-seed the concrete type of
    /// a capability slot without invoking a module factory.
    fn clone_empty(&self) -> Box<dyn TargetStruct>;
}

impl dyn TargetStruct {
    /// Downcast to a concrete target type.
    pub fn downcast_ref<T: TargetStruct>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    /// Downcast to a concrete target type, mutably.
    pub fn downcast_mut<T: TargetStruct>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

/// An optional nested structure, allocated on first bind.
///
/// Blanket-implemented for `Option<T>`; target types expose optional nested
/// fields as `FieldMut::OptionStruct(&mut self.field)`.
pub trait OptionalTarget {
    fn is_present(&self) -> bool;

    /// The contained structure, allocating a default one if absent.
    fn get_or_insert_default(&mut self) -> &mut dyn TargetStruct;
}

impl<T: TargetStruct + Default> OptionalTarget for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }

    fn get_or_insert_default(&mut self) -> &mut dyn TargetStruct {
        self.get_or_insert_with(T::default)
    }
}

/// Semantic kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string scalar; a present property replaces the value.
    String,
    /// Plain bool scalar; a present property replaces the value.
    Bool,
    /// Three-state string: `None` is absent, distinct from `Some("")`.
    OptionString,
    /// Three-state bool: `None` is absent, distinct from `Some(false)`.
    OptionBool,
    /// Ordered string sequence with three-state presence; parsed elements
    /// append after pre-existing ones.
    StringList,
    /// Nested structure held by value.
    Struct,
    /// Nested structure behind an `Option`, allocated on first bind.
    OptionStruct,
    /// Capability-typed slot holding one concrete variant.
    Slot,
    /// A shape this engine cannot bind; legal only with the `Mutated`
    /// annotation, otherwise addressing it is an error.
    Opaque,
}

impl FieldKind {
    /// Human-readable name for error messages
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String | FieldKind::OptionString => "string",
            FieldKind::Bool | FieldKind::OptionBool => "bool",
            FieldKind::StringList => "list of strings",
            FieldKind::Struct | FieldKind::OptionStruct => "map",
            FieldKind::Slot => "map",
            FieldKind::Opaque => "unsupported",
        }
    }
}

/// Field-level participation annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// The field is owned by downstream logic, never by the configuration
    /// tree. Invisible to binding and to unrecognized-property accounting.
    Mutated,
    /// Restricts which sub-fields of this nested-structure field participate:
    /// only sub-fields tagged `key=value` are eligible, for that recursion
    /// level only.
    Filter {
        key: &'static str,
        value: &'static str,
    },
}

/// Static tag metadata on a field, matched by `Annotation::Filter`
pub type Tag = (&'static str, &'static str);

/// Descriptor of one declared field
#[derive(Debug, Clone, Copy)]
pub struct FieldDecl {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Anonymous embedding: the field's own sub-fields are promoted into the
    /// parent's bindable namespace under their own names. Meaningful for
    /// `Struct` and `Slot` kinds only.
    pub embedded: bool,
    pub annotations: &'static [Annotation],
    pub tags: &'static [Tag],
}

impl FieldDecl {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            embedded: false,
            annotations: &[],
            tags: &[],
        }
    }

    /// An anonymously-embedded field; its sub-fields join the parent
    /// namespace. The name is kept for diagnostics only.
    pub const fn embedded(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            embedded: true,
            annotations: &[],
            tags: &[],
        }
    }

    pub const fn with_annotations(mut self, annotations: &'static [Annotation]) -> Self {
        self.annotations = annotations;
        self
    }

    pub const fn with_tags(mut self, tags: &'static [Tag]) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_mutated(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Mutated))
    }

    /// The filter this field imposes on its own sub-fields, if any
    pub fn filter(&self) -> Option<FieldFilter> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Filter { key, value } => Some(FieldFilter::new(key, value)),
            Annotation::Mutated => None,
        })
    }

    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tags.iter().any(|(k, v)| *k == key && *v == value)
    }
}

/// Mutable view of one target field, as handed out by
/// [`TargetStruct::field_mut`]
pub enum FieldMut<'a> {
    String(&'a mut String),
    Bool(&'a mut bool),
    OptionString(&'a mut Option<String>),
    OptionBool(&'a mut Option<bool>),
    StringList(&'a mut Option<Vec<String>>),
    Struct(&'a mut dyn TargetStruct),
    OptionStruct(&'a mut dyn OptionalTarget),
    Slot(&'a mut Slot),
    /// No usable access; paired with `FieldKind::Opaque`.
    Opaque,
}
