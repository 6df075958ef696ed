//! Parsed configuration values (v0.1)
//!
//! The data model handed over by the external parser/evaluator: an ordered
//! property map whose values are strings, bools, lists of strings, or nested
//! maps. Variable references are already substituted before binding begins;
//! this crate never sees an unresolved reference.
//!
//! Every node carries the source position it was parsed from, so binding
//! errors can point back into the definition file.

use serde::Serialize;
use std::fmt;

/// Source position of a parsed node (1-based line and column)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One parsed value with its source position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub pos: Pos,
    pub data: ValueData,
}

/// The shape of a parsed value
///
/// Lists hold string literals only as far as binding is concerned; a
/// non-string element is rejected during coercion, not here, so that the
/// error can name the offending element's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueData {
    String(String),
    Bool(bool),
    List(Vec<Value>),
    Map(Vec<Property>),
}

impl Value {
    pub fn string(s: impl Into<String>, pos: Pos) -> Self {
        Self {
            pos,
            data: ValueData::String(s.into()),
        }
    }

    pub fn bool(b: bool, pos: Pos) -> Self {
        Self {
            pos,
            data: ValueData::Bool(b),
        }
    }

    pub fn list(items: Vec<Value>, pos: Pos) -> Self {
        Self {
            pos,
            data: ValueData::List(items),
        }
    }

    pub fn map(properties: Vec<Property>, pos: Pos) -> Self {
        Self {
            pos,
            data: ValueData::Map(properties),
        }
    }

    /// Human-readable name of this value's shape, for error messages
    pub fn kind_name(&self) -> &'static str {
        match &self.data {
            ValueData::String(_) => "string",
            ValueData::Bool(_) => "bool",
            ValueData::List(_) => "list",
            ValueData::Map(_) => "map",
        }
    }
}

/// One named property inside a property map
///
/// Names are unique within one nesting level; order is preserved for
/// deterministic diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Value,
    pub pos: Pos,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        let pos = value.pos;
        Self {
            name: name.into(),
            value,
            pos,
        }
    }

    pub fn at(name: impl Into<String>, value: Value, pos: Pos) -> Self {
        Self {
            name: name.into(),
            value,
            pos,
        }
    }
}

/// A module definition as produced by the external parser
///
/// Binding consumes `properties`; `type_name` is the module-type name the
/// external registry used to pick target structures and factories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub type_name: String,
    pub pos: Pos,
    pub properties: Vec<Property>,
}

impl Module {
    pub fn new(type_name: impl Into<String>, pos: Pos) -> Self {
        Self {
            type_name: type_name.into(),
            pos,
            properties: Vec::new(),
        }
    }
}
