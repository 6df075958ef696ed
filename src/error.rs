//! Binding error types (v0.1)
//!
//! Errors are data, never aborts: the binder collects every problem it finds
//! in one pass and hands the ordered list back to the caller, which decides
//! whether any of them is fatal to the overall definition load. Each error
//! carries the source position of the offending assignment.

use thiserror::Error;

use crate::value::Pos;

/// One problem discovered while binding a property map
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A tree property matched no field in any supplied target.
    #[error("{pos}: unrecognized property \"{name}\"")]
    UnrecognizedProperty { name: String, pos: Pos },

    /// A value's shape does not match the destination field's kind, or a
    /// list element is not a string.
    #[error("{pos}: can't assign {found} value to {expected} property \"{name}\"")]
    TypeMismatch {
        name: String,
        pos: Pos,
        expected: &'static str,
        found: &'static str,
    },

    /// The same property name appeared twice at one nesting level.
    #[error("{pos}: property \"{name}\" already defined")]
    DuplicateProperty { name: String, pos: Pos },

    /// A capability-typed field holds no concrete instance and no resolver
    /// supplied one.
    #[error("{pos}: can't bind property \"{name}\": capability slot holds no concrete instance")]
    UnresolvedSlot { name: String, pos: Pos },

    /// A declared target field's shape cannot be bound and it lacks a
    /// `Mutated` annotation. A configuration-authoring error, surfaced when
    /// a property addresses the field.
    #[error("{pos}: property \"{name}\" targets a field with an unsupported shape (missing mutated annotation?)")]
    UnsupportedFieldShape { name: String, pos: Pos },
}

impl BindError {
    /// Source position the error points at
    pub fn pos(&self) -> Pos {
        match self {
            BindError::UnrecognizedProperty { pos, .. }
            | BindError::TypeMismatch { pos, .. }
            | BindError::DuplicateProperty { pos, .. }
            | BindError::UnresolvedSlot { pos, .. }
            | BindError::UnsupportedFieldShape { pos, .. } => *pos,
        }
    }

    /// Dotted property path the error points at
    pub fn property(&self) -> &str {
        match self {
            BindError::UnrecognizedProperty { name, .. }
            | BindError::TypeMismatch { name, .. }
            | BindError::DuplicateProperty { name, .. }
            | BindError::UnresolvedSlot { name, .. }
            | BindError::UnsupportedFieldShape { name, .. } => name,
        }
    }
}
