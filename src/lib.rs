//! propbind - property-binding core for declarative build-module definitions
//!
//! Binds a parsed, already-evaluated configuration tree (named string, bool,
//! list, and nested-map values) onto one or more statically declared,
//! strongly-typed target structures, in place:
//!
//! - anonymous embedding promotes sub-fields into the parent namespace, and
//!   name collisions bind one value into every matching field
//! - optional fields keep full three-state semantics (absent, present-zero,
//!   present-nonzero)
//! - pre-populated defaults are replaced (scalars) or extended (lists)
//! - capability-typed slots bind into a pre-seeded concrete variant, or one
//!   supplied by an injectable resolver
//! - every problem in a definition is collected and reported in one pass
//!
//! The lexer/parser, variable evaluator, module-type registry, and build
//! generation are external collaborators; this crate only consumes their
//! already-resolved property trees and already-defaulted targets.

pub mod bind;
mod coerce;
pub mod error;
pub mod filter;
pub mod shape;
pub mod slot;
pub mod target;
pub mod value;

pub use bind::{bind_properties, BindOutcome, Binder};
pub use error::BindError;
pub use filter::FieldFilter;
pub use shape::{FieldEntry, Namespace};
pub use slot::{NoResolver, SlotResolver};
pub use target::{Annotation, FieldDecl, FieldKind, FieldMut, OptionalTarget, Slot, TargetStruct};
pub use value::{Module, Pos, Property, Value, ValueData};
