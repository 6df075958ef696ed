//! Filter/exclusion rules for field participation (v0.1)
//!
//! Two annotations gate which fields the binder may touch: `Mutated` removes
//! a field from binding permanently, and `Filter(key=value)` restricts a
//! nested structure's direct sub-fields to those tagged with a matching
//! key/value pair. Both make the excluded field invisible in both directions:
//! it cannot be bound, and a tree property addressing it falls out as
//! unrecognized.

use crate::target::FieldDecl;

/// An active `filter(key=value)` rule, applied while recursing into one
/// nested-structure field.
///
/// The rule gates that recursion level only; deeper levels are gated by
/// their own fields' filter annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFilter {
    key: &'static str,
    value: &'static str,
}

impl FieldFilter {
    pub fn new(key: &'static str, value: &'static str) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &'static str {
        self.value
    }

    /// Whether a sub-field participates in binding under this rule
    pub fn admits(&self, decl: &FieldDecl) -> bool {
        decl.has_tag(self.key, self.value)
    }
}

/// Whether a field participates at all under an optional active filter.
///
/// Mutated fields never participate; with no filter active every other
/// field does.
pub fn participates(decl: &FieldDecl, filter: Option<FieldFilter>) -> bool {
    if decl.is_mutated() {
        return false;
    }
    match filter {
        Some(rule) => rule.admits(decl),
        None => true,
    }
}
