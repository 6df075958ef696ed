//! Binder core: orchestration across one property map and N targets (v0.1)
//!
//! One call binds one property map against a fixed list of targets to
//! completion. The pass runs in phases:
//!
//! 1. Scanning — flatten the property tree into a dotted-path consumption
//!    index, rejecting duplicate names per nesting level.
//! 2. Binding — per target, per property, locate every matching namespace
//!    entry and coerce the value into each one.
//! 3. Reconciling — every flattened property consumed by no target becomes
//!    exactly one unrecognized-property error.
//!
//! Errors aggregate; nothing short-circuits. Consumption is tracked globally
//! across targets, so a property recognized by one target is not an error
//! for the others.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::coerce::coerce;
use crate::error::BindError;
use crate::filter::{participates, FieldFilter};
use crate::shape::{navigate, Namespace};
use crate::slot::{NoResolver, SlotResolver};
use crate::target::TargetStruct;
use crate::value::{Pos, Property, ValueData};

/// Result of one binding pass
#[derive(Debug)]
pub struct BindOutcome {
    /// Whether the property map matched this binder's targets: true when the
    /// map is empty or at least one property bound somewhere. Callers that
    /// scan many definitions use this to skip non-matching ones.
    pub consumed: bool,
    /// Every problem discovered, in discovery order.
    pub errors: Vec<BindError>,
}

impl BindOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Binds property maps into target structures.
///
/// The default binder never instantiates empty capability slots; supply a
/// [`SlotResolver`] from the module-type registry to change that.
pub struct Binder<'r> {
    resolver: &'r dyn SlotResolver,
}

impl Binder<'static> {
    pub fn new() -> Self {
        Self {
            resolver: &NoResolver,
        }
    }
}

impl Default for Binder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Binder<'r> {
    pub fn with_resolver(resolver: &'r dyn SlotResolver) -> Self {
        Self { resolver }
    }

    /// Bind one property map into every supplied target, in place.
    ///
    /// Targets keep their pre-populated defaults except where the merge
    /// policy replaces them. Ownership stays with the caller.
    pub fn bind(
        &self,
        properties: &[Property],
        targets: &mut [&mut dyn TargetStruct],
    ) -> BindOutcome {
        debug!(
            properties = properties.len(),
            targets = targets.len(),
            "binding property map"
        );

        // Scanning
        let mut errors = Vec::new();
        let index = PropertyIndex::build(properties, &mut errors);
        let mut ctx = BindContext {
            resolver: self.resolver,
            index,
            errors,
        };

        // Binding
        for target in targets.iter_mut() {
            bind_struct(&mut ctx, properties, &mut **target, "", None);
        }

        // Reconciling
        ctx.index.append_unrecognized(&mut ctx.errors);

        let consumed = properties.is_empty() || ctx.index.any_root_consumed();
        debug!(consumed, errors = ctx.errors.len(), "binding complete");
        BindOutcome {
            consumed,
            errors: ctx.errors,
        }
    }
}

/// Bind with the default binder (no slot resolver).
pub fn bind_properties(
    properties: &[Property],
    targets: &mut [&mut dyn TargetStruct],
) -> BindOutcome {
    Binder::new().bind(properties, targets)
}

/// Shared state of one binding pass
pub(crate) struct BindContext<'r> {
    pub(crate) resolver: &'r dyn SlotResolver,
    pub(crate) index: PropertyIndex,
    pub(crate) errors: Vec<BindError>,
}

/// Bind one nesting level of properties into one structure.
///
/// `prefix` is the dotted path of the enclosing property, empty at the top
/// level. `filter` is the enclosing field's filter annotation, gating which
/// fields of this structure participate.
pub(crate) fn bind_struct(
    ctx: &mut BindContext<'_>,
    properties: &[Property],
    target: &mut dyn TargetStruct,
    prefix: &str,
    filter: Option<FieldFilter>,
) {
    let namespace = Namespace::of(target);
    let mut seen: Vec<&str> = Vec::with_capacity(properties.len());

    for property in properties {
        // Duplicate names were already reported during scanning; only the
        // first occurrence binds.
        if seen.contains(&property.name.as_str()) {
            continue;
        }
        seen.push(&property.name);

        let path = join(prefix, &property.name);
        let matches: Vec<_> = namespace
            .lookup(&property.name)
            .filter(|entry| participates(entry.decl, filter))
            .collect();
        if matches.is_empty() {
            trace!(property = %path, "no matching field in this target");
            continue;
        }

        ctx.index.mark(&path);
        for entry in matches {
            // A collision binds the same value into every matching
            // field-path, not just the first.
            if let Some(dest) = navigate(target, &entry.path) {
                coerce(ctx, &path, &property.value, dest, entry.decl);
            }
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Flattened dotted-path view of one property tree, tracking which
/// properties some target consumed.
///
/// Nesting levels are joined with `.`. Property names themselves never
/// contain a dot (the external parser's identifier rules guarantee it), and
/// the accounting here relies on that to keep paths unambiguous.
///
/// Consumption is two-grained: `consumed` means the name matched a field in
/// some target, `descended` means some target actually recursed into a
/// map-shaped value. The distinction keeps error suppression honest across
/// targets: a map rejected by one target with a coercion error must not hide
/// children that another target's recursion left unmatched.
#[derive(Debug, Default)]
pub(crate) struct PropertyIndex {
    entries: Vec<IndexEntry>,
    by_path: HashMap<String, usize>,
}

#[derive(Debug)]
struct IndexEntry {
    path: String,
    pos: Pos,
    consumed: bool,
    descended: bool,
}

impl PropertyIndex {
    /// Build the index in tree order, reporting duplicate names per level.
    pub(crate) fn build(properties: &[Property], errors: &mut Vec<BindError>) -> Self {
        let mut index = PropertyIndex::default();
        index.add_level(properties, "", errors);
        index
    }

    fn add_level(&mut self, properties: &[Property], prefix: &str, errors: &mut Vec<BindError>) {
        let mut seen: Vec<&str> = Vec::with_capacity(properties.len());
        for property in properties {
            let path = join(prefix, &property.name);
            if seen.contains(&property.name.as_str()) {
                errors.push(BindError::DuplicateProperty {
                    name: path,
                    pos: property.pos,
                });
                continue;
            }
            seen.push(&property.name);

            self.by_path.insert(path.clone(), self.entries.len());
            self.entries.push(IndexEntry {
                path: path.clone(),
                pos: property.pos,
                consumed: false,
                descended: false,
            });

            if let ValueData::Map(children) = &property.value.data {
                self.add_level(children, &path, errors);
            }
        }
    }

    /// Mark one dotted path as consumed. Unknown paths are ignored.
    pub(crate) fn mark(&mut self, path: &str) {
        if let Some(&i) = self.by_path.get(path) {
            self.entries[i].consumed = true;
        }
    }

    /// Mark a map-shaped path as consumed by actually recursing into it.
    pub(crate) fn mark_descended(&mut self, path: &str) {
        if let Some(&i) = self.by_path.get(path) {
            self.entries[i].consumed = true;
            self.entries[i].descended = true;
        }
    }

    /// Append one `UnrecognizedProperty` per unconsumed property, shallowest
    /// path only: children of an unconsumed map are suppressed in favor of
    /// their parent, and children of a map no target descended into are
    /// suppressed in favor of the coercion error the map itself produced.
    pub(crate) fn append_unrecognized(&self, errors: &mut Vec<BindError>) {
        for entry in &self.entries {
            if entry.consumed {
                continue;
            }
            let report = match entry.path.rsplit_once('.') {
                None => true,
                Some((parent_path, _)) => self
                    .by_path
                    .get(parent_path)
                    .map(|&i| {
                        let parent = &self.entries[i];
                        parent.consumed && parent.descended
                    })
                    .unwrap_or(true),
            };
            if report {
                errors.push(BindError::UnrecognizedProperty {
                    name: entry.path.clone(),
                    pos: entry.pos,
                });
            }
        }
    }

    /// Whether any top-level property was consumed
    pub(crate) fn any_root_consumed(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.consumed && !e.path.contains('.'))
    }
}
