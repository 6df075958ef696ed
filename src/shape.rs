//! Target shape analysis with namespace caching
//!
//! Computes the flattened, order-preserving namespace of bindable fields for
//! one target structure: anonymous embedding promotes sub-fields under their
//! own names, name collisions keep every field-path, and `Mutated` fields are
//! invisible.
//!
//! Namespaces are a pure function of the target's declared type unless an
//! embedded capability slot is involved (its promoted sub-fields depend on
//! the instance currently seeded into the slot). Pure namespaces are cached
//! once per concrete type in a concurrency-safe map; instance-dependent ones
//! are recomputed per call.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::trace;

use crate::target::{FieldDecl, FieldMut, TargetStruct};

/// Cache of per-type namespaces; entries are immutable once inserted.
static NAMESPACE_CACHE: Lazy<DashMap<TypeId, Arc<Namespace>>> = Lazy::new(DashMap::new);

/// One bindable field in a flattened namespace
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub decl: &'static FieldDecl,
    /// Descriptor-table indices from the target root down to the field,
    /// through any embedded intermediates.
    pub path: Vec<usize>,
}

/// The flattened bindable namespace of one target structure
#[derive(Debug, Default)]
pub struct Namespace {
    entries: Vec<FieldEntry>,
    /// True when an embedded capability slot contributed (or withheld)
    /// promoted entries, making the namespace instance-dependent.
    dynamic: bool,
}

impl Namespace {
    /// The namespace for `target`, from the cache when the target's type
    /// permits it.
    ///
    /// Takes the target mutably only to navigate embedded fields; nothing
    /// is modified.
    pub fn of(target: &mut dyn TargetStruct) -> Arc<Namespace> {
        let type_id = {
            let any: &dyn Any = &*target;
            any.type_id()
        };

        if let Some(cached) = NAMESPACE_CACHE.get(&type_id) {
            return Arc::clone(&cached);
        }

        let namespace = Arc::new(Self::compute(target));
        trace!(
            entries = namespace.entries.len(),
            dynamic = namespace.dynamic,
            "computed bindable namespace"
        );
        if !namespace.dynamic {
            NAMESPACE_CACHE.insert(type_id, Arc::clone(&namespace));
        }
        namespace
    }

    /// Compute without consulting the cache
    pub fn compute(target: &mut dyn TargetStruct) -> Namespace {
        let mut namespace = Namespace::default();
        let mut base = Vec::new();
        walk(target, &mut base, &mut namespace);
        namespace
    }

    /// Every entry sharing `name`, in declaration order. Collisions are
    /// intentional: the binder writes one value into each of them.
    pub fn lookup<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a FieldEntry> {
        let name = name.to_owned();
        self.entries.iter().filter(move |e| e.decl.name == name)
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

fn walk(target: &mut dyn TargetStruct, base: &mut Vec<usize>, out: &mut Namespace) {
    let decls = target.decls();
    for (index, decl) in decls.iter().enumerate() {
        if decl.is_mutated() {
            continue;
        }

        if decl.embedded {
            base.push(index);
            match target.field_mut(index) {
                FieldMut::Struct(inner) => walk(inner, base, out),
                FieldMut::Slot(slot) => {
                    // Promotion depends on what is seeded into the slot, so
                    // the namespace cannot be shared across instances.
                    out.dynamic = true;
                    if let Some(inner) = slot.as_deref_mut() {
                        walk(inner, base, out);
                    }
                }
                _ => {}
            }
            base.pop();
        } else {
            let mut path = base.clone();
            path.push(index);
            out.entries.push(FieldEntry { decl, path });
        }
    }
}

/// Follow a namespace entry's path to the field it names.
///
/// Intermediate steps are embedded structs or seeded embedded slots; an
/// empty slot on the way yields `None` (the entry came from a different
/// seeding state).
pub fn navigate<'a>(target: &'a mut dyn TargetStruct, path: &[usize]) -> Option<FieldMut<'a>> {
    match path {
        [] => None,
        [last] => Some(target.field_mut(*last)),
        [first, rest @ ..] => match target.field_mut(*first) {
            FieldMut::Struct(inner) => navigate(inner, rest),
            FieldMut::Slot(slot) => navigate(slot.as_deref_mut()?, rest),
            _ => None,
        },
    }
}
