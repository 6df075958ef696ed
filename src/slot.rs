//! Polymorphic slot resolution (v0.1)
//!
//! A capability-typed slot holds exactly one concrete variant at a time. The
//! variant is normally chosen before binding: the caller seeds the slot with
//! an instance whose type upstream logic already picked (typically a
//! `clone_empty` of a typed template). Resolution then just reuses that
//! instance and binds into it.
//!
//! Choosing a concrete type for an *empty* slot is registry policy, not
//! engine policy, so it is injected through [`SlotResolver`]. Without a
//! resolver, binding into an empty slot fails with an explicit error.

use tracing::trace;

use crate::target::{Slot, TargetStruct};

/// Strategy for populating an empty capability slot, supplied by the
/// external module-type registry.
pub trait SlotResolver {
    /// A fresh concrete instance for the slot behind `field_name`, or `None`
    /// if this resolver has no mapping for it.
    fn instantiate(&self, field_name: &str) -> Option<Box<dyn TargetStruct>>;
}

/// A resolver that never instantiates; the binder's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl SlotResolver for NoResolver {
    fn instantiate(&self, _field_name: &str) -> Option<Box<dyn TargetStruct>> {
        None
    }
}

/// The concrete instance to bind into, reusing a pre-seeded one or asking
/// the resolver to fill an empty slot.
///
/// `None` means the slot stays empty and the caller must report
/// [`crate::BindError::UnresolvedSlot`].
pub fn resolve<'a>(
    slot: &'a mut Slot,
    field_name: &str,
    resolver: &dyn SlotResolver,
) -> Option<&'a mut dyn TargetStruct> {
    if slot.is_none() {
        if let Some(instance) = resolver.instantiate(field_name) {
            trace!(field = field_name, "resolver supplied slot instance");
            *slot = Some(instance);
        }
    }
    slot.as_deref_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{FieldDecl, FieldKind, FieldMut};

    #[derive(Debug, Default)]
    struct Payload {
        s: String,
    }

    impl Payload {
        const DECLS: &'static [FieldDecl] = &[FieldDecl::new("s", FieldKind::String)];
    }

    impl TargetStruct for Payload {
        fn decls(&self) -> &'static [FieldDecl] {
            Self::DECLS
        }

        fn field_mut(&mut self, index: usize) -> FieldMut<'_> {
            match index {
                0 => FieldMut::String(&mut self.s),
                _ => FieldMut::Opaque,
            }
        }

        fn clone_empty(&self) -> Box<dyn TargetStruct> {
            Box::new(Self::default())
        }
    }

    struct PayloadResolver;

    impl SlotResolver for PayloadResolver {
        fn instantiate(&self, field_name: &str) -> Option<Box<dyn TargetStruct>> {
            (field_name == "carrier").then(|| Box::new(Payload::default()) as Box<dyn TargetStruct>)
        }
    }

    #[test]
    fn preseeded_instance_is_reused() {
        let mut slot: Slot = Some(Box::new(Payload {
            s: "seeded".into(),
        }));

        let inner = resolve(&mut slot, "carrier", &NoResolver).unwrap();
        assert_eq!(inner.downcast_ref::<Payload>().unwrap().s, "seeded");
    }

    #[test]
    fn empty_slot_without_resolver_fails() {
        let mut slot: Slot = None;
        assert!(resolve(&mut slot, "carrier", &NoResolver).is_none());
        assert!(slot.is_none());
    }

    #[test]
    fn resolver_fills_empty_slot() {
        let mut slot: Slot = None;
        assert!(resolve(&mut slot, "carrier", &PayloadResolver).is_some());
        assert!(slot.is_some());
    }

    #[test]
    fn declining_resolver_leaves_slot_empty() {
        let mut slot: Slot = None;
        assert!(resolve(&mut slot, "other", &PayloadResolver).is_none());
        assert!(slot.is_none());
    }
}
