//! Value coercion and the default/merge policy (v0.1)
//!
//! Converts one parsed value into one destination field, applying the merge
//! rules that make factory-defaulted targets work:
//! - present scalars replace whatever default was pre-populated
//! - present lists append after pre-existing elements
//! - absent properties never touch the target
//!
//! The rules apply transitively: map values recurse through the binder core
//! into nested structures and capability slots.

use tracing::trace;

use crate::bind::{bind_struct, BindContext};
use crate::error::BindError;
use crate::slot;
use crate::target::{FieldDecl, FieldMut};
use crate::value::{Value, ValueData};

/// Bind `value` into one destination field.
///
/// `name` is the full dotted property path, used in diagnostics. Errors are
/// pushed onto the context; coercion of one field never aborts the pass.
pub(crate) fn coerce(
    ctx: &mut BindContext<'_>,
    name: &str,
    value: &Value,
    dest: FieldMut<'_>,
    decl: &FieldDecl,
) {
    match (dest, &value.data) {
        (FieldMut::String(dst), ValueData::String(src)) => {
            trace!(property = name, "assign string");
            *dst = src.clone();
        }
        (FieldMut::OptionString(dst), ValueData::String(src)) => {
            trace!(property = name, "assign optional string");
            *dst = Some(src.clone());
        }
        (FieldMut::Bool(dst), ValueData::Bool(src)) => {
            trace!(property = name, "assign bool");
            *dst = *src;
        }
        (FieldMut::OptionBool(dst), ValueData::Bool(src)) => {
            trace!(property = name, "assign optional bool");
            *dst = Some(*src);
        }

        (FieldMut::StringList(dst), ValueData::List(items)) => {
            let mut parsed = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match &item.data {
                    ValueData::String(s) => parsed.push(s.clone()),
                    _ => {
                        ctx.errors.push(BindError::TypeMismatch {
                            name: format!("{name}[{index}]"),
                            pos: item.pos,
                            expected: "string",
                            found: item.kind_name(),
                        });
                        return;
                    }
                }
            }
            trace!(property = name, appended = parsed.len(), "append list");
            // An empty parsed list still materializes the sequence: present
            // and empty, not absent.
            dst.get_or_insert_with(Vec::new).extend(parsed);
        }

        (FieldMut::Struct(inner), ValueData::Map(children)) => {
            ctx.index.mark_descended(name);
            bind_struct(ctx, children, inner, name, decl.filter());
        }
        (FieldMut::OptionStruct(opt), ValueData::Map(children)) => {
            ctx.index.mark_descended(name);
            bind_struct(ctx, children, opt.get_or_insert_default(), name, decl.filter());
        }
        (FieldMut::Slot(holder), ValueData::Map(children)) => {
            match slot::resolve(holder, decl.name, ctx.resolver) {
                Some(inner) => {
                    ctx.index.mark_descended(name);
                    bind_struct(ctx, children, inner, name, decl.filter());
                }
                None => {
                    ctx.errors.push(BindError::UnresolvedSlot {
                        name: name.to_owned(),
                        pos: value.pos,
                    });
                }
            }
        }

        (FieldMut::Opaque, _) => {
            ctx.errors.push(BindError::UnsupportedFieldShape {
                name: name.to_owned(),
                pos: value.pos,
            });
        }

        (dest, _) => {
            ctx.errors.push(BindError::TypeMismatch {
                name: name.to_owned(),
                pos: value.pos,
                expected: expected_kind(&dest, decl),
                found: value.kind_name(),
            });
        }
    }
}

/// Kind name for the mismatch message; trusts the declared kind, falling
/// back to the accessor shape if the table disagrees.
fn expected_kind(dest: &FieldMut<'_>, decl: &FieldDecl) -> &'static str {
    match dest {
        FieldMut::String(_) | FieldMut::OptionString(_) => "string",
        FieldMut::Bool(_) | FieldMut::OptionBool(_) => "bool",
        FieldMut::StringList(_) => "list of strings",
        FieldMut::Struct(_) | FieldMut::OptionStruct(_) | FieldMut::Slot(_) => "map",
        FieldMut::Opaque => decl.kind.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::PropertyIndex;
    use crate::slot::NoResolver;
    use crate::target::FieldKind;
    use crate::value::Pos;

    fn test_ctx() -> BindContext<'static> {
        BindContext {
            resolver: &NoResolver,
            index: PropertyIndex::build(&[], &mut Vec::new()),
            errors: Vec::new(),
        }
    }

    #[test]
    fn string_replaces_default() {
        let mut ctx = test_ctx();
        let mut dst = String::from("012");
        let decl = FieldDecl::new("string", FieldKind::String);

        coerce(
            &mut ctx,
            "string",
            &Value::string("abc", Pos::new(2, 9)),
            FieldMut::String(&mut dst),
            &decl,
        );

        assert!(ctx.errors.is_empty());
        assert_eq!(dst, "abc");
    }

    #[test]
    fn optional_scalar_marks_presence() {
        let mut ctx = test_ctx();
        let mut blank: Option<String> = None;
        let decl = FieldDecl::new("blank", FieldKind::OptionString);

        coerce(
            &mut ctx,
            "blank",
            &Value::string("", Pos::new(3, 9)),
            FieldMut::OptionString(&mut blank),
            &decl,
        );

        // Present-but-empty, not absent.
        assert_eq!(blank, Some(String::new()));
    }

    #[test]
    fn list_appends_after_defaults() {
        let mut ctx = test_ctx();
        let mut dst = Some(vec!["0".to_string(), "1".to_string()]);
        let decl = FieldDecl::new("list", FieldKind::StringList);
        let pos = Pos::new(4, 9);

        coerce(
            &mut ctx,
            "list",
            &Value::list(vec![Value::string("a", pos), Value::string("b", pos)], pos),
            FieldMut::StringList(&mut dst),
            &decl,
        );

        assert!(ctx.errors.is_empty());
        assert_eq!(dst.unwrap(), vec!["0", "1", "a", "b"]);
    }

    #[test]
    fn empty_list_becomes_present() {
        let mut ctx = test_ctx();
        let mut dst: Option<Vec<String>> = None;
        let decl = FieldDecl::new("empty", FieldKind::StringList);

        coerce(
            &mut ctx,
            "empty",
            &Value::list(vec![], Pos::new(5, 10)),
            FieldMut::StringList(&mut dst),
            &decl,
        );

        assert_eq!(dst, Some(vec![]));
    }

    #[test]
    fn non_string_list_element_names_position() {
        let mut ctx = test_ctx();
        let mut dst: Option<Vec<String>> = None;
        let decl = FieldDecl::new("list", FieldKind::StringList);

        coerce(
            &mut ctx,
            "list",
            &Value::list(
                vec![
                    Value::string("ok", Pos::new(6, 10)),
                    Value::bool(true, Pos::new(6, 16)),
                ],
                Pos::new(6, 9),
            ),
            FieldMut::StringList(&mut dst),
            &decl,
        );

        assert_eq!(ctx.errors.len(), 1);
        match &ctx.errors[0] {
            BindError::TypeMismatch { name, pos, found, .. } => {
                assert_eq!(name, "list[1]");
                assert_eq!(*pos, Pos::new(6, 16));
                assert_eq!(*found, "bool");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The offending list is not assigned at all.
        assert_eq!(dst, None);
    }

    #[test]
    fn scalar_kinds_never_cross_coerce() {
        let mut ctx = test_ctx();
        let mut dst = String::new();
        let decl = FieldDecl::new("s", FieldKind::String);

        coerce(
            &mut ctx,
            "s",
            &Value::bool(true, Pos::new(7, 8)),
            FieldMut::String(&mut dst),
            &decl,
        );

        assert_eq!(ctx.errors.len(), 1);
        match &ctx.errors[0] {
            BindError::TypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(*expected, "string");
                assert_eq!(*found, "bool");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(dst, "");
    }

    #[test]
    fn opaque_field_reports_unsupported_shape() {
        let mut ctx = test_ctx();
        let decl = FieldDecl::new("weird", FieldKind::Opaque);

        coerce(
            &mut ctx,
            "weird",
            &Value::string("x", Pos::new(8, 12)),
            FieldMut::Opaque,
            &decl,
        );

        assert!(matches!(
            ctx.errors[0],
            BindError::UnsupportedFieldShape { .. }
        ));
    }
}
