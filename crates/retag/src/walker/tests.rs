// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for the type graph walker on hand-built descriptors.

use super::*;
use crate::rule::{KeepTags, TagFromName};
use crate::types::{
    array_of, leaf, list_of, map_of, pointer_to, Kind, PrimitiveKind, TypeDescriptorBuilder,
};

fn json() -> RuleKey {
    RuleKey::new(TagFromName::new("json"))
}

fn keep() -> RuleKey {
    RuleKey::new(KeepTags)
}

fn u32_ty() -> TypeRef {
    TypeRef::primitive(PrimitiveKind::U32)
}

fn inner() -> TypeRef {
    TypeDescriptorBuilder::new("Inner")
        .primitive_field("a", PrimitiveKind::U8)
        .primitive_field("b", PrimitiveKind::U64)
        .build()
}

fn resolve(ty: &TypeRef, rule: &RuleKey) -> Result<TypeRef> {
    let cache = TypeCache::new();
    let config = Config::default();
    Walker::new(&cache, &config).resolve(ty, rule)
}

#[test]
fn identity_rule_returns_source() {
    let source = TypeDescriptorBuilder::new("Tagged")
        .tagged_field("id", u32_ty(), r#"json:"id""#)
        .field("items", list_of(inner()))
        .build();
    let result = resolve(&source, &keep()).expect("resolve");
    assert!(result.ptr_eq(&source));
}

#[test]
fn retag_rebuilds_record_with_same_layout() {
    let source = TypeDescriptorBuilder::new("Packet")
        .primitive_field("flag", PrimitiveKind::U8)
        .tagged_field("value", u32_ty(), r#"db:"v""#)
        .primitive_field("id", PrimitiveKind::U16)
        .build();

    let result = resolve(&source, &json()).expect("resolve");
    assert!(!result.ptr_eq(&source));
    assert_eq!(result.name(), "Packet");
    assert_eq!(result.size(), source.size());
    assert_eq!(result.align(), source.align());

    let before = source.fields().expect("record");
    let after = result.fields().expect("record");
    let names: Vec<_> = after.iter().map(FieldDescriptor::name).collect();
    assert_eq!(names, vec!["flag", "value", "id"]);
    for (old, new) in before.iter().zip(after) {
        assert_eq!(old.offset(), new.offset());
        assert!(old.ty().ptr_eq(new.ty()));
        assert_eq!(new.tag().get("json"), old.name());
    }
    assert!(after[1].tag().lookup("db").is_none());
}

#[test]
fn memoized_per_type_and_rule() {
    let cache = TypeCache::new();
    let config = Config::default();
    let walker = Walker::new(&cache, &config);
    let source = inner();

    let first = walker.resolve(&source, &json()).expect("resolve");
    let second = walker.resolve(&source, &json()).expect("resolve");
    assert!(first.ptr_eq(&second));

    let yaml = RuleKey::new(TagFromName::new("yaml"));
    let third = walker.resolve(&source, &yaml).expect("resolve");
    assert!(!third.ptr_eq(&first));
    assert!(cache.stats().hits >= 1);
}

#[test]
fn zero_field_record_is_identity() {
    let empty = TypeDescriptorBuilder::new("Empty").build();
    let result = resolve(&empty, &json()).expect("resolve");
    assert!(result.ptr_eq(&empty));
}

#[test]
fn private_field_blocks_retagging() {
    let source = TypeDescriptorBuilder::new("Account")
        .primitive_field("name", PrimitiveKind::String)
        .private_field("secret", u32_ty())
        .private_field("nonce", u32_ty())
        .build();

    let err = resolve(&source, &json()).expect_err("conflict");
    assert_eq!(
        err,
        Error::UnexportedFieldConflict {
            type_name: "Account".into(),
            field: "secret".into(),
        }
    );
}

#[test]
fn private_field_is_fine_when_nothing_changes() {
    let source = TypeDescriptorBuilder::new("Account")
        .tagged_field("name", TypeRef::primitive(PrimitiveKind::String), r#"json:"name""#)
        .private_field("secret", u32_ty())
        .build();

    let result = resolve(&source, &json()).expect("identity");
    assert!(result.ptr_eq(&source));
    let result = resolve(&source, &keep()).expect("identity");
    assert!(result.ptr_eq(&source));
}

#[test]
fn private_field_types_are_not_walked() {
    let source = TypeDescriptorBuilder::new("Callbacks")
        .primitive_field("id", PrimitiveKind::U32)
        .private_field("hook", leaf("fn()", TypeKind::Function))
        .build();
    let result = resolve(&source, &keep()).expect("private fn is skipped");
    assert!(result.ptr_eq(&source));
}

#[test]
fn containers_carry_transformed_elements() {
    let cache = TypeCache::new();
    let config = Config::default();
    let walker = Walker::new(&cache, &config);
    let element = inner();
    let element_new = walker.resolve(&element, &json()).expect("inner");
    assert!(!element_new.ptr_eq(&element));

    let list = list_of(element.clone());
    let list_new = walker.resolve(&list, &json()).expect("list");
    assert_eq!(list_new.name(), list.name());
    assert_eq!(list_new.size(), list.size());
    match list_new.kind() {
        TypeKind::List(e) => assert!(e.ptr_eq(&element_new)),
        other => panic!("expected list, got {other:?}"),
    }

    let ptr = pointer_to(element.clone());
    match walker.resolve(&ptr, &json()).expect("pointer").kind() {
        TypeKind::Pointer(e) => assert!(e.ptr_eq(&element_new)),
        other => panic!("expected pointer, got {other:?}"),
    }

    let arr = array_of(element.clone(), 3);
    let arr_new = walker.resolve(&arr, &json()).expect("array");
    assert_eq!(arr_new.size(), arr.size());
    match arr_new.kind() {
        TypeKind::Array { element: e, len } => {
            assert!(e.ptr_eq(&element_new));
            assert_eq!(*len, 3);
        }
        other => panic!("expected array, got {other:?}"),
    }

    let key = TypeRef::primitive(PrimitiveKind::String);
    let map = map_of(key.clone(), element);
    match walker.resolve(&map, &json()).expect("map").kind() {
        TypeKind::Map { key: k, value } => {
            assert!(k.ptr_eq(&key));
            assert!(value.ptr_eq(&element_new));
        }
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn leaf_containers_are_identity() {
    let list = list_of(u32_ty());
    assert!(resolve(&list, &json()).expect("list").ptr_eq(&list));

    let map = map_of(u32_ty(), list_of(u32_ty()));
    assert!(resolve(&map, &json()).expect("map").ptr_eq(&map));

    let opaque = leaf("Duration", TypeKind::Opaque);
    assert!(resolve(&opaque, &json()).expect("opaque").ptr_eq(&opaque));
}

#[test]
fn unsupported_kinds_fail_even_without_changes() {
    for (name, kind) in [
        ("fn()", TypeKind::Function),
        ("Sender<u8>", TypeKind::Channel),
        ("*const u8", TypeKind::RawPointer),
        ("Arc<dyn Any>", TypeKind::Interface),
    ] {
        let expected = kind.tag();
        assert!(expected.is_unsupported());
        let source = TypeDescriptorBuilder::new("Holder")
            .tagged_field("value", leaf(name, kind), r#"json:"value""#)
            .build();
        let err = resolve(&source, &json()).expect_err("unsupported");
        assert_eq!(
            err,
            Error::UnsupportedTypeKind {
                kind: expected,
                type_name: name.into(),
            }
        );
    }
}

#[test]
fn unsupported_element_inside_list() {
    let source = list_of(leaf("fn(u8)", TypeKind::Function));
    let err = resolve(&source, &keep()).expect_err("unsupported");
    assert!(matches!(
        err,
        Error::UnsupportedTypeKind {
            kind: Kind::Function,
            ..
        }
    ));
}

#[test]
fn failed_resolution_is_not_cached() {
    let cache = TypeCache::new();
    let config = Config::default();
    let walker = Walker::new(&cache, &config);
    let source = TypeDescriptorBuilder::new("Holder")
        .field("cb", leaf("fn()", TypeKind::Function))
        .build();

    assert!(walker.resolve(&source, &json()).is_err());
    assert!(cache.get(&CacheKey::new(source, json())).is_none());
}

#[test]
fn declared_size_disagreeing_with_fields_is_rejected() {
    let field = FieldDescriptor::new("id", u32_ty(), 0);
    let source = TypeRef::new(TypeDescriptor::record("Padded", vec![field], 16, 4));

    let err = resolve(&source, &json()).expect_err("layout");
    assert_eq!(
        err,
        Error::LayoutMismatch {
            type_name: "Padded".into(),
            subject: "size".into(),
            expected: 16,
            actual: 4,
        }
    );
}

#[test]
fn reordered_offsets_are_preserved() {
    let fields = vec![
        FieldDescriptor::new("small", TypeRef::primitive(PrimitiveKind::U8), 8),
        FieldDescriptor::new("big", TypeRef::primitive(PrimitiveKind::U64), 0),
    ];
    let source = TypeRef::new(TypeDescriptor::record("Reordered", fields, 16, 8));

    let result = resolve(&source, &json()).expect("resolve");
    let offsets: Vec<_> = result
        .fields()
        .expect("record")
        .iter()
        .map(FieldDescriptor::offset)
        .collect();
    assert_eq!(offsets, vec![8, 0]);
    assert_eq!(result.size(), 16);
}

#[test]
fn nested_record_change_propagates_outward() {
    let element = inner();
    let outer = TypeDescriptorBuilder::new("Outer")
        .tagged_field("inner", element.clone(), r#"json:"inner""#)
        .build();

    // The outer tag already matches; only the nested type changes.
    let result = resolve(&outer, &json()).expect("resolve");
    assert!(!result.ptr_eq(&outer));
    let field = result.field("inner").expect("field");
    assert!(!field.ty().ptr_eq(&element));
    assert_eq!(field.ty().field("b").map(|f| f.tag().get("json").into_owned()), Some("b".into()));
}

#[test]
fn placeholder_names_follow_config() {
    let cache = TypeCache::new();
    let source = TypeDescriptorBuilder::new("Mixed")
        .primitive_field("shown", PrimitiveKind::U32)
        .private_field("hidden", u32_ty())
        .build();
    let fields = source.fields().expect("record");

    let keep_names = Config::new();
    let candidate = Walker::new(&cache, &keep_names)
        .candidate(&source, fields, &json())
        .expect("candidate");
    assert!(candidate.changed);
    assert_eq!(candidate.first_private, Some("hidden"));
    assert_eq!(candidate.fields[1].name(), "hidden");

    let strip = Config::new().with_strip_placeholder_names(true);
    let candidate = Walker::new(&cache, &strip)
        .candidate(&source, fields, &json())
        .expect("candidate");
    assert_eq!(candidate.first_private, Some("hidden"));
    assert_eq!(candidate.fields[1].name(), "");
    assert_eq!(candidate.fields[1].offset(), fields[1].offset());
    assert_eq!(candidate.fields[0].name(), "shown");
}
