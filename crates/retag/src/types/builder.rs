// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for hand-written type descriptors.
//!
//! Records built here use C-style sequential layout (`#[repr(C)]` rules).
//! Container helpers size themselves like their standard library
//! counterparts so hand-built graphs mirror what `#[derive(Reflect)]`
//! produces.

use crate::layout;
use crate::types::{FieldDescriptor, PrimitiveKind, Tag, TypeDescriptor, TypeKind, TypeRef};
use std::collections::HashMap;
use std::mem::{align_of, size_of};

/// Builder for record descriptors.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an exported field.
    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldDescriptor::new(name, ty, 0));
        self
    }

    /// Add an exported field carrying a tag.
    pub fn tagged_field(
        mut self,
        name: impl Into<String>,
        ty: TypeRef,
        tag: impl Into<Tag>,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, ty, 0).with_tag(tag));
        self
    }

    /// Add a non-exported field.
    pub fn private_field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, ty, 0).exported(false));
        self
    }

    /// Add a primitive exported field.
    pub fn primitive_field(self, name: impl Into<String>, kind: PrimitiveKind) -> Self {
        self.field(name, TypeRef::primitive(kind))
    }

    /// Build the descriptor, assigning sequential offsets.
    pub fn build(mut self) -> TypeRef {
        let (size, align) = layout::sequential(&mut self.fields);
        TypeRef::new(TypeDescriptor::record(self.name, self.fields, size, align))
    }
}

/// Thin pointer to `pointee`.
pub fn pointer_to(pointee: TypeRef) -> TypeRef {
    let name = format!("Box<{}>", pointee.name());
    TypeRef::new(TypeDescriptor::new(
        name,
        TypeKind::Pointer(pointee),
        size_of::<Box<u8>>(),
        align_of::<Box<u8>>(),
    ))
}

/// Growable list of `element`.
pub fn list_of(element: TypeRef) -> TypeRef {
    let name = format!("Vec<{}>", element.name());
    TypeRef::new(TypeDescriptor::new(
        name,
        TypeKind::List(element),
        size_of::<Vec<u8>>(),
        align_of::<Vec<u8>>(),
    ))
}

/// Fixed-length array of `len` elements.
pub fn array_of(element: TypeRef, len: usize) -> TypeRef {
    let name = format!("[{}; {}]", element.name(), len);
    let size = element.size() * len;
    let align = element.align();
    TypeRef::new(TypeDescriptor::new(
        name,
        TypeKind::Array { element, len },
        size,
        align,
    ))
}

/// Map from `key` to `value`.
pub fn map_of(key: TypeRef, value: TypeRef) -> TypeRef {
    let name = format!("HashMap<{}, {}>", key.name(), value.name());
    TypeRef::new(TypeDescriptor::new(
        name,
        TypeKind::Map { key, value },
        size_of::<HashMap<u8, u8>>(),
        align_of::<HashMap<u8, u8>>(),
    ))
}

/// Leaf of an arbitrary kind, sized like a pointer.
///
/// Useful for describing function pointers, channels, raw pointers and trait
/// objects in hand-built graphs.
pub fn leaf(name: impl Into<String>, kind: TypeKind) -> TypeRef {
    TypeRef::new(TypeDescriptor::new(
        name,
        kind,
        size_of::<usize>(),
        align_of::<usize>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sequential_layout() {
        let point = TypeDescriptorBuilder::new("Packet")
            .primitive_field("flag", PrimitiveKind::U8)
            .primitive_field("value", PrimitiveKind::U32)
            .tagged_field("id", TypeRef::primitive(PrimitiveKind::U16), r#"json:"id""#)
            .build();

        let fields = point.fields().expect("record");
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].offset(), 0);
        assert_eq!(fields[1].offset(), 4);
        assert_eq!(fields[2].offset(), 8);
        assert_eq!(fields[2].tag().get("json"), "id");
        assert_eq!(point.size(), 12);
        assert_eq!(point.align(), 4);
    }

    #[test]
    fn test_builder_private_field() {
        let record = TypeDescriptorBuilder::new("Secret")
            .private_field("hidden", TypeRef::primitive(PrimitiveKind::U64))
            .build();
        let field = record.field("hidden").expect("field");
        assert!(!field.is_exported());
    }

    #[test]
    fn test_container_helpers() {
        let elem = TypeRef::primitive(PrimitiveKind::U16);
        let arr = array_of(elem.clone(), 5);
        assert_eq!(arr.size(), 10);
        assert_eq!(arr.align(), 2);
        assert_eq!(arr.name(), "[u16; 5]");

        let list = list_of(elem.clone());
        assert_eq!(list.size(), size_of::<Vec<u16>>());

        let ptr = pointer_to(elem.clone());
        assert_eq!(ptr.size(), size_of::<Box<u16>>());

        let map = map_of(elem.clone(), elem);
        assert_eq!(map.size(), size_of::<HashMap<u16, u16>>());
    }

    #[test]
    fn test_empty_record() {
        let record = TypeDescriptorBuilder::new("Unit").build();
        assert_eq!(record.size(), 0);
        assert_eq!(record.align(), 1);
        assert_eq!(record.fields().map(<[_]>::len), Some(0));
    }
}
