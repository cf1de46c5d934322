// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use super::kind::{Kind, PrimitiveKind, TypeKind};
use super::tag::Tag;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A complete type descriptor: name, shape and memory footprint.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    kind: TypeKind,
    size: usize,
    align: usize,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind, size: usize, align: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            align: align.max(1),
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(
            kind.name(),
            TypeKind::Primitive(kind),
            kind.size(),
            kind.alignment(),
        )
    }

    /// Create a record type descriptor with explicit field offsets.
    pub fn record(
        name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
        size: usize,
        align: usize,
    ) -> Self {
        Self::new(name, TypeKind::Record(fields), size, align)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes (at least 1).
    pub fn align(&self) -> usize {
        self.align
    }

    /// Check if this is a record type.
    pub fn is_record(&self) -> bool {
        matches!(self.kind, TypeKind::Record(_))
    }

    /// Get fields if this is a record.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by position.
    pub fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields()?.get(index)
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }
}

/// Field descriptor for record members.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeRef,
    exported: bool,
    tag: Tag,
    offset: usize,
}

impl FieldDescriptor {
    /// Create an exported, untagged field at `offset`.
    pub fn new(name: impl Into<String>, ty: TypeRef, offset: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            exported: true,
            tag: Tag::default(),
            offset,
        }
    }

    /// Set the exported flag.
    #[must_use]
    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Set the annotation.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Replace the declared type.
    #[must_use]
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.ty = ty;
        self
    }

    /// Move the field to `offset`.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Drop the name, keeping type, tag and placement.
    pub(crate) fn into_placeholder(mut self) -> Self {
        self.name.clear();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Byte offset from the start of the owning record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte size, taken from the declared type.
    pub fn size(&self) -> usize {
        self.ty.size()
    }

    /// One past the last byte occupied by this field.
    pub fn end(&self) -> usize {
        self.offset + self.size()
    }
}

/// Shared handle to a [`TypeDescriptor`] with identity semantics.
///
/// Two handles are equal (and hash equally) only if they point at the same
/// descriptor. Structurally identical descriptors built separately are
/// different types, just like two distinct Rust types with the same fields.
#[derive(Clone)]
pub struct TypeRef(Arc<TypeDescriptor>);

impl TypeRef {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self(Arc::new(descriptor))
    }

    /// Fresh handle to a primitive descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(TypeDescriptor::primitive(kind))
    }

    /// Check whether both handles denote the same type.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_ptr(&self) -> *const TypeDescriptor {
        Arc::as_ptr(&self.0)
    }

    pub fn kind_tag(&self) -> Kind {
        self.0.kind().tag()
    }
}

impl Deref for TypeRef {
    type Target = TypeDescriptor;

    fn deref(&self) -> &TypeDescriptor {
        &self.0
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.as_ptr(), state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({} @ {:p})", self.name(), self.as_ptr())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
