// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zero-copy views of a value under a transformed record type.
//!
//! A [`RecordView`] borrows the original value and reads it through a
//! descriptor that overlays the value's layout byte for byte. Nothing is
//! copied: the view's address is the value's address, and typed reads are
//! references into the original memory.
//!
//! Typed reads are checked against descriptor identity. A field can be read
//! as `&V` only when its descriptor *is* `V::type_ref()`; fields whose type
//! was itself transformed are reached through [`FieldView::as_record`],
//! [`FieldView::deref_record`] or [`FieldView::element_record`] instead.
//!
//! Only exported fields can be read. Names, tags and types of the others
//! stay visible, but their contents do not.

use crate::error::{Error, Result};
use crate::reflect::Reflect;
use crate::types::{FieldDescriptor, Tag, TypeKind, TypeRef};
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::NonNull;

/// Reinterpret `original` as a value of the record type `target`.
///
/// # Safety
///
/// `target` must describe the memory of `T` exactly: it is either `T`'s own
/// descriptor or one derived from it by the walker, so that every field
/// offset, size and type agrees with `T`'s real layout.
pub unsafe fn cast<'a, T>(original: &'a T, target: TypeRef) -> RecordView<'a> {
    debug_assert_eq!(
        target.size(),
        size_of::<T>(),
        "view target `{}` does not match the source size",
        target
    );
    RecordView::from_raw(NonNull::from(original).cast(), target)
}

/// Borrowed record seen through a (possibly synthesized) descriptor.
pub struct RecordView<'a> {
    ptr: NonNull<u8>,
    ty: TypeRef,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> RecordView<'a> {
    fn from_raw(ptr: NonNull<u8>, ty: TypeRef) -> Self {
        Self {
            ptr,
            ty,
            _borrow: PhantomData,
        }
    }

    /// Descriptor the memory is read through.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Address of the viewed value (the original value's address).
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.ty.fields().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Field at `index`, in declaration order.
    pub fn field(&self, index: usize) -> Result<FieldView<'_, 'a>> {
        let field = self.fields().get(index).ok_or_else(|| Error::NoSuchField {
            type_name: self.ty.name().to_string(),
            field: format!("#{index}"),
        })?;
        Ok(FieldView { view: self, field })
    }

    pub fn field_by_name(&self, name: &str) -> Result<FieldView<'_, 'a>> {
        let field = self.ty.field(name).ok_or_else(|| Error::NoSuchField {
            type_name: self.ty.name().to_string(),
            field: name.to_string(),
        })?;
        Ok(FieldView { view: self, field })
    }

    /// Tag of the field at `index` under the viewed type.
    pub fn tag(&self, index: usize) -> Option<&Tag> {
        self.fields().get(index).map(FieldDescriptor::tag)
    }

    /// Iterate over all fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = FieldView<'_, 'a>> + '_ {
        self.fields()
            .iter()
            .map(move |field| FieldView { view: self, field })
    }
}

impl fmt::Debug for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordView")
            .field("ty", &self.ty)
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// One field of a [`RecordView`].
#[derive(Clone, Copy)]
pub struct FieldView<'v, 'a> {
    view: &'v RecordView<'a>,
    field: &'v FieldDescriptor,
}

impl<'v, 'a> FieldView<'v, 'a> {
    pub fn name(&self) -> &'v str {
        self.field.name()
    }

    pub fn tag(&self) -> &'v Tag {
        self.field.tag()
    }

    pub fn ty(&self) -> &'v TypeRef {
        self.field.ty()
    }

    pub fn offset(&self) -> usize {
        self.field.offset()
    }

    /// Address of the field inside the viewed value.
    pub fn as_ptr(&self) -> *const u8 {
        self.addr().as_ptr()
    }

    fn addr(&self) -> NonNull<u8> {
        offset_ptr(self.view.ptr, self.field.offset())
    }

    fn mismatch(&self, expected: impl Into<String>) -> Error {
        Error::FieldTypeMismatch {
            field: self.field.name().to_string(),
            expected: expected.into(),
            actual: self.field.ty().name().to_string(),
        }
    }

    fn readable(&self) -> Result<()> {
        if self.field.is_exported() {
            return Ok(());
        }
        Err(Error::UnexportedField {
            type_name: self.view.ty.name().to_string(),
            field: self.field.name().to_string(),
        })
    }

    /// Borrow the field as a `V`.
    ///
    /// Fails on non-exported fields and unless the field's descriptor is
    /// exactly `V::type_ref()`.
    pub fn get<V: Reflect>(&self) -> Result<&'a V> {
        self.readable()?;
        let wanted = V::type_ref();
        if *self.field.ty() != wanted {
            return Err(self.mismatch(wanted.name()));
        }
        // SAFETY: the descriptor is V's own, so the bytes at this offset are
        // a live, aligned V borrowed for 'a.
        Ok(unsafe { self.addr().cast::<V>().as_ref() })
    }

    /// View a nested record field in place.
    pub fn as_record(&self) -> Result<RecordView<'a>> {
        self.readable()?;
        let ty = self.field.ty();
        if !ty.is_record() {
            return Err(self.mismatch("record"));
        }
        Ok(RecordView::from_raw(self.addr(), ty.clone()))
    }

    /// Follow a pointer field to the record it owns.
    pub fn deref_record(&self) -> Result<RecordView<'a>> {
        self.readable()?;
        let TypeKind::Pointer(pointee) = self.field.ty().kind() else {
            return Err(self.mismatch("pointer to record"));
        };
        if !pointee.is_record() {
            return Err(self.mismatch("pointer to record"));
        }
        // SAFETY: pointer kinds are thin owning pointers to a sized pointee;
        // the pointee lives as long as the viewed value.
        let target = unsafe { self.as_ptr().cast::<NonNull<u8>>().read() };
        Ok(RecordView::from_raw(target, pointee.clone()))
    }

    /// View element `index` of an array-of-records field in place.
    pub fn element_record(&self, index: usize) -> Result<RecordView<'a>> {
        self.readable()?;
        let TypeKind::Array { element, len } = self.field.ty().kind() else {
            return Err(self.mismatch("array of records"));
        };
        if !element.is_record() {
            return Err(self.mismatch("array of records"));
        }
        if index >= *len {
            return Err(Error::NoSuchField {
                type_name: self.field.ty().name().to_string(),
                field: format!("[{index}]"),
            });
        }
        let addr = offset_ptr(self.addr(), index * element.size());
        Ok(RecordView::from_raw(addr, element.clone()))
    }
}

/// `base + offset`, for offsets taken from a descriptor overlaying `base`.
fn offset_ptr(base: NonNull<u8>, offset: usize) -> NonNull<u8> {
    // SAFETY: descriptor offsets (and in-bounds array indices) stay inside
    // the viewed allocation, and an in-bounds offset of a non-null pointer
    // is non-null.
    unsafe { NonNull::new_unchecked(base.as_ptr().add(offset)) }
}

impl fmt::Debug for FieldView<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldView")
            .field("name", &self.field.name())
            .field("ty", self.field.ty())
            .field("offset", &self.field.offset())
            .field("tag", self.field.tag())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptorBuilder;

    #[repr(C)]
    struct Pair {
        left: u32,
        right: u32,
    }

    fn pair_type() -> TypeRef {
        TypeDescriptorBuilder::new("Pair")
            .tagged_field("left", u32::type_ref(), r#"json:"l""#)
            .field("right", u32::type_ref())
            .build()
    }

    #[test]
    fn test_view_aliases_original() {
        let value = Pair { left: 7, right: 9 };
        // SAFETY: Pair is repr(C) and pair_type describes it.
        let view = unsafe { cast(&value, pair_type()) };

        assert_eq!(view.as_ptr(), std::ptr::from_ref(&value).cast::<u8>());
        assert_eq!(view.len(), 2);
        assert_eq!(view.tag(0).map(Tag::as_str), Some(r#"json:"l""#));

        let right = view.field_by_name("right").expect("field");
        let read: &u32 = right.get().expect("u32 field");
        assert_eq!(*read, 9);
        assert_eq!(std::ptr::from_ref(read), std::ptr::from_ref(&value.right));
    }

    #[test]
    fn test_typed_read_checks_identity() {
        let value = Pair { left: 1, right: 2 };
        // SAFETY: Pair is repr(C) and pair_type describes it.
        let view = unsafe { cast(&value, pair_type()) };
        let left = view.field(0).expect("field");

        let err = left.get::<i32>().expect_err("wrong type");
        assert_eq!(
            err,
            Error::FieldTypeMismatch {
                field: "left".into(),
                expected: "i32".into(),
                actual: "u32".into(),
            }
        );
        assert!(left.as_record().is_err());
        assert!(left.deref_record().is_err());
        assert!(left.element_record(0).is_err());
    }

    #[test]
    fn test_private_fields_are_not_readable() {
        let value = Pair { left: 5, right: 6 };
        let ty = TypeDescriptorBuilder::new("Pair")
            .field("left", u32::type_ref())
            .private_field("right", u32::type_ref())
            .build();
        // SAFETY: Pair is repr(C) and the descriptor matches its layout.
        let view = unsafe { cast(&value, ty) };

        assert_eq!(*view.field(0).expect("left").get::<u32>().expect("u32"), 5);

        let right = view.field_by_name("right").expect("field is listed");
        assert_eq!(right.ty(), &u32::type_ref());
        let unexported = Error::UnexportedField {
            type_name: "Pair".into(),
            field: "right".into(),
        };
        assert_eq!(right.get::<u32>().expect_err("private"), unexported);
        assert_eq!(right.as_record().expect_err("private"), unexported);
        assert_eq!(right.deref_record().expect_err("private"), unexported);
        assert_eq!(right.element_record(0).expect_err("private"), unexported);
    }

    #[test]
    fn test_missing_fields() {
        let value = Pair { left: 1, right: 2 };
        // SAFETY: Pair is repr(C) and pair_type describes it.
        let view = unsafe { cast(&value, pair_type()) };

        assert!(matches!(view.field(2), Err(Error::NoSuchField { .. })));
        assert!(matches!(
            view.field_by_name("middle"),
            Err(Error::NoSuchField { ref field, .. }) if field == "middle"
        ));
        assert!(view.tag(5).is_none());
    }

    #[test]
    fn test_iter_in_declaration_order() {
        let value = Pair { left: 3, right: 4 };
        // SAFETY: Pair is repr(C) and pair_type describes it.
        let view = unsafe { cast(&value, pair_type()) };
        let sum: u32 = view
            .iter()
            .map(|field| *field.get::<u32>().expect("u32"))
            .sum();
        assert_eq!(sum, 7);
        let names: Vec<_> = view.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["left", "right"]);
    }
}
