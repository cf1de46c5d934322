// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Memory layout computation and validation.
//!
//! A synthesized record is only ever used to reinterpret memory owned by its
//! source type, so the two must overlay byte for byte. [`check_same_layout`]
//! enforces that on every record the walker builds, before it is cached.

use crate::error::{Error, Result};
use crate::types::{FieldDescriptor, TypeDescriptor};

/// Round `offset` up to the next multiple of `align` (a power of two).
pub const fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Assign `repr(C)` offsets to `fields`, returning `(size, align)`.
pub fn sequential(fields: &mut [FieldDescriptor]) -> (usize, usize) {
    let mut offset = 0usize;
    let mut max_align = 1usize;
    for field in fields.iter_mut() {
        let align = field.ty().align();
        offset = align_up(offset, align);
        max_align = max_align.max(align);
        *field = field.clone().with_offset(offset);
        offset += field.size();
    }
    (align_up(offset, max_align), max_align)
}

/// Size of a record whose fields sit at explicit offsets.
///
/// The record extends to the end of its last byte, rounded up to `align`.
pub fn record_size(fields: &[FieldDescriptor], align: usize) -> usize {
    let end = fields.iter().map(FieldDescriptor::end).max().unwrap_or(0);
    align_up(end, align.max(1))
}

/// Check that `result` can alias memory laid out as `source`.
///
/// Compares total size, field count, and every field's offset and size.
pub fn check_same_layout(source: &TypeDescriptor, result: &TypeDescriptor) -> Result<()> {
    let mismatch = |subject: String, expected: usize, actual: usize| Error::LayoutMismatch {
        type_name: source.name().to_string(),
        subject,
        expected,
        actual,
    };

    if source.size() != result.size() {
        return Err(mismatch("size".into(), source.size(), result.size()));
    }

    let (Some(before), Some(after)) = (source.fields(), result.fields()) else {
        return Ok(());
    };
    if before.len() != after.len() {
        return Err(mismatch("field count".into(), before.len(), after.len()));
    }
    for (index, (old, new)) in before.iter().zip(after).enumerate() {
        if old.offset() != new.offset() {
            return Err(mismatch(
                format!("offset of field #{index} `{}`", old.name()),
                old.offset(),
                new.offset(),
            ));
        }
        if old.size() != new.size() {
            return Err(mismatch(
                format!("size of field #{index} `{}`", old.name()),
                old.size(),
                new.size(),
            ));
        }
    }
    Ok(())
}
