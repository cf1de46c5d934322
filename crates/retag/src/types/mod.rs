// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptors.
//!
//! - [`TypeDescriptor`]: name, [`TypeKind`], size and alignment of a type
//! - [`TypeRef`]: shared handle with identity equality
//! - [`FieldDescriptor`]: record member (type, offset, visibility, [`Tag`])
//! - [`TypeDescriptorBuilder`]: hand-built records with `repr(C)` layout

mod builder;
mod descriptor;
mod kind;
mod tag;

pub use builder::{array_of, leaf, list_of, map_of, pointer_to, TypeDescriptorBuilder};
pub use descriptor::{FieldDescriptor, TypeDescriptor, TypeRef};
pub use kind::{Kind, PrimitiveKind, TypeKind};
pub use tag::{Pairs, Tag};
