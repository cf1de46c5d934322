// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # retag - zero-copy field annotation rewriting
//!
//! Rewrites the per-field annotations ("tags") of a record type with a
//! caller-supplied rule and hands back the *same* memory viewed under the
//! rewritten type. Nothing is copied: the result aliases the original value.
//!
//! ## Quick Start
//!
//! ```rust
//! use retag::rule::TagFromName;
//! use retag::Reflect;
//!
//! #[derive(Reflect)]
//! pub struct Reading {
//!     pub sensor: String,
//!     pub value: f64,
//! }
//!
//! fn main() -> retag::Result<()> {
//!     let reading = Reading { sensor: "t0".into(), value: 21.5 };
//!     let view = retag::transform(&reading, &TagFromName::new("json"))?;
//!
//!     assert_eq!(view.as_ptr(), std::ptr::from_ref(&reading).cast());
//!     assert_eq!(view.field_by_name("value")?.tag().get("json"), "value");
//!     assert_eq!(*view.field(1)?.get::<f64>()?, 21.5);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! transform(&value, &rule)
//!   |
//!   +-> Reflect::type_ref()        interned descriptor of the Rust type
//!   +-> Walker::resolve            memoized per (type, rule) in TypeCache
//!   |     +-> records: rebuild fields, regenerate tags, layout check
//!   |     +-> Box / [T; N] / Vec / maps: rebuild around transformed elements
//!   +-> view::cast                 reinterpret &value, no copy
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeRef`] | Shared descriptor handle, equal only to itself |
//! | [`TagMaker`] | Rule producing a field's new tag |
//! | [`Converter`] | Engine: configuration plus its own type cache |
//! | [`RecordView`] | Borrowed value seen through a transformed type |
//!
//! Function pointers, channels, raw pointers and trait objects anywhere in an
//! exported part of the type graph make the transformation fail with
//! [`Error::UnsupportedTypeKind`]. Self-referential types are not supported.

// Allow the derive macro to work inside this crate's tests
extern crate self as retag;

/// Memo of transformed types keyed by `(type, rule)`.
pub mod cache;
/// Engine configuration (environment capability flags).
pub mod config;
mod converter;
mod error;
/// Layout computation and the same-layout check.
pub mod layout;
/// `Reflect` trait, type registry and standard library descriptors.
pub mod reflect;
/// Tag rules and the erased rule key.
pub mod rule;
/// Runtime type descriptors.
pub mod types;
/// Zero-copy record views.
pub mod view;
mod walker;

pub use cache::{CacheKey, LookupStats, TypeCache};
pub use config::Config;
pub use converter::{resolve_type, transform, Converter};
pub use error::{Error, Result};
pub use reflect::{type_of, Reflect};
pub use rule::{RuleKey, TagMaker};
pub use types::{FieldDescriptor, Kind, Tag, TypeDescriptor, TypeDescriptorBuilder, TypeKind, TypeRef};
pub use view::{FieldView, RecordView};

// Derive macro (for #[derive(retag::Reflect)])
pub use retag_derive::Reflect;
