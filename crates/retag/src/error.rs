// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every retag operation.
//!
//! All failures are fatal to the calling operation: no partially transformed
//! type is ever returned or cached.

use crate::types::Kind;
use thiserror::Error;

/// Errors returned by type resolution, layout validation and views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // ========================================================================
    // Entry point
    // ========================================================================
    /// The value handed to `transform` is not a record.
    #[error("invalid argument: expected a reference to a record, got `{type_name}` ({kind})")]
    InvalidArgument { type_name: String, kind: Kind },

    // ========================================================================
    // Type graph
    // ========================================================================
    /// The type graph reaches a function, channel, raw pointer or interface.
    #[error("unsupported type kind `{kind}` in `{type_name}`")]
    UnsupportedTypeKind { kind: Kind, type_name: String },

    /// Tags must change on a record that also carries non-exported fields.
    #[error("unable to change tags for type `{type_name}`: it contains unexported field `{field}`")]
    UnexportedFieldConflict { type_name: String, field: String },

    /// A synthesized record does not overlay its source byte for byte.
    ///
    /// Derived descriptors never trigger this. A hand-built record whose
    /// declared size disagrees with its fields does.
    #[error("layout mismatch in `{type_name}`: {subject} is {actual}, expected {expected}")]
    LayoutMismatch {
        type_name: String,
        subject: String,
        expected: usize,
        actual: usize,
    },

    // ========================================================================
    // Views
    // ========================================================================
    /// Field index or name does not exist on the viewed record.
    #[error("record `{type_name}` has no field `{field}`")]
    NoSuchField { type_name: String, field: String },

    /// A typed read targeted a non-exported field.
    #[error("field `{field}` of `{type_name}` is not exported")]
    UnexportedField { type_name: String, field: String },

    /// A typed read asked for a different type than the field holds.
    #[error("field `{field}` holds `{actual}`, not `{expected}`")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },
}

/// Convenient alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
