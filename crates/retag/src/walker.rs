// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive derivation of transformed types.
//!
//! The walker maps a source [`TypeRef`] to its counterpart under a rule.
//! Containers are rebuilt around their transformed element types, records are
//! rebuilt field by field with regenerated tags, and everything else is kept.
//! Every nested lookup goes through the [`TypeCache`], so shared subgraphs are
//! derived once.
//!
//! Self-referential graphs are not supported: they recurse without bound.

use crate::cache::{CacheKey, TypeCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::layout;
use crate::rule::RuleKey;
use crate::types::{FieldDescriptor, TypeDescriptor, TypeKind, TypeRef};

pub(crate) struct Walker<'c> {
    cache: &'c TypeCache,
    config: &'c Config,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(cache: &'c TypeCache, config: &'c Config) -> Self {
        Self { cache, config }
    }

    /// Transformed equivalent of `ty`, memoized per `(ty, rule)`.
    pub(crate) fn resolve(&self, ty: &TypeRef, rule: &RuleKey) -> Result<TypeRef> {
        let key = CacheKey::new(ty.clone(), rule.clone());
        self.cache
            .get_or_try_create(key, || self.make_type(ty, rule))
    }

    fn make_type(&self, ty: &TypeRef, rule: &RuleKey) -> Result<TypeRef> {
        let kind = ty.kind_tag();
        if kind.is_unsupported() {
            return Err(Error::UnsupportedTypeKind {
                kind,
                type_name: ty.name().to_string(),
            });
        }

        match ty.kind() {
            TypeKind::Record(fields) => self.make_record(ty, fields, rule),
            TypeKind::Pointer(pointee) => {
                let pointee_new = self.resolve(pointee, rule)?;
                Ok(rebuild_if(ty, pointee_new != *pointee, || {
                    TypeKind::Pointer(pointee_new.clone())
                }))
            }
            TypeKind::Array { element, len } => {
                let element_new = self.resolve(element, rule)?;
                debug_assert_eq!(element_new.size(), element.size());
                Ok(rebuild_if(ty, element_new != *element, || TypeKind::Array {
                    element: element_new.clone(),
                    len: *len,
                }))
            }
            TypeKind::List(element) => {
                let element_new = self.resolve(element, rule)?;
                Ok(rebuild_if(ty, element_new != *element, || {
                    TypeKind::List(element_new.clone())
                }))
            }
            TypeKind::Map { key, value } => {
                let key_new = self.resolve(key, rule)?;
                let value_new = self.resolve(value, rule)?;
                let changed = key_new != *key || value_new != *value;
                Ok(rebuild_if(ty, changed, || TypeKind::Map {
                    key: key_new.clone(),
                    value: value_new.clone(),
                }))
            }
            // Primitive and opaque leaves.
            _ => Ok(ty.clone()),
        }
    }

    fn make_record(
        &self,
        ty: &TypeRef,
        fields: &[FieldDescriptor],
        rule: &RuleKey,
    ) -> Result<TypeRef> {
        if fields.is_empty() {
            return Ok(ty.clone());
        }

        let candidate = self.candidate(ty, fields, rule)?;
        if !candidate.changed {
            return Ok(ty.clone());
        }
        if let Some(field) = candidate.first_private {
            log::warn!(
                "[retag] cannot retag `{}` with {:?}: unexported field `{}`",
                ty,
                rule,
                field
            );
            return Err(Error::UnexportedFieldConflict {
                type_name: ty.name().to_string(),
                field: field.to_string(),
            });
        }

        let size = layout::record_size(&candidate.fields, ty.align());
        let synthesized = TypeDescriptor::record(ty.name(), candidate.fields, size, ty.align());
        layout::check_same_layout(ty, &synthesized)?;

        log::debug!(
            "[retag] synthesized `{}` with {:?} ({} fields, {} bytes)",
            ty,
            rule,
            fields.len(),
            size
        );
        Ok(TypeRef::new(synthesized))
    }

    /// Field list of the would-be record, in declaration order.
    ///
    /// Exported fields carry their resolved type and the rule's tag.
    /// Unexported fields are copied verbatim, minus their name when the
    /// configuration asks for placeholder stripping.
    fn candidate<'f>(
        &self,
        ty: &TypeRef,
        fields: &'f [FieldDescriptor],
        rule: &RuleKey,
    ) -> Result<Candidate<'f>> {
        let mut candidate = Candidate {
            fields: Vec::with_capacity(fields.len()),
            changed: false,
            first_private: None,
        };

        for (index, field) in fields.iter().enumerate() {
            if field.is_exported() {
                let field_ty = self.resolve(field.ty(), rule)?;
                let tag = rule.make_tag(ty, index);
                candidate.changed |= field_ty != *field.ty() || tag != *field.tag();
                candidate
                    .fields
                    .push(field.clone().with_type(field_ty).with_tag(tag));
            } else {
                candidate.first_private.get_or_insert(field.name());
                let placeholder = field.clone();
                candidate
                    .fields
                    .push(if self.config.strip_placeholder_names() {
                        placeholder.into_placeholder()
                    } else {
                        placeholder
                    });
            }
        }
        Ok(candidate)
    }
}

struct Candidate<'f> {
    fields: Vec<FieldDescriptor>,
    changed: bool,
    first_private: Option<&'f str>,
}

/// Container with the source's name and footprint around a new child kind.
fn rebuild_if(ty: &TypeRef, changed: bool, kind: impl FnOnce() -> TypeKind) -> TypeRef {
    if !changed {
        return ty.clone();
    }
    TypeRef::new(TypeDescriptor::new(ty.name(), kind(), ty.size(), ty.align()))
}

#[cfg(test)]
mod tests;
