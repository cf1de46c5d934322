// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tag rules: how new annotations are generated.
//!
//! A rule is a pure function of `(record type, field index)`. Its *value*
//! is part of the cache key, so a rule must not depend on mutable external
//! state and must compare equal only to rules that would generate the same
//! tags. Two rule values that happen to produce identical tags but compare
//! unequal simply miss each other's cache entries.
//!
//! ```
//! use retag::{Tag, TagMaker, TypeRef};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! struct JsonNames;
//!
//! impl TagMaker for JsonNames {
//!     fn make_tag(&self, record: &TypeRef, field_index: usize) -> Tag {
//!         match record.field_at(field_index) {
//!             Some(field) => Tag::pair("json", field.name()),
//!             None => Tag::default(),
//!         }
//!     }
//! }
//! ```

use crate::types::{Tag, TypeRef};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Generates the tag of one field of a record type.
pub trait TagMaker: Send + Sync + 'static {
    /// Tag for field `field_index` of `record`.
    ///
    /// Must behave like a pure function of its inputs and of `self`.
    fn make_tag(&self, record: &TypeRef, field_index: usize) -> Tag;
}

trait ErasedRule: Send + Sync {
    fn erased_make_tag(&self, record: &TypeRef, field_index: usize) -> Tag;
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ErasedRule) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn erased_name(&self) -> &'static str;
}

impl<R> ErasedRule for R
where
    R: TagMaker + Eq + Hash,
{
    fn erased_make_tag(&self, record: &TypeRef, field_index: usize) -> Tag {
        self.make_tag(record, field_index)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedRule) -> bool {
        other
            .as_any()
            .downcast_ref::<R>()
            .is_some_and(|other| other == self)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<R>().hash(&mut state);
        self.hash(&mut state);
    }

    fn erased_name(&self) -> &'static str {
        type_name::<R>()
    }
}

/// Type-erased, value-comparable rule usable as part of a cache key.
///
/// Equality requires the same concrete rule type *and* equal values.
#[derive(Clone)]
pub struct RuleKey(Arc<dyn ErasedRule>);

impl RuleKey {
    pub fn new<R>(rule: R) -> Self
    where
        R: TagMaker + Eq + Hash,
    {
        Self(Arc::new(rule))
    }

    pub fn make_tag(&self, record: &TypeRef, field_index: usize) -> Tag {
        self.0.erased_make_tag(record, field_index)
    }

    /// Name of the concrete rule type.
    pub fn rule_name(&self) -> &'static str {
        self.0.erased_name()
    }
}

impl PartialEq for RuleKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(&*other.0)
    }
}

impl Eq for RuleKey {}

impl Hash for RuleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl fmt::Debug for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuleKey").field(&self.rule_name()).finish()
    }
}

// ============================================================================
// Ready-made rules
// ============================================================================

/// Rule that reproduces every field's current tag.
///
/// Transforming with `KeepTags` only synthesizes a type when some nested
/// type changes, which never happens for this rule alone: the result is the
/// source type itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeepTags;

impl TagMaker for KeepTags {
    fn make_tag(&self, record: &TypeRef, field_index: usize) -> Tag {
        record
            .field_at(field_index)
            .map(|field| field.tag().clone())
            .unwrap_or_default()
    }
}

/// Naming convention applied by [`TagFromName`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Case {
    /// Field name as declared.
    #[default]
    AsIs,
    /// `user_id`
    Snake,
    /// `userId`
    Camel,
    /// `UserId`
    Pascal,
    /// `user-id`
    Kebab,
    /// `USER_ID`
    ScreamingSnake,
}

impl Case {
    /// Apply the convention to `name`.
    pub fn apply(self, name: &str) -> String {
        if self == Self::AsIs {
            return name.to_string();
        }
        let words = split_words(name);
        match self {
            Self::AsIs => name.to_string(),
            Self::Snake => join_lower(&words, "_"),
            Self::Kebab => join_lower(&words, "-"),
            Self::ScreamingSnake => words
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Self::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        }
    }
}

/// Split on separators and case changes. A run of capitals ends one letter
/// early when a lowercase letter follows it (`HTTPServer` -> `HTTP`, `Server`).
fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn join_lower(words: &[String], sep: &str) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Rule emitting `key:"<field name>"`, with the name in a chosen [`Case`].
///
/// ```
/// use retag::rule::{Case, TagFromName};
///
/// let rule = TagFromName::new("json").case(Case::Camel).keep_existing(true);
/// assert_eq!(rule.key(), "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagFromName {
    key: String,
    case: Case,
    keep_existing: bool,
}

impl TagFromName {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            case: Case::AsIs,
            keep_existing: false,
        }
    }

    #[must_use]
    pub fn case(mut self, case: Case) -> Self {
        self.case = case;
        self
    }

    /// Keep the other pairs of the existing tag, only setting `key`.
    #[must_use]
    pub fn keep_existing(mut self, keep: bool) -> Self {
        self.keep_existing = keep;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TagMaker for TagFromName {
    fn make_tag(&self, record: &TypeRef, field_index: usize) -> Tag {
        let Some(field) = record.field_at(field_index) else {
            return Tag::default();
        };
        let value = self.case.apply(field.name());
        if self.keep_existing {
            field.tag().with(&self.key, &value)
        } else {
            Tag::pair(&self.key, &value)
        }
    }
}
