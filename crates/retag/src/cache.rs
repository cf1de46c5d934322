// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent memo of transformed types.
//!
//! Entries are keyed by `(source type, rule)` and never evicted: the set of
//! types a program can reflect is bounded, and every hit must return the very
//! same [`TypeRef`] so that results keep identity semantics. Lookups take a
//! shared lock; computation happens with no lock held, so a walk may recurse
//! into the cache for nested types.

use crate::error::Result;
use crate::rule::RuleKey;
use crate::types::TypeRef;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Identifies one transformation: the source type and the rule applied to it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ty: TypeRef,
    rule: RuleKey,
}

impl CacheKey {
    pub fn new(ty: TypeRef, rule: RuleKey) -> Self {
        Self { ty, rule }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn rule(&self) -> &RuleKey {
        &self.rule
    }
}

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Misses whose result lost the insertion race to another thread.
    pub raced: u64,
}

/// Process-wide map from [`CacheKey`] to transformed type.
#[derive(Default)]
pub struct TypeCache {
    inner: RwLock<HashMap<CacheKey, TypeRef>>,
    stats: RwLock<LookupStats>,
}

impl TypeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a finished result without computing anything.
    pub fn get(&self, key: &CacheKey) -> Option<TypeRef> {
        self.inner.read().get(key).cloned()
    }

    /// Return the cached result for `key`, computing it on a miss.
    ///
    /// `create` runs without any lock held. Failures are returned as-is and
    /// nothing is stored. If another thread stored a result for the same key
    /// while `create` ran, that stored result is returned and ours is
    /// discarded, so every caller observes a single handle per key.
    pub fn get_or_try_create<F>(&self, key: CacheKey, create: F) -> Result<TypeRef>
    where
        F: FnOnce() -> Result<TypeRef>,
    {
        if let Some(hit) = self.get(&key) {
            self.record_hit();
            return Ok(hit);
        }

        let created = create()?;

        let mut cache = self.inner.write();
        let stored = match cache.get(&key) {
            Some(existing) => {
                log::trace!(
                    "[retag] lost insertion race for `{}` with {:?}",
                    key.ty,
                    key.rule
                );
                self.record_miss(true);
                existing.clone()
            }
            None => {
                log::trace!("[retag] cached `{}` with {:?}", key.ty, key.rule);
                self.record_miss(false);
                cache.insert(key, created.clone());
                created
            }
        };
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, raced: bool) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        if raced {
            stats.raced = stats.raced.saturating_add(1);
        }
    }
}
