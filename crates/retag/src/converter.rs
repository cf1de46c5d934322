// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entry points: retag a value, or just resolve a type.
//!
//! A [`Converter`] pairs a [`Config`] with its own [`TypeCache`]. The free
//! functions [`transform`] and [`resolve_type`] use the process-wide
//! converter, configured from the environment on first use.

use crate::cache::TypeCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::reflect::Reflect;
use crate::rule::{RuleKey, TagMaker};
use crate::types::TypeRef;
use crate::view::{self, RecordView};
use crate::walker::Walker;
use std::hash::Hash;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Converter> = OnceLock::new();

/// Retagging engine with its own memo of transformed types.
pub struct Converter {
    config: Config,
    cache: TypeCache,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: TypeCache::new(),
        }
    }

    /// Process-wide converter, configured by [`Config::from_env`] on first use.
    pub fn global() -> &'static Converter {
        GLOBAL.get_or_init(|| {
            let config = Config::from_env();
            log::debug!("[retag] process-wide converter initialized: {:?}", config);
            Self::new(config)
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Transformed equivalent of `ty` under an erased rule.
    pub fn resolve(&self, ty: &TypeRef, rule: &RuleKey) -> Result<TypeRef> {
        Walker::new(&self.cache, &self.config).resolve(ty, rule)
    }

    /// Transformed equivalent of `ty` under `rule`.
    pub fn resolve_type<R>(&self, ty: &TypeRef, rule: &R) -> Result<TypeRef>
    where
        R: TagMaker + Eq + Hash + Clone,
    {
        self.resolve(ty, &RuleKey::new(rule.clone()))
    }

    /// View `value` under its retagged record type, without copying.
    ///
    /// Fails with [`Error::InvalidArgument`] when `T` is not a record, and
    /// with any error the type graph produces (unsupported kinds, unexported
    /// field conflicts). When no tag changes, the view uses `T`'s own
    /// descriptor.
    pub fn transform<'a, T, R>(&self, value: &'a T, rule: &R) -> Result<RecordView<'a>>
    where
        T: Reflect,
        R: TagMaker + Eq + Hash + Clone,
    {
        let source = T::type_ref();
        if !source.is_record() {
            return Err(Error::InvalidArgument {
                type_name: source.name().to_string(),
                kind: source.kind_tag(),
            });
        }

        let target = self.resolve_type(&source, rule)?;
        // SAFETY: `target` is `T`'s own descriptor or was derived from it by
        // the walker and passed the layout check; `Reflect` guarantees the
        // source descriptor matches `T`.
        Ok(unsafe { view::cast(value, target) })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// View `value` under its retagged record type using the process-wide
/// converter.
///
/// ```
/// use retag::rule::{Case, TagFromName};
/// use retag::Reflect;
///
/// #[derive(Reflect)]
/// pub struct User {
///     pub user_id: u64,
///     #[retag(tag = r#"db:"name""#)]
///     pub display_name: String,
/// }
///
/// let user = User { user_id: 7, display_name: "ada".into() };
/// let rule = TagFromName::new("json").case(Case::Camel);
/// let view = retag::transform(&user, &rule)?;
///
/// assert_eq!(view.tag(0).map(|t| t.as_str()), Some(r#"json:"userId""#));
/// assert_eq!(*view.field(0)?.get::<u64>()?, 7);
/// # Ok::<(), retag::Error>(())
/// ```
pub fn transform<'a, T, R>(value: &'a T, rule: &R) -> Result<RecordView<'a>>
where
    T: Reflect,
    R: TagMaker + Eq + Hash + Clone,
{
    Converter::global().transform(value, rule)
}

/// Transformed equivalent of `ty` using the process-wide converter.
pub fn resolve_type<R>(ty: &TypeRef, rule: &R) -> Result<TypeRef>
where
    R: TagMaker + Eq + Hash + Clone,
{
    Converter::global().resolve_type(ty, rule)
}
