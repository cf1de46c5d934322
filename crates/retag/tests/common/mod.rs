// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for retag integration tests.

#![allow(dead_code)]

use retag::{Reflect, Tag, TagMaker, TypeRef};

/// Route `log` output through the test harness (`RUST_LOG=retag=debug`).
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Reflect)]
pub struct Inner {
    pub a: u8,
    #[retag(tag = r#"db:"b""#)]
    pub b: u64,
}

/// Rule that tags every field with the same constant, carried as its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant(pub &'static str);

impl TagMaker for Constant {
    fn make_tag(&self, _record: &TypeRef, _field_index: usize) -> Tag {
        Tag::pair("x", self.0)
    }
}

/// Same tags as [`Constant`], different rule type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Twin(pub &'static str);

impl TagMaker for Twin {
    fn make_tag(&self, _record: &TypeRef, _field_index: usize) -> Tag {
        Tag::pair("x", self.0)
    }
}
