// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field annotations.
//!
//! A tag is an arbitrary string attached to a record field. By convention it
//! is a space-separated list of `key:"value"` pairs, where values are quoted
//! and may contain `\"`, `\\`, `\n` and `\t` escapes:
//!
//! ```
//! use retag::Tag;
//!
//! let tag = Tag::new(r#"json:"user_id,omitempty" db:"uid""#);
//! assert_eq!(tag.get("json"), "user_id,omitempty");
//! assert_eq!(tag.lookup("db").as_deref(), Some("uid"));
//! assert_eq!(tag.lookup("xml"), None);
//! ```
//!
//! Malformed input ends the scan; pairs before the malformed part remain
//! visible.

use std::borrow::Cow;
use std::fmt;

/// Annotation string attached to a record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Tag holding a single `key:"value"` pair.
    pub fn pair(key: &str, value: &str) -> Self {
        Self::default().with(key, value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> Cow<'_, str> {
        self.lookup(key).unwrap_or(Cow::Borrowed(""))
    }

    /// Value for `key`, distinguishing "absent" from "empty".
    pub fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Iterate over the well-formed `key:"value"` pairs in order.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs { rest: &self.0 }
    }

    /// Return a tag where `key` is set to `value`.
    ///
    /// An existing pair for `key` is replaced in place; otherwise the pair is
    /// appended. Other pairs are re-emitted in canonical form.
    #[must_use]
    pub fn with(&self, key: &str, value: &str) -> Self {
        let mut out = String::with_capacity(self.0.len() + key.len() + value.len() + 4);
        let mut replaced = false;
        for (k, v) in self.pairs() {
            if k == key {
                if replaced {
                    continue;
                }
                replaced = true;
                push_pair(&mut out, k, value);
            } else {
                push_pair(&mut out, k, &v);
            }
        }
        if !replaced {
            push_pair(&mut out, key, value);
        }
        Self(out)
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(key);
    out.push_str(":\"");
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Tag {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Iterator over the `key:"value"` pairs of a [`Tag`].
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.trim_start_matches(' ');
        let key_end = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
            .unwrap_or(rest.len());
        let (key, after_key) = rest.split_at(key_end);
        let Some(quoted) = after_key.strip_prefix(":\"") else {
            self.rest = "";
            return None;
        };
        if key.is_empty() {
            self.rest = "";
            return None;
        }

        let bytes = quoted.as_bytes();
        let mut escaped = false;
        let mut i = 0;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                escaped = true;
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            self.rest = "";
            return None;
        }

        let raw_value = &quoted[..i];
        self.rest = &quoted[i + 1..];
        let value = if escaped {
            Cow::Owned(unescape(raw_value))
        } else {
            Cow::Borrowed(raw_value)
        };
        Some((key, value))
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
