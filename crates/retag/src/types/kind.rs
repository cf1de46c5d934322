// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type kinds for runtime type descriptors.

use super::descriptor::{FieldDescriptor, TypeRef};
use core::fmt;
use core::mem::{align_of, size_of};

/// Primitive (leaf) type kinds.
///
/// Sizes and alignments are those of the matching Rust type on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Unit,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    /// Owned `String`.
    String,
    /// Borrowed `&'static str`.
    Str,
}

impl PrimitiveKind {
    /// Get the size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Unit => size_of::<()>(),
            Self::Bool => size_of::<bool>(),
            Self::Char => size_of::<char>(),
            Self::I8 => size_of::<i8>(),
            Self::I16 => size_of::<i16>(),
            Self::I32 => size_of::<i32>(),
            Self::I64 => size_of::<i64>(),
            Self::I128 => size_of::<i128>(),
            Self::Isize => size_of::<isize>(),
            Self::U8 => size_of::<u8>(),
            Self::U16 => size_of::<u16>(),
            Self::U32 => size_of::<u32>(),
            Self::U64 => size_of::<u64>(),
            Self::U128 => size_of::<u128>(),
            Self::Usize => size_of::<usize>(),
            Self::F32 => size_of::<f32>(),
            Self::F64 => size_of::<f64>(),
            Self::String => size_of::<String>(),
            Self::Str => size_of::<&'static str>(),
        }
    }

    /// Get the alignment requirement.
    pub const fn alignment(self) -> usize {
        match self {
            Self::Unit => align_of::<()>(),
            Self::Bool => align_of::<bool>(),
            Self::Char => align_of::<char>(),
            Self::I8 => align_of::<i8>(),
            Self::I16 => align_of::<i16>(),
            Self::I32 => align_of::<i32>(),
            Self::I64 => align_of::<i64>(),
            Self::I128 => align_of::<i128>(),
            Self::Isize => align_of::<isize>(),
            Self::U8 => align_of::<u8>(),
            Self::U16 => align_of::<u16>(),
            Self::U32 => align_of::<u32>(),
            Self::U64 => align_of::<u64>(),
            Self::U128 => align_of::<u128>(),
            Self::Usize => align_of::<usize>(),
            Self::F32 => align_of::<f32>(),
            Self::F64 => align_of::<f64>(),
            Self::String => align_of::<String>(),
            Self::Str => align_of::<&'static str>(),
        }
    }

    /// Rust spelling of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unit => "()",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
            Self::Str => "&str",
        }
    }
}

/// Shape of a type, with owned child descriptors.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Numeric, textual or boolean leaf.
    Primitive(PrimitiveKind),
    /// Struct with fields in declaration order.
    Record(Vec<FieldDescriptor>),
    /// Thin owning pointer (`Box<T>`).
    Pointer(TypeRef),
    /// Fixed-length array.
    Array { element: TypeRef, len: usize },
    /// Growable list (`Vec<T>`, `VecDeque<T>`).
    List(TypeRef),
    /// Associative container (`HashMap<K, V>`, `BTreeMap<K, V>`).
    Map { key: TypeRef, value: TypeRef },
    /// Function pointer.
    Function,
    /// Channel endpoint.
    Channel,
    /// Raw memory pointer.
    RawPointer,
    /// Trait object behind a pointer.
    Interface,
    /// Any other leaf, left untouched.
    Opaque,
}

impl TypeKind {
    /// Fieldless tag of this kind.
    pub fn tag(&self) -> Kind {
        match self {
            Self::Primitive(_) => Kind::Primitive,
            Self::Record(_) => Kind::Record,
            Self::Pointer(_) => Kind::Pointer,
            Self::Array { .. } => Kind::Array,
            Self::List(_) => Kind::List,
            Self::Map { .. } => Kind::Map,
            Self::Function => Kind::Function,
            Self::Channel => Kind::Channel,
            Self::RawPointer => Kind::RawPointer,
            Self::Interface => Kind::Interface,
            Self::Opaque => Kind::Opaque,
        }
    }
}

/// Kind of a type without its children, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Primitive,
    Record,
    Pointer,
    Array,
    List,
    Map,
    Function,
    Channel,
    RawPointer,
    Interface,
    Opaque,
}

impl Kind {
    /// Kinds the walker refuses to transform.
    pub const fn is_unsupported(self) -> bool {
        matches!(
            self,
            Self::Function | Self::Channel | Self::RawPointer | Self::Interface
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Record => "record",
            Self::Pointer => "pointer",
            Self::Array => "array",
            Self::List => "list",
            Self::Map => "map",
            Self::Function => "function",
            Self::Channel => "channel",
            Self::RawPointer => "raw pointer",
            Self::Interface => "interface",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), 1);
        assert_eq!(PrimitiveKind::U32.size(), 4);
        assert_eq!(PrimitiveKind::F64.size(), 8);
        assert_eq!(PrimitiveKind::Unit.size(), 0);
        assert_eq!(PrimitiveKind::String.size(), size_of::<String>());
    }

    #[test]
    fn test_primitive_alignment() {
        assert_eq!(PrimitiveKind::U8.alignment(), 1);
        assert_eq!(PrimitiveKind::U16.alignment(), 2);
        assert_eq!(PrimitiveKind::U32.alignment(), 4);
        assert_eq!(PrimitiveKind::Str.alignment(), align_of::<usize>());
    }

    #[test]
    fn test_unsupported_kinds() {
        assert!(Kind::Function.is_unsupported());
        assert!(Kind::Channel.is_unsupported());
        assert!(Kind::RawPointer.is_unsupported());
        assert!(Kind::Interface.is_unsupported());
        assert!(!Kind::Record.is_unsupported());
        assert!(!Kind::Opaque.is_unsupported());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::RawPointer.to_string(), "raw pointer");
        assert_eq!(TypeKind::Function.tag(), Kind::Function);
    }
}
