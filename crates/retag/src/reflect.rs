// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptors for Rust types.
//!
//! [`Reflect`] maps a Rust type to its interned [`TypeRef`]. Every call of
//! `T::type_ref()` returns the same handle, so descriptor identity mirrors
//! Rust type identity. Structs get an implementation from
//! `#[derive(Reflect)]`; the standard types used as field types are covered
//! here.
//!
//! | Rust type | Kind |
//! |-----------|------|
//! | integers, floats, `bool`, `char`, `()`, `String`, `&'static str` | primitive |
//! | `Box<T>` | pointer |
//! | `[T; N]` | array |
//! | `Vec<T>`, `VecDeque<T>` | list |
//! | `HashMap<K, V, S>`, `BTreeMap<K, V>` | map |
//! | `fn(..) -> R` (up to four arguments) | function |
//! | `mpsc::Sender<T>`, `mpsc::SyncSender<T>`, `mpsc::Receiver<T>` | channel |
//! | `*const T`, `*mut T` | raw pointer |
//! | `Arc<dyn Any + Send + Sync>`, `Rc<dyn Any>` | interface |

use crate::types::{PrimitiveKind, TypeDescriptor, TypeKind, TypeRef};
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::mem::{align_of, size_of};
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::{Arc, OnceLock};

/// Rust types with a runtime descriptor.
///
/// # Safety
///
/// The descriptor returned by `type_ref` must describe `Self` exactly: its
/// size and alignment must equal `size_of::<Self>()` and
/// `align_of::<Self>()`, and for records every field's offset and type must
/// match the real field. Views read memory through these descriptors, so a
/// wrong descriptor leads to out-of-bounds or mistyped reads.
///
/// Implementations should go through [`intern`] so that repeated calls
/// return the same handle. The `unsafe` call is covered by this contract.
pub unsafe trait Reflect: 'static {
    fn type_ref() -> TypeRef;
}

/// Descriptor of the value's type.
pub fn type_of<T: Reflect>(_value: &T) -> TypeRef {
    T::type_ref()
}

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, TypeRef>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<TypeId, TypeRef>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Return the process-wide descriptor for `T`, building it on first use.
///
/// `build` runs without any lock held, so it may intern other types. If two
/// threads race, the first stored descriptor wins and both get it.
///
/// # Safety
///
/// The descriptor produced by `build` must describe `T` as required by the
/// [`Reflect`] contract. The first descriptor stored for a `TypeId` is the
/// one every later `T::type_ref()` returns, so call this only from `T`'s own
/// `Reflect::type_ref`.
///
/// Registering a descriptor for a type is therefore not possible from safe
/// code:
///
/// ```compile_fail
/// use retag::reflect::intern;
/// use retag::types::{PrimitiveKind, TypeDescriptor};
///
/// let _ = intern::<u64>(|| TypeDescriptor::primitive(PrimitiveKind::String));
/// ```
pub unsafe fn intern<T: ?Sized + 'static>(build: impl FnOnce() -> TypeDescriptor) -> TypeRef {
    let id = TypeId::of::<T>();
    if let Some(hit) = registry().read().get(&id) {
        return hit.clone();
    }

    let built = TypeRef::new(build());
    registry().write().entry(id).or_insert(built).clone()
}

/// [`intern`] for the standard impls in this module, each describing `Self`.
fn intern_self<T: Reflect>(build: impl FnOnce() -> TypeDescriptor) -> TypeRef {
    // SAFETY: every caller is `T::type_ref` and builds `T`'s own descriptor.
    unsafe { intern::<T>(build) }
}

fn describe<T>(kind: TypeKind) -> TypeDescriptor {
    TypeDescriptor::new(type_name::<T>(), kind, size_of::<T>(), align_of::<T>())
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            unsafe impl Reflect for $ty {
                fn type_ref() -> TypeRef {
                    intern_self::<Self>(|| TypeDescriptor::primitive(PrimitiveKind::$kind))
                }
            }
        )*
    };
}

impl_primitive! {
    () => Unit,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    &'static str => Str,
}

unsafe impl<T: Reflect> Reflect for Box<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::Pointer(T::type_ref())))
    }
}

unsafe impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| {
            describe::<Self>(TypeKind::Array {
                element: T::type_ref(),
                len: N,
            })
        })
    }
}

unsafe impl<T: Reflect> Reflect for Vec<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::List(T::type_ref())))
    }
}

unsafe impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::List(T::type_ref())))
    }
}

unsafe impl<K: Reflect, V: Reflect, S: 'static> Reflect for HashMap<K, V, S> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| {
            describe::<Self>(TypeKind::Map {
                key: K::type_ref(),
                value: V::type_ref(),
            })
        })
    }
}

unsafe impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| {
            describe::<Self>(TypeKind::Map {
                key: K::type_ref(),
                value: V::type_ref(),
            })
        })
    }
}

macro_rules! impl_leaf {
    ($kind:ident => $($ty:ty),* $(,)?) => {
        $(
            unsafe impl Reflect for $ty {
                fn type_ref() -> TypeRef {
                    intern_self::<Self>(|| describe::<Self>(TypeKind::$kind))
                }
            }
        )*
    };
}

impl_leaf!(Interface => Arc<dyn Any + Send + Sync>, Rc<dyn Any>);

macro_rules! impl_fn {
    ($($arg:ident),*) => {
        unsafe impl<R: 'static, $($arg: 'static),*> Reflect for fn($($arg),*) -> R {
            fn type_ref() -> TypeRef {
                intern_self::<Self>(|| describe::<Self>(TypeKind::Function))
            }
        }
    };
}

impl_fn!();
impl_fn!(A);
impl_fn!(A, B);
impl_fn!(A, B, C);
impl_fn!(A, B, C, D);

unsafe impl<T: 'static> Reflect for Sender<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::Channel))
    }
}

unsafe impl<T: 'static> Reflect for SyncSender<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::Channel))
    }
}

unsafe impl<T: 'static> Reflect for Receiver<T> {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::Channel))
    }
}

unsafe impl<T: 'static> Reflect for *const T {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::RawPointer))
    }
}

unsafe impl<T: 'static> Reflect for *mut T {
    fn type_ref() -> TypeRef {
        intern_self::<Self>(|| describe::<Self>(TypeKind::RawPointer))
    }
}
