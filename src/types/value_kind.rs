//! Value representations and the conversions into them.
//!
//! [`ValueKind`] is the runtime name of a representation; [`SqlValue`] is the
//! compile-time side, implemented once per representation. Every `SqlValue`
//! checks a carrier completely before touching the buffer, so a rejected
//! value never leaves a partial write behind.

use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};
use std::slice;

use bytes::BytesMut;

use super::sql_time::SqlTime;
use super::type_tag::TypeTag;
use super::value::BindValue;

/// 2^127, the first magnitude an `i128` cannot hold.
const TWO_POW_127: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Runtime name of a column's value representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// Fixed-capacity byte buffer.
    Bytes,
    /// [`SqlTime`] record.
    Time,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::I8 => "i8",
            ValueKind::U8 => "u8",
            ValueKind::I16 => "i16",
            ValueKind::U16 => "u16",
            ValueKind::I32 => "i32",
            ValueKind::U32 => "u32",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Bytes => "bytes",
            ValueKind::Time => "time",
        };
        f.write_str(name)
    }
}

/// A representation a column buffer can hold.
///
/// `Storage` is what the column owns and what the native descriptor points
/// into; `Self` is the view handed to callers (`[u8]` views a [`ByteBuffer`]).
/// Storage is only ever reached through raw pointers, so a pointer handed to
/// a descriptor stays usable across later writes.
pub trait SqlValue: 'static {
    /// Owned buffer type.
    type Storage: 'static;

    /// Runtime kind of this representation.
    const KIND: ValueKind;

    /// Allocate the buffer once; byte buffers get exactly `capacity` bytes.
    fn allocate(capacity: usize) -> Self::Storage;

    /// Address the native descriptor writes to or reads from.
    ///
    /// # Safety
    ///
    /// `storage` must point at live storage returned by [`SqlValue::allocate`].
    unsafe fn buffer_ptr(storage: *mut Self::Storage) -> *mut c_void;

    /// View the current value; `length` is the reported byte length.
    ///
    /// # Safety
    ///
    /// As for [`SqlValue::buffer_ptr`]; in addition nothing may write to the
    /// storage while the returned reference is alive.
    unsafe fn view<'a>(storage: *const Self::Storage, length: usize) -> &'a Self;

    /// Overwrite the value. Returns the byte length to report, if any.
    ///
    /// # Safety
    ///
    /// As for [`SqlValue::buffer_ptr`]; no reference into the storage may be
    /// alive.
    unsafe fn store(storage: *mut Self::Storage, value: &Self) -> Option<usize>;

    /// Convert a carrier exactly and store it.
    ///
    /// Returns `None`, leaving the storage untouched, when the carrier form is
    /// wrong or the value does not survive the conversion unchanged.
    ///
    /// # Safety
    ///
    /// As for [`SqlValue::store`].
    unsafe fn assign(storage: *mut Self::Storage, value: &BindValue<'_>)
        -> Option<Option<usize>>;

    /// Diagnostic rendering of a non-null value.
    fn render(&self, tag: TypeTag, sink: &mut dyn fmt::Write) -> fmt::Result;

    /// Length checked against the column capacity, for byte sequences.
    fn byte_len(&self) -> Option<usize> {
        None
    }
}

/// Fixed-capacity storage behind `[u8]` columns.
///
/// The bytes are allocated once by a `BytesMut` that is never resized or
/// dereferenced again; reads and writes go through `data`, the same pointer
/// the descriptor receives.
pub struct ByteBuffer {
    data: NonNull<u8>,
    capacity: usize,
    _owner: BytesMut,
}

impl ByteBuffer {
    fn zeroed(capacity: usize) -> Self {
        let mut owner = BytesMut::zeroed(capacity);
        let data = NonNull::new(owner.as_mut_ptr()).unwrap_or(NonNull::dangling());
        Self {
            data,
            capacity,
            _owner: owner,
        }
    }

    /// Size of the buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

fn exact_integer<T: TryFrom<i128>>(value: &BindValue<'_>) -> Option<T> {
    match *value {
        BindValue::Int(i) => T::try_from(i).ok(),
        BindValue::Real(r) => {
            if !r.is_finite() || r.fract() != 0.0 {
                return None;
            }
            let i = r as i128;
            if i as f64 != r {
                return None;
            }
            T::try_from(i).ok()
        }
        _ => None,
    }
}

macro_rules! impl_integer_value {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl SqlValue for $t {
                type Storage = $t;
                const KIND: ValueKind = ValueKind::$kind;

                fn allocate(_capacity: usize) -> $t {
                    0
                }

                unsafe fn buffer_ptr(storage: *mut $t) -> *mut c_void {
                    storage.cast()
                }

                unsafe fn view<'a>(storage: *const $t, _length: usize) -> &'a $t {
                    &*storage
                }

                unsafe fn store(storage: *mut $t, value: &$t) -> Option<usize> {
                    storage.write(*value);
                    None
                }

                unsafe fn assign(
                    storage: *mut $t,
                    value: &BindValue<'_>,
                ) -> Option<Option<usize>> {
                    storage.write(exact_integer::<$t>(value)?);
                    Some(None)
                }

                fn render(&self, tag: TypeTag, sink: &mut dyn fmt::Write) -> fmt::Result {
                    if tag == TypeTag::Boolean {
                        write!(sink, "{}", *self != 0)
                    } else {
                        write!(sink, "{}", self)
                    }
                }
            }
        )*
    };
}

impl_integer_value!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
);

macro_rules! impl_float_value {
    ($($t:ty => $kind:ident),* $(,)?) => {
        $(
            impl SqlValue for $t {
                type Storage = $t;
                const KIND: ValueKind = ValueKind::$kind;

                fn allocate(_capacity: usize) -> $t {
                    0.0
                }

                unsafe fn buffer_ptr(storage: *mut $t) -> *mut c_void {
                    storage.cast()
                }

                unsafe fn view<'a>(storage: *const $t, _length: usize) -> &'a $t {
                    &*storage
                }

                unsafe fn store(storage: *mut $t, value: &$t) -> Option<usize> {
                    storage.write(*value);
                    None
                }

                unsafe fn assign(
                    storage: *mut $t,
                    value: &BindValue<'_>,
                ) -> Option<Option<usize>> {
                    let x = match *value {
                        BindValue::Int(i) => {
                            let x = i as $t;
                            let wide = x as f64;
                            if wide.abs() >= TWO_POW_127 || x as i128 != i {
                                return None;
                            }
                            x
                        }
                        BindValue::Real(r) => {
                            let x = r as $t;
                            if x as f64 != r {
                                return None;
                            }
                            x
                        }
                        _ => return None,
                    };
                    storage.write(x);
                    Some(None)
                }

                fn render(&self, _tag: TypeTag, sink: &mut dyn fmt::Write) -> fmt::Result {
                    write!(sink, "{}", self)
                }
            }
        )*
    };
}

impl_float_value!(f32 => F32, f64 => F64);

impl SqlValue for [u8] {
    type Storage = ByteBuffer;
    const KIND: ValueKind = ValueKind::Bytes;

    fn allocate(capacity: usize) -> ByteBuffer {
        ByteBuffer::zeroed(capacity)
    }

    unsafe fn buffer_ptr(storage: *mut ByteBuffer) -> *mut c_void {
        (*storage).data.as_ptr().cast()
    }

    unsafe fn view<'a>(storage: *const ByteBuffer, length: usize) -> &'a [u8] {
        let buffer = &*storage;
        slice::from_raw_parts(buffer.data.as_ptr(), length.min(buffer.capacity))
    }

    unsafe fn store(storage: *mut ByteBuffer, value: &[u8]) -> Option<usize> {
        let buffer = &*storage;
        let n = value.len().min(buffer.capacity);
        let data = buffer.data.as_ptr();
        ptr::copy_nonoverlapping(value.as_ptr(), data, n);
        ptr::write_bytes(data.add(n), 0, buffer.capacity - n);
        Some(n)
    }

    unsafe fn assign(storage: *mut ByteBuffer, value: &BindValue<'_>) -> Option<Option<usize>> {
        let bytes = value.as_bytes()?;
        Some(Self::store(storage, bytes))
    }

    fn render(&self, _tag: TypeTag, sink: &mut dyn fmt::Write) -> fmt::Result {
        sink.write_str(&String::from_utf8_lossy(self))
    }

    fn byte_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl SqlValue for SqlTime {
    type Storage = SqlTime;
    const KIND: ValueKind = ValueKind::Time;

    fn allocate(_capacity: usize) -> SqlTime {
        SqlTime::default()
    }

    unsafe fn buffer_ptr(storage: *mut SqlTime) -> *mut c_void {
        storage.cast()
    }

    unsafe fn view<'a>(storage: *const SqlTime, _length: usize) -> &'a SqlTime {
        &*storage
    }

    unsafe fn store(storage: *mut SqlTime, value: &SqlTime) -> Option<usize> {
        storage.write(*value);
        None
    }

    unsafe fn assign(storage: *mut SqlTime, value: &BindValue<'_>) -> Option<Option<usize>> {
        match value {
            BindValue::Time(t) => Some(Self::store(storage, t)),
            _ => None,
        }
    }

    fn render(&self, _tag: TypeTag, sink: &mut dyn fmt::Write) -> fmt::Result {
        write!(sink, "{}", self)
    }
}
