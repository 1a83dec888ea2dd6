//! Column objects.
//!
//! Every column is a [`Field<T, D>`]: one generic type parameterised by its
//! value representation `T` and its direction `D`. Collections hold columns as
//! `Box<dyn InputColumn>` or `Box<dyn OutputColumn>`; the two capability sets
//! are disjoint, so a parameter column can be written but a result column can
//! only be read.
//!
//! Typed access on a trait object goes through `value::<T>()`, which fails with
//! `TypeMismatch` unless `T` is the column's mapped representation. Callers
//! that know the representation statically can take the concrete field with
//! `typed::<T>()` / `typed_mut::<T>()` and skip the carrier checks entirely.

pub mod dispatch;
mod field;
mod state;

use std::any::Any;
use std::fmt;

use crate::descriptor::{Attachment, BindDescriptor};
use crate::error::{Error, Result};
use crate::types::{BindValue, SqlValue, TypeTag, ValueKind};

pub use dispatch::{column_types, ColumnTypes};
pub use field::{Direction, Field, Input, Output};
pub use state::ColumnCore;

/// State and behavior common to input and output columns.
pub trait Column: 'static {
    /// Shared per-column state.
    fn core(&self) -> &ColumnCore;

    #[doc(hidden)]
    fn core_mut(&mut self) -> &mut ColumnCore;

    /// Representation of the value buffer.
    fn value_kind(&self) -> ValueKind;

    /// Populate `slot` so it points at this column and remember where it is.
    fn attach_descriptor(&mut self, slot: &mut BindDescriptor, attachment: Attachment);

    /// Render the current value, or `NULL`.
    fn format(&self, sink: &mut dyn fmt::Write) -> fmt::Result;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn tag(&self) -> TypeTag {
        self.core().tag()
    }

    fn is_null(&self) -> bool {
        self.core().is_null()
    }

    fn has_error(&self) -> bool {
        self.core().has_error()
    }

    fn is_selected(&self) -> bool {
        self.core().is_selected()
    }
}

/// A statement parameter: accepts writes.
pub trait InputColumn: Column {
    /// Write a carrier value after checking it fits exactly.
    ///
    /// Clears the null flag on success. On error the buffer is unchanged.
    fn set_value(&mut self, value: BindValue<'_>) -> Result<()>;

    /// Mark the parameter as SQL NULL (or not).
    fn set_null(&mut self, null: bool) {
        self.core().set_null(null);
    }
}

/// A result column: exposes reads of what the execution primitive fetched.
pub trait OutputColumn: Column {
    /// Whether the last fetch truncated this column.
    fn is_truncated(&self) -> bool {
        self.core().is_truncated()
    }
}

fn access_mismatch<T: SqlValue + ?Sized>(column: &str, kind: ValueKind) -> Error {
    Error::type_mismatch(column, kind, T::KIND.to_string())
}

macro_rules! impl_typed_access {
    ($trait:ident, $dir:ty) => {
        impl dyn $trait {
            /// Read the value as `T`; `T` must be the column's representation.
            pub fn value<T: SqlValue + ?Sized>(&self) -> Result<&T> {
                self.typed::<T>().map(|field| field.get())
            }

            /// Borrow the concrete field.
            pub fn typed<T: SqlValue + ?Sized>(&self) -> Result<&Field<T, $dir>> {
                self.as_any()
                    .downcast_ref::<Field<T, $dir>>()
                    .ok_or_else(|| access_mismatch::<T>(self.name(), self.value_kind()))
            }

            /// Mutably borrow the concrete field.
            pub fn typed_mut<T: SqlValue + ?Sized>(&mut self) -> Result<&mut Field<T, $dir>> {
                let kind = self.value_kind();
                if !self.as_any().is::<Field<T, $dir>>() {
                    return Err(access_mismatch::<T>(self.name(), kind));
                }
                self.as_any_mut()
                    .downcast_mut::<Field<T, $dir>>()
                    .ok_or_else(|| access_mismatch::<T>("", kind))
            }
        }

        impl fmt::Display for dyn $trait {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.format(f)
            }
        }

        impl fmt::Debug for dyn $trait {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($trait))
                    .field("name", &self.name())
                    .field("tag", &self.tag())
                    .field("is_null", &self.is_null())
                    .field("is_selected", &self.is_selected())
                    .finish()
            }
        }
    };
}

impl_typed_access!(InputColumn, Input);
impl_typed_access!(OutputColumn, Output);
