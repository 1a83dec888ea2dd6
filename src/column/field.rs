//! The generic column implementation.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::{trace, warn};

use super::state::ColumnCore;
use super::{Column, InputColumn, OutputColumn};
use crate::descriptor::{Attachment, BindDescriptor};
use crate::error::{Error, Result};
use crate::options::OverflowPolicy;
use crate::types::{BindValue, SqlValue, ValueKind};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Input {}
    impl Sealed for super::Output {}
}

/// Which capability set a [`Field`] carries.
pub trait Direction: sealed::Sealed + 'static {
    const NAME: &'static str;
}

/// Statement parameter direction.
#[derive(Debug, Clone, Copy)]
pub struct Input;

/// Result column direction.
#[derive(Debug, Clone, Copy)]
pub struct Output;

impl Direction for Input {
    const NAME: &'static str = "input";
}

impl Direction for Output {
    const NAME: &'static str = "output";
}

/// A column holding a buffer of representation `T`.
///
/// The buffer is a separate heap allocation, created once at construction and
/// freed on drop. The field only holds a raw pointer to it, so borrowing the
/// field mutably never covers memory an attached descriptor points at.
pub struct Field<T: SqlValue + ?Sized, D: Direction> {
    core: ColumnCore,
    value: NonNull<T::Storage>,
    _repr: PhantomData<fn() -> (D, Box<T>)>,
}

impl<T: SqlValue + ?Sized, D: Direction> Field<T, D> {
    pub(crate) fn new(core: ColumnCore) -> Self {
        let value = NonNull::from(Box::leak(Box::new(T::allocate(core.capacity()))));
        Self {
            core,
            value,
            _repr: PhantomData,
        }
    }

    /// Current value. Byte sequences are cut to the reported length.
    pub fn get(&self) -> &T {
        // SAFETY: `value` is live until drop. Writes happen through
        // `&mut self` or inside `Binds::execute`, which borrows the owning
        // collection mutably, so none overlaps the returned borrow.
        unsafe { T::view(self.value.as_ptr(), self.core.reported_length()) }
    }
}

impl<T: SqlValue + ?Sized, D: Direction> Drop for Field<T, D> {
    fn drop(&mut self) {
        // SAFETY: `value` came from `Box::leak` in `new` and is freed only here.
        unsafe { drop(Box::from_raw(self.value.as_ptr())) };
    }
}

impl<T: SqlValue + ?Sized> Field<T, Input> {
    /// Write a value already in the column's representation.
    ///
    /// Byte sequences are still subject to the capacity policy.
    pub fn set(&mut self, value: &T) -> Result<()> {
        if let Some(supplied) = value.byte_len() {
            self.check_capacity(supplied)?;
        }
        // SAFETY: the storage is live and `&mut self` excludes any view of it.
        let written = unsafe { T::store(self.value.as_ptr(), value) };
        self.finish_write(written);
        Ok(())
    }

    fn check_capacity(&self, supplied: usize) -> Result<()> {
        let capacity = self.core.capacity();
        if supplied <= capacity {
            return Ok(());
        }
        match self.core.overflow() {
            OverflowPolicy::Reject => Err(Error::CapacityExceeded {
                column: self.core.name().to_string(),
                capacity,
                supplied,
            }),
            OverflowPolicy::Clip => {
                warn!(
                    column = self.core.name(),
                    capacity, supplied, "value clipped to column capacity"
                );
                Ok(())
            }
        }
    }

    fn finish_write(&mut self, written: Option<usize>) {
        if let Some(length) = written {
            self.core.set_length(length);
        }
        self.core.set_null(false);
        trace!(column = self.core.name(), kind = %T::KIND, "parameter written");
    }
}

impl<T: SqlValue + ?Sized, D: Direction> Column for Field<T, D> {
    fn core(&self) -> &ColumnCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ColumnCore {
        &mut self.core
    }

    fn value_kind(&self) -> ValueKind {
        T::KIND
    }

    fn attach_descriptor(&mut self, slot: &mut BindDescriptor, attachment: Attachment) {
        // SAFETY: `value` is live; the pointer stays valid until drop.
        let buffer = unsafe { T::buffer_ptr(self.value.as_ptr()) };
        self.core.attach(slot, buffer, attachment);
    }

    fn format(&self, sink: &mut dyn fmt::Write) -> fmt::Result {
        if self.core.is_null() {
            return sink.write_str("NULL");
        }
        self.get().render(self.core.tag(), sink)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: SqlValue + ?Sized> InputColumn for Field<T, Input> {
    fn set_value(&mut self, value: BindValue<'_>) -> Result<()> {
        if T::KIND == ValueKind::Bytes {
            if let Some(bytes) = value.as_bytes() {
                self.check_capacity(bytes.len())?;
            }
        }
        // SAFETY: as in `Field::set`.
        let written = unsafe { T::assign(self.value.as_ptr(), &value) }
            .ok_or_else(|| Error::type_mismatch(self.core.name(), T::KIND, value.to_string()))?;
        self.finish_write(written);
        Ok(())
    }
}

impl<T: SqlValue + ?Sized> OutputColumn for Field<T, Output> {}

impl<T: SqlValue + ?Sized, D: Direction> fmt::Display for Field<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format(f)
    }
}

impl<T: SqlValue + ?Sized, D: Direction> fmt::Debug for Field<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("direction", &D::NAME)
            .field("kind", &T::KIND)
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SqlTime, TypeTag, WireType};

    fn input<T: SqlValue + ?Sized>(tag: TypeTag, capacity: usize) -> Field<T, Input> {
        Field::new(ColumnCore::new(
            "col",
            tag,
            WireType::String,
            capacity,
            OverflowPolicy::Clip,
        ))
    }

    fn attach<T: SqlValue + ?Sized, D: Direction>(field: &mut Field<T, D>) -> BindDescriptor {
        let mut slot = BindDescriptor::empty();
        field.attach_descriptor(
            &mut slot,
            Attachment {
                generation: 1,
                index: 0,
            },
        );
        slot
    }

    #[test]
    fn test_integer_set_value_exactness() {
        let mut field = input::<i32>(TypeTag::Int, 0);
        assert!(matches!(
            field.set_value(BindValue::Real(3.5)),
            Err(Error::TypeMismatch { .. })
        ));
        field.set_value(BindValue::Real(3.0)).unwrap();
        assert_eq!(*field.get(), 3);
    }

    #[test]
    fn test_mismatch_leaves_value_untouched() {
        let mut field = input::<i16>(TypeTag::SmallInt, 0);
        field.set_value(7i16.into()).unwrap();
        let err = field.set_value(BindValue::Text("8")).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                column: "col".to_string(),
                expected: ValueKind::I16,
                found: "text (1 bytes)".to_string(),
            }
        );
        assert!(field.set_value(BindValue::Int(40_000)).is_err());
        assert_eq!(*field.get(), 7);
    }

    #[test]
    fn test_bytes_clip_and_report_length() {
        let mut field = input::<[u8]>(TypeTag::VarChar, 4);
        field.set_value("hello".into()).unwrap();
        assert_eq!(field.get(), b"hell");
        assert_eq!(field.core().reported_length(), 4);
        field.set_value("hi".into()).unwrap();
        assert_eq!(field.get(), b"hi");
        assert_eq!(field.to_string(), "hi");
    }

    #[test]
    fn test_bytes_reject_policy() {
        let mut field: Field<[u8], Input> = Field::new(ColumnCore::new(
            "col",
            TypeTag::Blob,
            WireType::Blob,
            2,
            OverflowPolicy::Reject,
        ));
        field.set(b"ok").unwrap();
        let err = field.set(b"too long").unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityExceeded {
                capacity: 2,
                supplied: 8,
                ..
            }
        ));
        assert_eq!(field.get(), b"ok");
    }

    #[test]
    fn test_null_formats_as_null() {
        let mut field = input::<i8>(TypeTag::Boolean, 0);
        field.set_value(true.into()).unwrap();
        assert_eq!(field.to_string(), "true");
        field.set_null(true);
        assert_eq!(field.to_string(), "NULL");
        field.set_value(false.into()).unwrap();
        assert!(!field.core().is_null());
        assert_eq!(field.to_string(), "false");
    }

    #[test]
    fn test_time_round_trip() {
        let mut field = input::<SqlTime>(TypeTag::Date, 0);
        let date = SqlTime::date(2024, 2, 29);
        field.set_value(date.into()).unwrap();
        assert_eq!(*field.get(), date);
        assert_eq!(field.to_string(), "2024-02-29");
        assert!(field.set_value(BindValue::Real(1.0)).is_err());
    }

    #[test]
    fn test_descriptor_points_at_buffer() {
        let mut field = input::<u32>(TypeTag::IntUnsigned, 0);
        let slot = attach(&mut field);
        assert_eq!(slot.buffer_length, 0);
        assert!(slot.is_unsigned);
        // The execution primitive writes through the slot.
        unsafe {
            *(slot.buffer as *mut u32) = 99;
            *slot.is_null = true;
        }
        assert_eq!(*field.get(), 99);
        assert_eq!(field.to_string(), "NULL");
    }

    #[test]
    fn test_writes_after_attach_reach_descriptor() {
        let mut name = input::<[u8]>(TypeTag::VarChar, 8);
        let slot = attach(&mut name);
        name.set_value(BindValue::Text("ab")).unwrap();
        name.set_null(false);
        unsafe {
            assert_eq!(*slot.length, 2);
            assert!(!*slot.is_null);
            assert_eq!(std::slice::from_raw_parts(slot.buffer.cast::<u8>(), 2), b"ab");
        }

        let mut id = input::<i32>(TypeTag::Int, 0);
        let slot = attach(&mut id);
        id.set_value(BindValue::Int(7)).unwrap();
        id.set(&8).unwrap();
        assert_eq!(unsafe { *slot.buffer.cast::<i32>() }, 8);
    }

    #[test]
    fn test_output_reads_reported_prefix() {
        let mut field: Field<[u8], Output> = Field::new(ColumnCore::new(
            "out",
            TypeTag::Text,
            WireType::Blob,
            8,
            OverflowPolicy::Clip,
        ));
        let slot = attach(&mut field);
        assert_eq!(slot.buffer_length, 8);
        unsafe {
            std::ptr::copy_nonoverlapping(b"fetched".as_ptr(), slot.buffer.cast::<u8>(), 7);
            *slot.length = 7;
        }
        assert_eq!(field.get(), b"fetched");
        assert!(!field.is_truncated());

        unsafe {
            *slot.length = 12;
        }
        assert_eq!(field.get().len(), 8);
        assert!(field.is_truncated());
    }
}
