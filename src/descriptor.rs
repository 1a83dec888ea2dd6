//! Native bind descriptors.
//!
//! A [`BindDescriptor`] is the fixed-layout record the execution primitive
//! consumes. It holds raw pointers into a column's buffer and flags, so it is
//! only meaningful while the owning column is alive and the array it sits in
//! has not been rebuilt. Every rebuild bumps a generation counter; handles
//! taken earlier carry the old generation and can be recognised as stale.

use std::ffi::c_void;
use std::ptr;

use crate::types::WireType;

/// One parameter or result slot handed to the execution primitive.
///
/// Field order is part of the external contract: wire type, buffer, null
/// indicator, length, error indicator, capacity, then signedness.
#[derive(Debug)]
#[repr(C)]
pub struct BindDescriptor {
    /// Native buffer type.
    pub buffer_type: WireType,
    /// Value buffer.
    pub buffer: *mut c_void,
    /// SQL NULL indicator.
    pub is_null: *mut bool,
    /// Actual byte length written or read.
    pub length: *mut u64,
    /// Truncation or conversion error indicator.
    pub error: *mut bool,
    /// Capacity of `buffer` for byte-sequence kinds, 0 otherwise.
    pub buffer_length: u64,
    /// Whether integer buffers are unsigned.
    pub is_unsigned: bool,
}

impl BindDescriptor {
    /// An unattached slot.
    pub fn empty() -> Self {
        Self {
            buffer_type: WireType::Null,
            buffer: ptr::null_mut(),
            is_null: ptr::null_mut(),
            length: ptr::null_mut(),
            error: ptr::null_mut(),
            buffer_length: 0,
            is_unsigned: false,
        }
    }

    /// Whether a column has been attached to this slot.
    pub fn is_attached(&self) -> bool {
        !self.buffer.is_null()
    }
}

impl Default for BindDescriptor {
    fn default() -> Self {
        Self::empty()
    }
}

/// Where a column's descriptor lives: which rebuild, which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub generation: u64,
    pub index: usize,
}

/// Snapshot of a built descriptor array.
///
/// The pointer is valid until the next rebuild of the collection it came from;
/// check [`Binds::is_current`](crate::Binds::is_current) before using an old
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorArray {
    pub ptr: *mut BindDescriptor,
    pub len: usize,
    pub generation: u64,
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::*;

    #[test]
    fn test_empty_descriptor() {
        let d = BindDescriptor::default();
        assert!(!d.is_attached());
        assert_eq!(d.buffer_type, WireType::Null);
        assert!(d.length.is_null());
    }

    #[test]
    fn test_field_order() {
        let offsets = [
            mem::offset_of!(BindDescriptor, buffer_type),
            mem::offset_of!(BindDescriptor, buffer),
            mem::offset_of!(BindDescriptor, is_null),
            mem::offset_of!(BindDescriptor, length),
            mem::offset_of!(BindDescriptor, error),
            mem::offset_of!(BindDescriptor, buffer_length),
            mem::offset_of!(BindDescriptor, is_unsigned),
        ];
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]), "{offsets:?}");
    }
}
