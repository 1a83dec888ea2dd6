//! Per-column state shared by every representation.

use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

use crate::descriptor::{Attachment, BindDescriptor};
use crate::options::OverflowPolicy;
use crate::types::{TypeTag, WireType};

/// Indicators the execution primitive reads and writes.
#[derive(Default)]
#[repr(C)]
struct NativeFlags {
    length: u64,
    is_null: bool,
    error: bool,
}

/// Name, tag and the flags the execution primitive reads and writes.
///
/// The flags live in their own heap block, held only as a raw pointer and
/// freed on drop, so the pointers an attached [`BindDescriptor`] carries stay
/// valid however the core itself is borrowed.
pub struct ColumnCore {
    name: String,
    tag: TypeTag,
    wire_type: WireType,
    capacity: usize,
    overflow: OverflowPolicy,
    flags: NonNull<NativeFlags>,
    selected: bool,
    attachment: Option<Attachment>,
}

impl ColumnCore {
    /// `capacity` is ignored for fixed-width tags.
    pub(crate) fn new(
        name: impl Into<String>,
        tag: TypeTag,
        wire_type: WireType,
        capacity: usize,
        overflow: OverflowPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            tag,
            wire_type,
            capacity: if tag.is_byte_sequence() { capacity } else { 0 },
            overflow,
            flags: NonNull::from(Box::leak(Box::<NativeFlags>::default())),
            selected: true,
            attachment: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Wire type written into the descriptor.
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Declared byte capacity; 0 for fixed-width kinds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn is_null(&self) -> bool {
        // SAFETY: `flags` is live until drop and never borrowed.
        unsafe { ptr::addr_of!((*self.flags.as_ptr()).is_null).read() }
    }

    pub(crate) fn set_null(&self, null: bool) {
        // SAFETY: as in `is_null`.
        unsafe { ptr::addr_of_mut!((*self.flags.as_ptr()).is_null).write(null) }
    }

    /// Set by the execution primitive on truncation or conversion failure.
    pub fn has_error(&self) -> bool {
        // SAFETY: as in `is_null`.
        unsafe { ptr::addr_of!((*self.flags.as_ptr()).error).read() }
    }

    pub(crate) fn clear_error(&self) {
        // SAFETY: as in `is_null`.
        unsafe { ptr::addr_of_mut!((*self.flags.as_ptr()).error).write(false) }
    }

    /// Byte length reported by the last write or read.
    ///
    /// For result columns this may exceed the capacity when the server value
    /// was truncated.
    pub fn reported_length(&self) -> usize {
        // SAFETY: as in `is_null`.
        let length = unsafe { ptr::addr_of!((*self.flags.as_ptr()).length).read() };
        usize::try_from(length).unwrap_or(usize::MAX)
    }

    pub(crate) fn set_length(&self, length: usize) {
        // SAFETY: as in `is_null`.
        unsafe { ptr::addr_of_mut!((*self.flags.as_ptr()).length).write(length as u64) }
    }

    /// Whether the last read lost data.
    pub fn is_truncated(&self) -> bool {
        self.has_error() || (self.tag.is_byte_sequence() && self.reported_length() > self.capacity)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Slot this column was last attached to, if any.
    pub fn attachment(&self) -> Option<Attachment> {
        self.attachment
    }

    pub(crate) fn detach(&mut self) {
        self.attachment = None;
    }

    /// Point `slot` at this column's buffer and flags.
    pub(crate) fn attach(
        &mut self,
        slot: &mut BindDescriptor,
        buffer: *mut c_void,
        attachment: Attachment,
    ) {
        let flags = self.flags.as_ptr();
        // SAFETY: field projections of the live flags block; nothing is read.
        let (is_null, length, error) = unsafe {
            (
                ptr::addr_of_mut!((*flags).is_null),
                ptr::addr_of_mut!((*flags).length),
                ptr::addr_of_mut!((*flags).error),
            )
        };
        *slot = BindDescriptor {
            buffer_type: self.wire_type,
            buffer,
            is_null,
            length,
            error,
            buffer_length: if self.tag.is_byte_sequence() {
                self.capacity as u64
            } else {
                0
            },
            is_unsigned: self.tag.is_unsigned(),
        };
        self.attachment = Some(attachment);
    }
}

impl Drop for ColumnCore {
    fn drop(&mut self) {
        // SAFETY: `flags` came from `Box::leak` in `new` and is freed only here.
        unsafe { drop(Box::from_raw(self.flags.as_ptr())) };
    }
}

impl fmt::Debug for ColumnCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnCore")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("wire_type", &self.wire_type)
            .field("capacity", &self.capacity)
            .field("is_null", &self.is_null())
            .field("error", &self.has_error())
            .field("length", &self.reported_length())
            .field("selected", &self.selected)
            .field("attachment", &self.attachment)
            .finish()
    }
}
