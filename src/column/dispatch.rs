//! Type tag to column-type mapping and column construction.

use tracing::trace;

use super::field::{Field, Input, Output};
use super::state::ColumnCore;
use super::{InputColumn, OutputColumn};
use crate::error::{Error, Result};
use crate::options::BindOptions;
use crate::types::{SqlTime, TypeTag, ValueKind, WireType};

/// Wire types used for a tag in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnTypes {
    /// Buffer type when binding a parameter.
    pub input: WireType,
    /// Buffer type when binding a result column.
    pub output: WireType,
}

const fn both(wire: WireType) -> ColumnTypes {
    ColumnTypes {
        input: wire,
        output: wire,
    }
}

const fn split(input: WireType, output: WireType) -> ColumnTypes {
    ColumnTypes { input, output }
}

const COLUMN_TYPES: [(TypeTag, ColumnTypes); 36] = [
    (TypeTag::Int, both(WireType::Long)),
    (TypeTag::IntUnsigned, both(WireType::Long)),
    (TypeTag::Char, both(WireType::String)),
    (TypeTag::VarChar, split(WireType::String, WireType::VarString)),
    (TypeTag::TinyText, split(WireType::String, WireType::TinyBlob)),
    (TypeTag::Text, split(WireType::String, WireType::Blob)),
    (TypeTag::Blob, both(WireType::Blob)),
    (TypeTag::MediumText, split(WireType::String, WireType::MediumBlob)),
    (TypeTag::MediumBlob, split(WireType::Blob, WireType::MediumBlob)),
    (TypeTag::LongText, split(WireType::String, WireType::LongBlob)),
    (TypeTag::LongBlob, split(WireType::Blob, WireType::LongBlob)),
    (TypeTag::TinyInt, both(WireType::Tiny)),
    (TypeTag::TinyIntUnsigned, both(WireType::Tiny)),
    (TypeTag::SmallInt, both(WireType::Short)),
    (TypeTag::SmallIntUnsigned, both(WireType::Short)),
    (TypeTag::MediumInt, both(WireType::Long)),
    (TypeTag::MediumIntUnsigned, both(WireType::Long)),
    (TypeTag::BigInt, both(WireType::LongLong)),
    (TypeTag::BigIntUnsigned, both(WireType::LongLong)),
    (TypeTag::Float, both(WireType::Float)),
    (TypeTag::Double, both(WireType::Double)),
    (TypeTag::Decimal, both(WireType::NewDecimal)),
    (TypeTag::Date, both(WireType::Date)),
    (TypeTag::DateTime, both(WireType::DateTime)),
    (TypeTag::Timestamp, both(WireType::Timestamp)),
    (TypeTag::Time, both(WireType::Time)),
    (TypeTag::Year, both(WireType::Short)),
    (TypeTag::Enum, both(WireType::String)),
    (TypeTag::Set, both(WireType::String)),
    (TypeTag::Boolean, both(WireType::Tiny)),
    (TypeTag::Bit, both(WireType::LongLong)),
    (TypeTag::Geometry, both(WireType::Blob)),
    (TypeTag::Json, both(WireType::Json)),
    (TypeTag::Binary, split(WireType::String, WireType::Blob)),
    (TypeTag::VarBinary, split(WireType::Blob, WireType::VarString)),
    (TypeTag::TinyBlob, both(WireType::TinyBlob)),
];

/// Look up the wire types for a tag.
pub fn column_types(tag: TypeTag) -> Option<ColumnTypes> {
    COLUMN_TYPES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, types)| *types)
}

fn effective_capacity(tag: TypeTag, capacity: usize, options: &BindOptions) -> usize {
    if tag.is_byte_sequence() && capacity == 0 {
        options.default_capacity
    } else {
        capacity
    }
}

macro_rules! build_field {
    ($trait:ident, $dir:ty, $kind:expr, $core:expr) => {
        match $kind {
            ValueKind::I8 => Box::new(Field::<i8, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::U8 => Box::new(Field::<u8, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::I16 => Box::new(Field::<i16, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::U16 => Box::new(Field::<u16, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::I32 => Box::new(Field::<i32, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::U32 => Box::new(Field::<u32, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::I64 => Box::new(Field::<i64, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::U64 => Box::new(Field::<u64, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::F32 => Box::new(Field::<f32, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::F64 => Box::new(Field::<f64, $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::Bytes => Box::new(Field::<[u8], $dir>::new($core)) as Box<dyn $trait>,
            ValueKind::Time => Box::new(Field::<SqlTime, $dir>::new($core)) as Box<dyn $trait>,
        }
    };
}

/// Build a parameter column for `tag`.
pub(crate) fn make_input(
    name: &str,
    tag: TypeTag,
    capacity: usize,
    options: &BindOptions,
) -> Result<Box<dyn InputColumn>> {
    let types = column_types(tag).ok_or(Error::UnsupportedTag { tag })?;
    let capacity = effective_capacity(tag, capacity, options);
    trace!(column = name, %tag, wire_type = %types.input, capacity, "building input column");
    let core = ColumnCore::new(name, tag, types.input, capacity, options.overflow);
    Ok(build_field!(InputColumn, Input, tag.value_kind(), core))
}

/// Build a result column for `tag`.
pub(crate) fn make_output(
    name: &str,
    tag: TypeTag,
    capacity: usize,
    options: &BindOptions,
) -> Result<Box<dyn OutputColumn>> {
    let types = column_types(tag).ok_or(Error::UnsupportedTag { tag })?;
    let capacity = effective_capacity(tag, capacity, options);
    trace!(column = name, %tag, wire_type = %types.output, capacity, "building output column");
    let core = ColumnCore::new(name, tag, types.output, capacity, options.overflow);
    Ok(build_field!(OutputColumn, Output, tag.value_kind(), core))
}
