//! Type tags, wire types and value representations.

mod sql_time;
mod type_tag;
mod value;
mod value_kind;
mod wire_type;

pub use sql_time::{SqlTime, TimestampType};
pub use type_tag::TypeTag;
pub use value::BindValue;
pub use value_kind::{ByteBuffer, SqlValue, ValueKind};
pub use wire_type::{WireType, BINARY_FLAG, ENUM_FLAG, SET_FLAG, UNSIGNED_FLAG};
