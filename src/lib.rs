//! Typed parameter binding for MySQL prepared statements
//!
//! Declare the columns of a statement once, get back objects that own
//! correctly sized value buffers, and hand the execution primitive a
//! contiguous array of native bind descriptors pointing into them. The array
//! can be rebuilt for any subset of the declared columns, always in
//! declaration order.
//!
//! # Example
//!
//! ```
//! use mysql_binds_rs::{BindDescriptor, ColumnFactory, Result, TypeTag};
//!
//! fn main() -> Result<()> {
//!     let mut params = ColumnFactory::new()
//!         .declare(TypeTag::Int, "id", 0)
//!         .declare(TypeTag::VarChar, "name", 64)
//!         .declare(TypeTag::Boolean, "active", 0)
//!         .build_input()?;
//!
//!     // Only bind two of the three parameters.
//!     params.select_by_names(["active", "id"])?;
//!     params.set_value("id", 42)?;
//!     params.set_value("active", true)?;
//!
//!     let mut execute = |descriptors: &mut [BindDescriptor]| -> Result<()> {
//!         assert_eq!(descriptors.len(), 2);
//!         Ok(())
//!     };
//!     params.execute(&mut execute)?;
//!     params.check_native_errors()?;
//!
//!     Ok(())
//! }
//! ```

pub mod binds;
pub mod column;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod options;
pub mod schema;
pub mod statement;
pub mod types;

// Re-export main types
pub use binds::{Binds, InputBinds, OutputBinds};
pub use column::{
    column_types, Column, ColumnCore, ColumnTypes, Direction, Field, Input, InputColumn, Output,
    OutputColumn,
};
pub use descriptor::{Attachment, BindDescriptor, DescriptorArray};
pub use error::{Error, Result};
pub use factory::{bind, ColumnFactory, ColumnSpec};
pub use options::{BindOptions, NameMatching, OverflowPolicy};
pub use schema::{SchemaField, SchemaSource, TableSchema};
pub use statement::Statement;
pub use types::{
    BindValue, ByteBuffer, SqlTime, SqlValue, TimestampType, TypeTag, ValueKind, WireType, BINARY_FLAG,
    ENUM_FLAG, SET_FLAG, UNSIGNED_FLAG,
};
