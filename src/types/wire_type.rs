//! Native wire types written into bind descriptors.
//!
//! The numeric codes are the client library's `enum_field_types` values and
//! must not be renumbered.

use std::fmt;

/// Column flag: numeric column is unsigned.
pub const UNSIGNED_FLAG: u64 = 32;
/// Column flag: binary collation (byte strings, not text).
pub const BINARY_FLAG: u64 = 128;
/// Column flag: column is an ENUM.
pub const ENUM_FLAG: u64 = 256;
/// Column flag: column is a SET.
pub const SET_FLAG: u64 = 2048;

/// Native buffer type of a bind descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WireType {
    Decimal = 0,
    Tiny = 1,
    Short = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    Null = 6,
    Timestamp = 7,
    LongLong = 8,
    Int24 = 9,
    Date = 10,
    Time = 11,
    DateTime = 12,
    Year = 13,
    NewDate = 14,
    VarChar = 15,
    Bit = 16,
    Json = 245,
    NewDecimal = 246,
    Enum = 247,
    Set = 248,
    TinyBlob = 249,
    MediumBlob = 250,
    LongBlob = 251,
    Blob = 252,
    VarString = 253,
    String = 254,
    Geometry = 255,
}

impl WireType {
    /// Look up a wire type by its native code.
    pub fn from_code(code: u32) -> Option<Self> {
        let wire = match code {
            0 => WireType::Decimal,
            1 => WireType::Tiny,
            2 => WireType::Short,
            3 => WireType::Long,
            4 => WireType::Float,
            5 => WireType::Double,
            6 => WireType::Null,
            7 => WireType::Timestamp,
            8 => WireType::LongLong,
            9 => WireType::Int24,
            10 => WireType::Date,
            11 => WireType::Time,
            12 => WireType::DateTime,
            13 => WireType::Year,
            14 => WireType::NewDate,
            15 => WireType::VarChar,
            16 => WireType::Bit,
            245 => WireType::Json,
            246 => WireType::NewDecimal,
            247 => WireType::Enum,
            248 => WireType::Set,
            249 => WireType::TinyBlob,
            250 => WireType::MediumBlob,
            251 => WireType::LongBlob,
            252 => WireType::Blob,
            253 => WireType::VarString,
            254 => WireType::String,
            255 => WireType::Geometry,
            _ => return None,
        };
        Some(wire)
    }

    /// Native code of this wire type.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Name used by the native client headers.
    pub fn name(self) -> &'static str {
        match self {
            WireType::Decimal => "MYSQL_TYPE_DECIMAL",
            WireType::Tiny => "MYSQL_TYPE_TINY",
            WireType::Short => "MYSQL_TYPE_SHORT",
            WireType::Long => "MYSQL_TYPE_LONG",
            WireType::Float => "MYSQL_TYPE_FLOAT",
            WireType::Double => "MYSQL_TYPE_DOUBLE",
            WireType::Null => "MYSQL_TYPE_NULL",
            WireType::Timestamp => "MYSQL_TYPE_TIMESTAMP",
            WireType::LongLong => "MYSQL_TYPE_LONGLONG",
            WireType::Int24 => "MYSQL_TYPE_INT24",
            WireType::Date => "MYSQL_TYPE_DATE",
            WireType::Time => "MYSQL_TYPE_TIME",
            WireType::DateTime => "MYSQL_TYPE_DATETIME",
            WireType::Year => "MYSQL_TYPE_YEAR",
            WireType::NewDate => "MYSQL_TYPE_NEWDATE",
            WireType::VarChar => "MYSQL_TYPE_VARCHAR",
            WireType::Bit => "MYSQL_TYPE_BIT",
            WireType::Json => "MYSQL_TYPE_JSON",
            WireType::NewDecimal => "MYSQL_TYPE_NEWDECIMAL",
            WireType::Enum => "MYSQL_TYPE_ENUM",
            WireType::Set => "MYSQL_TYPE_SET",
            WireType::TinyBlob => "MYSQL_TYPE_TINY_BLOB",
            WireType::MediumBlob => "MYSQL_TYPE_MEDIUM_BLOB",
            WireType::LongBlob => "MYSQL_TYPE_LONG_BLOB",
            WireType::Blob => "MYSQL_TYPE_BLOB",
            WireType::VarString => "MYSQL_TYPE_VAR_STRING",
            WireType::String => "MYSQL_TYPE_STRING",
            WireType::Geometry => "MYSQL_TYPE_GEOMETRY",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
