//! Logical column kinds.
//!
//! A [`TypeTag`] is what a caller declares for a column. It decides the value
//! representation ([`ValueKind`]) and, through the column-type table in
//! [`crate::column::dispatch`], the wire types used on each side.

use std::fmt;

use super::value_kind::ValueKind;

/// Logical database column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    IntUnsigned,
    Char,
    VarChar,
    TinyText,
    Text,
    Blob,
    MediumText,
    MediumBlob,
    LongText,
    LongBlob,
    TinyInt,
    TinyIntUnsigned,
    SmallInt,
    SmallIntUnsigned,
    MediumInt,
    MediumIntUnsigned,
    BigInt,
    BigIntUnsigned,
    Float,
    Double,
    Decimal,
    Date,
    DateTime,
    Timestamp,
    Time,
    Year,
    Enum,
    Set,
    Boolean,
    Bit,
    Geometry,
    Json,
    Binary,
    VarBinary,
    TinyBlob,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 36] = [
        TypeTag::Int,
        TypeTag::IntUnsigned,
        TypeTag::Char,
        TypeTag::VarChar,
        TypeTag::TinyText,
        TypeTag::Text,
        TypeTag::Blob,
        TypeTag::MediumText,
        TypeTag::MediumBlob,
        TypeTag::LongText,
        TypeTag::LongBlob,
        TypeTag::TinyInt,
        TypeTag::TinyIntUnsigned,
        TypeTag::SmallInt,
        TypeTag::SmallIntUnsigned,
        TypeTag::MediumInt,
        TypeTag::MediumIntUnsigned,
        TypeTag::BigInt,
        TypeTag::BigIntUnsigned,
        TypeTag::Float,
        TypeTag::Double,
        TypeTag::Decimal,
        TypeTag::Date,
        TypeTag::DateTime,
        TypeTag::Timestamp,
        TypeTag::Time,
        TypeTag::Year,
        TypeTag::Enum,
        TypeTag::Set,
        TypeTag::Boolean,
        TypeTag::Bit,
        TypeTag::Geometry,
        TypeTag::Json,
        TypeTag::Binary,
        TypeTag::VarBinary,
        TypeTag::TinyBlob,
    ];

    /// Natural in-memory representation for this tag.
    pub fn value_kind(self) -> ValueKind {
        match self {
            TypeTag::TinyInt | TypeTag::Boolean => ValueKind::I8,
            TypeTag::TinyIntUnsigned => ValueKind::U8,
            TypeTag::SmallInt => ValueKind::I16,
            TypeTag::SmallIntUnsigned | TypeTag::Year => ValueKind::U16,
            TypeTag::Int | TypeTag::MediumInt => ValueKind::I32,
            TypeTag::IntUnsigned | TypeTag::MediumIntUnsigned => ValueKind::U32,
            TypeTag::BigInt => ValueKind::I64,
            TypeTag::BigIntUnsigned | TypeTag::Bit => ValueKind::U64,
            TypeTag::Float => ValueKind::F32,
            TypeTag::Double => ValueKind::F64,
            TypeTag::Date | TypeTag::DateTime | TypeTag::Timestamp | TypeTag::Time => {
                ValueKind::Time
            }
            TypeTag::Char
            | TypeTag::VarChar
            | TypeTag::TinyText
            | TypeTag::Text
            | TypeTag::MediumText
            | TypeTag::LongText
            | TypeTag::Blob
            | TypeTag::TinyBlob
            | TypeTag::MediumBlob
            | TypeTag::LongBlob
            | TypeTag::Binary
            | TypeTag::VarBinary
            | TypeTag::Decimal
            | TypeTag::Enum
            | TypeTag::Set
            | TypeTag::Geometry
            | TypeTag::Json => ValueKind::Bytes,
        }
    }

    /// Whether the column owns a variable-length byte buffer.
    pub fn is_byte_sequence(self) -> bool {
        self.value_kind() == ValueKind::Bytes
    }

    /// Whether the column holds a time record.
    pub fn is_temporal(self) -> bool {
        self.value_kind() == ValueKind::Time
    }

    /// Whether the descriptor must be marked unsigned.
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            TypeTag::IntUnsigned
                | TypeTag::TinyIntUnsigned
                | TypeTag::SmallIntUnsigned
                | TypeTag::MediumIntUnsigned
                | TypeTag::BigIntUnsigned
                | TypeTag::Year
                | TypeTag::Bit
        )
    }

    /// SQL spelling of the tag.
    pub fn sql_name(self) -> &'static str {
        match self {
            TypeTag::Int => "INT",
            TypeTag::IntUnsigned => "INT UNSIGNED",
            TypeTag::Char => "CHAR",
            TypeTag::VarChar => "VARCHAR",
            TypeTag::TinyText => "TINYTEXT",
            TypeTag::Text => "TEXT",
            TypeTag::Blob => "BLOB",
            TypeTag::MediumText => "MEDIUMTEXT",
            TypeTag::MediumBlob => "MEDIUMBLOB",
            TypeTag::LongText => "LONGTEXT",
            TypeTag::LongBlob => "LONGBLOB",
            TypeTag::TinyInt => "TINYINT",
            TypeTag::TinyIntUnsigned => "TINYINT UNSIGNED",
            TypeTag::SmallInt => "SMALLINT",
            TypeTag::SmallIntUnsigned => "SMALLINT UNSIGNED",
            TypeTag::MediumInt => "MEDIUMINT",
            TypeTag::MediumIntUnsigned => "MEDIUMINT UNSIGNED",
            TypeTag::BigInt => "BIGINT",
            TypeTag::BigIntUnsigned => "BIGINT UNSIGNED",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Date => "DATE",
            TypeTag::DateTime => "DATETIME",
            TypeTag::Timestamp => "TIMESTAMP",
            TypeTag::Time => "TIME",
            TypeTag::Year => "YEAR",
            TypeTag::Enum => "ENUM",
            TypeTag::Set => "SET",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Bit => "BIT",
            TypeTag::Geometry => "GEOMETRY",
            TypeTag::Json => "JSON",
            TypeTag::Binary => "BINARY",
            TypeTag::VarBinary => "VARBINARY",
            TypeTag::TinyBlob => "TINYBLOB",
        }
    }

    /// Parse an SQL type name such as `"varchar"` or `"int unsigned"`.
    ///
    /// Matching ignores ASCII case and repeated whitespace. Length or
    /// precision suffixes (`varchar(64)`) are not accepted here.
    pub fn from_sql_name(name: &str) -> Option<Self> {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "BOOL" => return Some(TypeTag::Boolean),
            "INTEGER" => return Some(TypeTag::Int),
            "INTEGER UNSIGNED" => return Some(TypeTag::IntUnsigned),
            "NUMERIC" => return Some(TypeTag::Decimal),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.sql_name() == normalized)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_sequence_family_shares_one_representation() {
        for tag in [
            TypeTag::Char,
            TypeTag::VarChar,
            TypeTag::Text,
            TypeTag::LongBlob,
            TypeTag::Json,
            TypeTag::Decimal,
        ] {
            assert_eq!(tag.value_kind(), ValueKind::Bytes, "{tag}");
            assert!(tag.is_byte_sequence());
            assert!(!tag.is_temporal());
        }
    }

    #[test]
    fn test_temporal_family() {
        for tag in [TypeTag::Date, TypeTag::DateTime, TypeTag::Timestamp, TypeTag::Time] {
            assert_eq!(tag.value_kind(), ValueKind::Time);
            assert!(tag.is_temporal());
        }
        assert!(!TypeTag::Year.is_temporal());
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(TypeTag::Int.value_kind(), ValueKind::I32);
        assert_eq!(TypeTag::IntUnsigned.value_kind(), ValueKind::U32);
        assert_eq!(TypeTag::Boolean.value_kind(), ValueKind::I8);
        assert_eq!(TypeTag::BigIntUnsigned.value_kind(), ValueKind::U64);
        assert!(TypeTag::BigIntUnsigned.is_unsigned());
        assert!(!TypeTag::BigInt.is_unsigned());
    }

    #[test]
    fn test_from_sql_name() {
        assert_eq!(TypeTag::from_sql_name("varchar"), Some(TypeTag::VarChar));
        assert_eq!(
            TypeTag::from_sql_name("int   unsigned"),
            Some(TypeTag::IntUnsigned)
        );
        assert_eq!(TypeTag::from_sql_name("Bool"), Some(TypeTag::Boolean));
        assert_eq!(TypeTag::from_sql_name("varchar(10)"), None);
        assert_eq!(TypeTag::from_sql_name("uuid"), None);
    }

    #[test]
    fn test_all_is_complete_and_distinct() {
        let mut names: Vec<_> = TypeTag::ALL.iter().map(|t| t.sql_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TypeTag::ALL.len());
    }
}
