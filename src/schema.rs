//! Table schemas supplied by an external introspection source.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{TypeTag, WireType, BINARY_FLAG, ENUM_FLAG, SET_FLAG, UNSIGNED_FLAG};

/// One column as reported by the server's field metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: String,
    /// Native `enum_field_types` code.
    pub wire_code: u32,
    /// Native column flags.
    pub flags: u64,
    /// Column length in bytes, as the field metadata reports it. For text
    /// columns this already includes the charset's bytes per character.
    pub length: u64,
    /// Bytes per character of the column charset (4 for `utf8mb4`), when
    /// known.
    pub charset_width: Option<u64>,
    /// SQL type as written in the table definition, e.g. `int unsigned`.
    pub external_type: Option<String>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, wire_type: WireType, flags: u64, length: u64) -> Self {
        Self {
            name: name.into(),
            wire_code: wire_type.code(),
            flags,
            length,
            charset_width: None,
            external_type: None,
        }
    }

    pub fn with_charset_width(mut self, width: u64) -> Self {
        self.charset_width = Some(width);
        self
    }

    /// Length in characters, or in bytes when the charset width is unknown.
    pub fn char_length(&self) -> u64 {
        match self.charset_width {
            Some(width) if width > 1 => self.length / width,
            _ => self.length,
        }
    }

    pub fn with_external_type(mut self, external_type: impl Into<String>) -> Self {
        self.external_type = Some(external_type.into());
        self
    }

    /// Infer the column's type tag.
    ///
    /// A parseable external type wins; otherwise the wire code, flags and
    /// character length decide.
    pub fn type_tag(&self) -> Result<TypeTag> {
        if let Some(tag) = self.external_type.as_deref().and_then(TypeTag::from_sql_name) {
            return Ok(tag);
        }
        TypeTag::from_schema(self.wire_code, self.flags, self.char_length()).ok_or_else(|| {
            debug!(
                field = %self.name,
                code = self.wire_code,
                flags = self.flags,
                "no type tag for schema field"
            );
            Error::UnsupportedWireType {
                field: self.name.clone(),
                code: self.wire_code,
            }
        })
    }
}

/// A table and its fields in definition order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Find a field by name (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }
}

/// Schema introspection collaborator.
pub trait SchemaSource {
    /// Every table visible to the source.
    fn tables(&mut self) -> Result<Vec<TableSchema>>;

    /// One table by name (case-insensitive).
    fn table(&mut self, name: &str) -> Result<TableSchema> {
        self.tables()?
            .into_iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownTable {
                name: name.to_string(),
            })
    }
}

impl SchemaSource for Vec<TableSchema> {
    fn tables(&mut self) -> Result<Vec<TableSchema>> {
        Ok(self.clone())
    }
}

const TINY_BLOB_MAX: u64 = 255;
const BLOB_MAX: u64 = 65_535;
const MEDIUM_BLOB_MAX: u64 = 16_777_215;

impl TypeTag {
    /// Infer a tag from native field metadata.
    ///
    /// The server reports every TEXT and BLOB column as `MYSQL_TYPE_BLOB`;
    /// the size class comes from `length` and text versus binary from the
    /// binary flag. `length` must be in characters: a multi-byte charset
    /// inflates the reported byte length (a `utf8mb4` TEXT reports 262140),
    /// so divide by the charset width first, as [`SchemaField::type_tag`]
    /// does. Returns `None` for codes with no bindable tag.
    pub fn from_schema(wire_code: u32, flags: u64, length: u64) -> Option<Self> {
        let unsigned = flags & UNSIGNED_FLAG != 0;
        let binary = flags & BINARY_FLAG != 0;
        let pick = |signed: TypeTag, unsigned_tag: TypeTag| {
            if unsigned {
                unsigned_tag
            } else {
                signed
            }
        };

        let tag = match WireType::from_code(wire_code)? {
            WireType::Tiny if !unsigned && length == 1 => TypeTag::Boolean,
            WireType::Tiny => pick(TypeTag::TinyInt, TypeTag::TinyIntUnsigned),
            WireType::Short => pick(TypeTag::SmallInt, TypeTag::SmallIntUnsigned),
            WireType::Int24 => pick(TypeTag::MediumInt, TypeTag::MediumIntUnsigned),
            WireType::Long => pick(TypeTag::Int, TypeTag::IntUnsigned),
            WireType::LongLong => pick(TypeTag::BigInt, TypeTag::BigIntUnsigned),
            WireType::Float => TypeTag::Float,
            WireType::Double => TypeTag::Double,
            WireType::Decimal | WireType::NewDecimal => TypeTag::Decimal,
            WireType::Date | WireType::NewDate => TypeTag::Date,
            WireType::DateTime => TypeTag::DateTime,
            WireType::Timestamp => TypeTag::Timestamp,
            WireType::Time => TypeTag::Time,
            WireType::Year => TypeTag::Year,
            WireType::Bit => TypeTag::Bit,
            WireType::Json => TypeTag::Json,
            WireType::Geometry => TypeTag::Geometry,
            WireType::Enum => TypeTag::Enum,
            WireType::Set => TypeTag::Set,
            WireType::String if flags & ENUM_FLAG != 0 => TypeTag::Enum,
            WireType::String if flags & SET_FLAG != 0 => TypeTag::Set,
            WireType::String if binary => TypeTag::Binary,
            WireType::String => TypeTag::Char,
            WireType::VarChar | WireType::VarString if binary => TypeTag::VarBinary,
            WireType::VarChar | WireType::VarString => TypeTag::VarChar,
            WireType::TinyBlob if binary => TypeTag::TinyBlob,
            WireType::TinyBlob => TypeTag::TinyText,
            WireType::MediumBlob if binary => TypeTag::MediumBlob,
            WireType::MediumBlob => TypeTag::MediumText,
            WireType::LongBlob if binary => TypeTag::LongBlob,
            WireType::LongBlob => TypeTag::LongText,
            WireType::Blob => match (length, binary) {
                (0..=TINY_BLOB_MAX, true) => TypeTag::TinyBlob,
                (0..=TINY_BLOB_MAX, false) => TypeTag::TinyText,
                (0..=BLOB_MAX, true) => TypeTag::Blob,
                (0..=BLOB_MAX, false) => TypeTag::Text,
                (0..=MEDIUM_BLOB_MAX, true) => TypeTag::MediumBlob,
                (0..=MEDIUM_BLOB_MAX, false) => TypeTag::MediumText,
                (_, true) => TypeTag::LongBlob,
                (_, false) => TypeTag::LongText,
            },
            WireType::Null => return None,
        };
        Some(tag)
    }
}
