//! Declarative construction of bind collections.

use tracing::trace;

use crate::binds::{Binds, InputBinds, OutputBinds};
use crate::column::dispatch::{make_input, make_output};
use crate::error::Result;
use crate::options::BindOptions;
use crate::schema::TableSchema;
use crate::types::TypeTag;

/// One declared column: name, tag and byte capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub tag: TypeTag,
    /// Byte capacity; ignored for fixed-width tags, 0 means the default.
    pub capacity: usize,
}

/// Shorthand for a [`ColumnSpec`].
pub fn bind(tag: TypeTag, name: impl Into<String>, capacity: usize) -> ColumnSpec {
    ColumnSpec {
        name: name.into(),
        tag,
        capacity,
    }
}

/// Builds input or output collections from column declarations.
///
/// # Example
///
/// ```
/// use mysql_binds_rs::{ColumnFactory, TypeTag};
///
/// let mut binds = ColumnFactory::new()
///     .declare(TypeTag::Int, "id", 0)
///     .declare(TypeTag::VarChar, "name", 64)
///     .build_input()?;
/// binds.set_value("id", 7)?;
/// binds.set_value("name", "ada")?;
/// assert_eq!(binds.column("name")?.to_string(), "ada");
/// # Ok::<(), mysql_binds_rs::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnFactory {
    specs: Vec<ColumnSpec>,
    options: BindOptions,
}

impl ColumnFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Declare the next column.
    pub fn declare(mut self, tag: TypeTag, name: impl Into<String>, capacity: usize) -> Self {
        self.push(bind(tag, name, capacity));
        self
    }

    pub fn push(&mut self, spec: ColumnSpec) {
        self.specs.push(spec);
    }

    /// One column per field, in definition order.
    ///
    /// Byte capacities come from the field length, clamped to
    /// `options.max_capacity`.
    pub fn from_table(table: &TableSchema, options: BindOptions) -> Result<Self> {
        let mut factory = Self::new().with_options(options);
        for field in &table.fields {
            let tag = field.type_tag()?;
            let capacity = if tag.is_byte_sequence() {
                usize::try_from(field.length)
                    .unwrap_or(usize::MAX)
                    .min(factory.options.max_capacity)
            } else {
                0
            };
            factory.push(bind(tag, field.name.clone(), capacity));
        }
        trace!(table = %table.name, columns = factory.specs.len(), "declared columns from schema");
        Ok(factory)
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Build statement parameters.
    pub fn build_input(&self) -> Result<InputBinds> {
        let columns = self
            .specs
            .iter()
            .map(|spec| make_input(&spec.name, spec.tag, spec.capacity, &self.options))
            .collect::<Result<Vec<_>>>()?;
        Binds::new(columns, self.options.clone())
    }

    /// Build result columns.
    pub fn build_output(&self) -> Result<OutputBinds> {
        let columns = self
            .specs
            .iter()
            .map(|spec| make_output(&spec.name, spec.tag, spec.capacity, &self.options))
            .collect::<Result<Vec<_>>>()?;
        Binds::new(columns, self.options.clone())
    }
}

impl FromIterator<ColumnSpec> for ColumnFactory {
    fn from_iter<I: IntoIterator<Item = ColumnSpec>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().collect(),
            options: BindOptions::default(),
        }
    }
}
