//! Bind collections: ordered columns plus the native descriptor array.
//!
//! A collection starts unbuilt. The first call to [`Binds::rebuild`], a
//! selection change or [`Binds::execute`] builds the descriptor array for the
//! currently selected columns, in declaration order. Every rebuild replaces the
//! array wholesale and bumps the generation; a [`DescriptorArray`] snapshot
//! from an earlier generation must not be dereferenced.

use std::fmt;

use tracing::debug;

use crate::column::{Column, InputColumn, OutputColumn};
use crate::descriptor::{Attachment, BindDescriptor, DescriptorArray};
use crate::error::{Error, Result};
use crate::options::BindOptions;
use crate::statement::Statement;
use crate::types::{BindValue, SqlValue};

/// An ordered set of columns and the descriptor array for its selection.
pub struct Binds<C: ?Sized + Column> {
    columns: Vec<Box<C>>,
    descriptors: Vec<BindDescriptor>,
    generation: u64,
    built: bool,
    options: BindOptions,
}

/// Statement parameters.
pub type InputBinds = Binds<dyn InputColumn>;

/// Result columns.
pub type OutputBinds = Binds<dyn OutputColumn>;

impl<C: ?Sized + Column> Binds<C> {
    /// Wrap declared columns. All columns start selected; nothing is built.
    pub fn new(columns: Vec<Box<C>>, options: BindOptions) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            let duplicate = columns[..i]
                .iter()
                .any(|prev| options.name_matching.matches(prev.name(), column.name()));
            if duplicate {
                return Err(Error::DuplicateColumn {
                    name: column.name().to_string(),
                });
            }
        }
        Ok(Self {
            columns,
            descriptors: Vec::new(),
            generation: 0,
            built: false,
            options,
        })
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column at a declaration position.
    pub fn get(&self, index: usize) -> Result<&C> {
        self.columns
            .get(index)
            .map(|column| &**column)
            .ok_or(Error::ColumnIndexOutOfBounds {
                index,
                count: self.columns.len(),
            })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut C> {
        let count = self.columns.len();
        self.columns
            .get_mut(index)
            .map(|column| &mut **column)
            .ok_or(Error::ColumnIndexOutOfBounds { index, count })
    }

    /// Declaration position of a column name.
    pub fn position(&self, name: &str) -> Result<usize> {
        let matching = self.options.name_matching;
        self.columns
            .iter()
            .position(|column| matching.matches(column.name(), name))
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Result<&C> {
        let index = self.position(name)?;
        Ok(&*self.columns[index])
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut C> {
        let index = self.position(name)?;
        Ok(&mut *self.columns[index])
    }

    /// All columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.columns.iter().map(|column| &**column)
    }

    /// Selected columns in declaration order, i.e. descriptor order.
    pub fn selected(&self) -> impl Iterator<Item = &C> {
        self.iter().filter(|column| column.is_selected())
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Select every column and rebuild.
    pub fn select_all(&mut self) {
        for column in &mut self.columns {
            column.core_mut().set_selected(true);
        }
        debug!(selected = self.columns.len(), "all columns selected");
        self.rebuild();
    }

    /// Select exactly the named columns and rebuild.
    ///
    /// Descriptor order follows declaration order, not the order of `names`.
    /// An unknown name fails with `UnknownColumn` before anything changes.
    pub fn select_by_names<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut wanted = vec![false; self.columns.len()];
        for name in names {
            wanted[self.position(name.as_ref())?] = true;
        }
        for (column, selected) in self.columns.iter_mut().zip(&wanted) {
            column.core_mut().set_selected(*selected);
        }
        debug!(
            selected = wanted.iter().filter(|w| **w).count(),
            total = self.columns.len(),
            "column selection changed"
        );
        self.rebuild();
        Ok(())
    }

    /// Replace the descriptor array with one slot per selected column.
    ///
    /// Invalidates every pointer into the previous array.
    pub fn rebuild(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let count = self.columns.iter().filter(|c| c.is_selected()).count();

        let mut descriptors = Vec::with_capacity(count);
        for column in &mut self.columns {
            if column.is_selected() {
                let mut slot = BindDescriptor::empty();
                let attachment = Attachment {
                    generation,
                    index: descriptors.len(),
                };
                column.attach_descriptor(&mut slot, attachment);
                descriptors.push(slot);
            } else {
                column.core_mut().detach();
            }
        }
        self.descriptors = descriptors;
        self.built = true;
        debug!(generation, selected = count, "descriptor array rebuilt");
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Rebuild counter; 0 until the first build.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current descriptor array, empty until built.
    pub fn descriptors(&self) -> &[BindDescriptor] {
        &self.descriptors
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Address of the first descriptor, valid until the next rebuild.
    pub fn descriptor_ptr(&mut self) -> Option<*mut BindDescriptor> {
        self.built.then(|| self.descriptors.as_mut_ptr())
    }

    /// Pointer, length and generation of the current array.
    pub fn snapshot(&mut self) -> Option<DescriptorArray> {
        let ptr = self.descriptor_ptr()?;
        Some(DescriptorArray {
            ptr,
            len: self.descriptors.len(),
            generation: self.generation,
        })
    }

    /// Whether `snapshot` still describes the live array.
    pub fn is_current(&self, snapshot: &DescriptorArray) -> bool {
        self.built && snapshot.generation == self.generation
    }

    /// The live descriptor of a column, or `None` when it is not selected.
    pub fn descriptor_for(&self, name: &str) -> Result<Option<&BindDescriptor>> {
        let column = self.column(name)?;
        Ok(column
            .core()
            .attachment()
            .filter(|attachment| attachment.generation == self.generation)
            .and_then(|attachment| self.descriptors.get(attachment.index)))
    }

    /// Hand the descriptor array to the execution primitive.
    ///
    /// Builds the array first if needed and clears the error flags of the
    /// selected columns so that flags seen afterwards belong to this call.
    pub fn execute<S: Statement + ?Sized>(&mut self, statement: &mut S) -> Result<()> {
        if !self.built {
            self.rebuild();
        }
        for column in self.columns.iter().filter(|c| c.is_selected()) {
            column.core().clear_error();
        }
        statement.execute(&mut self.descriptors)
    }

    /// Selected columns the execution primitive flagged.
    pub fn flagged_columns(&self) -> impl Iterator<Item = &C> {
        self.selected().filter(|column| column.has_error())
    }

    /// Fail with `NativeExecution` naming the first flagged column.
    pub fn check_native_errors(&self) -> Result<()> {
        match self.flagged_columns().next() {
            Some(column) => Err(Error::NativeExecution {
                column: column.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Binds<dyn InputColumn> {
    /// Write a carrier value into a named parameter.
    pub fn set_value<'a>(&mut self, name: &str, value: impl Into<BindValue<'a>>) -> Result<()> {
        self.column_mut(name)?.set_value(value.into())
    }

    /// Mark a named parameter as NULL (or not).
    pub fn set_null(&mut self, name: &str, null: bool) -> Result<()> {
        self.column_mut(name)?.set_null(null);
        Ok(())
    }
}

impl Binds<dyn OutputColumn> {
    /// Read a named result column as `T`.
    pub fn value<T: SqlValue + ?Sized>(&self, name: &str) -> Result<&T> {
        self.column(name)?.value::<T>()
    }

    /// Selected columns whose last fetch was truncated.
    pub fn truncated_columns(&self) -> impl Iterator<Item = &(dyn OutputColumn + 'static)> {
        self.selected().filter(|column| column.is_truncated())
    }
}

impl<C: ?Sized + Column> fmt::Debug for Binds<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name()).collect();
        f.debug_struct("Binds")
            .field("columns", &names)
            .field("selected", &self.selected_count())
            .field("generation", &self.generation)
            .field("built", &self.built)
            .finish()
    }
}
