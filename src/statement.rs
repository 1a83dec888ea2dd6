//! The statement execution seam.

use crate::descriptor::BindDescriptor;
use crate::error::Result;

/// An external primitive that executes a prepared statement against a
/// descriptor array.
///
/// Implementations read parameter buffers, or write result buffers, through
/// the raw pointers in each descriptor. They may set the `is_null`, `length`
/// and `error` targets of any descriptor they are handed, and must not retain
/// the pointers past the call.
pub trait Statement {
    fn execute(&mut self, descriptors: &mut [BindDescriptor]) -> Result<()>;
}

impl<F> Statement for F
where
    F: FnMut(&mut [BindDescriptor]) -> Result<()>,
{
    fn execute(&mut self, descriptors: &mut [BindDescriptor]) -> Result<()> {
        self(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_closure_statement() {
        let mut seen = 0;
        let mut stmt = |descriptors: &mut [BindDescriptor]| -> Result<()> {
            seen = descriptors.len();
            Ok(())
        };
        let mut slots = [BindDescriptor::empty(), BindDescriptor::empty()];
        stmt.execute(&mut slots).unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_closure_statement_error() {
        let mut stmt =
            |_: &mut [BindDescriptor]| -> Result<()> { Err(Error::statement("server gone away")) };
        let err = stmt.execute(&mut []).unwrap_err();
        assert_eq!(err.to_string(), "Statement error: server gone away");
    }
}
