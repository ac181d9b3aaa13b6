//! Read handles returned by declarations.
//!
//! A handle shares its cell with the parser's registry. Reading it after
//! [`ArgParser::parse`](crate::ArgParser::parse) produces the final value;
//! reading it before parsing sees an unfed cell.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::{GroupValues, Produced, ValueCell};
use crate::error::Result;

/// Handle for a value that is always present after a successful read:
/// a mandatory argument or an option/argument with a default.
pub struct Value<T> {
    cell: Rc<RefCell<ValueCell<T>>>,
}

impl<T: Clone> Value<T> {
    pub(crate) fn new(cell: Rc<RefCell<ValueCell<T>>>) -> Self {
        Self { cell }
    }

    /// Produces the value.
    ///
    /// # Errors
    ///
    /// Returns [`NotSpecified`](crate::ArgvError::NotSpecified) when a
    /// mandatory argument was never given.
    pub fn get(&self) -> Result<T> {
        let cell = self.cell.borrow();
        cell.produce()?
            .into_single()
            .ok_or_else(|| cell.not_specified())
    }

    /// Returns `true` if a token was fed to this value.
    pub fn is_specified(&self) -> bool {
        self.cell.borrow().is_specified()
    }
}

/// Handle for an optional option or argument.
pub struct OptionalValue<T> {
    cell: Rc<RefCell<ValueCell<T>>>,
}

impl<T: Clone> OptionalValue<T> {
    pub(crate) fn new(cell: Rc<RefCell<ValueCell<T>>>) -> Self {
        Self { cell }
    }

    /// Produces the value, or `None` when it was not given.
    pub fn get(&self) -> Option<T> {
        self.cell
            .borrow()
            .produce()
            .ok()
            .and_then(Produced::into_single)
    }

    /// Returns `true` if a token was fed to this value.
    pub fn is_specified(&self) -> bool {
        self.cell.borrow().is_specified()
    }
}

/// Handle for a repeatable option or a vararg argument.
pub struct Values<T> {
    cell: Rc<RefCell<ValueCell<T>>>,
}

impl<T: Clone> Values<T> {
    pub(crate) fn new(cell: Rc<RefCell<ValueCell<T>>>) -> Self {
        Self { cell }
    }

    /// Produces every value in the order the tokens were consumed.
    ///
    /// # Errors
    ///
    /// Returns [`NoValues`](crate::ArgvError::NoValues) for a mandatory
    /// vararg argument that received no tokens.
    pub fn get(&self) -> Result<Vec<T>> {
        Ok(self.cell.borrow().produce()?.into_many())
    }
}

/// Handle for an option group.
pub struct OptionGroup<T> {
    collected: GroupValues<T>,
}

impl<T: Clone> OptionGroup<T> {
    pub(crate) fn new(collected: GroupValues<T>) -> Self {
        Self { collected }
    }

    /// Every `(identifier, value)` pair recorded by any member of the group,
    /// in the order the tokens were consumed.
    pub fn get(&self) -> Vec<(String, T)> {
        self.collected.borrow().clone()
    }
}
