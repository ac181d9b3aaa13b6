//! Declaration builders.
//!
//! [`ArgParser::option`](crate::ArgParser::option) and
//! [`ArgParser::argument`](crate::ArgParser::argument) return a builder that
//! can be refined (`default`, `multiple`, `optional`, `vararg`) before
//! `declare()` registers the cell and hands back a typed read handle. The
//! builder chain only decides the cell's [`Arity`]; every declaration ends up
//! as the same generic cell type.

use std::rc::Rc;

use crate::arg_type::ArgType;
use crate::cell::{Arity, DefaultProvider, Presence};
use crate::error::Result;
use crate::parser::ArgParser;
use crate::value::{OptionalValue, Value, Values};

/// Fields shared by every option declaration.
pub(crate) struct OptionSpec<T> {
    pub arg_type: ArgType<T>,
    pub identifier: String,
    pub short: char,
    pub description: String,
}

/// Fields shared by every positional argument declaration.
pub(crate) struct ArgumentSpec<T> {
    pub arg_type: ArgType<T>,
    pub identifier: String,
    pub description: String,
}

fn constant<T: Clone + 'static>(value: T) -> DefaultProvider<T> {
    Rc::new(move || value.clone())
}

/// An option that produces `None` when not given.
#[must_use = "call `declare()` to register the option"]
pub struct OptionDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: OptionSpec<T>,
}

impl<'p, T: Clone + 'static> OptionDefinition<'p, T> {
    pub(crate) fn new(parser: &'p mut ArgParser, spec: OptionSpec<T>) -> Self {
        Self { parser, spec }
    }

    /// Produces `value` when the option is not given.
    pub fn default(self, value: T) -> DefaultedOptionDefinition<'p, T> {
        DefaultedOptionDefinition {
            parser: self.parser,
            spec: self.spec,
            provider: constant(value),
        }
    }

    /// Produces the provider's result when the option is not given.
    ///
    /// The provider runs when the value is read, not at declaration.
    pub fn default_with<F>(self, provider: F) -> DefaultedOptionDefinition<'p, T>
    where
        F: Fn() -> T + 'static,
    {
        DefaultedOptionDefinition {
            parser: self.parser,
            spec: self.spec,
            provider: Rc::new(provider),
        }
    }

    /// Accepts the option any number of times, one value per occurrence.
    pub fn multiple(self) -> MultipleOptionDefinition<'p, T> {
        MultipleOptionDefinition {
            parser: self.parser,
            spec: self.spec,
        }
    }

    /// Registers the option.
    ///
    /// # Errors
    ///
    /// Fails when the short or derived long name is invalid or taken.
    pub fn declare(self) -> Result<OptionalValue<T>> {
        let cell = self
            .parser
            .register_option(self.spec, Arity::Single(Presence::Optional))?;
        Ok(OptionalValue::new(cell))
    }
}

/// An option with a default value.
#[must_use = "call `declare()` to register the option"]
pub struct DefaultedOptionDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: OptionSpec<T>,
    provider: DefaultProvider<T>,
}

impl<T: Clone + 'static> DefaultedOptionDefinition<'_, T> {
    /// Registers the option.
    ///
    /// # Errors
    ///
    /// Fails when the short or derived long name is invalid or taken.
    pub fn declare(self) -> Result<Value<T>> {
        let arity = Arity::Single(Presence::Defaulted(self.provider));
        let cell = self.parser.register_option(self.spec, arity)?;
        Ok(Value::new(cell))
    }
}

/// A repeatable option.
#[must_use = "call `declare()` to register the option"]
pub struct MultipleOptionDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: OptionSpec<T>,
}

impl<T: Clone + 'static> MultipleOptionDefinition<'_, T> {
    /// Registers the option.
    ///
    /// # Errors
    ///
    /// Fails when the short or derived long name is invalid or taken.
    pub fn declare(self) -> Result<Values<T>> {
        let cell = self
            .parser
            .register_option(self.spec, Arity::Many { required: false })?;
        Ok(Values::new(cell))
    }
}

/// A mandatory positional argument.
#[must_use = "call `declare()` to register the argument"]
pub struct ArgumentDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: ArgumentSpec<T>,
}

impl<'p, T: Clone + 'static> ArgumentDefinition<'p, T> {
    pub(crate) fn new(parser: &'p mut ArgParser, spec: ArgumentSpec<T>) -> Self {
        Self { parser, spec }
    }

    /// Makes the argument optional.
    pub fn optional(self) -> OptionalArgumentDefinition<'p, T> {
        OptionalArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
        }
    }

    /// Produces `value` when the argument is not given.
    pub fn default(self, value: T) -> DefaultedArgumentDefinition<'p, T> {
        DefaultedArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
            provider: constant(value),
        }
    }

    /// Produces the provider's result when the argument is not given.
    pub fn default_with<F>(self, provider: F) -> DefaultedArgumentDefinition<'p, T>
    where
        F: Fn() -> T + 'static,
    {
        DefaultedArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
            provider: Rc::new(provider),
        }
    }

    /// Absorbs one or more trailing positional tokens.
    pub fn vararg(self) -> VarargArgumentDefinition<'p, T> {
        VarargArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
            required: true,
        }
    }

    /// Registers the argument.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid, taken, or follows a vararg argument.
    pub fn declare(self) -> Result<Value<T>> {
        let cell = self
            .parser
            .register_argument(self.spec, Arity::Single(Presence::Mandatory))?;
        Ok(Value::new(cell))
    }
}

/// A positional argument with a default value.
#[must_use = "call `declare()` to register the argument"]
pub struct DefaultedArgumentDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: ArgumentSpec<T>,
    provider: DefaultProvider<T>,
}

impl<'p, T: Clone + 'static> DefaultedArgumentDefinition<'p, T> {
    /// Drops the default and makes the argument optional.
    pub fn optional(self) -> OptionalArgumentDefinition<'p, T> {
        OptionalArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
        }
    }

    /// Registers the argument.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid, taken, or follows a vararg argument.
    pub fn declare(self) -> Result<Value<T>> {
        let arity = Arity::Single(Presence::Defaulted(self.provider));
        let cell = self.parser.register_argument(self.spec, arity)?;
        Ok(Value::new(cell))
    }
}

/// An optional positional argument.
#[must_use = "call `declare()` to register the argument"]
pub struct OptionalArgumentDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: ArgumentSpec<T>,
}

impl<'p, T: Clone + 'static> OptionalArgumentDefinition<'p, T> {
    /// Absorbs zero or more trailing positional tokens.
    pub fn vararg(self) -> VarargArgumentDefinition<'p, T> {
        VarargArgumentDefinition {
            parser: self.parser,
            spec: self.spec,
            required: false,
        }
    }

    /// Registers the argument.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid, taken, or follows a vararg argument.
    pub fn declare(self) -> Result<OptionalValue<T>> {
        let cell = self
            .parser
            .register_argument(self.spec, Arity::Single(Presence::Optional))?;
        Ok(OptionalValue::new(cell))
    }
}

/// A positional argument absorbing every remaining positional token.
#[must_use = "call `declare()` to register the argument"]
pub struct VarargArgumentDefinition<'p, T> {
    parser: &'p mut ArgParser,
    spec: ArgumentSpec<T>,
    required: bool,
}

impl<T: Clone + 'static> VarargArgumentDefinition<'_, T> {
    /// Registers the argument.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid, taken, or follows a vararg argument.
    pub fn declare(self) -> Result<Values<T>> {
        let arity = Arity::Many {
            required: self.required,
        };
        let cell = self.parser.register_argument(self.spec, arity)?;
        Ok(Values::new(cell))
    }
}
