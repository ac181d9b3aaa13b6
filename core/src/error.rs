//! Error types for declaring, parsing and reading command-line values.
//!
//! Every failure carries the name of the offending option or argument so a
//! calling program can report it verbatim before printing usage.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What kind of declaration a value cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// A named `-x` / `--name` option.
    Option,
    /// A positional argument.
    Argument,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Option => f.write_str("option"),
            CellKind::Argument => f.write_str("argument"),
        }
    }
}

/// Errors raised while declaring options, parsing tokens or producing values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgvError {
    /// A short or long option name is registered twice.
    #[error("option '{0}' already registered")]
    DuplicateOption(String),

    /// Two positional arguments share a name.
    #[error("argument '{0}' already registered")]
    DuplicateArgument(String),

    /// Short names must be a single ASCII letter or digit.
    #[error("invalid short option name: {0:?}")]
    InvalidShortName(char),

    /// Identifiers must start with a letter and contain only letters,
    /// digits, `-` or `_`.
    #[error("invalid option or argument name: {0:?}")]
    InvalidName(String),

    /// Only the last positional argument may absorb multiple tokens.
    #[error("argument '{argument}' declared after vararg argument '{vararg}'")]
    ArgumentAfterVararg {
        /// The argument being declared.
        argument: String,
        /// The vararg argument already registered.
        vararg: String,
    },

    /// An option group was declared without any alternatives.
    #[error("option group must declare at least one option")]
    EmptyGroup,

    /// A token names an option that was never declared.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// A clustered short flag requires an argument.
    #[error("option '{0}' needs an argument")]
    NeedsArgument(String),

    /// The token stream ended where an option argument was expected.
    #[error("option '{0}' is missing its argument")]
    MissingArgument(String),

    /// A positional token arrived after every positional slot was filled.
    #[error("unexpected trailing argument: {0}")]
    UnexpectedArgument(String),

    /// A single-valued option or argument was given twice.
    #[error("{kind} '{name}' has already been specified")]
    AlreadySpecified {
        /// Option or argument.
        kind: CellKind,
        /// Display name (`--long` for options).
        name: String,
    },

    /// The type converter rejected a token.
    #[error("invalid value '{value}' for {kind} '{name}': {reason}")]
    InvalidValue {
        /// Option or argument.
        kind: CellKind,
        /// Display name (`--long` for options).
        name: String,
        /// The rejected token.
        value: String,
        /// Converter message.
        reason: String,
    },

    /// A mandatory option or argument was never given.
    #[error("{kind} '{name}' has not been specified")]
    NotSpecified {
        /// Option or argument.
        kind: CellKind,
        /// Display name (`--long` for options).
        name: String,
    },

    /// A mandatory vararg argument received no tokens.
    #[error("no values specified for '{0}'")]
    NoValues(String),

    /// `parse` was called a second time on the same parser.
    #[error("arguments have already been parsed")]
    AlreadyParsed,
}

/// Convenience alias for results with [`ArgvError`].
pub type Result<T> = std::result::Result<T, ArgvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = ArgvError::AlreadySpecified {
            kind: CellKind::Option,
            name: "--environment".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "option '--environment' has already been specified"
        );

        let err = ArgvError::InvalidValue {
            kind: CellKind::Argument,
            name: "count".to_string(),
            value: "ten".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'ten' for argument 'count': invalid digit found in string"
        );
    }
}
