//! Declarative command-line token parsing.
//!
//! This crate turns a raw argv-style token sequence into typed values. A
//! program declares its options and positional arguments up front, parses
//! once, and then reads each value through the handle its declaration
//! returned:
//!
//! - [`ArgType`]: converts one token into a typed value; boolean switches
//!   consume no token.
//! - [`ArgParser`]: the registry of declarations and the token scanner
//!   (`--name`, `--name=value`, `-x`, `-xvalue`, clustered `-abc`, `--`).
//! - [`Value`], [`OptionalValue`], [`Values`], [`OptionGroup`]: read
//!   handles, evaluated lazily after parsing.
//! - [`ParserSummary`]: serializable snapshot of the declarations, used to
//!   render the usage line and help text.
//!
//! Declaration errors (duplicate names) and parse errors (unknown options,
//! surplus arguments, bad values) are both reported as [`ArgvError`]; the
//! calling program decides what to print and which exit code to use.
//!
//! # Example
//!
//! ```
//! use argv_core::*;
//!
//! let mut parser = ArgParser::new("test");
//! let dry_run = parser.option(ArgType::boolean(), "dryRun", 'n', "Dry-run mode").declare()?;
//! let filters = parser.option(ArgType::string(), "filter", 'f', "Filter").multiple().declare()?;
//! let input = parser.argument(ArgType::string(), "inputDir", "Input directory").default("inputs".into()).declare()?;
//!
//! parser.parse(["--dry-run", "-f", "red", "-fblue"])?;
//!
//! assert_eq!(dry_run.get(), Some(true));
//! assert_eq!(filters.get()?, ["red", "blue"]);
//! assert_eq!(input.get()?, "inputs");
//! assert_eq!(
//!     parser.syntax(),
//!     "test [ -n | --dry-run ] [ -f <filter> | --filter=<filter> ]... [<inputDir>]"
//! );
//! # Ok::<(), ArgvError>(())
//! ```

mod arg_type;
mod cell;
mod definition;
mod error;
mod naming;
mod parser;
mod summary;
mod value;

pub use arg_type::ArgType;
pub use definition::{
    ArgumentDefinition, DefaultedArgumentDefinition, DefaultedOptionDefinition,
    MultipleOptionDefinition, OptionDefinition, OptionalArgumentDefinition,
    VarargArgumentDefinition,
};
pub use error::{ArgvError, CellKind, Result};
pub use naming::derive_long_name;
pub use parser::{ArgParser, END_OF_OPTIONS, ParseOutcome};
pub use summary::{ArgumentSummary, OptionSummary, ParserSummary, SYNTAX_HEADING};
pub use value::{OptionGroup, OptionalValue, Value, Values};
