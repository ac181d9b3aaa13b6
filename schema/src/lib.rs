//! Parser definitions as data.
//!
//! This crate reads YAML or JSON descriptions of a command line and builds
//! them into [`argv_core::ArgParser`]s at runtime. Produced values come back
//! as a JSON object keyed by identifier, which makes definitions usable from
//! shell scripts and tooling that never link against Rust code.
//!
//! # Quick start
//!
//! ```no_run
//! use argv_schema::{DynamicOutcome, ParserDefinition};
//!
//! let definition = ParserDefinition::load("deploy.yml").unwrap();
//! let mut parser = definition.build().unwrap();
//!
//! match parser.parse(std::env::args().skip(1)) {
//!     Ok(DynamicOutcome::Values(values)) => println!("{}", serde_json::Value::Object(values)),
//!     Ok(DynamicOutcome::Help(help)) => print!("{help}"),
//!     Err(err) => eprintln!("error: {err}\n{}", parser.usage()),
//! }
//! ```

mod definition;
mod dynamic;
mod error;

pub use definition::{
    ArgumentDecl, GroupDecl, GroupMemberDecl, OptionDecl, ParserDefinition, ValueKind,
};
pub use dynamic::{DynamicOutcome, DynamicParser, ValueMap};
pub use error::{Result, SchemaError};
