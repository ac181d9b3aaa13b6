//! Runtime parsers built from a [`ParserDefinition`].
//!
//! Every declaration gets the `serde_json::Value` converter matching its
//! [`ValueKind`], so one parser type serves any definition. Produced values
//! are collected into a JSON object keyed by identifier.

use std::collections::HashSet;

use argv_core::{
    ArgParser, ArgType, ArgvError, OptionGroup, OptionalValue, ParseOutcome, ParserSummary, Value,
    Values,
};
use regex::Regex;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::definition::{ArgumentDecl, GroupDecl, OptionDecl, ParserDefinition, ValueKind};
use crate::error::{Result, SchemaError};

/// Produced values keyed by identifier.
pub type ValueMap = Map<String, JsonValue>;

/// Result of [`DynamicParser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicOutcome {
    /// Every declared key with its produced value.
    Values(ValueMap),
    /// The help switch was given; carries the rendered help text.
    Help(String),
}

enum Binding {
    Optional(OptionalValue<JsonValue>),
    Required(Value<JsonValue>),
    Many(Values<JsonValue>),
    Group(OptionGroup<JsonValue>),
}

impl Binding {
    fn read(&self) -> Result<JsonValue> {
        let value = match self {
            Self::Optional(value) => value.get().unwrap_or(JsonValue::Null),
            Self::Required(value) => value.get()?,
            Self::Many(values) => JsonValue::Array(values.get()?),
            Self::Group(group) => group
                .get()
                .into_iter()
                .map(|(name, value)| JsonValue::Array(vec![JsonValue::String(name), value]))
                .collect(),
        };
        Ok(value)
    }
}

fn invalid(what: &str, name: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidDefinition(format!("{what} '{name}': {reason}"))
}

fn converter(
    what: &str,
    name: &str,
    kind: ValueKind,
    pattern: Option<&str>,
) -> Result<ArgType<JsonValue>> {
    if kind != ValueKind::Pattern && pattern.is_some() {
        return Err(invalid(what, name, "pattern is only allowed with type 'pattern'"));
    }
    let arg_type = match kind {
        ValueKind::Bool => ArgType::boolean().map(JsonValue::Bool),
        ValueKind::String => ArgType::string().map(JsonValue::String),
        ValueKind::Integer => ArgType::integer().map(JsonValue::from),
        ValueKind::Pattern => {
            let pattern =
                pattern.ok_or_else(|| invalid(what, name, "type 'pattern' requires a pattern"))?;
            let regex = Regex::new(pattern)
                .map_err(|e| invalid(what, name, &format!("bad pattern: {e}")))?;
            ArgType::matching(regex).map(JsonValue::String)
        }
    };
    Ok(arg_type)
}

/// Checks a declared default against the converter's output type.
fn check_default(
    what: &str,
    name: &str,
    arg_type: &ArgType<JsonValue>,
    kind: ValueKind,
    default: &JsonValue,
) -> Result<()> {
    let fits = match (kind, default) {
        (ValueKind::Bool, JsonValue::Bool(_)) => true,
        (ValueKind::Integer, JsonValue::Number(n)) => n.is_i64(),
        (ValueKind::String, JsonValue::String(_)) => true,
        (ValueKind::Pattern, JsonValue::String(s)) => arg_type.read(s).is_ok(),
        _ => false,
    };
    if fits {
        Ok(())
    } else {
        Err(invalid(
            what,
            name,
            &format!("default {default} does not fit type '{}'", kind.as_str()),
        ))
    }
}

/// A parser assembled from a definition.
///
/// # Examples
///
/// ```
/// use argv_schema::{DynamicOutcome, ParserDefinition};
/// use serde_json::json;
///
/// let definition = ParserDefinition::from_yaml_str(
///     r#"
/// name: copy
/// options:
///   - { name: force, short: f, type: bool }
///   - { name: retries, short: r, type: integer, default: 3 }
/// arguments:
///   - { name: source, type: string }
///   - { name: target, type: string, optional: true }
/// "#,
/// )?;
/// let mut parser = definition.build()?;
/// assert_eq!(parser.syntax(), "copy [ -f | --force ] [ -r <retries> | --retries=<retries> ] <source> [<target>]");
///
/// let DynamicOutcome::Values(values) = parser.parse(["-f", "a.txt"])? else {
///     unreachable!()
/// };
/// assert_eq!(values["force"], json!(true));
/// assert_eq!(values["retries"], json!(3));
/// assert_eq!(values["source"], json!("a.txt"));
/// assert_eq!(values["target"], json!(null));
/// # Ok::<(), argv_schema::SchemaError>(())
/// ```
pub struct DynamicParser {
    parser: ArgParser,
    bindings: Vec<(String, Binding)>,
}

impl ParserDefinition {
    /// Declares every option, group and argument on a fresh parser.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDefinition`](SchemaError::InvalidDefinition) for
    /// inconsistent declarations (a default of the wrong type, a default
    /// combined with `multiple`, `optional` or `vararg`, a missing or
    /// malformed pattern, two declarations producing the same key), and
    /// [`Argv`](SchemaError::Argv) for anything the engine rejects.
    pub fn build(&self) -> Result<DynamicParser> {
        let mut parser = ArgParser::new(self.name.as_str());
        if self.help {
            parser = parser.with_help()?;
        }

        let mut keys = HashSet::new();
        let mut bindings = Vec::new();
        for option in &self.options {
            claim_key(&mut keys, "option", &option.name)?;
            bindings.push((option.name.clone(), declare_option(&mut parser, option)?));
        }
        for group in &self.groups {
            let Some(first) = group.members.first() else {
                return Err(ArgvError::EmptyGroup.into());
            };
            claim_key(&mut keys, "group", &first.name)?;
            bindings.push((first.name.clone(), declare_group(&mut parser, group)?));
        }
        for argument in &self.arguments {
            claim_key(&mut keys, "argument", &argument.name)?;
            bindings.push((argument.name.clone(), declare_argument(&mut parser, argument)?));
        }

        debug!(app = %self.name, keys = bindings.len(), "Built parser from definition");
        Ok(DynamicParser { parser, bindings })
    }
}

fn claim_key(keys: &mut HashSet<String>, what: &str, name: &str) -> Result<()> {
    if keys.insert(name.to_string()) {
        Ok(())
    } else {
        Err(invalid(what, name, "name is already used by another declaration"))
    }
}

fn declare_option(parser: &mut ArgParser, option: &OptionDecl) -> Result<Binding> {
    let name = option.name.as_str();
    let mut arg_type = converter("option", name, option.kind, option.pattern.as_deref())?;
    if let Some(value_name) = &option.value_name {
        arg_type = arg_type.with_value_name(value_name.as_str());
    }
    let declaration = parser.option(arg_type.clone(), name, option.short, &option.description);

    let binding = match (&option.default, option.multiple) {
        (Some(_), true) => {
            return Err(invalid("option", name, "a multiple option cannot have a default"));
        }
        (None, true) => Binding::Many(declaration.multiple().declare()?),
        (Some(default), false) => {
            check_default("option", name, &arg_type, option.kind, default)?;
            Binding::Required(declaration.default(default.clone()).declare()?)
        }
        (None, false) => Binding::Optional(declaration.declare()?),
    };
    Ok(binding)
}

fn declare_group(parser: &mut ArgParser, group: &GroupDecl) -> Result<Binding> {
    let first = group.members.first().map_or("", |m| m.name.as_str());
    let mut arg_type = converter("group", first, group.kind, group.pattern.as_deref())?;
    if let Some(value_name) = &group.value_name {
        arg_type = arg_type.with_value_name(value_name.as_str());
    }
    let members: Vec<(&str, char)> = group
        .members
        .iter()
        .map(|m| (m.name.as_str(), m.short))
        .collect();
    Ok(Binding::Group(parser.option_group(arg_type, &members)?))
}

fn declare_argument(parser: &mut ArgParser, argument: &ArgumentDecl) -> Result<Binding> {
    let name = argument.name.as_str();
    let arg_type = converter("argument", name, argument.kind, argument.pattern.as_deref())?;
    let declaration = parser.argument(arg_type.clone(), name, &argument.description);

    let binding = match (&argument.default, argument.optional, argument.vararg) {
        (Some(_), _, true) => {
            return Err(invalid("argument", name, "a vararg argument cannot have a default"));
        }
        (Some(_), true, false) => {
            return Err(invalid("argument", name, "an optional argument cannot have a default"));
        }
        (None, true, true) => Binding::Many(declaration.optional().vararg().declare()?),
        (None, false, true) => Binding::Many(declaration.vararg().declare()?),
        (Some(default), false, false) => {
            check_default("argument", name, &arg_type, argument.kind, default)?;
            Binding::Required(declaration.default(default.clone()).declare()?)
        }
        (None, true, false) => Binding::Optional(declaration.optional().declare()?),
        (None, false, false) => Binding::Required(declaration.declare()?),
    };
    Ok(binding)
}

impl DynamicParser {
    /// Parses `tokens` and collects every declared value.
    ///
    /// Absent optional values are `null`, repeatable options and varargs are
    /// arrays, and a group is an array of `[name, value]` pairs keyed by its
    /// first member.
    ///
    /// # Errors
    ///
    /// Returns [`Argv`](SchemaError::Argv) on any parse failure, including a
    /// missing mandatory argument.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<DynamicOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let ParseOutcome::HelpRequested(help) = self.parser.parse_argv(tokens)? {
            return Ok(DynamicOutcome::Help(help));
        }
        let mut values = ValueMap::new();
        for (key, binding) in &self.bindings {
            values.insert(key.clone(), binding.read()?);
        }
        Ok(DynamicOutcome::Values(values))
    }

    /// Program name from the definition.
    pub fn app_name(&self) -> &str {
        self.parser.app_name()
    }

    /// One-line syntax summary.
    pub fn syntax(&self) -> String {
        self.parser.syntax()
    }

    /// Syntax summary with its heading.
    pub fn usage(&self) -> String {
        self.parser.usage()
    }

    /// Usage line followed by option and argument tables.
    pub fn help(&self) -> String {
        self.parser.help()
    }

    /// Serializable snapshot of the declarations.
    pub fn describe(&self) -> ParserSummary {
        self.parser.describe()
    }
}
