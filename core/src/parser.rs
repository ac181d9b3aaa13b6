//! The option/argument registry and the token scanner.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::arg_type::ArgType;
use crate::cell::{Arity, GroupMember, GroupValues, SharedSlot, ValueCell};
use crate::definition::{ArgumentDefinition, ArgumentSpec, OptionDefinition, OptionSpec};
use crate::error::{ArgvError, CellKind, Result};
use crate::naming::{derive_long_name, validate_identifier, validate_short_name};
use crate::summary::{ArgumentSummary, OptionSummary, ParserSummary};
use crate::value::{OptionGroup, OptionalValue};

/// Token that ends option scanning; everything after it is positional.
pub const END_OF_OPTIONS: &str = "--";

/// Outcome of [`ArgParser::parse_argv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Tokens were parsed; read values through the handles.
    Parsed,
    /// `-h`/`--help` was given; carries the rendered help text.
    HelpRequested(String),
}

struct OptionEntry {
    short: char,
    long: String,
    description: String,
    group: Option<String>,
    slot: SharedSlot,
}

struct ArgumentEntry {
    name: String,
    description: String,
    slot: SharedSlot,
}

/// Transient scan state for one `parse` call.
#[derive(Debug, Default)]
struct Cursor {
    /// Index of the positional argument the next positional token feeds.
    position: usize,
    /// Set once `--` has been seen.
    in_argument_list: bool,
}

/// Declarative command-line parser.
///
/// Declare options and arguments first; each declaration returns a handle.
/// Then call [`parse`](ArgParser::parse) once and read the handles.
///
/// # Examples
///
/// ```
/// use argv_core::{ArgParser, ArgType};
///
/// let mut parser = ArgParser::new("deploy");
/// let verbose = parser.option(ArgType::boolean(), "verbose", 'v', "Verbose mode").declare()?;
/// let environment = parser
///     .option(ArgType::string(), "environment", 'e', "Target environment")
///     .default("latest".to_string())
///     .declare()?;
/// let jobs = parser.option(ArgType::integer(), "jobs", 'j', "Parallel jobs").declare()?;
/// let targets = parser.argument(ArgType::string(), "targets", "Hosts").vararg().declare()?;
///
/// parser.parse(["-v", "-j4", "web1", "--", "-web2"])?;
///
/// assert_eq!(verbose.get(), Some(true));
/// assert_eq!(environment.get()?, "latest");
/// assert_eq!(jobs.get(), Some(4));
/// assert_eq!(targets.get()?, vec!["web1", "-web2"]);
/// # Ok::<(), argv_core::ArgvError>(())
/// ```
pub struct ArgParser {
    app_name: String,
    options: Vec<OptionEntry>,
    by_short: HashMap<char, usize>,
    by_long: HashMap<String, usize>,
    arguments: Vec<ArgumentEntry>,
    help_switch: Option<OptionalValue<bool>>,
    parsed: bool,
}

impl ArgParser {
    /// Creates an empty parser for the program `app_name`.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            options: Vec::new(),
            by_short: HashMap::new(),
            by_long: HashMap::new(),
            arguments: Vec::new(),
            help_switch: None,
            parsed: false,
        }
    }

    /// Registers the built-in `-h`/`--help` switch used by
    /// [`parse_argv`](ArgParser::parse_argv).
    ///
    /// # Errors
    ///
    /// Fails if `-h` or `--help` is already registered.
    pub fn with_help(mut self) -> Result<Self> {
        let help = self
            .option(ArgType::boolean(), "help", 'h', "Show this help text")
            .declare()?;
        self.help_switch = Some(help);
        Ok(self)
    }

    /// Program name used in the usage line.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Starts declaring an option.
    ///
    /// The long name is derived from `identifier` with
    /// [`derive_long_name`](crate::derive_long_name).
    pub fn option<T: Clone + 'static>(
        &mut self,
        arg_type: ArgType<T>,
        identifier: &str,
        short: char,
        description: &str,
    ) -> OptionDefinition<'_, T> {
        OptionDefinition::new(
            self,
            OptionSpec {
                arg_type,
                identifier: identifier.to_string(),
                short,
                description: description.to_string(),
            },
        )
    }

    /// Starts declaring a positional argument. Arguments are filled in
    /// declaration order.
    pub fn argument<T: Clone + 'static>(
        &mut self,
        arg_type: ArgType<T>,
        identifier: &str,
        description: &str,
    ) -> ArgumentDefinition<'_, T> {
        ArgumentDefinition::new(
            self,
            ArgumentSpec {
                arg_type,
                identifier: identifier.to_string(),
                description: description.to_string(),
            },
        )
    }

    /// Declares a group of alternative options sharing one converter.
    ///
    /// Each `(identifier, short)` member gets its own short and long name;
    /// every occurrence of any member appends `(identifier, value)` to the
    /// group's sequence. The first member names the group.
    ///
    /// # Errors
    ///
    /// Fails with [`ArgvError::EmptyGroup`] for an empty member list, or when
    /// any member name is invalid or taken. Nothing is registered on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use argv_core::{ArgParser, ArgType};
    ///
    /// let mut parser = ArgParser::new("test");
    /// let actions = parser.option_group(ArgType::boolean(), &[("status", 's'), ("resolve", 'r')])?;
    /// parser.parse(["-srs"])?;
    ///
    /// let names: Vec<String> = actions.get().into_iter().map(|(name, _)| name).collect();
    /// assert_eq!(names, ["status", "resolve", "status"]);
    /// # Ok::<(), argv_core::ArgvError>(())
    /// ```
    pub fn option_group<T: Clone + 'static>(
        &mut self,
        arg_type: ArgType<T>,
        members: &[(&str, char)],
    ) -> Result<OptionGroup<T>> {
        let Some(&(group, _)) = members.first() else {
            return Err(ArgvError::EmptyGroup);
        };

        let mut longs = Vec::with_capacity(members.len());
        let mut seen_short = HashSet::new();
        for &(identifier, short) in members {
            validate_identifier(identifier)?;
            validate_short_name(short)?;
            let long = derive_long_name(identifier);
            self.check_available(short, &long)?;
            if longs.contains(&long) {
                return Err(ArgvError::DuplicateOption(format!("--{long}")));
            }
            if !seen_short.insert(short) {
                return Err(ArgvError::DuplicateOption(format!("-{short}")));
            }
            longs.push(long);
        }

        let collected: GroupValues<T> = Rc::new(RefCell::new(Vec::new()));
        for (&(identifier, short), long) in members.iter().zip(longs) {
            let member = GroupMember::new(
                identifier.to_string(),
                long.clone(),
                arg_type.clone(),
                Rc::clone(&collected),
            );
            self.insert_option(OptionEntry {
                short,
                long,
                description: String::new(),
                group: Some(group.to_string()),
                slot: Rc::new(RefCell::new(member)),
            });
        }
        Ok(OptionGroup::new(collected))
    }

    pub(crate) fn register_option<T: Clone + 'static>(
        &mut self,
        spec: OptionSpec<T>,
        arity: Arity<T>,
    ) -> Result<Rc<RefCell<ValueCell<T>>>> {
        validate_identifier(&spec.identifier)?;
        validate_short_name(spec.short)?;
        let long = derive_long_name(&spec.identifier);
        self.check_available(spec.short, &long)?;

        let cell = Rc::new(RefCell::new(ValueCell::new(
            CellKind::Option,
            long.clone(),
            spec.arg_type,
            arity,
        )));
        self.insert_option(OptionEntry {
            short: spec.short,
            long,
            description: spec.description,
            group: None,
            slot: cell.clone(),
        });
        Ok(cell)
    }

    pub(crate) fn register_argument<T: Clone + 'static>(
        &mut self,
        spec: ArgumentSpec<T>,
        arity: Arity<T>,
    ) -> Result<Rc<RefCell<ValueCell<T>>>> {
        validate_identifier(&spec.identifier)?;
        if self.arguments.iter().any(|a| a.name == spec.identifier) {
            return Err(ArgvError::DuplicateArgument(spec.identifier));
        }
        if let Some(vararg) = self.arguments.iter().find(|a| a.slot.borrow().is_multiple()) {
            return Err(ArgvError::ArgumentAfterVararg {
                argument: spec.identifier,
                vararg: vararg.name.clone(),
            });
        }

        let cell = Rc::new(RefCell::new(ValueCell::new(
            CellKind::Argument,
            spec.identifier.clone(),
            spec.arg_type,
            arity,
        )));
        debug!(argument = %spec.identifier, "Registered argument");
        self.arguments.push(ArgumentEntry {
            name: spec.identifier,
            description: spec.description,
            slot: cell.clone(),
        });
        Ok(cell)
    }

    fn check_available(&self, short: char, long: &str) -> Result<()> {
        if self.by_long.contains_key(long) {
            return Err(ArgvError::DuplicateOption(format!("--{long}")));
        }
        if self.by_short.contains_key(&short) {
            return Err(ArgvError::DuplicateOption(format!("-{short}")));
        }
        Ok(())
    }

    fn insert_option(&mut self, entry: OptionEntry) {
        debug!(short = %entry.short, long = %entry.long, "Registered option");
        let index = self.options.len();
        self.by_short.insert(entry.short, index);
        self.by_long.insert(entry.long.clone(), index);
        self.options.push(entry);
    }

    fn find_short(&self, short: char) -> Result<&OptionEntry> {
        self.by_short
            .get(&short)
            .map(|&index| &self.options[index])
            .ok_or_else(|| ArgvError::UnknownOption(format!("-{short}")))
    }

    fn find_long(&self, long: &str) -> Result<&OptionEntry> {
        self.by_long
            .get(long)
            .map(|&index| &self.options[index])
            .ok_or_else(|| ArgvError::UnknownOption(format!("--{long}")))
    }

    /// Scans `tokens` once, feeding every option and positional value to its
    /// cell.
    ///
    /// `--` ends option scanning. `--name=value` and `--name value` are
    /// equivalent, as are `-xvalue` and `-x value`. Argument-less short
    /// switches may be clustered (`-nv`). Any token not starting with `-`,
    /// and a lone `-`, is positional.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown option, missing option argument, clustered
    /// option needing an argument, duplicate single value, surplus positional
    /// token or conversion failure. A parser can only be parsed once.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.parsed {
            return Err(ArgvError::AlreadyParsed);
        }
        self.parsed = true;

        let mut tokens = tokens.into_iter();
        let mut cursor = Cursor::default();
        while let Some(raw) = tokens.next() {
            let token = raw.as_ref();
            trace!(token, in_argument_list = cursor.in_argument_list, "Scanning token");
            if cursor.in_argument_list {
                self.accept_positional(&mut cursor, token)?;
            } else if token == END_OF_OPTIONS {
                cursor.in_argument_list = true;
            } else if let Some(body) = token.strip_prefix("--") {
                self.accept_long(body, &mut tokens)?;
            } else if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
                self.accept_short(cluster, &mut tokens)?;
            } else {
                self.accept_positional(&mut cursor, token)?;
            }
        }

        debug!(app = %self.app_name, positional = cursor.position, "Parsed arguments");
        Ok(())
    }

    /// Parses `tokens` and reports whether the built-in help switch was
    /// given. Printing the help text is left to the caller.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](ArgParser::parse).
    ///
    /// # Examples
    ///
    /// ```
    /// use argv_core::{ArgParser, ArgType, ParseOutcome};
    ///
    /// let mut parser = ArgParser::new("test").with_help()?;
    /// parser.option(ArgType::boolean(), "verbose", 'v', "Verbose mode").declare()?;
    ///
    /// match parser.parse_argv(["-hv"])? {
    ///     ParseOutcome::HelpRequested(help) => assert!(help.starts_with("Syntax: test")),
    ///     ParseOutcome::Parsed => unreachable!(),
    /// }
    /// # Ok::<(), argv_core::ArgvError>(())
    /// ```
    pub fn parse_argv<I, S>(&mut self, tokens: I) -> Result<ParseOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse(tokens)?;
        let help_requested = self
            .help_switch
            .as_ref()
            .and_then(OptionalValue::get)
            .unwrap_or(false);
        if help_requested {
            Ok(ParseOutcome::HelpRequested(self.help()))
        } else {
            Ok(ParseOutcome::Parsed)
        }
    }

    fn accept_long<S: AsRef<str>>(
        &self,
        body: &str,
        tokens: &mut impl Iterator<Item = S>,
    ) -> Result<()> {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let entry = self.find_long(name)?;
        let mut slot = entry.slot.borrow_mut();
        match attached {
            Some(value) => slot.accept(value),
            None if slot.needs_argument() => {
                let value = tokens
                    .next()
                    .ok_or_else(|| ArgvError::MissingArgument(format!("--{}", entry.long)))?;
                slot.accept(value.as_ref())
            }
            None => slot.accept(""),
        }
    }

    fn accept_short<S: AsRef<str>>(
        &self,
        cluster: &str,
        tokens: &mut impl Iterator<Item = S>,
    ) -> Result<()> {
        let mut chars = cluster.chars();
        let Some(first) = chars.next() else {
            return Ok(());
        };

        let entry = self.find_short(first)?;
        if entry.slot.borrow().needs_argument() {
            let attached = chars.as_str();
            let mut slot = entry.slot.borrow_mut();
            if attached.is_empty() {
                let value = tokens
                    .next()
                    .ok_or_else(|| ArgvError::MissingArgument(format!("-{first}")))?;
                slot.accept(value.as_ref())
            } else {
                slot.accept(attached)
            }
        } else {
            for short in cluster.chars() {
                let entry = self.find_short(short)?;
                let mut slot = entry.slot.borrow_mut();
                if slot.needs_argument() {
                    return Err(ArgvError::NeedsArgument(format!("-{short}")));
                }
                slot.accept("")?;
            }
            Ok(())
        }
    }

    fn accept_positional(&self, cursor: &mut Cursor, token: &str) -> Result<()> {
        let entry = self
            .arguments
            .get(cursor.position)
            .ok_or_else(|| ArgvError::UnexpectedArgument(token.to_string()))?;
        let mut slot = entry.slot.borrow_mut();
        slot.accept(token)?;
        if !slot.is_multiple() {
            cursor.position += 1;
        }
        Ok(())
    }

    /// Snapshots the registry for rendering or serialization.
    pub fn describe(&self) -> ParserSummary {
        let options = self
            .options
            .iter()
            .map(|entry| {
                let cell = entry.slot.borrow().describe();
                OptionSummary {
                    short: entry.short,
                    long: entry.long.clone(),
                    description: entry.description.clone(),
                    value_name: cell.value_name,
                    multiple: cell.multiple,
                    group: entry.group.clone(),
                }
            })
            .collect();
        let arguments = self
            .arguments
            .iter()
            .map(|entry| {
                let cell = entry.slot.borrow().describe();
                ArgumentSummary {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    optional: !cell.required,
                    vararg: cell.multiple,
                }
            })
            .collect();
        ParserSummary {
            app_name: self.app_name.clone(),
            options,
            arguments,
        }
    }

    /// One-line syntax summary, e.g. `test [ -v | --verbose ] <input>`.
    pub fn syntax(&self) -> String {
        self.describe().syntax()
    }

    /// The syntax summary prefixed with `Syntax: `.
    pub fn usage(&self) -> String {
        self.describe().usage()
    }

    /// Usage line followed by option and argument descriptions.
    pub fn help(&self) -> String {
        self.describe().help()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_long_name_is_rejected() {
        let mut parser = ArgParser::new("test");
        parser
            .option(ArgType::boolean(), "verbose", 'v', "Verbose")
            .declare()
            .unwrap();
        let err = parser
            .option(ArgType::string(), "verbose", 'x', "Again")
            .declare()
            .err();
        assert_eq!(err, Some(ArgvError::DuplicateOption("--verbose".to_string())));
    }

    #[test]
    fn test_duplicate_short_name_is_rejected() {
        let mut parser = ArgParser::new("test");
        parser
            .option(ArgType::boolean(), "verbose", 'v', "Verbose")
            .declare()
            .unwrap();
        let err = parser
            .option(ArgType::boolean(), "version", 'v', "Version")
            .multiple()
            .declare()
            .err();
        assert_eq!(err, Some(ArgvError::DuplicateOption("-v".to_string())));
    }

    #[test]
    fn test_failed_group_registers_nothing() {
        let mut parser = ArgParser::new("test");
        parser
            .option(ArgType::boolean(), "resolve", 'x', "Resolve")
            .declare()
            .unwrap();
        let err = parser
            .option_group(ArgType::boolean(), &[("status", 's'), ("resolve", 'r')])
            .err();
        assert_eq!(err, Some(ArgvError::DuplicateOption("--resolve".to_string())));
        assert!(parser.find_short('s').is_err());
        assert_eq!(parser.describe().options.len(), 1);
    }

    #[test]
    fn test_group_members_must_differ() {
        let mut parser = ArgParser::new("test");
        let err = parser
            .option_group(ArgType::boolean(), &[("status", 's'), ("stash", 's')])
            .err();
        assert_eq!(err, Some(ArgvError::DuplicateOption("-s".to_string())));
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let mut parser = ArgParser::new("test");
        let err = parser.option_group(ArgType::boolean(), &[]).err();
        assert_eq!(err, Some(ArgvError::EmptyGroup));
    }

    #[test]
    fn test_argument_after_vararg_is_rejected() {
        let mut parser = ArgParser::new("test");
        parser
            .argument(ArgType::string(), "files", "Files")
            .optional()
            .vararg()
            .declare()
            .unwrap();
        let err = parser
            .argument(ArgType::string(), "output", "Output")
            .declare()
            .err();
        assert_eq!(
            err,
            Some(ArgvError::ArgumentAfterVararg {
                argument: "output".to_string(),
                vararg: "files".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut parser = ArgParser::new("test");
        let err = parser
            .option(ArgType::boolean(), "verbose", '-', "Verbose")
            .declare()
            .err();
        assert_eq!(err, Some(ArgvError::InvalidShortName('-')));

        let err = parser
            .argument(ArgType::string(), "in put", "Input")
            .declare()
            .err();
        assert_eq!(err, Some(ArgvError::InvalidName("in put".to_string())));
    }

    #[test]
    fn test_second_parse_is_rejected() {
        let mut parser = ArgParser::new("test");
        parser.parse(Vec::<String>::new()).unwrap();
        assert_eq!(parser.parse(["x"]), Err(ArgvError::AlreadyParsed));
    }

    #[test]
    fn test_help_switch_conflicts_with_user_option() {
        let mut parser = ArgParser::new("test");
        parser
            .option(ArgType::string(), "host", 'h', "Host")
            .declare()
            .unwrap();
        assert_eq!(
            parser.with_help().err(),
            Some(ArgvError::DuplicateOption("-h".to_string()))
        );
    }

    #[test]
    fn test_parse_argv_without_help() {
        let mut parser = ArgParser::new("test").with_help().unwrap();
        assert_eq!(
            parser.parse_argv(["a"]).err(),
            Some(ArgvError::UnexpectedArgument("a".to_string()))
        );

        let mut parser = ArgParser::new("test").with_help().unwrap();
        assert_eq!(parser.parse_argv(Vec::<&str>::new()), Ok(ParseOutcome::Parsed));
    }
}
