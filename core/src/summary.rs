//! Serializable descriptor summaries and the syntax renderer.
//!
//! [`ArgParser::describe`](crate::ArgParser::describe) snapshots the
//! registry into a [`ParserSummary`]. The usage line and the help text are
//! rendered from that snapshot, so a summary loaded from JSON renders the
//! same way as a live parser.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Heading printed before the usage line.
pub const SYNTAX_HEADING: &str = "Syntax: ";

/// A registered option as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSummary {
    /// Short name, used as `-x`.
    pub short: char,
    /// Derived long name, used as `--name`.
    pub long: String,
    /// Description from the declaration.
    pub description: String,
    /// Placeholder for the consumed token; absent for switches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    /// Whether the option may be given more than once.
    pub multiple: bool,
    /// Group identity; members of one group render as one alternation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl OptionSummary {
    fn alternatives(&self) -> [String; 2] {
        match &self.value_name {
            Some(value) => [
                format!("-{} <{value}>", self.short),
                format!("--{}=<{value}>", self.long),
            ],
            None => [format!("-{}", self.short), format!("--{}", self.long)],
        }
    }

    fn help_label(&self) -> String {
        let mut label = match &self.value_name {
            Some(value) => format!("-{}, --{}=<{value}>", self.short, self.long),
            None => format!("-{}, --{}", self.short, self.long),
        };
        if self.multiple && self.group.is_none() {
            label.push_str("...");
        }
        label
    }
}

/// A registered positional argument as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSummary {
    /// Declared identifier.
    pub name: String,
    /// Description from the declaration.
    pub description: String,
    /// `true` for optional and defaulted arguments.
    pub optional: bool,
    /// `true` when the argument absorbs every remaining positional token.
    pub vararg: bool,
}

impl ArgumentSummary {
    /// Renders `<name>`, `[<name>]`, `<name>...` or `[<name>...]`.
    pub fn syntax(&self) -> String {
        let ellipsis = if self.vararg { "..." } else { "" };
        if self.optional {
            format!("[<{}>{ellipsis}]", self.name)
        } else {
            format!("<{}>{ellipsis}", self.name)
        }
    }
}

/// Snapshot of a parser's registry in registration order.
///
/// # Examples
///
/// ```
/// use argv_core::{ArgParser, ArgType};
///
/// let mut parser = ArgParser::new("deploy");
/// parser.option(ArgType::boolean(), "dryRun", 'n', "Dry-run mode").declare().unwrap();
/// parser.argument(ArgType::string(), "target", "Target host").declare().unwrap();
///
/// let summary = parser.describe();
/// assert_eq!(summary.options[0].long, "dry-run");
/// assert_eq!(summary.syntax(), "deploy [ -n | --dry-run ] <target>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSummary {
    /// Program name printed at the start of the usage line.
    pub app_name: String,
    /// Options in registration order.
    pub options: Vec<OptionSummary>,
    /// Positional arguments in registration order.
    pub arguments: Vec<ArgumentSummary>,
}

impl ParserSummary {
    /// Renders the one-line syntax summary.
    ///
    /// Options come first in registration order, each group once, then the
    /// positional arguments.
    pub fn syntax(&self) -> String {
        let mut parts = vec![self.app_name.clone()];
        let mut seen_groups: HashSet<&str> = HashSet::new();

        for option in &self.options {
            match option.group.as_deref() {
                Some(group) => {
                    if !seen_groups.insert(group) {
                        continue;
                    }
                    let members: Vec<String> = self
                        .options
                        .iter()
                        .filter(|o| o.group.as_deref() == Some(group))
                        .flat_map(OptionSummary::alternatives)
                        .collect();
                    parts.push(format!("[ {} ]", members.join(" | ")));
                }
                None => {
                    let mut rendered = format!("[ {} ]", option.alternatives().join(" | "));
                    if option.multiple {
                        rendered.push_str("...");
                    }
                    parts.push(rendered);
                }
            }
        }

        parts.extend(self.arguments.iter().map(ArgumentSummary::syntax));
        parts.join(" ")
    }

    /// Renders the usage line with its heading.
    pub fn usage(&self) -> String {
        format!("{SYNTAX_HEADING}{}", self.syntax())
    }

    /// Renders the usage line followed by option and argument tables.
    pub fn help(&self) -> String {
        let option_rows: Vec<(String, &str)> = self
            .options
            .iter()
            .map(|o| (o.help_label(), o.description.as_str()))
            .collect();
        let argument_rows: Vec<(String, &str)> = self
            .arguments
            .iter()
            .map(|a| (a.syntax(), a.description.as_str()))
            .collect();
        let width = option_rows
            .iter()
            .chain(argument_rows.iter())
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);

        let mut out = self.usage();
        out.push('\n');
        for (heading, rows) in [("Options:", &option_rows), ("Arguments:", &argument_rows)] {
            if rows.is_empty() {
                continue;
            }
            out.push('\n');
            out.push_str(heading);
            out.push('\n');
            for (label, description) in rows {
                let line = format!("  {label:<width$}  {description}");
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(short: char, long: &str, value_name: Option<&str>) -> OptionSummary {
        OptionSummary {
            short,
            long: long.to_string(),
            description: String::new(),
            value_name: value_name.map(String::from),
            multiple: false,
            group: None,
        }
    }

    fn argument(name: &str, optional: bool, vararg: bool) -> ArgumentSummary {
        ArgumentSummary {
            name: name.to_string(),
            description: String::new(),
            optional,
            vararg,
        }
    }

    #[test]
    fn test_argument_syntax_forms() {
        assert_eq!(argument("input", false, false).syntax(), "<input>");
        assert_eq!(argument("input", true, false).syntax(), "[<input>]");
        assert_eq!(argument("input", false, true).syntax(), "<input>...");
        assert_eq!(argument("input", true, true).syntax(), "[<input>...]");
    }

    #[test]
    fn test_syntax_renders_groups_once() {
        let mut status = option('s', "status", None);
        status.group = Some("status".to_string());
        status.multiple = true;
        let mut resolve = option('r', "resolve", None);
        resolve.group = Some("status".to_string());
        resolve.multiple = true;
        let mut filter = option('f', "filter", Some("filter"));
        filter.multiple = true;

        let summary = ParserSummary {
            app_name: "tool".to_string(),
            options: vec![status, option('v', "verbose", None), resolve, filter],
            arguments: vec![argument("paths", true, true)],
        };

        assert_eq!(
            summary.syntax(),
            "tool [ -s | --status | -r | --resolve ] [ -v | --verbose ] \
             [ -f <filter> | --filter=<filter> ]... [<paths>...]"
        );
        assert_eq!(summary.usage(), format!("Syntax: {}", summary.syntax()));
    }

    #[test]
    fn test_help_aligns_descriptions() {
        let mut verbose = option('v', "verbose", None);
        verbose.description = "Verbose mode".to_string();
        let mut environment = option('e', "environment", Some("env"));
        environment.description = "Environment".to_string();
        let mut input = argument("input", false, false);
        input.description = "Input directory".to_string();

        let summary = ParserSummary {
            app_name: "test".to_string(),
            options: vec![verbose, environment],
            arguments: vec![input],
        };

        let expected = "\
Syntax: test [ -v | --verbose ] [ -e <env> | --environment=<env> ] <input>

Options:
  -v, --verbose            Verbose mode
  -e, --environment=<env>  Environment

Arguments:
  <input>                  Input directory
";
        assert_eq!(summary.help(), expected);
    }

    #[test]
    fn test_summary_serializes_without_empty_fields() {
        let summary = ParserSummary {
            app_name: "test".to_string(),
            options: vec![option('v', "verbose", None)],
            arguments: Vec::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["options"][0]["short"], "v");
        assert!(json["options"][0].get("value_name").is_none());
        assert!(json["options"][0].get("group").is_none());

        let back: ParserSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
