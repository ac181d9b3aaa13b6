//! Serializable parser definitions.
//!
//! A [`ParserDefinition`] describes options, option groups and positional
//! arguments as data. It is usually kept next to a script as YAML and turned
//! into a working parser with [`ParserDefinition::build`].
//!
//! # Example YAML
//!
//! ```yaml
//! name: deploy
//! help: true
//! options:
//!   - name: environment
//!     short: e
//!     type: string
//!     description: Target environment
//!     default: latest
//!   - name: filter
//!     short: f
//!     type: pattern
//!     pattern: "^[a-z]+$"
//!     multiple: true
//! groups:
//!   - type: bool
//!     members:
//!       - { name: status, short: s }
//!       - { name: resolve, short: r }
//! arguments:
//!   - name: inputs
//!     type: string
//!     optional: true
//!     vararg: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::Result;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Converter used for an option, group or argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Switch; consumes no token and produces a JSON boolean.
    Bool,
    /// Any token, produced as a JSON string.
    String,
    /// Base-10 integer, produced as a JSON number.
    Integer,
    /// Token matching the declaration's `pattern`, produced as a JSON string.
    Pattern,
}

impl ValueKind {
    /// Lowercase name as written in definition files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Pattern => "pattern",
        }
    }
}

/// One option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Identifier; the long name is derived from it.
    pub name: String,
    /// Short name, used as `-x`.
    pub short: char,
    /// Converter.
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Value produced when the option is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    /// Accept the option any number of times.
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
    /// Regular expression for [`ValueKind::Pattern`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Placeholder shown in usage output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
}

/// One member of an option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMemberDecl {
    pub name: String,
    pub short: char,
}

/// Alternative options sharing one converter and one value sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDecl {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    /// Members in declaration order; the first one names the group.
    pub members: Vec<GroupMemberDecl>,
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// May be left out; produces `null` when absent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    /// Absorbs every remaining positional token.
    #[serde(default, skip_serializing_if = "is_false")]
    pub vararg: bool,
    /// Value produced when the argument is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A complete parser described as data.
///
/// # Examples
///
/// ```
/// use argv_schema::{ParserDefinition, ValueKind};
///
/// let definition = ParserDefinition::from_yaml_str(
///     r#"
/// name: copy
/// options:
///   - { name: force, short: f, type: bool }
/// arguments:
///   - { name: source, type: string }
/// "#,
/// )
/// .unwrap();
/// assert_eq!(definition.options[0].kind, ValueKind::Bool);
/// assert!(!definition.help);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserDefinition {
    /// Program name printed in the usage line.
    pub name: String,
    /// Register the built-in `-h`/`--help` switch.
    #[serde(default, skip_serializing_if = "is_false")]
    pub help: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDecl>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl ParserDefinition {
    /// Loads a definition file; `.json` files are read as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::SchemaError::Io) if the file cannot be read, or
    /// [`Json`](crate::SchemaError::Json)/[`Yaml`](crate::SchemaError::Yaml)
    /// if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let definition: Self = if is_json(path) {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        debug!(
            path = %path.display(),
            name = %definition.name,
            options = definition.options.len(),
            groups = definition.groups.len(),
            arguments = definition.arguments.len(),
            "Loaded parser definition"
        );
        Ok(definition)
    }

    /// Saves the definition, choosing the format from the extension like
    /// [`load`](ParserDefinition::load).
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::SchemaError::Io) if the file cannot be written,
    /// or a serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_json(path) {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_yaml::to_writer(writer, self)?;
        }
        Ok(())
    }

    /// Parses a YAML definition.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](crate::SchemaError::Yaml) on malformed input.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON definition.
    ///
    /// # Errors
    ///
    /// Returns [`Json`](crate::SchemaError::Json) on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
name: deploy
help: true
options:
  - name: environment
    short: e
    type: string
    description: Target environment
    default: latest
  - name: jobs
    short: j
    type: integer
    default: 4
  - name: filter
    short: f
    type: pattern
    pattern: "^[a-z]+$"
    multiple: true
groups:
  - type: bool
    members:
      - { name: status, short: s }
      - { name: resolve, short: r }
arguments:
  - name: inputs
    type: string
    optional: true
    vararg: true
"#
    }

    #[test]
    fn test_parse_full_yaml() {
        let definition = ParserDefinition::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(definition.name, "deploy");
        assert!(definition.help);
        assert_eq!(definition.options.len(), 3);
        assert_eq!(definition.options[0].short, 'e');
        assert_eq!(definition.options[0].default, Some(JsonValue::from("latest")));
        assert_eq!(definition.options[1].default, Some(JsonValue::from(4)));
        assert_eq!(definition.options[2].kind, ValueKind::Pattern);
        assert!(definition.options[2].multiple);
        assert_eq!(definition.groups[0].members[1].name, "resolve");
        assert!(definition.arguments[0].optional);
        assert!(definition.arguments[0].vararg);
    }

    #[test]
    fn test_minimal_definition_uses_defaults() {
        let definition = ParserDefinition::from_yaml_str("name: bare").unwrap();
        assert!(!definition.help);
        assert!(definition.options.is_empty());
        assert!(definition.groups.is_empty());
        assert!(definition.arguments.is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let yaml = "name: t\noptions:\n  - { name: level, short: l, type: float }\n";
        assert!(ParserDefinition::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_json_matches_yaml() {
        let json = r#"{
            "name": "copy",
            "options": [{ "name": "force", "short": "f", "type": "bool" }],
            "arguments": [{ "name": "source", "type": "string" }]
        }"#;
        let yaml = "
name: copy
options:
  - { name: force, short: f, type: bool }
arguments:
  - { name: source, type: string }
";
        assert_eq!(
            ParserDefinition::from_json_str(json).unwrap(),
            ParserDefinition::from_yaml_str(yaml).unwrap()
        );
    }

    #[test]
    fn test_serialization_skips_unset_fields() {
        let definition = ParserDefinition::from_yaml_str(
            "name: t\noptions:\n  - { name: verbose, short: v, type: bool }\n",
        )
        .unwrap();
        let json = serde_json::to_value(&definition).unwrap();
        let option = &json["options"][0];
        assert_eq!(option["type"], "bool");
        assert!(option.get("multiple").is_none());
        assert!(option.get("default").is_none());
        assert!(json.get("groups").is_none());
    }

    #[test]
    fn test_value_kind_names() {
        assert_eq!(ValueKind::Integer.as_str(), "integer");
        assert_eq!(
            serde_json::to_value(ValueKind::Pattern).unwrap(),
            JsonValue::from("pattern")
        );
    }
}
