use std::path::{Path, PathBuf};

use argv_core::ArgvError;
use argv_schema::{DynamicOutcome, ParserDefinition, SchemaError, ValueMap};
use serde_json::json;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DEPLOY_YAML: &str = r#"
name: deploy
help: true
options:
  - name: dryRun
    short: n
    type: bool
    description: Dry-run mode
  - name: environment
    short: e
    type: string
    description: Target environment
    default: latest
    value_name: env
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
  - name: hosts
    type: string
    description: Hosts to deploy to
    vararg: true
"#;

fn write_definition(dir: &Path, file: &str, contents: &str) -> PathBuf {
    let path = dir.join(file);
    std::fs::write(&path, contents).unwrap();
    path
}

fn parse_values(definition: &ParserDefinition, tokens: &[&str]) -> ValueMap {
    let mut parser = definition.build().unwrap();
    match parser.parse(tokens).unwrap() {
        DynamicOutcome::Values(values) => values,
        DynamicOutcome::Help(help) => panic!("unexpected help:\n{help}"),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(dir.path(), "deploy.yml", DEPLOY_YAML);

    let definition = ParserDefinition::load(&path).unwrap();
    assert_eq!(definition.name, "deploy");
    assert_eq!(definition.options.len(), 3);
    assert_eq!(definition.groups[0].members.len(), 2);
}

#[test]
fn test_save_and_reload_json() {
    let dir = TempDir::new().unwrap();
    let original = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let path = dir.path().join("deploy.json");

    original.save(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.trim_start().starts_with('{'));
    assert_eq!(ParserDefinition::load(&path).unwrap(), original);
}

#[test]
fn test_save_and_reload_yaml() {
    let dir = TempDir::new().unwrap();
    let original = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let path = dir.path().join("deploy.yaml");

    original.save(&path).unwrap();
    assert_eq!(ParserDefinition::load(&path).unwrap(), original);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ParserDefinition::load(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}

#[test]
fn test_load_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(dir.path(), "broken.json", "{ \"name\": ");
    assert!(matches!(ParserDefinition::load(&path), Err(SchemaError::Json(_))));
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_full_command_line() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let values = parse_values(
        &definition,
        &["-ns", "--filter=web", "-f", "db", "-r", "web1", "--", "-web2"],
    );

    assert_eq!(values["dryRun"], json!(true));
    assert_eq!(values["environment"], json!("latest"));
    assert_eq!(values["filter"], json!(["web", "db"]));
    assert_eq!(values["status"], json!([["status", true], ["resolve", true]]));
    assert_eq!(values["hosts"], json!(["web1", "-web2"]));
    assert_eq!(values.len(), 5);
}

#[test]
fn test_parse_reports_engine_errors() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();

    let mut parser = definition.build().unwrap();
    let err = parser.parse(["--target", "web1"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown option: --target");

    let mut parser = definition.build().unwrap();
    let err = parser.parse(["-f", "Web", "web1"]).unwrap_err();
    assert!(matches!(err, SchemaError::Argv(ArgvError::InvalidValue { .. })));

    let mut parser = definition.build().unwrap();
    let err = parser.parse(["-n"]).unwrap_err();
    assert!(matches!(err, SchemaError::Argv(ArgvError::NoValues(_))));
}

#[test]
fn test_parse_twice_fails() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let mut parser = definition.build().unwrap();
    parser.parse(["web1"]).unwrap();
    assert!(matches!(
        parser.parse(["web1"]),
        Err(SchemaError::Argv(ArgvError::AlreadyParsed))
    ));
}

#[test]
fn test_help_request() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let mut parser = definition.build().unwrap();
    match parser.parse(["-h"]).unwrap() {
        DynamicOutcome::Help(help) => {
            assert!(help.starts_with("Syntax: deploy [ -h | --help ]"));
            assert!(help.contains("Hosts to deploy to"));
        }
        DynamicOutcome::Values(values) => panic!("expected help, got {values:?}"),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_syntax_from_definition() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let parser = definition.build().unwrap();
    assert_eq!(
        parser.syntax(),
        "deploy [ -h | --help ] [ -n | --dry-run ] [ -e <env> | --environment=<env> ] \
         [ -f <filter> | --filter=<filter> ]... [ -s | --status | -r | --resolve ] <hosts>..."
    );
    assert_eq!(parser.app_name(), "deploy");
}

#[test]
fn test_describe_lists_group_members() {
    let definition = ParserDefinition::from_yaml_str(DEPLOY_YAML).unwrap();
    let summary = definition.build().unwrap().describe();

    let grouped: Vec<&str> = summary
        .options
        .iter()
        .filter(|o| o.group.as_deref() == Some("status"))
        .map(|o| o.long.as_str())
        .collect();
    assert_eq!(grouped, ["status", "resolve"]);
    assert_eq!(summary.arguments[0].name, "hosts");
    assert!(summary.arguments[0].vararg);
    assert!(!summary.arguments[0].optional);
}
