use std::path::{Path, PathBuf};

use argv_schema::{DynamicOutcome, DynamicParser, ParserDefinition};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit code for token sequences rejected by the definition.
const EXIT_REJECTED: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argv-check")]
#[command(about = "Check command lines against declarative parser definitions")]
struct Cli {
    /// Log parser activity to stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` and print the produced values.
    Parse(ParseArgs),
    /// Print the syntax line of a definition.
    Usage(DefinitionArgs),
    /// Print the option and argument summary of a definition.
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
struct DefinitionArgs {
    /// Definition file (`.json` for JSON, YAML otherwise).
    #[arg(long, short = 'd')]
    definition: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: DefinitionArgs,
    /// Output format for produced values.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Tokens to parse.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    #[command(flatten)]
    source: DefinitionArgs,
    /// Output format for the summary.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

/// Why a subcommand did not succeed.
#[derive(Debug)]
enum Failure {
    /// The definition could not be loaded or built.
    Setup(String),
    /// The definition rejected the tokens.
    Rejected { message: String, usage: String },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Usage(args) => run_usage(&args),
        Command::Describe(args) => run_describe(&args),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Setup(message)) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
        Err(Failure::Rejected { message, usage }) => {
            eprintln!("error: {message}");
            eprintln!("{usage}");
            std::process::exit(EXIT_REJECTED);
        }
    }
}

fn filter_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Installs a stderr subscriber. `-v` overrides `RUST_LOG`; without either
/// only warnings are shown.
fn init_logging(verbose: u8) {
    let filter = match filter_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_parser(path: &Path) -> Result<DynamicParser, Failure> {
    ParserDefinition::load(path)
        .and_then(|definition| definition.build())
        .map_err(|err| {
            Failure::Setup(format!("Failed to load definition '{}': {err}", path.display()))
        })
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, Failure> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    };
    rendered.map_err(|e| Failure::Setup(format!("Failed to serialize output: {e}")))
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let mut parser = load_parser(&args.source.definition)?;
    debug!(tokens = args.tokens.len(), "Checking tokens");

    match parser.parse(&args.tokens) {
        Ok(DynamicOutcome::Help(help)) => {
            print!("{help}");
            Ok(())
        }
        Ok(DynamicOutcome::Values(values)) => {
            let output = render(&serde_json::Value::Object(values), args.format)?;
            println!("{}", output.trim_end());
            Ok(())
        }
        Err(err) => Err(Failure::Rejected {
            message: err.to_string(),
            usage: parser.usage(),
        }),
    }
}

fn run_usage(args: &DefinitionArgs) -> Result<(), Failure> {
    let parser = load_parser(&args.definition)?;
    println!("{}", parser.usage());
    Ok(())
}

fn run_describe(args: &DescribeArgs) -> Result<(), Failure> {
    let parser = load_parser(&args.source.definition)?;
    let output = render(&parser.describe(), args.format)?;
    println!("{}", output.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_levels() {
        assert_eq!(filter_directive(0), None);
        assert_eq!(filter_directive(1), Some("debug"));
        assert_eq!(filter_directive(5), Some("trace"));
    }

    #[test]
    fn test_render_formats() {
        let value = serde_json::json!({ "verbose": true });
        let json = render(&value, OutputFormat::Json).unwrap();
        assert!(json.contains("\"verbose\": true"));
        let yaml = render(&value, OutputFormat::Yaml).unwrap();
        assert_eq!(yaml.trim_end(), "verbose: true");
    }

    #[test]
    fn test_cli_collects_tokens_after_separator() {
        let cli = Cli::try_parse_from([
            "argv-check", "-v", "parse", "--definition", "d.yml", "--", "-x", "--long", "pos",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Parse(args) => {
                assert_eq!(args.tokens, ["-x", "--long", "pos"]);
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.source.definition, PathBuf::from("d.yml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
