mod schema_file;

use anyhow::{Result, anyhow};
use argscan::{Accumulation, Options};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema_file::load_schema;

#[derive(Parser)]
#[command(name = "argscan")]
#[command(
    version,
    about = "Tokenize command-line arguments into positionals and flags",
    long_about = None
)]
struct Cli {
    /// JSON file declaring flag aliases and arities
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Reject flags that are not declared in the schema
    #[arg(long)]
    strict: bool,

    /// Keep only the values of a flag's last occurrence
    #[arg(long = "override")]
    override_values: bool,

    /// Tokenize this string (split on whitespace) instead of TOKENS
    #[arg(
        short,
        long,
        value_name = "STRING",
        allow_hyphen_values = true,
        conflicts_with = "tokens"
    )]
    command: Option<String>,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,

    /// Tokens to scan. Put them after `--` when the first one starts with `-`
    #[arg(
        value_name = "TOKENS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let schema = load_schema(cli.schema.as_deref())?;
    let mut options = Options::new()
        .schema(schema)
        .strict(cli.strict)
        .accumulation(if cli.override_values {
            Accumulation::Override
        } else {
            Accumulation::Append
        });
    // Never fall back to our own process arguments.
    options = match cli.command {
        Some(command) => options.command(command),
        None => options.tokens(cli.tokens),
    };

    tracing::debug!(
        strict = options.strict,
        accumulation = ?options.accumulation,
        "scanning arguments"
    );
    let parsed = argscan::parse_with(&options, Vec::new).map_err(report)?;

    let json = if cli.compact {
        serde_json::to_string(&parsed)?
    } else {
        serde_json::to_string_pretty(&parsed)?
    };
    println!("{json}");
    Ok(())
}

fn report(err: argscan::Error) -> anyhow::Error {
    match err {
        argscan::Error::Parse(err) if err.known().is_empty() => {
            anyhow!("{err} [{}]", err.code())
        }
        argscan::Error::Parse(err) => anyhow!(
            "{err} [{}]\nknown flags: {}",
            err.code(),
            err.known().join(", ")
        ),
        other => anyhow::Error::new(other),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
