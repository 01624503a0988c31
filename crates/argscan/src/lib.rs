//! Schema-driven command-line argument tokenizer.
//!
//! `argscan` splits raw argument tokens into positionals and flags in one
//! forward pass. Nothing is typed: every value is a string. An optional
//! [`Schema`] declares a flag's single-character alias and its arity (how many
//! following tokens one occurrence consumes); undeclared flags take any
//! number of values unless strict mode rejects them.
//!
//! ```
//! use argscan::{FlagSpec, Options, Schema};
//!
//! let schema = Schema::new()
//!     .flag("decaf", FlagSpec::new().alias("d").arity(0))
//!     .flag("milk", FlagSpec::new().alias("m").arity(1));
//! let parsed = argscan::parse(
//!     &Options::new()
//!         .command("brewer make -d --milk oat latte")
//!         .schema(schema),
//! )
//! .unwrap();
//!
//! assert_eq!(parsed.positionals(), ["brewer", "make", "latte"]);
//! assert_eq!(parsed.get("milk").unwrap(), ["oat"]);
//! assert!(parsed.contains("decaf"));
//! ```

mod accumulate;
mod command;
pub mod error;
mod scan;
pub mod schema;

use indexmap::IndexMap;
use serde::Serialize;

pub use accumulate::Accumulation;
pub use command::split_command;
pub use error::{Error, ErrorKind, ParseError, Result, SchemaError};
pub use schema::{Arity, FlagSpec, Schema};

use crate::scan::Scanner;
use crate::schema::Lookup;

/// Outcome of a successful parse.
///
/// `flags` is keyed by canonical flag name in first-occurrence order. A flag
/// that occurred without values maps to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Parsed {
    pub(crate) positionals: Vec<String>,
    pub(crate) flags: IndexMap<String, Vec<String>>,
}

impl Parsed {
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn flags(&self) -> &IndexMap<String, Vec<String>> {
        &self.flags
    }

    /// Values recorded for `name`, or `None` if the flag never occurred.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.flags.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }
}

/// A compiled schema plus scan modes, reusable across many inputs.
///
/// Each [`Parser::parse`] call works on a private copy of the lookup table,
/// so flags synthesized in one call never affect the next.
#[derive(Debug, Clone)]
pub struct Parser {
    lookup: Lookup,
    strict: bool,
    accumulation: Accumulation,
}

impl Parser {
    /// Compile `schema`. Alias collisions are rejected here, before any scan.
    pub fn new(schema: &Schema) -> std::result::Result<Self, SchemaError> {
        Ok(Self {
            lookup: Lookup::compile(schema)?,
            strict: false,
            accumulation: Accumulation::default(),
        })
    }

    /// Reject flags that are neither a declared name nor a declared alias.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    /// Declared canonical names, aliases excluded.
    pub fn known(&self) -> &[String] {
        self.lookup.known()
    }

    pub fn parse<I, S>(&self, tokens: I) -> std::result::Result<Parsed, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scanner::new(self.lookup.clone(), self.strict, self.accumulation)
            .run(tokens.into_iter().map(Into::into))
    }
}

/// Input bundle for [`parse`] and [`parse_with`].
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Explicit tokens. Takes precedence over `command`.
    pub tokens: Option<Vec<String>>,
    /// A single string split on whitespace, used when `tokens` is absent.
    pub command: Option<String>,
    pub schema: Schema,
    pub strict: bool,
    pub accumulation: Accumulation,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Shorthand for choosing between [`Accumulation::Override`] and
    /// [`Accumulation::Append`].
    pub fn override_values(mut self, enabled: bool) -> Self {
        self.accumulation = if enabled {
            Accumulation::Override
        } else {
            Accumulation::Append
        };
        self
    }

    pub fn accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }
}

/// Parse using `options`, reading the process arguments (program name
/// excluded) when neither tokens nor a command string were given.
pub fn parse(options: &Options) -> Result<Parsed> {
    parse_with(options, command::process_args)
}

/// Parse using `options`, calling `ambient` for the tokens when neither
/// tokens nor a command string were given.
pub fn parse_with<F>(options: &Options, ambient: F) -> Result<Parsed>
where
    F: FnOnce() -> Vec<String>,
{
    let parser = Parser::new(&options.schema)?
        .strict(options.strict)
        .accumulation(options.accumulation);
    let tokens = command::resolve_tokens(
        options.tokens.as_deref(),
        options.command.as_deref(),
        ambient,
    );
    Ok(parser.parse(tokens)?)
}
