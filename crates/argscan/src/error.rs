//! Error types for schema compilation and scanning.

use thiserror::Error;

/// Why a token was rejected during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Strict mode is on and the flag (long name or short alias) is not declared.
    UnknownFlag,
    /// The token looks like a flag but has no name (`-`, `--=value`).
    InvalidFormat,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownFlag => "UNKNOWN_FLAG",
            Self::InvalidFormat => "INVALID_FORMAT",
        }
    }
}

/// A token that aborted the scan.
///
/// `argument` is the offending literal with its original `-`/`--` prefix and
/// `known` lists the schema's canonical names (aliases excluded). No partial
/// result accompanies a `ParseError`; the whole parse failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Flag \"{argument}\" is not recognized.")]
    UnknownFlag { argument: String, known: Vec<String> },

    #[error("Argument \"{argument}\" is malformed.")]
    InvalidFormat { argument: String, known: Vec<String> },
}

impl ParseError {
    pub(crate) fn unknown_flag(argument: impl Into<String>, known: &[String]) -> Self {
        Self::UnknownFlag {
            argument: argument.into(),
            known: known.to_vec(),
        }
    }

    pub(crate) fn invalid_format(argument: impl Into<String>, known: &[String]) -> Self {
        Self::InvalidFormat {
            argument: argument.into(),
            known: known.to_vec(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFlag { .. } => ErrorKind::UnknownFlag,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn argument(&self) -> &str {
        match self {
            Self::UnknownFlag { argument, .. } | Self::InvalidFormat { argument, .. } => argument,
        }
    }

    pub fn known(&self) -> &[String] {
        match self {
            Self::UnknownFlag { known, .. } | Self::InvalidFormat { known, .. } => known,
        }
    }
}

/// A schema that cannot be compiled into a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("flag name cannot be empty")]
    EmptyName,

    #[error("alias '{alias}' of flag '{name}' must be a single character")]
    InvalidAlias { name: String, alias: String },

    #[error("alias conflict: '{alias}' refers to both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias conflict: '{alias}' of flag '{name}' is also a flag name")]
    AliasShadowsName { name: String, alias: String },
}

/// Any failure of [`crate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
