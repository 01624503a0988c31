//! The single-pass scanner.
//!
//! Each token is classified exactly once:
//! - `--` ends flag parsing; everything after it is positional.
//! - `--name` / `--name=value` is a long flag.
//! - `-abc` is a group of single-character aliases, where an alias that takes
//!   values swallows the rest of the group as its inline value (`-nMatthew`).
//! - anything else is a value for the most recent flag while that occurrence
//!   has budget left, otherwise a positional.

use crate::Parsed;
use crate::accumulate::{Accumulation, Accumulator, Occurrence};
use crate::error::ParseError;
use crate::schema::{Arity, Lookup};

const END_OF_OPTIONS: &str = "--";

pub(crate) struct Scanner {
    lookup: Lookup,
    strict: bool,
    flags: Accumulator,
    positionals: Vec<String>,
    current: Option<Occurrence>,
}

impl Scanner {
    /// `lookup` is consumed: flags synthesized during this scan stay local to it.
    pub fn new(lookup: Lookup, strict: bool, mode: Accumulation) -> Self {
        Self {
            lookup,
            strict,
            flags: Accumulator::new(mode),
            positionals: Vec::new(),
            current: None,
        }
    }

    pub fn run<I>(mut self, tokens: I) -> Result<Parsed, ParseError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            if token == END_OF_OPTIONS {
                self.positionals.extend(tokens.by_ref());
                break;
            }
            if let Some(body) = token.strip_prefix("--") {
                self.long_flag(&token, body)?;
                continue;
            }
            if let Some(group) = token.strip_prefix('-') {
                self.short_group(&token, group)?;
                continue;
            }
            self.plain(token);
        }

        let parsed = Parsed {
            positionals: self.positionals,
            flags: self.flags.into_values(),
        };
        tracing::trace!(
            positionals = parsed.positionals.len(),
            flags = parsed.flags.len(),
            "scan finished"
        );
        Ok(parsed)
    }

    fn long_flag(&mut self, token: &str, body: &str) -> Result<(), ParseError> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        if name.is_empty() {
            return Err(ParseError::invalid_format(token, self.lookup.known()));
        }
        if self.strict && !self.lookup.contains(name) {
            return Err(ParseError::unknown_flag(token, self.lookup.known()));
        }

        let idx = self.lookup.resolve_or_synthesize(name);
        let arity = match inline {
            Some(_) => {
                self.lookup.narrow_to_single(idx);
                Arity::Bounded(1)
            }
            None => self.lookup.definition(idx).arity,
        };
        self.open(idx, arity, inline.map(str::to_string));
        Ok(())
    }

    fn short_group(&mut self, token: &str, group: &str) -> Result<(), ParseError> {
        if group.is_empty() {
            return Err(ParseError::invalid_format(token, self.lookup.known()));
        }

        let mut chars = group.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            let alias = &group[pos..pos + c.len_utf8()];
            if self.strict && !self.lookup.contains(alias) {
                return Err(ParseError::unknown_flag(
                    format!("-{alias}"),
                    self.lookup.known(),
                ));
            }
            let rest = &group[pos + c.len_utf8()..];

            // Only a flag seen before can claim the rest of the group: a brand
            // new alias has no arity to go on and is treated as a switch.
            let known = self
                .lookup
                .get(alias)
                .filter(|&idx| !self.lookup.definition(idx).arity.is_zero());
            if let Some(idx) = known.filter(|_| !rest.is_empty()) {
                self.lookup.narrow_to_single(idx);
                self.open(idx, Arity::Bounded(1), Some(rest.to_string()));
                break;
            }

            let idx = self.lookup.resolve_or_synthesize(alias);
            let arity = if chars.peek().is_some() {
                Arity::Bounded(0)
            } else {
                self.lookup.definition(idx).arity
            };
            self.open(idx, arity, None);
        }
        Ok(())
    }

    fn plain(&mut self, token: String) {
        match self.current.as_mut().filter(|occurrence| occurrence.admits()) {
            Some(occurrence) => self.flags.push(occurrence, token),
            None => self.positionals.push(token),
        }
    }

    fn open(&mut self, idx: usize, arity: Arity, inline: Option<String>) {
        let name = &self.lookup.definition(idx).name;
        self.current = Some(self.flags.open(name, arity, inline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FlagSpec, Schema};

    fn tokens(line: &str) -> Vec<String> {
        line.split(' ').map(str::to_string).collect()
    }

    fn scan(schema: &Schema, line: &str) -> Result<Parsed, ParseError> {
        let lookup = Lookup::compile(schema).unwrap();
        Scanner::new(lookup, false, Accumulation::Append).run(tokens(line))
    }

    #[test]
    fn grouped_aliases_before_an_inline_value_are_switches() {
        let schema = Schema::new()
            .flag("decaf", FlagSpec::new().alias("d").arity(0))
            .flag("size", FlagSpec::new().alias("s").arity(1));
        let parsed = scan(&schema, "-dsoat").unwrap();
        assert!(parsed.get("decaf").unwrap().is_empty());
        assert_eq!(parsed.get("size").unwrap(), ["oat"]);
        assert!(parsed.positionals().is_empty());
    }

    #[test]
    fn new_alias_in_a_group_does_not_swallow_the_rest() {
        let parsed = scan(&Schema::new(), "-qvd file").unwrap();
        let keys: Vec<&str> = parsed.flags().keys().map(String::as_str).collect();
        assert_eq!(keys, ["q", "v", "d"]);
        assert!(parsed.get("q").unwrap().is_empty());
        assert!(parsed.get("v").unwrap().is_empty());
        assert_eq!(parsed.get("d").unwrap(), ["file"]);
    }

    #[test]
    fn previously_seen_alias_takes_an_inline_value() {
        let parsed = scan(&Schema::new(), "-n x -nMatthew latte").unwrap();
        assert_eq!(parsed.get("n").unwrap(), ["x", "Matthew"]);
        assert_eq!(parsed.positionals(), ["latte"]);
    }

    #[test]
    fn inline_long_value_narrows_synthesized_flags_for_later_occurrences() {
        let parsed = scan(&Schema::new(), "--size=xl --size md lg").unwrap();
        assert_eq!(parsed.get("size").unwrap(), ["xl", "md"]);
        assert_eq!(parsed.positionals(), ["lg"]);
    }

    #[test]
    fn inline_long_value_leaves_declared_arity_alone() {
        let schema = Schema::new().flag("milk", FlagSpec::new().alias("m").arity(3));
        let parsed = scan(&schema, "--milk=oat --milk steamed whole").unwrap();
        assert_eq!(parsed.get("milk").unwrap(), ["oat", "steamed", "whole"]);
        assert!(parsed.positionals().is_empty());
    }

    #[test]
    fn long_flag_may_name_an_alias() {
        let schema = Schema::new().flag("milk", FlagSpec::new().alias("m").arity(1));
        let parsed = scan(&schema, "--m oat latte").unwrap();
        assert_eq!(parsed.get("milk").unwrap(), ["oat"]);
        assert!(!parsed.contains("m"));
        assert_eq!(parsed.positionals(), ["latte"]);
    }

    #[test]
    fn multibyte_aliases_split_on_char_boundaries() {
        let schema = Schema::new().flag("lambda", FlagSpec::new().alias("λ").arity(1));
        let parsed = scan(&schema, "-λ→x").unwrap();
        assert_eq!(parsed.get("lambda").unwrap(), ["→x"]);
    }

    #[test]
    fn unknown_alias_aborts_before_later_aliases() {
        let schema = Schema::new().flag("decaf", FlagSpec::new().alias("d").arity(0));
        let lookup = Lookup::compile(&schema).unwrap();
        let err = Scanner::new(lookup, true, Accumulation::Append)
            .run(tokens("-dux"))
            .unwrap_err();
        assert_eq!(err.argument(), "-u");
        assert_eq!(err.known(), ["decaf"]);
    }
}
