//! Flag schema and the lookup table compiled from it.
//!
//! A schema maps canonical flag names to an optional single-character alias
//! and an arity. Compilation turns it into a lookup table where the name and
//! the alias both point at one shared definition slot, so whatever the
//! scan learns about a flag through one key is visible through the other.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::SchemaError;

/// How many following plain tokens one occurrence of a flag may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arity {
    Bounded(usize),
    #[default]
    Unbounded,
}

impl Arity {
    /// Whether an occurrence that already took `taken` values may take another.
    pub fn admits(self, taken: usize) -> bool {
        match self {
            Self::Bounded(max) => taken < max,
            Self::Unbounded => true,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::Bounded(0)
    }
}

impl From<Option<usize>> for Arity {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Declaration of a single flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FlagSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Missing means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<usize>,
}

impl FlagSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }
}

/// Ordered set of flag declarations keyed by canonical name.
///
/// Deserializes from a JSON object such as
/// `{ "milk": { "alias": "m", "arity": 3 }, "decaf": { "arity": 0 } }`;
/// declaration order is kept and reported back in errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    flags: IndexMap<String, FlagSpec>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a flag. Declaring the same name again replaces the earlier spec.
    pub fn flag(mut self, name: impl Into<String>, spec: FlagSpec) -> Self {
        self.flags.insert(name.into(), spec);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagSpec)> {
        self.flags.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}

/// A flag as the scanner knows it, declared or synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Definition {
    pub name: String,
    pub arity: Arity,
    pub declared: bool,
}

/// Key -> definition table. Names and aliases share definition slots.
#[derive(Debug, Clone, Default)]
pub(crate) struct Lookup {
    definitions: Vec<Definition>,
    keys: HashMap<String, usize>,
    known: Vec<String>,
}

impl Lookup {
    pub fn compile(schema: &Schema) -> Result<Self, SchemaError> {
        let mut aliases: HashMap<&str, &str> = HashMap::new();
        for (name, spec) in schema.iter() {
            if name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            let Some(alias) = spec.alias.as_deref() else {
                continue;
            };
            if alias.chars().count() != 1 {
                return Err(SchemaError::InvalidAlias {
                    name: name.to_string(),
                    alias: alias.to_string(),
                });
            }
            if schema.flags.contains_key(alias) {
                return Err(SchemaError::AliasShadowsName {
                    name: name.to_string(),
                    alias: alias.to_string(),
                });
            }
            if let Some(first) = aliases.insert(alias, name) {
                return Err(SchemaError::DuplicateAlias {
                    alias: alias.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
        }

        let mut lookup = Self::default();
        for (name, spec) in schema.iter() {
            let idx = lookup.definitions.len();
            lookup.definitions.push(Definition {
                name: name.to_string(),
                arity: spec.arity.into(),
                declared: true,
            });
            lookup.keys.insert(name.to_string(), idx);
            if let Some(alias) = &spec.alias {
                lookup.keys.insert(alias.clone(), idx);
            }
            lookup.known.push(name.to_string());
        }

        tracing::debug!(
            flags = lookup.known.len(),
            keys = lookup.keys.len(),
            "compiled flag schema"
        );
        Ok(lookup)
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn definition(&self, idx: usize) -> &Definition {
        &self.definitions[idx]
    }

    /// Resolve `key`, registering an undeclared flag named after the key.
    pub fn resolve_or_synthesize(&mut self, key: &str) -> usize {
        if let Some(idx) = self.get(key) {
            return idx;
        }
        let idx = self.definitions.len();
        self.definitions.push(Definition {
            name: key.to_string(),
            arity: Arity::Unbounded,
            declared: false,
        });
        self.keys.insert(key.to_string(), idx);
        tracing::trace!(flag = key, "synthesized undeclared flag");
        idx
    }

    /// Record that a synthesized flag took an inline value; it keeps arity 1
    /// from now on. Declared arities never change.
    pub fn narrow_to_single(&mut self, idx: usize) {
        let def = &mut self.definitions[idx];
        if !def.declared && def.arity != Arity::Bounded(1) {
            tracing::trace!(flag = %def.name, "narrowed synthesized flag to arity 1");
            def.arity = Arity::Bounded(1);
        }
    }

    /// Canonical names in declaration order, aliases excluded.
    pub fn known(&self) -> &[String] {
        &self.known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coffee() -> Schema {
        Schema::new()
            .flag("decaf", FlagSpec::new().alias("d").arity(0))
            .flag("size", FlagSpec::new().alias("s").arity(1))
            .flag("milk", FlagSpec::new().alias("m"))
    }

    #[test]
    fn name_and_alias_share_one_definition() {
        let lookup = Lookup::compile(&coffee()).unwrap();
        assert_eq!(lookup.get("size"), lookup.get("s"));
        assert_eq!(lookup.definition(lookup.get("s").unwrap()).name, "size");
        assert_eq!(
            lookup.definition(lookup.get("milk").unwrap()).arity,
            Arity::Unbounded
        );
        assert_eq!(lookup.known(), ["decaf", "size", "milk"]);
    }

    #[test]
    fn synthesized_flags_narrow_but_declared_ones_do_not() {
        let mut lookup = Lookup::compile(&coffee()).unwrap();

        let extra = lookup.resolve_or_synthesize("extra");
        assert_eq!(lookup.definition(extra).arity, Arity::Unbounded);
        lookup.narrow_to_single(extra);
        assert_eq!(lookup.definition(extra).arity, Arity::Bounded(1));
        assert_eq!(lookup.resolve_or_synthesize("extra"), extra);

        let milk = lookup.resolve_or_synthesize("m");
        lookup.narrow_to_single(milk);
        assert_eq!(lookup.definition(milk).arity, Arity::Unbounded);

        // synthesized keys are not part of the declared set
        assert_eq!(lookup.known(), ["decaf", "size", "milk"]);
    }

    #[test]
    fn compile_rejects_alias_conflicts() {
        let schema = Schema::new()
            .flag("size", FlagSpec::new().alias("s"))
            .flag("shots", FlagSpec::new().alias("s"));
        let err = Lookup::compile(&schema).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateAlias {
                alias: "s".to_string(),
                first: "size".to_string(),
                second: "shots".to_string(),
            }
        );

        let schema = Schema::new()
            .flag("v", FlagSpec::new())
            .flag("verbose", FlagSpec::new().alias("v"));
        let err = Lookup::compile(&schema).unwrap_err();
        assert!(matches!(err, SchemaError::AliasShadowsName { .. }));
    }

    #[test]
    fn compile_rejects_malformed_entries() {
        let schema = Schema::new().flag("", FlagSpec::new());
        assert_eq!(Lookup::compile(&schema).unwrap_err(), SchemaError::EmptyName);

        let schema = Schema::new().flag("size", FlagSpec::new().alias("sz"));
        let err = Lookup::compile(&schema).unwrap_err();
        assert!(err.to_string().contains("single character"));
    }

    #[test]
    fn schema_deserializes_in_declaration_order() {
        let json = r#"{
  "version": { "alias": "v", "arity": 0 },
  "name": { "alias": "n", "arity": 1 },
  "milk": {}
}"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["version", "name", "milk"]);

        let lookup = Lookup::compile(&schema).unwrap();
        assert_eq!(
            lookup.definition(lookup.get("n").unwrap()).arity,
            Arity::Bounded(1)
        );
        assert_eq!(
            lookup.definition(lookup.get("milk").unwrap()).arity,
            Arity::Unbounded
        );
    }

    #[test]
    fn schema_rejects_unknown_fields() {
        let json = r#"{ "milk": { "alias": "m", "takes-value": true } }"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }
}
