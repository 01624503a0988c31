use indexmap::IndexMap;

use crate::schema::Arity;

/// How repeated occurrences of one flag combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accumulation {
    /// Later occurrences add their values after the ones already stored.
    #[default]
    Append,
    /// Each occurrence replaces whatever was stored before it.
    Override,
}

/// One appearance of a flag and the budget it has left.
///
/// `taken` counts only the values this occurrence consumed. In append mode
/// the stored list also holds earlier occurrences' values, so its length says
/// nothing about this occurrence's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    slot: usize,
    arity: Arity,
    taken: usize,
}

impl Occurrence {
    pub fn admits(&self) -> bool {
        self.arity.admits(self.taken)
    }
}

/// Per-flag value lists in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulator {
    mode: Accumulation,
    values: IndexMap<String, Vec<String>>,
}

impl Accumulator {
    pub fn new(mode: Accumulation) -> Self {
        Self {
            mode,
            values: IndexMap::new(),
        }
    }

    /// Start a new occurrence of `name`, optionally seeded with an inline value.
    ///
    /// An inline value fills the occurrence on its own: the caller passes
    /// `Arity::Bounded(1)` alongside it.
    pub fn open(&mut self, name: &str, arity: Arity, inline: Option<String>) -> Occurrence {
        let entry = self.values.entry(name.to_string());
        let slot = entry.index();
        let values = entry.or_default();
        if self.mode == Accumulation::Override {
            values.clear();
        }

        let mut occurrence = Occurrence {
            slot,
            arity,
            taken: 0,
        };
        if let Some(value) = inline {
            values.push(value);
            occurrence.taken += 1;
        }
        occurrence
    }

    /// Append `value` to the flag behind `occurrence`. The caller checks
    /// [`Occurrence::admits`] first.
    pub fn push(&mut self, occurrence: &mut Occurrence, value: String) {
        if let Some((_, values)) = self.values.get_index_mut(occurrence.slot) {
            values.push(value);
            occurrence.taken += 1;
        }
    }

    pub fn into_values(self) -> IndexMap<String, Vec<String>> {
        self.values
    }
}
