//! Table of complete states known to be physically implausible.
//!
//! The transition rules under-constrain a few corner combinations. Those are
//! listed here as full coordinate vectors rather than as special cases in the
//! rules, so the list can be audited and extended from configuration.

use std::collections::HashSet;

use crate::domain::QualValue::{self, *};
use crate::state::StateDescription;

/// Built-in implausible states, as `[inflow q, inflow d, level q, level d]`
/// with the level pair shared by volume, outflow, height and pressure.
const BUILTIN: [[QualValue; 4]; 3] = [
    // Volume held at MAX while inflow is still rising.
    [Pos, Pos, Max, Zero],
    // Inflow runs dry in the same step the volume leaves MAX.
    [Zero, Neg, Max, Neg],
    [Zero, Zero, Max, Neg],
];

/// A set of full state vectors that are never admitted as successors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlausibilityTable {
    entries: Vec<StateDescription>,
    index: HashSet<StateDescription>,
}

impl PlausibilityTable {
    /// An empty table that admits everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in bathtub table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.extend(
            BUILTIN
                .iter()
                .map(|[iq, id, lq, ld]| StateDescription::chained(*iq, *id, *lq, *ld)),
        );
        table
    }

    /// Add one entry. Returns `false` if it was already listed.
    pub fn insert(&mut self, state: StateDescription) -> bool {
        if !self.index.insert(state) {
            return false;
        }
        self.entries.push(state);
        true
    }

    pub fn contains(&self, state: &StateDescription) -> bool {
        self.index.contains(state)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StateDescription> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<StateDescription> for PlausibilityTable {
    fn extend<T: IntoIterator<Item = StateDescription>>(&mut self, iter: T) {
        for state in iter {
            self.insert(state);
        }
    }
}
