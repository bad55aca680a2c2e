//! Table-driven advancing of states.

use jump_gen::{JumpArtifact, JumpEntries, JumpTable};
use num_bigint::BigUint;
use thiserror::Error;
use xorwow_core::{State, XorwowParams};

use crate::apply::{apply_matrix, apply_poly};

/// Errors raised while applying jump tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// No table with that name.
    #[error("no jump table named `{0}`")]
    UnknownTable(String),
    /// The table cannot express the requested jump.
    #[error("jump of {count} x {start} exceeds what {entries} entries with ratio {exp} can express")]
    OutOfRange {
        /// Requested multiple of the table's first distance.
        count: BigUint,
        /// First distance of the table.
        start: BigUint,
        /// Number of entries.
        entries: usize,
        /// Ratio between entries.
        exp: u32,
    },
    /// Entry index past the end of the table.
    #[error("entry {index} out of range for a table of {len}")]
    Entry {
        /// Requested index.
        index: usize,
        /// Table length.
        len: usize,
    },
}

/// Owns a generated artifact and hands out per-table runners.
pub struct JumpRuntime {
    artifact: JumpArtifact,
}

impl JumpRuntime {
    /// Wraps an artifact.
    pub fn new(artifact: JumpArtifact) -> Self {
        Self { artifact }
    }

    /// Parameters the tables were built for.
    pub fn params(&self) -> &XorwowParams {
        &self.artifact.params
    }

    /// The wrapped artifact.
    pub fn artifact(&self) -> &JumpArtifact {
        &self.artifact
    }

    /// Runner for the table named `name`.
    pub fn table(&self, name: &str) -> Result<TableRunner<'_>, RuntimeError> {
        let table = self
            .artifact
            .table(name)
            .ok_or_else(|| RuntimeError::UnknownTable(name.to_string()))?;
        Ok(TableRunner {
            params: &self.artifact.params,
            table,
        })
    }
}

/// Applies the entries of one table.
pub struct TableRunner<'a> {
    params: &'a XorwowParams,
    table: &'a JumpTable,
}

impl TableRunner<'_> {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Jump distance of entry `index`.
    pub fn distance(&self, index: usize) -> BigUint {
        self.table.sequence.distance(index)
    }

    /// Advances `state` by the distance of entry `index`.
    pub fn apply_entry(&self, index: usize, state: &State) -> Result<State, RuntimeError> {
        let len = self.len();
        let out = match &self.table.entries {
            JumpEntries::Matrix(entries) => {
                let entry = entries.get(index).ok_or(RuntimeError::Entry { index, len })?;
                apply_matrix(self.params, entry, state)
            }
            JumpEntries::Poly(entries) => {
                let entry = entries.get(index).ok_or(RuntimeError::Entry { index, len })?;
                apply_poly(self.params, entry, state)
            }
        };
        Ok(out)
    }

    /// Advances `state` by `count * start` steps.
    ///
    /// `count` is written in base `exp`; entry `i` is applied once per unit of
    /// digit `i`. Fails if `count` needs more digits than the table has.
    pub fn advance(&self, state: &State, count: &BigUint) -> Result<State, RuntimeError> {
        let spec = &self.table.sequence;
        let out_of_range = || RuntimeError::OutOfRange {
            count: count.clone(),
            start: spec.start.clone(),
            entries: self.len(),
            exp: spec.exp,
        };
        if spec.exp < 2 {
            return Err(out_of_range());
        }
        let digits = base_digits(count, spec.exp);
        if digits.len() > self.len() {
            return Err(out_of_range());
        }
        let mut current = state.clone();
        for (index, digit) in digits.into_iter().enumerate() {
            for _ in 0..digit {
                current = self.apply_entry(index, &current)?;
            }
        }
        Ok(current)
    }
}

/// Little-endian digits of `value` in base `radix`, without trailing zeros.
fn base_digits(value: &BigUint, radix: u32) -> Vec<u32> {
    let base = BigUint::from(radix);
    let mut rest = value.clone();
    let mut digits = Vec::new();
    while rest.bits() > 0 {
        let digit = &rest % &base;
        digits.push(u32::try_from(&digit).expect("digit is below a u32 radix"));
        rest /= &base;
    }
    digits
}
