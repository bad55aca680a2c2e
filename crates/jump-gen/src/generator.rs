//! Configuration-driven generation of jump tables.

use std::collections::HashSet;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xorwow_core::XorwowParams;

use crate::artifact::{JumpArtifact, JumpEntries, JumpTable, ARTIFACT_VERSION};
use crate::error::JumpError;
use crate::jump::{JumpKind, JumpMethod, MatrixJumps, PolyJumps, SequenceSpec};
use crate::poly::BitPoly;
use crate::transition::Transition;

/// Entries per table in the production configuration.
pub const DEFAULT_SIZE: usize = 32;
/// Ratio between consecutive production jump distances.
pub const DEFAULT_EXP: u32 = 4;
/// log2 of the first subsequence jump distance.
pub const SUBSEQUENCE_LOG2: u32 = 67;

/// A table to generate: its array name and first jump distance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSequence {
    /// Array name used when emitting.
    pub name: String,
    /// First jump distance.
    pub start: BigUint,
}

impl NamedSequence {
    /// Constructs a named sequence.
    pub fn new(name: impl Into<String>, start: impl Into<BigUint>) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
        }
    }
}

/// Configuration for the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Recurrence parameters.
    pub params: XorwowParams,
    /// Representation of the entries.
    pub kind: JumpKind,
    /// Entries per table.
    pub size: usize,
    /// Ratio between consecutive distances.
    pub exp: u32,
    /// Tables to generate, in emission order.
    pub sequences: Vec<NamedSequence>,
}

impl Default for GeneratorConfig {
    /// Production xorwow tables: `jump` covers `4^i` and `jump_subsequence`
    /// covers `4^i * 2^67` for `i in 0..32`, as jump polynomials.
    fn default() -> Self {
        Self {
            params: XorwowParams::production(),
            kind: JumpKind::Poly,
            size: DEFAULT_SIZE,
            exp: DEFAULT_EXP,
            sequences: vec![
                NamedSequence::new("jump", 1u8),
                NamedSequence::new("jump_subsequence", BigUint::from(1u8) << SUBSEQUENCE_LOG2),
            ],
        }
    }
}

impl GeneratorConfig {
    /// Checks parameters, sizes and table names.
    pub fn validate(&self) -> Result<(), JumpError> {
        self.params.validate()?;
        if self.size == 0 {
            return Err(JumpError::InvalidSequence(
                "table size must be at least 1".into(),
            ));
        }
        if self.sequences.is_empty() {
            return Err(JumpError::InvalidSequence("no tables requested".into()));
        }
        let mut seen = HashSet::new();
        for seq in &self.sequences {
            if !is_identifier(&seq.name) {
                return Err(JumpError::InvalidSequence(format!(
                    "`{}` is not a valid array name",
                    seq.name
                )));
            }
            if !seen.insert(seq.name.as_str()) {
                return Err(JumpError::InvalidSequence(format!(
                    "duplicate table name `{}`",
                    seq.name
                )));
            }
        }
        Ok(())
    }

    /// Distance sequence for one named table.
    pub fn sequence_spec(&self, seq: &NamedSequence) -> SequenceSpec {
        SequenceSpec::new(self.size, seq.start.clone(), self.exp)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Jump-table generator for one recurrence.
pub struct Generator {
    config: GeneratorConfig,
    transition: Transition,
    charpoly: BitPoly,
}

impl Generator {
    /// Validates the configuration, builds `T` and derives its characteristic
    /// polynomial.
    ///
    /// Fails if `T` is not invertible.
    pub fn new(config: GeneratorConfig) -> Result<Self, JumpError> {
        config.validate()?;
        let transition = Transition::new(config.params)?;
        let charpoly = transition.characteristic_polynomial()?;
        debug!(degree = ?charpoly.degree(), "transition matrix is invertible");
        Ok(Self {
            config,
            transition,
            charpoly,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Returns the transition matrix.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Returns the characteristic polynomial of the transition matrix.
    pub fn charpoly(&self) -> &BitPoly {
        &self.charpoly
    }

    /// Computes one table.
    pub fn table(&self, seq: &NamedSequence) -> Result<JumpTable, JumpError> {
        let spec = self.config.sequence_spec(seq);
        let entries = match self.config.kind {
            JumpKind::Matrix => {
                JumpEntries::Matrix(MatrixJumps::new(&self.transition).sequence(&spec)?)
            }
            JumpKind::Poly => {
                let method = PolyJumps::new(self.config.params, self.charpoly.clone())?;
                JumpEntries::Poly(method.sequence(&spec)?)
            }
        };
        info!(
            table = %seq.name,
            kind = %self.config.kind,
            entries = entries.len(),
            "computed jump table"
        );
        Ok(JumpTable {
            name: seq.name.clone(),
            sequence: spec,
            entries,
        })
    }

    /// Computes every configured table.
    pub fn generate(&self) -> Result<JumpArtifact, JumpError> {
        let tables = self
            .config
            .sequences
            .iter()
            .map(|seq| self.table(seq))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JumpArtifact {
            params: self.config.params,
            kind: self.config.kind,
            tables,
            version: ARTIFACT_VERSION,
        })
    }
}
