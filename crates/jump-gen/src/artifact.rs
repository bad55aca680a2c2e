//! Computed jump tables and their serialization.

use serde::{Deserialize, Serialize};
use xorwow_core::XorwowParams;

use crate::jump::{JumpKind, SequenceSpec};
use crate::packed::{PackedMatrix, PackedPoly};

/// Format version written into every artifact.
pub const ARTIFACT_VERSION: u32 = 1;

/// Entries of one jump table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpEntries {
    /// Packed `T^d` matrices.
    Matrix(Vec<PackedMatrix>),
    /// Packed `z^d mod p(z)` polynomials.
    Poly(Vec<PackedPoly>),
}

impl JumpEntries {
    /// Representation of the entries.
    pub fn kind(&self) -> JumpKind {
        match self {
            JumpEntries::Matrix(_) => JumpKind::Matrix,
            JumpEntries::Poly(_) => JumpKind::Poly,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            JumpEntries::Matrix(entries) => entries.len(),
            JumpEntries::Poly(entries) => entries.len(),
        }
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named jump table: one entry per distance of `sequence`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpTable {
    /// Array name used when emitting.
    pub name: String,
    /// Distances covered by the entries.
    pub sequence: SequenceSpec,
    /// The entries, in sequence order.
    pub entries: JumpEntries,
}

/// Every table produced by one generator run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpArtifact {
    /// Recurrence the tables were computed for.
    pub params: XorwowParams,
    /// Representation shared by all tables.
    pub kind: JumpKind,
    /// Tables in emission order.
    pub tables: Vec<JumpTable>,
    /// Format version.
    pub version: u32,
}

impl JumpArtifact {
    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&JumpTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Serializes the artifact with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes an artifact with `bincode`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}
