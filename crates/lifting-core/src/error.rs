//! Error types for pattern codes, automata and homomorphism models.

use crate::pattern::Color;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LiftingError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiftingError {
    /// The code is zero, so neither the size nor any edge can be recovered.
    #[error("code 0 does not describe a pattern")]
    EmptyCode,

    /// The code has bits above the `2n²` bits of an `n`-node pattern.
    #[error("code has {bits} bits, too many for a {n}-node pattern")]
    CodeTooLong { n: usize, bits: u64 },

    /// The decoded pattern has a node without a predecessor of some color,
    /// so the code does not round-trip.
    #[error("node {node} of the {n}-node pattern has no {color} predecessor")]
    MissingPredecessor { n: usize, node: usize, color: Color },

    /// A pattern-code record is not of the form `<n>,<code>`.
    #[error("malformed pattern record {0:?}")]
    MalformedRecord(String),

    /// Complement was requested on an automaton that is not deterministic.
    #[error("automaton is not deterministic; subset-construct it before complementing")]
    NotDeterministic,

    /// A satisfying assignment does not map a node to exactly one image.
    #[error("model assigns pattern node {node} to {assigned} images")]
    InvalidModel { node: usize, assigned: usize },

    /// A solver's model decodes to a map that breaks an edge.
    #[error("model maps {color} edge {from} -> {to} onto a non-edge")]
    NotAHomomorphism { color: Color, from: usize, to: usize },
}
