//! One unit of work for a batch driver: decide a single pattern code.

use crate::cayley::CayleyGraph;
use crate::codes;
use crate::error::Result;
use crate::lifting::{iterate_lifting, LiftingConfig, LiftingOutcome};
use crate::nfa::third_path_condition;
use num_bigint::BigUint;
use std::fmt;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckConfig {
    pub lifting: LiftingConfig,
    /// Evaluate the three path conditions before lifting.
    pub path_conditions: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            lifting: LiftingConfig::default(),
            path_conditions: true,
        }
    }
}

/// Why no qualifying homomorphism exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Certificate {
    FirstPathCondition,
    SecondPathCondition,
    ThirdPathCondition,
    /// Lifting stopped changing the pattern without a double self-loop.
    LiftingFixpoint { generation: u32 },
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Certificate::FirstPathCondition => f.write_str("first path condition"),
            Certificate::SecondPathCondition => f.write_str("second path condition"),
            Certificate::ThirdPathCondition => f.write_str("third path condition"),
            Certificate::LiftingFixpoint { generation } => {
                write!(f, "lifting fixpoint at generation {generation}")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A double self-loop appeared after `generation` lifting steps.
    Homomorphism { generation: u32 },
    NoHomomorphism(Certificate),
    /// Lifting hit a bound; escalate to an exact search.
    Inconclusive { generation: u32, nodes: usize },
}

/// Decodes `(n, code)`, evaluates the path conditions (Cayley graph first
/// and second, powerset automaton third), then iterates lifting.
///
/// A double self-loop in the decoded pattern settles the question before any
/// path condition runs. Only a malformed code is an error.
pub fn check(n: usize, code: &BigUint, config: &CheckConfig) -> Result<Outcome> {
    let pattern = codes::decode(n, code)?;
    if pattern.has_double_selfloop() {
        debug!(n, %code, "double self-loop at generation 0");
        return Ok(Outcome::Homomorphism { generation: 0 });
    }

    if config.path_conditions {
        let graph = CayleyGraph::new(&pattern);
        let failed = if !graph.check_first_path_condition() {
            Some(Certificate::FirstPathCondition)
        } else if !graph.check_second_path_condition() {
            Some(Certificate::SecondPathCondition)
        } else if !third_path_condition(&pattern) {
            Some(Certificate::ThirdPathCondition)
        } else {
            None
        };
        if let Some(certificate) = failed {
            debug!(n, %code, %certificate, "path condition fails");
            return Ok(Outcome::NoHomomorphism(certificate));
        }
    }

    let report = iterate_lifting(pattern, &config.lifting);
    let outcome = match report.outcome {
        LiftingOutcome::DoubleSelfloop { generation } => Outcome::Homomorphism { generation },
        LiftingOutcome::Fixpoint { generation } => {
            Outcome::NoHomomorphism(Certificate::LiftingFixpoint { generation })
        }
        LiftingOutcome::Inconclusive { generation, nodes } => {
            Outcome::Inconclusive { generation, nodes }
        }
    };
    debug!(n, %code, ?outcome, "checked");
    Ok(outcome)
}
