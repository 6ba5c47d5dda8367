//! Repeated `lift → prune` until a verdict or a resource bound.

use crate::pattern::Pattern;
use tracing::debug;

/// Bounds for [`iterate_lifting`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiftingConfig {
    /// Give up once the pattern about to be lifted has more nodes than this.
    pub max_nodes: usize,
    /// Give up after this many lifting steps; `None` for no limit.
    pub max_generations: Option<u32>,
}

impl Default for LiftingConfig {
    fn default() -> Self {
        LiftingConfig {
            max_nodes: 14,
            max_generations: Some(20),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiftingOutcome {
    /// A node with both self-loops appeared in this generation.
    DoubleSelfloop { generation: u32 },
    /// Lifting and pruning no longer change the node or edge counts, and no
    /// double self-loop appeared.
    Fixpoint { generation: u32 },
    /// A bound from [`LiftingConfig`] was hit first.
    Inconclusive { generation: u32, nodes: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationStats {
    pub generation: u32,
    pub nodes: usize,
    pub green_edges: usize,
    pub red_edges: usize,
}

impl GenerationStats {
    fn of(pattern: &Pattern) -> Self {
        let (nodes, green_edges, red_edges) = pattern.size();
        GenerationStats {
            generation: pattern.generation(),
            nodes,
            green_edges,
            red_edges,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LiftingReport {
    pub outcome: LiftingOutcome,
    /// One entry per generation, starting with the edge-pruned input.
    pub generations: Vec<GenerationStats>,
    /// The last pattern produced, e.g. for a SAT search when inconclusive.
    pub pattern: Pattern,
}

/// Prunes useless edges once, then lifts and prunes useless nodes until a
/// double self-loop appears, a step changes nothing, or a bound is exceeded.
pub fn iterate_lifting(mut pattern: Pattern, config: &LiftingConfig) -> LiftingReport {
    pattern.remove_useless_edges();
    let mut generations = vec![GenerationStats::of(&pattern)];

    let outcome = loop {
        if pattern.has_double_selfloop() {
            break LiftingOutcome::DoubleSelfloop {
                generation: pattern.generation(),
            };
        }
        if config
            .max_generations
            .is_some_and(|max| pattern.generation() >= max)
            || pattern.num_nodes() > config.max_nodes
        {
            break LiftingOutcome::Inconclusive {
                generation: pattern.generation(),
                nodes: pattern.num_nodes(),
            };
        }

        let before = pattern.size();
        let mut lifted = pattern.lifting();
        let lifted_nodes = lifted.num_nodes();
        let removed = lifted.remove_useless_nodes();
        pattern = lifted;

        let stats = GenerationStats::of(&pattern);
        debug!(
            generation = stats.generation,
            lifted = lifted_nodes,
            removed,
            nodes = stats.nodes,
            green = stats.green_edges,
            red = stats.red_edges,
            "lifting step"
        );
        generations.push(stats);

        if pattern.has_double_selfloop() {
            continue;
        }
        if pattern.size() == before {
            break LiftingOutcome::Fixpoint {
                generation: pattern.generation(),
            };
        }
    };

    debug!(?outcome, "lifting finished");
    LiftingReport {
        outcome,
        generations,
        pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vierer() -> Pattern {
        Pattern::from_edge_lists(
            4,
            &[(0, 0), (0, 1), (1, 2), (1, 3), (2, 0), (3, 2)],
            &[(1, 1), (1, 2), (2, 0), (2, 2), (2, 3)],
        )
    }

    #[test]
    fn test_vierer_reaches_fixpoint() {
        let report = iterate_lifting(vierer(), &LiftingConfig::default());
        assert_eq!(report.outcome, LiftingOutcome::Fixpoint { generation: 3 });
        let sizes: Vec<_> = report
            .generations
            .iter()
            .map(|s| (s.nodes, s.green_edges, s.red_edges))
            .collect();
        assert_eq!(sizes, vec![(4, 6, 5), (4, 7, 8), (5, 10, 14), (5, 10, 14)]);
        assert_eq!(report.pattern.generation(), 3);
    }

    #[test]
    fn test_double_selfloop_at_generation_zero() {
        let p = Pattern::from_edge_lists(2, &[(0, 0), (1, 0)], &[(0, 0), (0, 1)]);
        let report = iterate_lifting(p, &LiftingConfig::default());
        assert_eq!(report.outcome, LiftingOutcome::DoubleSelfloop { generation: 0 });
        assert_eq!(report.generations.len(), 1);
    }

    #[test]
    fn test_generation_bound() {
        let config = LiftingConfig {
            max_nodes: 100,
            max_generations: Some(1),
        };
        let report = iterate_lifting(vierer(), &config);
        assert_eq!(
            report.outcome,
            LiftingOutcome::Inconclusive { generation: 1, nodes: 4 }
        );
    }

    #[test]
    fn test_node_bound() {
        let config = LiftingConfig {
            max_nodes: 4,
            max_generations: None,
        };
        let report = iterate_lifting(vierer(), &config);
        assert_eq!(
            report.outcome,
            LiftingOutcome::Inconclusive { generation: 2, nodes: 5 }
        );
    }

    #[test]
    fn test_oversized_input_is_not_lifted() {
        let config = LiftingConfig {
            max_nodes: 3,
            max_generations: None,
        };
        let report = iterate_lifting(vierer(), &config);
        assert_eq!(
            report.outcome,
            LiftingOutcome::Inconclusive { generation: 0, nodes: 4 }
        );
        assert_eq!(report.generations.len(), 1);
        assert_eq!(report.pattern.generation(), 0);
    }
}
