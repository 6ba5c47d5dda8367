use crate::nodeset::NodeSet;
use crate::pattern::{Color, Pattern};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Consistency {
    /// Every candidate set is non-empty and locally supported.
    Consistent,
    /// Some node of the source pattern has no candidate left.
    Inconsistent,
}

/// Candidate images `cand[v] ⊆ nodes(target)` for each node `v` of `source`,
/// pruned until every candidate has a witness along every edge.
pub struct ArcConsistency<'a> {
    source: &'a Pattern,
    target: &'a Pattern,
    candidates: Vec<NodeSet>,
}

impl<'a> ArcConsistency<'a> {
    pub fn new(source: &'a Pattern, target: &'a Pattern) -> Self {
        let full = NodeSet::full(target.num_nodes());
        ArcConsistency {
            source,
            target,
            candidates: vec![full; source.num_nodes()],
        }
    }

    pub fn candidates(&self, node: usize) -> &NodeSet {
        &self.candidates[node]
    }

    fn has_empty_candidate_set(&self) -> bool {
        self.candidates.iter().any(NodeSet::is_empty)
    }

    /// Revises both endpoints of `u → v` (color `c`); returns whether
    /// anything was removed.
    fn revise(&mut self, color: Color, u: usize, v: usize) -> bool {
        let target = self.target;
        let rel = target.relation(color);
        let mut changed = false;

        let unsupported: Vec<usize> = self.candidates[u]
            .iter()
            .filter(|&cu| !rel.successors(cu).intersects(&self.candidates[v]))
            .collect();
        for cu in unsupported {
            trace!(%color, u, v, candidate = cu, "no successor witness");
            self.candidates[u].remove(cu);
            changed = true;
        }

        let unsupported: Vec<usize> = self.candidates[v]
            .iter()
            .filter(|&cv| !rel.predecessors(cv).intersects(&self.candidates[u]))
            .collect();
        for cv in unsupported {
            trace!(%color, u, v, candidate = cv, "no predecessor witness");
            self.candidates[v].remove(cv);
            changed = true;
        }
        changed
    }

    /// Prunes until no candidate set shrinks, or until one is empty.
    pub fn run(&mut self) -> Consistency {
        if self.has_empty_candidate_set() {
            return Consistency::Inconsistent;
        }
        let edges: Vec<(Color, usize, usize)> = Color::BOTH
            .iter()
            .flat_map(|&c| self.source.relation(c).edges().map(move |(u, v)| (c, u, v)))
            .collect();
        let mut changed = true;
        while changed {
            changed = false;
            for &(color, u, v) in &edges {
                if self.revise(color, u, v) {
                    changed = true;
                    if self.candidates[u].is_empty() || self.candidates[v].is_empty() {
                        return Consistency::Inconsistent;
                    }
                }
            }
        }
        Consistency::Consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_double_selfloop_is_consistent() {
        let source = Pattern::from_edge_lists(3, &[(0, 1), (1, 2)], &[(2, 0)]);
        let target = Pattern::from_edge_lists(1, &[(0, 0)], &[(0, 0)]);
        let mut ac = ArcConsistency::new(&source, &target);
        assert_eq!(ac.run(), Consistency::Consistent);
        assert_eq!(ac.candidates(0).len(), 1);
    }

    #[test]
    fn test_missing_color_is_inconsistent() {
        let source = Pattern::from_edge_lists(2, &[(0, 1)], &[(1, 0)]);
        let target = Pattern::from_edge_lists(2, &[(0, 1), (1, 0)], &[]);
        let mut ac = ArcConsistency::new(&source, &target);
        assert_eq!(ac.run(), Consistency::Inconsistent);
        assert!(ac.candidates(0).is_empty() || ac.candidates(1).is_empty());
    }

    #[test]
    fn test_prunes_unsupported_candidates() {
        // source: green path 0 → 1 → 2; target: green path a → b, plus c
        let source = Pattern::from_edge_lists(3, &[(0, 1), (1, 2)], &[]);
        let target = Pattern::from_edge_lists(3, &[(0, 1), (1, 1)], &[]);
        let mut ac = ArcConsistency::new(&source, &target);
        assert_eq!(ac.run(), Consistency::Consistent);
        assert_eq!(ac.candidates(0), &NodeSet::from_nodes(3, [0, 1]));
        assert_eq!(ac.candidates(1), &NodeSet::singleton(3, 1));
        assert_eq!(ac.candidates(2), &NodeSet::singleton(3, 1));
    }

    #[test]
    fn test_empty_target() {
        let source = Pattern::from_edge_lists(1, &[], &[]);
        let target = Pattern::new(0);
        let mut ac = ArcConsistency::new(&source, &target);
        assert_eq!(ac.run(), Consistency::Inconsistent);
    }
}
