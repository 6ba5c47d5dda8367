use crate::nodeset::NodeSet;
use num_bigint::BigUint;
use std::collections::VecDeque;

/// A single-colored directed graph over the dense node set `0..n`.
///
/// Successor and predecessor sets are kept mutually consistent:
/// `y ∈ succ[x] ⇔ x ∈ pred[y]`. Every mutation goes through
/// [`Relation::add_edge`] / [`Relation::remove_edge`] or rebuilds both sides
/// via [`Relation::from_successors`]. Self-loops are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Relation {
    n: usize,
    succ: Vec<NodeSet>,
    pred: Vec<NodeSet>,
}

impl Relation {
    /// The empty relation on `n` nodes.
    pub fn new(n: usize) -> Self {
        Relation {
            n,
            succ: vec![NodeSet::new(n); n],
            pred: vec![NodeSet::new(n); n],
        }
    }

    /// The identity relation `{(x, x)}`.
    pub fn diagonal(n: usize) -> Self {
        let mut rel = Relation::new(n);
        for x in 0..n {
            rel.add_edge(x, x);
        }
        rel
    }

    pub fn from_edges<I: IntoIterator<Item = (usize, usize)>>(n: usize, edges: I) -> Self {
        let mut rel = Relation::new(n);
        for (x, y) in edges {
            rel.add_edge(x, y);
        }
        rel
    }

    /// Builds a relation from its successor sets, deriving predecessors.
    pub fn from_successors(succ: Vec<NodeSet>) -> Self {
        let n = succ.len();
        let mut pred = vec![NodeSet::new(n); n];
        for (x, ys) in succ.iter().enumerate() {
            debug_assert_eq!(ys.capacity(), n);
            for y in ys.iter() {
                pred[y].insert(x);
            }
        }
        Relation { n, succ, pred }
    }

    /// Decodes `n²` bits, bit `n·j + i` set ⇔ edge `i → j`.
    /// Bits above `n²` are ignored.
    pub fn from_code(n: usize, code: &BigUint) -> Self {
        let mut rel = Relation::new(n);
        for j in 0..n {
            for i in 0..n {
                if code.bit((n * j + i) as u64) {
                    rel.add_edge(i, j);
                }
            }
        }
        rel
    }

    /// Canonical `(n, code)` identity, the inverse of [`Relation::from_code`].
    pub fn to_code(&self) -> (usize, BigUint) {
        let mut code = BigUint::default();
        for (i, ys) in self.succ.iter().enumerate() {
            for j in ys.iter() {
                code.set_bit((self.n * j + i) as u64, true);
            }
        }
        (self.n, code)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    pub fn num_edges(&self) -> usize {
        self.succ.iter().map(NodeSet::len).sum()
    }

    #[inline]
    pub fn add_edge(&mut self, x: usize, y: usize) {
        self.succ[x].insert(y);
        self.pred[y].insert(x);
    }

    #[inline]
    pub fn remove_edge(&mut self, x: usize, y: usize) {
        self.succ[x].remove(y);
        self.pred[y].remove(x);
    }

    #[inline]
    pub fn has_edge(&self, x: usize, y: usize) -> bool {
        self.succ[x].contains(y)
    }

    #[inline]
    pub fn successors(&self, x: usize) -> &NodeSet {
        &self.succ[x]
    }

    #[inline]
    pub fn predecessors(&self, x: usize) -> &NodeSet {
        &self.pred[x]
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.succ
            .iter()
            .enumerate()
            .flat_map(|(x, ys)| ys.iter().map(move |y| (x, y)))
    }

    /// Removes all outgoing edges of `x`.
    pub fn remove_all_successors(&mut self, x: usize) {
        let targets: Vec<usize> = self.succ[x].iter().collect();
        for y in targets {
            self.remove_edge(x, y);
        }
    }

    /// Union of the successor sets of all nodes in `nodes`.
    pub fn successors_of_set(&self, nodes: &NodeSet) -> NodeSet {
        let mut out = NodeSet::new(self.n);
        for x in nodes.iter() {
            out.union_with(&self.succ[x]);
        }
        out
    }

    /// Do `a` and `b` share a predecessor?
    pub fn common_pred(&self, a: usize, b: usize) -> bool {
        self.pred[a].intersects(&self.pred[b])
    }

    pub fn nodes_with_a_successor(&self) -> NodeSet {
        NodeSet::from_nodes(self.n, (0..self.n).filter(|&x| !self.succ[x].is_empty()))
    }

    pub fn nodes_with_a_predecessor(&self) -> NodeSet {
        NodeSet::from_nodes(self.n, (0..self.n).filter(|&x| !self.pred[x].is_empty()))
    }

    /// Relational composition: `{(x, y) : ∃z. (x, z) ∈ self ∧ (z, y) ∈ other}`.
    ///
    /// # Panics
    /// Panics if the node counts differ.
    pub fn compose(&self, other: &Relation) -> Relation {
        assert_eq!(self.n, other.n, "composing relations over different node sets");
        let mut succ = vec![NodeSet::new(self.n); self.n];
        for z in 0..self.n {
            if other.succ[z].is_empty() {
                continue;
            }
            for x in self.pred[z].iter() {
                succ[x].union_with(&other.succ[z]);
            }
        }
        Relation::from_successors(succ)
    }

    pub fn union(&self, other: &Relation) -> Relation {
        assert_eq!(self.n, other.n, "uniting relations over different node sets");
        let succ = self
            .succ
            .iter()
            .zip(&other.succ)
            .map(|(a, b)| {
                let mut s = a.clone();
                s.union_with(b);
                s
            })
            .collect();
        Relation::from_successors(succ)
    }

    /// Iterates `R ← R ∪ R∘R` until the edge count stops growing.
    pub fn transitive_closure(&self) -> Relation {
        let mut closure = self.clone();
        loop {
            let before = closure.num_edges();
            closure = closure.union(&closure.compose(&closure));
            if closure.num_edges() == before {
                return closure;
            }
        }
    }

    /// All nodes reachable from `start` by a directed path, `start` included.
    pub fn reachable(&self, start: usize) -> NodeSet {
        self.reachable_from_set(&NodeSet::singleton(self.n, start))
    }

    /// All nodes reachable from any node of `starts`, the starts included.
    pub fn reachable_from_set(&self, starts: &NodeSet) -> NodeSet {
        let mut visited = starts.clone();
        let mut worklist: VecDeque<usize> = starts.iter().collect();
        while let Some(x) = worklist.pop_front() {
            for y in self.succ[x].iter() {
                if visited.insert(y) {
                    worklist.push_back(y);
                }
            }
        }
        visited
    }

    pub fn has_selfloop(&self) -> bool {
        (0..self.n).any(|x| self.has_edge(x, x))
    }

    pub fn nodes_with_selfloop(&self) -> NodeSet {
        NodeSet::from_nodes(self.n, (0..self.n).filter(|&x| self.has_edge(x, x)))
    }

    pub fn nodes_reachable_from_a_selfloop(&self) -> NodeSet {
        self.reachable_from_set(&self.nodes_with_selfloop())
    }

    /// Is there a node with a self-loop from which every node is reachable?
    pub fn has_selfloop_that_reaches_all(&self) -> bool {
        self.nodes_with_selfloop()
            .iter()
            .any(|x| self.reachable(x).is_full())
    }

    /// Is there a node from which every node is reachable?
    pub fn has_root(&self) -> bool {
        (0..self.n).any(|x| self.reachable(x).is_full())
    }

    /// Does `x` have every node as a direct successor?
    pub fn sees_all(&self, x: usize) -> bool {
        self.succ[x].is_full()
    }

    pub fn has_node_that_sees_all(&self) -> bool {
        (0..self.n).any(|x| self.sees_all(x))
    }

    /// Isomorphic copy where node `x` becomes `map[x]`.
    ///
    /// # Panics
    /// Panics if `map` is not a bijection on `0..n`.
    pub fn rename(&self, map: &[usize]) -> Relation {
        assert_eq!(map.len(), self.n, "renaming must cover every node");
        let mut seen = NodeSet::new(self.n);
        for &target in map {
            assert!(seen.insert(target), "renaming is not injective at {target}");
        }
        let mut rel = Relation::new(self.n);
        for (x, y) in self.edges() {
            rel.add_edge(map[x], map[y]);
        }
        rel
    }

    /// Sub-relation on `keep` (ascending ids), renumbered densely in that order.
    pub fn induced(&self, keep: &[usize]) -> Relation {
        let mut map = vec![None; self.n];
        for (new, &old) in keep.iter().enumerate() {
            map[old] = Some(new);
        }
        let m = keep.len();
        let succ = keep.iter().map(|&old| self.succ[old].remap(&map, m)).collect();
        Relation::from_successors(succ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(n: usize, edges: &[(usize, usize)]) -> Relation {
        Relation::from_edges(n, edges.iter().copied())
    }

    #[test]
    fn test_pred_succ_consistent() {
        let mut r = rel(3, &[(0, 1), (1, 2), (2, 2)]);
        assert!(r.predecessors(2).contains(1));
        assert!(r.predecessors(2).contains(2));
        r.remove_edge(1, 2);
        assert!(!r.predecessors(2).contains(1));
        assert!(!r.successors(1).contains(2));
        assert_eq!(r.num_edges(), 2);
    }

    #[test]
    fn test_compose() {
        let a = rel(3, &[(0, 1), (1, 2)]);
        let b = rel(3, &[(1, 0), (2, 2)]);
        let c = a.compose(&b);
        assert_eq!(c, rel(3, &[(0, 0), (1, 2)]));
        assert_eq!(a.compose(&Relation::diagonal(3)), a);
        assert_eq!(Relation::diagonal(3).compose(&a), a);
    }

    #[test]
    fn test_transitive_closure_of_chain() {
        let chain = rel(4, &[(0, 1), (1, 2), (2, 3)]);
        let closure = chain.transitive_closure();
        assert_eq!(closure.num_edges(), 6);
        assert!(closure.has_edge(0, 3));
        assert!(!closure.has_selfloop());

        let cycle = rel(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(cycle.transitive_closure().num_edges(), 9);
    }

    #[test]
    fn test_reachability_queries() {
        let r = rel(4, &[(0, 1), (1, 1), (1, 2)]);
        assert_eq!(r.reachable(0), NodeSet::from_nodes(4, [0, 1, 2]));
        assert_eq!(r.nodes_with_selfloop(), NodeSet::singleton(4, 1));
        assert_eq!(r.nodes_reachable_from_a_selfloop(), NodeSet::from_nodes(4, [1, 2]));
        assert!(!r.has_selfloop_that_reaches_all());
        assert!(!r.has_root());

        let r = rel(3, &[(0, 0), (0, 1), (1, 2)]);
        assert!(r.has_selfloop_that_reaches_all());
        assert!(r.has_root());
    }

    #[test]
    fn test_sees_all() {
        let r = rel(2, &[(0, 0), (0, 1), (1, 0)]);
        assert!(r.sees_all(0));
        assert!(!r.sees_all(1));
        assert!(r.has_node_that_sees_all());
    }

    #[test]
    fn test_code_roundtrip() {
        let r = rel(3, &[(0, 1), (2, 0), (1, 1)]);
        let (n, code) = r.to_code();
        assert_eq!(n, 3);
        // 0→1: bit 3, 2→0: bit 2, 1→1: bit 4
        assert_eq!(code, BigUint::from(0b11100u32));
        assert_eq!(Relation::from_code(n, &code), r);
    }

    #[test]
    fn test_rename_and_induced() {
        let r = rel(3, &[(0, 1), (1, 2)]);
        assert_eq!(r.rename(&[2, 0, 1]), rel(3, &[(2, 0), (0, 1)]));
        assert_eq!(r.induced(&[1, 2]), rel(2, &[(0, 1)]));
    }

    #[test]
    #[should_panic(expected = "not injective")]
    fn test_rename_rejects_non_bijection() {
        rel(2, &[(0, 1)]).rename(&[0, 0]);
    }

    #[test]
    fn test_common_pred_and_set_successors() {
        let r = rel(3, &[(0, 1), (0, 2), (1, 2)]);
        assert!(r.common_pred(1, 2));
        assert!(!r.common_pred(0, 1));
        assert_eq!(
            r.successors_of_set(&NodeSet::from_nodes(3, [0, 1])),
            NodeSet::from_nodes(3, [1, 2])
        );
        assert_eq!(r.nodes_with_a_successor(), NodeSet::from_nodes(3, [0, 1]));
        assert_eq!(r.nodes_with_a_predecessor(), NodeSet::from_nodes(3, [1, 2]));
    }
}
