//! Edge-2-colored directed graphs and the lifting operator.
//!
//! A [`Pattern`] is a green and a red [`Relation`] over one shared dense node
//! set `0..n`. Lifting builds a new pattern on unordered node pairs; pruning
//! removes nodes that cannot matter for a homomorphism into the pattern and
//! compacts the survivors back into `0..m`, so node ids are always dense and
//! names never need a separate normalization step.

use crate::nodeset::NodeSet;
use crate::relation::Relation;
use std::fmt;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Green,
    Red,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::Green, Color::Red];
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Green => f.write_str("green"),
            Color::Red => f.write_str("red"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    green: Relation,
    red: Relation,
    generation: u32,
}

impl Pattern {
    /// A pattern with `n` nodes and no edges.
    pub fn new(n: usize) -> Self {
        Pattern {
            green: Relation::new(n),
            red: Relation::new(n),
            generation: 0,
        }
    }

    pub fn from_edge_lists(n: usize, green: &[(usize, usize)], red: &[(usize, usize)]) -> Self {
        Pattern {
            green: Relation::from_edges(n, green.iter().copied()),
            red: Relation::from_edges(n, red.iter().copied()),
            generation: 0,
        }
    }

    /// # Panics
    /// Panics if the two relations are over different node counts.
    pub fn from_relations(green: Relation, red: Relation) -> Self {
        assert_eq!(green.num_nodes(), red.num_nodes(), "colors over different node sets");
        Pattern {
            green,
            red,
            generation: 0,
        }
    }

    /// Number of lifting steps that produced this pattern.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn num_nodes(&self) -> usize {
        self.green.num_nodes()
    }

    pub fn relation(&self, color: Color) -> &Relation {
        match color {
            Color::Green => &self.green,
            Color::Red => &self.red,
        }
    }

    fn relation_mut(&mut self, color: Color) -> &mut Relation {
        match color {
            Color::Green => &mut self.green,
            Color::Red => &mut self.red,
        }
    }

    pub fn green(&self) -> &Relation {
        &self.green
    }

    pub fn red(&self) -> &Relation {
        &self.red
    }

    pub fn add_edge(&mut self, color: Color, x: usize, y: usize) {
        self.relation_mut(color).add_edge(x, y);
    }

    pub fn remove_edge(&mut self, color: Color, x: usize, y: usize) {
        self.relation_mut(color).remove_edge(x, y);
    }

    pub fn has_edge(&self, color: Color, x: usize, y: usize) -> bool {
        self.relation(color).has_edge(x, y)
    }

    pub fn has_green_edge(&self, x: usize, y: usize) -> bool {
        self.green.has_edge(x, y)
    }

    pub fn has_red_edge(&self, x: usize, y: usize) -> bool {
        self.red.has_edge(x, y)
    }

    pub fn num_edges(&self, color: Color) -> usize {
        self.relation(color).num_edges()
    }

    pub fn successors(&self, color: Color, x: usize) -> &NodeSet {
        self.relation(color).successors(x)
    }

    pub fn predecessors(&self, color: Color, x: usize) -> &NodeSet {
        self.relation(color).predecessors(x)
    }

    pub fn successors_of_set(&self, color: Color, nodes: &NodeSet) -> NodeSet {
        self.relation(color).successors_of_set(nodes)
    }

    /// `(nodes, green edges, red edges)`, the quantities the lifting loop
    /// watches for a fixpoint.
    pub fn size(&self) -> (usize, usize, usize) {
        (
            self.num_nodes(),
            self.green.num_edges(),
            self.red.num_edges(),
        )
    }

    /// Node pairs `(a, b)` with `a ≤ b` that share a green and a red
    /// predecessor, in the order they become nodes of [`Pattern::lifting`].
    /// Other pairs could never gain both predecessor colors in the lifting.
    pub fn lifting_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.num_nodes();
        let mut pairs = Vec::new();
        for a in 0..n {
            for b in a..n {
                if self.green.common_pred(a, b) && self.red.common_pred(a, b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    /// The lifting `L(P)`: nodes are [`Pattern::lifting_pairs`]; there is a
    /// `c`-edge `(u1,u2) → (v1,v2)` iff `u1` or `u2` has `c`-edges to both
    /// `v1` and `v2`.
    pub fn lifting(&self) -> Pattern {
        let pairs = self.lifting_pairs();
        let m = pairs.len();
        let mut lifted = Pattern::new(m);
        lifted.generation = self.generation + 1;
        for color in Color::BOTH {
            let rel = self.relation(color);
            let covers = |u: usize, v: (usize, usize)| {
                let succ = rel.successors(u);
                succ.contains(v.0) && succ.contains(v.1)
            };
            for (i, &(u1, u2)) in pairs.iter().enumerate() {
                for (j, &v) in pairs.iter().enumerate() {
                    if covers(u1, v) || covers(u2, v) {
                        lifted.add_edge(color, i, j);
                    }
                }
            }
        }
        lifted
    }

    /// Does `b` dominate `a`, i.e. are all four neighbor sets of `a`
    /// contained in the corresponding sets of `b`?
    fn dominated_by(&self, a: usize, b: usize) -> bool {
        Color::BOTH.iter().all(|&c| {
            let rel = self.relation(c);
            rel.predecessors(a).is_subset(rel.predecessors(b))
                && rel.successors(a).is_subset(rel.successors(b))
        })
    }

    /// Nodes that lack a predecessor of some color, have no successor at all,
    /// or are dominated by another node. Of two mutually dominating nodes
    /// only the later one is reported.
    pub fn useless_nodes(&self) -> NodeSet {
        let n = self.num_nodes();
        let mut useless = NodeSet::new(n);
        for x in 0..n {
            let no_pred = self.green.predecessors(x).is_empty() || self.red.predecessors(x).is_empty();
            let no_succ = self.green.successors(x).is_empty() && self.red.successors(x).is_empty();
            if no_pred || no_succ {
                trace!(node = x, no_pred, no_succ, "useless node");
                useless.insert(x);
            }
        }
        for a in 0..n {
            for b in a + 1..n {
                if self.dominated_by(b, a) {
                    trace!(node = b, by = a, "dominated node");
                    useless.insert(b);
                } else if self.dominated_by(a, b) {
                    trace!(node = a, by = b, "dominated node");
                    useless.insert(a);
                }
            }
        }
        useless
    }

    /// Removes `nodes` and compacts the remaining ids, preserving their order.
    pub fn remove_nodes(&mut self, nodes: &NodeSet) {
        let keep: Vec<usize> = (0..self.num_nodes()).filter(|&x| !nodes.contains(x)).collect();
        self.green = self.green.induced(&keep);
        self.red = self.red.induced(&keep);
    }

    /// Removes useless nodes until none remain; returns how many were removed.
    pub fn remove_useless_nodes(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let useless = self.useless_nodes();
            if useless.is_empty() {
                return removed;
            }
            removed += useless.len();
            self.remove_nodes(&useless);
        }
    }

    /// Drops every `c`-edge leaving a node that is not reachable by `c`-edges
    /// from a `c`-colored self-loop.
    pub fn remove_useless_edges(&mut self) {
        for color in Color::BOTH {
            let rel = self.relation_mut(color);
            let alive = rel.nodes_reachable_from_a_selfloop();
            for x in 0..rel.num_nodes() {
                if !alive.contains(x) {
                    rel.remove_all_successors(x);
                }
            }
        }
    }

    /// Is there a node with both a green and a red self-loop?
    pub fn has_double_selfloop(&self) -> bool {
        (0..self.num_nodes()).any(|x| self.green.has_edge(x, x) && self.red.has_edge(x, x))
    }

    pub fn has_green_selfloop(&self) -> bool {
        self.green.has_selfloop()
    }

    pub fn has_red_selfloop(&self) -> bool {
        self.red.has_selfloop()
    }

    /// Connected when edge directions and colors are ignored.
    pub fn is_weakly_connected(&self) -> bool {
        let n = self.num_nodes();
        if n == 0 {
            return true;
        }
        let both = self.green.union(&self.red);
        let mut undirected = both.clone();
        for (x, y) in both.edges() {
            undirected.add_edge(y, x);
        }
        undirected.reachable(0).is_full()
    }

    /// Every node has at least one predecessor of each color, so the
    /// pattern's code determines its size.
    pub fn is_encodable(&self) -> bool {
        (0..self.num_nodes()).all(|x| {
            !self.green.predecessors(x).is_empty() && !self.red.predecessors(x).is_empty()
        })
    }

    /// Isomorphic copy where node `x` becomes `map[x]`.
    pub fn rename(&self, map: &[usize]) -> Pattern {
        Pattern {
            green: self.green.rename(map),
            red: self.red.rename(map),
            generation: self.generation,
        }
    }

    /// Colors swapped.
    pub fn swap_colors(&self) -> Pattern {
        Pattern {
            green: self.red.clone(),
            red: self.green.clone(),
            generation: self.generation,
        }
    }

    /// The representative whose code satisfies
    /// [`crate::codes::is_normal_form`]: colors swapped if red has more edges,
    /// then nodes ordered by descending (green, red) out-degree.
    pub fn to_normal_form(&self) -> Pattern {
        let base = if self.red.num_edges() > self.green.num_edges() {
            self.swap_colors()
        } else {
            self.clone()
        };
        let n = base.num_nodes();
        let degree = |x: usize| (base.green.successors(x).len(), base.red.successors(x).len());
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| degree(b).cmp(&degree(a)).then(a.cmp(&b)));
        let mut map = vec![0; n];
        for (new, &old) in order.iter().enumerate() {
            map[old] = new;
        }
        base.rename(&map)
    }

    /// Is `map` (node of `self` ↦ node of `target`) a color-preserving
    /// homomorphism?
    pub fn is_homomorphism(&self, target: &Pattern, map: &[usize]) -> bool {
        if map.len() != self.num_nodes() || map.iter().any(|&y| y >= target.num_nodes()) {
            return false;
        }
        Color::BOTH.iter().all(|&c| {
            self.relation(c)
                .edges()
                .all(|(x, y)| target.has_edge(c, map[x], map[y]))
        })
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
    fn test_lifting_pairs_filter() {
        assert_eq!(
            vierer().lifting_pairs(),
            vec![(0, 0), (1, 1), (2, 2), (2, 3), (3, 3)]
        );
    }

    #[test]
    fn test_lifting_counts() {
        let lifted = vierer().lifting();
        assert_eq!(lifted.generation(), 1);
        assert_eq!(lifted.size(), (5, 9, 10));
    }

    #[test]
    fn test_lifting_keeps_double_selfloop() {
        let p = Pattern::from_edge_lists(2, &[(0, 0), (0, 1), (1, 0)], &[(0, 0), (1, 0), (0, 1)]);
        assert!(p.has_double_selfloop());
        let lifted = p.lifting();
        // (0,0) inherits both self-loops of node 0
        assert!(lifted.has_double_selfloop());
    }

    #[test]
    fn test_remove_useless_nodes_fixpoint() {
        let mut lifted = vierer().lifting();
        assert_eq!(lifted.remove_useless_nodes(), 1);
        assert_eq!(lifted.size(), (4, 7, 8));
        assert_eq!(lifted.remove_useless_nodes(), 0);
    }

    #[test]
    fn test_useless_node_reasons() {
        // node 2 has no red predecessor
        let p = Pattern::from_edge_lists(3, &[(0, 1), (1, 0), (0, 2)], &[(0, 1), (1, 0)]);
        assert!(p.useless_nodes().contains(2));

        // identical twins: only the later one goes
        let twins = Pattern::from_edge_lists(
            3,
            &[(0, 1), (0, 2), (1, 0), (2, 0)],
            &[(0, 1), (0, 2), (1, 0), (2, 0)],
        );
        let useless = twins.useless_nodes();
        assert!(useless.contains(2));
        assert!(!useless.contains(1));
    }

    #[test]
    fn test_remove_useless_edges() {
        // green: 0 has a self-loop and reaches 1; 2 → 0 is not reachable from it
        let mut p = Pattern::from_edge_lists(3, &[(0, 0), (0, 1), (2, 0)], &[(1, 1), (1, 2)]);
        p.remove_useless_edges();
        assert!(p.has_green_edge(0, 1));
        assert!(!p.has_green_edge(2, 0));
        assert!(p.has_red_edge(1, 2));
        assert_eq!(p.size(), (3, 2, 2));
    }

    #[test]
    fn test_selfloop_predicates() {
        let p = vierer();
        assert!(!p.has_double_selfloop());
        assert!(p.has_green_selfloop());
        assert!(p.has_red_selfloop());
        assert!(p.is_weakly_connected());
        assert!(p.is_encodable());

        let split = Pattern::from_edge_lists(2, &[(0, 0)], &[(1, 1)]);
        assert!(!split.is_weakly_connected());
    }

    #[test]
    fn test_normal_form_orders_by_degree() {
        let p = Pattern::from_edge_lists(3, &[(2, 0), (2, 1)], &[(0, 0), (1, 2), (2, 2), (0, 1)]);
        let nf = p.to_normal_form();
        // red outnumbers green, so colors swap first
        assert_eq!(nf.num_edges(Color::Green), 4);
        let outdeg: Vec<usize> = (0..3).map(|x| nf.successors(Color::Green, x).len()).collect();
        assert_eq!(outdeg, vec![2, 1, 1]);
    }

    #[test]
    fn test_is_homomorphism() {
        let cycle = Pattern::from_edge_lists(2, &[(0, 1), (1, 0)], &[(0, 1), (1, 0)]);
        let loopy = Pattern::from_edge_lists(1, &[(0, 0)], &[(0, 0)]);
        assert!(cycle.is_homomorphism(&loopy, &[0, 0]));
        assert!(!loopy.is_homomorphism(&cycle, &[0]));
        assert!(cycle.is_homomorphism(&cycle, &[1, 0]));
    }
}
