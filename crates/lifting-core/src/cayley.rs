//! Transformation monoid of a pattern.
//!
//! Elements are relations on the pattern's node set reached from the
//! identity by right-composition with the green and red relations. There are
//! at most `2^(n²)` relations on `n` nodes, so the breadth-first closure
//! always terminates.

use crate::nodeset::NodeSet;
use crate::pattern::{Color, Pattern};
use crate::relation::Relation;
use num_bigint::BigUint;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

pub struct CayleyGraph {
    /// Element relations, indexed by ID. ID 0 is the identity.
    elements: Vec<Relation>,
    index: FxHashMap<Relation, u32>,
    /// `next[c][id]` = ID of `elements[id] ∘ c`.
    next: [Vec<u32>; 2],
    /// Elements reachable from a cycle, i.e. by infinitely many words.
    infinite: NodeSet,
}

#[inline]
fn slot(color: Color) -> usize {
    match color {
        Color::Green => 0,
        Color::Red => 1,
    }
}

impl CayleyGraph {
    pub fn new(pattern: &Pattern) -> Self {
        let n = pattern.num_nodes();
        let mut graph = CayleyGraph {
            elements: Vec::new(),
            index: FxHashMap::default(),
            next: [Vec::new(), Vec::new()],
            infinite: NodeSet::new(0),
        };

        let mut worklist: VecDeque<u32> = VecDeque::new();
        let (identity, _) = graph.intern(Relation::diagonal(n));
        worklist.push_back(identity);

        while let Some(id) = worklist.pop_front() {
            for color in Color::BOTH {
                let product = graph.elements[id as usize].compose(pattern.relation(color));
                let (dest, is_new) = graph.intern(product);
                if is_new {
                    worklist.push_back(dest);
                }
                graph.next[slot(color)][id as usize] = dest;
            }
        }

        let shape = graph.as_pattern();
        graph.infinite = shape
            .green()
            .union(shape.red())
            .transitive_closure()
            .nodes_reachable_from_a_selfloop();

        debug!(
            nodes = n,
            elements = graph.len(),
            infinite = graph.infinite.len(),
            "cayley graph built"
        );
        graph
    }

    fn intern(&mut self, rel: Relation) -> (u32, bool) {
        if let Some(&id) = self.index.get(&rel) {
            return (id, false);
        }
        let id = self.elements.len() as u32;
        self.elements.push(rel.clone());
        self.index.insert(rel, id);
        self.next[0].push(u32::MAX);
        self.next[1].push(u32::MAX);
        (id, true)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: usize) -> &Relation {
        &self.elements[id]
    }

    /// Canonical `(n, code)` identity of an element.
    pub fn code(&self, id: usize) -> (usize, BigUint) {
        self.elements[id].to_code()
    }

    pub fn lookup(&self, rel: &Relation) -> Option<usize> {
        self.index.get(rel).map(|&id| id as usize)
    }

    /// ID of `element(id) ∘ color`.
    pub fn successor(&self, id: usize, color: Color) -> usize {
        self.next[slot(color)][id] as usize
    }

    /// The graph itself as a pattern over element IDs: a `c`-edge
    /// `id → successor(id, c)` for every element.
    pub fn as_pattern(&self) -> Pattern {
        let edges = |color: Color| -> Vec<(usize, usize)> {
            (0..self.len()).map(|id| (id, self.successor(id, color))).collect()
        };
        Pattern::from_edge_lists(self.len(), &edges(Color::Green), &edges(Color::Red))
    }

    /// Elements reachable from a self-loop of the letter-blind transitive
    /// closure, i.e. reached by infinitely many words.
    pub fn infinite_reach(&self) -> &NodeSet {
        &self.infinite
    }

    /// Complement of [`CayleyGraph::infinite_reach`].
    pub fn finite_reach(&self) -> NodeSet {
        let mut finite = NodeSet::full(self.len());
        finite.difference_with(&self.infinite);
        finite
    }

    /// Every finitely-reached element other than the identity has a node
    /// with a self-loop that eventually sees all nodes. With a self-loop at
    /// `s`, the successors of `s` under the powers of the element grow until
    /// they equal everything reachable from `s`, so this is
    /// [`Relation::has_selfloop_that_reaches_all`].
    pub fn check_first_path_condition(&self) -> bool {
        self.finite_reach().iter().filter(|&id| id != 0).all(|id| {
            let ok = self.elements[id].has_selfloop_that_reaches_all();
            if !ok {
                debug!(element = id, "first path condition fails");
            }
            ok
        })
    }

    /// Every infinitely-reached element has a node that directly sees all
    /// nodes.
    pub fn check_second_path_condition(&self) -> bool {
        self.infinite.iter().all(|id| {
            let ok = self.elements[id].has_node_that_sees_all();
            if !ok {
                debug!(element = id, "second path condition fails");
            }
            ok
        })
    }
}
