//! Patterns read as two-letter automata.
//!
//! States are pattern nodes, the letters are the two colors. Start and stop
//! sets are chosen per query. Every operation returns a new automaton and
//! leaves its input untouched.

use crate::error::{LiftingError, Result};
use crate::nodeset::NodeSet;
use crate::pattern::{Color, Pattern};
use crate::powerset::PowersetArena;
use crate::relation::Relation;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    green: Relation,
    red: Relation,
    pub start: NodeSet,
    pub stop: NodeSet,
}

/// Result of the subset construction: the automaton over macro-state IDs
/// and the arena mapping each ID back to its set of original states.
pub struct PowersetNfa {
    pub nfa: Nfa,
    pub arena: PowersetArena,
}

impl PowersetNfa {
    /// ID of the macro-state holding exactly `set`, if it was reached.
    pub fn state_of(&self, set: &NodeSet) -> Option<usize> {
        self.arena.lookup(set).map(|id| id as usize)
    }
}

impl Nfa {
    pub fn new(num_states: usize) -> Self {
        Nfa {
            green: Relation::new(num_states),
            red: Relation::new(num_states),
            start: NodeSet::new(num_states),
            stop: NodeSet::new(num_states),
        }
    }

    /// The pattern's transition structure with empty start and stop sets.
    pub fn from_pattern(pattern: &Pattern) -> Self {
        let n = pattern.num_nodes();
        Nfa {
            green: pattern.green().clone(),
            red: pattern.red().clone(),
            start: NodeSet::new(n),
            stop: NodeSet::new(n),
        }
    }

    pub fn num_states(&self) -> usize {
        self.green.num_nodes()
    }

    pub fn transitions(&self, letter: Color) -> &Relation {
        match letter {
            Color::Green => &self.green,
            Color::Red => &self.red,
        }
    }

    pub fn add_transition(&mut self, letter: Color, from: usize, to: usize) {
        match letter {
            Color::Green => self.green.add_edge(from, to),
            Color::Red => self.red.add_edge(from, to),
        }
    }

    pub fn add_start_state(&mut self, state: usize) {
        self.start.insert(state);
    }

    pub fn add_stop_state(&mut self, state: usize) {
        self.stop.insert(state);
    }

    pub fn clear_start_states(&mut self) {
        self.start.clear();
    }

    pub fn clear_stop_states(&mut self) {
        self.stop.clear();
    }

    /// One start state and exactly one successor per letter everywhere.
    pub fn is_deterministic(&self) -> bool {
        self.start.len() == 1
            && (0..self.num_states()).all(|q| {
                self.green.successors(q).len() == 1 && self.red.successors(q).len() == 1
            })
    }

    /// Subset construction. In `full` mode the search starts from every
    /// singleton `{q}` and all of them become start states; otherwise it
    /// starts from the declared start set. A macro-state is final iff it
    /// contains a final state. The result is complete: the empty set is a
    /// macro-state like any other.
    pub fn power_nfa(&self, full: bool) -> PowersetNfa {
        let n = self.num_states();
        let mut arena = PowersetArena::new();
        let mut worklist: VecDeque<u32> = VecDeque::new();

        let seeds: Vec<NodeSet> = if full {
            (0..n).map(|q| NodeSet::singleton(n, q)).collect()
        } else {
            vec![self.start.clone()]
        };
        let mut start_ids = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let any_stop = seed.intersects(&self.stop);
            let (id, is_new) = arena.intern(seed, any_stop);
            start_ids.push(id as usize);
            if is_new {
                worklist.push_back(id);
            }
        }

        let mut arcs: [Vec<(usize, usize)>; 2] = [Vec::new(), Vec::new()];
        while let Some(id) = worklist.pop_front() {
            for (slot, letter) in Color::BOTH.into_iter().enumerate() {
                let dest = self
                    .transitions(letter)
                    .successors_of_set(&arena.sets[id as usize]);
                let any_stop = dest.intersects(&self.stop);
                let (dest_id, is_new) = arena.intern(dest, any_stop);
                if is_new {
                    worklist.push_back(dest_id);
                }
                arcs[slot].push((id as usize, dest_id as usize));
            }
        }

        let m = arena.len();
        let [green_arcs, red_arcs] = arcs;
        let nfa = Nfa {
            green: Relation::from_edges(m, green_arcs),
            red: Relation::from_edges(m, red_arcs),
            start: NodeSet::from_nodes(m, start_ids),
            stop: NodeSet::from_nodes(m, (0..m).filter(|&id| arena.is_stop[id])),
        };
        debug!(states = n, macro_states = m, full, "subset construction");
        PowersetNfa { nfa, arena }
    }

    pub fn forward_reachable(&self, from: &NodeSet) -> NodeSet {
        self.green.union(&self.red).reachable_from_set(from)
    }

    pub fn backward_reachable(&self, from: &NodeSet) -> NodeSet {
        let n = self.num_states();
        let mut visited = from.clone();
        let mut worklist: VecDeque<usize> = from.iter().collect();
        while let Some(q) = worklist.pop_front() {
            for letter in Color::BOTH {
                for p in self.transitions(letter).predecessors(q).iter() {
                    if visited.insert(p) {
                        worklist.push_back(p);
                    }
                }
            }
        }
        debug_assert_eq!(visited.capacity(), n);
        visited
    }

    /// Keep states reachable from a start state AND co-reachable to a stop
    /// state. Renumbers states contiguously.
    pub fn trim(&self) -> Nfa {
        let mut keep_set = self.forward_reachable(&self.start);
        keep_set.intersect_with(&self.backward_reachable(&self.stop));
        if keep_set.is_full() {
            return self.clone();
        }

        let keep: Vec<usize> = keep_set.iter().collect();
        let mut old_to_new = vec![None; self.num_states()];
        for (new, &old) in keep.iter().enumerate() {
            old_to_new[old] = Some(new);
        }
        let m = keep.len();
        Nfa {
            green: self.green.induced(&keep),
            red: self.red.induced(&keep),
            start: self.start.remap(&old_to_new, m),
            stop: self.stop.remap(&old_to_new, m),
        }
    }

    /// Swaps final and non-final states. Only meaningful for a deterministic
    /// automaton; subset-construct first otherwise.
    pub fn complement(&self) -> Result<Nfa> {
        if !self.is_deterministic() {
            return Err(LiftingError::NotDeterministic);
        }
        let mut stop = NodeSet::full(self.num_states());
        stop.difference_with(&self.stop);
        Ok(Nfa {
            stop,
            ..self.clone()
        })
    }

    /// Is some state on a cycle? Checked as a self-pair in the transitive
    /// closure of the letter-blind successor relation.
    pub fn contains_cycle(&self) -> bool {
        self.green.union(&self.red).transitive_closure().has_selfloop()
    }

    pub fn is_language_finite(&self) -> bool {
        !self.trim().contains_cycle()
    }

    /// Is the complement of the language finite?
    pub fn is_language_cofinite(&self) -> Result<bool> {
        let dfa = if self.is_deterministic() {
            self.clone()
        } else {
            self.power_nfa(false).nfa
        };
        Ok(dfa.complement()?.is_language_finite())
    }
}

/// Full-mode powerset automaton of the pattern; holds iff every singleton
/// macro-state can reach the macro-state of all nodes.
pub fn third_path_condition(pattern: &Pattern) -> bool {
    let n = pattern.num_nodes();
    let pow = Nfa::from_pattern(pattern).power_nfa(true);
    let Some(all) = pow.state_of(&NodeSet::full(n)) else {
        debug!(nodes = n, "full node set never reached");
        return false;
    };
    let reaches_all = pow
        .nfa
        .backward_reachable(&NodeSet::singleton(pow.nfa.num_states(), all));
    (0..n).all(|q| {
        pow.state_of(&NodeSet::singleton(n, q))
            .is_some_and(|id| reaches_all.contains(id))
    })
}

/// Full-mode powerset automaton with every singleton as start state and the
/// macro-state of all nodes as the only final state; holds iff its language
/// is cofinite.
pub fn cofinite_path_condition(pattern: &Pattern) -> Result<bool> {
    let n = pattern.num_nodes();
    let mut pow = Nfa::from_pattern(pattern).power_nfa(true);
    pow.nfa.clear_stop_states();
    if let Some(all) = pow.state_of(&NodeSet::full(n)) {
        pow.nfa.add_stop_state(all);
    }
    pow.nfa.is_language_cofinite()
}
