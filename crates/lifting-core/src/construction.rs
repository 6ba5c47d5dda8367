use crate::nodeset::NodeSet;
use crate::pattern::{Color, Pattern};
use tracing::{debug, trace};

/// Saturates a family of node sets, starting from all singletons, under
/// `(S1, S2) ↦ green_succ(S1) ∩ red_succ(S2)`. A new set is added only when
/// no existing set already contains it, and sets strictly contained in
/// another are dropped after each round. The pattern is
/// construction-deterministic iff the full node set never shows up.
pub fn is_construction_deterministic(pattern: &Pattern) -> bool {
    let n = pattern.num_nodes();
    let mut sets: Vec<NodeSet> = (0..n).map(|x| NodeSet::singleton(n, x)).collect();

    let mut round = 0;
    loop {
        let green: Vec<NodeSet> = sets
            .iter()
            .map(|s| pattern.successors_of_set(Color::Green, s))
            .collect();
        let red: Vec<NodeSet> = sets
            .iter()
            .map(|s| pattern.successors_of_set(Color::Red, s))
            .collect();

        let mut fresh: Vec<NodeSet> = Vec::new();
        for g in &green {
            for r in &red {
                let meet = g.intersection(r);
                if !sets.iter().any(|s| meet.is_subset(s)) && !fresh.contains(&meet) {
                    fresh.push(meet);
                }
            }
        }
        if fresh.is_empty() {
            break;
        }
        trace!(round, added = fresh.len(), "construction round");
        sets.extend(fresh);

        let maximal: Vec<NodeSet> = sets
            .iter()
            .filter(|&a| !sets.iter().any(|b| a != b && a.is_subset(b)))
            .cloned()
            .collect();
        sets = maximal;
        round += 1;
    }

    let full = NodeSet::full(n);
    let deterministic = !sets.contains(&full);
    debug!(nodes = n, sets = sets.len(), rounds = round, deterministic, "construction determinism");
    deterministic
}
