use crate::nodeset::NodeSet;
use rustc_hash::FxHashMap;

/// Interns macro-states (sets of automaton states) as `u32` IDs.
/// After interning, the subset construction works on cheap IDs only.
pub struct PowersetArena {
    map: FxHashMap<NodeSet, u32>,
    pub sets: Vec<NodeSet>,
    pub is_stop: Vec<bool>,
}

impl PowersetArena {
    pub fn new() -> Self {
        PowersetArena {
            map: FxHashMap::default(),
            sets: Vec::new(),
            is_stop: Vec::new(),
        }
    }

    /// Intern a macro-state. Returns `(id, is_new)`.
    /// `any_stop` records whether the set contains a final state.
    pub fn intern(&mut self, set: NodeSet, any_stop: bool) -> (u32, bool) {
        if let Some(&id) = self.map.get(&set) {
            return (id, false);
        }
        let id = self.sets.len() as u32;
        self.sets.push(set.clone());
        self.is_stop.push(any_stop);
        self.map.insert(set, id);
        (id, true)
    }

    /// Look up an existing set. Returns None if not interned.
    pub fn lookup(&self, set: &NodeSet) -> Option<u32> {
        self.map.get(set).copied()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl Default for PowersetArena {
    fn default() -> Self {
        PowersetArena::new()
    }
}
