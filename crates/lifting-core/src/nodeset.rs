/// Dense bitset over node ids `0..capacity`.
///
/// All sets that are compared or combined must share the same capacity;
/// equality and hashing are over the raw words, so two sets over the same
/// universe are equal iff they hold the same nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeSet {
    capacity: usize,
    words: Vec<u64>,
}

#[inline]
fn word_count(capacity: usize) -> usize {
    (capacity + 63) / 64
}

impl NodeSet {
    pub fn new(capacity: usize) -> Self {
        NodeSet {
            capacity,
            words: vec![0; word_count(capacity)],
        }
    }

    pub fn full(capacity: usize) -> Self {
        let mut set = NodeSet {
            capacity,
            words: vec![u64::MAX; word_count(capacity)],
        };
        let tail = capacity % 64;
        if tail != 0 {
            if let Some(last) = set.words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        set
    }

    pub fn singleton(capacity: usize, node: usize) -> Self {
        let mut set = NodeSet::new(capacity);
        set.insert(node);
        set
    }

    pub fn from_nodes<I: IntoIterator<Item = usize>>(capacity: usize, nodes: I) -> Self {
        let mut set = NodeSet::new(capacity);
        for node in nodes {
            set.insert(node);
        }
        set
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts `node`, returning true if it was not present.
    ///
    /// # Panics
    /// Panics if `node >= capacity`.
    #[inline]
    pub fn insert(&mut self, node: usize) -> bool {
        assert!(node < self.capacity, "node {node} outside 0..{}", self.capacity);
        let (w, b) = (node / 64, node % 64);
        let was = (self.words[w] >> b) & 1 == 1;
        self.words[w] |= 1 << b;
        !was
    }

    /// Removes `node`, returning true if it was present.
    #[inline]
    pub fn remove(&mut self, node: usize) -> bool {
        if node >= self.capacity {
            return false;
        }
        let (w, b) = (node / 64, node % 64);
        let was = (self.words[w] >> b) & 1 == 1;
        self.words[w] &= !(1 << b);
        was
    }

    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        node < self.capacity && (self.words[node / 64] >> (node % 64)) & 1 == 1
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    pub fn union_with(&mut self, other: &NodeSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
    }

    pub fn intersect_with(&mut self, other: &NodeSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= b;
        }
    }

    pub fn difference_with(&mut self, other: &NodeSet) {
        debug_assert_eq!(self.capacity, other.capacity);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= !b;
        }
    }

    pub fn intersection(&self, other: &NodeSet) -> NodeSet {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }

    pub fn intersects(&self, other: &NodeSet) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    pub fn is_subset(&self, other: &NodeSet) -> bool {
        self.words.iter().zip(&other.words).all(|(a, b)| a & !b == 0)
    }

    /// Iterates members in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let b = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(w * 64 + b)
            })
        })
    }

    /// Re-indexes the set onto a new universe of size `capacity`;
    /// `map[old]` is the new id, or `None` to drop the node.
    pub fn remap(&self, map: &[Option<usize>], capacity: usize) -> NodeSet {
        let mut out = NodeSet::new(capacity);
        for node in self.iter() {
            if let Some(new) = map[node] {
                out.insert(new);
            }
        }
        out
    }
}
