//! Min-priority queue with FIFO ordering of equal keys.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A queue pulling the value with the lowest key first.
///
/// Values sharing the same key are pulled in insertion order: each entry is
/// stamped with a sequence number which breaks ties between equal keys.
pub(crate) struct PriorityQueue<K, V> {
    heap: BinaryHeap<Entry<K, V>>,
    next_seq: u64,
}

impl<K: Copy + Ord, V> PriorityQueue<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes all entries.
    ///
    /// The sequence counter keeps running, so entries inserted after a clear
    /// still compare after every entry inserted before it.
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    /// Inserts a value with the specified key, in *O*(log(*N*)).
    pub(crate) fn insert(&mut self, key: K, value: V) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, seq, value });
    }

    /// Pulls the value with the lowest key, or the earliest inserted among
    /// the values with the lowest key, in *O*(log(*N*)).
    pub(crate) fn pull(&mut self) -> Option<(K, V)> {
        self.heap.pop().map(|entry| (entry.key, entry.value))
    }

    /// Returns the lowest key without removing its value.
    pub(crate) fn peek_key(&self) -> Option<&K> {
        self.heap.peek().map(|entry| &entry.key)
    }
}

struct Entry<K, V> {
    key: K,
    seq: u64,
    value: V,
}

impl<K: Ord, V> Entry<K, V> {
    fn rank(&self) -> (&K, u64) {
        (&self.key, self.seq)
    }
}

// `BinaryHeap` is a max-heap: the order is reversed so that the lowest
// `(key, seq)` sits at the top.
impl<K: Ord, V> Ord for Entry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.rank().cmp(&self.rank())
    }
}

impl<K: Ord, V> PartialOrd for Entry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl<K: Ord, V> Eq for Entry<K, V> {}
