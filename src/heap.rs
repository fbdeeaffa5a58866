use crate::{GraphError, VertexId};

/// A binary min-heap of vertex ids ordered by a key array the heap owns, with
/// a reverse position index so that `contains` is O(1) and `decrease_key` is
/// O(log n).
///
/// The key array is indexed by vertex id and outlives queue membership: after
/// a vertex is extracted its final key is still readable through
/// [`Self::key`], which is how shortest-path algorithms recover their
/// distance table with [`Self::into_keys`].
#[derive(Clone, Debug)]
pub struct IndexedMinHeap {
    keys: Vec<f64>,
    heap: Vec<VertexId>,
    position: Vec<Option<usize>>,
}

impl IndexedMinHeap {
    /// Creates an empty queue over the given initial keys.
    pub fn new(keys: Vec<f64>) -> Self {
        let position = vec![None; keys.len()];
        Self {
            keys,
            heap: Vec::new(),
            position,
        }
    }

    /// Creates an empty queue with `slots` keys, all set to infinity.
    pub fn with_slots(slots: usize) -> Self {
        Self::new(vec![f64::INFINITY; slots])
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.position.get(v).copied().flatten().is_some()
    }

    /// Gets the current key of a vertex, whether or not it is queued.
    pub fn key(&self, v: VertexId) -> f64 {
        self.keys.get(v).copied().unwrap_or(f64::INFINITY)
    }

    /// Consumes the queue and returns its key array.
    pub fn into_keys(self) -> Vec<f64> {
        self.keys
    }

    /// Adds a vertex that is not currently queued.
    pub fn insert(&mut self, v: VertexId, key: f64) {
        debug_assert!(!self.contains(v), "vertex {v} is already queued");
        if v >= self.keys.len() {
            self.keys.resize(v + 1, f64::INFINITY);
            self.position.resize(v + 1, None);
        }
        self.keys[v] = key;
        let index = self.heap.len();
        self.heap.push(v);
        self.position[v] = Some(index);
        self.sift_up(index);
    }

    /// Removes and returns the vertex with the smallest key.
    pub fn extract_min(&mut self) -> Result<VertexId, GraphError> {
        let Some(last) = self.heap.pop() else {
            return Err(GraphError::QueueUnderflow);
        };
        if self.heap.is_empty() {
            self.position[last] = None;
            return Ok(last);
        }
        let min = std::mem::replace(&mut self.heap[0], last);
        self.position[min] = None;
        self.position[last] = Some(0);
        self.sift_down(0);
        Ok(min)
    }

    /// Lowers the key of a queued vertex, or inserts the vertex if it is not
    /// queued.
    pub fn decrease_key(&mut self, v: VertexId, key: f64) {
        match self.position.get(v).copied().flatten() {
            Some(index) => {
                debug_assert!(
                    key <= self.keys[v],
                    "decrease_key called with a larger key for vertex {v}"
                );
                self.keys[v] = key;
                self.sift_up(index);
            }
            None => self.insert(v, key),
        }
    }

    fn key_at(&self, index: usize) -> f64 {
        self.keys[self.heap[index]]
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.key_at(index) < self.key_at(parent) {
                self.swap_entries(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.key_at(left) < self.key_at(smallest) {
                smallest = left;
            }
            if right < len && self.key_at(right) < self.key_at(smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.swap_entries(index, smallest);
            index = smallest;
        }
    }

    fn swap_entries(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.position[self.heap[i]] = Some(i);
        self.position[self.heap[j]] = Some(j);
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn test_insert_and_extract() {
        let mut heap = IndexedMinHeap::with_slots(5);
        heap.insert(0, 10.0);
        heap.insert(1, 3.0);
        heap.insert(2, 7.0);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.extract_min(), Ok(2));
        assert_eq!(heap.extract_min(), Ok(0));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_underflow() {
        let mut heap = IndexedMinHeap::with_slots(2);
        assert_eq!(heap.extract_min(), Err(GraphError::QueueUnderflow));
        heap.insert(1, 0.0);
        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.extract_min(), Err(GraphError::QueueUnderflow));
    }

    #[test]
    fn test_decrease_key_reorders() {
        let mut heap = IndexedMinHeap::with_slots(4);
        heap.insert(0, 5.0);
        heap.insert(1, 6.0);
        heap.insert(2, 7.0);
        heap.decrease_key(2, 1.0);
        assert_eq!(heap.key(2), 1.0);
        assert_eq!(heap.extract_min(), Ok(2));
    }

    #[test]
    fn test_decrease_key_inserts_absent_vertex() {
        let mut heap = IndexedMinHeap::with_slots(4);
        heap.decrease_key(3, 2.0);
        assert!(heap.contains(3));
        assert_eq!(heap.extract_min(), Ok(3));
        assert!(!heap.contains(3));
        assert_eq!(heap.key(3), 2.0);
    }

    #[test]
    fn test_insert_grows_slots() {
        let mut heap = IndexedMinHeap::with_slots(1);
        heap.insert(9, 1.0);
        assert!(heap.contains(9));
        assert_eq!(heap.into_keys().len(), 10);
    }

    #[quickcheck]
    fn prop_extracts_in_key_order(keys: Vec<u16>) -> bool {
        let mut heap = IndexedMinHeap::with_slots(keys.len());
        for (v, &k) in keys.iter().enumerate() {
            heap.insert(v, k as f64);
        }
        let mut extracted = Vec::new();
        while let Ok(v) = heap.extract_min() {
            extracted.push(keys[v]);
        }
        let mut sorted = keys.clone();
        sorted.sort();
        extracted == sorted
    }

    #[quickcheck]
    fn prop_decrease_key_keeps_order(keys: Vec<(u16, u16)>) -> bool {
        let mut heap = IndexedMinHeap::with_slots(keys.len());
        for (v, &(k, _)) in keys.iter().enumerate() {
            heap.insert(v, k as f64);
        }
        let mut expected = Vec::new();
        for (v, &(k, d)) in keys.iter().enumerate() {
            let lowered = k.saturating_sub(d);
            heap.decrease_key(v, lowered as f64);
            expected.push(lowered);
        }
        let mut extracted = Vec::new();
        while let Ok(v) = heap.extract_min() {
            extracted.push(expected[v]);
        }
        expected.sort();
        extracted == expected
    }
}
