//! Binary min-heap with a caller-supplied ordering.
//!
//! Tree construction needs a priority queue over owned tree nodes whose
//! ordering is not a property of the node type itself, so instead of
//! requiring `Ord` the queue takes a comparator closure at construction.
//!
//! # Layout
//!
//! Elements live in a flat array in heap order: the children of slot `i` are
//! `2i + 1` and `2i + 2`, its parent is `(i - 1) / 2`. The minimum is always
//! at slot 0.
//!
//! # Example
//! ```
//! use huffarc_core::heap::PriorityQueue;
//!
//! let mut queue = PriorityQueue::new(|a: &u32, b: &u32| a.cmp(b));
//! queue.insert(7);
//! queue.insert(3);
//! queue.insert(5);
//! assert_eq!(queue.extract_min().unwrap(), 3);
//! assert_eq!(queue.peek_min(), Some(&5));
//! ```

use std::cmp::Ordering;

use crate::error::HeapError;

/// Initial slot capacity; the array doubles whenever it fills up.
pub const DEFAULT_CAPACITY: usize = 200;

/// Min-heap over `T` ordered by `compare`.
///
/// # Invariants
/// - For every slot `i > 0`, `compare(values[parent(i)], values[i])` is not
///   `Greater`
/// - Ties are not stable: equal elements come out in whatever order the heap
///   structure yields
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    values: Vec<T>,
    compare: F,
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Create an empty queue with [`DEFAULT_CAPACITY`] slots.
    pub fn new(compare: F) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, compare)
    }

    /// Create an empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, compare: F) -> Self {
        Self {
            values: Vec::with_capacity(capacity.max(1)),
            compare,
        }
    }

    /// Add an element, restoring heap order by sifting it up.
    pub fn insert(&mut self, item: T) {
        if self.values.len() == self.values.capacity() {
            self.values.reserve_exact(self.values.capacity().max(1));
        }
        self.values.push(item);
        self.sift_up(self.values.len() - 1);
    }

    /// Remove and return the minimum element.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyQueue` if the queue has no elements.
    pub fn extract_min(&mut self) -> Result<T, HeapError> {
        if self.values.is_empty() {
            return Err(HeapError::EmptyQueue);
        }

        // Move the last element into the root slot, then sift it down
        let min = self.values.swap_remove(0);
        if !self.values.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Borrow the minimum element without removing it.
    pub fn peek_min(&self) -> Option<&T> {
        self.values.first()
    }

    /// Number of elements in the queue.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True while at least two elements remain (i.e. a merge is possible).
    pub fn has_more_than_one(&self) -> bool {
        self.values.len() > 1
    }

    /// Current slot capacity.
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.values[a], &self.values[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.values.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.values.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;

            let mut min = pos;
            if left < len && self.less(left, min) {
                min = left;
            }
            if right < len && self.less(right, min) {
                min = right;
            }
            if min == pos {
                break;
            }
            self.values.swap(pos, min);
            pos = min;
        }
    }
}

impl<T, F> std::fmt::Debug for PriorityQueue<T, F>
where
    T: std::fmt::Debug,
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn ascending() -> PriorityQueue<u32, fn(&u32, &u32) -> Ordering> {
        let compare: fn(&u32, &u32) -> Ordering = |a, b| a.cmp(b);
        PriorityQueue::new(compare)
    }

    #[test]
    fn test_extract_in_order() {
        let mut queue = ascending();
        for v in [5, 1, 4, 2, 3] {
            queue.insert(v);
        }

        let mut out = Vec::new();
        while !queue.is_empty() {
            out.push(queue.extract_min().unwrap());
        }
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_extract_fails() {
        let mut queue = ascending();
        assert_eq!(queue.extract_min(), Err(HeapError::EmptyQueue));
        assert_eq!(queue.peek_min(), None);

        queue.insert(1);
        queue.extract_min().unwrap();
        assert_eq!(queue.extract_min(), Err(HeapError::EmptyQueue));
    }

    #[test]
    fn test_has_more_than_one() {
        let mut queue = ascending();
        assert!(!queue.has_more_than_one());
        queue.insert(10);
        assert!(!queue.has_more_than_one());
        queue.insert(20);
        assert!(queue.has_more_than_one());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut queue = PriorityQueue::with_capacity(2, |a: &u32, b: &u32| a.cmp(b));
        assert!(queue.capacity() >= 2);

        for v in 0..3 {
            queue.insert(v);
        }
        assert!(queue.capacity() >= 4);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_custom_comparator_max_first() {
        let mut queue = PriorityQueue::new(|a: &i64, b: &i64| b.cmp(a));
        for v in [-3, 9, 0, 4] {
            queue.insert(v);
        }
        assert_eq!(queue.extract_min().unwrap(), 9);
        assert_eq!(queue.peek_min(), Some(&4));
    }

    #[test]
    fn test_random_sequence_non_decreasing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..20 {
            let mut queue = ascending();
            let mut reference: Vec<u32> = Vec::new();

            for _ in 0..500 {
                if rng.gen_bool(0.6) || queue.is_empty() {
                    let v = rng.gen_range(0..1000);
                    queue.insert(v);
                    reference.push(v);
                } else {
                    let min = queue.extract_min().unwrap();
                    let expected = *reference.iter().min().unwrap();
                    assert_eq!(min, expected);
                    let pos = reference.iter().position(|&v| v == min).unwrap();
                    reference.swap_remove(pos);
                }
            }

            // Draining the rest must be non-decreasing
            let mut prev = 0;
            while let Ok(v) = queue.extract_min() {
                assert!(v >= prev);
                prev = v;
            }
        }
    }
}
