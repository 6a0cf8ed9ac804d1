use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::hash::Fingerprint;

/// A search hit: an indexed fingerprint and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub fingerprint: Fingerprint,
    pub distance: u32,
}

/// Candidate store driven by the tree traversal. `worst` is the pruning
/// bound; `offer` is only called for distances within it.
pub(crate) trait SearchQueue {
    fn worst(&self) -> u32;
    fn offer(&mut self, fingerprint: Fingerprint, distance: u32);
}

/// Heap slot. `fingerprint == None` is the sentinel, which ranks above
/// every real candidate.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: u32,
    fingerprint: Option<Fingerprint>,
}

impl Candidate {
    fn key(&self) -> (bool, u32) {
        (self.fingerprint.is_none(), self.distance)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for Candidate {}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Max-heap holding at most `capacity` candidates, worst on top. Starts with
/// a single sentinel at infinite distance so there is always a bound to
/// prune against; the sentinel is the first thing evicted.
pub(crate) struct BoundedQueue {
    heap: BinaryHeap<Candidate>,
    capacity: usize,
}

impl BoundedQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut heap = BinaryHeap::with_capacity(capacity);
        heap.push(Candidate {
            distance: u32::MAX,
            fingerprint: None,
        });
        Self { heap, capacity }
    }

    /// Real candidates in ascending distance; the sentinel is dropped if it
    /// was never evicted.
    pub fn into_sorted(self) -> Vec<Neighbor> {
        let mut neighbors: Vec<Neighbor> = self
            .heap
            .into_vec()
            .into_iter()
            .filter_map(|c| {
                c.fingerprint.map(|fingerprint| Neighbor {
                    fingerprint,
                    distance: c.distance,
                })
            })
            .collect();
        neighbors.sort_unstable_by_key(|n| n.distance);
        neighbors
    }
}

impl SearchQueue for BoundedQueue {
    fn worst(&self) -> u32 {
        self.heap.peek().map_or(u32::MAX, |c| c.distance)
    }

    fn offer(&mut self, fingerprint: Fingerprint, distance: u32) {
        if self.heap.len() >= self.capacity {
            self.heap.pop();
        }
        self.heap.push(Candidate {
            distance,
            fingerprint: Some(fingerprint),
        });
    }
}

/// Unbounded collector with a fixed cutoff, for radius queries.
pub(crate) struct RadiusQueue {
    cutoff: u32,
    hits: Vec<Neighbor>,
}

impl RadiusQueue {
    pub fn new(cutoff: u32) -> Self {
        Self {
            cutoff,
            hits: Vec::new(),
        }
    }

    pub fn into_hits(self) -> Vec<Neighbor> {
        self.hits
    }
}

impl SearchQueue for RadiusQueue {
    fn worst(&self) -> u32 {
        self.cutoff
    }

    fn offer(&mut self, fingerprint: Fingerprint, distance: u32) {
        self.hits.push(Neighbor {
            fingerprint,
            distance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(ordinal: u32) -> Fingerprint {
        Fingerprint::new(ordinal as u64, 0, ordinal)
    }

    #[test]
    fn test_sentinel_bounds_empty_queue() {
        let queue = BoundedQueue::new(3);
        assert_eq!(queue.worst(), u32::MAX);
        assert!(queue.into_sorted().is_empty());
    }

    #[test]
    fn test_sentinel_evicted_first_at_capacity_one() {
        let mut queue = BoundedQueue::new(1);
        queue.offer(fp(1), 9);
        assert_eq!(queue.worst(), 9);

        queue.offer(fp(2), 4);
        assert_eq!(queue.worst(), 4);

        let sorted = queue.into_sorted();
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].fingerprint, fp(2));
    }

    #[test]
    fn test_keeps_smallest() {
        let mut queue = BoundedQueue::new(3);
        for (ordinal, distance) in [(1, 10), (2, 3), (3, 7)] {
            queue.offer(fp(ordinal), distance);
        }
        // the sentinel went out to make room for the third entry
        assert_eq!(queue.worst(), 10);

        queue.offer(fp(4), 1);
        assert_eq!(queue.worst(), 7);

        let distances: Vec<_> = queue.into_sorted().iter().map(|n| n.distance).collect();
        assert_eq!(distances, vec![1, 3, 7]);
    }

    #[test]
    fn test_zero_capacity_behaves_as_one() {
        let mut queue = BoundedQueue::new(0);
        queue.offer(fp(1), 5);
        assert_eq!(queue.into_sorted().len(), 1);
    }

    #[test]
    fn test_radius_queue() {
        let mut queue = RadiusQueue::new(6);
        assert_eq!(queue.worst(), 6);
        queue.offer(fp(1), 6);
        queue.offer(fp(2), 0);
        queue.offer(fp(3), 2);
        assert_eq!(queue.worst(), 6);
        assert_eq!(queue.into_hits().len(), 3);
    }
}
