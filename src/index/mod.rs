//! Vantage-point tree over fingerprints.
//!
//! The tree is built once from a fixed set of fingerprints and is read-only
//! afterwards. Every input fingerprint becomes the pivot of exactly one
//! node. Queries are exact: branch-and-bound pruning relies on the distance
//! being a metric, so no true neighbor is ever skipped.
//!
//! Pivots are picked at random rather than by spread, which keeps rebuilds
//! cheap. The index is meant to be rebuilt from scratch when the set
//! changes, not updated in place.

use rand::Rng;
use tracing::instrument;

use crate::hash::Fingerprint;

mod queue;


pub use queue::Neighbor;
use queue::{BoundedQueue, RadiusQueue, SearchQueue};

#[derive(Debug, Clone)]
struct Node {
    pivot: Fingerprint,
    /// Distance from the pivot to the median point. `near` holds points at
    /// most this far away, `far` points at least this far away.
    radius: u32,
    near: Option<Box<Node>>,
    far: Option<Box<Node>>,
}

impl Node {
    fn leaf(pivot: Fingerprint) -> Self {
        Self {
            pivot,
            radius: 0,
            near: None,
            far: None,
        }
    }

    fn build<R: Rng + ?Sized>(points: &mut [Fingerprint], rng: &mut R) -> Option<Box<Node>> {
        match points.len() {
            0 => return None,
            1 => return Some(Box::new(Node::leaf(points[0]))),
            _ => {}
        }

        let vantage = points[rng.random_range(0..points.len())];
        points.sort_by_cached_key(|p| vantage.distance(p));

        // Position 0 is at distance 0 from the vantage point: either the
        // vantage itself or a fingerprint with the same hashes.
        let half = points.len() / 2;
        let pivot = points[0];
        let radius = pivot.distance(&points[half]);

        let (head, tail) = points.split_at_mut(half);
        Some(Box::new(Node {
            pivot,
            radius,
            near: Node::build(&mut head[1..], rng),
            far: Node::build(tail, rng),
        }))
    }

    fn search<Q: SearchQueue>(&self, query: &Fingerprint, queue: &mut Q) {
        let dist = query.distance(&self.pivot);
        if dist <= queue.worst() {
            queue.offer(self.pivot, dist);
        }

        if dist < self.radius {
            search(self.near.as_deref(), query, queue);
            if dist.saturating_add(queue.worst()) >= self.radius {
                search(self.far.as_deref(), query, queue);
            }
        } else {
            search(self.far.as_deref(), query, queue);
            if dist.saturating_sub(queue.worst()) <= self.radius {
                search(self.near.as_deref(), query, queue);
            }
        }
    }

    fn depth(&self) -> usize {
        let near = self.near.as_ref().map_or(0, |n| n.depth());
        let far = self.far.as_ref().map_or(0, |n| n.depth());
        1 + near.max(far)
    }
}

fn search<Q: SearchQueue>(node: Option<&Node>, query: &Fingerprint, queue: &mut Q) {
    if let Some(node) = node {
        node.search(query, queue);
    }
}

#[derive(Debug, Clone, Default)]
pub struct VpTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl VpTree {
    /// Builds a tree using the thread-local random source for pivots.
    pub fn new(points: Vec<Fingerprint>) -> Self {
        Self::build(points, &mut rand::rng())
    }

    /// Builds a tree, drawing pivots from `rng`. The same seed and input
    /// reproduce the same tree.
    #[instrument(skip_all, fields(points = points.len()))]
    pub fn build<R: Rng + ?Sized>(points: Vec<Fingerprint>, rng: &mut R) -> Self {
        let mut points = points;
        let len = points.len();
        let root = Node::build(&mut points, rng);
        let tree = Self { root, len };
        log::debug!("Built tree with {} nodes, depth {}", tree.len, tree.depth());
        tree
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |n| n.depth())
    }

    /// Pre-order walk over every indexed fingerprint.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// The `n` closest fingerprints, nearest first. Entries at equal
    /// distance come back in no particular order.
    pub fn nearest_n(&self, query: &Fingerprint, n: usize) -> Vec<Neighbor> {
        if n == 0 {
            return Vec::new();
        }
        let mut queue = BoundedQueue::new(n);
        search(self.root.as_deref(), query, &mut queue);
        queue.into_sorted()
    }

    /// Every fingerprint within `max_distance` of the query, unordered.
    pub fn nearest_within(&self, query: &Fingerprint, max_distance: u32) -> Vec<Neighbor> {
        let mut queue = RadiusQueue::new(max_distance);
        search(self.root.as_deref(), query, &mut queue);
        queue.into_hits()
    }

    /// The closest fingerprint, or `None` for an empty tree.
    pub fn nearest(&self, query: &Fingerprint) -> Option<Neighbor> {
        self.nearest_n(query, 1).into_iter().next()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Fingerprint;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(far) = node.far.as_deref() {
            self.stack.push(far);
        }
        if let Some(near) = node.near.as_deref() {
            self.stack.push(near);
        }
        Some(&node.pivot)
    }
}

/// Orders results by distance, breaking ties by how close each ordinal is
/// to `reference`. This is a presentation concern layered over the
/// unordered ties returned by the tree.
pub fn order_ties_by_ordinal(neighbors: &mut [Neighbor], reference: u32) {
    neighbors.sort_by_key(|n| (n.distance, n.fingerprint.ordinal.abs_diff(reference)));
}
