//! Dynamic spatial index for broad-phase queries.
//!
//! Nodes live in a slab arena. Mutations only mark internal nodes dirty; partitioning
//! and collapsing happen in [`QuadTree::update`], once per tick.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use log::debug;
use serde::{Deserialize, Serialize};
use slab::Slab;

use crate::error::{PhysicsError, Result};
use crate::shapes::{BoundingBox, Shape};

use super::detection::has_overlap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    /// A leaf holding more items than this partitions on the next update.
    pub max_items_in_leaf: usize,
    /// Leaves never get smaller than this.
    pub min_leaf_dimensions: Dimensions,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        QuadTreeConfig { max_items_in_leaf: 2, min_leaf_dimensions: Dimensions { width: 40.0, height: 40.0 } }
    }
}

impl QuadTreeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_items_in_leaf == 0 {
            return Err(PhysicsError::InvalidQuadTreeConfig("max_items_in_leaf must be at least 1"));
        }
        let Dimensions { width, height } = self.min_leaf_dimensions;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(PhysicsError::InvalidQuadTreeConfig("min_leaf_dimensions must be positive and finite"));
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Node<K> {
    Leaf { bounds: BoundingBox, items: Vec<K> },
    Internal { bounds: BoundingBox, children: [usize; 4], needs_update: bool },
}

impl<K> Node<K> {
    fn bounds(&self) -> &BoundingBox {
        match self {
            Node::Leaf { bounds, .. } | Node::Internal { bounds, .. } => bounds,
        }
    }
}

/// Quadtree keyed by `K`, storing a shape snapshot per item.
///
/// An item is held by every leaf it overlaps, so items straddling a quadrant boundary
/// appear in several leaves; queries de-duplicate. Items entirely outside the root
/// bounds are kept in a side list and still show up in queries.
#[derive(Debug)]
pub struct QuadTree<K> {
    nodes: Slab<Node<K>>,
    root: usize,
    config: QuadTreeConfig,
    shapes: HashMap<K, Shape>,
    outside: Vec<K>,
}

impl<K: Copy + Eq + Hash> QuadTree<K> {
    /// The root is always an internal node with four quadrant leaves.
    pub fn new(bounds: BoundingBox, config: QuadTreeConfig) -> Result<Self> {
        config.validate()?;
        let mut nodes = Slab::new();
        let root = insert_root(&mut nodes, bounds);
        Ok(QuadTree { nodes, root, config, shapes: HashMap::new(), outside: Vec::new() })
    }

    /// Drops every item and any partitioning below the root.
    pub fn clear(&mut self) {
        let bounds = *self.nodes[self.root].bounds();
        self.nodes.clear();
        self.root = insert_root(&mut self.nodes, bounds);
        self.shapes.clear();
        self.outside.clear();
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shapes.contains_key(key)
    }

    /// Inserts `key` or, if it is already present, moves it to `shape`.
    pub fn insert(&mut self, key: K, shape: Shape) {
        if self.shapes.contains_key(&key) {
            self.remove(&key);
        }
        self.shapes.insert(key, shape);
        if has_overlap(&Shape::Box(*self.nodes[self.root].bounds()), &shape, true) {
            self.add(self.root, key, &shape);
        } else {
            self.outside.push(key);
        }
    }

    /// Returns false if `key` was not indexed.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(shape) = self.shapes.remove(key) else {
            return false;
        };
        self.outside.retain(|k| k != key);
        self.remove_from(self.root, key, &shape);
        true
    }

    /// Re-indexes an item whose position or shape changed.
    pub fn reindex(&mut self, key: K, shape: Shape) {
        self.remove(&key);
        self.insert(key, shape);
    }

    /// Items overlapping `shape`, each once, confirmed with an exact inclusive test.
    pub fn query(&self, shape: &Shape) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        self.collect(self.root, shape, &mut seen, &mut found);
        found.extend(self.outside.iter().copied().filter(|k| seen.insert(*k)));

        found.retain(|key| self.shapes.get(key).map_or(false, |item| has_overlap(shape, item, true)));
        found
    }

    /// Applies pending partitions and collapses.
    pub fn update(&mut self) {
        self.update_node(self.root);
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|(_, node)| matches!(node, Node::Leaf { .. })).count()
    }

    fn add(&mut self, idx: usize, key: K, shape: &Shape) {
        let children = match &mut self.nodes[idx] {
            Node::Leaf { bounds, items } => {
                if has_overlap(&Shape::Box(*bounds), shape, true) && !items.contains(&key) {
                    items.push(key);
                }
                return;
            }
            Node::Internal { bounds, children, needs_update } => {
                if !has_overlap(&Shape::Box(*bounds), shape, true) {
                    return;
                }
                *needs_update = true;
                *children
            }
        };
        for child in children {
            self.add(child, key, shape);
        }
    }

    fn remove_from(&mut self, idx: usize, key: &K, shape: &Shape) {
        let children = match &mut self.nodes[idx] {
            Node::Leaf { items, .. } => {
                items.retain(|k| k != key);
                return;
            }
            Node::Internal { bounds, children, needs_update } => {
                if !has_overlap(&Shape::Box(*bounds), shape, true) {
                    return;
                }
                *needs_update = true;
                *children
            }
        };
        for child in children {
            self.remove_from(child, key, shape);
        }
    }

    fn collect(&self, idx: usize, shape: &Shape, seen: &mut HashSet<K>, found: &mut Vec<K>) {
        let node = &self.nodes[idx];
        if !has_overlap(&Shape::Box(*node.bounds()), shape, true) {
            return;
        }
        match node {
            Node::Leaf { items, .. } => found.extend(items.iter().copied().filter(|k| seen.insert(*k))),
            Node::Internal { children, .. } => {
                for &child in children {
                    self.collect(child, shape, seen, found);
                }
            }
        }
    }

    /// Unique items under `idx`, in first-seen order.
    fn items_under(&self, idx: usize) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut stack = vec![idx];
        while let Some(idx) = stack.pop() {
            match &self.nodes[idx] {
                Node::Leaf { items: leaf_items, .. } => {
                    items.extend(leaf_items.iter().copied().filter(|k| seen.insert(*k)));
                }
                Node::Internal { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        items
    }

    fn update_node(&mut self, idx: usize) {
        let children = match &mut self.nodes[idx] {
            Node::Internal { children, needs_update, .. } if *needs_update => {
                *needs_update = false;
                *children
            }
            _ => return,
        };

        for child in children {
            if matches!(self.nodes[child], Node::Leaf { .. }) {
                if self.should_partition(child) {
                    self.partition(child);
                }
            } else {
                self.update_node(child);
                if self.items_under(child).len() <= self.config.max_items_in_leaf {
                    self.collapse(child);
                }
            }
        }
    }

    fn should_partition(&self, idx: usize) -> bool {
        let Node::Leaf { bounds, items } = &self.nodes[idx] else {
            return false;
        };
        let min = self.config.min_leaf_dimensions;
        items.len() > self.config.max_items_in_leaf
            && bounds.x1 - bounds.x0 >= min.width * 2.0
            && bounds.y1 - bounds.y0 >= min.height * 2.0
    }

    /// Turns the leaf at `idx` into an internal node in place and settles the new subtree.
    fn partition(&mut self, idx: usize) {
        let (bounds, items) = match &mut self.nodes[idx] {
            Node::Leaf { bounds, items } => (*bounds, std::mem::take(items)),
            Node::Internal { .. } => return,
        };
        debug!("partitioning quadtree leaf {bounds:?} holding {} items", items.len());

        let nodes = &mut self.nodes;
        let children = bounds.quadrants().map(|quadrant| nodes.insert(Node::Leaf { bounds: quadrant, items: Vec::new() }));
        self.nodes[idx] = Node::Internal { bounds, children, needs_update: true };

        for key in items {
            if let Some(shape) = self.shapes.get(&key).copied() {
                self.add(idx, key, &shape);
            }
        }
        self.update_node(idx);
    }

    /// Turns the internal node at `idx` back into a leaf in place, freeing its subtree.
    fn collapse(&mut self, idx: usize) {
        let items = self.items_under(idx);
        let (bounds, children) = match &self.nodes[idx] {
            Node::Internal { bounds, children, .. } => (*bounds, *children),
            Node::Leaf { .. } => return,
        };
        debug!("collapsing quadtree node {bounds:?} down to {} items", items.len());

        let mut stack = children.to_vec();
        while let Some(child) = stack.pop() {
            if let Node::Internal { children, .. } = self.nodes.remove(child) {
                stack.extend(children);
            }
        }
        self.nodes[idx] = Node::Leaf { bounds, items };
    }
}

fn insert_root<K>(nodes: &mut Slab<Node<K>>, bounds: BoundingBox) -> usize {
    let children = bounds.quadrants().map(|quadrant| nodes.insert(Node::Leaf { bounds: quadrant, items: Vec::new() }));
    nodes.insert(Node::Internal { bounds, children, needs_update: false })
}
