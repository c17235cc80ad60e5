//! A depth-limited, fixed-capacity quadtree over axis-aligned bounding
//! boxes, used for near-linear candidate pruning ahead of exact geometric
//! tests (vertex snapping, pairwise intersection candidates).
//!
//! On overflow a node subdivides (if its depth budget allows) and
//! *duplicates* every subsequent insertion into each child quadrant whose
//! bounds overlap the inserted box — an item can end up stored multiple
//! times, so queries deduplicate via a [`FxHashSet`].

use crate::aabb::Aabb;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Depth budget shared by the edge-preparation quadtree and the
/// vertex-snapping quadtree.
pub const DEPTH_BUDGET: usize = 8;

/// Capacity used while building the major graph's vertex/edge index.
pub const GENERAL_CAPACITY: usize = 16;

/// Capacity used while hunting for pairwise segment intersections, where
/// candidate pairs are more numerous and smaller nodes pay off.
pub const INTERSECTION_CAPACITY: usize = 8;

struct Node<T> {
	bounds: Aabb,
	depth: usize,
	capacity: usize,
	items: Vec<(Aabb, T)>,
	children: Option<Box<[Node<T>; 4]>>,
}

pub struct QuadTree<T> {
	root: Node<T>,
}

impl<T: Copy + Eq + Hash> QuadTree<T> {
	pub fn new(bounds: Aabb, capacity: usize) -> Self {
		QuadTree { root: Node::new(bounds, 0, capacity) }
	}

	pub fn insert(&mut self, bbox: Aabb, value: T) {
		self.root.insert(bbox, value);
	}

	/// All values whose stored bounding box overlaps `query`, deduplicated.
	pub fn query(&self, query: &Aabb) -> Vec<T> {
		let mut seen = FxHashSet::default();
		let mut out = Vec::new();
		self.root.query(query, &mut seen, &mut out);
		out
	}

	/// All values whose stored bounding box is crossed by the line segment
	/// `p0`-`p1` (Cohen-Sutherland per stored box), deduplicated.
	pub fn find_on_line(&self, p0: crate::segment::Vector, p1: crate::segment::Vector) -> Vec<T> {
		let mut seen = FxHashSet::default();
		let mut out = Vec::new();
		self.root.find_on_line(p0, p1, &mut seen, &mut out);
		out
	}
}

impl<T: Copy + Eq + Hash> Node<T> {
	fn new(bounds: Aabb, depth: usize, capacity: usize) -> Self {
		Node { bounds, depth, capacity, items: Vec::new(), children: None }
	}

	fn subdivide(&mut self) {
		let cx = (self.bounds.left + self.bounds.right) * 0.5;
		let cy = (self.bounds.top + self.bounds.bottom) * 0.5;
		let b = &self.bounds;
		let quadrants = [
			Aabb { left: b.left, right: cx, top: b.top, bottom: cy },
			Aabb { left: cx, right: b.right, top: b.top, bottom: cy },
			Aabb { left: b.left, right: cx, top: cy, bottom: b.bottom },
			Aabb { left: cx, right: b.right, top: cy, bottom: b.bottom },
		];
		let children = quadrants.map(|q| Node::new(q, self.depth + 1, self.capacity));
		self.children = Some(Box::new(children));
		let items = std::mem::take(&mut self.items);
		for (bbox, value) in items {
			self.distribute(bbox, value);
		}
	}

	fn distribute(&mut self, bbox: Aabb, value: T) {
		if let Some(children) = &mut self.children {
			for child in children.iter_mut() {
				if child.bounds.overlaps(&bbox) {
					child.insert(bbox, value);
				}
			}
		}
	}

	fn insert(&mut self, bbox: Aabb, value: T) {
		if self.children.is_some() {
			self.distribute(bbox, value);
			return;
		}
		self.items.push((bbox, value));
		if self.items.len() > self.capacity && self.depth < DEPTH_BUDGET {
			self.subdivide();
		}
	}

	fn query(&self, query: &Aabb, seen: &mut FxHashSet<T>, out: &mut Vec<T>) {
		if !self.bounds.overlaps(query) {
			return;
		}
		for (bbox, value) in &self.items {
			if bbox.overlaps(query) && seen.insert(*value) {
				out.push(*value);
			}
		}
		if let Some(children) = &self.children {
			for child in children.iter() {
				child.query(query, seen, out);
			}
		}
	}

	fn find_on_line(&self, p0: crate::segment::Vector, p1: crate::segment::Vector, seen: &mut FxHashSet<T>, out: &mut Vec<T>) {
		if !self.bounds.intersects_line(p0, p1) {
			return;
		}
		for (bbox, value) in &self.items {
			if bbox.intersects_line(p0, p1) && seen.insert(*value) {
				out.push(*value);
			}
		}
		if let Some(children) = &self.children {
			for child in children.iter() {
				child.find_on_line(p0, p1, seen, out);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::segment::Vector;

	#[test]
	fn overflowing_capacity_subdivides_and_still_finds_everything() {
		let bounds = Aabb { top: 0.0, left: 0.0, right: 100.0, bottom: 100.0 };
		let mut tree: QuadTree<usize> = QuadTree::new(bounds, 4);
		for i in 0..50usize {
			let x = (i as f64 * 1.9) % 100.0;
			let y = (i as f64 * 3.7) % 100.0;
			tree.insert(Aabb { top: y, bottom: y + 1.0, left: x, right: x + 1.0 }, i);
		}
		let found = tree.query(&bounds);
		assert_eq!(found.len(), 50);
	}

	#[test]
	fn query_deduplicates_across_quadrant_boundary() {
		let bounds = Aabb { top: 0.0, left: 0.0, right: 100.0, bottom: 100.0 };
		let mut tree: QuadTree<usize> = QuadTree::new(bounds, 1);
		// Force a subdivision, then insert a box straddling all four quadrants.
		tree.insert(Aabb { top: 0.0, bottom: 1.0, left: 0.0, right: 1.0 }, 0);
		tree.insert(Aabb { top: 0.0, bottom: 1.0, left: 2.0, right: 3.0 }, 1);
		tree.insert(Aabb { top: 40.0, bottom: 60.0, left: 40.0, right: 60.0 }, 2);
		let found = tree.query(&bounds);
		assert_eq!(found.iter().filter(|&&v| v == 2).count(), 1);
	}

	#[test]
	fn find_on_line_matches_crossing_boxes() {
		let bounds = Aabb { top: 0.0, left: 0.0, right: 100.0, bottom: 100.0 };
		let mut tree: QuadTree<usize> = QuadTree::new(bounds, 4);
		tree.insert(Aabb { top: 40.0, bottom: 60.0, left: 40.0, right: 60.0 }, 0);
		let found = tree.find_on_line(Vector::new(-10.0, 50.0), Vector::new(110.0, 50.0));
		assert_eq!(found, vec![0]);
	}
}
