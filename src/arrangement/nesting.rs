//! Stage 9: the nesting forest. Each connected component of the dual graph
//! becomes a tree node; a component nests inside another's non-outer face
//! when a representative point on its boundary has an odd horizontal-ray
//! crossing count against that face's boundary.

use crate::arrangement::FaceId;
use crate::arrangement::dual::DualGraph;
use crate::epsilons::Epsilons;
use crate::intersect::ray_crossing_count;
use crate::segment::Vector;
use rustc_hash::FxHashMap;

/// One node of the nesting forest: a dual-graph component, plus the child
/// trees rooted at each of its (non-outer) faces that geometrically
/// contains them.
pub struct NestingTree {
	pub component: usize,
	pub children: FxHashMap<FaceId, Vec<NestingTree>>,
}

impl NestingTree {
	fn new(component: usize) -> NestingTree {
		NestingTree { component, children: FxHashMap::default() }
	}
}

/// A point known to lie on `component`'s boundary — the start of an
/// arbitrary segment, per §4.9.
fn representative_point(dual: &DualGraph, component: usize) -> Vector {
	let outer = dual.components[component].outer_face;
	dual.face_segments(outer).next().map(|s| s.start()).expect("a face always has at least one boundary segment")
}

/// The non-outer face of `component` whose boundary encloses `point`, via
/// odd horizontal-ray crossing count, if any.
fn enclosing_face(dual: &DualGraph, component: usize, point: Vector, eps: &Epsilons) -> Option<FaceId> {
	let comp = &dual.components[component];
	for &face in &comp.faces {
		if face == comp.outer_face {
			continue;
		}
		let count: usize = dual.face_segments(face).map(|seg| ray_crossing_count(&seg, point, eps)).sum();
		if count % 2 == 1 {
			return Some(face);
		}
	}
	None
}

/// Tries to place `new_component` somewhere within `node`'s subtree. Returns
/// `true` if it was placed (inside `node`'s component or one of its
/// descendants), `false` if `new_component` doesn't nest inside `node` at
/// all.
fn try_insert(node: &mut NestingTree, dual: &DualGraph, new_component: usize, new_point: Vector, eps: &Epsilons) -> bool {
	let Some(face) = enclosing_face(dual, node.component, new_point, eps) else {
		return false;
	};
	let siblings = node.children.entry(face).or_default();
	for child in siblings.iter_mut() {
		if try_insert(child, dual, new_component, new_point, eps) {
			return true;
		}
	}
	siblings.push(NestingTree::new(new_component));
	true
}

/// Inserts `new_component` into the forest of root trees, per §4.9: if it
/// nests inside an existing root, place it (recursing as deep as it goes);
/// otherwise check whether it *encloses* any existing roots and, if so,
/// absorb them as its own children before becoming a new root itself.
fn insert_component(roots: &mut Vec<NestingTree>, dual: &DualGraph, new_component: usize, eps: &Epsilons) {
	let new_point = representative_point(dual, new_component);

	for root in roots.iter_mut() {
		if try_insert(root, dual, new_component, new_point, eps) {
			return;
		}
	}

	let mut new_node = NestingTree::new(new_component);
	let mut remaining = Vec::with_capacity(roots.len());
	for root in roots.drain(..) {
		let root_point = representative_point(dual, root.component);
		match enclosing_face(dual, new_component, root_point, eps) {
			Some(face) => new_node.children.entry(face).or_default().push(root),
			None => remaining.push(root),
		}
	}
	remaining.push(new_node);
	*roots = remaining;
}

/// Builds the nesting forest over every connected component of `dual`.
pub fn build_nesting_forest(dual: &DualGraph, eps: &Epsilons) -> Vec<NestingTree> {
	let mut roots: Vec<NestingTree> = Vec::new();
	for component in 0..dual.components.len() {
		insert_component(&mut roots, dual, component, eps);
	}
	roots
}
