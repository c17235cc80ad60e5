//! Stage 10: face flagging. Breadth-first over each component's dual edges,
//! starting from its outer face, accumulating a per-input winding count and
//! converting it to a two-bit flag via the active fill rule.

use crate::arrangement::FaceId;
use crate::arrangement::dual::DualGraph;
use crate::arrangement::nesting::NestingTree;
use crate::fill_rule::FillRule;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Flags every face reachable from `roots`, given the fill rules for inputs
/// A and B. Mutates `dual.faces[*].flag` in place.
pub fn flag_faces(dual: &mut DualGraph, roots: &[NestingTree], fill_a: FillRule, fill_b: FillRule) {
	for root in roots {
		flag_component(dual, root, fill_a, fill_b, 0, 0);
	}
}

fn flag_component(dual: &mut DualGraph, node: &NestingTree, fill_a: FillRule, fill_b: FillRule, entry_a: i32, entry_b: i32) {
	let outer_face = dual.components[node.component].outer_face;

	let mut visited: FxHashSet<FaceId> = FxHashSet::default();
	let mut queue: VecDeque<(FaceId, i32, i32)> = VecDeque::new();
	visited.insert(outer_face);
	queue.push_back((outer_face, entry_a, entry_b));

	while let Some((face, a_count, b_count)) = queue.pop_front() {
		let flag_a = fill_a.is_inside(a_count) as u8;
		let flag_b = fill_b.is_inside(b_count) as u8;
		dual.faces[face].flag = flag_a | (flag_b << 1);

		if let Some(children) = node.children.get(&face) {
			for child in children {
				flag_component(dual, child, fill_a, fill_b, a_count, b_count);
			}
		}

		let incident: Vec<_> = dual.faces[face].incident_edges.clone();
		for edge_id in incident {
			let edge = &dual.edges[edge_id];
			let twin = edge.twin;
			let neighbor_face = dual.edges[twin].incident_face;
			if !visited.insert(neighbor_face) {
				continue;
			}
			let delta = if edge.direction_flag { -1 } else { 1 };
			let next_a = if edge.parent.has_a() { a_count + delta } else { a_count };
			let next_b = if edge.parent.has_b() { b_count + delta } else { b_count };
			queue.push_back((neighbor_face, next_a, next_b));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arrangement::angle::compute_angular_order;
	use crate::arrangement::dual::build_dual_graph;
	use crate::arrangement::major::build_major_graph;
	use crate::arrangement::minor::build_minor_graph;
	use crate::arrangement::nesting::build_nesting_forest;
	use crate::arrangement::prune::prune_dangling_edges;
	use crate::epsilons::Epsilons;
	use crate::parent::Parent;
	use crate::segment::{Segment, Vector};

	fn square(x: f64, y: f64, s: f64, parent: Parent) -> Vec<(Segment, Parent)> {
		vec![
			(Segment::Line(Vector::new(x, y), Vector::new(x + s, y)), parent),
			(Segment::Line(Vector::new(x + s, y), Vector::new(x + s, y + s)), parent),
			(Segment::Line(Vector::new(x + s, y + s), Vector::new(x, y + s)), parent),
			(Segment::Line(Vector::new(x, y + s), Vector::new(x, y)), parent),
		]
	}

	fn flagged(segments: Vec<(Segment, Parent)>, fill_a: FillRule, fill_b: FillRule) -> DualGraph {
		let eps = Epsilons::DEFAULT;
		let bbox = crate::aabb::Aabb::from_points(segments.iter().flat_map(|(s, _)| [s.start(), s.end()]));
		let major = build_major_graph(segments, Some(bbox), &eps);
		let minor = prune_dangling_edges(build_minor_graph(&major));
		let angular = compute_angular_order(&minor, &eps);
		let mut dual = build_dual_graph(&minor, &angular);
		let forest = build_nesting_forest(&dual, &eps);
		flag_faces(&mut dual, &forest, fill_a, fill_b);
		dual
	}

	#[test]
	fn single_square_inner_face_flagged_inside_a_only() {
		let dual = flagged(square(0.0, 0.0, 10.0, Parent::A), FillRule::NonZero, FillRule::NonZero);
		let component = &dual.components[0];
		assert_eq!(dual.faces[component.outer_face].flag, 0);
		for &face in &component.faces {
			if face != component.outer_face {
				assert_eq!(dual.faces[face].flag, 1);
			}
		}
	}

	#[test]
	fn overlapping_squares_middle_face_is_flag_three() {
		let mut segments = square(0.0, 0.0, 10.0, Parent::A);
		segments.extend(square(5.0, 5.0, 10.0, Parent::B));
		let dual = flagged(segments, FillRule::NonZero, FillRule::NonZero);
		let any_face_is_both = dual.faces.iter().any(|(_, f)| f.flag == 3);
		assert!(any_face_is_both);
	}
}
