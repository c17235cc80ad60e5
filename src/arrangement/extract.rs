//! Stage 11: extraction. Turns flagged faces into output paths: a single
//! boundary walk for the four set operations, or one path per selected face
//! (holes poked) for division and fracture.

use crate::arrangement::DualEdgeId;
use crate::arrangement::dual::DualGraph;
use crate::arrangement::nesting::NestingTree;
use crate::op::Op;
use crate::path::Path;
use crate::segment::Segment;
use rustc_hash::{FxHashMap, FxHashSet};

/// Runs stage 11 over a fully flagged dual graph and nesting forest.
pub fn extract(dual: &DualGraph, forest: &[NestingTree], op: Op) -> Vec<Path> {
	if op.is_single_region() { vec![walk_union(dual, op)] } else { extract_fracture(dual, forest, op) }
}

/// Union/Difference/Intersection/Exclusion: merges every selected face into
/// one region and walks its outer boundary.
///
/// A dual edge is "removed" when both faces it touches (itself and its
/// twin's face) are on the same side of selection — i.e. the edge is purely
/// interior or purely exterior to the merged region, and shouldn't appear in
/// the output. Walking the boundary of a face then means: follow the face's
/// own `nextEdge` chain, but whenever that would land on a removed edge,
/// cross into the neighboring (same-selection) face through its twin and
/// keep following *that* face's chain, until a genuinely non-removed edge is
/// reached.
fn walk_union(dual: &DualGraph, op: Op) -> Path {
	let removed: FxHashSet<_> = dual
		.edges
		.iter()
		.filter(|&(_, edge)| {
			let this_selected = op.selects(dual.faces[edge.incident_face].flag);
			let other_selected = op.selects(dual.faces[dual.edges[edge.twin].incident_face].flag);
			this_selected == other_selected
		})
		.map(|(id, _)| id)
		.collect();

	let face_next: FxHashMap<_, _> = dual
		.faces
		.iter()
		.flat_map(|(_, face)| {
			let edges = &face.incident_edges;
			edges.iter().enumerate().map(move |(i, &e)| (e, edges[(i + 1) % edges.len()]))
		})
		.collect();

	// Crossing a removed edge moves to the neighboring same-selection face
	// via its twin and continues that face's own chain, repeating until a
	// genuinely non-removed boundary edge is reached.
	let next_boundary_edge = |e: DualEdgeId| -> DualEdgeId {
		let mut cur = face_next[&e];
		while removed.contains(&cur) {
			cur = face_next[&dual.edges[cur].twin];
		}
		cur
	};

	let mut path = Path::new();
	let mut visited: FxHashSet<DualEdgeId> = FxHashSet::default();

	for (start, _) in dual.edges.iter() {
		if removed.contains(&start) || visited.contains(&start) {
			continue;
		}
		// Only walk from half-edges whose own incident face is selected —
		// otherwise every boundary gets traced twice, once from each side,
		// emitting the same loop again with reversed winding.
		if !op.selects(dual.faces[dual.edges[start].incident_face].flag) {
			continue;
		}
		let mut current = start;
		loop {
			visited.insert(current);
			path.extend(dual.edges[current].segments.iter().copied());
			current = next_boundary_edge(current);
			if current == start {
				break;
			}
		}
	}

	path
}

/// Division/Fracture: one path per selected non-outer face, with any
/// selected-or-not child components' outer faces appended as reversed
/// holes.
fn extract_fracture(dual: &DualGraph, forest: &[NestingTree], op: Op) -> Vec<Path> {
	let mut out = Vec::new();
	for tree in forest {
		collect_fracture(dual, tree, op, &mut out);
	}
	out
}

fn collect_fracture(dual: &DualGraph, node: &NestingTree, op: Op, out: &mut Vec<Path>) {
	let component = &dual.components[node.component];
	for &face in &component.faces {
		if face == component.outer_face {
			continue;
		}
		if !op.selects(dual.faces[face].flag) {
			continue;
		}
		let mut path: Path = dual.face_segments(face).collect();
		if let Some(children) = node.children.get(&face) {
			for child in children {
				let hole_face = dual.components[child.component].outer_face;
				path.extend(reverse_path(dual.face_segments(hole_face)));
			}
		}
		out.push(path);
	}

	for children in node.children.values() {
		for child in children {
			collect_fracture(dual, child, op, out);
		}
	}
}

fn reverse_path(segments: impl Iterator<Item = Segment>) -> Vec<Segment> {
	let mut collected: Vec<Segment> = segments.collect();
	collected.reverse();
	collected.into_iter().map(|s| s.reverse()).collect()
}
