//! Stage 5: the minor graph. Contracts chains of degree-2 vertices in the
//! major graph into single minor edges carrying a `SmallVec` of the segments
//! they pass through, and separately collects pure cycles — connected
//! components where every vertex has degree 2, so no branch vertex exists to
//! anchor a chain walk.

use crate::arrangement::VertexId;
use crate::arrangement::major::{MajorEdgeId, MajorGraph};
use crate::parent::Parent;
use crate::segment::Segment;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

slotmap::new_key_type! {
	pub struct MinorEdgeId;
}

pub struct MinorEdge {
	pub segments: SmallVec<[Segment; 4]>,
	pub parent: Parent,
	pub start: VertexId,
	pub end: VertexId,
	pub direction_flag: bool,
	pub twin: MinorEdgeId,
}

pub struct MinorCycle {
	pub segments: SmallVec<[Segment; 4]>,
	pub parent: Parent,
	pub direction_flag: bool,
}

pub struct MinorGraph {
	pub edges: SlotMap<MinorEdgeId, MinorEdge>,
	/// Outgoing minor edges per branch vertex (vertices of major-graph degree
	/// != 2); absent keys have no outgoing minor edges.
	pub outgoing: FxHashMap<VertexId, Vec<MinorEdgeId>>,
	pub cycles: Vec<MinorCycle>,
	/// `cycle_twin[i]` is the index into `cycles` of the reverse-direction
	/// loop around the same connected component as `cycles[i]`.
	pub cycle_twin: Vec<usize>,
}

struct ChainWalk {
	segments: SmallVec<[Segment; 4]>,
	parent: Parent,
	direction_flag: bool,
	start: VertexId,
	end: VertexId,
	last_major_edge: MajorEdgeId,
}

/// Walks from `start_edge` (whose start vertex is a branch vertex) through
/// degree-2 vertices, stopping as soon as either the next vertex isn't
/// degree-2 or the continuing edge's parent/direction doesn't match the
/// chain's so far.
fn walk_chain(major: &MajorGraph, start_edge: MajorEdgeId) -> ChainWalk {
	let first = &major.edges[start_edge];
	let parent = first.parent;
	let direction_flag = first.direction_flag;
	let start = first.start;

	let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
	segments.push(first.segment);
	let mut current_edge = start_edge;

	loop {
		let end_vertex = major.edges[current_edge].end;
		if major.degree(end_vertex) != 2 {
			return ChainWalk { segments, parent, direction_flag, start, end: end_vertex, last_major_edge: current_edge };
		}
		let twin = major.edges[current_edge].twin;
		let next = match major.vertices[end_vertex].outgoing.iter().copied().find(|&e| e != twin) {
			Some(e) => e,
			None => return ChainWalk { segments, parent, direction_flag, start, end: end_vertex, last_major_edge: current_edge },
		};
		let next_edge = &major.edges[next];
		if next_edge.parent != parent || next_edge.direction_flag != direction_flag {
			return ChainWalk { segments, parent, direction_flag, start, end: end_vertex, last_major_edge: current_edge };
		}
		segments.push(next_edge.segment);
		current_edge = next;
	}
}

/// Walks one directed loop around a fully degree-2 connected component,
/// starting from `start_edge`, marking every major edge it consumes as
/// visited (and recording `index` as the cycle each belongs to, in
/// `edge_to_cycle`, so the reverse loop around the same component can later
/// be found by looking up any one of its edges — not just its first). A
/// connected pure-cycle component yields exactly two such loops (one per
/// direction), since the two directions' edges are disjoint.
fn walk_cycle(major: &MajorGraph, start_edge: MajorEdgeId, index: usize, visited: &mut FxHashSet<MajorEdgeId>, edge_to_cycle: &mut FxHashMap<MajorEdgeId, usize>) -> MinorCycle {
	let start_vertex = major.edges[start_edge].start;
	let parent = major.edges[start_edge].parent;
	let direction_flag = major.edges[start_edge].direction_flag;

	let mut segments: SmallVec<[Segment; 4]> = SmallVec::new();
	let mut current_edge = start_edge;
	loop {
		segments.push(major.edges[current_edge].segment);
		visited.insert(current_edge);
		edge_to_cycle.insert(current_edge, index);
		let end_vertex = major.edges[current_edge].end;
		if end_vertex == start_vertex {
			break;
		}
		let twin = major.edges[current_edge].twin;
		current_edge = major.vertices[end_vertex].outgoing.iter().copied().find(|&e| e != twin).expect("degree-2 vertex must have a non-twin continuation");
	}

	MinorCycle { segments, parent, direction_flag }
}

/// Builds the minor graph from a fully-formed major graph.
pub fn build_minor_graph(major: &MajorGraph) -> MinorGraph {
	let mut edges: SlotMap<MinorEdgeId, MinorEdge> = SlotMap::with_key();
	let mut outgoing: FxHashMap<VertexId, Vec<MinorEdgeId>> = FxHashMap::default();
	let mut by_first_major: FxHashMap<MajorEdgeId, MinorEdgeId> = FxHashMap::default();
	let mut last_major_of: FxHashMap<MinorEdgeId, MajorEdgeId> = FxHashMap::default();

	for (vid, vdata) in major.vertices.iter() {
		if vdata.outgoing.len() == 2 {
			continue;
		}
		for &start_edge in &vdata.outgoing {
			let walk = walk_chain(major, start_edge);
			let id = edges.insert(MinorEdge {
				segments: walk.segments,
				parent: walk.parent,
				start: walk.start,
				end: walk.end,
				direction_flag: walk.direction_flag,
				twin: MinorEdgeId::default(),
			});
			outgoing.entry(vid).or_default().push(id);
			by_first_major.insert(start_edge, id);
			last_major_of.insert(id, walk.last_major_edge);
		}
	}

	// Link twins: the mirror of the minor edge built from `start_edge` starts
	// at the twin of this chain's last major edge (which itself starts at a
	// branch vertex, since that's exactly why the chain stopped there).
	let ids: Vec<MinorEdgeId> = edges.keys().collect();
	for id in ids {
		let last = last_major_of[&id];
		let twin_major = major.edges[last].twin;
		if let Some(&twin_minor) = by_first_major.get(&twin_major) {
			edges[id].twin = twin_minor;
		}
	}

	let mut visited_major_edges: FxHashSet<MajorEdgeId> = FxHashSet::default();
	// Maps every major edge consumed by a cycle walk to that cycle's index
	// (not just the walk's first edge), so the twin cycle (the reverse walk
	// around the same component) can be found from any edge of it — the
	// twin of a cycle's first edge is generally the *last* edge of the
	// reverse walk, not its first.
	let mut edge_to_cycle: FxHashMap<MajorEdgeId, usize> = FxHashMap::default();
	let mut first_edge_of_cycle: Vec<MajorEdgeId> = Vec::new();
	let mut cycles = Vec::new();
	for (_, vdata) in major.vertices.iter() {
		if vdata.outgoing.len() != 2 {
			continue;
		}
		for &e in &vdata.outgoing {
			if visited_major_edges.contains(&e) {
				continue;
			}
			let index = cycles.len();
			first_edge_of_cycle.push(e);
			cycles.push(walk_cycle(major, e, index, &mut visited_major_edges, &mut edge_to_cycle));
		}
	}

	let cycle_twin: Vec<usize> = first_edge_of_cycle
		.iter()
		.map(|&first_edge| {
			let twin_edge = major.edges[first_edge].twin;
			edge_to_cycle[&twin_edge]
		})
		.collect();

	MinorGraph { edges, outgoing, cycles, cycle_twin }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arrangement::prepare::TaggedSegment;
	use crate::epsilons::Epsilons;
	use crate::segment::Vector;

	fn build(segments: Vec<TaggedSegment>) -> MajorGraph {
		let eps = Epsilons::DEFAULT;
		let bbox = crate::aabb::Aabb::from_points(segments.iter().flat_map(|(s, _)| [s.start(), s.end()]));
		crate::arrangement::major::build_major_graph(segments, Some(bbox), &eps)
	}

	#[test]
	fn plain_square_has_no_branch_vertices_and_one_cycle() {
		let segments = vec![
			(Segment::Line(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)), Parent::A),
			(Segment::Line(Vector::new(10.0, 0.0), Vector::new(10.0, 10.0)), Parent::A),
			(Segment::Line(Vector::new(10.0, 10.0), Vector::new(0.0, 10.0)), Parent::A),
			(Segment::Line(Vector::new(0.0, 10.0), Vector::new(0.0, 0.0)), Parent::A),
		];
		let major = build(segments);
		let minor = build_minor_graph(&major);
		assert!(minor.edges.is_empty());
		assert_eq!(minor.cycles.len(), 2); // forward and backward traversal both form pure cycles
	}

	#[test]
	fn figure_eight_crossing_is_a_branch_vertex() {
		// Two triangles sharing a single crossing point at the origin area:
		// constructed directly in major-graph form via two squares overlapping
		// at one point would require an actual crossing; instead build a
		// three-way star so the center vertex has degree > 2 directly.
		let center = Vector::new(0.0, 0.0);
		let segments = vec![
			(Segment::Line(center, Vector::new(10.0, 0.0)), Parent::A),
			(Segment::Line(Vector::new(10.0, 0.0), center), Parent::A),
			(Segment::Line(center, Vector::new(0.0, 10.0)), Parent::A),
			(Segment::Line(Vector::new(0.0, 10.0), center), Parent::A),
			(Segment::Line(center, Vector::new(-10.0, -10.0)), Parent::A),
			(Segment::Line(Vector::new(-10.0, -10.0), center), Parent::A),
		];
		let major = build(segments);
		let minor = build_minor_graph(&major);
		let center_id = major.vertices.iter().find(|(_, v)| (v.point - center).length() < 1e-6).map(|(id, _)| id).unwrap();
		assert_eq!(minor.outgoing.get(&center_id).map(|v| v.len()).unwrap_or(0), 6);
	}
}
