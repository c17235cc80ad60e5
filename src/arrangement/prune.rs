//! Stage 6: dangling-edge pruning. A branch-vertex subtree that never
//! reconnects to a cycle contributes no enclosed area and would otherwise
//! dead-end the dual-graph walk, so it's dropped before angular ordering.
//!
//! Pruning runs independently per parent bit: for each bit, build the
//! subgraph of minor edges carrying that bit, find (via a low-link DFS) every
//! vertex that lies on some cycle in that subgraph, and retain only minor
//! edges whose endpoints are both "on a cycle" for every parent bit they
//! carry. [`MinorCycle`]s are never dangling by construction (no branch
//! vertex means no tree to dangle from), so they pass through untouched.

use crate::arrangement::VertexId;
use crate::arrangement::minor::{MinorEdgeId, MinorGraph};
use crate::parent::Parent;
use rustc_hash::{FxHashMap, FxHashSet};

fn retained_vertices_for_bit(minor: &MinorGraph, has_bit: impl Fn(Parent) -> bool) -> FxHashSet<VertexId> {
	let mut adjacency: FxHashMap<VertexId, Vec<(VertexId, MinorEdgeId)>> = FxHashMap::default();
	for (eid, edge) in minor.edges.iter() {
		if has_bit(edge.parent) {
			adjacency.entry(edge.start).or_default().push((edge.end, eid));
		}
	}

	let mut disc: FxHashMap<VertexId, u32> = FxHashMap::default();
	// Minimum discovery-order level reachable from this vertex's subtree via
	// back edges, *not* counting the vertex's own level as a floor — so this
	// stays meaningfully below `disc[v]` only when a real cycle exists.
	let mut reach: FxHashMap<VertexId, u32> = FxHashMap::default();
	let mut retained = FxHashSet::default();
	let mut counter = 0u32;

	// Explicit stack to avoid recursion depth concerns on long chains:
	// (vertex, arrived_via edge to exclude, neighbor iterator index).
	struct Frame {
		vertex: VertexId,
		arrived_via_twin: Option<MinorEdgeId>,
		next_neighbor: usize,
	}

	let vertices_with_edges: Vec<VertexId> = adjacency.keys().copied().collect();
	for root in vertices_with_edges {
		if disc.contains_key(&root) {
			continue;
		}
		disc.insert(root, counter);
		reach.insert(root, u32::MAX);
		counter += 1;
		let mut stack = vec![Frame { vertex: root, arrived_via_twin: None, next_neighbor: 0 }];

		while let Some(frame) = stack.last_mut() {
			let v = frame.vertex;
			let neighbors = adjacency.get(&v).cloned().unwrap_or_default();
			if frame.next_neighbor < neighbors.len() {
				let (u, eid) = neighbors[frame.next_neighbor];
				frame.next_neighbor += 1;
				if Some(eid) == frame.arrived_via_twin {
					continue;
				}
				if !disc.contains_key(&u) {
					disc.insert(u, counter);
					reach.insert(u, u32::MAX);
					counter += 1;
					let twin = minor.edges[eid].twin;
					stack.push(Frame { vertex: u, arrived_via_twin: Some(twin), next_neighbor: 0 });
				} else {
					let candidate = disc[&u];
					let r = reach[&v];
					reach.insert(v, r.min(candidate));
				}
			} else {
				let v_reach = reach[&v];
				if v_reach <= disc[&v] {
					retained.insert(v);
				}
				stack.pop();
				if let Some(parent_frame) = stack.last() {
					let parent_v = parent_frame.vertex;
					let r = reach[&parent_v];
					reach.insert(parent_v, r.min(v_reach));
				}
			}
		}
	}

	retained
}

/// Filters `minor` in place, dropping edges that don't lie on a cycle for
/// every parent bit they carry. Cycles pass through unchanged.
pub fn prune_dangling_edges(minor: MinorGraph) -> MinorGraph {
	let retained_a = retained_vertices_for_bit(&minor, |p| p.has_a());
	let retained_b = retained_vertices_for_bit(&minor, |p| p.has_b());

	let keep = |edge: &crate::arrangement::minor::MinorEdge| -> bool {
		let ok_a = !edge.parent.has_a() || (retained_a.contains(&edge.start) && retained_a.contains(&edge.end));
		let ok_b = !edge.parent.has_b() || (retained_b.contains(&edge.start) && retained_b.contains(&edge.end));
		ok_a && ok_b
	};

	let mut edges = minor.edges;
	let to_remove: Vec<MinorEdgeId> = edges.iter().filter(|(_, e)| !keep(e)).map(|(id, _)| id).collect();
	let removed: FxHashSet<MinorEdgeId> = to_remove.iter().copied().collect();
	for id in &to_remove {
		edges.remove(*id);
	}

	let mut outgoing = minor.outgoing;
	for edges_at_vertex in outgoing.values_mut() {
		edges_at_vertex.retain(|id| !removed.contains(id));
	}
	outgoing.retain(|_, v| !v.is_empty());

	MinorGraph { edges, outgoing, cycles: minor.cycles, cycle_twin: minor.cycle_twin }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arrangement::major::build_major_graph;
	use crate::arrangement::minor::build_minor_graph;
	use crate::epsilons::Epsilons;
	use crate::segment::{Segment, Vector};

	#[test]
	fn dangling_spur_off_a_cycle_is_pruned() {
		let eps = Epsilons::DEFAULT;
		// A square with a "whisker" line segment sticking out of one corner
		// into empty space: the whisker's far end is a degree-1 dead end.
		let segments = vec![
			(Segment::Line(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)), Parent::A),
			(Segment::Line(Vector::new(10.0, 0.0), Vector::new(10.0, 10.0)), Parent::A),
			(Segment::Line(Vector::new(10.0, 10.0), Vector::new(0.0, 10.0)), Parent::A),
			(Segment::Line(Vector::new(0.0, 10.0), Vector::new(0.0, 0.0)), Parent::A),
			(Segment::Line(Vector::new(0.0, 0.0), Vector::new(-5.0, -5.0)), Parent::A),
		];
		let bbox = crate::aabb::Aabb::from_points(segments.iter().flat_map(|(s, _)| [s.start(), s.end()]));
		let major = build_major_graph(segments, Some(bbox), &eps);
		let minor = build_minor_graph(&major);
		// The square is a pure cycle (no branch vertex among its own 4
		// corners) only once the whisker creates a degree-3 branch at the
		// origin corner, so the square's edges become minor edges too.
		assert!(!minor.outgoing.is_empty());
		let pruned = prune_dangling_edges(minor);
		// The whisker (ending in a degree-1 dead end, on no cycle) is gone;
		// the four square edges (which do lie on the cycle) remain.
		for (_, edge) in pruned.edges.iter() {
			let whisker_len = (edge.segments[0].start() - Vector::new(0.0, 0.0)).length() < 1e-6 && (edge.segments[0].end() - Vector::new(-5.0, -5.0)).length() < 1e-6;
			let whisker_len_rev = (edge.segments[0].start() - Vector::new(-5.0, -5.0)).length() < 1e-6 && (edge.segments[0].end() - Vector::new(0.0, 0.0)).length() < 1e-6;
			assert!(!whisker_len && !whisker_len_rev, "whisker edge should have been pruned");
		}
	}
}
