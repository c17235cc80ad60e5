//! Stage 8: the dual graph. Every minor edge (and every cycle, emitted as a
//! twinned inner/outer pair) becomes a directed dual half-edge; walking
//! `nextEdge` around a half-edge's destination vertex enumerates the faces
//! of the planar subdivision, and twin-connectivity between half-edges
//! partitions those faces into connected components.

use crate::arrangement::angle::AngularOrder;
use crate::arrangement::minor::{MinorEdgeId, MinorGraph};
use crate::arrangement::{DualEdgeId, FaceId};
use crate::parent::Parent;
use crate::segment::Segment;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

pub struct DualHalfEdge {
	pub segments: SmallVec<[Segment; 4]>,
	pub parent: Parent,
	pub direction_flag: bool,
	pub incident_face: FaceId,
	pub twin: DualEdgeId,
}

/// A face's boundary, as a cyclic sequence of dual half-edges in the order
/// `nextEdge` produces them. Inner faces wind counter-clockwise; a
/// component's outer face winds clockwise (equivalently: is the unique face
/// with negative polygonal winding, see [`outer_face_of`]).
pub struct Face {
	pub incident_edges: Vec<DualEdgeId>,
	/// Two-bit winding classification set by stage 10; `0` (outside both
	/// inputs) until then.
	pub flag: u8,
}

/// A maximal set of faces connected through twinned dual half-edges.
pub struct Component {
	pub faces: Vec<FaceId>,
	pub outer_face: FaceId,
}

pub struct DualGraph {
	pub edges: SlotMap<DualEdgeId, DualHalfEdge>,
	pub faces: SlotMap<FaceId, Face>,
	pub components: Vec<Component>,
}

impl DualGraph {
	/// The boundary segments of a face, in the order the face's cyclic
	/// `incident_edges` visits them. Each half-edge's `segments` are already
	/// oriented for the direction that half-edge is walked in (see the
	/// minor graph's construction), so no extra reversal is needed here.
	pub fn face_segments(&self, face: FaceId) -> impl Iterator<Item = Segment> + '_ {
		self.faces[face].incident_edges.iter().flat_map(move |&e| self.edges[e].segments.iter().copied())
	}
}

/// Follows `nextEdge(e)`: the edge immediately after `twin(e)` in the
/// angular order at `e`'s destination vertex. Minor-edge-backed half-edges
/// look this up through the angular order; cycle-backed half-edges have no
/// branch vertex to consult and are their own `nextEdge` (a pure cycle's
/// walk closes immediately back on itself).
fn next_edge(
	id: DualEdgeId,
	minor: &MinorGraph,
	angular: &AngularOrder,
	minor_to_dual: &FxHashMap<MinorEdgeId, DualEdgeId>,
	dual_to_minor: &FxHashMap<DualEdgeId, MinorEdgeId>,
) -> DualEdgeId {
	let Some(&mid) = dual_to_minor.get(&id) else {
		// Cycle-backed half-edge: a single-edge face that closes on itself.
		return id;
	};
	let medge = &minor.edges[mid];
	let twin_mid = medge.twin;
	let twin_dual = minor_to_dual[&twin_mid];
	let vertex = medge.end;
	match angular.clockwise_of(vertex, twin_mid) {
		Some(next_mid) => minor_to_dual[&next_mid],
		// A degree-1 dead end shouldn't survive pruning, but fall back to
		// the twin itself (bouncing straight back) rather than panicking.
		None => twin_dual,
	}
}

/// Builds the dual graph from the pruned minor graph and its angular order.
pub fn build_dual_graph(minor: &MinorGraph, angular: &AngularOrder) -> DualGraph {
	let mut edges: SlotMap<DualEdgeId, DualHalfEdge> = SlotMap::with_key();
	let mut minor_to_dual: FxHashMap<MinorEdgeId, DualEdgeId> = FxHashMap::default();
	let mut dual_to_minor: FxHashMap<DualEdgeId, MinorEdgeId> = FxHashMap::default();

	for (mid, medge) in minor.edges.iter() {
		let id = edges.insert(DualHalfEdge {
			segments: medge.segments.clone(),
			parent: medge.parent,
			direction_flag: medge.direction_flag,
			incident_face: FaceId::default(),
			twin: DualEdgeId::default(),
		});
		minor_to_dual.insert(mid, id);
		dual_to_minor.insert(id, mid);
	}
	for (mid, medge) in minor.edges.iter() {
		edges[minor_to_dual[&mid]].twin = minor_to_dual[&medge.twin];
	}

	// Each entry in `minor.cycles` is already one full directed loop around
	// a pure-cycle component; emit one dual half-edge per entry and twin
	// them per `cycle_twin`, mirroring the inner/outer face pair described
	// in stage 8.
	let cycle_duals: Vec<DualEdgeId> = minor
		.cycles
		.iter()
		.map(|cycle| {
			edges.insert(DualHalfEdge {
				segments: cycle.segments.clone(),
				parent: cycle.parent,
				direction_flag: cycle.direction_flag,
				incident_face: FaceId::default(),
				twin: DualEdgeId::default(),
			})
		})
		.collect();
	for (i, &id) in cycle_duals.iter().enumerate() {
		edges[id].twin = cycle_duals[minor.cycle_twin[i]];
	}

	let mut faces: SlotMap<FaceId, Face> = SlotMap::with_key();
	let mut visited: FxHashSet<DualEdgeId> = FxHashSet::default();

	let all_edge_ids: Vec<DualEdgeId> = edges.keys().collect();
	for start in all_edge_ids {
		if visited.contains(&start) {
			continue;
		}
		let mut incident_edges = Vec::new();
		let mut current = start;
		loop {
			visited.insert(current);
			incident_edges.push(current);
			current = next_edge(current, minor, angular, &minor_to_dual, &dual_to_minor);
			if current == start {
				break;
			}
			// Defensive: a malformed angular order could in principle fail
			// to close the cycle. Bail out rather than loop forever; the
			// partial face is still usable for winding/flagging purposes.
			if visited.contains(&current) {
				break;
			}
		}
		let face_id = faces.insert(Face { incident_edges: incident_edges.clone(), flag: 0 });
		for &e in &incident_edges {
			edges[e].incident_face = face_id;
		}
	}

	let mut components = partition_components(&edges, &faces);
	for component in &mut components {
		let outer = outer_face_of(component, &edges, &faces);
		debug_assert!(component.faces.contains(&outer), "outer face must belong to its own component");
		component.outer_face = outer;
	}

	DualGraph { edges, faces, components }
}

/// Partitions faces into connected components via twin-adjacency between
/// the dual half-edges bounding each face: two faces sharing a physical
/// boundary (one half-edge, its twin in the other face) belong together.
fn partition_components(edges: &SlotMap<DualEdgeId, DualHalfEdge>, faces: &SlotMap<FaceId, Face>) -> Vec<Component> {
	// `SlotMap::keys()` iterates in insertion order for live entries, giving
	// reproducible component ordering without an explicit sort (see the
	// Design Notes on iteration order).
	let face_ids: Vec<FaceId> = faces.keys().collect();

	let mut visited: FxHashSet<FaceId> = FxHashSet::default();
	let mut components = Vec::new();

	for &root in &face_ids {
		if visited.contains(&root) {
			continue;
		}
		let mut members = Vec::new();
		let mut stack = vec![root];
		visited.insert(root);
		while let Some(face_id) = stack.pop() {
			members.push(face_id);
			for &e in &faces[face_id].incident_edges {
				let neighbor = edges[edges[e].twin].incident_face;
				if visited.insert(neighbor) {
					stack.push(neighbor);
				}
			}
		}
		// Placeholder; replaced by `outer_face_of` immediately after return.
		components.push(Component { outer_face: members[0], faces: members });
	}
	components
}

/// Samples the face boundary as a 64-point-per-segment polyline and returns
/// its signed area (shoelace formula, positive for counter-clockwise). The
/// outer face of a component is the unique face whose boundary winds the
/// opposite way from its siblings, i.e. has negative signed area when the
/// others are positive (or vice versa) — concretely, the face with the
/// smallest (most negative) signed area is picked as outer.
fn signed_area(dual: impl Iterator<Item = Segment>) -> f64 {
	const SAMPLES_PER_SEGMENT: usize = 64;
	let mut points = Vec::new();
	for seg in dual {
		for i in 0..SAMPLES_PER_SEGMENT {
			points.push(seg.sample(i as f64 / SAMPLES_PER_SEGMENT as f64));
		}
	}
	if points.len() < 2 {
		return 0.0;
	}
	let mut area = 0.0;
	for i in 0..points.len() {
		let p = points[i];
		let q = points[(i + 1) % points.len()];
		area += p.x * q.y - q.x * p.y;
	}
	area * 0.5
}

/// Per §4.8, the outer face is "the unique face with negative winding", not
/// merely the most negative among however many faces the component has —
/// on a component with more than one negative-area face (a genuine
/// degenerate/ambiguous arrangement) picking the single smallest would
/// silently paper over it. Pick the (expected-unique) negative-area face
/// directly; fall back to the most negative only if none qualifies
/// (numerical fuzz around zero).
fn outer_face_of(component: &Component, edges: &SlotMap<DualEdgeId, DualHalfEdge>, faces: &SlotMap<FaceId, Face>) -> FaceId {
	if component.faces.len() == 1 {
		return component.faces[0];
	}
	let mut negative_faces = Vec::new();
	let mut outer = component.faces[0];
	let mut min_area = f64::INFINITY;
	for &face_id in &component.faces {
		let area = signed_area(faces[face_id].incident_edges.iter().flat_map(|&e| edges[e].segments.iter().copied()));
		if area < 0.0 {
			negative_faces.push(face_id);
		}
		if area < min_area {
			min_area = area;
			outer = face_id;
		}
	}
	debug_assert!(negative_faces.len() <= 1, "component should have exactly one negative-winding (outer) face, found {}", negative_faces.len());
	negative_faces.first().copied().unwrap_or(outer)
}
