//! Stage 4: the major graph. Snaps split-segment endpoints to shared vertices
//! within `eps.point`, discards zero-length edges, folds coincident parallel
//! edges together (merging their parent bits), and builds the directed
//! twin-edge structure every later stage walks.

use crate::aabb::Aabb;
use crate::arrangement::VertexId;
use crate::arrangement::prepare::TaggedSegment;
use crate::epsilons::Epsilons;
use crate::parent::Parent;
use crate::quadtree::{GENERAL_CAPACITY, QuadTree};
use crate::segment::{Segment, Vector};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

slotmap::new_key_type! {
	/// Handle into [`MajorGraph::edges`]. A physical segment occupies two
	/// entries, forward and backward, which are each other's twin.
	pub struct MajorEdgeId;
}

pub struct MajorVertex {
	pub point: Vector,
	/// Directed edges whose `start` is this vertex.
	pub outgoing: Vec<MajorEdgeId>,
}

pub struct MajorEdge {
	pub segment: Segment,
	pub parent: Parent,
	pub bbox: Aabb,
	pub start: VertexId,
	pub end: VertexId,
	/// `false` for the direction matching the segment's own parametrization,
	/// `true` for its twin (the reversed direction).
	pub direction_flag: bool,
	pub twin: MajorEdgeId,
}

pub struct MajorGraph {
	pub vertices: SlotMap<VertexId, MajorVertex>,
	pub edges: SlotMap<MajorEdgeId, MajorEdge>,
}

impl MajorGraph {
	pub fn degree(&self, v: VertexId) -> usize {
		self.vertices[v].outgoing.len()
	}
}

fn is_degenerate(seg: &Segment, eps: &Epsilons) -> bool {
	let close = |p: Vector, q: Vector| (p - q).length() < eps.point;
	match *seg {
		Segment::Line(p0, p1) => close(p0, p1),
		Segment::Cubic(p0, c1, c2, p1) => close(p0, p1) && close(c1, p0) && close(c2, p1),
		Segment::Quadratic(p0, c, p1) => close(p0, p1) && close(c, p0),
		Segment::Arc { p0, p1, sweep, .. } => close(p0, p1) && !sweep,
	}
}

fn find_or_insert_vertex(vertices: &mut SlotMap<VertexId, MajorVertex>, tree: &mut QuadTree<VertexId>, point: Vector, eps: &Epsilons) -> VertexId {
	let query_box = Aabb::from_points([point]).inflate(eps.point);
	for candidate in tree.query(&query_box) {
		if (vertices[candidate].point - point).length() < eps.point {
			return candidate;
		}
	}
	let id = vertices.insert(MajorVertex { point, outgoing: Vec::new() });
	tree.insert(Aabb::from_points([point]), id);
	id
}

/// Builds the major graph from stage 3's split, tagged segments.
pub fn build_major_graph(segments: Vec<TaggedSegment>, overall: Option<Aabb>, eps: &Epsilons) -> MajorGraph {
	let mut vertices: SlotMap<VertexId, MajorVertex> = SlotMap::with_key();
	let mut edges: SlotMap<MajorEdgeId, MajorEdge> = SlotMap::with_key();

	let bounds = overall.unwrap_or(Aabb { top: -1.0, bottom: 1.0, left: -1.0, right: 1.0 }).inflate(1.0);
	let mut vertex_tree: QuadTree<VertexId> = QuadTree::new(bounds, GENERAL_CAPACITY);

	// Keyed by the unordered vertex pair so both orientations of a coincident
	// edge are found regardless of which one arrives first.
	let mut by_endpoints: FxHashMap<(VertexId, VertexId), Vec<(Segment, MajorEdgeId, MajorEdgeId)>> = FxHashMap::default();

	for (segment, parent) in segments {
		if is_degenerate(&segment, eps) {
			continue;
		}

		let v0 = find_or_insert_vertex(&mut vertices, &mut vertex_tree, segment.start(), eps);
		let v1 = find_or_insert_vertex(&mut vertices, &mut vertex_tree, segment.end(), eps);
		if v0 == v1 {
			// Endpoints snapped together even though the unmerged segment
			// wasn't itself degenerate: treat as zero-length and discard.
			continue;
		}

		let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
		let bucket = by_endpoints.entry(key).or_default();

		let mut merged = false;
		for (existing, fwd, bwd) in bucket.iter() {
			if Segment::segments_equal(existing, &segment, eps) || Segment::segments_equal(existing, &segment.reverse(), eps) {
				edges[*fwd].parent = edges[*fwd].parent.union(parent);
				edges[*bwd].parent = edges[*bwd].parent.union(parent);
				merged = true;
				break;
			}
		}
		if merged {
			continue;
		}

		let bbox = segment.bounding_box();
		let fwd_id = edges.insert(MajorEdge { segment, parent, bbox, start: v0, end: v1, direction_flag: false, twin: MajorEdgeId::default() });
		let bwd_id = edges.insert(MajorEdge { segment: segment.reverse(), parent, bbox, start: v1, end: v0, direction_flag: true, twin: fwd_id });
		edges[fwd_id].twin = bwd_id;

		vertices[v0].outgoing.push(fwd_id);
		vertices[v1].outgoing.push(bwd_id);

		bucket.push((segment, fwd_id, bwd_id));
	}

	for (id, edge) in edges.iter() {
		debug_assert_eq!(edges[edge.twin].twin, id, "major edge twin relation must be symmetric");
	}

	MajorGraph { vertices, edges }
}
