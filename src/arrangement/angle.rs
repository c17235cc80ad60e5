//! Stage 7: angular ordering. At each branch vertex, sorts the outgoing
//! minor edges by the incidence angle of their initial tangent, so the dual
//! graph's `nextEdge` walk (stage 8) can pick "the next edge clockwise from
//! the one we arrived on" in constant time per step.

use crate::arrangement::VertexId;
use crate::arrangement::minor::{MinorEdgeId, MinorGraph};
use crate::epsilons::Epsilons;
use crate::segment::Vector;
use rustc_hash::FxHashMap;

/// The direction an edge points *away* from its start vertex, i.e. the
/// tangent an observer standing at the start vertex would see the edge
/// leave along. Sampled from the chain's first segment, a tiny step
/// `eps.param` inside it, to stay well-defined even for segments whose
/// derivative vanishes exactly at the endpoint.
///
/// Each `MinorEdge` (whichever `direction_flag` it carries) was walked
/// independently from its own start vertex in [`super::minor::build_minor_graph`],
/// so `segments[0]` already starts at `edge.start` regardless of the flag —
/// there is no shared, canonically-oriented segment list to un-reverse here.
fn initial_direction(edge: &crate::arrangement::minor::MinorEdge, eps: &Epsilons) -> Vector {
	let seg = edge.segments[0];
	seg.sample(eps.param) - seg.sample(0.0)
}

/// Angle of `v` from the positive x-axis, in `(-pi, pi]`.
fn angle_of(v: Vector) -> f64 {
	v.y.atan2(v.x)
}

/// A complete cyclic angular order of outgoing minor edges at every branch
/// vertex, sorted ascending by `atan2(direction)`.
pub struct AngularOrder {
	pub order: FxHashMap<VertexId, Vec<MinorEdgeId>>,
}

impl AngularOrder {
	/// The edges at `vertex` in angular order, or an empty slice if `vertex`
	/// has no outgoing minor edges (e.g. it was fully pruned).
	pub fn at(&self, vertex: VertexId) -> &[MinorEdgeId] {
		self.order.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
	}

	/// The minor edge immediately clockwise from `edge` in `vertex`'s cyclic
	/// order (wrapping around), used by the dual graph's face walk.
	pub fn clockwise_of(&self, vertex: VertexId, edge: MinorEdgeId) -> Option<MinorEdgeId> {
		let edges = self.at(vertex);
		let pos = edges.iter().position(|&e| e == edge)?;
		Some(edges[(pos + 1) % edges.len()])
	}
}

pub fn compute_angular_order(minor: &MinorGraph, eps: &Epsilons) -> AngularOrder {
	let mut order: FxHashMap<VertexId, Vec<MinorEdgeId>> = FxHashMap::default();
	for (&vertex, edges) in &minor.outgoing {
		let mut with_angle: Vec<(f64, MinorEdgeId)> = edges.iter().map(|&e| (angle_of(initial_direction(&minor.edges[e], eps)), e)).collect();
		with_angle.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
		order.insert(vertex, with_angle.into_iter().map(|(_, e)| e).collect());
	}
	AngularOrder { order }
}
