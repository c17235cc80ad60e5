//! Boolean operations (union, difference, intersection, exclusion, division,
//! fracture) between two planar regions described as vector paths of line,
//! cubic, quadratic, and elliptical-arc segments.
//!
//! The pipeline (see [`arrangement`]) is a straight, single-threaded flow
//! over geometric data: split every segment at self- and pairwise
//! intersections, snap endpoints into a vertex graph, contract that graph
//! into chains and pure cycles, order edges angularly at each branch
//! vertex, walk faces, nest components by containment, propagate per-input
//! winding counts, and finally extract the boundary (or boundaries) the
//! requested operation selects. [`path_boolean`] is the single entry point;
//! everything else in this crate exists to support it.
//!
//! SVG path-data string parsing/formatting lives behind the `parsing`
//! feature in [`path_data`] — it's an adapter around the core, not part of
//! it (segment splitting, graph construction, and extraction never touch
//! strings).

pub mod aabb;
pub mod arrangement;
pub mod epsilons;
pub mod error;
pub mod fill_rule;
pub mod intersect;
pub mod op;
pub mod parent;
pub mod path;
#[cfg(feature = "parsing")]
pub mod path_data;
pub mod quadtree;
pub mod segment;

pub use epsilons::Epsilons;
pub use error::PathBoolError;
pub use fill_rule::FillRule;
pub use op::Op;
pub use parent::Parent;
pub use path::{Path, PathCommand, path_from_commands, path_to_commands};
#[cfg(feature = "parsing")]
pub use path_data::{path_from_path_data, path_to_path_data};
pub use segment::{Segment, Vector};

use arrangement::{angle, dual, extract, flag, major, minor, nesting, prepare, prune};

/// Computes a Boolean operation between two paths under the default
/// [`Epsilons`]. See [`path_boolean_with_epsilons`] for a version that takes
/// its own tolerances.
///
/// Returns an empty list if both inputs are empty. Otherwise: for
/// [`Op::Union`]/[`Op::Difference`]/[`Op::Intersection`]/[`Op::Exclusion`],
/// exactly one `Path` (possibly empty, possibly several boundary loops
/// concatenated with no explicit separator — see [`path_to_commands`] for
/// how a consumer recovers sub-path breaks). For [`Op::Division`]/
/// [`Op::Fracture`], zero or more `Path`s, one per selected face, with any
/// unselected or selected holes appended to their enclosing face's path.
pub fn path_boolean(a: &Path, a_fill_rule: FillRule, b: &Path, b_fill_rule: FillRule, op: Op) -> Vec<Path> {
	path_boolean_with_epsilons(a, a_fill_rule, b, b_fill_rule, op, &Epsilons::DEFAULT)
}

/// As [`path_boolean`], but with caller-supplied tolerances instead of
/// [`Epsilons::DEFAULT`].
///
/// This is the core pipeline described in §2 of the design: it never fails
/// (every numeric degeneracy enumerated has an explicit fallback in the
/// component it belongs to — see [`segment`], [`intersect`]) and never
/// suspends or shares state across calls (§5) — every quadtree, pool, and
/// memo table here is local to this call and dropped on return.
pub fn path_boolean_with_epsilons(a: &Path, a_fill_rule: FillRule, b: &Path, b_fill_rule: FillRule, op: Op, eps: &Epsilons) -> Vec<Path> {
	log::trace!("path_boolean: a={} segments, b={} segments, op={:?}", a.len(), b.len(), op);

	if a.is_empty() && b.is_empty() {
		return Vec::new();
	}

	// Stage 3: edge preparation (self-intersection + pairwise splitting).
	let (tagged, overall_bbox) = prepare::prepare_edges(a, b, eps);
	log::debug!("stage 3 (prepare): {} tagged segments", tagged.len());
	let Some(overall_bbox) = overall_bbox else {
		return Vec::new();
	};

	// Stage 4: major graph (vertex snapping, dedup, twin edges).
	let major_graph = major::build_major_graph(tagged, Some(overall_bbox), eps);
	log::debug!("stage 4 (major): {} vertices, {} edges", major_graph.vertices.len(), major_graph.edges.len());

	// Stage 5: minor graph (chain contraction, pure cycles).
	let minor_graph = minor::build_minor_graph(&major_graph);
	log::debug!("stage 5 (minor): {} chain edges, {} pure cycles", minor_graph.edges.len(), minor_graph.cycles.len());

	// Stage 6: dangling-edge pruning.
	let pruned = prune::prune_dangling_edges(minor_graph);
	log::debug!("stage 6 (prune): {} chain edges remain", pruned.edges.len());

	// Stage 7: angular ordering at branch vertices.
	let angular_order = angle::compute_angular_order(&pruned, eps);
	log::trace!("stage 7 (angle): angular order computed for {} branch vertices", angular_order.order.len());

	// Stage 8: dual graph (faces, components).
	let mut dual_graph = dual::build_dual_graph(&pruned, &angular_order);
	log::debug!("stage 8 (dual): {} faces across {} components", dual_graph.faces.len(), dual_graph.components.len());

	// Stage 9: nesting forest (geometric containment between components).
	let forest = nesting::build_nesting_forest(&dual_graph, eps);
	log::trace!("stage 9 (nesting): {} root components", forest.len());

	// Stage 10: face flagging (per-input winding -> 2-bit flag).
	flag::flag_faces(&mut dual_graph, &forest, a_fill_rule, b_fill_rule);
	log::trace!("stage 10 (flag): faces flagged under {a_fill_rule:?} / {b_fill_rule:?}");

	// Stage 11: extraction.
	let result = extract::extract(&dual_graph, &forest, op);
	log::debug!("stage 11 (extract): {} output path(s)", result.len());
	result
}
