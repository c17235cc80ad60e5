//! Stage 3: edge preparation. Tags every input segment with the path it came
//! from, splits cubics at their own self-intersection, then splits every
//! resulting segment at every pairwise intersection found via a quadtree of
//! bounding boxes.

use crate::aabb::Aabb;
use crate::epsilons::Epsilons;
use crate::intersect::{cubic_self_intersection, segment_intersections};
use crate::parent::Parent;
use crate::path::Path;
use crate::quadtree::{INTERSECTION_CAPACITY, QuadTree};
use crate::segment::Segment;

/// A segment tagged with the input path(s) it derives from.
pub type TaggedSegment = (Segment, Parent);

/// Splits a single cubic at its self-intersection parameters, per the power
/// basis closed form in [`cubic_self_intersection`]. Non-cubics, and cubics
/// with no self-intersection, pass through unchanged.
fn split_self_intersection(seg: Segment, eps: &Epsilons) -> Vec<Segment> {
	let Segment::Cubic(p0, c1, c2, p1) = seg else {
		return vec![seg];
	};
	let Some((t1, t2)) = cubic_self_intersection(p0, c1, c2, p1) else {
		return vec![seg];
	};
	if t2 - t1 < eps.param {
		let (a, b) = seg.split(t1);
		vec![a, b]
	} else {
		let (a, rest) = seg.split(t1);
		let t2_remapped = (t2 - t1) / (1.0 - t1);
		let (mid, c) = rest.split(t2_remapped);
		vec![a, mid, c]
	}
}

fn shares_an_endpoint(a: &Segment, b: &Segment, eps: &Epsilons) -> bool {
	let close = |p: crate::segment::Vector, q: crate::segment::Vector| (p - q).length() < eps.point;
	close(a.start(), b.start()) || close(a.start(), b.end()) || close(a.end(), b.start()) || close(a.end(), b.end())
}

/// Runs stage 3 over both input paths, producing a flat list of segments each
/// tagged with the path(s) they derive from, fully split at every
/// self-intersection and pairwise intersection. Returns `None` if both inputs
/// are empty.
pub fn prepare_edges(a: &Path, b: &Path, eps: &Epsilons) -> (Vec<TaggedSegment>, Option<Aabb>) {
	let mut tagged = Vec::with_capacity(a.len() + b.len());
	for seg in a {
		tagged.push((*seg, Parent::A));
	}
	for seg in b {
		tagged.push((*seg, Parent::B));
	}

	let mut after_self = Vec::with_capacity(tagged.len());
	for (seg, parent) in tagged {
		for piece in split_self_intersection(seg, eps) {
			after_self.push((piece, parent));
		}
	}

	if after_self.is_empty() {
		return (Vec::new(), None);
	}

	let mut overall = after_self[0].0.bounding_box();
	for (seg, _) in &after_self[1..] {
		overall = overall.union(&seg.bounding_box());
	}

	let mut tree: QuadTree<usize> = QuadTree::new(overall.inflate(1.0), INTERSECTION_CAPACITY);
	let mut split_params: Vec<Vec<f64>> = vec![Vec::new(); after_self.len()];

	for i in 0..after_self.len() {
		let (seg_i, parent_i) = &after_self[i];
		let bbox_i = seg_i.bounding_box();
		for j in tree.query(&bbox_i) {
			let (seg_j, parent_j) = &after_self[j];
			let same_parent = parent_i == parent_j;
			let endpoints = same_parent || !shares_an_endpoint(seg_i, seg_j, eps);
			for (s, t) in segment_intersections(seg_i, seg_j, endpoints, eps) {
				split_params[i].push(s);
				split_params[j].push(t);
			}
		}
		tree.insert(bbox_i, i);
	}

	let mut result = Vec::new();
	for (i, (seg, parent)) in after_self.into_iter().enumerate() {
		let mut params = std::mem::take(&mut split_params[i]);
		params.retain(|&t| t > eps.param && t < 1.0 - eps.param);
		params.sort_by(|x, y| x.partial_cmp(y).unwrap());
		params.dedup_by(|x, y| (*x - *y).abs() < eps.param);

		let mut remaining = seg;
		let mut prev_t = 0.0;
		for t in params {
			let residual = (t - prev_t) / (1.0 - prev_t);
			if residual <= 0.0 || residual >= 1.0 {
				continue;
			}
			let (left, right) = remaining.split(residual);
			result.push((left, parent));
			remaining = right;
			prev_t = t;
		}
		result.push((remaining, parent));
	}

	(result, Some(overall))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::segment::Vector;

	#[test]
	fn crossing_squares_split_at_four_points() {
		let eps = Epsilons::DEFAULT;
		let square = |x: f64, y: f64, s: f64| -> Path {
			vec![
				Segment::Line(Vector::new(x, y), Vector::new(x + s, y)),
				Segment::Line(Vector::new(x + s, y), Vector::new(x + s, y + s)),
				Segment::Line(Vector::new(x + s, y + s), Vector::new(x, y + s)),
				Segment::Line(Vector::new(x, y + s), Vector::new(x, y)),
			]
		};
		let a = square(0.0, 0.0, 10.0);
		let b = square(5.0, 5.0, 10.0);
		let (result, bbox) = prepare_edges(&a, &b, &eps);
		assert!(bbox.is_some());
		// Each square gets at least one extra split from the two crossings on
		// its boundary, so the output has more pieces than the 8 inputs.
		assert!(result.len() > 8);
	}

	#[test]
	fn disjoint_paths_produce_no_splits() {
		let eps = Epsilons::DEFAULT;
		let a = vec![Segment::Line(Vector::new(0.0, 0.0), Vector::new(1.0, 0.0))];
		let b = vec![Segment::Line(Vector::new(100.0, 100.0), Vector::new(101.0, 100.0))];
		let (result, _) = prepare_edges(&a, &b, &eps);
		assert_eq!(result.len(), 2);
	}

	#[test]
	fn both_empty_yields_no_bbox() {
		let eps = Epsilons::DEFAULT;
		let (result, bbox) = prepare_edges(&Vec::new(), &Vec::new(), &eps);
		assert!(result.is_empty());
		assert!(bbox.is_none());
	}
}
