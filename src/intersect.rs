//! Segment-segment intersection, cubic self-intersection, and the
//! horizontal-ray crossing test used by the nesting forest and outer-face
//! tests.

use crate::epsilons::Epsilons;
use crate::segment::{Segment, Vector};

/// `u × v` for 2D vectors, i.e. `u.x*v.y - u.y*v.x`.
fn cross(u: Vector, v: Vector) -> f64 {
	u.x * v.y - u.y * v.x
}

/// Closed-form line-line intersection via Cramer's rule. Returns `(s, t)`
/// with both in `[-eps.param, 1 + eps.param]`, or `None` if the lines are
/// parallel (`|denom| < 64 * f64::MIN_POSITIVE`) or the intersection falls
/// outside both segments' extended parameter ranges.
pub fn line_line_intersection(p0: Vector, p1: Vector, q0: Vector, q1: Vector, eps: &Epsilons) -> Option<(f64, f64)> {
	let d1 = p1 - p0;
	let d2 = q1 - q0;
	let denom = cross(d1, d2);
	if denom.abs() < 64.0 * f64::MIN_POSITIVE {
		return None;
	}
	let diff = q0 - p0;
	let s = cross(diff, d2) / denom;
	let t = cross(diff, d1) / denom;
	let in_range = |v: f64| v >= -eps.param && v <= 1.0 + eps.param;
	if in_range(s) && in_range(t) { Some((s, t)) } else { None }
}

/// Finds the self-intersection of a cubic Bézier, if any.
///
/// Writes the cubic in power-basis form `B(t) = D3 t^3 + D2 t^2 + D1 t + D0`
/// and observes that for `t1 != t2`, `B(t1) = B(t2)` iff
/// `D3(t1^2 + t1*t2 + t2^2) + D2(t1+t2) + D1 = 0`. Substituting `s = t1+t2`,
/// `p = t1*t2` gives a linear equation in `s` (eliminating the quadratic
/// term between the x and y components) followed by a direct solve for `p`;
/// `t1, t2` are then the roots of `u^2 - s*u + p = 0`, with discriminant
/// `K = s^2 - 4p`.
///
/// Returns `(t1, t2)` (`t1 <= t2`) only when `K >= 0` and both parameters lie
/// strictly in `(1e-12, 1 - 1e-12)`.
pub fn cubic_self_intersection(p0: Vector, c1: Vector, c2: Vector, p1: Vector) -> Option<(f64, f64)> {
	const EPS: f64 = 1e-12;

	let d1 = 3.0 * (c1 - p0);
	let d2 = 3.0 * (p0 - 2.0 * c1 + c2);
	let d3 = -p0 + 3.0 * c1 - 3.0 * c2 + p1;

	let cross_d2_d3 = cross(d2, d3);
	if cross_d2_d3.abs() < f64::EPSILON {
		return None;
	}
	let s = cross(d1, d3) / cross_d2_d3;

	let p = if d3.x.abs() >= d3.y.abs() {
		if d3.x.abs() < f64::EPSILON {
			return None;
		}
		(d3.x * s * s + d2.x * s + d1.x) / d3.x
	} else {
		(d3.y * s * s + d2.y * s + d1.y) / d3.y
	};

	let k = s * s - 4.0 * p;
	if k < 0.0 {
		return None;
	}
	let sqrt_k = k.sqrt();
	let t1 = (s - sqrt_k) * 0.5;
	let t2 = (s + sqrt_k) * 0.5;
	let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

	if t1 > EPS && t1 < 1.0 - EPS && t2 > EPS && t2 < 1.0 - EPS { Some((t1, t2)) } else { None }
}

/// All parameter pairs `(s, t)` at which `seg0` and `seg1` cross, using a
/// closed form for two lines and bounding-volume bisection otherwise.
///
/// `endpoints = true` returns every root found. `endpoints = false` drops
/// roots where *both* `s` and `t` land within `eps.param` of `0` or `1` —
/// i.e. only endpoint-endpoint coincidences are filtered; a root that is an
/// endpoint on only one side is kept. This mirrors the upstream
/// implementation's documented (if not fully principled) behavior.
pub fn segment_intersections(seg0: &Segment, seg1: &Segment, endpoints: bool, eps: &Epsilons) -> Vec<(f64, f64)> {
	let mut roots = if let (Segment::Line(a0, a1), Segment::Line(b0, b1)) = (seg0, seg1) {
		line_line_intersection(*a0, *a1, *b0, *b1, eps).into_iter().collect()
	} else {
		bisect_intersections(seg0, (0.0, 1.0), seg1, (0.0, 1.0), eps)
	};

	if !endpoints {
		roots.retain(|&(s, t)| {
			let s_end = s < eps.param || s > 1.0 - eps.param;
			let t_end = t < eps.param || t > 1.0 - eps.param;
			!(s_end && t_end)
		});
	}
	roots
}

fn bisect_intersections(seg_a: &Segment, range_a: (f64, f64), seg_b: &Segment, range_b: (f64, f64), eps: &Epsilons) -> Vec<(f64, f64)> {
	let mut roots = Vec::new();
	let mut worklist = vec![(*seg_a, range_a, *seg_b, range_b)];

	while let Some((sa, ra, sb, rb)) = worklist.pop() {
		let bbox_a = sa.bounding_box();
		let bbox_b = sb.bounding_box();
		if !bbox_a.overlaps(&bbox_b) {
			continue;
		}

		let linear_a = bbox_a.max_extent() <= eps.linear;
		let linear_b = bbox_b.max_extent() <= eps.linear;

		if linear_a && linear_b {
			if let Some((s, t)) = line_line_intersection(sa.start(), sa.end(), sb.start(), sb.end(), eps) {
				let global_s = lerp_range(ra, s);
				let global_t = lerp_range(rb, t);
				roots.push((global_s, global_t));
			}
			continue;
		}

		// Overlapping identical subsegments are dropped rather than reported
		// as an intersection range; see the Design Notes' open question.
		if Segment::segments_equal(&sa, &sb, eps) {
			continue;
		}

		let halves_a = subdivide_if_curved(&sa, ra, linear_a);
		let halves_b = subdivide_if_curved(&sb, rb, linear_b);
		for &(ref ha, hra) in &halves_a {
			for &(ref hb, hrb) in &halves_b {
				worklist.push((*ha, hra, *hb, hrb));
			}
		}
	}

	roots
}

fn subdivide_if_curved(seg: &Segment, range: (f64, f64), is_linear: bool) -> Vec<(Segment, (f64, f64))> {
	if is_linear {
		return vec![(*seg, range)];
	}
	let (left, right) = seg.split(0.5);
	let mid = (range.0 + range.1) * 0.5;
	vec![(left, (range.0, mid)), (right, (mid, range.1))]
}

fn lerp_range(range: (f64, f64), t: f64) -> f64 {
	range.0 + (range.1 - range.0) * t
}

/// Whether the segment from `a` to `b` crosses the horizontal ray cast from
/// `point` toward `+x`, using the half-open bracket `a.y >= point.y` xor
/// `b.y >= point.y` so that exactly one of two segments meeting exactly at
/// `point.y` is counted.
pub fn line_crosses_horizontal_ray(a: Vector, b: Vector, point: Vector) -> bool {
	let brackets = (a.y >= point.y) != (b.y >= point.y);
	if !brackets {
		return false;
	}
	let t = (point.y - a.y) / (b.y - a.y);
	let x = a.x + t * (b.x - a.x);
	x >= point.x
}

/// Counts horizontal-ray crossings of a (possibly curved) segment by
/// recursively bisecting its bounding box down to `eps.linear`, then
/// applying [`line_crosses_horizontal_ray`] to the resulting chord.
pub fn ray_crossing_count(seg: &Segment, point: Vector, eps: &Epsilons) -> usize {
	let bbox = seg.bounding_box();
	if bbox.max_extent() <= eps.linear {
		return line_crosses_horizontal_ray(seg.start(), seg.end(), point) as usize;
	}
	let (a, b) = seg.split(0.5);
	ray_crossing_count(&a, point, eps) + ray_crossing_count(&b, point, eps)
}
