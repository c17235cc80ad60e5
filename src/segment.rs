//! Segment primitives and the geometry kernel: sampling, splitting, bounding
//! boxes, arc-center conversion, arc-to-cubics, reversal, and equality.

use crate::aabb::Aabb;
use crate::epsilons::Epsilons;
use glam::DVec2;
use std::f64::consts::PI;

/// A point or vector in the plane. Y grows downward, matching SVG.
pub type Vector = DVec2;

/// One segment of a path. The parametric domain of every variant is `t ∈ [0, 1]`.
///
/// `Arc::phi` is stored in radians; the wire format (see [`crate::path`]) uses
/// degrees, matching SVG's `phi` parameter, and converts at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
	Line(Vector, Vector),
	Cubic(Vector, Vector, Vector, Vector),
	Quadratic(Vector, Vector, Vector),
	Arc {
		p0: Vector,
		rx: f64,
		ry: f64,
		phi: f64,
		large_arc: bool,
		sweep: bool,
		p1: Vector,
	},
}

/// The center parametrization of an elliptical arc, per SVG 2's
/// endpoint-to-center conversion (including the radius correction when
/// `x1'^2/rx^2 + y1'^2/ry^2 > 1`).
#[derive(Debug, Clone, Copy)]
pub struct ArcParams {
	pub center: Vector,
	pub rx: f64,
	pub ry: f64,
	/// Rotation of the ellipse's axes, radians.
	pub phi: f64,
	/// Start angle, radians.
	pub theta1: f64,
	/// Signed sweep, radians. Negative for `sweep = false`.
	pub delta_theta: f64,
}

/// The maximum angular span of a single cubic segment when approximating an
/// arc; see [`arc_to_cubics`].
pub const MAX_ARC_CUBIC_DELTA_THETA: f64 = PI / 16.0;

impl Segment {
	pub fn start(&self) -> Vector {
		match *self {
			Segment::Line(p0, _) => p0,
			Segment::Cubic(p0, ..) => p0,
			Segment::Quadratic(p0, ..) => p0,
			Segment::Arc { p0, .. } => p0,
		}
	}

	pub fn end(&self) -> Vector {
		match *self {
			Segment::Line(_, p1) => p1,
			Segment::Cubic(.., p1) => p1,
			Segment::Quadratic(.., p1) => p1,
			Segment::Arc { p1, .. } => p1,
		}
	}

	/// Reverses the segment's direction. Arcs flip their sweep flag, per SVG
	/// arc reversal rules.
	pub fn reverse(&self) -> Segment {
		match *self {
			Segment::Line(p0, p1) => Segment::Line(p1, p0),
			Segment::Cubic(p0, c1, c2, p1) => Segment::Cubic(p1, c2, c1, p0),
			Segment::Quadratic(p0, c, p1) => Segment::Quadratic(p1, c, p0),
			Segment::Arc { p0, rx, ry, phi, large_arc, sweep, p1 } => Segment::Arc { p0: p1, rx, ry, phi, large_arc, sweep: !sweep, p1: p0 },
		}
	}

	/// Samples the segment at `t ∈ [0, 1]` via de Casteljau for lines and
	/// Béziers, and via the center parametrization for arcs. A degenerate
	/// arc (zero radius) is sampled as the line from `p0` to `p1`.
	pub fn sample(&self, t: f64) -> Vector {
		match *self {
			Segment::Line(p0, p1) => p0.lerp(p1, t),
			Segment::Cubic(p0, c1, c2, p1) => de_casteljau_cubic(p0, c1, c2, p1, t),
			Segment::Quadratic(p0, c, p1) => de_casteljau_quadratic(p0, c, p1, t),
			Segment::Arc { p0, rx, ry, phi, large_arc, sweep, p1 } => match arc_center_parametrization(p0, rx, ry, phi, large_arc, sweep, p1) {
				Some(params) => sample_arc(&params, t),
				None => p0.lerp(p1, t),
			},
		}
	}

	/// Splits the segment at `t ∈ [0, 1]`, returning the two halves in order.
	pub fn split(&self, t: f64) -> (Segment, Segment) {
		match *self {
			Segment::Line(p0, p1) => {
				let m = p0.lerp(p1, t);
				(Segment::Line(p0, m), Segment::Line(m, p1))
			}
			Segment::Quadratic(p0, c, p1) => {
				let p01 = p0.lerp(c, t);
				let p12 = c.lerp(p1, t);
				let m = p01.lerp(p12, t);
				(Segment::Quadratic(p0, p01, m), Segment::Quadratic(m, p12, p1))
			}
			Segment::Cubic(p0, c1, c2, p1) => {
				let p01 = p0.lerp(c1, t);
				let p12 = c1.lerp(c2, t);
				let p23 = c2.lerp(p1, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				let m = p012.lerp(p123, t);
				(Segment::Cubic(p0, p01, p012, m), Segment::Cubic(m, p123, p23, p1))
			}
			Segment::Arc { p0, rx, ry, phi, large_arc, sweep, p1 } => match arc_center_parametrization(p0, rx, ry, phi, large_arc, sweep, p1) {
				Some(params) => split_arc(&params, t),
				None => {
					// Degenerate arc: split as a line.
					let m = p0.lerp(p1, t);
					(Segment::Line(p0, m), Segment::Line(m, p1))
				}
			},
		}
	}

	/// Tight-ish bounding box of the segment.
	///
	/// Lines are exact. Béziers solve for the extremum roots of their
	/// derivative (a quadratic for cubics, linear for quadratics) and take
	/// the tightest box over endpoints and interior extrema. Arcs with
	/// `phi = 0` or `rx = ry` intersect the angular interval with the four
	/// axis-aligned extrema directly; otherwise they fall back to the tight
	/// box of [`arc_to_cubics`] at `MAX_ARC_CUBIC_DELTA_THETA`.
	pub fn bounding_box(&self) -> Aabb {
		match *self {
			Segment::Line(p0, p1) => Aabb::from_points([p0, p1]),
			Segment::Quadratic(p0, c, p1) => {
				let mut points = vec![p0, p1];
				// derivative: 2(1-t)(c-p0) + 2t(p1-c) = 0 per axis -> linear in t
				for axis in 0..2 {
					let a = p0[axis] - 2.0 * c[axis] + p1[axis];
					let b = 2.0 * (c[axis] - p0[axis]);
					if a.abs() > f64::EPSILON {
						let t = -b / (2.0 * a);
						if t > 0.0 && t < 1.0 {
							points.push(de_casteljau_quadratic(p0, c, p1, t));
						}
					}
				}
				Aabb::from_points(points)
			}
			Segment::Cubic(p0, c1, c2, p1) => {
				let mut points = vec![p0, p1];
				for axis in 0..2 {
					// derivative of cubic bezier per axis is quadratic in t
					let a = -p0[axis] + 3.0 * c1[axis] - 3.0 * c2[axis] + p1[axis];
					let b = 2.0 * (p0[axis] - 2.0 * c1[axis] + c2[axis]);
					let c = c1[axis] - p0[axis];
					for t in solve_quadratic_for_extrema(a, b, c) {
						if t > 0.0 && t < 1.0 {
							points.push(de_casteljau_cubic(p0, c1, c2, p1, t));
						}
					}
				}
				Aabb::from_points(points)
			}
			Segment::Arc { p0, rx, ry, phi, large_arc, sweep, p1 } => match arc_center_parametrization(p0, rx, ry, phi, large_arc, sweep, p1) {
				Some(params) => arc_bounding_box(&params),
				None => Aabb::from_points([p0, p1]),
			},
		}
	}

	/// Structural equality within `eps.point`. Arc equality compares the
	/// center parametrization's rotation too, except when `rx == ry`, where
	/// rotation is irrelevant — a documented open question for rotational
	/// symmetries when `rx == ry` (see the Design Notes) is left unresolved.
	pub fn segments_equal(a: &Segment, b: &Segment, eps: &Epsilons) -> bool {
		let close = |p: Vector, q: Vector| (p - q).length() < eps.point;
		match (a, b) {
			(Segment::Line(a0, a1), Segment::Line(b0, b1)) => close(*a0, *b0) && close(*a1, *b1),
			(Segment::Quadratic(a0, ac, a1), Segment::Quadratic(b0, bc, b1)) => close(*a0, *b0) && close(*ac, *bc) && close(*a1, *b1),
			(Segment::Cubic(a0, ac1, ac2, a1), Segment::Cubic(b0, bc1, bc2, b1)) => close(*a0, *b0) && close(*ac1, *bc1) && close(*ac2, *bc2) && close(*a1, *b1),
			(
				Segment::Arc { p0: a0, rx: arx, ry: ary, phi: aphi, large_arc: alarge, sweep: asweep, p1: a1 },
				Segment::Arc { p0: b0, rx: brx, ry: bry, phi: bphi, large_arc: blarge, sweep: bsweep, p1: b1 },
			) => {
				let radii_close = (arx - brx).abs() < eps.point && (ary - bry).abs() < eps.point;
				// TODO(rotational symmetry): when rx == ry the ellipse is a circle and
				// phi carries no information; pi/2-rotational symmetries of non-circular
				// ellipses are not folded into this comparison either, matching the
				// upstream implementation's known limitation.
				let phi_close = (arx - ary).abs() < eps.point || (aphi - bphi).abs() < eps.point;
				radii_close && phi_close && alarge == blarge && asweep == bsweep && close(*a0, *b0) && close(*a1, *b1)
			}
			_ => false,
		}
	}
}

fn de_casteljau_quadratic(p0: Vector, c: Vector, p1: Vector, t: f64) -> Vector {
	let p01 = p0.lerp(c, t);
	let p12 = c.lerp(p1, t);
	p01.lerp(p12, t)
}

fn de_casteljau_cubic(p0: Vector, c1: Vector, c2: Vector, p1: Vector, t: f64) -> Vector {
	let p01 = p0.lerp(c1, t);
	let p12 = c1.lerp(c2, t);
	let p23 = c2.lerp(p1, t);
	let p012 = p01.lerp(p12, t);
	let p123 = p12.lerp(p23, t);
	p012.lerp(p123, t)
}

/// Roots of `a*t^2 + b*t + c = 0` in no particular order, empty if there are
/// none (including the degenerate linear/constant cases).
fn solve_quadratic_for_extrema(a: f64, b: f64, c: f64) -> Vec<f64> {
	if a.abs() < f64::EPSILON {
		return roots::find_roots_linear(b, c).as_ref().to_vec();
	}
	roots::find_roots_quadratic(a, b, c).as_ref().to_vec()
}

/// SVG 2 endpoint-to-center conversion. Returns `None` when `rx == 0` or
/// `ry == 0`; the caller is expected to treat the arc as a line from `p0` to
/// `p1` in that case.
pub fn arc_center_parametrization(p0: Vector, rx: f64, ry: f64, phi: f64, large_arc: bool, sweep: bool, p1: Vector) -> Option<ArcParams> {
	let rx = rx.abs();
	let ry = ry.abs();
	if rx < f64::EPSILON || ry < f64::EPSILON {
		return None;
	}

	let (sin_phi, cos_phi) = phi.sin_cos();
	let half_delta = (p0 - p1) * 0.5;
	let x1p = cos_phi * half_delta.x + sin_phi * half_delta.y;
	let y1p = -sin_phi * half_delta.x + cos_phi * half_delta.y;

	let mut rx = rx;
	let mut ry = ry;
	let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
	if lambda > 1.0 {
		let s = lambda.sqrt();
		rx *= s;
		ry *= s;
	}

	let rx2 = rx * rx;
	let ry2 = ry * ry;
	let x1p2 = x1p * x1p;
	let y1p2 = y1p * y1p;

	let sign = if large_arc == sweep { -1.0 } else { 1.0 };
	let numerator = (rx2 * ry2 - rx2 * y1p2 - ry2 * x1p2).max(0.0);
	let denominator = rx2 * y1p2 + ry2 * x1p2;
	let co = if denominator < f64::EPSILON { 0.0 } else { sign * (numerator / denominator).sqrt() };

	let cxp = co * (rx * y1p) / ry;
	let cyp = co * (-ry * x1p) / rx;

	let mid = (p0 + p1) * 0.5;
	let center = Vector::new(cos_phi * cxp - sin_phi * cyp + mid.x, sin_phi * cxp + cos_phi * cyp + mid.y);

	let angle = |ux: f64, uy: f64, vx: f64, vy: f64| -> f64 {
		let dot = ux * vx + uy * vy;
		let len = ((ux * ux + uy * uy) * (vx * vx + vy * vy)).sqrt();
		let mut a = (dot / len).clamp(-1.0, 1.0).acos();
		if ux * vy - uy * vx < 0.0 {
			a = -a;
		}
		a
	};

	let theta1 = angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
	let mut delta_theta = angle((x1p - cxp) / rx, (y1p - cyp) / ry, (-x1p - cxp) / rx, (-y1p - cyp) / ry);

	if !sweep && delta_theta > 0.0 {
		delta_theta -= 2.0 * PI;
	} else if sweep && delta_theta < 0.0 {
		delta_theta += 2.0 * PI;
	}

	Some(ArcParams { center, rx, ry, phi, theta1, delta_theta })
}

fn point_on_ellipse(params: &ArcParams, theta: f64) -> Vector {
	let (sin_phi, cos_phi) = params.phi.sin_cos();
	let x = params.rx * theta.cos();
	let y = params.ry * theta.sin();
	Vector::new(params.center.x + cos_phi * x - sin_phi * y, params.center.y + sin_phi * x + cos_phi * y)
}

fn sample_arc(params: &ArcParams, t: f64) -> Vector {
	point_on_ellipse(params, params.theta1 + t * params.delta_theta)
}

/// Splits at `t` by partitioning `delta_theta`; both halves are expressed as
/// `Segment::Arc` (never degrading to lines, since the split halves keep the
/// original non-zero radii).
fn split_arc(params: &ArcParams, t: f64) -> (Segment, Segment) {
	let mid_theta = params.theta1 + t * params.delta_theta;
	let mid_point = point_on_ellipse(params, mid_theta);
	let phi_deg_is_radians = params.phi; // internal representation is radians throughout
	let first = Segment::Arc {
		p0: point_on_ellipse(params, params.theta1),
		rx: params.rx,
		ry: params.ry,
		phi: phi_deg_is_radians,
		large_arc: (t * params.delta_theta).abs() > PI,
		sweep: params.delta_theta > 0.0,
		p1: mid_point,
	};
	let remaining = params.delta_theta - t * params.delta_theta;
	let second = Segment::Arc {
		p0: mid_point,
		rx: params.rx,
		ry: params.ry,
		phi: phi_deg_is_radians,
		large_arc: remaining.abs() > PI,
		sweep: params.delta_theta > 0.0,
		p1: point_on_ellipse(params, params.theta1 + params.delta_theta),
	};
	(first, second)
}

fn arc_bounding_box(params: &ArcParams) -> Aabb {
	let axis_aligned = params.phi.abs() < f64::EPSILON || (params.rx - params.ry).abs() < f64::EPSILON;
	if axis_aligned {
		let mut points = vec![point_on_ellipse(params, params.theta1), point_on_ellipse(params, params.theta1 + params.delta_theta)];
		// The four axis-aligned extrema, in the ellipse's own (unrotated) frame:
		// theta = 0, pi/2, pi, 3pi/2, rotated by phi if phi != 0 (only reached here
		// when rx == ry, so rotation doesn't change the extrema set: still axis-aligned).
		for k in 0..4 {
			let theta = k as f64 * (PI / 2.0);
			if angle_in_sweep(params.theta1, params.delta_theta, theta) {
				points.push(point_on_ellipse(params, theta));
			}
		}
		Aabb::from_points(points)
	} else {
		let cubics = arc_to_cubics(params);
		let mut bbox = Aabb::from_points([params.center]);
		let mut first = true;
		for cubic in cubics {
			let b = cubic.bounding_box();
			bbox = if first {
				first = false;
				b
			} else {
				bbox.union(&b)
			};
		}
		bbox
	}
}

/// Whether angle `theta` (mod 2*pi) lies within the swept interval starting
/// at `theta1` of signed length `delta_theta`.
fn angle_in_sweep(theta1: f64, delta_theta: f64, theta: f64) -> bool {
	let two_pi = 2.0 * PI;
	let normalize = |a: f64| ((a % two_pi) + two_pi) % two_pi;
	let offset = normalize(theta - theta1);
	if delta_theta >= 0.0 {
		offset <= delta_theta.abs() + 1e-12
	} else {
		(two_pi - offset) <= delta_theta.abs() + 1e-12
	}
}

/// Subdivides the arc into `ceil(|delta_theta| / MAX_ARC_CUBIC_DELTA_THETA)`
/// equal arcs and approximates each with a cubic Bézier built in the unit
/// circle with `k = (4/3) tan(theta/4)`, transformed by the center
/// parametrization's rotate-scale-translate.
pub fn arc_to_cubics(params: &ArcParams) -> Vec<Segment> {
	let segment_count = ((params.delta_theta.abs() / MAX_ARC_CUBIC_DELTA_THETA).ceil() as usize).max(1);
	let step = params.delta_theta / segment_count as f64;
	let (sin_phi, cos_phi) = params.phi.sin_cos();

	let transform = |x: f64, y: f64| -> Vector {
		let x = params.rx * x;
		let y = params.ry * y;
		Vector::new(params.center.x + cos_phi * x - sin_phi * y, params.center.y + sin_phi * x + cos_phi * y)
	};

	let mut cubics = Vec::with_capacity(segment_count);
	for i in 0..segment_count {
		let theta0 = params.theta1 + i as f64 * step;
		let theta1 = theta0 + step;
		let k = (4.0 / 3.0) * ((theta1 - theta0) / 4.0).tan();

		let (c0, s0) = (theta0.cos(), theta0.sin());
		let (c1, s1) = (theta1.cos(), theta1.sin());

		let p0 = transform(c0, s0);
		let p1 = transform(c1, s1);
		let c1_unit = (c0 - k * s0, s0 + k * c0);
		let c2_unit = (c1 + k * s1, s1 - k * c1);

		cubics.push(Segment::Cubic(p0, transform(c1_unit.0, c1_unit.1), transform(c2_unit.0, c2_unit.1), p1));
	}
	cubics
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_sample_and_split() {
		let seg = Segment::Line(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0));
		assert!((seg.sample(0.5) - Vector::new(5.0, 0.0)).length() < 1e-9);
		let (a, b) = seg.split(0.25);
		assert_eq!(a, Segment::Line(Vector::new(0.0, 0.0), Vector::new(2.5, 0.0)));
		assert_eq!(b, Segment::Line(Vector::new(2.5, 0.0), Vector::new(10.0, 0.0)));
	}

	#[test]
	fn cubic_bounding_box_includes_extrema() {
		let seg = Segment::Cubic(Vector::new(0.0, 0.0), Vector::new(0.0, 10.0), Vector::new(10.0, 10.0), Vector::new(10.0, 0.0));
		let bbox = seg.bounding_box();
		assert!(bbox.bottom > 7.0);
		assert!(bbox.top == 0.0);
	}

	#[test]
	fn full_circle_arc_round_trips() {
		let p0 = Vector::new(10.0, 0.0);
		let params = arc_center_parametrization(p0, 10.0, 10.0, 0.0, false, true, p0 + Vector::new(1e-9, 0.0));
		assert!(params.is_some());
	}

	#[test]
	fn zero_radius_arc_is_none() {
		let params = arc_center_parametrization(Vector::new(0.0, 0.0), 0.0, 5.0, 0.0, false, true, Vector::new(10.0, 0.0));
		assert!(params.is_none());
	}

	#[test]
	fn arc_reverse_flips_sweep() {
		let seg = Segment::Arc { p0: Vector::new(0.0, 0.0), rx: 5.0, ry: 5.0, phi: 0.0, large_arc: false, sweep: true, p1: Vector::new(10.0, 0.0) };
		let rev = seg.reverse();
		match rev {
			Segment::Arc { p0, sweep, p1, .. } => {
				assert_eq!(p0, Vector::new(10.0, 0.0));
				assert_eq!(p1, Vector::new(0.0, 0.0));
				assert!(!sweep);
			}
			_ => panic!("expected arc"),
		}
	}
}
