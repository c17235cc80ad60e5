//! Process-wide numeric tolerances used throughout the arrangement pipeline.
//!
//! Kept as a plain, explicitly-threaded value rather than global mutable
//! state (see the Design Notes on global state): every function that needs a
//! tolerance takes `&Epsilons` as a parameter.

/// Numeric tolerances consumed by every stage of the pipeline.
///
/// There is no ad-hoc epsilon anywhere else in the crate except the
/// `1e-12` divide-by-zero guard in cubic self-intersection and the
/// `64 * f64::MIN_POSITIVE` collinearity guard in line-line intersection,
/// both of which are guards against exact degeneracy rather than tunable
/// tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epsilons {
	/// Radius within which two endpoints are snapped to the same vertex.
	pub point: f64,
	/// Bounding-box extent below which a curved segment is treated as a line
	/// during bisection-based segment intersection.
	pub linear: f64,
	/// Tolerance on intersection parameters `s, t` and on angular-order
	/// sampling offsets.
	pub param: f64,
}

impl Epsilons {
	/// The tolerances used by default, and by every public entry point
	/// unless a caller supplies its own `Epsilons`.
	pub const DEFAULT: Epsilons = Epsilons { point: 1e-6, linear: 1e-4, param: 1e-8 };
}

impl Default for Epsilons {
	fn default() -> Self {
		Self::DEFAULT
	}
}
