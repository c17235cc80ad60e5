//! The planar-arrangement pipeline: stages 3–11 of the system overview.
//! Each stage is a module that depends only on the previous ones' output —
//! a straight directed acyclic flow over geometric data, never suspended
//! and never shared across calls (see §5).

pub mod angle;
pub mod dual;
pub mod extract;
pub mod flag;
pub mod major;
pub mod minor;
pub mod nesting;
pub mod prepare;
pub mod prune;

slotmap::new_key_type! {
	/// Handle into a [`major::MajorGraph`]'s vertex pool. Shared by the
	/// minor graph (a minor edge's start/end are branch-vertex handles into
	/// the same pool) since contraction never creates new point locations.
	pub struct VertexId;
	/// Handle into a [`dual::DualGraph`]'s half-edge pool.
	pub struct DualEdgeId;
	/// Handle into a [`dual::DualGraph`]'s face pool.
	pub struct FaceId;
}
