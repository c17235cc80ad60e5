//! A `Path` is just an ordered list of segments. The adapters in this module
//! — `pathFromCommands`/`pathToCommands` — are the "not in core" boundary
//! described in §1: they translate between a structured, SVG-flavored
//! command stream and the canonical segment list the arrangement pipeline
//! consumes. String tokenization lives in [`crate::path_data`] behind the
//! `parsing` feature.

use crate::error::PathBoolError;
use crate::segment::{Segment, Vector};

/// An ordered list of segments. Discontinuities (explicit move-tos) are not
/// represented structurally — they are inferred downstream by comparing
/// consecutive segments' endpoints (see [`path_to_commands`]).
pub type Path = Vec<Segment>;

/// A single SVG-flavored path command, already in canonical (non-relative,
/// non-shorthand) form. Tokenizing `M`/`m`, `H`/`V`, `S`/`T`, and relative
/// variants out of raw path data is the string adapter's job
/// ([`crate::path_data`]), not this type's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
	MoveTo(Vector),
	LineTo(Vector),
	QuadTo(Vector, Vector),
	CubicTo(Vector, Vector, Vector),
	/// `phi_deg` is in degrees, matching the wire format in §6.
	ArcTo { rx: f64, ry: f64, phi_deg: f64, large_arc: bool, sweep: bool, to: Vector },
	/// Closes the current sub-path back to its starting point with an
	/// explicit line segment.
	Close,
}

/// Materializes a [`Path`] from a command stream.
///
/// Errors with [`PathBoolError::BadPathSequence`] if the stream contains a
/// segment or a `Close` before any `MoveTo`, matching §7's "command
/// sequence that begins without a move-to, or a close with no open
/// sub-path" error kind.
pub fn path_from_commands(commands: impl IntoIterator<Item = PathCommand>) -> Result<Path, PathBoolError> {
	let mut path = Path::new();
	let mut current: Option<Vector> = None;
	let mut subpath_start: Option<Vector> = None;

	for command in commands {
		match command {
			PathCommand::MoveTo(p) => {
				current = Some(p);
				subpath_start = Some(p);
			}
			PathCommand::LineTo(p1) => {
				let p0 = current.ok_or(PathBoolError::BadPathSequence)?;
				path.push(Segment::Line(p0, p1));
				current = Some(p1);
			}
			PathCommand::QuadTo(c, p1) => {
				let p0 = current.ok_or(PathBoolError::BadPathSequence)?;
				path.push(Segment::Quadratic(p0, c, p1));
				current = Some(p1);
			}
			PathCommand::CubicTo(c1, c2, p1) => {
				let p0 = current.ok_or(PathBoolError::BadPathSequence)?;
				path.push(Segment::Cubic(p0, c1, c2, p1));
				current = Some(p1);
			}
			PathCommand::ArcTo { rx, ry, phi_deg, large_arc, sweep, to } => {
				let p0 = current.ok_or(PathBoolError::BadPathSequence)?;
				path.push(Segment::Arc { p0, rx, ry, phi: phi_deg.to_radians(), large_arc, sweep, p1: to });
				current = Some(to);
			}
			PathCommand::Close => {
				let p0 = current.ok_or(PathBoolError::BadPathSequence)?;
				let start = subpath_start.ok_or(PathBoolError::BadPathSequence)?;
				path.push(Segment::Line(p0, start));
				current = Some(start);
			}
		}
	}

	Ok(path)
}

/// Re-derives a command stream from a [`Path`], inserting an implicit
/// `MoveTo` whenever consecutive segments' joint points differ by more than
/// `eps` (i.e. wherever the input path had a gap the producer didn't encode
/// structurally).
pub fn path_to_commands(path: &Path, eps: f64) -> Vec<PathCommand> {
	let mut commands = Vec::with_capacity(path.len() + 1);
	let mut last_end: Option<Vector> = None;

	for segment in path {
		let start = segment.start();
		let needs_move = match last_end {
			Some(end) => (end - start).length() > eps,
			None => true,
		};
		if needs_move {
			commands.push(PathCommand::MoveTo(start));
		}
		commands.push(match *segment {
			Segment::Line(_, p1) => PathCommand::LineTo(p1),
			Segment::Quadratic(_, c, p1) => PathCommand::QuadTo(c, p1),
			Segment::Cubic(_, c1, c2, p1) => PathCommand::CubicTo(c1, c2, p1),
			Segment::Arc { rx, ry, phi, large_arc, sweep, p1, .. } => PathCommand::ArcTo { rx, ry, phi_deg: phi.to_degrees(), large_arc, sweep, to: p1 },
		});
		last_end = Some(segment.end());
	}

	commands
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn close_emits_explicit_line_back_to_start() {
		let commands = vec![
			PathCommand::MoveTo(Vector::new(0.0, 0.0)),
			PathCommand::LineTo(Vector::new(10.0, 0.0)),
			PathCommand::LineTo(Vector::new(10.0, 10.0)),
			PathCommand::Close,
		];
		let path = path_from_commands(commands).unwrap();
		assert_eq!(path.len(), 3);
		assert_eq!(path[2], Segment::Line(Vector::new(10.0, 10.0), Vector::new(0.0, 0.0)));
	}

	#[test]
	fn segment_without_move_to_is_an_error() {
		let commands = vec![PathCommand::LineTo(Vector::new(1.0, 1.0))];
		assert_eq!(path_from_commands(commands), Err(PathBoolError::BadPathSequence));
	}

	#[test]
	fn close_without_move_to_is_an_error() {
		assert_eq!(path_from_commands(vec![PathCommand::Close]), Err(PathBoolError::BadPathSequence));
	}

	#[test]
	fn round_trip_inserts_move_only_at_gaps() {
		let path = vec![
			Segment::Line(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)),
			Segment::Line(Vector::new(10.0, 0.0), Vector::new(10.0, 10.0)),
			Segment::Line(Vector::new(50.0, 50.0), Vector::new(60.0, 60.0)),
		];
		let commands = path_to_commands(&path, 1e-9);
		// One move at the very start, one more at the gap before the third segment.
		assert_eq!(commands.iter().filter(|c| matches!(c, PathCommand::MoveTo(_))).count(), 2);
	}
}
