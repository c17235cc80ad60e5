//! String tokenization and formatting for SVG path data. Per §1, string
//! parsing is explicitly an "external collaborator" concern — a
//! straightforward adapter, not part of the core arrangement pipeline —
//! gated behind the `parsing` Cargo feature (which also gates the
//! `logging` feature, matching the upstream crate's feature table).

use crate::error::PathBoolError;
use crate::path::{Path, PathCommand, path_from_commands, path_to_commands};
use crate::segment::Vector;
use regex::Regex;
use std::sync::OnceLock;

fn number_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?").unwrap())
}

fn command_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"[MmLlHhVvCcSsQqTtAaZz]").unwrap())
}

enum Token {
	Cmd(char),
	Num(f64),
}

fn tokenize(data: &str) -> Vec<Token> {
	let cmd_re = command_regex();
	let num_re = number_regex();
	let mut tokens = Vec::new();
	let mut pos = 0usize;
	while pos < data.len() {
		let rest = &data[pos..];
		let trimmed_offset = rest.find(|c: char| !c.is_whitespace() && c != ',').unwrap_or(rest.len());
		pos += trimmed_offset;
		if pos >= data.len() {
			break;
		}
		let rest = &data[pos..];
		if let Some(m) = cmd_re.find(rest) {
			if m.start() == 0 {
				tokens.push(Token::Cmd(rest.as_bytes()[0] as char));
				pos += 1;
				continue;
			}
		}
		if let Some(m) = num_re.find(rest) {
			if m.start() == 0 {
				if let Ok(value) = m.as_str().parse::<f64>() {
					tokens.push(Token::Num(value));
				}
				pos += m.end();
				continue;
			}
		}
		// Unrecognized character: skip it rather than failing the whole parse,
		// matching the "straightforward adapter" scope of this module.
		pos += 1;
	}
	tokens
}

/// Parses raw SVG path data into a [`Path`], converting M/Z/H/V/S/T and
/// relative forms into the canonical segment representation along the way.
pub fn path_from_path_data(data: &str) -> Result<Path, PathBoolError> {
	let tokens = tokenize(data);
	let mut commands = Vec::new();

	let mut current = Vector::new(0.0, 0.0);
	let mut subpath_start = Vector::new(0.0, 0.0);
	let mut last_cubic_reflection: Option<Vector> = None;
	let mut last_quad_reflection: Option<Vector> = None;

	let mut i = 0usize;
	let mut active_cmd: Option<char> = None;

	let take_num = |tokens: &[Token], i: &mut usize| -> Option<f64> {
		match tokens.get(*i) {
			Some(Token::Num(v)) => {
				*i += 1;
				Some(*v)
			}
			_ => None,
		}
	};

	while i < tokens.len() {
		match tokens[i] {
			Token::Cmd(c) => {
				if c == 'Z' || c == 'z' {
					commands.push(PathCommand::Close);
					current = subpath_start;
					last_cubic_reflection = None;
					last_quad_reflection = None;
				}
				active_cmd = Some(c);
				i += 1;
			}
			Token::Num(_) => {
				let cmd = match active_cmd {
					Some(c) => c,
					None => return Err(PathBoolError::BadPathSequence),
				};
				match cmd {
					'M' | 'm' => {
						let x = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let y = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let p = if cmd == 'm' { current + Vector::new(x, y) } else { Vector::new(x, y) };
						current = p;
						subpath_start = p;
						commands.push(PathCommand::MoveTo(p));
						// Subsequent coordinate pairs after an initial M/m are implicit L/l.
						active_cmd = Some(if cmd == 'm' { 'l' } else { 'L' });
						last_cubic_reflection = None;
						last_quad_reflection = None;
					}
					'L' | 'l' => {
						let x = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let y = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let p = if cmd == 'l' { current + Vector::new(x, y) } else { Vector::new(x, y) };
						commands.push(PathCommand::LineTo(p));
						current = p;
						last_cubic_reflection = None;
						last_quad_reflection = None;
					}
					'H' | 'h' => {
						let x = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let p = if cmd == 'h' { Vector::new(current.x + x, current.y) } else { Vector::new(x, current.y) };
						commands.push(PathCommand::LineTo(p));
						current = p;
						last_cubic_reflection = None;
						last_quad_reflection = None;
					}
					'V' | 'v' => {
						let y = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let p = if cmd == 'v' { Vector::new(current.x, current.y + y) } else { Vector::new(current.x, y) };
						commands.push(PathCommand::LineTo(p));
						current = p;
						last_cubic_reflection = None;
						last_quad_reflection = None;
					}
					'C' | 'c' => {
						let mut nums = [0.0; 6];
						for n in &mut nums {
							*n = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						}
						let (c1, c2, p1) = if cmd == 'c' {
							(current + Vector::new(nums[0], nums[1]), current + Vector::new(nums[2], nums[3]), current + Vector::new(nums[4], nums[5]))
						} else {
							(Vector::new(nums[0], nums[1]), Vector::new(nums[2], nums[3]), Vector::new(nums[4], nums[5]))
						};
						commands.push(PathCommand::CubicTo(c1, c2, p1));
						last_cubic_reflection = Some(2.0 * p1 - c2);
						last_quad_reflection = None;
						current = p1;
					}
					'S' | 's' => {
						let mut nums = [0.0; 4];
						for n in &mut nums {
							*n = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						}
						let (c2, p1) = if cmd == 's' { (current + Vector::new(nums[0], nums[1]), current + Vector::new(nums[2], nums[3])) } else { (Vector::new(nums[0], nums[1]), Vector::new(nums[2], nums[3])) };
						let c1 = last_cubic_reflection.unwrap_or(current);
						commands.push(PathCommand::CubicTo(c1, c2, p1));
						last_cubic_reflection = Some(2.0 * p1 - c2);
						last_quad_reflection = None;
						current = p1;
					}
					'Q' | 'q' => {
						let mut nums = [0.0; 4];
						for n in &mut nums {
							*n = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						}
						let (c, p1) = if cmd == 'q' { (current + Vector::new(nums[0], nums[1]), current + Vector::new(nums[2], nums[3])) } else { (Vector::new(nums[0], nums[1]), Vector::new(nums[2], nums[3])) };
						commands.push(PathCommand::QuadTo(c, p1));
						last_quad_reflection = Some(2.0 * p1 - c);
						last_cubic_reflection = None;
						current = p1;
					}
					'T' | 't' => {
						let mut nums = [0.0; 2];
						for n in &mut nums {
							*n = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						}
						let p1 = if cmd == 't' { current + Vector::new(nums[0], nums[1]) } else { Vector::new(nums[0], nums[1]) };
						let c = last_quad_reflection.unwrap_or(current);
						commands.push(PathCommand::QuadTo(c, p1));
						last_quad_reflection = Some(2.0 * p1 - c);
						last_cubic_reflection = None;
						current = p1;
					}
					'A' | 'a' => {
						let rx = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let ry = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let phi_deg = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let large_arc = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)? != 0.0;
						let sweep = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)? != 0.0;
						let x = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let y = take_num(&tokens, &mut i).ok_or(PathBoolError::BadPathSequence)?;
						let to = if cmd == 'a' { current + Vector::new(x, y) } else { Vector::new(x, y) };
						commands.push(PathCommand::ArcTo { rx, ry, phi_deg, large_arc, sweep, to });
						last_cubic_reflection = None;
						last_quad_reflection = None;
						current = to;
					}
					_ => return Err(PathBoolError::BadPathSequence),
				}
			}
		}
	}

	path_from_commands(commands)
}

/// Formats a [`Path`] as an SVG path-data string using absolute commands,
/// inserting `M` wherever [`path_to_commands`] would insert an implicit
/// move.
pub fn path_to_path_data(path: &Path, eps: f64) -> String {
	let mut out = String::new();
	for command in path_to_commands(path, eps) {
		match command {
			PathCommand::MoveTo(p) => out.push_str(&format!("M{} {} ", p.x, p.y)),
			PathCommand::LineTo(p) => out.push_str(&format!("L{} {} ", p.x, p.y)),
			PathCommand::QuadTo(c, p) => out.push_str(&format!("Q{} {} {} {} ", c.x, c.y, p.x, p.y)),
			PathCommand::CubicTo(c1, c2, p) => out.push_str(&format!("C{} {} {} {} {} {} ", c1.x, c1.y, c2.x, c2.y, p.x, p.y)),
			PathCommand::ArcTo { rx, ry, phi_deg, large_arc, sweep, to } => {
				out.push_str(&format!("A{} {} {} {} {} {} {} ", rx, ry, phi_deg, large_arc as u8, sweep as u8, to.x, to.y))
			}
			PathCommand::Close => out.push_str("Z "),
		}
	}
	out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::segment::Segment;

	#[test]
	fn parses_simple_closed_triangle() {
		let path = path_from_path_data("M0,0 L10,0 L10,10 Z").unwrap();
		assert_eq!(path.len(), 3);
		assert_eq!(path[0], Segment::Line(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0)));
		assert_eq!(path[2], Segment::Line(Vector::new(10.0, 10.0), Vector::new(0.0, 0.0)));
	}

	#[test]
	fn relative_lineto_is_offset_from_current_point() {
		let path = path_from_path_data("M5,5 l10,0 l0,10").unwrap();
		assert_eq!(path[0].end(), Vector::new(15.0, 5.0));
		assert_eq!(path[1].end(), Vector::new(15.0, 15.0));
	}

	#[test]
	fn round_trips_through_formatting() {
		let path = path_from_path_data("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
		let data = path_to_path_data(&path, 1e-9);
		let reparsed = path_from_path_data(&data).unwrap();
		assert_eq!(path.len(), reparsed.len());
	}
}
