//! Delta-encoded path reconstruction.

use crate::{
    foundation::{
        core::{BezPath, PathEl, Point, Vec2},
        error::{IconError, IconResult},
    },
    scene::model::{Path, PathCommand},
};

/// Rebuild the absolute geometry of a path node.
pub fn build_path(path: &Path) -> IconResult<BezPath> {
    build_path_from_parts(&path.commands, &path.diffs, path.step)
}

/// Rebuild absolute geometry from a command list and its delta stream.
///
/// The first two deltas are the absolute start point. Every following delta is scaled by
/// `step` (`0` means `1`) and accumulated onto a running cursor, strictly left to right.
/// `Close` does not reset the cursor, but the next drawing command starts from the subpath
/// start.
pub fn build_path_from_parts(
    commands: &[PathCommand],
    diffs: &[i32],
    step: f64,
) -> IconResult<BezPath> {
    let mut out = BezPath::new();
    if commands.is_empty() && diffs.is_empty() {
        return Ok(out);
    }

    let step = if step == 0.0 { 1.0 } else { step };
    let mut reader = DiffReader {
        diffs,
        pos: 0,
        step,
    };

    let mut cursor = reader.point()?;
    out.move_to(cursor);
    let mut subpath_start = cursor;
    let mut closed = false;

    for &cmd in commands {
        if closed && cmd != PathCommand::Move && cmd != PathCommand::Close {
            out.move_to(subpath_start);
        }
        closed = false;

        match cmd {
            PathCommand::Move => {
                cursor += reader.delta()?;
                out.move_to(cursor);
                subpath_start = cursor;
            }
            PathCommand::Line => {
                cursor += reader.delta()?;
                out.line_to(cursor);
            }
            PathCommand::Quad => {
                let ctrl = cursor + reader.delta()?;
                cursor = ctrl + reader.delta()?;
                out.quad_to(ctrl, cursor);
            }
            PathCommand::Cubic => {
                let c1 = cursor + reader.delta()?;
                let c2 = c1 + reader.delta()?;
                cursor = c2 + reader.delta()?;
                out.curve_to(c1, c2, cursor);
            }
            PathCommand::Close => {
                out.close_path();
                closed = true;
            }
        }
    }

    if reader.pos < diffs.len() {
        tracing::trace!(
            unused = diffs.len() - reader.pos,
            "path diff stream has trailing entries"
        );
    }
    Ok(out)
}

struct DiffReader<'a> {
    diffs: &'a [i32],
    pos: usize,
    step: f64,
}

impl DiffReader<'_> {
    fn delta(&mut self) -> IconResult<Vec2> {
        Ok(self.point()?.to_vec2())
    }

    fn point(&mut self) -> IconResult<Point> {
        let pair = self.diffs.get(self.pos..self.pos + 2).ok_or_else(|| {
            IconError::validation(format!(
                "path diff stream exhausted at index {} (len {})",
                self.pos,
                self.diffs.len()
            ))
        })?;
        self.pos += 2;
        Ok(Point::new(
            f64::from(pair[0]) * self.step,
            f64::from(pair[1]) * self.step,
        ))
    }
}

/// Encode absolute geometry into a command list and delta stream at `step`.
///
/// Coordinates are quantized to multiples of `step`. The cursor follows the quantized points so
/// that [`build_path_from_parts`] reproduces them exactly.
pub fn encode_path(path: &BezPath, step: f64) -> (Vec<PathCommand>, Vec<i32>) {
    let step = if step == 0.0 { 1.0 } else { step };
    let mut commands = Vec::new();
    let mut diffs = Vec::new();
    let mut cursor: Option<(i64, i64)> = None;

    let push = |p: Point, diffs: &mut Vec<i32>, cursor: &mut Option<(i64, i64)>| {
        let q = ((p.x / step).round() as i64, (p.y / step).round() as i64);
        let (bx, by) = cursor.unwrap_or((0, 0));
        diffs.push((q.0 - bx) as i32);
        diffs.push((q.1 - by) as i32);
        *cursor = Some(q);
    };

    if !matches!(path.elements().first(), None | Some(PathEl::MoveTo(_))) {
        push(Point::ORIGIN, &mut diffs, &mut cursor);
    }

    for (i, el) in path.elements().iter().enumerate() {
        match *el {
            PathEl::MoveTo(p) => {
                if i > 0 {
                    commands.push(PathCommand::Move);
                }
                push(p, &mut diffs, &mut cursor);
            }
            PathEl::LineTo(p) => {
                commands.push(PathCommand::Line);
                push(p, &mut diffs, &mut cursor);
            }
            PathEl::QuadTo(p1, p2) => {
                commands.push(PathCommand::Quad);
                push(p1, &mut diffs, &mut cursor);
                push(p2, &mut diffs, &mut cursor);
            }
            PathEl::CurveTo(p1, p2, p3) => {
                commands.push(PathCommand::Cubic);
                push(p1, &mut diffs, &mut cursor);
                push(p2, &mut diffs, &mut cursor);
                push(p3, &mut diffs, &mut cursor);
            }
            PathEl::ClosePath => commands.push(PathCommand::Close),
        }
    }

    (commands, diffs)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/path.rs"]
mod tests;
