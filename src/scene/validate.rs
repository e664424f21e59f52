use crate::{
    foundation::error::{IconError, IconResult},
    scene::model::{Node, Paint, Path, Stroke, Transform, Tree},
};

impl Tree {
    /// Check that the tree can be rendered.
    ///
    /// Rejects dangling resource indices, cyclic clip-path or mask chains, diff streams that are
    /// too short for their command lists and non-finite numbers. Rendering entry points call this
    /// before drawing anything.
    pub fn validate(&self) -> IconResult<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = v
                && (!v.is_finite() || v < 0.0)
            {
                return Err(IconError::validation(format!(
                    "tree {name} must be finite and >= 0, got {v}"
                )));
            }
        }

        for (i, g) in self.linear_gradients.iter().enumerate() {
            validate_transform(g.transform.as_ref(), &format!("linear_gradients[{i}]"))?;
            finite_all(
                &[g.x1, g.y1, g.x2, g.y2],
                &format!("linear_gradients[{i}] endpoints"),
            )?;
            validate_stops(&g.stops, &format!("linear_gradients[{i}]"))?;
        }
        for (i, g) in self.radial_gradients.iter().enumerate() {
            validate_transform(g.transform.as_ref(), &format!("radial_gradients[{i}]"))?;
            finite_all(
                &[g.fx, g.fy, g.cx, g.cy, g.r],
                &format!("radial_gradients[{i}] geometry"),
            )?;
            validate_stops(&g.stops, &format!("radial_gradients[{i}]"))?;
        }

        self.validate_nodes(&self.children, "children")?;

        for (i, clip) in self.clip_paths.iter().enumerate() {
            let at = format!("clip_paths[{i}]");
            validate_transform(clip.transform.as_ref(), &at)?;
            if let Some(parent) = clip.clip_path_idx {
                self.clip_path(parent)?;
            }
            self.validate_nodes(&clip.children, &at)?;
        }
        for (i, mask) in self.masks.iter().enumerate() {
            let at = format!("masks[{i}]");
            finite_all(
                &[mask.left, mask.top, mask.width, mask.height].map(|v| v.unwrap_or(0.0)),
                &format!("{at} rect"),
            )?;
            if let Some(parent) = mask.mask_idx {
                self.mask(parent)?;
            }
            self.validate_nodes(&mask.children, &at)?;
        }

        self.check_clip_chains()?;
        self.check_mask_graph()?;
        Ok(())
    }

    fn validate_nodes(&self, nodes: &[Node], at: &str) -> IconResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            let at = format!("{at}[{i}]");
            match node {
                Node::Group(g) => {
                    validate_transform(g.transform.as_ref(), &at)?;
                    if let Some(idx) = g.clip_path_idx {
                        self.clip_path(idx)?;
                    }
                    if let Some(idx) = g.mask_idx {
                        self.mask(idx)?;
                    }
                    self.validate_nodes(&g.children, &at)?;
                }
                Node::Path(p) => self.validate_path(p, &at)?,
            }
        }
        Ok(())
    }

    fn validate_path(&self, path: &Path, at: &str) -> IconResult<()> {
        if !path.step.is_finite() {
            return Err(IconError::validation(format!("{at}: path step must be finite")));
        }

        let needed = required_diffs(path);
        if path.diffs.len() < needed {
            return Err(IconError::validation(format!(
                "{at}: path needs {needed} diffs for {} commands, got {}",
                path.commands.len(),
                path.diffs.len()
            )));
        }

        if let Some(fill) = &path.fill {
            self.validate_paint(fill.paint, at)?;
        }
        if let Some(stroke) = &path.stroke {
            self.validate_paint(stroke.paint, at)?;
            validate_stroke(stroke, at)?;
        }
        Ok(())
    }

    fn validate_paint(&self, paint: Paint, at: &str) -> IconResult<()> {
        let (kind, idx, len) = match paint {
            Paint::RgbColor(_) => return Ok(()),
            Paint::LinearGradient(idx) => ("linear", idx, self.linear_gradients.len()),
            Paint::RadialGradient(idx) => ("radial", idx, self.radial_gradients.len()),
        };
        if idx >= len {
            return Err(IconError::validation(format!(
                "{at}: {kind} gradient index {idx} out of range (have {len})"
            )));
        }
        Ok(())
    }

    fn check_clip_chains(&self) -> IconResult<()> {
        for start in 0..self.clip_paths.len() {
            let mut seen = vec![false; self.clip_paths.len()];
            let mut cur = Some(start);
            while let Some(idx) = cur {
                if std::mem::replace(&mut seen[idx], true) {
                    return Err(IconError::validation(format!(
                        "clip path chain starting at {start} is cyclic"
                    )));
                }
                cur = self.clip_paths[idx].clip_path_idx;
            }
        }
        Ok(())
    }

    /// A mask depends on its parent mask and on every mask referenced by groups in its content.
    fn check_mask_graph(&self) -> IconResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        fn deps(nodes: &[Node], out: &mut Vec<usize>) {
            for node in nodes {
                if let Node::Group(g) = node {
                    out.extend(g.mask_idx);
                    deps(&g.children, out);
                }
            }
        }

        fn visit(tree: &Tree, idx: usize, marks: &mut [Mark]) -> IconResult<()> {
            match marks[idx] {
                Mark::Done => return Ok(()),
                Mark::Active => {
                    return Err(IconError::validation(format!(
                        "mask {idx} depends on itself"
                    )));
                }
                Mark::Unvisited => {}
            }
            marks[idx] = Mark::Active;

            let mask = &tree.masks[idx];
            let mut next: Vec<usize> = mask.mask_idx.into_iter().collect();
            deps(&mask.children, &mut next);
            for dep in next {
                visit(tree, dep, marks)?;
            }

            marks[idx] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.masks.len()];
        for idx in 0..self.masks.len() {
            visit(self, idx, &mut marks)?;
        }
        Ok(())
    }
}

/// Number of diffs a path's command list consumes, including the implicit start point.
pub(crate) fn required_diffs(path: &Path) -> usize {
    if path.commands.is_empty() {
        return 0;
    }
    2 + path
        .commands
        .iter()
        .map(|c| c.diff_count())
        .sum::<usize>()
}

fn validate_transform(t: Option<&Transform>, at: &str) -> IconResult<()> {
    match t {
        Some(t) => finite_all(&t.coeffs(), &format!("{at} transform")),
        None => Ok(()),
    }
}

fn validate_stops(stops: &[crate::scene::model::Stop], at: &str) -> IconResult<()> {
    for (i, s) in stops.iter().enumerate() {
        if !s.offset.is_finite() {
            return Err(IconError::validation(format!(
                "{at}.stops[{i}] offset must be finite"
            )));
        }
        if !(0.0..=1.0).contains(&s.offset) {
            return Err(IconError::validation(format!(
                "{at}.stops[{i}] offset {} is outside [0, 1]",
                s.offset
            )));
        }
    }
    Ok(())
}

fn validate_stroke(stroke: &Stroke, at: &str) -> IconResult<()> {
    finite_all(
        &[stroke.width, stroke.miterlimit, stroke.dashoffset],
        &format!("{at} stroke"),
    )?;
    if stroke.width < 0.0 {
        return Err(IconError::validation(format!(
            "{at}: stroke width must be >= 0"
        )));
    }
    Ok(())
}

fn finite_all(values: &[f64], what: &str) -> IconResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(IconError::validation(format!("{what} must be finite")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/validate.rs"]
mod tests;
