//! Recursive scene traversal.
//!
//! Groups without opacity, clip or mask render straight into the current surface. Any of the
//! three isolates the group: it renders into a fresh same-size offscreen in the order
//! clip, children, mask, and is then composited onto its parent with the group opacity.

use crate::{
    foundation::{core::Affine, error::IconResult, math::unit_from_u8},
    geometry::path::build_path,
    render::{
        clip::apply_clip_path,
        mask::apply_mask,
        paint::resolve_paint,
        surface::{CompositeOp, DrawingSurface, StrokeStyle},
    },
    scene::model::{Group, Node, PaintOrder, Path, Tree},
    transform::affine::compose_model,
};

/// Render every top-level node of `tree` onto `surface` under `transform`.
///
/// The root acts as an unnamed group that is never isolated.
pub fn render_tree<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    transform: Affine,
) -> IconResult<()> {
    render_nodes(surface, tree, &tree.children, transform)
}

/// Render `nodes` in order, later nodes on top.
pub fn render_nodes<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    nodes: &[Node],
    ambient: Affine,
) -> IconResult<()> {
    for node in nodes {
        render_node(surface, tree, node, ambient)?;
    }
    Ok(())
}

/// Render one node. The surface transform is restored afterwards.
pub fn render_node<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    node: &Node,
    ambient: Affine,
) -> IconResult<()> {
    let saved = surface.transform();
    let out = match node {
        Node::Group(group) => render_group(surface, tree, group, ambient),
        Node::Path(path) => render_path(surface, tree, path, ambient),
    };
    surface.set_transform(saved);
    out
}

/// Whether a group needs its own offscreen.
pub fn should_isolate(group: &Group, has_clip_path: bool, has_mask: bool) -> bool {
    group.opacity != 255 || has_clip_path || has_mask
}

fn render_group<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    group: &Group,
    ambient: Affine,
) -> IconResult<()> {
    let tr = compose_model(group.transform.as_ref(), ambient);
    let mask = group.mask_idx.map(|idx| tree.mask(idx)).transpose()?;
    let clip = group.clip_path_idx.map(|idx| tree.clip_path(idx)).transpose()?;

    if !should_isolate(group, clip.is_some(), mask.is_some()) {
        return render_nodes(surface, tree, &group.children, tr);
    }

    tracing::debug!(
        opacity = group.opacity,
        clip_path_idx = ?group.clip_path_idx,
        mask_idx = ?group.mask_idx,
        "isolating group"
    );

    let mut layer = surface.offscreen()?;
    if let Some(clip) = clip {
        apply_clip_path(&mut layer, tree, clip, tr)?;
    }
    render_nodes(&mut layer, tree, &group.children, tr)?;
    if let Some(mask) = mask {
        apply_mask(&mut layer, tree, mask, tr)?;
    }

    surface.draw_surface(
        layer,
        CompositeOp::Over {
            opacity: unit_from_u8(group.opacity),
        },
    )
}

fn render_path<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    path: &Path,
    ambient: Affine,
) -> IconResult<()> {
    let geom = build_path(path)?;
    surface.set_transform(ambient);
    tracing::trace!(
        commands = path.commands.len(),
        fill = path.fill.is_some(),
        stroke = path.stroke.is_some(),
        order = ?path.paint_order,
        "paint path"
    );

    let fill = |surface: &mut S| -> IconResult<()> {
        let Some(fill) = &path.fill else {
            return Ok(());
        };
        let paint = resolve_paint(tree, &fill.paint, unit_from_u8(fill.opacity), ambient)?;
        surface.fill_path(&geom, path.rule, &paint)
    };
    let stroke = |surface: &mut S| -> IconResult<()> {
        let Some(stroke) = &path.stroke else {
            return Ok(());
        };
        let paint = resolve_paint(tree, &stroke.paint, unit_from_u8(stroke.opacity), ambient)?;
        surface.stroke_path(&geom, &StrokeStyle::from_model(stroke), &paint)
    };

    match path.paint_order {
        PaintOrder::FillAndStroke => {
            fill(surface)?;
            stroke(surface)
        }
        PaintOrder::StrokeAndFill => {
            stroke(surface)?;
            fill(surface)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/interpreter.rs"]
mod tests;
