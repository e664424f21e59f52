//! Clip-path flattening and application.

use crate::{
    foundation::{
        core::{Affine, BezPath},
        error::IconResult,
    },
    geometry::path::build_path,
    render::surface::DrawingSurface,
    scene::model::{ClipPath, FillRule, Node, Tree},
    transform::affine::compose_model,
};

/// A clip path flattened to device-space geometry and a single fill rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipRegion {
    /// Union of all clip geometry, in device space.
    pub path: BezPath,
    /// `EvenOdd` if any contributing path uses it, `NonZero` otherwise.
    pub rule: FillRule,
}

/// Flatten a clip path's own geometry (not its parent chain) under `ambient`.
///
/// Groups inside the clip contribute only their transform; their opacity, clip and mask are
/// ignored. A surface clip takes a single fill rule, so one even-odd path switches the whole
/// region to even-odd.
pub fn flatten_clip_path(clip: &ClipPath, ambient: Affine) -> IconResult<ClipRegion> {
    let tr = compose_model(clip.transform.as_ref(), ambient);
    let mut region = ClipRegion {
        path: BezPath::new(),
        rule: FillRule::NonZero,
    };
    collect(&clip.children, tr, &mut region)?;
    Ok(region)
}

fn collect(nodes: &[Node], tr: Affine, region: &mut ClipRegion) -> IconResult<()> {
    for node in nodes {
        match node {
            Node::Path(path) => {
                let mut geom = build_path(path)?;
                geom.apply_affine(tr);
                region.path.extend(geom.elements().iter().copied());
                if path.rule == FillRule::EvenOdd {
                    region.rule = FillRule::EvenOdd;
                }
            }
            Node::Group(group) => {
                collect(
                    &group.children,
                    compose_model(group.transform.as_ref(), tr),
                    region,
                )?;
            }
        }
    }
    Ok(())
}

/// Intersect `surface`'s clip with `clip` and its parent chain.
///
/// The parent clip is applied first, under this clip's accumulated transform.
pub fn apply_clip_path<S: DrawingSurface>(
    surface: &mut S,
    tree: &Tree,
    clip: &ClipPath,
    ambient: Affine,
) -> IconResult<()> {
    if let Some(parent_idx) = clip.clip_path_idx {
        let parent = tree.clip_path(parent_idx)?;
        let tr = compose_model(clip.transform.as_ref(), ambient);
        apply_clip_path(surface, tree, parent, tr)?;
    }

    let region = flatten_clip_path(clip, ambient)?;
    tracing::trace!(
        elements = region.path.elements().len(),
        rule = ?region.rule,
        "apply clip path"
    );
    surface.set_transform(Affine::IDENTITY);
    surface.clip_path(&region.path, region.rule)
}

#[cfg(test)]
#[path = "../../tests/unit/render/clip.rs"]
mod tests;
