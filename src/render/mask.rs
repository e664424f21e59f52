//! Mask rendering and application.

use kurbo::Shape;

use crate::{
    foundation::{core::Affine, error::IconResult},
    render::{
        composite::luminance_to_alpha_in_place,
        interpreter::render_nodes,
        surface::{CompositeOp, DrawingSurface},
    },
    scene::model::{FillRule, Mask, MaskType, Tree},
};

/// Multiply `target`'s alpha by `mask` (and its parent chain) rendered under `ambient`.
///
/// A mask without children leaves the target untouched. Otherwise the mask content is rendered
/// into an offscreen clipped to the mask rectangle, converted to coverage (luminance or alpha)
/// and composited onto the target with destination-in.
pub fn apply_mask<S: DrawingSurface>(
    target: &mut S,
    tree: &Tree,
    mask: &Mask,
    ambient: Affine,
) -> IconResult<()> {
    if mask.children.is_empty() {
        return Ok(());
    }

    if let Some(parent_idx) = mask.mask_idx {
        apply_mask(target, tree, tree.mask(parent_idx)?, ambient)?;
    }

    let rect = mask.rect();
    tracing::debug!(
        x0 = rect.x0,
        y0 = rect.y0,
        x1 = rect.x1,
        y1 = rect.y1,
        kind = ?mask.mask_type,
        "render mask"
    );

    let mut layer = target.offscreen()?;
    layer.set_transform(ambient);
    layer.clip_path(&rect.to_path(0.1), FillRule::NonZero)?;
    render_nodes(&mut layer, tree, &mask.children, ambient)?;

    if mask.mask_type == MaskType::Luminance {
        let mut rgba = layer.read_pixels()?;
        luminance_to_alpha_in_place(&mut rgba);
        layer.write_pixels(&rgba)?;
    }

    target.draw_surface(layer, CompositeOp::DestinationIn)
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
