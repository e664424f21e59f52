//! The drawing-surface capability the scene interpreter renders through.

use crate::{
    foundation::{
        core::{Affine, BezPath},
        error::IconResult,
    },
    render::paint::PaintHandle,
    scene::model::{FillRule, LineCap, LineJoin, Stroke},
};

/// How [`DrawingSurface::draw_surface`] combines a source surface with the destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CompositeOp {
    /// Source-over with a global alpha in `[0, 1]`.
    Over {
        /// Global alpha applied to the source.
        opacity: f32,
    },
    /// Keep the destination only where the source has alpha.
    DestinationIn,
}

/// Stroke parameters as a surface consumes them.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in user units.
    pub width: f64,
    /// Miter limit ratio.
    pub miter_limit: f64,
    /// Join style. Never [`LineJoin::MiterClip`].
    pub join: LineJoin,
    /// Cap style.
    pub cap: LineCap,
    /// Even-length dash pattern, empty for a solid line.
    pub dashes: Vec<f64>,
    /// Offset into the dash pattern.
    pub dash_offset: f64,
}

impl StrokeStyle {
    /// Map model stroke parameters to surface stroke parameters.
    ///
    /// `MiterClip` renders as `Miter`. Out-of-range values are ignored the way a canvas
    /// context ignores them: a non-positive width strokes at the default width `1`, and a
    /// non-positive miter limit falls back to `10`. Dash arrays follow canvas `setLineDash`
    /// rules: odd lengths are repeated once, and negative, non-finite or all-zero patterns draw
    /// a solid line.
    pub fn from_model(stroke: &Stroke) -> Self {
        let join = match stroke.linejoin {
            LineJoin::MiterClip => LineJoin::Miter,
            other => other,
        };
        Self {
            width: positive_or(stroke.width, DEFAULT_LINE_WIDTH),
            miter_limit: positive_or(stroke.miterlimit, DEFAULT_MITER_LIMIT),
            join,
            cap: stroke.linecap,
            dashes: normalize_dashes(&stroke.dasharray),
            dash_offset: stroke.dashoffset,
        }
    }
}

const DEFAULT_LINE_WIDTH: f64 = 1.0;
const DEFAULT_MITER_LIMIT: f64 = 10.0;

fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

fn normalize_dashes(dashes: &[f64]) -> Vec<f64> {
    if dashes.iter().any(|d| !d.is_finite() || *d < 0.0) {
        return Vec::new();
    }
    if dashes.iter().sum::<f64>() <= 0.0 {
        return Vec::new();
    }
    let mut out = dashes.to_vec();
    if out.len() % 2 == 1 {
        out.extend_from_slice(dashes);
    }
    out
}

/// A canvas-like raster target.
///
/// Pixels are RGBA8. Clips persist for the lifetime of the surface and only ever shrink.
/// Gradient handles carry their own mapping to device space, so the current transform only
/// maps path geometry.
pub trait DrawingSurface: Sized {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// A new transparent surface of the same size, identity transform and no clip.
    fn offscreen(&self) -> IconResult<Self>;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// The current transform.
    fn transform(&self) -> Affine;

    /// Fill `path` (mapped by the current transform) with `paint`.
    fn fill_path(&mut self, path: &BezPath, rule: FillRule, paint: &PaintHandle)
    -> IconResult<()>;

    /// Stroke `path` (mapped by the current transform) with `paint`.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        style: &StrokeStyle,
        paint: &PaintHandle,
    ) -> IconResult<()>;

    /// Intersect the clip with `path` (mapped by the current transform).
    fn clip_path(&mut self, path: &BezPath, rule: FillRule) -> IconResult<()>;

    /// Composite `src` onto this surface in device space.
    ///
    /// The current transform is ignored; the clip is honored, so pixels outside it are left
    /// untouched.
    fn draw_surface(&mut self, src: Self, op: CompositeOp) -> IconResult<()>;

    /// Read back straight (non-premultiplied) RGBA8 pixels.
    fn read_pixels(&mut self) -> IconResult<Vec<u8>>;

    /// Replace all pixels with straight RGBA8 data.
    fn write_pixels(&mut self, rgba: &[u8]) -> IconResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
