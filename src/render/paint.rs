//! Paint resolution: model paints to surface paint handles.

use crate::{
    foundation::{
        core::{Affine, Point},
        error::IconResult,
        math::{u8_from_unit, unit_from_u8},
    },
    scene::model::{Paint, Stop, Tree},
    transform::affine::from_model,
};

/// A straight-alpha color with fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub alpha: f32,
}

impl PaintColor {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        alpha: 0.0,
    };

    /// Unpack a `0xRRGGBB` color with the given alpha.
    pub fn from_packed(rgb: u32, alpha: f32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Straight RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, u8_from_unit(self.alpha)]
    }
}

/// A color stop of a resolved gradient ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub offset: f32,
    /// Stop color with the paint opacity already folded into its alpha.
    pub color: PaintColor,
}

/// Linear ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearRamp {
    /// Point where the ramp parameter is `0`, in the painted path's user space.
    pub start: Point,
    /// Point where the ramp parameter is `1`, in the painted path's user space.
    pub end: Point,
    /// Maps the ramp geometry to device space.
    pub transform: Affine,
    /// Color stops ordered by offset.
    pub stops: Vec<GradientStop>,
}

/// Two-circle radial ramp, from a zero-radius focal circle to the outer circle.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialRamp {
    /// Focal point (start circle with radius `0`).
    pub focal: Point,
    /// Center of the end circle.
    pub center: Point,
    /// Radius of the end circle. Always positive.
    pub radius: f64,
    /// Maps the ramp geometry to device space.
    pub transform: Affine,
    /// Color stops ordered by offset.
    pub stops: Vec<GradientStop>,
}

/// A paint ready to hand to a drawing surface.
///
/// Gradient geometry lives in the painted path's user space; the ramp's own `transform` maps it
/// to device space, whatever the surface transform is at paint time.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintHandle {
    /// Flat color.
    Solid(PaintColor),
    /// Linear gradient.
    Linear(LinearRamp),
    /// Radial gradient.
    Radial(RadialRamp),
}

impl PaintHandle {
    /// The flat color of a solid handle.
    pub fn as_solid(&self) -> Option<PaintColor> {
        match self {
            Self::Solid(c) => Some(*c),
            _ => None,
        }
    }
}

/// Resolve a model paint under `ambient`.
///
/// `opacity` is the paint's own opacity in `[0, 1]`. Gradients with a single stop collapse to a
/// flat color; gradients without stops, with coincident linear endpoints or with a non-positive
/// radius paint nothing.
///
/// Gradient points are mapped through the gradient's own transform, and the ramp carries
/// `ambient` as its device mapping. The radial radius is scaled by the average of the gradient
/// transform's `a` and `d` coefficients.
pub fn resolve_paint(
    tree: &Tree,
    paint: &Paint,
    opacity: f32,
    ambient: Affine,
) -> IconResult<PaintHandle> {
    match *paint {
        Paint::RgbColor(rgb) => Ok(PaintHandle::Solid(PaintColor::from_packed(rgb, opacity))),
        Paint::LinearGradient(idx) => {
            let g = tree.linear_gradient(idx)?;
            if let Some(flat) = collapse_stops(&g.stops, opacity) {
                return Ok(PaintHandle::Solid(flat));
            }
            let own = from_model(g.transform.as_ref());
            let start = own * Point::new(g.x1, g.y1);
            let end = own * Point::new(g.x2, g.y2);
            if start == end {
                return Ok(PaintHandle::Solid(PaintColor::TRANSPARENT));
            }
            Ok(PaintHandle::Linear(LinearRamp {
                start,
                end,
                transform: ambient,
                stops: ramp_stops(&g.stops, opacity),
            }))
        }
        Paint::RadialGradient(idx) => {
            let g = tree.radial_gradient(idx)?;
            if let Some(flat) = collapse_stops(&g.stops, opacity) {
                return Ok(PaintHandle::Solid(flat));
            }
            let own = from_model(g.transform.as_ref());
            let [a, _, _, d, _, _] = own.as_coeffs();
            let radius = g.r * (a + d) / 2.0;
            if radius.is_nan() || radius <= 0.0 {
                return Ok(PaintHandle::Solid(PaintColor::TRANSPARENT));
            }
            Ok(PaintHandle::Radial(RadialRamp {
                focal: own * Point::new(g.fx, g.fy),
                center: own * Point::new(g.cx, g.cy),
                radius,
                transform: ambient,
                stops: ramp_stops(&g.stops, opacity),
            }))
        }
    }
}

fn stop_color(stop: &Stop, opacity: f32) -> PaintColor {
    PaintColor::from_packed(stop.rgb_color, unit_from_u8(stop.opacity) * opacity)
}

fn collapse_stops(stops: &[Stop], opacity: f32) -> Option<PaintColor> {
    match stops {
        [] => Some(PaintColor::TRANSPARENT),
        [only] => Some(stop_color(only, opacity)),
        _ => None,
    }
}

/// Stops sorted by offset; equal offsets keep their order.
fn ramp_stops(stops: &[Stop], opacity: f32) -> Vec<GradientStop> {
    let mut out: Vec<GradientStop> = stops
        .iter()
        .map(|s| GradientStop {
            offset: s.offset as f32,
            color: stop_color(s, opacity),
        })
        .collect();
    out.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
