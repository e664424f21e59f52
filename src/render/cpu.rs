//! `vello_cpu`-backed drawing surface.
//!
//! Fills and strokes are rendered with their real paint (solid or peniko gradient) into a
//! scratch pixmap, scaled by the clip coverage and composited over the surface. Clips are kept
//! as a one-byte coverage mask rendered in white with the same rasterizer. Layer compositing
//! runs on premultiplied RGBA8 with the kernels in [`crate::render::composite`].

use crate::{
    foundation::{
        core::{Affine, BezPath, Canvas, PathEl, Point},
        error::{IconError, IconResult},
        math::{mul_div255_u8, unit_from_u8},
    },
    render::{
        composite,
        paint::{GradientStop, PaintColor, PaintHandle},
        surface::{CompositeOp, DrawingSurface, StrokeStyle},
    },
    scene::model::{FillRule, LineCap, LineJoin},
};

/// A CPU raster surface.
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: vello_cpu::RenderContext,
    clip: Option<Vec<u8>>,
    transform: Affine,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clipped", &self.clip.is_some())
            .field("transform", &self.transform)
            .finish()
    }
}

impl CpuSurface {
    /// Create a transparent surface. Both sides must be in `1..=u16::MAX`.
    pub fn new(width: u32, height: u32) -> IconResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| IconError::render(format!("surface width {width} exceeds u16")))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| IconError::render(format!("surface height {height} exceeds u16")))?;
        if w == 0 || h == 0 {
            return Err(IconError::render("surface width/height must be > 0"));
        }
        Ok(Self {
            width: w,
            height: h,
            pixmap: vello_cpu::Pixmap::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: vello_cpu::RenderContext::new(w, h),
            clip: None,
            transform: Affine::IDENTITY,
        })
    }

    /// Pixel size of the surface.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Premultiplied RGBA8 contents.
    pub fn premul_pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    fn render_coverage(&mut self, draw: impl FnOnce(&mut vello_cpu::RenderContext)) -> Vec<u8> {
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_transform(affine_to_cpu(self.transform));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        draw(ctx);
        ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);
        composite::alpha_channel(self.scratch.data_as_u8_slice())
    }

    /// Render `draw` with `paint` into the scratch layer, clip it, and composite it over the
    /// surface.
    fn render_painted(
        &mut self,
        paint: &PaintHandle,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> IconResult<()> {
        if paint.as_solid().is_some_and(|c| c.alpha <= 0.0) {
            return Ok(());
        }

        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_transform(affine_to_cpu(self.transform));
        set_paint(ctx, paint, self.transform);
        draw(ctx);
        ctx.flush();

        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);

        let layer = self.scratch.data_as_u8_slice_mut();
        if let Some(clip) = &self.clip {
            composite::apply_coverage_in_place(layer, clip)?;
        }
        composite::over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
            1.0,
        )
    }
}

impl DrawingSurface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn offscreen(&self) -> IconResult<Self> {
        Self::new(self.width(), self.height())
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        rule: FillRule,
        paint: &PaintHandle,
    ) -> IconResult<()> {
        if path.elements().is_empty() {
            return Ok(());
        }
        let cpu_path = bezpath_to_cpu(path);
        let fill = fill_rule_to_cpu(rule);
        self.render_painted(paint, |ctx| {
            ctx.set_fill_rule(fill);
            ctx.fill_path(&cpu_path);
        })
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        style: &StrokeStyle,
        paint: &PaintHandle,
    ) -> IconResult<()> {
        if path.elements().is_empty() || style.width.is_nan() || style.width <= 0.0 {
            return Ok(());
        }
        let cpu_path = bezpath_to_cpu(path);
        let stroke = stroke_to_cpu(style);
        self.render_painted(paint, |ctx| {
            ctx.set_stroke(stroke);
            ctx.stroke_path(&cpu_path);
        })
    }

    fn clip_path(&mut self, path: &BezPath, rule: FillRule) -> IconResult<()> {
        let coverage = if path.elements().is_empty() {
            vec![0; self.pixel_count()]
        } else {
            let cpu_path = bezpath_to_cpu(path);
            let fill = fill_rule_to_cpu(rule);
            self.render_coverage(|ctx| {
                ctx.set_fill_rule(fill);
                ctx.fill_path(&cpu_path);
            })
        };

        match &mut self.clip {
            Some(clip) => composite::intersect_coverage_in_place(clip, &coverage)?,
            None => self.clip = Some(coverage),
        }
        Ok(())
    }

    fn draw_surface(&mut self, src: Self, op: CompositeOp) -> IconResult<()> {
        if src.width != self.width || src.height != self.height {
            return Err(IconError::render(format!(
                "draw_surface size mismatch: {}x{} onto {}x{}",
                src.width, src.height, self.width, self.height
            )));
        }

        let mut src_px = src.pixmap.data_as_u8_slice().to_vec();
        match op {
            CompositeOp::Over { opacity } => {
                if let Some(clip) = &self.clip {
                    composite::apply_coverage_in_place(&mut src_px, clip)?;
                }
                composite::over_in_place(self.pixmap.data_as_u8_slice_mut(), &src_px, opacity)
            }
            CompositeOp::DestinationIn => {
                if let Some(clip) = &self.clip {
                    // Outside the clip the destination is kept as is.
                    for (px, &c) in src_px.chunks_exact_mut(4).zip(clip) {
                        let kept = mul_div255_u8(u16::from(c), u16::from(px[3]));
                        px[3] = (255 - c).saturating_add(kept);
                    }
                }
                composite::destination_in_in_place(self.pixmap.data_as_u8_slice_mut(), &src_px)
            }
        }
    }

    fn read_pixels(&mut self) -> IconResult<Vec<u8>> {
        let mut out = self.pixmap.data_as_u8_slice().to_vec();
        composite::unpremultiply_in_place(&mut out);
        Ok(out)
    }

    fn write_pixels(&mut self, rgba: &[u8]) -> IconResult<()> {
        let expected = self.canvas().rgba8_len();
        if rgba.len() != expected {
            return Err(IconError::render(format!(
                "write_pixels expects {expected} bytes, got {}",
                rgba.len()
            )));
        }
        let dst = self.pixmap.data_as_u8_slice_mut();
        dst.copy_from_slice(rgba);
        composite::premultiply_in_place(dst);
        Ok(())
    }
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, paint: &PaintHandle, surface: Affine) {
    match paint {
        PaintHandle::Solid(c) => {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(*c));
        }
        PaintHandle::Linear(ramp) => {
            ctx.set_paint_transform(affine_to_cpu(paint_transform(surface, ramp.transform)));
            ctx.set_paint(
                vello_cpu::peniko::Gradient::new_linear(
                    point_to_cpu(ramp.start),
                    point_to_cpu(ramp.end),
                )
                .with_stops(stops_to_cpu(&ramp.stops).as_slice()),
            );
        }
        PaintHandle::Radial(ramp) => {
            ctx.set_paint_transform(affine_to_cpu(paint_transform(surface, ramp.transform)));
            ctx.set_paint(
                vello_cpu::peniko::Gradient::new_two_point_radial(
                    point_to_cpu(ramp.focal),
                    0.0,
                    point_to_cpu(ramp.center),
                    ramp.radius as f32,
                )
                .with_stops(stops_to_cpu(&ramp.stops).as_slice()),
            );
        }
    }
}

/// `vello_cpu` maps paint through the surface transform and then the paint transform; this is
/// the paint transform that makes the overall mapping equal `device`.
fn paint_transform(surface: Affine, device: Affine) -> Affine {
    if surface == device || surface.determinant() == 0.0 {
        return Affine::IDENTITY;
    }
    surface.inverse() * device
}

fn color_to_cpu(c: PaintColor) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::new([
        unit_from_u8(c.r),
        unit_from_u8(c.g),
        unit_from_u8(c.b),
        c.alpha.clamp(0.0, 1.0),
    ])
}

fn stops_to_cpu(stops: &[GradientStop]) -> Vec<vello_cpu::peniko::ColorStop> {
    stops
        .iter()
        .map(|s| vello_cpu::peniko::ColorStop {
            offset: s.offset,
            color: vello_cpu::peniko::color::DynamicColor::from_alpha_color(color_to_cpu(
                s.color,
            )),
        })
        .collect()
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn fill_rule_to_cpu(rule: FillRule) -> vello_cpu::peniko::Fill {
    match rule {
        FillRule::NonZero => vello_cpu::peniko::Fill::NonZero,
        FillRule::EvenOdd => vello_cpu::peniko::Fill::EvenOdd,
    }
}

fn stroke_to_cpu(style: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    let join = match style.join {
        LineJoin::Miter | LineJoin::MiterClip => vello_cpu::kurbo::Join::Miter,
        LineJoin::Round => vello_cpu::kurbo::Join::Round,
        LineJoin::Bevel => vello_cpu::kurbo::Join::Bevel,
    };
    let cap = match style.cap {
        LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
        LineCap::Round => vello_cpu::kurbo::Cap::Round,
        LineCap::Square => vello_cpu::kurbo::Cap::Square,
    };
    let stroke = vello_cpu::kurbo::Stroke::new(style.width)
        .with_join(join)
        .with_caps(cap)
        .with_miter_limit(style.miter_limit);
    if style.dashes.is_empty() {
        stroke
    } else {
        stroke.with_dashes(style.dash_offset, style.dashes.iter().copied())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
