use rayon::prelude::*;

use crate::{
    foundation::{
        core::Affine,
        error::{IconError, IconResult},
    },
    render::{
        FrameRGBA, RenderSettings, cpu::CpuSurface, interpreter::render_tree,
        surface::DrawingSurface,
    },
    scene::model::Tree,
};

/// Validate and render one icon on the CPU.
///
/// Output size is the tree's natural size scaled by the transform's `a` (x) and `d` (y)
/// coefficients, rounded to whole pixels. Returns **straight** (non-premultiplied) RGBA8.
#[tracing::instrument(skip(tree))]
pub fn render_icon(tree: &Tree, settings: &RenderSettings) -> IconResult<FrameRGBA> {
    tree.validate()?;
    render_validated(tree, settings)
}

/// Threading options for [`render_icon_batch`].
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render entries on a worker pool. `false` renders them one after another.
    pub parallel: bool,
    /// Worker count. `None` lets rayon decide; `Some(0)` is rejected.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Reject configurations that cannot build a worker pool.
    pub fn validate(&self) -> IconResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(IconError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Render one tree under several settings (typically several sizes).
///
/// The tree is validated once. Frames come back in the order of `settings` and are identical to
/// what [`render_icon`] returns for each entry.
#[tracing::instrument(skip(tree, settings), fields(count = settings.len()))]
pub fn render_icon_batch(
    tree: &Tree,
    settings: &[RenderSettings],
    threading: &RenderThreading,
) -> IconResult<Vec<FrameRGBA>> {
    tree.validate()?;
    threading.validate()?;

    if !threading.parallel || settings.len() <= 1 {
        return settings
            .iter()
            .map(|s| render_validated(tree, s))
            .collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    let rendered = pool.install(|| {
        settings
            .par_iter()
            .map(|s| render_validated(tree, s))
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(rendered.len());
    for frame in rendered {
        out.push(frame?);
    }
    Ok(out)
}

/// Pixel size of the output for `tree` under `transform`.
pub fn output_size(tree: &Tree, transform: Affine) -> IconResult<(u32, u32)> {
    let (natural_w, natural_h) = tree.natural_size();
    let [a, _, _, d, _, _] = transform.as_coeffs();
    Ok((
        output_dim(natural_w * a, "width")?,
        output_dim(natural_h * d, "height")?,
    ))
}

fn output_dim(v: f64, name: &str) -> IconResult<u32> {
    let v = v.round();
    if !v.is_finite() || v < 0.0 {
        return Err(IconError::validation(format!(
            "output {name} must be finite and >= 0, got {v}"
        )));
    }
    if v > f64::from(u16::MAX) {
        return Err(IconError::validation(format!(
            "output {name} {v} exceeds {}",
            u16::MAX
        )));
    }
    Ok(v as u32)
}

fn render_validated(tree: &Tree, settings: &RenderSettings) -> IconResult<FrameRGBA> {
    let (width, height) = output_size(tree, settings.transform)?;
    if width == 0 || height == 0 {
        tracing::debug!(width, height, "empty output, nothing to render");
        return Ok(FrameRGBA {
            width,
            height,
            data: Vec::new(),
            premultiplied: false,
        });
    }

    let mut surface = CpuSurface::new(width, height)?;
    render_tree(&mut surface, tree, settings.transform)?;
    let data = surface.read_pixels()?;
    tracing::debug!(width, height, "rendered icon");

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: false,
    })
}

fn build_thread_pool(threads: Option<usize>) -> IconResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| IconError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
