use crate::foundation::core::Affine;

pub(crate) mod clip;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod interpreter;
pub(crate) mod mask;
pub(crate) mod paint;
pub(crate) mod pipeline;
pub(crate) mod surface;

#[cfg(test)]
#[path = "../tests/unit/render/recording.rs"]
pub(crate) mod recording;

/// A rendered icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied. Rendered icons are always straight alpha.
    pub premultiplied: bool,
}

/// Per-render settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Initial transform applied to the whole tree. Its `a`/`d` coefficients also scale the
    /// output size.
    pub transform: Affine,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
        }
    }
}

impl RenderSettings {
    /// Settings that render at `scale` times the natural size.
    pub fn scaled(scale: f64) -> Self {
        Self {
            transform: Affine::scale(scale),
        }
    }
}
