//! icontree renders compact uSVG icon trees to RGBA8 buffers on the CPU.
//!
//! A [`Tree`] is a decoded icon: a hierarchy of groups and paths plus shared gradient, clip-path
//! and mask resources referenced by index. Rendering is a recursive interpretation of that
//! hierarchy onto a [`DrawingSurface`].
//!
//! # Pipeline overview
//!
//! 1. **Validate**: [`Tree::validate`] rejects dangling indices, cyclic clip/mask chains and
//!    short path streams before any pixel is drawn.
//! 2. **Interpret**: [`render_tree`] walks the scene, rebuilding path geometry from delta
//!    streams, composing transforms and isolating groups that carry opacity, a clip or a mask.
//! 3. **Rasterize**: [`CpuSurface`] turns fills, strokes and clips into coverage with `vello_cpu`
//!    and composites premultiplied RGBA8.
//!
//! [`render_icon`] runs all three and returns straight-alpha pixels; [`render_icon_batch`]
//! renders several sizes of one tree on a rayon pool.
//!
//! # Example
//!
//! ```
//! use icontree::{RenderSettings, Tree, render_icon};
//!
//! let tree = Tree::from_json_str(r#"{ "width": 16, "height": 16 }"#)?;
//! let frame = render_icon(&tree, &RenderSettings::scaled(2.0))?;
//! assert_eq!((frame.width, frame.height), (32, 32));
//! # Ok::<(), icontree::IconError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geometry;
mod render;
mod scene;
mod transform;

pub use foundation::core::{Affine, BezPath, Canvas, PathEl, Point, Rect, Vec2};
pub use foundation::error::{IconError, IconResult};
pub use geometry::path::{build_path, build_path_from_parts, encode_path};
pub use render::clip::{ClipRegion, apply_clip_path, flatten_clip_path};
pub use render::cpu::CpuSurface;
pub use render::interpreter::{render_node, render_nodes, render_tree, should_isolate};
pub use render::mask::apply_mask;
pub use render::paint::{
    GradientStop, LinearRamp, PaintColor, PaintHandle, RadialRamp, resolve_paint,
};
pub use render::pipeline::{RenderThreading, output_size, render_icon, render_icon_batch};
pub use render::surface::{CompositeOp, DrawingSurface, StrokeStyle};
pub use render::{FrameRGBA, RenderSettings};
pub use scene::model::{
    ClipPath, Fill, FillRule, Group, LineCap, LineJoin, LinearGradient, Mask, MaskType, Node,
    Paint, PaintOrder, Path, PathCommand, RadialGradient, Stop, Stroke, Transform, Tree,
};
pub use transform::affine::{compose, compose_model, from_model};
