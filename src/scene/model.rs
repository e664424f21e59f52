use crate::foundation::{
    core::Rect,
    error::{IconError, IconResult},
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A fully decoded icon scene.
///
/// The tree owns every node and every shared resource. Cross references (gradients, clip paths,
/// masks) are plain indices into the resource arrays below, so a `Tree` is immutable, `Sync` and
/// can be rendered from several threads at once.
///
/// Trees usually come from a decoder. They can also be built programmatically or loaded from
/// JSON via [`Tree::from_json_str`].
pub struct Tree {
    /// Natural width in user units. `None` when the decoder had no value.
    #[serde(default)]
    pub width: Option<f64>,
    /// Natural height in user units. `None` when the decoder had no value.
    #[serde(default)]
    pub height: Option<f64>,
    /// Top-level nodes in paint order (earlier nodes are painted first).
    #[serde(default)]
    pub children: Vec<Node>,
    /// Linear gradients referenced by [`Paint::LinearGradient`].
    #[serde(default)]
    pub linear_gradients: Vec<LinearGradient>,
    /// Radial gradients referenced by [`Paint::RadialGradient`].
    #[serde(default)]
    pub radial_gradients: Vec<RadialGradient>,
    /// Clip paths referenced by groups and by other clip paths.
    #[serde(default)]
    pub clip_paths: Vec<ClipPath>,
    /// Masks referenced by groups and by other masks.
    #[serde(default)]
    pub masks: Vec<Mask>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// A node of the scene hierarchy.
pub enum Node {
    /// Container with transform, opacity, clip and mask.
    Group(Group),
    /// Leaf geometry with fill and stroke.
    Path(Path),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A composable container node.
pub struct Group {
    /// Child nodes in paint order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Local transform. `None` means identity.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Group opacity, `255` is fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Index into [`Tree::masks`].
    #[serde(default)]
    pub mask_idx: Option<usize>,
    /// Index into [`Tree::clip_paths`].
    #[serde(default)]
    pub clip_path_idx: Option<usize>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            transform: None,
            opacity: default_opacity(),
            mask_idx: None,
            clip_path_idx: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A leaf node holding delta-encoded geometry.
pub struct Path {
    /// Drawing commands; each consumes a fixed number of entries from `diffs`.
    #[serde(default)]
    pub commands: Vec<PathCommand>,
    /// Signed coordinate deltas. The first two entries are the absolute start point.
    #[serde(default)]
    pub diffs: Vec<i32>,
    /// Scale applied to every delta. `0` is treated as `1`.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Optional fill.
    #[serde(default)]
    pub fill: Option<Fill>,
    /// Optional stroke.
    #[serde(default)]
    pub stroke: Option<Stroke>,
    /// Fill rule used for filling (and for clipping when used as clip geometry).
    #[serde(default)]
    pub rule: FillRule,
    /// Whether the fill or the stroke is painted first.
    #[serde(default)]
    pub paint_order: PaintOrder,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            diffs: Vec::new(),
            step: default_step(),
            fill: None,
            stroke: None,
            rule: FillRule::default(),
            paint_order: PaintOrder::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// A delta-encoded drawing command.
pub enum PathCommand {
    /// Start a new subpath.
    Move,
    /// Straight line.
    Line,
    /// Quadratic Bézier curve.
    Quad,
    /// Cubic Bézier curve.
    Cubic,
    /// Close the current subpath.
    Close,
}

impl PathCommand {
    /// Number of entries this command consumes from [`Path::diffs`].
    pub fn diff_count(self) -> usize {
        match self {
            Self::Move | Self::Line => 2,
            Self::Quad => 4,
            Self::Cubic => 6,
            Self::Close => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Fill rule for filling and clipping.
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd parity.
    EvenOdd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Painting order of a path's fill and stroke.
pub enum PaintOrder {
    /// Fill first, stroke on top.
    #[default]
    FillAndStroke,
    /// Stroke first, fill on top.
    StrokeAndFill,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Fill parameters of a [`Path`].
pub struct Fill {
    /// Paint source.
    pub paint: Paint,
    /// Fill opacity, `255` is fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Stroke parameters of a [`Path`].
pub struct Stroke {
    /// Paint source.
    pub paint: Paint,
    /// Stroke opacity, `255` is fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Line width in user units.
    #[serde(default = "default_stroke_width")]
    pub width: f64,
    /// Miter limit ratio.
    #[serde(default = "default_miterlimit")]
    pub miterlimit: f64,
    /// Dash pattern lengths. Empty means a solid line.
    #[serde(default)]
    pub dasharray: Vec<f64>,
    /// Offset into the dash pattern.
    #[serde(default)]
    pub dashoffset: f64,
    /// Join style between segments.
    #[serde(default)]
    pub linejoin: LineJoin,
    /// Cap style at open subpath ends.
    #[serde(default)]
    pub linecap: LineCap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Stroke join style.
pub enum LineJoin {
    /// Sharp corner limited by the miter limit.
    #[default]
    Miter,
    /// Miter clipped at the miter limit. Rendered as [`LineJoin::Miter`].
    MiterClip,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Stroke cap style.
pub enum LineCap {
    /// Flat cap ending at the endpoint.
    #[default]
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending by half the width.
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Paint source of a fill or stroke.
pub enum Paint {
    /// Packed `0xRRGGBB` color.
    #[serde(rename = "rgb_color")]
    RgbColor(u32),
    /// Index into [`Tree::linear_gradients`].
    #[serde(rename = "linear_gradient_idx")]
    LinearGradient(usize),
    /// Index into [`Tree::radial_gradients`].
    #[serde(rename = "radial_gradient_idx")]
    RadialGradient(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Row-major 2D affine map `(sx, ky, kx, sy, tx, ty)`.
///
/// ```text
/// sx kx tx
/// ky sy ty
///  0  0  1
/// ```
pub struct Transform {
    /// Horizontal scale.
    pub sx: f64,
    /// Vertical skew.
    pub ky: f64,
    /// Horizontal skew.
    pub kx: f64,
    /// Vertical scale.
    pub sy: f64,
    /// Horizontal translation.
    pub tx: f64,
    /// Vertical translation.
    pub ty: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        ky: 0.0,
        kx: 0.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// The six coefficients in declaration order.
    pub fn coeffs(&self) -> [f64; 6] {
        [self.sx, self.ky, self.kx, self.sy, self.tx, self.ty]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Linear gradient resource.
pub struct LinearGradient {
    /// Gradient transform. `None` means identity.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Start x.
    pub x1: f64,
    /// Start y.
    pub y1: f64,
    /// End x.
    pub x2: f64,
    /// End y.
    pub y2: f64,
    /// Color stops in offset order.
    #[serde(default)]
    pub stops: Vec<Stop>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Radial gradient resource.
pub struct RadialGradient {
    /// Gradient transform. `None` means identity.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Focal point x.
    pub fx: f64,
    /// Focal point y.
    pub fy: f64,
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Outer radius.
    pub r: f64,
    /// Color stops in offset order.
    #[serde(default)]
    pub stops: Vec<Stop>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A gradient color stop.
pub struct Stop {
    /// Position along the ramp in `[0, 1]`.
    pub offset: f64,
    /// Packed `0xRRGGBB` color.
    pub rgb_color: u32,
    /// Stop opacity, `255` is fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Clip path resource. Children are used purely as geometry.
pub struct ClipPath {
    /// Clip transform. `None` means identity.
    #[serde(default)]
    pub transform: Option<Transform>,
    /// Parent clip path applied first (intersection).
    #[serde(default)]
    pub clip_path_idx: Option<usize>,
    /// Clip geometry.
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Mask resource, defined in the coordinate space of the group that references it.
pub struct Mask {
    /// Left edge of the mask region.
    #[serde(default)]
    pub left: Option<f64>,
    /// Top edge of the mask region. Falls back to `left`.
    #[serde(default)]
    pub top: Option<f64>,
    /// Width of the mask region.
    #[serde(default)]
    pub width: Option<f64>,
    /// Height of the mask region. Falls back to `width`.
    #[serde(default)]
    pub height: Option<f64>,
    /// How mask pixels turn into coverage.
    #[serde(default)]
    pub mask_type: MaskType,
    /// Parent mask applied first (multiplied).
    #[serde(default)]
    pub mask_idx: Option<usize>,
    /// Mask content.
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Mask {
    /// Resolved mask region.
    ///
    /// Missing or zero values fall back the way the icon format defines them: width to `0`,
    /// height to width, left to `0` and top to left.
    pub fn rect(&self) -> Rect {
        fn given(v: Option<f64>) -> Option<f64> {
            v.filter(|v| *v != 0.0 && !v.is_nan())
        }

        let width = given(self.width).unwrap_or(0.0);
        let height = given(self.height).unwrap_or(width);
        let left = given(self.left).unwrap_or(0.0);
        let top = given(self.top).unwrap_or(left);
        Rect::new(left, top, left + width, top + height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Mask interpretation.
pub enum MaskType {
    /// BT.709 luminance times alpha.
    #[default]
    Luminance,
    /// Alpha channel as-is.
    Alpha,
}

impl Tree {
    /// Parse a tree from its JSON representation.
    pub fn from_json_str(s: &str) -> IconResult<Self> {
        serde_json::from_str(s).map_err(|e| IconError::serde(format!("parse icon tree: {e}")))
    }

    /// Serialize the tree to pretty-printed JSON.
    pub fn to_json_string(&self) -> IconResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IconError::serde(format!("serialize icon tree: {e}")))
    }

    /// Natural size in user units.
    ///
    /// Both sides absent gives `0x0`; a single present side makes the icon square.
    pub fn natural_size(&self) -> (f64, f64) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (None, None) => (0.0, 0.0),
        }
    }

    /// Look up a linear gradient by index.
    pub fn linear_gradient(&self, idx: usize) -> IconResult<&LinearGradient> {
        self.linear_gradients.get(idx).ok_or_else(|| {
            IconError::validation(format!("linear gradient index {idx} out of range"))
        })
    }

    /// Look up a radial gradient by index.
    pub fn radial_gradient(&self, idx: usize) -> IconResult<&RadialGradient> {
        self.radial_gradients.get(idx).ok_or_else(|| {
            IconError::validation(format!("radial gradient index {idx} out of range"))
        })
    }

    /// Look up a clip path by index.
    pub fn clip_path(&self, idx: usize) -> IconResult<&ClipPath> {
        self.clip_paths
            .get(idx)
            .ok_or_else(|| IconError::validation(format!("clip path index {idx} out of range")))
    }

    /// Look up a mask by index.
    pub fn mask(&self, idx: usize) -> IconResult<&Mask> {
        self.masks
            .get(idx)
            .ok_or_else(|| IconError::validation(format!("mask index {idx} out of range")))
    }
}

fn default_opacity() -> u8 {
    255
}

fn default_step() -> f64 {
    1.0
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_miterlimit() -> f64 {
    4.0
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
