use super::*;
use crate::{
    foundation::core::Rect,
    render::paint::{GradientStop, LinearRamp, PaintColor},
};
use kurbo::Shape;

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

fn red() -> PaintHandle {
    PaintHandle::Solid(PaintColor::from_packed(0xff0000, 1.0))
}

fn px(surface: &mut CpuSurface, x: usize, y: usize) -> [u8; 4] {
    let w = surface.width() as usize;
    let data = surface.read_pixels().unwrap();
    let i = (y * w + x) * 4;
    [data[i], data[i + 1], data[i + 2], data[i + 3]]
}

#[test]
fn new_rejects_empty_and_oversized() {
    assert!(CpuSurface::new(0, 4).is_err());
    assert!(CpuSurface::new(4, 70_000).is_err());
    let s = CpuSurface::new(3, 2).unwrap();
    assert_eq!(s.canvas(), Canvas { width: 3, height: 2 });
    assert_eq!(s.premul_pixels().len(), 3 * 2 * 4);
}

#[test]
fn offscreen_is_blank_same_size_identity() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_transform(Affine::scale(2.0));
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 4.0), FillRule::NonZero, &red())
        .unwrap();
    let off = s.offscreen().unwrap();
    assert_eq!((off.width(), off.height()), (4, 4));
    assert_eq!(off.transform(), Affine::IDENTITY);
    assert!(off.premul_pixels().iter().all(|&b| b == 0));
}

#[test]
fn fill_respects_transform() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.set_transform(Affine::translate((2.0, 0.0)));
    s.fill_path(&rect_path(0.0, 0.0, 2.0, 4.0), FillRule::NonZero, &red())
        .unwrap();
    assert_eq!(px(&mut s, 0, 1), [0, 0, 0, 0]);
    assert_eq!(px(&mut s, 3, 1), [255, 0, 0, 255]);
}

#[test]
fn even_odd_leaves_inner_hole() {
    let mut path = rect_path(0.0, 0.0, 6.0, 6.0);
    path.extend(rect_path(2.0, 2.0, 4.0, 4.0).elements().iter().copied());

    let mut s = CpuSurface::new(6, 6).unwrap();
    s.fill_path(&path, FillRule::EvenOdd, &red()).unwrap();
    assert_eq!(px(&mut s, 3, 3), [0, 0, 0, 0]);
    assert_eq!(px(&mut s, 0, 0), [255, 0, 0, 255]);

    let mut s = CpuSurface::new(6, 6).unwrap();
    s.fill_path(&path, FillRule::NonZero, &red()).unwrap();
    assert_eq!(px(&mut s, 3, 3), [255, 0, 0, 255]);
}

#[test]
fn stroke_covers_outline_only() {
    let mut s = CpuSurface::new(10, 10).unwrap();
    let style = StrokeStyle {
        width: 2.0,
        miter_limit: 4.0,
        join: LineJoin::Miter,
        cap: LineCap::Butt,
        dashes: Vec::new(),
        dash_offset: 0.0,
    };
    s.stroke_path(&rect_path(2.0, 2.0, 8.0, 8.0), &style, &red())
        .unwrap();
    assert_eq!(px(&mut s, 5, 5), [0, 0, 0, 0]);
    assert_eq!(px(&mut s, 5, 1), [255, 0, 0, 255]);
    assert_eq!(px(&mut s, 5, 2), [255, 0, 0, 255]);
}

#[test]
fn surface_skips_non_positive_stroke_width() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    let style = StrokeStyle {
        width: 0.0,
        miter_limit: 4.0,
        join: LineJoin::Miter,
        cap: LineCap::Butt,
        dashes: Vec::new(),
        dash_offset: 0.0,
    };
    s.stroke_path(&rect_path(1.0, 1.0, 3.0, 3.0), &style, &red())
        .unwrap();
    assert!(s.premul_pixels().iter().all(|&b| b == 0));
}

#[test]
fn clips_intersect_and_persist() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    s.clip_path(&rect_path(0.0, 0.0, 3.0, 4.0), FillRule::NonZero)
        .unwrap();
    s.clip_path(&rect_path(1.0, 0.0, 4.0, 4.0), FillRule::NonZero)
        .unwrap();
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 4.0), FillRule::NonZero, &red())
        .unwrap();
    assert_eq!(px(&mut s, 0, 0), [0, 0, 0, 0]);
    assert_eq!(px(&mut s, 1, 0), [255, 0, 0, 255]);
    assert_eq!(px(&mut s, 2, 3), [255, 0, 0, 255]);
    assert_eq!(px(&mut s, 3, 0), [0, 0, 0, 0]);
}

#[test]
fn empty_clip_path_clips_everything() {
    let mut s = CpuSurface::new(2, 2).unwrap();
    s.clip_path(&BezPath::new(), FillRule::NonZero).unwrap();
    s.fill_path(&rect_path(0.0, 0.0, 2.0, 2.0), FillRule::NonZero, &red())
        .unwrap();
    assert!(s.premul_pixels().iter().all(|&b| b == 0));
}

fn black_to_white(start: Point, end: Point, transform: Affine) -> PaintHandle {
    PaintHandle::Linear(LinearRamp {
        start,
        end,
        transform,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: PaintColor::from_packed(0x000000, 1.0),
            },
            GradientStop {
                offset: 1.0,
                color: PaintColor::from_packed(0xffffff, 1.0),
            },
        ],
    })
}

fn gradient_row(surface_transform: Affine, paint: &PaintHandle) -> Vec<u8> {
    let mut s = CpuSurface::new(4, 1).unwrap();
    s.set_transform(surface_transform);
    let path = surface_transform.inverse() * rect_path(0.0, 0.0, 4.0, 1.0);
    s.fill_path(&path, FillRule::NonZero, paint).unwrap();
    s.read_pixels().unwrap()
}

#[test]
fn linear_gradient_ramps_across_the_fill() {
    let data = gradient_row(
        Affine::IDENTITY,
        &black_to_white(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Affine::IDENTITY),
    );
    let reds: Vec<u8> = data.chunks_exact(4).map(|px| px[0]).collect();
    assert!(data.chunks_exact(4).all(|px| px[3] == 255));
    assert!(reds.windows(2).all(|w| w[0] < w[1]), "{reds:?}");
    assert!(reds[0] < 128 && reds[3] > 128, "{reds:?}");
}

#[test]
fn gradient_follows_its_own_transform_not_the_surface_transform() {
    let device = gradient_row(
        Affine::IDENTITY,
        &black_to_white(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Affine::IDENTITY),
    );
    let scaled_ramp = gradient_row(
        Affine::IDENTITY,
        &black_to_white(Point::new(0.0, 0.0), Point::new(2.0, 0.0), Affine::scale(2.0)),
    );
    let scaled_surface = gradient_row(
        Affine::scale(2.0),
        &black_to_white(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Affine::IDENTITY),
    );
    let both = gradient_row(
        Affine::scale(2.0),
        &black_to_white(Point::new(0.0, 0.0), Point::new(2.0, 0.0), Affine::scale(2.0)),
    );
    assert_eq!(scaled_ramp, device);
    assert_eq!(scaled_surface, device);
    assert_eq!(both, device);
}

#[test]
fn gradient_fill_is_clipped() {
    let mut s = CpuSurface::new(4, 1).unwrap();
    s.clip_path(&rect_path(0.0, 0.0, 2.0, 1.0), FillRule::NonZero)
        .unwrap();
    let paint = black_to_white(Point::new(0.0, 0.0), Point::new(4.0, 0.0), Affine::IDENTITY);
    s.fill_path(&rect_path(0.0, 0.0, 4.0, 1.0), FillRule::NonZero, &paint)
        .unwrap();
    assert_eq!(px(&mut s, 1, 0)[3], 255);
    assert_eq!(px(&mut s, 2, 0), [0, 0, 0, 0]);
    assert_eq!(px(&mut s, 3, 0), [0, 0, 0, 0]);
}

#[test]
fn transparent_solid_leaves_surface_untouched() {
    let mut s = CpuSurface::new(2, 2).unwrap();
    let clear = PaintHandle::Solid(PaintColor::TRANSPARENT);
    s.fill_path(&rect_path(0.0, 0.0, 2.0, 2.0), FillRule::NonZero, &clear)
        .unwrap();
    assert!(s.premul_pixels().iter().all(|&b| b == 0));
}

#[test]
fn draw_surface_over_applies_global_alpha() {
    let mut dst = CpuSurface::new(2, 2).unwrap();
    let mut src = dst.offscreen().unwrap();
    src.fill_path(&rect_path(0.0, 0.0, 2.0, 2.0), FillRule::NonZero, &red())
        .unwrap();
    dst.draw_surface(src, CompositeOp::Over { opacity: 128.0 / 255.0 })
        .unwrap();
    assert_eq!(px(&mut dst, 1, 1), [255, 0, 0, 128]);
}

#[test]
fn draw_surface_over_honors_destination_clip() {
    let mut dst = CpuSurface::new(2, 1).unwrap();
    dst.clip_path(&rect_path(0.0, 0.0, 1.0, 1.0), FillRule::NonZero)
        .unwrap();
    let mut src = dst.offscreen().unwrap();
    src.fill_path(&rect_path(0.0, 0.0, 2.0, 1.0), FillRule::NonZero, &red())
        .unwrap();
    dst.draw_surface(src, CompositeOp::Over { opacity: 1.0 }).unwrap();
    assert_eq!(px(&mut dst, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&mut dst, 1, 0), [0, 0, 0, 0]);
}

#[test]
fn destination_in_keeps_target_where_source_is_opaque() {
    let mut dst = CpuSurface::new(2, 1).unwrap();
    dst.fill_path(&rect_path(0.0, 0.0, 2.0, 1.0), FillRule::NonZero, &red())
        .unwrap();
    let mut mask = dst.offscreen().unwrap();
    mask.fill_path(&rect_path(0.0, 0.0, 1.0, 1.0), FillRule::NonZero, &red())
        .unwrap();
    dst.draw_surface(mask, CompositeOp::DestinationIn).unwrap();
    assert_eq!(px(&mut dst, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&mut dst, 1, 0), [0, 0, 0, 0]);
}

#[test]
fn draw_surface_rejects_size_mismatch() {
    let mut dst = CpuSurface::new(2, 2).unwrap();
    let src = CpuSurface::new(3, 2).unwrap();
    assert!(dst.draw_surface(src, CompositeOp::DestinationIn).is_err());
}

#[test]
fn pixels_round_trip_through_write_and_read() {
    let mut s = CpuSurface::new(2, 1).unwrap();
    let straight = vec![255, 0, 0, 128, 10, 20, 30, 255];
    s.write_pixels(&straight).unwrap();
    assert_eq!(&s.premul_pixels()[0..4], &[128, 0, 0, 128]);
    assert_eq!(s.read_pixels().unwrap(), straight);
    let err = s.write_pixels(&[0; 4]).unwrap_err();
    assert!(err.to_string().contains("expects 8 bytes, got 4"), "{err}");
}
