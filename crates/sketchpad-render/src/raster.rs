//! CPU raster surface backed by a tiny-skia pixmap.

use kurbo::{Affine, BezPath, PathEl, Rect};
use peniko::{Color, Compose};
use sketchpad_core::shapes::{BitmapData, Paint};
use sketchpad_core::surface::Surface;
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, IntSize, LineCap, LineJoin, Mask, PathBuilder, Pixmap,
    PixmapPaint, Stroke, Transform,
};

/// Offscreen RGBA surface.
pub struct PixmapSurface {
    pixmap: Pixmap,
    transform: Transform,
    clip: Option<Mask>,
}

impl PixmapSurface {
    /// Allocate a transparent surface. `None` when a dimension is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            transform: Transform::identity(),
            clip: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha RGBA8 copy of the pixels.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        rgba
    }

    fn sk_paint(paint: &Paint) -> tiny_skia::Paint<'static> {
        let c = paint.color;
        let mut sk = tiny_skia::Paint::default();
        sk.set_color_rgba8(c.r, c.g, c.b, c.a);
        sk.anti_alias = paint.anti_alias;
        sk.blend_mode = blend_mode(paint.compose);
        sk
    }
}

impl Surface for PixmapSurface {
    fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a));
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = to_transform(transform);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip.and_then(|rect| {
            let path = tiny_skia::Rect::from_ltrb(
                rect.x0 as f32,
                rect.y0 as f32,
                rect.x1 as f32,
                rect.y1 as f32,
            )
            .map(PathBuilder::from_rect)?;
            let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
            mask.fill_path(&path, FillRule::Winding, true, self.transform);
            Some(mask)
        });
    }

    fn fill_path(&mut self, path: &BezPath, paint: &Paint) {
        let Some(path) = to_sk_path(path) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &Self::sk_paint(paint),
            FillRule::Winding,
            self.transform,
            self.clip.as_ref(),
        );
    }

    fn stroke_path(&mut self, path: &BezPath, paint: &Paint) {
        if path.elements().is_empty() {
            return;
        }
        let sk_paint = Self::sk_paint(paint);
        let bounds = path.control_box();
        if bounds.width() == 0.0 && bounds.height() == 0.0 {
            // Zero-length stroke: draw the round cap as a dot.
            let radius = (paint.width / 2.0) as f32;
            if let Some(dot) = PathBuilder::from_circle(bounds.x0 as f32, bounds.y0 as f32, radius)
            {
                self.pixmap.fill_path(
                    &dot,
                    &sk_paint,
                    FillRule::Winding,
                    self.transform,
                    self.clip.as_ref(),
                );
            }
            return;
        }
        let Some(sk_path) = to_sk_path(path) else {
            return;
        };
        let stroke = Stroke {
            width: paint.width as f32,
            line_cap: match paint.cap {
                kurbo::Cap::Butt => LineCap::Butt,
                kurbo::Cap::Square => LineCap::Square,
                kurbo::Cap::Round => LineCap::Round,
            },
            line_join: match paint.join {
                kurbo::Join::Bevel => LineJoin::Bevel,
                kurbo::Join::Miter => LineJoin::Miter,
                kurbo::Join::Round => LineJoin::Round,
            },
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &sk_path,
            &sk_paint,
            &stroke,
            self.transform,
            self.clip.as_ref(),
        );
    }

    fn draw_image(&mut self, image: &BitmapData, dest: Rect, paint: &Paint) {
        let Some(source) = premultiplied_pixmap(image) else {
            log::warn!("skipping invalid {}x{} image", image.width(), image.height());
            return;
        };
        let sx = dest.width() / f64::from(image.width());
        let sy = dest.height() / f64::from(image.height());
        let unit_scale = (sx - 1.0).abs() < f64::EPSILON && (sy - 1.0).abs() < f64::EPSILON;
        let image_paint = PixmapPaint {
            blend_mode: blend_mode(paint.compose),
            quality: if unit_scale {
                FilterQuality::Nearest
            } else {
                FilterQuality::Bilinear
            },
            ..Default::default()
        };
        let transform = self
            .transform
            .pre_translate(dest.x0 as f32, dest.y0 as f32)
            .pre_scale(sx as f32, sy as f32);
        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &image_paint,
            transform,
            self.clip.as_ref(),
        );
    }
}

fn blend_mode(compose: Compose) -> BlendMode {
    match compose {
        Compose::Copy => BlendMode::Source,
        Compose::Clear => BlendMode::Clear,
        Compose::Dest => BlendMode::Destination,
        Compose::DestOver => BlendMode::DestinationOver,
        Compose::Xor => BlendMode::Xor,
        Compose::Plus => BlendMode::Plus,
        _ => BlendMode::SourceOver,
    }
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_sk_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn premultiplied_pixmap(image: &BitmapData) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = image.pixels().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for channel in &mut px[..3] {
            *channel = ((u16::from(*channel) * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}
