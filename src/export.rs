//! PNG export of a scene at one pixel per canvas unit

use crate::config::colors::{BACKGROUND_RGB, FOLIAGE_RGB, TRUNK_RGB};
use crate::config::CanvasConfig;
use crate::tree::{Scene, Segment, SegmentKind, Surface};
use image::{Rgb, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("canvas size {width}x{height} cannot be exported")]
    InvalidSize { width: f64, height: f64 },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

fn segment_color(kind: SegmentKind) -> Rgb<u8> {
    let (r, g, b) = match kind {
        SegmentKind::Trunk => TRUNK_RGB,
        SegmentKind::Foliage => FOLIAGE_RGB,
    };
    Rgb([r, g, b])
}

/// Stamp a round brush along the segment, half a pixel at a time
fn stroke(img: &mut RgbImage, seg: &Segment) {
    let color = segment_color(seg.kind);
    let radius = (seg.thickness / 2.0).max(0.5);
    let (w, h) = (img.width() as i64, img.height() as i64);

    let dx = seg.end.x - seg.start.x;
    let dy = seg.end.y - seg.start.y;
    let steps = ((dx.hypot(dy) * 2.0).ceil() as usize).max(1);
    let reach = radius.ceil() as i64;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let cx = seg.start.x + dx * t;
        let cy = seg.start.y + dy * t;

        for py in (cy.floor() as i64 - reach)..=(cy.floor() as i64 + reach) {
            for px in (cx.floor() as i64 - reach)..=(cx.floor() as i64 + reach) {
                if px < 0 || py < 0 || px >= w || py >= h {
                    continue;
                }
                let ddx = px as f64 + 0.5 - cx;
                let ddy = py as f64 + 0.5 - cy;
                if ddx * ddx + ddy * ddy <= radius * radius {
                    img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

/// Paint the scene onto a fresh image. Trunk is painted last so it stays on top.
pub fn render_image(scene: &Scene) -> Result<RgbImage, ExportError> {
    let (width, height) = scene.extent();
    if !CanvasConfig::valid_side(width) || !CanvasConfig::valid_side(height) {
        return Err(ExportError::InvalidSize { width, height });
    }

    let (r, g, b) = BACKGROUND_RGB;
    let mut img = RgbImage::from_pixel(width.round() as u32, height.round() as u32, Rgb([r, g, b]));

    for kind in [SegmentKind::Foliage, SegmentKind::Trunk] {
        for seg in scene.segments().iter().filter(|s| s.kind == kind) {
            stroke(&mut img, seg);
        }
    }
    Ok(img)
}

/// Write the scene as a PNG file (format chosen from the extension)
pub fn save_png(scene: &Scene, path: &Path) -> Result<(), ExportError> {
    let img = render_image(scene)?;
    img.save(path)?;
    tracing::info!(path = %path.display(), segments = scene.len(), "tree exported");
    Ok(())
}
