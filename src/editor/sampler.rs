//! Reads rendered page pixels to derive mask fills.
//!
//! Both operations recover locally: a failed color sample yields white, a failed strip
//! capture yields `None`.

use image::{Rgba, RgbaImage, imageops};

use crate::constants::DEFAULT_MASK_COLOR;
use crate::masks::{EdgeDirection, EdgeSnapshot, Mask};

use super::coords::{PixelRect, percent_rect_to_canvas_pixels};

/// Absorbs float noise from the percent round trip when snapping edges to pixels
const EDGE_EPSILON: f32 = 1e-3;

pub fn to_hex(pixel: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", pixel[0], pixel[1], pixel[2])
}

/// Color of the pixel at the top-left of `rect`, which is given in display pixels.
///
/// `display_width` is the on-screen width of the page; the ratio between it and the
/// raster width converts display pixels to raster pixels.
pub fn dominant_color(raster: &RgbaImage, rect: &PixelRect, display_width: f32) -> String {
    if display_width <= 0.0 || raster.width() == 0 || raster.height() == 0 {
        return DEFAULT_MASK_COLOR.to_string();
    }

    let scale = raster.width() as f32 / display_width;
    let x = (rect.x * scale).floor();
    let y = (rect.y * scale).floor();
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return DEFAULT_MASK_COLOR.to_string();
    }

    raster
        .get_pixel_checked(x as u32, y as u32)
        .map(|p| to_hex(*p))
        .unwrap_or_else(|| DEFAULT_MASK_COLOR.to_string())
}

/// Captures the one-pixel strip just outside the edge a clone fill copies from.
///
/// The sample row/column is clamped into the raster; the along-edge span is clamped to
/// the raster and the capture fails if nothing remains. Solid masks return `None`.
pub fn capture_edge_snapshot(raster: &RgbaImage, mask: &Mask) -> Option<EdgeSnapshot> {
    let direction = mask.fill_type.clone_direction()?;
    let (width, height) = (raster.width() as i64, raster.height() as i64);
    if width == 0 || height == 0 {
        return None;
    }

    let px = percent_rect_to_canvas_pixels(&mask.rect(), width as f32, height as f32);
    let left = (px.x + EDGE_EPSILON).floor() as i64;
    let top = (px.y + EDGE_EPSILON).floor() as i64;
    let right = (px.x + px.w - EDGE_EPSILON).ceil() as i64;
    let bottom = (px.y + px.h - EDGE_EPSILON).ceil() as i64;

    let (x, y, w, h) = match direction {
        EdgeDirection::Top | EdgeDirection::Bottom => {
            let row = if direction == EdgeDirection::Top {
                top - 1
            } else {
                bottom
            };
            let start = left.clamp(0, width);
            let end = right.clamp(0, width);
            (start, row.clamp(0, height - 1), end - start, 1)
        }
        EdgeDirection::Left | EdgeDirection::Right => {
            let column = if direction == EdgeDirection::Left {
                left - 1
            } else {
                right
            };
            let start = top.clamp(0, height);
            let end = bottom.clamp(0, height);
            (column.clamp(0, width - 1), start, 1, end - start)
        }
    };

    if w <= 0 || h <= 0 {
        return None;
    }

    let strip = imageops::crop_imm(raster, x as u32, y as u32, w as u32, h as u32).to_image();
    Some(EdgeSnapshot { direction, strip })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::coords::PercentRect;
    use crate::masks::{FillType, MaskId};

    /// 100x100 raster where each pixel encodes its own coordinates.
    fn coordinate_raster() -> RgbaImage {
        RgbaImage::from_fn(100, 100, |x, y| Rgba([x as u8, y as u8, 7, 255]))
    }

    fn clone_mask(fill_type: FillType, rect: PercentRect) -> Mask {
        let mut mask = Mask::solid(MaskId(1), rect, "#000000", Some(0));
        mask.fill_type = fill_type;
        mask
    }

    #[test]
    fn test_dominant_color_scales_display_to_raster() {
        let raster = coordinate_raster();
        // Displayed at 50px wide, so display (10, 20) maps to raster (20, 40)
        let rect = PixelRect {
            x: 10.0,
            y: 20.0,
            w: 5.0,
            h: 5.0,
        };
        assert_eq!(dominant_color(&raster, &rect, 50.0), "#142807");
    }

    #[test]
    fn test_dominant_color_falls_back_to_white() {
        let raster = coordinate_raster();
        let outside = PixelRect {
            x: 500.0,
            y: 0.0,
            w: 5.0,
            h: 5.0,
        };
        assert_eq!(dominant_color(&raster, &outside, 100.0), "#FFFFFF");
        assert_eq!(dominant_color(&raster, &PixelRect::default(), 0.0), "#FFFFFF");
        assert_eq!(
            dominant_color(&RgbaImage::new(0, 0), &PixelRect::default(), 10.0),
            "#FFFFFF"
        );
    }

    #[test]
    fn test_hex_is_uppercase() {
        assert_eq!(to_hex(Rgba([171, 205, 239, 255])), "#ABCDEF");
    }

    #[test]
    fn test_solid_mask_has_no_snapshot() {
        let raster = coordinate_raster();
        let mask = Mask::solid(MaskId(1), PercentRect::new(10.0, 10.0, 10.0, 10.0), "#000000", None);
        assert!(capture_edge_snapshot(&raster, &mask).is_none());
    }

    #[test]
    fn test_clone_top_reads_row_above() {
        let raster = coordinate_raster();
        let mask = clone_mask(FillType::CloneTop, PercentRect::new(10.0, 30.0, 20.0, 10.0));
        let snapshot = capture_edge_snapshot(&raster, &mask).unwrap();
        assert_eq!(snapshot.direction, EdgeDirection::Top);
        assert_eq!(snapshot.strip.dimensions(), (20, 1));
        assert_eq!(snapshot.strip.get_pixel(0, 0), &Rgba([10, 29, 7, 255]));
    }

    #[test]
    fn test_clone_bottom_reads_row_below() {
        let raster = coordinate_raster();
        let mask = clone_mask(FillType::CloneBottom, PercentRect::new(10.0, 30.0, 20.0, 10.0));
        let snapshot = capture_edge_snapshot(&raster, &mask).unwrap();
        assert_eq!(snapshot.strip.get_pixel(0, 0), &Rgba([10, 40, 7, 255]));
    }

    #[test]
    fn test_clone_left_and_right_read_columns() {
        let raster = coordinate_raster();
        let rect = PercentRect::new(10.0, 30.0, 20.0, 10.0);

        let left = capture_edge_snapshot(&raster, &clone_mask(FillType::CloneLeft, rect)).unwrap();
        assert_eq!(left.strip.dimensions(), (1, 10));
        assert_eq!(left.strip.get_pixel(0, 0), &Rgba([9, 30, 7, 255]));

        let right = capture_edge_snapshot(&raster, &clone_mask(FillType::CloneRight, rect)).unwrap();
        assert_eq!(right.strip.get_pixel(0, 9), &Rgba([30, 39, 7, 255]));
    }

    #[test]
    fn test_sample_row_is_clamped_into_raster() {
        let raster = coordinate_raster();
        let at_top = clone_mask(FillType::CloneTop, PercentRect::new(0.0, 0.0, 10.0, 10.0));
        let snapshot = capture_edge_snapshot(&raster, &at_top).unwrap();
        assert_eq!(snapshot.strip.get_pixel(0, 0), &Rgba([0, 0, 7, 255]));

        let overscan = clone_mask(FillType::CloneBottom, PercentRect::new(90.0, 95.0, 20.0, 20.0));
        let snapshot = capture_edge_snapshot(&raster, &overscan).unwrap();
        assert_eq!(snapshot.strip.dimensions(), (10, 1));
        assert_eq!(snapshot.strip.get_pixel(0, 0), &Rgba([90, 99, 7, 255]));
    }

    #[test]
    fn test_capture_fails_when_span_is_outside_raster() {
        let raster = coordinate_raster();
        let mask = clone_mask(FillType::CloneTop, PercentRect::new(120.0, 10.0, 10.0, 10.0));
        assert!(capture_edge_snapshot(&raster, &mask).is_none());
    }
}
