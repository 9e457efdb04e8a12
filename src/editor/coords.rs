//! Percentage-based page geometry.
//!
//! Mask rectangles are stored as percentages of the rendered page so they stay valid
//! across re-renders, window resizes and fullscreen. Everything here is computed against
//! the surface size of the current frame and never against a cached resolution.

use bevy::math::Vec2;

/// A rectangle in page percent (0-100), origin top-left.
///
/// `x + width` and `y + height` may exceed 100; overscan is preserved as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PercentRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PercentRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether a point given in page percent lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }
}

/// A rectangle in pixels of some surface (display or raster), origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PixelRect {
    /// Normalizes two drag corners given in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            x: min.x,
            y: min.y,
            w: max.x - min.x,
            h: max.y - min.y,
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            w: self.w * factor,
            h: self.h * factor,
        }
    }
}

/// The page surface as it appears on screen, in window logical pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBounds {
    pub min: Vec2,
    pub size: Vec2,
}

impl ContainerBounds {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.min + self.size;
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Pointer position within the container together with the container's pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativePointer {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RelativePointer {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The same point expressed in page percent.
    pub fn to_percent(&self) -> Vec2 {
        pixel_delta_to_percent(self.x, self.y, self.width, self.height)
    }
}

pub fn pointer_to_relative(pointer: Vec2, bounds: &ContainerBounds) -> RelativePointer {
    let offset = pointer - bounds.min;
    RelativePointer {
        x: offset.x,
        y: offset.y,
        width: bounds.size.x,
        height: bounds.size.y,
    }
}

/// Converts a pixel delta into a percent delta of the container. A zero-sized container
/// yields a zero delta.
pub fn pixel_delta_to_percent(dx: f32, dy: f32, container_width: f32, container_height: f32) -> Vec2 {
    let x = if container_width > 0.0 {
        dx / container_width * 100.0
    } else {
        0.0
    };
    let y = if container_height > 0.0 {
        dy / container_height * 100.0
    } else {
        0.0
    };
    Vec2::new(x, y)
}

pub fn percent_rect_to_canvas_pixels(
    rect: &PercentRect,
    canvas_width: f32,
    canvas_height: f32,
) -> PixelRect {
    PixelRect {
        x: rect.x / 100.0 * canvas_width,
        y: rect.y / 100.0 * canvas_height,
        w: rect.width / 100.0 * canvas_width,
        h: rect.height / 100.0 * canvas_height,
    }
}

pub fn canvas_pixels_to_percent_rect(
    rect: &PixelRect,
    canvas_width: f32,
    canvas_height: f32,
) -> PercentRect {
    let origin = pixel_delta_to_percent(rect.x, rect.y, canvas_width, canvas_height);
    let size = pixel_delta_to_percent(rect.w, rect.h, canvas_width, canvas_height);
    PercentRect::new(origin.x, origin.y, size.x, size.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn assert_rect_close(a: &PercentRect, b: &PercentRect) {
        assert!((a.x - b.x).abs() < EPSILON, "x: {} vs {}", a.x, b.x);
        assert!((a.y - b.y).abs() < EPSILON, "y: {} vs {}", a.y, b.y);
        assert!((a.width - b.width).abs() < EPSILON, "w: {} vs {}", a.width, b.width);
        assert!((a.height - b.height).abs() < EPSILON, "h: {} vs {}", a.height, b.height);
    }

    #[test]
    fn test_pointer_to_relative() {
        let bounds = ContainerBounds::new(Vec2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        let rel = pointer_to_relative(Vec2::new(300.0, 350.0), &bounds);
        assert_eq!(rel.x, 200.0);
        assert_eq!(rel.y, 300.0);
        assert_eq!(rel.width, 800.0);
        assert_eq!(rel.height, 600.0);
        assert_eq!(rel.to_percent(), Vec2::new(25.0, 50.0));
    }

    #[test]
    fn test_pixel_delta_to_percent() {
        let delta = pixel_delta_to_percent(40.0, -30.0, 800.0, 600.0);
        assert!((delta.x - 5.0).abs() < EPSILON);
        assert!((delta.y + 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_pixel_delta_zero_container() {
        assert_eq!(pixel_delta_to_percent(10.0, 10.0, 0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn test_percent_to_pixels_and_back() {
        let rect = PercentRect::new(12.5, 33.3, 20.0, 7.25);
        for (w, h) in [(800.0, 600.0), (1234.0, 987.0), (3.0, 5.0)] {
            let pixels = percent_rect_to_canvas_pixels(&rect, w, h);
            let back = canvas_pixels_to_percent_rect(&pixels, w, h);
            assert_rect_close(&rect, &back);
        }
    }

    #[test]
    fn test_overscan_survives_mapping() {
        let rect = PercentRect::new(95.0, 90.0, 20.0, 30.0);
        let pixels = percent_rect_to_canvas_pixels(&rect, 1000.0, 1000.0);
        assert_eq!(pixels.x + pixels.w, 1150.0);
        let back = canvas_pixels_to_percent_rect(&pixels, 1000.0, 1000.0);
        assert_rect_close(&rect, &back);
        assert!(back.bottom() > 100.0);
    }

    #[test]
    fn test_from_corners_normalizes_direction() {
        let rect = PixelRect::from_corners(Vec2::new(50.0, 80.0), Vec2::new(10.0, 20.0));
        assert_eq!(
            rect,
            PixelRect {
                x: 10.0,
                y: 20.0,
                w: 40.0,
                h: 60.0
            }
        );
    }

    #[test]
    fn test_container_contains_edges() {
        let bounds = ContainerBounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(bounds.contains(Vec2::new(0.0, 0.0)));
        assert!(bounds.contains(Vec2::new(10.0, 10.0)));
        assert!(!bounds.contains(Vec2::new(10.1, 5.0)));
    }

    #[test]
    fn test_percent_rect_contains() {
        let rect = PercentRect::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(Vec2::new(12.0, 14.0)));
        assert!(!rect.contains(Vec2::new(16.0, 14.0)));
    }
}
