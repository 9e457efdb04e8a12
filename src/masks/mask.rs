use std::sync::Arc;

use bevy::math::Vec2;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MASK_COLOR;
use crate::editor::coords::PercentRect;

/// Stable mask identifier, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaskId(pub u64);

/// Page edge a clone fill copies its texture from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl EdgeDirection {
    /// Top/bottom strips are one pixel tall, left/right strips one pixel wide.
    pub fn is_horizontal_strip(&self) -> bool {
        matches!(self, EdgeDirection::Top | EdgeDirection::Bottom)
    }
}

/// Strategy for painting a mask's interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillType {
    #[default]
    Solid,
    CloneTop,
    CloneBottom,
    CloneLeft,
    CloneRight,
}

impl FillType {
    pub fn all() -> &'static [FillType] {
        &[
            FillType::Solid,
            FillType::CloneTop,
            FillType::CloneBottom,
            FillType::CloneLeft,
            FillType::CloneRight,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FillType::Solid => "Solid color",
            FillType::CloneTop => "Clone from above",
            FillType::CloneBottom => "Clone from below",
            FillType::CloneLeft => "Clone from left",
            FillType::CloneRight => "Clone from right",
        }
    }

    /// Edge sampled by clone variants; `None` for solid fills.
    pub fn clone_direction(&self) -> Option<EdgeDirection> {
        match self {
            FillType::Solid => None,
            FillType::CloneTop => Some(EdgeDirection::Top),
            FillType::CloneBottom => Some(EdgeDirection::Bottom),
            FillType::CloneLeft => Some(EdgeDirection::Left),
            FillType::CloneRight => Some(EdgeDirection::Right),
        }
    }

    pub fn is_clone(&self) -> bool {
        self.clone_direction().is_some()
    }
}

/// A captured one-pixel strip stretched over a clone-filled mask.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSnapshot {
    pub direction: EdgeDirection,
    /// N x 1 for top/bottom, 1 x N for left/right
    pub strip: RgbaImage,
}

/// A rectangular patch over page content.
///
/// Geometry is in percent of the rendered page; `page_index` of `None` means the mask
/// applies to every page.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub id: MaskId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// `#RRGGBB`, used when `fill_type` is solid
    pub color: String,
    pub fill_type: FillType,
    pub image_snapshot: Option<Arc<EdgeSnapshot>>,
    pub page_index: Option<usize>,
}

impl Mask {
    pub fn solid(id: MaskId, rect: PercentRect, color: impl Into<String>, page_index: Option<usize>) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: color.into(),
            fill_type: FillType::Solid,
            image_snapshot: None,
            page_index,
        }
    }

    pub fn rect(&self) -> PercentRect {
        PercentRect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: PercentRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub fn is_global(&self) -> bool {
        self.page_index.is_none()
    }

    pub fn applies_to_page(&self, page: usize) -> bool {
        self.page_index.is_none_or(|p| p == page)
    }

    pub fn contains(&self, point_pct: Vec2) -> bool {
        self.rect().contains(point_pct)
    }

    /// Whether the fields a snapshot depends on differ between `self` and `other`.
    pub fn snapshot_inputs_differ(&self, other: &Mask) -> bool {
        self.x != other.x
            || self.y != other.y
            || self.width != other.width
            || self.height != other.height
            || self.fill_type != other.fill_type
            || self.page_index != other.page_index
    }

    /// A clone-filled mask that still has no captured strip.
    pub fn needs_snapshot(&self) -> bool {
        self.fill_type.is_clone() && self.image_snapshot.is_none()
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::solid(MaskId(0), PercentRect::default(), DEFAULT_MASK_COLOR, None)
    }
}
