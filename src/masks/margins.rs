use serde::{Deserialize, Serialize};

use crate::constants::MAX_MARGIN_PAIR_SUM;
use crate::editor::coords::PercentRect;

/// One of the four page edges a crop margin is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl MarginEdge {
    pub fn all() -> &'static [MarginEdge] {
        &[
            MarginEdge::Top,
            MarginEdge::Bottom,
            MarginEdge::Left,
            MarginEdge::Right,
        ]
    }

    pub fn opposite(&self) -> MarginEdge {
        match self {
            MarginEdge::Top => MarginEdge::Bottom,
            MarginEdge::Bottom => MarginEdge::Top,
            MarginEdge::Left => MarginEdge::Right,
            MarginEdge::Right => MarginEdge::Left,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MarginEdge::Top => "Top",
            MarginEdge::Bottom => "Bottom",
            MarginEdge::Left => "Left",
            MarginEdge::Right => "Right",
        }
    }
}

/// Percent strips removed from each page edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropMargins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl CropMargins {
    /// Builds margins by applying each edge in turn through [`CropMargins::set_edge`].
    pub fn clamped(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        let mut margins = Self::default();
        margins.set_edge(MarginEdge::Top, top);
        margins.set_edge(MarginEdge::Bottom, bottom);
        margins.set_edge(MarginEdge::Left, left);
        margins.set_edge(MarginEdge::Right, right);
        margins
    }

    pub fn get(&self, edge: MarginEdge) -> f32 {
        match edge {
            MarginEdge::Top => self.top,
            MarginEdge::Bottom => self.bottom,
            MarginEdge::Left => self.left,
            MarginEdge::Right => self.right,
        }
    }

    /// Sets one edge, clamped to 0-100 and so that it plus its opposite stays within
    /// the pair limit. Only the edited pair is checked. Returns the stored value.
    pub fn set_edge(&mut self, edge: MarginEdge, value: f32) -> f32 {
        let value = if value.is_finite() { value } else { 0.0 };
        let limit = (MAX_MARGIN_PAIR_SUM - self.get(edge.opposite())).max(0.0);
        let clamped = value.clamp(0.0, 100.0).min(limit);
        *self.slot(edge) = clamped;
        clamped
    }

    /// The page area these margins keep, in top-left page percent
    pub fn kept_area(&self) -> PercentRect {
        PercentRect::new(
            self.left,
            self.top,
            (100.0 - self.left - self.right).max(0.0),
            (100.0 - self.top - self.bottom).max(0.0),
        )
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }

    fn slot(&mut self, edge: MarginEdge) -> &mut f32 {
        match edge {
            MarginEdge::Top => &mut self.top,
            MarginEdge::Bottom => &mut self.bottom,
            MarginEdge::Left => &mut self.left,
            MarginEdge::Right => &mut self.right,
        }
    }
}
