//! Common types shared across multiple modules.
//!
//! The resize handle set is used by the interaction machine, hit detection,
//! cursor feedback and gizmo drawing.

use bevy::window::{CursorIcon, SystemCursorIcon};

/// One of the eight resize affordances around a selected mask.
///
/// Compass letters name the edges a handle moves: `E`/`W` drive the x-axis,
/// `N`/`S` drive the y-axis, corners drive both.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ResizeHandle {
    NW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn moves_west(&self) -> bool {
        matches!(self, ResizeHandle::NW | ResizeHandle::W | ResizeHandle::SW)
    }

    pub fn moves_east(&self) -> bool {
        matches!(self, ResizeHandle::NE | ResizeHandle::E | ResizeHandle::SE)
    }

    pub fn moves_north(&self) -> bool {
        matches!(self, ResizeHandle::NW | ResizeHandle::N | ResizeHandle::NE)
    }

    pub fn moves_south(&self) -> bool {
        matches!(self, ResizeHandle::SW | ResizeHandle::S | ResizeHandle::SE)
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::NW | ResizeHandle::NE | ResizeHandle::SE | ResizeHandle::SW
        )
    }

    /// Anchor of the handle on a unit rectangle (0,0 = top-left, 1,1 = bottom-right).
    pub fn anchor(&self) -> (f32, f32) {
        match self {
            ResizeHandle::NW => (0.0, 0.0),
            ResizeHandle::N => (0.5, 0.0),
            ResizeHandle::NE => (1.0, 0.0),
            ResizeHandle::E => (1.0, 0.5),
            ResizeHandle::SE => (1.0, 1.0),
            ResizeHandle::S => (0.5, 1.0),
            ResizeHandle::SW => (0.0, 1.0),
            ResizeHandle::W => (0.0, 0.5),
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            ResizeHandle::N | ResizeHandle::S => CursorIcon::System(SystemCursorIcon::NsResize),
            ResizeHandle::E | ResizeHandle::W => CursorIcon::System(SystemCursorIcon::EwResize),
            ResizeHandle::NE | ResizeHandle::SW => {
                CursorIcon::System(SystemCursorIcon::NeswResize)
            }
            ResizeHandle::NW | ResizeHandle::SE => {
                CursorIcon::System(SystemCursorIcon::NwseResize)
            }
        }
    }
}
