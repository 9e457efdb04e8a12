//! Pointer interaction over the page surface.
//!
//! This module handles everything the pointer does to masks:
//! - Drawing new masks on empty surface
//! - Dragging and resizing existing masks with baseline snapshots
//! - Handle hit-testing and cursor feedback
//! - Selection gizmos
//!
//! The state machine itself (`machine`, `resize`, `hit_detection`) is plain Rust; the bevy
//! systems in `systems` feed it pointer positions projected onto the page surface.

mod cursor;
mod gizmos;
mod hit_detection;
mod machine;
mod resize;
mod systems;


use bevy::prelude::*;

use crate::common::ResizeHandle;
use crate::masks::{Mask, MaskId};

pub use cursor::update_interaction_cursor;
pub use gizmos::{
    InteractionGizmoGroup, configure_interaction_gizmos, draw_crop_guides, draw_selection_gizmos,
};
pub use hit_detection::{handle_at_position, hit_test};
pub use machine::{cancel, pointer_down, pointer_move, pointer_up};
pub use resize::{apply_move, apply_resize};
pub use systems::{
    cancel_on_context_change, cancel_on_focus_loss, handle_pointer_down, handle_pointer_drag,
    handle_pointer_release, prune_selection,
};

/// Visual size of a resize handle in display pixels
pub(crate) const HANDLE_SIZE: f32 = 8.0;

/// What sits under the pointer when a gesture starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// A resize handle of the selected mask
    Handle(MaskId, ResizeHandle),
    /// The body of a mask visible on the current page
    Mask(MaskId),
    /// Page surface with no mask under the pointer
    Surface,
    /// Off the page surface
    Outside,
}

/// The active pointer gesture.
///
/// Points are container-relative display pixels. `baseline` is the mask as it was when
/// the gesture started; every intermediate result is computed from it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing {
        start: Vec2,
        current: Vec2,
    },
    Dragging {
        mask_id: MaskId,
        baseline: Mask,
        start: Vec2,
    },
    Resizing {
        mask_id: MaskId,
        baseline: Mask,
        handle: ResizeHandle,
        start: Vec2,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

#[derive(Resource, Debug, Default)]
pub struct InteractionState {
    pub interaction: Interaction,
    pub selected: Option<MaskId>,
}

impl InteractionState {
    pub fn is_active(&self) -> bool {
        !self.interaction.is_idle()
    }
}
