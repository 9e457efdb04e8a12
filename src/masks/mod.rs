//! Mask entities, the mask store and crop margins.

mod margins;
mod mask;
mod store;

#[cfg(test)]
mod tests;

pub use margins::{CropMargins, MarginEdge};
pub use mask::{EdgeDirection, EdgeSnapshot, FillType, Mask, MaskId};
pub use store::MaskStore;

use bevy::prelude::*;

pub struct MasksPlugin;

impl Plugin for MasksPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MaskStore>();
    }
}
