//! Margin and mask suggestions from an external vision service.

mod apply;
mod client;
mod state;
mod systems;


pub use apply::{MarginsOutcome, assign_detected_masks, resolve_margins, resolve_masks};
pub use client::{DetectedMask, Detector, HttpDetector};
pub use state::{DetectionKind, DetectorStatus, RequestDetection};

use bevy::prelude::*;

use crate::editor::conditions::document_loaded;

pub struct DetectorPlugin;

impl Plugin for DetectorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DetectorStatus>()
            .add_message::<RequestDetection>()
            .add_systems(
                Update,
                (
                    systems::handle_detection_requests
                        .run_if(on_message::<RequestDetection>.and(document_loaded)),
                    systems::poll_detector_tasks,
                    systems::drop_stale_detector_tasks
                        .run_if(resource_changed::<crate::document::EditorSession>),
                )
                    .chain(),
            );
    }
}
