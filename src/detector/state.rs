use std::time::Instant;

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::error::DetectorError;
use crate::masks::CropMargins;

use super::client::DetectedMask;

/// Which suggestion is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKind {
    Margins,
    Masks,
}

impl DetectionKind {
    /// Value of the `task` field on the wire
    pub fn task_name(&self) -> &'static str {
        match self {
            DetectionKind::Margins => "margins",
            DetectionKind::Masks => "masks",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DetectionKind::Margins => "Suggest margins",
            DetectionKind::Masks => "Suggest masks",
        }
    }
}

/// Message to ask the detector about the current page
#[derive(Message, Debug, Clone, Copy)]
pub struct RequestDetection {
    pub kind: DetectionKind,
}

#[derive(Debug)]
pub enum DetectionOutcome {
    Margins(Result<CropMargins, DetectorError>),
    Masks(Result<Vec<DetectedMask>, DetectorError>),
}

/// Background detector call.
///
/// The target page and document are captured when the request is made so results land
/// where the user asked, even after navigating away.
#[derive(Component)]
pub struct DetectorTask {
    pub kind: DetectionKind,
    pub page: usize,
    pub document_generation: u64,
    pub deadline: Instant,
    pub task: Task<DetectionOutcome>,
}

/// Tracks the in-flight request so the buttons can be disabled
#[derive(Resource, Default)]
pub struct DetectorStatus {
    pub busy: Option<DetectionKind>,
}

impl DetectorStatus {
    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }
}
