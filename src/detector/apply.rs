//! Turning detector results into session state.

use bevy::prelude::*;

use crate::constants::{DEFAULT_MASK_COLOR, MIN_MASK_SIZE_PCT};
use crate::document::NoticeLevel;
use crate::editor::coords::PercentRect;
use crate::error::DetectorError;
use crate::export::parse_hex_color;
use crate::masks::{CropMargins, Mask, MaskId, MaskStore};

use super::client::{DetectedMask, clamp_percent};

/// Normalized `#RRGGBB`, falling back to the default fill for anything unparseable
fn normalize_color(color: Option<&str>) -> String {
    match color {
        Some(raw) => {
            let [r, g, b] = parse_hex_color(raw);
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        }
        None => DEFAULT_MASK_COLOR.to_string(),
    }
}

/// Adds one solid mask per descriptor, scoped to `page`. Sizes are floored at the
/// smallest mask the editor can draw. Returns the new ids in order.
pub fn assign_detected_masks(
    store: &mut MaskStore,
    descriptors: &[DetectedMask],
    page: usize,
) -> Vec<MaskId> {
    descriptors
        .iter()
        .map(|descriptor| {
            let rect = PercentRect::new(
                clamp_percent(descriptor.x),
                clamp_percent(descriptor.y),
                clamp_percent(descriptor.width).max(MIN_MASK_SIZE_PCT),
                clamp_percent(descriptor.height).max(MIN_MASK_SIZE_PCT),
            );
            let id = store.allocate_id();
            store.add(Mask::solid(
                id,
                rect,
                normalize_color(descriptor.color.as_deref()),
                Some(page),
            ));
            id
        })
        .collect()
}

/// What a finished margin suggestion does to the session
#[derive(Debug, PartialEq)]
pub struct MarginsOutcome {
    /// New margins, or `None` to leave the current ones untouched
    pub margins: Option<CropMargins>,
    pub level: NoticeLevel,
    pub message: String,
}

/// Timeouts keep the current margins; any other failure falls back to zero margins.
pub fn resolve_margins(result: Result<CropMargins, DetectorError>) -> MarginsOutcome {
    match result {
        Ok(margins) => MarginsOutcome {
            margins: Some(margins),
            level: NoticeLevel::Info,
            message: format!(
                "Suggested margins: top {:.1}%, bottom {:.1}%, left {:.1}%, right {:.1}%",
                margins.top, margins.bottom, margins.left, margins.right
            ),
        },
        Err(DetectorError::Timeout) => {
            warn!("Margin suggestion timed out");
            MarginsOutcome {
                margins: None,
                level: NoticeLevel::Warning,
                message: "Margin suggestion timed out; margins left unchanged".to_string(),
            }
        }
        Err(e) => {
            warn!("Margin suggestion failed: {}", e);
            MarginsOutcome {
                margins: Some(CropMargins::default()),
                level: NoticeLevel::Warning,
                message: format!("Margin suggestion failed ({}); margins reset to zero", e),
            }
        }
    }
}

/// Failed mask suggestions add nothing. Returns the descriptors to add and the notice.
pub fn resolve_masks(
    result: Result<Vec<DetectedMask>, DetectorError>,
) -> (Vec<DetectedMask>, NoticeLevel, String) {
    match result {
        Ok(masks) if masks.is_empty() => (
            masks,
            NoticeLevel::Info,
            "No masks suggested for this page".to_string(),
        ),
        Ok(masks) => {
            let message = format!("Added {} suggested masks", masks.len());
            (masks, NoticeLevel::Info, message)
        }
        Err(DetectorError::Timeout) => (
            Vec::new(),
            NoticeLevel::Warning,
            "Mask suggestion timed out; masks left unchanged".to_string(),
        ),
        Err(e) => {
            warn!("Mask suggestion failed: {}", e);
            (
                Vec::new(),
                NoticeLevel::Warning,
                format!("Mask suggestion failed: {}", e),
            )
        }
    }
}
