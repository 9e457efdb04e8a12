//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Smallest width/height (in page percent) a mask may be edited down to
pub const MIN_MASK_SIZE_PCT: f32 = 0.5;

/// A drawn rectangle must exceed this many display pixels on both axes to become a mask
pub const MIN_DRAW_PIXELS: f32 = 5.0;

/// Upper bound for the sum of two opposing crop margins (percent)
pub const MAX_MARGIN_PAIR_SUM: f32 = 90.0;

/// Largest PDF accepted for editing (50 MiB)
pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Width reserved for the right-hand properties panel when not in fullscreen
pub const SIDE_PANEL_WIDTH: f32 = 300.0;

/// Height reserved for the top toolbar when not in fullscreen
pub const TOOLBAR_HEIGHT: f32 = 48.0;

/// Padding kept around the page surface inside the available area
pub const PAGE_PADDING: f32 = 24.0;

/// Fill color used for masks whose fill is not yet available (hex)
pub const DEFAULT_MASK_COLOR: &str = "#FFFFFF";
