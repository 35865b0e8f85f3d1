//! Target dimensions and the two ways of choosing them.
//!
//! A card either resizes by percentage (clamped to 1..=99) or by explicit
//! pixel width/height, optionally locked to the original aspect ratio.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Lowest accepted resize percentage.
pub const MIN_PERCENT: u8 = 1;

/// Highest accepted resize percentage.
pub const MAX_PERCENT: u8 = 99;

/// Percentage used when none is chosen.
pub const DEFAULT_PERCENT: u8 = 50;

/* --------------------------------------------------------------------------
Dimensions
-------------------------------------------------------------------------- */

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Validate that both sides are positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::Validation(format!(
                "Width and height must be greater than 0 (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width divided by height, or `None` for a degenerate image.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// Scale both sides by `percent` (clamped to 1..=99), keeping each side
    /// at least one pixel.
    pub fn scaled_by_percent(&self, percent: u8) -> Self {
        let p = clamp_percentage(percent as i64) as f64;
        let scale = |side: u32| ((side as f64 * p / 100.0).round() as u32).max(1);
        Self::new(scale(self.width), scale(self.height))
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Clamp an arbitrary percentage input into 1..=99.
pub fn clamp_percentage(value: i64) -> u8 {
    value.clamp(MIN_PERCENT as i64, MAX_PERCENT as i64) as u8
}

/// Height that keeps `ratio` (width / height) for the given width.
pub fn height_for_width(width: u32, ratio: f64) -> u32 {
    (width as f64 / ratio).round() as u32
}

/// Width that keeps `ratio` (width / height) for the given height.
pub fn width_for_height(height: u32, ratio: f64) -> u32 {
    (height as f64 * ratio).round() as u32
}

/* --------------------------------------------------------------------------
Resize mode
-------------------------------------------------------------------------- */

/// How the target size of a card is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Scale both sides by a percentage of the original.
    Percentage(u8),
    /// Explicit pixel sizes. A missing side is taken from the original, or
    /// derived from the other side when the aspect ratio is locked. When
    /// both sides are given and the ratio is locked, width wins.
    Pixels {
        width: Option<u32>,
        height: Option<u32>,
        keep_aspect_ratio: bool,
    },
}

impl Default for ResizeMode {
    fn default() -> Self {
        Self::Percentage(DEFAULT_PERCENT)
    }
}

impl ResizeMode {
    /// Compute the target dimensions for an image of size `original`.
    pub fn resolve(&self, original: Dimensions) -> Result<Dimensions, CoreError> {
        let target = match *self {
            ResizeMode::Percentage(p) => original.scaled_by_percent(p),
            ResizeMode::Pixels {
                width,
                height,
                keep_aspect_ratio,
            } => {
                let ratio = if keep_aspect_ratio {
                    original.aspect_ratio()
                } else {
                    None
                };
                match (width, height, ratio) {
                    (Some(w), _, Some(r)) => Dimensions::new(w, height_for_width(w, r)),
                    (None, Some(h), Some(r)) => Dimensions::new(width_for_height(h, r), h),
                    (w, h, _) => Dimensions::new(
                        w.unwrap_or(original.width),
                        h.unwrap_or(original.height),
                    ),
                }
            }
        };
        target.validate()?;
        Ok(target)
    }
}

/* --------------------------------------------------------------------------
Image header inspection
-------------------------------------------------------------------------- */

/// Read an image's dimensions from its header without decoding pixels.
pub fn read_dimensions(bytes: &[u8]) -> Result<Dimensions, CoreError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::Decode(format!("Failed to sniff image format: {e}")))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Decode(format!("Failed to read image header: {e}")))?;
    Ok(Dimensions::new(width, height))
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
