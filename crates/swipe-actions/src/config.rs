#![forbid(unsafe_code)]

//! Tunable thresholds for swipe recognition and commit decisions.
//!
//! [`SwipeConfig`] groups every constant the row machine consults so hosts
//! can adjust them without recompiling. With the `config` feature it can be
//! loaded from TOML or JSON.
//!
//! ```toml
//! # swipe.toml
//! reveal_threshold = 25.0
//! full_swipe_ratio = 0.7
//! minimum_drag_distance = 15.0
//! haptics_enabled = true
//!
//! [haptic_feedback]
//! style = "heavy"
//! intensity = 1.0
//! ```
//!
//! ```rust,ignore
//! let config = SwipeConfig::from_toml_file("swipe.toml")?;
//! let config = SwipeConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `SwipeConfig::default()` reproduces the stock behaviour: a 25-unit reveal
//! threshold, full swipe at 70% of the row width, and a 15-unit minimum drag.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::environment::HapticFeedback;

/// Thresholds consulted by the row machine and the commit policy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SwipeConfig {
    /// Offset magnitude above which a released row snaps open (default: 25.0).
    pub reveal_threshold: f64,
    /// Fraction of the content width a closing drag must cover to trigger a
    /// full swipe (default: 0.7).
    pub full_swipe_ratio: f64,
    /// Translation magnitude before a drag is recognized (default: 15.0).
    pub minimum_drag_distance: f64,
    /// Whether a full swipe emits a haptic pulse (default: true).
    pub haptics_enabled: bool,
    /// Pulse emitted on full swipe (default: heavy impact).
    pub haptic_feedback: HapticFeedback,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 25.0,
            full_swipe_ratio: 0.7,
            minimum_drag_distance: 15.0,
            haptics_enabled: true,
            haptic_feedback: HapticFeedback::heavy(),
        }
    }
}

impl SwipeConfig {
    /// Set the reveal threshold (builder pattern).
    #[must_use]
    pub fn with_reveal_threshold(mut self, threshold: f64) -> Self {
        self.reveal_threshold = threshold;
        self
    }

    /// Set the full-swipe ratio (builder pattern).
    #[must_use]
    pub fn with_full_swipe_ratio(mut self, ratio: f64) -> Self {
        self.full_swipe_ratio = ratio;
        self
    }

    /// Set the minimum drag distance (builder pattern).
    #[must_use]
    pub fn with_minimum_drag_distance(mut self, distance: f64) -> Self {
        self.minimum_drag_distance = distance;
        self
    }

    /// Disable the full-swipe haptic pulse.
    #[must_use]
    pub fn without_haptics(mut self) -> Self {
        self.haptics_enabled = false;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, SwipeConfigError> {
        let config: Self = toml::from_str(s).map_err(SwipeConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SwipeConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SwipeConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, SwipeConfigError> {
        let config: Self = serde_json::from_str(s).map_err(SwipeConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SwipeConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SwipeConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.reveal_threshold.is_finite() && self.reveal_threshold >= 0.0) {
            errors.push(format!(
                "reveal_threshold must be finite and >= 0, got {}",
                self.reveal_threshold
            ));
        }

        // A ratio above 1.0 can never be reached since offsets clamp at the
        // content width.
        if !(self.full_swipe_ratio > 0.0 && self.full_swipe_ratio <= 1.0) {
            errors.push(format!(
                "full_swipe_ratio must be in (0, 1], got {}",
                self.full_swipe_ratio
            ));
        }

        if !(self.minimum_drag_distance.is_finite() && self.minimum_drag_distance >= 0.0) {
            errors.push(format!(
                "minimum_drag_distance must be finite and >= 0, got {}",
                self.minimum_drag_distance
            ));
        }

        let intensity = self.haptic_feedback.intensity;
        if !(0.0..=1.0).contains(&intensity) {
            errors.push(format!(
                "haptic_feedback.intensity must be in [0, 1], got {intensity}"
            ));
        }

        errors
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, SwipeConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SwipeConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a swipe configuration.
#[derive(Debug)]
pub enum SwipeConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SwipeConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SwipeConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
