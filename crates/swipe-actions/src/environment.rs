#![forbid(unsafe_code)]

//! Environment values a row reads from its host.
//!
//! These are the inputs the rendering layer owns rather than the row:
//! layout direction, whether haptics are wanted, and which pulse to emit.
//! [`SwipeEnvironment`] overrides take precedence over the matching
//! [`SwipeConfig`](crate::config::SwipeConfig) defaults.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::config::SwipeConfig;

/// Horizontal reading direction. Right-to-left mirrors drag translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    /// Map a raw horizontal translation into leading-positive space.
    #[inline]
    #[must_use]
    pub fn signed(self, raw: f64) -> f64 {
        match self {
            Self::LeftToRight => raw,
            Self::RightToLeft => -raw,
        }
    }
}

/// Impact style of a haptic pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Soft,
    Rigid,
}

/// A haptic pulse request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct HapticFeedback {
    pub style: ImpactStyle,
    /// Relative strength in `[0, 1]`.
    pub intensity: f64,
}

impl HapticFeedback {
    #[must_use]
    pub const fn new(style: ImpactStyle, intensity: f64) -> Self {
        Self { style, intensity }
    }

    /// Full-strength heavy impact, the default full-swipe pulse.
    #[must_use]
    pub const fn heavy() -> Self {
        Self::new(ImpactStyle::Heavy, 1.0)
    }

    #[must_use]
    pub const fn light() -> Self {
        Self::new(ImpactStyle::Light, 1.0)
    }
}

/// Sink for haptic pulses. Fire-and-forget: failures are the provider's
/// problem and never reach the row.
pub trait HapticProvider {
    fn trigger(&self, feedback: HapticFeedback);
}

impl<F: Fn(HapticFeedback)> HapticProvider for F {
    fn trigger(&self, feedback: HapticFeedback) {
        self(feedback);
    }
}

/// Provider that drops every pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl HapticProvider for NoopHaptics {
    fn trigger(&self, _feedback: HapticFeedback) {}
}

/// Values inherited from the host view hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SwipeEnvironment {
    /// Read once when a gesture starts.
    pub layout_direction: LayoutDirection,
    /// Overrides [`SwipeConfig::haptics_enabled`] when set.
    pub haptics_enabled: Option<bool>,
    /// Overrides [`SwipeConfig::haptic_feedback`] when set.
    pub haptic_feedback: Option<HapticFeedback>,
}

impl SwipeEnvironment {
    #[must_use]
    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, enabled: bool) -> Self {
        self.haptics_enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_haptic_feedback(mut self, feedback: HapticFeedback) -> Self {
        self.haptic_feedback = Some(feedback);
        self
    }

    /// The pulse a full swipe should emit, or `None` when haptics are off.
    #[must_use]
    pub fn full_swipe_haptic(&self, config: &SwipeConfig) -> Option<HapticFeedback> {
        let enabled = self.haptics_enabled.unwrap_or(config.haptics_enabled);
        enabled.then(|| self.haptic_feedback.unwrap_or(config.haptic_feedback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn rtl_mirrors_translation() {
        assert_eq!(LayoutDirection::LeftToRight.signed(-40.0), -40.0);
        assert_eq!(LayoutDirection::RightToLeft.signed(-40.0), 40.0);
    }

    #[test]
    fn environment_overrides_config() {
        let config = SwipeConfig::default();
        let env = SwipeEnvironment::default();
        assert_eq!(env.full_swipe_haptic(&config), Some(HapticFeedback::heavy()));

        let env = env.with_haptic_feedback(HapticFeedback::light());
        assert_eq!(env.full_swipe_haptic(&config), Some(HapticFeedback::light()));

        let env = env.with_haptics(false);
        assert_eq!(env.full_swipe_haptic(&config), None);

        let quiet = SwipeConfig::default().without_haptics();
        let env = SwipeEnvironment::default().with_haptics(true);
        assert!(env.full_swipe_haptic(&quiet).is_some());
    }

    #[test]
    fn closures_are_providers() {
        let count = Cell::new(0);
        let provider = |_: HapticFeedback| count.set(count.get() + 1);
        provider.trigger(HapticFeedback::heavy());
        NoopHaptics.trigger(HapticFeedback::heavy());
        assert_eq!(count.get(), 1);
    }
}
