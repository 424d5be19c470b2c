#![forbid(unsafe_code)]

//! Pure offset resolution for a dragged row.
//!
//! Maps a raw drag translation onto the row's horizontal offset:
//!
//! 1. Mirror the translation for right-to-left layouts.
//! 2. Add the sticky offset carried over from the previous commit.
//! 3. Clamp into `[lower, upper]`, where `upper` is the leading panel width
//!    and `lower` is either the negated trailing panel width or, when full
//!    swipe is allowed, the negated content width.
//!
//! # Invariants
//!
//! 1. `lower <= 0 <= upper` for every [`OffsetBounds`].
//! 2. [`resolve_offset`] always returns a value inside its bounds, including
//!    for NaN translations (which resolve to the lower bound).

use crate::environment::LayoutDirection;
use crate::measure::MeasurementCache;

/// Inclusive offset range for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OffsetBounds {
    /// Bounds from raw panel extents.
    #[must_use]
    pub fn new(
        max_leading_offset: f64,
        min_trailing_offset: f64,
        content_width: f64,
        allows_full_swipe: bool,
    ) -> Self {
        let lower = if allows_full_swipe {
            -content_width
        } else {
            min_trailing_offset
        };
        Self {
            lower: lower.min(0.0),
            upper: max_leading_offset.max(0.0),
        }
    }

    /// Bounds for the current measurements.
    #[must_use]
    pub fn from_cache(cache: &MeasurementCache, allows_full_swipe: bool) -> Self {
        Self::new(
            cache.max_leading_offset(),
            cache.min_trailing_offset(),
            cache.content_width(),
            allows_full_swipe,
        )
    }

    /// Clamp a value into the bounds. NaN maps to `lower`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        // `f64::clamp` would propagate NaN; max/min discard it.
        value.max(self.lower).min(self.upper)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Inputs of one offset resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetInput {
    pub raw_translation: f64,
    pub old_offset: f64,
    pub layout_direction: LayoutDirection,
    pub max_leading_offset: f64,
    pub min_trailing_offset: f64,
    pub content_width: f64,
    pub allows_full_swipe: bool,
}

impl OffsetInput {
    #[must_use]
    pub fn bounds(&self) -> OffsetBounds {
        OffsetBounds::new(
            self.max_leading_offset,
            self.min_trailing_offset,
            self.content_width,
            self.allows_full_swipe,
        )
    }
}

/// Resolve the clamped offset for a drag sample.
#[must_use]
pub fn resolve_offset(input: &OffsetInput) -> f64 {
    let signed = input.layout_direction.signed(input.raw_translation);
    input.bounds().clamp(signed + input.old_offset)
}
