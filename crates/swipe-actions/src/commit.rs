#![forbid(unsafe_code)]

//! Release-time decisions for a swiped row.
//!
//! [`CommitPolicy::evaluate`] runs once per completed gesture and makes two
//! independent decisions against the same release:
//!
//! 1. **Resting position.** If the offset magnitude exceeds the reveal
//!    threshold the row snaps fully open on that side and claims the
//!    coordinator; otherwise it closes.
//! 2. **Full swipe.** If full swipe is allowed and the release translation
//!    covers more than `full_swipe_ratio` of the content width in the closing
//!    direction, the row slides out to `-content_width` and the role decides
//!    what happens next. The action fires exactly once.
//!
//! # Failure Modes
//!
//! None. Every branch is total: zero or NaN widths simply never reach a
//! threshold.

use crate::config::SwipeConfig;
use crate::measure::Edge;

/// What a qualifying full swipe does to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FullSwipeRole {
    /// Collapse the row (height → 0) and fire the action.
    Destructive,
    /// Snap the row closed and fire the action.
    Cancel,
    /// Leave the row slid out and fire the action.
    #[default]
    Default,
}

/// Where a row comes to rest after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestingPosition {
    Closed,
    Open(Edge),
}

/// Everything the policy looks at when a gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitInput {
    pub offset: f64,
    /// Direction-corrected release translation.
    pub translation_width: f64,
    pub content_width: f64,
    pub max_leading_offset: f64,
    pub min_trailing_offset: f64,
    pub allows_full_swipe: bool,
    pub role: FullSwipeRole,
}

/// The policy's verdict for one release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitDecision {
    /// Step 1: resting side.
    pub resting: RestingPosition,
    /// Step 1: offset the row settles at before any full swipe.
    pub settle_offset: f64,
    /// Step 2: the role applied if the full-swipe threshold was met.
    pub full_swipe: Option<FullSwipeRole>,
    /// Step 2: offset a full swipe animates to (`-content_width`).
    pub full_swipe_offset: f64,
}

impl CommitDecision {
    /// Collapse the decision into the row's final outcome.
    #[must_use]
    pub fn result(&self) -> CommitResult {
        let (resting_offset, became_deleted) = match self.full_swipe {
            None => (self.settle_offset, false),
            Some(FullSwipeRole::Destructive) => (self.full_swipe_offset, true),
            Some(FullSwipeRole::Cancel) => (0.0, false),
            Some(FullSwipeRole::Default) => (self.full_swipe_offset, false),
        };
        CommitResult {
            resting_offset,
            became_deleted,
            fired_action: self.full_swipe.is_some(),
        }
    }
}

/// Final outcome of a committed gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitResult {
    pub resting_offset: f64,
    pub became_deleted: bool,
    pub fired_action: bool,
}

/// Thresholds used to judge a release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitPolicy {
    pub reveal_threshold: f64,
    pub full_swipe_ratio: f64,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::from_config(&SwipeConfig::default())
    }
}

impl CommitPolicy {
    #[must_use]
    pub fn from_config(config: &SwipeConfig) -> Self {
        Self {
            reveal_threshold: config.reveal_threshold,
            full_swipe_ratio: config.full_swipe_ratio,
        }
    }

    /// Decide the resting position and full-swipe outcome of a release.
    #[must_use]
    pub fn evaluate(&self, input: &CommitInput) -> CommitDecision {
        let (resting, settle_offset) = if input.offset.abs() > self.reveal_threshold {
            if input.offset > 0.0 {
                (RestingPosition::Open(Edge::Leading), input.max_leading_offset)
            } else {
                (RestingPosition::Open(Edge::Trailing), input.min_trailing_offset)
            }
        } else {
            (RestingPosition::Closed, 0.0)
        };

        let full_swipe = self
            .is_full_swipe(
                input.allows_full_swipe,
                input.translation_width,
                input.content_width,
            )
            .then_some(input.role);

        CommitDecision {
            resting,
            settle_offset,
            full_swipe,
            full_swipe_offset: -input.content_width,
        }
    }

    /// Whether a release translation qualifies as a full swipe.
    #[must_use]
    pub fn is_full_swipe(
        &self,
        allows_full_swipe: bool,
        translation_width: f64,
        content_width: f64,
    ) -> bool {
        allows_full_swipe
            && content_width > 0.0
            && translation_width < -(content_width * self.full_swipe_ratio)
    }
}
