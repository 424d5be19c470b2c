#![forbid(unsafe_code)]

//! Gesture phase tracking for one row.
//!
//! [`GesturePhaseMachine`] turns the raw [`DragInput`] stream into discrete
//! [`PhaseStep`]s the row machine reacts to.
//!
//! # State Machine
//!
//! ```text
//!            sample |t| >= min          tick
//!   Idle ──────────────────▶ Started ─────────▶ Active
//!    ▲                          │                  │
//!    │        settle()          │ Ended            │ Ended
//!    ├───────────────── Ended ◀─┴──────────────────┤
//!    │                                              │ inactive sample
//!    └───────────────── Cancelled ◀─────────────────┘ or Cancelled
//! ```
//!
//! # Invariants
//!
//! 1. Exactly one phase is live at a time.
//! 2. `Started → Active` only happens through [`GesturePhaseMachine::promote`],
//!    which the row schedules one loop tick after the drag begins.
//! 3. An inactive sample while a gesture is in flight cancels it even if no
//!    end event ever arrives.
//! 4. `Ended` and `Cancelled` are transient: [`GesturePhaseMachine::settle`]
//!    returns them to `Idle` once the row finished processing them.
//!
//! # Failure Modes
//!
//! - End or cancel events without a live gesture (for example a drag shorter
//!   than the minimum distance) are ignored.

use tracing::debug;

/// Lifecycle phase of a row's drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Started,
    Active,
    Ended,
    Cancelled,
}

impl GesturePhase {
    /// Whether drag samples currently move the row.
    #[inline]
    #[must_use]
    pub fn is_tracking(self) -> bool {
        matches!(self, Self::Started | Self::Active)
    }
}

/// One continuous drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Horizontal translation from the drag origin, in layout units.
    pub translation: f64,
    /// Whether the platform still considers the drag live.
    pub is_active: bool,
}

impl DragSample {
    #[must_use]
    pub const fn active(translation: f64) -> Self {
        Self {
            translation,
            is_active: true,
        }
    }

    /// The "dragging stopped" signal with no accompanying end event.
    #[must_use]
    pub const fn inactive() -> Self {
        Self {
            translation: 0.0,
            is_active: false,
        }
    }
}

/// Input delivered by the drag source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    Sample(DragSample),
    /// The user released the drag.
    Ended { translation: f64 },
    /// The system took over the touch.
    Cancelled,
}

impl DragInput {
    #[must_use]
    pub const fn moved(translation: f64) -> Self {
        Self::Sample(DragSample::active(translation))
    }

    #[must_use]
    pub const fn ended(translation: f64) -> Self {
        Self::Ended { translation }
    }
}

/// What a drag input meant for the row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseStep {
    Ignored,
    /// A gesture began with this sample.
    Began { translation: f64 },
    Moved { translation: f64 },
    Released { translation: f64 },
    Interrupted,
}

/// Per-row drag phase tracker.
#[derive(Debug, Clone)]
pub struct GesturePhaseMachine {
    phase: GesturePhase,
    minimum_distance: f64,
}

impl GesturePhaseMachine {
    #[must_use]
    pub fn new(minimum_distance: f64) -> Self {
        Self {
            phase: GesturePhase::Idle,
            minimum_distance,
        }
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Feed one drag input.
    pub fn on_input(&mut self, input: DragInput) -> PhaseStep {
        match (self.phase, input) {
            (phase, DragInput::Sample(sample)) if sample.is_active => {
                if phase.is_tracking() {
                    PhaseStep::Moved {
                        translation: sample.translation,
                    }
                } else if sample.translation.abs() >= self.minimum_distance {
                    self.transition(GesturePhase::Started);
                    PhaseStep::Began {
                        translation: sample.translation,
                    }
                } else {
                    PhaseStep::Ignored
                }
            }
            (phase, DragInput::Sample(_) | DragInput::Cancelled) if phase.is_tracking() => {
                self.transition(GesturePhase::Cancelled);
                PhaseStep::Interrupted
            }
            (phase, DragInput::Ended { translation }) if phase.is_tracking() => {
                self.transition(GesturePhase::Ended);
                PhaseStep::Released { translation }
            }
            _ => PhaseStep::Ignored,
        }
    }

    /// Promote `Started` to `Active`. Returns `false` if the gesture already
    /// moved on.
    pub fn promote(&mut self) -> bool {
        if self.phase == GesturePhase::Started {
            self.transition(GesturePhase::Active);
            true
        } else {
            false
        }
    }

    /// Return a finished gesture to `Idle`.
    pub fn settle(&mut self) {
        if matches!(self.phase, GesturePhase::Ended | GesturePhase::Cancelled) {
            self.transition(GesturePhase::Idle);
        }
    }

    fn transition(&mut self, next: GesturePhase) {
        debug!(from = ?self.phase, to = ?next, "gesture phase");
        self.phase = next;
    }
}

impl Default for GesturePhaseMachine {
    fn default() -> Self {
        Self::new(15.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drag_does_not_start() {
        let mut m = GesturePhaseMachine::default();
        assert_eq!(m.on_input(DragInput::moved(-10.0)), PhaseStep::Ignored);
        assert_eq!(m.phase(), GesturePhase::Idle);
        assert_eq!(m.on_input(DragInput::ended(-10.0)), PhaseStep::Ignored);
    }

    #[test]
    fn full_lifecycle() {
        let mut m = GesturePhaseMachine::default();
        assert_eq!(
            m.on_input(DragInput::moved(-20.0)),
            PhaseStep::Began { translation: -20.0 }
        );
        assert_eq!(m.phase(), GesturePhase::Started);

        // Samples before the tick still move the row.
        assert_eq!(
            m.on_input(DragInput::moved(-30.0)),
            PhaseStep::Moved { translation: -30.0 }
        );
        assert!(m.promote());
        assert_eq!(m.phase(), GesturePhase::Active);
        assert!(!m.promote());

        assert_eq!(
            m.on_input(DragInput::ended(-40.0)),
            PhaseStep::Released { translation: -40.0 }
        );
        assert_eq!(m.phase(), GesturePhase::Ended);
        m.settle();
        assert_eq!(m.phase(), GesturePhase::Idle);
    }

    #[test]
    fn inactive_sample_cancels_without_end() {
        let mut m = GesturePhaseMachine::default();
        m.on_input(DragInput::moved(40.0));
        m.promote();
        assert_eq!(
            m.on_input(DragInput::Sample(DragSample::inactive())),
            PhaseStep::Interrupted
        );
        assert_eq!(m.phase(), GesturePhase::Cancelled);
        // A late end event after the cancellation is ignored.
        m.settle();
        assert_eq!(m.on_input(DragInput::ended(40.0)), PhaseStep::Ignored);
    }

    #[test]
    fn explicit_cancel_from_started() {
        let mut m = GesturePhaseMachine::default();
        m.on_input(DragInput::moved(16.0));
        assert_eq!(m.on_input(DragInput::Cancelled), PhaseStep::Interrupted);
        assert!(!m.promote());
    }

    #[test]
    fn idle_cancel_is_ignored() {
        let mut m = GesturePhaseMachine::default();
        assert_eq!(m.on_input(DragInput::Cancelled), PhaseStep::Ignored);
        assert_eq!(
            m.on_input(DragInput::Sample(DragSample::inactive())),
            PhaseStep::Ignored
        );
    }

    #[test]
    fn nan_translation_never_starts() {
        let mut m = GesturePhaseMachine::default();
        assert_eq!(m.on_input(DragInput::moved(f64::NAN)), PhaseStep::Ignored);
    }
}
