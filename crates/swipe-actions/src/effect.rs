#![forbid(unsafe_code)]

//! Side effects produced by the row machine, returned as data.
//!
//! [`RowMachine::handle`](crate::machine::RowMachine::handle) never performs
//! I/O or calls back into the host. It returns [`SwipeEffect`]s in the order
//! they must be applied, and [`RowController`](crate::row::RowController)
//! applies them. Within one gesture the order is fixed: animation hints for
//! the new phase/offset first, then the coordinator claim, then the haptic
//! pulse, then the action. Deferred tasks go last.
//!
//! [`SwipeEffect::Animate`] and [`SwipeEffect::Defer`] stay inside the row;
//! the rest reach the coordinator or the host.

use crate::environment::HapticFeedback;
use crate::identity::RowIdentity;
use crate::measure::Edge;

/// How the rendering layer should move to the row's new layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Follow the finger; implicit short animation.
    Track,
    /// Spring into an open resting position.
    Settle,
    /// Return to offset 0 with the default animation.
    Reset,
    /// Slide the row content fully out.
    FullSwipe,
    /// Collapse the row to zero height; no fade on the panels.
    Collapse,
    /// Jump without animating (restored after a remount).
    Snap,
}

/// Work scheduled for the next event-loop turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferredTask {
    /// Update the host's tap-allowed flag.
    SetTapAllowed(bool),
    /// Promote a started gesture to active.
    Activate,
}

/// One effect of a row transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEffect {
    Animate(AnimationKind),
    /// Write `Opened(identity)` to the coordinator, resting on `edge`.
    Claim { identity: RowIdentity, edge: Edge },
    /// The row closed itself; drop its resting edge from the coordinator
    /// without broadcasting.
    Release { identity: RowIdentity },
    Haptic(HapticFeedback),
    FireAction,
    Defer(DeferredTask),
}

/// FIFO of tasks waiting for the next loop turn.
///
/// Tasks pushed while a batch is running wait for the following turn.
#[derive(Debug, Clone, Default)]
pub struct TickQueue {
    pending: Vec<DeferredTask>,
}

impl TickQueue {
    pub fn push(&mut self, task: DeferredTask) {
        self.pending.push(task);
    }

    /// Take every task scheduled so far.
    #[must_use]
    pub fn take(&mut self) -> Vec<DeferredTask> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_in_order() {
        let mut q = TickQueue::default();
        q.push(DeferredTask::SetTapAllowed(false));
        q.push(DeferredTask::Activate);
        assert_eq!(q.len(), 2);
        assert_eq!(
            q.take(),
            vec![DeferredTask::SetTapAllowed(false), DeferredTask::Activate]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn tasks_pushed_after_take_wait() {
        let mut q = TickQueue::default();
        q.push(DeferredTask::Activate);
        let batch = q.take();
        q.push(DeferredTask::SetTapAllowed(true));
        assert_eq!(batch, vec![DeferredTask::Activate]);
        assert_eq!(q.take(), vec![DeferredTask::SetTapAllowed(true)]);
    }
}
