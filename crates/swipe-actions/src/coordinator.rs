#![forbid(unsafe_code)]

//! Shared "which row is open" state for one collection.
//!
//! # Design
//!
//! [`SwipeCoordinator`] wraps a [`SwipeState`] in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). The collection owns one coordinator and hands
//! a clone to every row. A row that commits to an open position writes
//! [`SwipeState::Opened`] with its own identity; every other row is notified
//! and closes itself. Rows never touch each other directly.
//!
//! Alongside the state the coordinator remembers which edge the open row
//! rests on, so a row remounted after scrolling back into view can restore
//! itself without a gesture.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each value-changing write.
//! 2. Writing the current value is a no-op: no version bump, no notification.
//! 3. Subscribers are notified in registration order.
//! 4. No borrow of the shared state is held while subscribers run, so a
//!    subscriber may read or write the coordinator re-entrantly.
//! 5. Dropped [`CoordinatorSubscription`] guards are pruned lazily on the
//!    next notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info_span};
use web_time::Instant;

use crate::identity::RowIdentity;
use crate::measure::Edge;

/// The collection-wide open-row token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeState {
    /// No row has been opened yet, or the host closed all rows.
    #[default]
    Untouched,
    /// The named row is the one allowed to be open.
    Opened(RowIdentity),
}

impl SwipeState {
    #[must_use]
    pub fn opened_row(&self) -> Option<RowIdentity> {
        match self {
            Self::Untouched => None,
            Self::Opened(id) => Some(*id),
        }
    }

    /// Whether this state names `identity` as the open row.
    #[inline]
    #[must_use]
    pub fn names(&self, identity: RowIdentity) -> bool {
        *self == Self::Opened(identity)
    }
}

type CallbackRc = Rc<dyn Fn(&SwipeState)>;
type CallbackWeak = Weak<dyn Fn(&SwipeState)>;

struct CoordinatorInner {
    state: SwipeState,
    open_edge: Option<Edge>,
    version: u64,
    subscribers: Vec<CallbackWeak>,
}

/// Shared handle to a collection's [`SwipeState`].
///
/// Cloning creates a new handle to the **same** state.
pub struct SwipeCoordinator {
    inner: Rc<RefCell<CoordinatorInner>>,
}

impl Clone for SwipeCoordinator {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for SwipeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SwipeCoordinator")
            .field("state", &inner.state)
            .field("open_edge", &inner.open_edge)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl Default for SwipeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeCoordinator {
    /// Create a coordinator in the [`SwipeState::Untouched`] state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(CoordinatorInner {
                state: SwipeState::Untouched,
                open_edge: None,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> SwipeState {
        self.inner.borrow().state
    }

    /// The row resting open and the edge it rests on, if any.
    #[must_use]
    pub fn open_row(&self) -> Option<(RowIdentity, Edge)> {
        let inner = self.inner.borrow();
        match (inner.state, inner.open_edge) {
            (SwipeState::Opened(id), Some(edge)) => Some((id, edge)),
            _ => None,
        }
    }

    /// Current version number. Useful for dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Write a new state, notifying subscribers if it changed.
    pub fn set(&self, state: SwipeState) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state == state {
                return;
            }
            inner.state = state;
            if state == SwipeState::Untouched {
                inner.open_edge = None;
            }
            inner.version += 1;
        }
        debug!(?state, "swipe state changed");
        self.notify();
    }

    /// Record `identity` as the open row, resting on `edge`.
    ///
    /// Re-claiming with a different edge updates the edge silently; only a
    /// change of identity is broadcast.
    pub fn claim(&self, identity: RowIdentity, edge: Edge) {
        self.inner.borrow_mut().open_edge = Some(edge);
        self.set(SwipeState::Opened(identity));
    }

    /// Forget the resting edge of `identity` if it is the named row.
    ///
    /// The state keeps naming the row (a row closing itself does not write
    /// the state), but it will no longer be restored on remount.
    pub fn release(&self, identity: RowIdentity) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == SwipeState::Opened(identity) {
            inner.open_edge = None;
        }
    }

    /// Close every row.
    pub fn close_all(&self) {
        self.set(SwipeState::Untouched);
    }

    /// Subscribe to state changes.
    ///
    /// Returns a guard; dropping it unsubscribes the callback.
    pub fn subscribe(&self, callback: impl Fn(&SwipeState) + 'static) -> CoordinatorSubscription {
        let strong: CallbackRc = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        CoordinatorSubscription { _guard: strong }
    }

    fn notify(&self) {
        // Collect live callbacks first so no borrow is held during calls.
        let (callbacks, state): (Vec<CallbackRc>, SwipeState) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let live = inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (live, inner.state)
        };

        if callbacks.is_empty() {
            return;
        }

        let propagation_start = Instant::now();
        let span = info_span!(
            "swipe.broadcast",
            subscribers = callbacks.len() as u64,
            duration_us = tracing::field::Empty
        );
        let _entered = span.enter();

        for cb in &callbacks {
            cb(&state);
        }

        let duration_us = propagation_start.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
    }
}

/// RAII guard for a coordinator subscriber.
///
/// Dropping it drops the callback; the coordinator's weak reference then
/// fails to upgrade and is pruned on the next notification.
pub struct CoordinatorSubscription {
    _guard: CallbackRc,
}

impl std::fmt::Debug for CoordinatorSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorSubscription").finish_non_exhaustive()
    }
}
