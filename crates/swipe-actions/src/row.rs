#![forbid(unsafe_code)]

//! Row controller: the single driver of one swipeable row.
//!
//! # Design
//!
//! [`RowController`] owns a [`RowMachine`] plus a queue of deferred tasks in
//! shared storage, and subscribes to the collection's [`SwipeCoordinator`]
//! for as long as it lives. Every input is turned into a [`RowEvent`], fed
//! to the machine, and the returned effects are applied in order:
//!
//! - animation hints and deferred tasks stay inside the row;
//! - claims and releases go to the coordinator;
//! - haptic pulses go to the [`HapticProvider`];
//! - the full-swipe action is invoked last.
//!
//! No borrow of the row state is held while the coordinator, the haptic
//! provider or the action runs, so any of them may call back into the row.
//!
//! # Invariants
//!
//! 1. Deferred tasks queued while handling an event run on the next
//!    [`RowController::tick`], never synchronously.
//! 2. Tasks queued during a tick wait for the following tick.
//! 3. A controller is subscribed to its coordinator from `attach` until it
//!    is dropped.
//!
//! # Failure Modes
//!
//! - **Re-entrant notification**: a coordinator broadcast that reaches this
//!   row while it is mid-dispatch is skipped; the row catches up on its next
//!   appearance.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::commit::{CommitResult, FullSwipeRole};
use crate::config::SwipeConfig;
use crate::coordinator::{CoordinatorSubscription, SwipeCoordinator, SwipeState};
use crate::effect::{AnimationKind, DeferredTask, SwipeEffect, TickQueue};
use crate::environment::{HapticProvider, NoopHaptics, SwipeEnvironment};
use crate::identity::{RowIdentity, fingerprint_of};
use crate::layout::{MenuStyle, RowLayout, SwipeColor};
use crate::machine::{RowEvent, RowMachine, RowSnapshot};
use crate::measure::{Edge, Size};
use crate::phase::DragInput;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Declared content of one action panel.
///
/// Only the fingerprint is kept; the rendering layer owns the panel itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelSpec {
    pub fingerprint: u64,
}

impl PanelSpec {
    /// Describe a panel by hashing its content.
    #[must_use]
    pub fn new<T: Hash + ?Sized>(content: &T) -> Self {
        Self::from_fingerprint(fingerprint_of(content))
    }

    #[must_use]
    pub const fn from_fingerprint(fingerprint: u64) -> Self {
        Self { fingerprint }
    }
}

/// Everything needed to attach a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowConfig {
    pub leading: Option<PanelSpec>,
    pub trailing: Option<PanelSpec>,
    pub menu_style: MenuStyle,
    pub allows_full_swipe: bool,
    pub full_swipe_role: FullSwipeRole,
    pub swipe_color: Option<SwipeColor>,
    /// Caller-supplied identity; a fresh one is minted when absent.
    pub identity: Option<RowIdentity>,
    pub swipe: SwipeConfig,
}

impl RowConfig {
    /// Persistent actions that stay revealed; no full swipe.
    #[must_use]
    pub fn reveal(menu_style: MenuStyle) -> Self {
        Self {
            leading: None,
            trailing: None,
            menu_style,
            allows_full_swipe: false,
            full_swipe_role: FullSwipeRole::Default,
            swipe_color: None,
            identity: None,
            swipe: SwipeConfig::default(),
        }
    }

    /// Full swipe to commit, with the given role.
    #[must_use]
    pub fn full_swipe(menu_style: MenuStyle, role: FullSwipeRole) -> Self {
        Self {
            allows_full_swipe: true,
            full_swipe_role: role,
            ..Self::reveal(menu_style)
        }
    }

    /// Reveal a single leading panel.
    #[must_use]
    pub fn leading_only(menu_style: MenuStyle, panel: PanelSpec) -> Self {
        Self::reveal(menu_style).leading(panel)
    }

    /// Reveal a single trailing panel.
    #[must_use]
    pub fn trailing_only(menu_style: MenuStyle, panel: PanelSpec) -> Self {
        Self::reveal(menu_style).trailing(panel)
    }

    #[must_use]
    pub fn leading(mut self, panel: PanelSpec) -> Self {
        self.leading = Some(panel);
        self
    }

    #[must_use]
    pub fn trailing(mut self, panel: PanelSpec) -> Self {
        self.trailing = Some(panel);
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity: RowIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: SwipeColor) -> Self {
        self.swipe_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_swipe_config(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = swipe;
        self
    }
}

// ---------------------------------------------------------------------------
// TapGate
// ---------------------------------------------------------------------------

/// Collection-wide "taps allowed" flag.
///
/// Cleared when a drag starts and restored one tick after it ends, so a
/// release does not also register as a tap on the row content.
#[derive(Debug, Clone)]
pub struct TapGate(Rc<Cell<bool>>);

impl Default for TapGate {
    fn default() -> Self {
        Self(Rc::new(Cell::new(true)))
    }
}

impl TapGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.0.get()
    }

    pub fn set(&self, allowed: bool) {
        self.0.set(allowed);
    }
}

// ---------------------------------------------------------------------------
// RowController
// ---------------------------------------------------------------------------

struct RowShared {
    machine: RowMachine,
    queue: TickQueue,
    animation: Option<AnimationKind>,
}

impl RowShared {
    /// Keep row-local effects, hand back the rest.
    fn absorb(&mut self, effects: Vec<SwipeEffect>) -> Vec<SwipeEffect> {
        let mut external = Vec::new();
        for effect in effects {
            match effect {
                SwipeEffect::Animate(kind) => self.animation = Some(kind),
                SwipeEffect::Defer(task) => self.queue.push(task),
                other => external.push(other),
            }
        }
        external
    }
}

type ActionRc = Rc<dyn Fn()>;

/// One swipeable row bound to a collection's coordinator.
pub struct RowController {
    shared: Rc<RefCell<RowShared>>,
    coordinator: SwipeCoordinator,
    identity: RowIdentity,
    menu_style: MenuStyle,
    swipe_color: Option<SwipeColor>,
    action: Option<ActionRc>,
    haptics: Rc<dyn HapticProvider>,
    tap_gate: Option<TapGate>,
    _subscription: CoordinatorSubscription,
}

impl fmt::Debug for RowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowController")
            .field("identity", &self.identity)
            .field("menu_style", &self.menu_style)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

impl RowController {
    /// Create a row and subscribe it to `coordinator`.
    #[must_use]
    pub fn attach(config: RowConfig, coordinator: &SwipeCoordinator) -> Self {
        let identity = config.identity.unwrap_or_else(RowIdentity::fresh);
        let machine = RowMachine::new(
            identity,
            config.swipe,
            config.allows_full_swipe,
            config.full_swipe_role,
            config.leading.map(|p| p.fingerprint),
            config.trailing.map(|p| p.fingerprint),
        );
        let shared = Rc::new(RefCell::new(RowShared {
            machine,
            queue: TickQueue::default(),
            animation: None,
        }));

        let weak: Weak<RefCell<RowShared>> = Rc::downgrade(&shared);
        let subscription = coordinator.subscribe(move |state: &SwipeState| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let Ok(mut shared) = shared.try_borrow_mut() else {
                warn!(?state, "row busy during broadcast; skipped");
                return;
            };
            let effects = shared.machine.handle(RowEvent::SharedStateChanged(*state));
            let external = shared.absorb(effects);
            debug_assert!(external.is_empty(), "broadcast produced {external:?}");
        });

        debug!(?identity, allows_full_swipe = config.allows_full_swipe, "row attached");

        Self {
            shared,
            coordinator: coordinator.clone(),
            identity,
            menu_style: config.menu_style,
            swipe_color: config.swipe_color,
            action: None,
            haptics: Rc::new(NoopHaptics),
            tap_gate: None,
            _subscription: subscription,
        }
    }

    /// Action invoked when a full swipe commits.
    #[must_use]
    pub fn with_action(mut self, action: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: impl HapticProvider + 'static) -> Self {
        self.haptics = Rc::new(haptics);
        self
    }

    #[must_use]
    pub fn with_tap_gate(mut self, gate: TapGate) -> Self {
        self.tap_gate = Some(gate);
        self
    }

    #[must_use]
    pub fn with_environment(self, environment: SwipeEnvironment) -> Self {
        self.set_environment(environment);
        self
    }

    // -- inputs -------------------------------------------------------------

    /// Feed one drag event.
    pub fn drag(&self, input: DragInput) {
        self.dispatch(RowEvent::Drag(input));
    }

    /// Run the tasks deferred by earlier events.
    pub fn tick(&self) {
        let tasks = self.shared.borrow_mut().queue.take();
        for task in tasks {
            match task {
                DeferredTask::SetTapAllowed(allowed) => {
                    if let Some(gate) = &self.tap_gate {
                        gate.set(allowed);
                    }
                }
                DeferredTask::Activate => self.dispatch(RowEvent::Activate),
            }
        }
    }

    /// The row entered the rendered set.
    pub fn appear(&self) {
        let shared = self.coordinator.get();
        let open_edge = self
            .coordinator
            .open_row()
            .and_then(|(id, edge)| (id == self.identity).then_some(edge));
        self.dispatch(RowEvent::Appeared { shared, open_edge });
    }

    /// Replace (or remove) a panel's declared content.
    pub fn set_panel_content(&self, edge: Edge, panel: Option<PanelSpec>) {
        self.dispatch(RowEvent::PanelContent {
            edge,
            fingerprint: panel.map(|p| p.fingerprint),
        });
    }

    pub fn report_panel_layout(&self, edge: Edge, size: Size) {
        self.dispatch(RowEvent::PanelLayout {
            edge,
            width: size.width,
        });
    }

    pub fn report_content_layout(&self, size: Size) {
        self.dispatch(RowEvent::ContentLayout(size));
    }

    pub fn set_environment(&self, environment: SwipeEnvironment) {
        self.dispatch(RowEvent::Environment(environment));
    }

    /// Close the row.
    pub fn reset(&self) {
        self.dispatch(RowEvent::Reset);
    }

    // -- outputs ------------------------------------------------------------

    #[must_use]
    pub fn identity(&self) -> RowIdentity {
        self.identity
    }

    #[must_use]
    pub fn render_state(&self) -> RowSnapshot {
        self.shared.borrow().machine.snapshot()
    }

    #[must_use]
    pub fn layout(&self) -> RowLayout {
        RowLayout::compute(&self.render_state(), self.menu_style, self.swipe_color)
    }

    /// Most recent animation hint, cleared on read.
    pub fn take_animation(&self) -> Option<AnimationKind> {
        self.shared.borrow_mut().animation.take()
    }

    #[must_use]
    pub fn last_commit(&self) -> Option<CommitResult> {
        self.shared.borrow().machine.last_commit()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.shared.borrow().machine.is_deleted()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.shared.borrow().machine.visible().is_none()
    }

    #[must_use]
    pub fn has_pending_tasks(&self) -> bool {
        !self.shared.borrow().queue.is_empty()
    }

    fn dispatch(&self, event: RowEvent) {
        let external = {
            let mut shared = self.shared.borrow_mut();
            let effects = shared.machine.handle(event);
            shared.absorb(effects)
        };
        for effect in external {
            self.apply(effect);
        }
    }

    fn apply(&self, effect: SwipeEffect) {
        match effect {
            SwipeEffect::Claim { identity, edge } => self.coordinator.claim(identity, edge),
            SwipeEffect::Release { identity } => self.coordinator.release(identity),
            SwipeEffect::Haptic(feedback) => self.haptics.trigger(feedback),
            SwipeEffect::FireAction => {
                if let Some(action) = self.action.clone() {
                    debug!(identity = ?self.identity, "full swipe action");
                    action();
                }
            }
            SwipeEffect::Animate(_) | SwipeEffect::Defer(_) => {}
        }
    }
}
