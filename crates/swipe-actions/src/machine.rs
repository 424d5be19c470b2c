#![forbid(unsafe_code)]

//! The per-row state machine.
//!
//! [`RowMachine`] composes the gesture phase tracker, the offset resolver,
//! the measurement cache and the commit policy behind one transition
//! function: [`RowMachine::handle`] takes a [`RowEvent`], updates phase,
//! offset and visible button together, and returns the [`SwipeEffect`]s the
//! driver must apply. It never calls out, so it can be exercised without a
//! rendering environment.
//!
//! # Invariants
//!
//! 1. While not deleted, `offset` stays within the bounds of the current
//!    measurements (`[-content_width, max_leading]` with full swipe,
//!    `[min_trailing, max_leading]` otherwise), except for the transient
//!    `-content_width` a full swipe slides to.
//! 2. While not deleted, `visible` is `None` exactly when the row is closed;
//!    otherwise it names this row's identity on the side the offset points
//!    to. A deleted row shows no button.
//! 3. An idle row with a visible button holds the coordinator's claim, so a
//!    claim by any other row closes it.
//! 4. A deleted row ignores all gesture input for the rest of its life.
//! 5. Resetting twice in a row leaves the same state as resetting once.
//!
//! # Failure Modes
//!
//! - **Stuck row**: a row with a non-zero offset that the shared state no
//!   longer backs (a remount raced a coordinator update). Reconciled on
//!   appearance by forcing a reset.

use tracing::{debug, trace, warn};

use crate::commit::{
    CommitInput, CommitPolicy, CommitResult, FullSwipeRole, RestingPosition,
};
use crate::config::SwipeConfig;
use crate::coordinator::SwipeState;
use crate::effect::{AnimationKind, DeferredTask, SwipeEffect};
use crate::environment::{LayoutDirection, SwipeEnvironment};
use crate::identity::RowIdentity;
use crate::measure::{ContentChange, Edge, MeasureOutcome, MeasurementCache, Size};
use crate::offset::{OffsetBounds, OffsetInput, resolve_offset};
use crate::phase::{DragInput, GesturePhase, GesturePhaseMachine, PhaseStep};

/// Which action panel a row currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibleButton {
    #[default]
    None,
    /// Leading panel (positive offset).
    Left(RowIdentity),
    /// Trailing panel (negative offset).
    Right(RowIdentity),
}

impl VisibleButton {
    /// Derive from the sign of an offset.
    #[must_use]
    pub fn from_offset(offset: f64, identity: RowIdentity) -> Self {
        if offset > 0.0 {
            Self::Left(identity)
        } else if offset < 0.0 {
            Self::Right(identity)
        } else {
            Self::None
        }
    }

    #[must_use]
    pub fn for_edge(edge: Edge, identity: RowIdentity) -> Self {
        match edge {
            Edge::Leading => Self::Left(identity),
            Edge::Trailing => Self::Right(identity),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<RowIdentity> {
        match self {
            Self::None => None,
            Self::Left(id) | Self::Right(id) => Some(*id),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

/// Everything that can happen to a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowEvent {
    Drag(DragInput),
    /// The deferred started → active promotion came due.
    Activate,
    /// The coordinator's state changed.
    SharedStateChanged(SwipeState),
    /// The row entered the rendered set.
    Appeared {
        shared: SwipeState,
        /// Resting edge recorded by the coordinator for its open row.
        open_edge: Option<Edge>,
    },
    /// A panel's declared content (fingerprint) was set.
    PanelContent {
        edge: Edge,
        fingerprint: Option<u64>,
    },
    PanelLayout { edge: Edge, width: f64 },
    ContentLayout(Size),
    Environment(SwipeEnvironment),
    Reset,
}

/// Read-only view of a row for the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSnapshot {
    pub identity: RowIdentity,
    pub phase: GesturePhase,
    pub offset: f64,
    pub visible: VisibleButton,
    pub deleted: bool,
    pub allows_full_swipe: bool,
    pub max_leading_offset: f64,
    pub min_trailing_offset: f64,
    pub content_width: f64,
    pub content_height: f64,
}

/// Per-row swipe state machine.
#[derive(Debug, Clone)]
pub struct RowMachine {
    identity: RowIdentity,
    config: SwipeConfig,
    policy: CommitPolicy,
    allows_full_swipe: bool,
    role: FullSwipeRole,
    environment: SwipeEnvironment,
    /// Direction captured when the current gesture began.
    gesture_direction: LayoutDirection,
    phase: GesturePhaseMachine,
    measurements: MeasurementCache,
    offset: f64,
    /// Offset carried from the last commit; drags resume from here.
    old_offset: f64,
    visible: VisibleButton,
    /// Set while the row rests open at a panel width; the offset then
    /// follows that panel's measurements.
    resting_edge: Option<Edge>,
    deleted: bool,
    last_commit: Option<CommitResult>,
}

impl RowMachine {
    /// Create a machine for a row whose panels have the given content
    /// fingerprints (`None` = no panel on that side).
    #[must_use]
    pub fn new(
        identity: RowIdentity,
        config: SwipeConfig,
        allows_full_swipe: bool,
        role: FullSwipeRole,
        leading: Option<u64>,
        trailing: Option<u64>,
    ) -> Self {
        Self {
            identity,
            policy: CommitPolicy::from_config(&config),
            phase: GesturePhaseMachine::new(config.minimum_drag_distance),
            config,
            allows_full_swipe,
            role,
            environment: SwipeEnvironment::default(),
            gesture_direction: LayoutDirection::default(),
            measurements: MeasurementCache::new(leading, trailing),
            offset: 0.0,
            old_offset: 0.0,
            visible: VisibleButton::None,
            resting_edge: None,
            deleted: false,
            last_commit: None,
        }
    }

    /// Apply one event and return the effects to perform, in order.
    pub fn handle(&mut self, event: RowEvent) -> Vec<SwipeEffect> {
        let mut effects = Vec::with_capacity(4);
        match event {
            RowEvent::Drag(input) => self.on_drag(input, &mut effects),
            RowEvent::Activate => {
                self.phase.promote();
            }
            RowEvent::SharedStateChanged(state) => self.on_shared_state(state, &mut effects),
            RowEvent::Appeared { shared, open_edge } => {
                self.on_appear(shared, open_edge, &mut effects);
            }
            RowEvent::PanelContent { edge, fingerprint } => {
                if let ContentChange::Invalidated { version } =
                    self.measurements.set_content(edge, fingerprint)
                {
                    debug!(?edge, version, "panel content changed");
                    self.reset_and_release(&mut effects);
                }
            }
            RowEvent::PanelLayout { edge, width } => {
                if let MeasureOutcome::Updated { .. } = self.measurements.report_panel(edge, width)
                {
                    self.on_bounds_changed(&mut effects);
                }
            }
            RowEvent::ContentLayout(size) => {
                if self.measurements.report_content(size) {
                    self.on_bounds_changed(&mut effects);
                }
            }
            RowEvent::Environment(environment) => self.environment = environment,
            RowEvent::Reset => self.reset_and_release(&mut effects),
        }
        effects
    }

    // -- accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn identity(&self) -> RowIdentity {
        self.identity
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase.phase()
    }

    #[inline]
    #[must_use]
    pub fn visible(&self) -> VisibleButton {
        self.visible
    }

    #[inline]
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    #[must_use]
    pub fn measurements(&self) -> &MeasurementCache {
        &self.measurements
    }

    #[must_use]
    pub fn last_commit(&self) -> Option<CommitResult> {
        self.last_commit
    }

    #[must_use]
    pub fn environment(&self) -> SwipeEnvironment {
        self.environment
    }

    /// Offset range for the current measurements.
    #[must_use]
    pub fn bounds(&self) -> OffsetBounds {
        OffsetBounds::from_cache(&self.measurements, self.allows_full_swipe)
    }

    #[must_use]
    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            identity: self.identity,
            phase: self.phase.phase(),
            offset: self.offset,
            visible: self.visible,
            deleted: self.deleted,
            allows_full_swipe: self.allows_full_swipe,
            max_leading_offset: self.measurements.max_leading_offset(),
            min_trailing_offset: self.measurements.min_trailing_offset(),
            content_width: self.measurements.content_width(),
            content_height: self.measurements.content_height(),
        }
    }

    // -- gesture ------------------------------------------------------------

    fn on_drag(&mut self, input: DragInput, effects: &mut Vec<SwipeEffect>) {
        if self.deleted {
            return;
        }
        match self.phase.on_input(input) {
            PhaseStep::Ignored => {}
            PhaseStep::Began { translation } => {
                self.gesture_direction = self.environment.layout_direction;
                self.track(translation, effects);
                effects.push(SwipeEffect::Defer(DeferredTask::SetTapAllowed(false)));
                effects.push(SwipeEffect::Defer(DeferredTask::Activate));
            }
            PhaseStep::Moved { translation } => self.track(translation, effects),
            PhaseStep::Released { translation } => {
                self.commit(translation, effects);
                self.phase.settle();
                effects.push(SwipeEffect::Defer(DeferredTask::SetTapAllowed(true)));
            }
            PhaseStep::Interrupted => {
                debug!(offset = self.offset, "drag interrupted");
                self.reset_and_release(effects);
                self.phase.settle();
                effects.push(SwipeEffect::Defer(DeferredTask::SetTapAllowed(true)));
            }
        }
    }

    fn track(&mut self, translation: f64, effects: &mut Vec<SwipeEffect>) {
        let offset = resolve_offset(&OffsetInput {
            raw_translation: translation,
            old_offset: self.old_offset,
            layout_direction: self.gesture_direction,
            max_leading_offset: self.measurements.max_leading_offset(),
            min_trailing_offset: self.measurements.min_trailing_offset(),
            content_width: self.measurements.content_width(),
            allows_full_swipe: self.allows_full_swipe,
        });
        trace!(translation, offset, "drag sample");
        self.offset = offset;
        self.resting_edge = None;
        self.visible = VisibleButton::from_offset(offset, self.identity);
        effects.push(SwipeEffect::Animate(AnimationKind::Track));
    }

    fn commit(&mut self, translation: f64, effects: &mut Vec<SwipeEffect>) {
        let decision = self.policy.evaluate(&CommitInput {
            offset: self.offset,
            translation_width: self.gesture_direction.signed(translation),
            content_width: self.measurements.content_width(),
            max_leading_offset: self.measurements.max_leading_offset(),
            min_trailing_offset: self.measurements.min_trailing_offset(),
            allows_full_swipe: self.allows_full_swipe,
            role: self.role,
        });

        let claimed = match decision.resting {
            RestingPosition::Open(edge) => {
                self.offset = decision.settle_offset;
                self.old_offset = self.offset;
                self.visible = VisibleButton::for_edge(edge, self.identity);
                self.resting_edge = Some(edge);
                effects.push(SwipeEffect::Animate(AnimationKind::Settle));
                effects.push(SwipeEffect::Claim {
                    identity: self.identity,
                    edge,
                });
                Some(edge)
            }
            RestingPosition::Closed => {
                self.reset_and_release(effects);
                None
            }
        };

        if let Some(role) = decision.full_swipe {
            self.offset = decision.full_swipe_offset;
            self.resting_edge = None;
            effects.push(SwipeEffect::Animate(AnimationKind::FullSwipe));
            if let Some(feedback) = self.environment.full_swipe_haptic(&self.config) {
                effects.push(SwipeEffect::Haptic(feedback));
            }
            match role {
                FullSwipeRole::Destructive => {
                    self.deleted = true;
                    self.visible = VisibleButton::None;
                    effects.push(SwipeEffect::Animate(AnimationKind::Collapse));
                    effects.push(SwipeEffect::Release {
                        identity: self.identity,
                    });
                }
                FullSwipeRole::Cancel => self.reset_and_release(effects),
                FullSwipeRole::Default => {
                    // Stays slid out past the trailing panel until closed.
                    self.visible = VisibleButton::Right(self.identity);
                    if claimed != Some(Edge::Trailing) {
                        self.old_offset = self.measurements.min_trailing_offset();
                        effects.push(SwipeEffect::Claim {
                            identity: self.identity,
                            edge: Edge::Trailing,
                        });
                    }
                }
            }
            effects.push(SwipeEffect::FireAction);
        }

        let result = decision.result();
        debug!(
            resting_offset = result.resting_offset,
            became_deleted = result.became_deleted,
            fired_action = result.fired_action,
            "swipe committed"
        );
        self.last_commit = Some(result);
    }

    // -- coordination -------------------------------------------------------

    fn on_shared_state(&mut self, state: SwipeState, effects: &mut Vec<SwipeEffect>) {
        if self.deleted || self.visible.is_none() || state.names(self.identity) {
            return;
        }
        debug!(?state, offset = self.offset, "closing for another row");
        self.reset_local(effects);
    }

    fn on_appear(
        &mut self,
        shared: SwipeState,
        open_edge: Option<Edge>,
        effects: &mut Vec<SwipeEffect>,
    ) {
        if self.deleted || self.phase.phase().is_tracking() {
            return;
        }

        if let Some(visible) = self.visible.identity() {
            if !shared.names(visible) {
                warn!(?shared, offset = self.offset, "stuck row healed");
                self.reset_local(effects);
            }
            return;
        }

        let restore = match (shared, open_edge) {
            (SwipeState::Opened(id), Some(edge)) if id == self.identity && self.offset == 0.0 => {
                Some(edge)
            }
            _ => None,
        };
        if let Some(edge) = restore {
            // Remounted while the coordinator still holds this row open.
            self.visible = VisibleButton::for_edge(edge, self.identity);
            self.resting_edge = Some(edge);
            self.offset = self.measurements.resting_offset(edge);
            self.old_offset = self.offset;
            debug!(?edge, offset = self.offset, "restored open row");
            effects.push(SwipeEffect::Animate(AnimationKind::Snap));
            return;
        }

        if self.offset != 0.0 {
            warn!(offset = self.offset, "stuck row healed");
            self.reset_and_release(effects);
        }
    }

    // -- measurement --------------------------------------------------------

    fn on_bounds_changed(&mut self, effects: &mut Vec<SwipeEffect>) {
        if self.deleted {
            return;
        }
        let resting = self
            .resting_edge
            .filter(|_| !self.phase.phase().is_tracking());
        if let Some(edge) = resting {
            let rest = self.measurements.resting_offset(edge);
            if rest == 0.0 && self.offset != 0.0 {
                // The panel it rested on collapsed to nothing.
                self.reset_and_release(effects);
            } else if rest != self.offset {
                self.offset = rest;
                self.old_offset = rest;
                effects.push(SwipeEffect::Animate(AnimationKind::Settle));
            }
            return;
        }

        let bounds = self.bounds();
        let offset = bounds.clamp(self.offset);
        let old_offset = bounds.clamp(self.old_offset);
        if offset != self.offset || old_offset != self.old_offset {
            trace!(from = self.offset, to = offset, "offset re-clamped");
            self.offset = offset;
            self.old_offset = old_offset;
            effects.push(SwipeEffect::Animate(AnimationKind::Track));
            if self.phase.phase().is_tracking() {
                self.visible = VisibleButton::from_offset(offset, self.identity);
            } else if offset == 0.0 {
                self.reset_and_release(effects);
            }
        }
    }

    // -- reset --------------------------------------------------------------

    /// Close the row without touching the coordinator.
    fn reset_local(&mut self, effects: &mut Vec<SwipeEffect>) {
        let changed = self.offset != 0.0
            || self.old_offset != 0.0
            || !self.visible.is_none()
            || self.resting_edge.is_some();
        self.visible = VisibleButton::None;
        self.offset = 0.0;
        self.old_offset = 0.0;
        self.resting_edge = None;
        if changed {
            effects.push(SwipeEffect::Animate(AnimationKind::Reset));
        }
    }

    /// Close the row and drop any resting claim it holds.
    fn reset_and_release(&mut self, effects: &mut Vec<SwipeEffect>) {
        let was_open = !self.visible.is_none() || self.resting_edge.is_some();
        self.reset_local(effects);
        if was_open {
            effects.push(SwipeEffect::Release {
                identity: self.identity,
            });
        }
    }
}
