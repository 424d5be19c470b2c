#![forbid(unsafe_code)]

//! Swipe-to-reveal row actions, without a renderer.
//!
//! # Role
//! `swipe-actions` holds the interaction state of swipeable rows in a
//! scrolling collection: horizontal drags reveal leading or trailing action
//! panels, releases settle the row open or closed, a long enough pull fires a
//! full-swipe action, and at most one row in the collection stays open.
//!
//! # Primary responsibilities
//! - **GesturePhaseMachine**: idle/started/active/ended/cancelled tracking.
//! - **Offset resolution**: direction-corrected, clamped row offsets.
//! - **MeasurementCache**: panel and content sizes keyed by content version.
//! - **SwipeCoordinator**: the shared "which row is open" token.
//! - **CommitPolicy**: where a release comes to rest, and full-swipe roles.
//! - **RowController**: drives a [`RowMachine`] and applies its effects.
//!
//! # How it fits together
//! Input (drag, layout reports, appearance) becomes a [`RowEvent`]. The
//! [`RowMachine`] is a pure transition function returning [`SwipeEffect`]s;
//! the [`RowController`] applies them against the coordinator, the haptic
//! provider and the row's action, and publishes a [`RowLayout`] for drawing.
//!
//! Everything is single-threaded (`Rc`/`RefCell`); types are `!Send`.

pub mod commit;
pub mod config;
pub mod coordinator;
pub mod effect;
pub mod environment;
pub mod identity;
pub mod layout;
pub mod machine;
pub mod measure;
pub mod offset;
pub mod phase;
pub mod row;

pub use commit::{CommitPolicy, CommitResult, FullSwipeRole, RestingPosition};
pub use config::{SwipeConfig, SwipeConfigError};
pub use coordinator::{CoordinatorSubscription, SwipeCoordinator, SwipeState};
pub use effect::{AnimationKind, DeferredTask, SwipeEffect};
pub use environment::{
    HapticFeedback, HapticProvider, ImpactStyle, LayoutDirection, NoopHaptics, SwipeEnvironment,
};
pub use identity::{RowIdentity, fingerprint_of};
pub use layout::{MenuStyle, RowLayout, SwipeColor};
pub use machine::{RowEvent, RowMachine, RowSnapshot, VisibleButton};
pub use measure::{Edge, MeasurementCache, Size};
pub use offset::{OffsetBounds, OffsetInput, resolve_offset};
pub use phase::{DragInput, DragSample, GesturePhase, GesturePhaseMachine};
pub use row::{PanelSpec, RowConfig, RowController, TapGate};
