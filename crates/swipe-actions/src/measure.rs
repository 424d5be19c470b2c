#![forbid(unsafe_code)]

//! Panel and content measurement cache.
//!
//! The rendering layer reports panel sizes after every layout pass. Lazily
//! rendered lists re-run layout on every appearance, so most reports repeat
//! what the cache already holds; those must not disturb the row's offset.
//!
//! Each panel slot carries an explicit content version. Declaring new panel
//! content (a different fingerprint) bumps the version and clears the
//! stored width, forcing the next layout report to be taken verbatim.
//!
//! # Invariants
//!
//! 1. `max_leading_offset() >= 0` and `min_trailing_offset() <= 0`.
//! 2. Stored widths are finite and non-negative; anything else is stored as 0.
//! 3. A report for an unchanged version with an unchanged width is a no-op.
//! 4. Reports for an undeclared panel are ignored.

use tracing::trace;

/// Which side of the row a panel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Revealed by dragging toward the trailing edge (positive offsets).
    Leading,
    /// Revealed by dragging toward the leading edge (negative offsets).
    Trailing,
}

/// A measured extent reported by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Last counted measurement of one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMeasurement {
    pub width: f64,
    pub content_version: u64,
}

/// Result of a layout report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureOutcome {
    /// Nothing changed.
    Unchanged,
    /// The stored width changed from `previous` (0 when never counted).
    Updated { previous: f64, width: f64 },
}

/// Result of declaring panel content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChange {
    Unchanged,
    /// New content identity; the slot's width was cleared.
    Invalidated { version: u64 },
}

#[derive(Debug, Clone, Default)]
struct PanelSlot {
    fingerprint: Option<u64>,
    version: u64,
    measured: Option<PanelMeasurement>,
}

impl PanelSlot {
    fn declared(fingerprint: Option<u64>) -> Self {
        Self {
            fingerprint,
            version: 0,
            measured: None,
        }
    }

    fn width(&self) -> f64 {
        self.measured.map_or(0.0, |m| m.width)
    }
}

fn sanitize(width: f64) -> f64 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}

/// Widths of a row's panels and the row content's own size.
#[derive(Debug, Clone, Default)]
pub struct MeasurementCache {
    leading: PanelSlot,
    trailing: PanelSlot,
    content: Size,
}

impl MeasurementCache {
    /// Create a cache for the given panel fingerprints (`None` = no panel).
    #[must_use]
    pub fn new(leading: Option<u64>, trailing: Option<u64>) -> Self {
        Self {
            leading: PanelSlot::declared(leading),
            trailing: PanelSlot::declared(trailing),
            content: Size::ZERO,
        }
    }

    fn slot(&self, edge: Edge) -> &PanelSlot {
        match edge {
            Edge::Leading => &self.leading,
            Edge::Trailing => &self.trailing,
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut PanelSlot {
        match edge {
            Edge::Leading => &mut self.leading,
            Edge::Trailing => &mut self.trailing,
        }
    }

    /// Declare the content shown in a panel.
    ///
    /// A different fingerprint (including adding or removing the panel)
    /// bumps the content version and clears the counted width.
    pub fn set_content(&mut self, edge: Edge, fingerprint: Option<u64>) -> ContentChange {
        let slot = self.slot_mut(edge);
        if slot.fingerprint == fingerprint {
            return ContentChange::Unchanged;
        }
        slot.fingerprint = fingerprint;
        slot.version += 1;
        slot.measured = None;
        ContentChange::Invalidated {
            version: slot.version,
        }
    }

    /// Record a panel layout pass.
    pub fn report_panel(&mut self, edge: Edge, width: f64) -> MeasureOutcome {
        let width = sanitize(width);
        let slot = self.slot_mut(edge);
        if slot.fingerprint.is_none() {
            return MeasureOutcome::Unchanged;
        }
        let version = slot.version;
        match slot.measured {
            Some(m) if m.content_version == version && m.width == width => {
                MeasureOutcome::Unchanged
            }
            previous => {
                slot.measured = Some(PanelMeasurement {
                    width,
                    content_version: version,
                });
                let previous = previous.map_or(0.0, |m| m.width);
                trace!(?edge, previous, width, version, "panel measured");
                MeasureOutcome::Updated { previous, width }
            }
        }
    }

    /// Record a content layout pass. Returns `true` if the size changed.
    pub fn report_content(&mut self, size: Size) -> bool {
        let size = Size::new(sanitize(size.width), sanitize(size.height));
        if self.content == size {
            return false;
        }
        self.content = size;
        true
    }

    /// Leading panel width: the largest positive offset.
    #[inline]
    #[must_use]
    pub fn max_leading_offset(&self) -> f64 {
        self.leading.width()
    }

    /// Negated trailing panel width: the smallest offset without full swipe.
    #[inline]
    #[must_use]
    pub fn min_trailing_offset(&self) -> f64 {
        -self.trailing.width()
    }

    /// Resting offset of a row opened toward `edge`.
    #[must_use]
    pub fn resting_offset(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Leading => self.max_leading_offset(),
            Edge::Trailing => self.min_trailing_offset(),
        }
    }

    #[must_use]
    pub fn measurement(&self, edge: Edge) -> Option<PanelMeasurement> {
        self.slot(edge).measured
    }

    /// Whether a layout report has been counted for the current content.
    #[must_use]
    pub fn is_counted(&self, edge: Edge) -> bool {
        self.slot(edge).measured.is_some()
    }

    #[inline]
    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.content.width
    }

    #[inline]
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.content.height
    }
}
