#![forbid(unsafe_code)]

//! Render-facing geometry of a swipeable row.
//!
//! [`RowLayout::compute`] turns a [`RowSnapshot`] into the translations,
//! fill and visibility the rendering layer draws. It is a pure function:
//! the same snapshot always yields the same layout.

use crate::machine::RowSnapshot;

/// How action panels move relative to the row content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuStyle {
    /// Panels slide in with the content.
    #[default]
    Slided,
    /// Panels stay pinned under the content; the trailing panel follows
    /// only when a full swipe drags past its width.
    Swiped,
}

/// Background fill drawn behind the trailing panel during a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwipeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SwipeColor {
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }
}

/// Geometry of one row for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    /// Horizontal translation of the row content.
    pub content_offset: f64,
    pub leading_offset: f64,
    pub trailing_offset: f64,
    /// Width of the trailing fill (`|offset| + trailing width`).
    pub fill_width: f64,
    pub swipe_color: Option<SwipeColor>,
    /// Height given to both panels (tracks the content height).
    pub panel_height: f64,
    pub content_height: f64,
    pub opacity: f64,
    /// Deleted rows collapse to zero height.
    pub collapsed: bool,
}

impl RowLayout {
    #[must_use]
    pub fn compute(
        snapshot: &RowSnapshot,
        style: MenuStyle,
        swipe_color: Option<SwipeColor>,
    ) -> Self {
        let offset = snapshot.offset;
        let max_leading = snapshot.max_leading_offset;
        let min_trailing = snapshot.min_trailing_offset;

        let (leading_offset, trailing_offset) = match style {
            MenuStyle::Slided => (offset - max_leading, offset - min_trailing),
            MenuStyle::Swiped => {
                let trailing = if snapshot.allows_full_swipe && offset < min_trailing {
                    offset - min_trailing
                } else {
                    0.0
                };
                (0.0, trailing)
            }
        };

        let (height, opacity) = if snapshot.deleted {
            (0.0, 0.0)
        } else {
            (snapshot.content_height, 1.0)
        };

        Self {
            content_offset: offset,
            leading_offset,
            trailing_offset,
            fill_width: offset.abs() + -min_trailing,
            swipe_color,
            panel_height: height,
            content_height: height,
            opacity,
            collapsed: snapshot.deleted,
        }
    }
}
