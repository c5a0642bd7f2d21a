//! # Text Alignment
//!
//! The one reusable piece of geometry in the layout: place a string so that a chosen
//! edge (or center) of its rendered bounding box lands on an anchor point.
//!
//! Text is drawn from an alphabetic baseline origin. Measuring a string at origin
//! `(0, 0)` therefore yields a bounding box whose `top_left.y` is negative (the part of
//! the glyphs above the baseline). [`aligned_origin`] turns an anchor plus alignment into
//! the baseline origin to draw at, so callers never do bounding-box arithmetic.

use embedded_graphics::{
    prelude::*,
    primitives::Rectangle,
    text::{renderer::TextRenderer, Baseline},
};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of text relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HAlign {
    /// Anchor on the left edge
    Left,
    /// Anchor on the horizontal center
    Center,
    /// Anchor on the right edge
    Right,
}

/// Vertical alignment of text relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VAlign {
    /// Anchor on the top of the glyph box
    Top,
    /// Anchor on the vertical center of the glyph box
    Middle,
    /// Anchor on the alphabetic baseline
    Baseline,
    /// Anchor on the bottom of the glyph box
    Bottom,
}

/// Measure `text` as drawn from a baseline origin at `(0, 0)`.
pub fn text_bounds<S: TextRenderer>(text: &str, style: &S) -> Rectangle {
    style
        .measure_string(text, Point::zero(), Baseline::Alphabetic)
        .bounding_box
}

/// Compute the baseline origin that puts `anchor` on the requested edge of `bounds`.
///
/// `bounds` must be measured relative to a baseline origin (see [`text_bounds`]).
pub fn aligned_origin(anchor: Point, bounds: Rectangle, h_align: HAlign, v_align: VAlign) -> Point {
    let width = bounds.size.width as i32;
    let height = bounds.size.height as i32;
    let left = bounds.top_left.x;
    let top = bounds.top_left.y;

    let x = match h_align {
        HAlign::Left => anchor.x - left,
        HAlign::Center => anchor.x - left - width / 2,
        HAlign::Right => anchor.x - left - width,
    };

    // top is negative for glyphs rising above the baseline
    let y = match v_align {
        VAlign::Top => anchor.y - top,
        VAlign::Middle => anchor.y - top - height / 2,
        VAlign::Baseline => anchor.y,
        VAlign::Bottom => anchor.y - (height + top),
    };

    Point::new(x, y)
}
