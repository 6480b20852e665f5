// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: axes, size specifications, colors, node flags.

use kurbo::{Point, Size, Vec2};

/// A layout axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    #[default]
    Y,
}

/// Both axes, in solve order.
pub const AXES: [Axis; 2] = [Axis::X, Axis::Y];

impl Axis {
    /// Index into per-axis arrays.
    pub const fn idx(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// The other axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// This axis' component of a vector.
    pub fn of_vec(self, v: Vec2) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// This axis' component of a point.
    pub fn of_point(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    /// This axis' component of a size.
    pub fn of_size(self, s: Size) -> f64 {
        match self {
            Self::X => s.width,
            Self::Y => s.height,
        }
    }

    /// Write this axis' component of a vector.
    pub fn set_vec(self, v: &mut Vec2, value: f64) {
        match self {
            Self::X => v.x = value,
            Self::Y => v.y = value,
        }
    }
}

/// How a node's size along one axis is requested.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizeKind {
    /// A fixed pixel size; `value` is the size.
    Pixels,
    /// The tight extent of the node's shaped display text.
    TextContent,
    /// A multiple of the node's font pixel size; `value` is the multiple.
    Em,
    /// A fraction of the parent's available size; `value` is in 0..=1.
    PercentOfParent,
    /// The sum (along the layout axis) or max (across it) of children.
    ChildrenSum,
}

/// A per-axis size request with a compressibility weight.
///
/// `strictness` is in 0..=1: 0 shrinks freely under overflow, 1 never
/// shrinks below the requested size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SizeSpec {
    /// What the requested size is derived from.
    pub kind: SizeKind,
    /// Kind-specific magnitude (pixels, em multiple, or percent fraction).
    pub value: f64,
    /// Compressibility under overflow, 0..=1.
    pub strictness: f64,
}

impl SizeSpec {
    /// Fixed pixel size.
    pub const fn px(value: f64, strictness: f64) -> Self {
        Self {
            kind: SizeKind::Pixels,
            value,
            strictness,
        }
    }

    /// Size from the node's shaped text extent.
    pub const fn text(strictness: f64) -> Self {
        Self {
            kind: SizeKind::TextContent,
            value: 0.0,
            strictness,
        }
    }

    /// Size as a multiple of the node's font pixel size.
    pub const fn em(value: f64, strictness: f64) -> Self {
        Self {
            kind: SizeKind::Em,
            value,
            strictness,
        }
    }

    /// Size as a fraction of the parent's available size.
    pub const fn percent(value: f64, strictness: f64) -> Self {
        Self {
            kind: SizeKind::PercentOfParent,
            value,
            strictness,
        }
    }

    /// Size from the node's children.
    pub const fn children(strictness: f64) -> Self {
        Self {
            kind: SizeKind::ChildrenSum,
            value: 0.0,
            strictness,
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::children(0.0)
    }
}

/// A straight-alpha linear color.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red, 0..=1.
    pub r: f32,
    /// Green, 0..=1.
    pub g: f32,
    /// Blue, 0..=1.
    pub b: f32,
    /// Alpha, 0..=1.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// An opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// This color with its alpha replaced.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

bitflags::bitflags! {
    /// Per-frame behavior flags on a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        /// Reacts to mouse press/release with click semantics.
        const CLICKABLE = 1 << 0;
        /// Clickable, and flips its persistent toggle on every click.
        const TOGGLEABLE = 1 << 1;
        /// Takes keyboard focus when pressed.
        const SELECTABLE = 1 << 2;
        /// Consumes scroll events into its scroll offset.
        const SCROLLABLE = 1 << 3;

        /// Emits a background quad.
        const DRAW_BACKGROUND = 1 << 8;
        /// Emits a border quad.
        const DRAW_BORDER = 1 << 9;
        /// Emits its display text.
        const DRAW_TEXT = 1 << 10;

        /// Children are clipped to this node's rect.
        const CLIP_CHILDREN = 1 << 16;
        /// Excluded from flow on the x axis; positioned by `rel_pos.x`.
        const FLOATING_X = 1 << 17;
        /// Excluded from flow on the y axis; positioned by `rel_pos.y`.
        const FLOATING_Y = 1 << 18;
        /// No stable identity: the key is salted with a per-frame random
        /// value instead of the parent key.
        const NO_ID = 1 << 19;
    }
}

impl NodeFlags {
    /// Whether any interaction flag is set.
    pub fn interactive(self) -> bool {
        self.intersects(Self::CLICKABLE | Self::TOGGLEABLE | Self::SELECTABLE | Self::SCROLLABLE)
    }

    /// Whether click semantics apply (clickable or toggleable).
    pub fn clickable(self) -> bool {
        self.intersects(Self::CLICKABLE | Self::TOGGLEABLE)
    }

    /// Whether the node floats on `axis` (exempt from flow there).
    pub fn floating(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.contains(Self::FLOATING_X),
            Axis::Y => self.contains(Self::FLOATING_Y),
        }
    }
}
