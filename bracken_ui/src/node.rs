// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node: one persistent UI tree element.

use bracken_input::CursorIcon;
use bracken_store::SlotId;
use bracken_text::FontStyle;
use kurbo::{Point, Rect, Vec2};

use crate::draw::DrawHandle;
use crate::key::NodeKey;
use crate::types::{Axis, NodeFlags, Rgba, SizeSpec};

/// Handle to a node created this frame.
///
/// The slot stays stable for as long as the node is re-requested every
/// frame; signal and rect queries on the owning [`Ui`] take this handle.
///
/// [`Ui`]: crate::Ui
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeRef {
    /// The node's storage slot.
    pub slot: SlotId,
    /// The node's identity hash.
    pub key: NodeKey,
}

/// The resolved interaction state of a node for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Signal {
    /// The mouse is over this node and no node above it claimed the hover.
    pub hovering: bool,
    /// A press started on this node this frame.
    pub pressed: bool,
    /// The press holding this node was released this frame.
    pub released: bool,
    /// Released this frame while still over the node: a completed click.
    pub clicked: bool,
    /// The second click of a pair inside the click window.
    pub double_clicked: bool,
    /// The third click of a run inside the click window.
    pub triple_clicked: bool,
    /// This node holds the active press.
    pub held_down: bool,
    /// This node holds keyboard focus.
    pub focused: bool,
    /// Enter was pressed while this node held focus.
    pub enter_pressed: bool,
    /// The node's persistent toggle, after any click this frame.
    pub toggled: bool,
    /// Scroll consumed by this node this frame, after axis mapping.
    pub scroll: Vec2,
    /// Mouse position relative to the node's top-left corner.
    pub mouse: Point,
    /// Where the active press started, relative to the node's top-left.
    pub drag_start: Point,
}

impl Signal {
    /// Mouse travel since the press started.
    pub fn drag_delta(&self) -> Vec2 {
        self.mouse - self.drag_start
    }

    /// The rectangle spanned from the press origin to the mouse.
    pub fn drag_rect(&self) -> Rect {
        Rect::from_points(self.drag_start, self.mouse)
    }
}

/// One persistent UI tree element.
///
/// Per-frame fields (flags, sizes, style, links) are fully overwritten each
/// time the node is re-requested; persistent fields (`scroll_offset`,
/// `toggled`, transitions, click timestamps) survive for as long as the node
/// is touched every frame. Untouched nodes are pruned at frame end.
#[derive(Clone, Debug)]
pub struct Node {
    /// Identity hash, unique among live nodes.
    pub key: NodeKey,
    /// Display part of the label.
    pub display: String,

    // Tree links, rebuilt every frame from build order.
    pub(crate) parent: Option<SlotId>,
    pub(crate) first: Option<SlotId>,
    pub(crate) last: Option<SlotId>,
    pub(crate) next: Option<SlotId>,
    pub(crate) prev: Option<SlotId>,
    pub(crate) child_count: usize,

    // Per-frame parameters.
    /// Behavior flags.
    pub flags: NodeFlags,
    /// Requested size per axis.
    pub size: [SizeSpec; 2],
    /// Axis along which children flow.
    pub layout_axis: Axis,
    /// Interior padding per axis.
    pub padding: Vec2,
    /// Background fill color.
    pub background: Rgba,
    /// Text color.
    pub text_color: Rgba,
    /// Border color.
    pub border_color: Rgba,
    /// Border thickness in pixels.
    pub border_width: f64,
    /// Corner radius in pixels.
    pub corner_radius: f64,
    /// Font style for the display text.
    pub font: FontStyle,
    /// Font pixel size for the display text.
    pub font_px: f64,
    /// Cursor to show when this node drives the cursor choice.
    pub cursor: Option<CursorIcon>,
    /// Custom draw capability, invoked after the node's own quads.
    pub draw: Option<DrawHandle>,

    // Computed layout outputs.
    /// Solved size per axis, never negative.
    pub calc_size: Vec2,
    /// Solved position relative to the parent's top-left corner.
    pub calc_rel_pos: Vec2,
    /// Final absolute rect.
    pub rect: Rect,
    /// Clip rect inherited from ancestors (or own rect when clipping).
    pub clip_rect: Rect,
    /// Tight extent of the shaped display text.
    pub text_rect: Rect,

    // Cross-frame persistent state.
    /// Last resolved interaction.
    pub signal: Signal,
    /// Hover transition, 0..=1, smoothed every frame.
    pub hot_t: f64,
    /// Press transition, 0..=1, smoothed every frame.
    pub active_t: f64,
    /// Frame index this node was first created in.
    pub first_frame: u64,
    /// Frame index this node was last requested in.
    pub last_frame: u64,
    /// Free-floating placement relative to the parent, for floating axes.
    pub rel_pos: Point,
    /// Scroll offset, clamped to the overflow range during layout.
    pub scroll_offset: Vec2,
    /// Persistent toggle, flipped on click for toggleable nodes.
    pub toggled: bool,
    /// Time of the last completed click, for the double-click window.
    pub last_click_ms: Option<u64>,
    /// Time of the last double click, for the triple-click window.
    pub last_double_click_ms: Option<u64>,
    /// Absolute mouse position at the start of the active press.
    pub drag_origin: Point,
}

impl Node {
    pub(crate) fn new(key: NodeKey, frame: u64) -> Self {
        Self {
            key,
            display: String::new(),
            parent: None,
            first: None,
            last: None,
            next: None,
            prev: None,
            child_count: 0,
            flags: NodeFlags::empty(),
            size: [SizeSpec::default(); 2],
            layout_axis: Axis::Y,
            padding: Vec2::ZERO,
            background: Rgba::TRANSPARENT,
            text_color: Rgba::WHITE,
            border_color: Rgba::TRANSPARENT,
            border_width: 0.0,
            corner_radius: 0.0,
            font: FontStyle::Regular,
            font_px: 16.0,
            cursor: None,
            draw: None,
            calc_size: Vec2::ZERO,
            calc_rel_pos: Vec2::ZERO,
            rect: Rect::ZERO,
            clip_rect: Rect::ZERO,
            text_rect: Rect::ZERO,
            signal: Signal::default(),
            hot_t: 0.0,
            active_t: 0.0,
            first_frame: frame,
            last_frame: frame,
            rel_pos: Point::ZERO,
            scroll_offset: Vec2::ZERO,
            toggled: false,
            last_click_ms: None,
            last_double_click_ms: None,
            drag_origin: Point::ZERO,
        }
    }

    /// Number of children linked this frame.
    pub fn child_count(&self) -> usize {
        self.child_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_delta_and_rect() {
        let signal = Signal {
            drag_start: Point::new(10.0, 10.0),
            mouse: Point::new(25.0, 4.0),
            ..Signal::default()
        };
        assert_eq!(signal.drag_delta(), Vec2::new(15.0, -6.0));
        assert_eq!(signal.drag_rect(), Rect::new(10.0, 4.0, 25.0, 10.0));
    }
}
