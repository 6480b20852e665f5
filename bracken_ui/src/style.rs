// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The style stack entry and per-node overrides.

use bracken_input::CursorIcon;
use bracken_text::FontStyle;
use kurbo::{Point, Vec2};

use crate::draw::DrawHandle;
use crate::node::Node;
use crate::types::{Axis, Rgba, SizeSpec};

/// The style-stack entry: defaults applied to every node created while it is
/// on top of the stack.
#[derive(Clone, Debug)]
pub struct Style {
    /// Default size request per axis.
    pub size: [SizeSpec; 2],
    /// Default child flow axis.
    pub layout_axis: Axis,
    /// Default interior padding.
    pub padding: Vec2,
    /// Default background color.
    pub background: Rgba,
    /// Default text color.
    pub text_color: Rgba,
    /// Default border color.
    pub border_color: Rgba,
    /// Default border thickness.
    pub border_width: f64,
    /// Default corner radius.
    pub corner_radius: f64,
    /// Default font style.
    pub font: FontStyle,
    /// Default font pixel size.
    pub font_px: f64,
    /// Default cursor for interactive nodes.
    pub cursor: Option<CursorIcon>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            size: [SizeSpec::children(0.0); 2],
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
        }
    }
}

/// Per-call field overrides applied on top of the active style.
///
/// Every field is optional; `None` keeps the style-stack value. Construct
/// with struct-update syntax:
///
/// ```rust
/// use bracken_ui::{NodeParams, SizeSpec};
///
/// let params = NodeParams {
///     size_x: Some(SizeSpec::px(120.0, 1.0)),
///     ..NodeParams::default()
/// };
/// # let _ = params;
/// ```
#[derive(Clone, Debug, Default)]
pub struct NodeParams {
    /// Override the x size request.
    pub size_x: Option<SizeSpec>,
    /// Override the y size request.
    pub size_y: Option<SizeSpec>,
    /// Override the child flow axis.
    pub layout_axis: Option<Axis>,
    /// Override the interior padding.
    pub padding: Option<Vec2>,
    /// Override the background color.
    pub background: Option<Rgba>,
    /// Override the text color.
    pub text_color: Option<Rgba>,
    /// Override the border color.
    pub border_color: Option<Rgba>,
    /// Override the border thickness.
    pub border_width: Option<f64>,
    /// Override the corner radius.
    pub corner_radius: Option<f64>,
    /// Override the font style.
    pub font: Option<FontStyle>,
    /// Override the font pixel size.
    pub font_px: Option<f64>,
    /// Override the cursor shown for this node.
    pub cursor: Option<CursorIcon>,
    /// Set the floating placement for this frame.
    pub rel_pos: Option<Point>,
    /// Attach a custom draw capability for this frame.
    pub draw: Option<DrawHandle>,
}

impl NodeParams {
    /// Write the active style and these overrides into a node's per-frame
    /// fields. Persistent fields are untouched.
    pub(crate) fn apply(&self, style: &Style, node: &mut Node) {
        node.size = [
            self.size_x.unwrap_or(style.size[0]),
            self.size_y.unwrap_or(style.size[1]),
        ];
        node.layout_axis = self.layout_axis.unwrap_or(style.layout_axis);
        node.padding = self.padding.unwrap_or(style.padding);
        node.background = self.background.unwrap_or(style.background);
        node.text_color = self.text_color.unwrap_or(style.text_color);
        node.border_color = self.border_color.unwrap_or(style.border_color);
        node.border_width = self.border_width.unwrap_or(style.border_width);
        node.corner_radius = self.corner_radius.unwrap_or(style.corner_radius);
        node.font = self.font.unwrap_or(style.font);
        node.font_px = self.font_px.unwrap_or(style.font_px);
        node.cursor = self.cursor.or(style.cursor);
        node.draw = self.draw.clone();
        if let Some(rel_pos) = self.rel_pos {
            node.rel_pos = rel_pos;
        }
    }
}
