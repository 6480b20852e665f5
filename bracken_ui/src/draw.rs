// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-list emission: the flat quad records a renderer consumes.
//!
//! The core's only rendering obligation is to walk the laid-out trees in
//! render order and emit one flat sequence of quad-describing records per
//! frame. Everything GPU-side (vertex buffers, shaders, the geometry stage
//! expanding these records to triangles) lives in the rendering collaborator.

use std::fmt;
use std::rc::Rc;

use bracken_store::{KeyedStore, SlotId};
use bracken_text::{FontCache, GlyphSource};
use kurbo::Rect;

use crate::node::Node;
use crate::types::{NodeFlags, Rgba};

/// One quad record for the renderer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawQuad {
    /// Absolute rect in pixels.
    pub rect: Rect,
    /// Normalized atlas coordinates, or `None` for untextured fills.
    pub uv: Option<Rect>,
    /// Fill (or border) color.
    pub color: Rgba,
    /// Corner radius in pixels.
    pub corner_radius: f64,
    /// Border thickness; zero means a filled quad.
    pub border_width: f64,
    /// Scissor rect the quad is clipped to.
    pub clip: Rect,
}

/// The flat per-frame draw submission.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    /// Quad records in paint order.
    pub quads: Vec<DrawQuad>,
}

impl DrawList {
    /// Append an untextured fill quad.
    pub fn push_fill(&mut self, rect: Rect, color: Rgba, corner_radius: f64, clip: Rect) {
        self.quads.push(DrawQuad {
            rect,
            uv: None,
            color,
            corner_radius,
            border_width: 0.0,
            clip,
        });
    }
}

/// Per-node custom rendering capability.
///
/// Implementations receive the laid-out node and append whatever quads they
/// need after the node's own background/border/text records. This replaces
/// opaque callback contexts with a typed capability object.
pub trait CustomDraw {
    /// Emit quads for `node` into `out`.
    fn draw(&self, node: &Node, out: &mut DrawList);
}

/// Cloneable handle to a [`CustomDraw`] implementation.
#[derive(Clone)]
pub struct DrawHandle(pub Rc<dyn CustomDraw>);

impl DrawHandle {
    /// Wrap a capability object.
    pub fn new(draw: impl CustomDraw + 'static) -> Self {
        Self(Rc::new(draw))
    }
}

impl fmt::Debug for DrawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawHandle").finish_non_exhaustive()
    }
}

/// Walk `roots` in render order and build the frame's draw list.
pub(crate) fn build_list<G: GlyphSource>(
    store: &KeyedStore<Node>,
    fonts: &mut FontCache<G>,
    roots: &[SlotId],
) -> DrawList {
    let mut out = DrawList::default();
    for &root in roots {
        emit_subtree(store, fonts, root, &mut out);
    }
    out
}

fn emit_subtree<G: GlyphSource>(
    store: &KeyedStore<Node>,
    fonts: &mut FontCache<G>,
    slot: SlotId,
    out: &mut DrawList,
) {
    let Some(node) = store.value(slot) else {
        return;
    };
    if node.flags.contains(NodeFlags::DRAW_BACKGROUND) {
        out.push_fill(node.rect, node.background, node.corner_radius, node.clip_rect);
    }
    if node.flags.contains(NodeFlags::DRAW_BORDER) && node.border_width > 0.0 {
        out.quads.push(DrawQuad {
            rect: node.rect,
            uv: None,
            color: node.border_color,
            corner_radius: node.corner_radius,
            border_width: node.border_width,
            clip: node.clip_rect,
        });
    }
    if node.flags.contains(NodeFlags::DRAW_TEXT) && !node.display.is_empty() {
        let shaped = fonts.build_text(&node.display, node.font, node.font_px);
        let origin = node.rect.origin() + node.padding;
        for quad in fonts.quads(&shaped) {
            out.quads.push(DrawQuad {
                rect: quad.rect + origin.to_vec2(),
                uv: Some(quad.uv),
                color: node.text_color,
                corner_radius: 0.0,
                border_width: 0.0,
                clip: node.clip_rect,
            });
        }
    }
    if let Some(handle) = &node.draw {
        handle.0.draw(node, out);
    }
    let mut child = node.first;
    while let Some(c) = child {
        emit_subtree(store, fonts, c, out);
        child = store.value(c).and_then(|n| n.next);
    }
}
