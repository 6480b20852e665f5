// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signal resolution: raw input events to per-node semantic interactions.
//!
//! Signals are resolved once per frame, against the *previous* frame's laid
//! out trees, walking nodes in reverse render order so the topmost node under
//! the cursor gets first crack at every event. An event that triggers a node
//! is removed from the queue at that moment, which is what makes consumption
//! exactly-once: a `MouseUp` matched by the active node's release logic is
//! gone before any node underneath looks for it.

use bracken_input::{Event, EventKind, EventQueue, Key, Modifiers, MouseButton};
use bracken_store::{KeyedStore, SlotId};
use kurbo::{Point, Vec2};

use crate::key::NodeKey;
use crate::node::{Node, Signal};
use crate::types::{Axis, NodeFlags};
use crate::util::collect_preorder;

/// Window for double- and triple-click detection, in milliseconds.
pub const DOUBLE_CLICK_WINDOW_MS: u64 = 400;

/// Everything signal resolution reads and writes on the session.
pub(crate) struct ResolveCtx<'a> {
    pub(crate) store: &'a mut KeyedStore<Node>,
    /// Root trees in render order; input order is the reverse.
    pub(crate) roots: &'a [SlotId],
    pub(crate) mouse: Point,
    pub(crate) hot: &'a mut Option<NodeKey>,
    pub(crate) active: &'a mut Option<NodeKey>,
    pub(crate) focused: &'a mut Option<NodeKey>,
}

pub(crate) fn resolve(ctx: ResolveCtx<'_>, events: &mut EventQueue) {
    let ResolveCtx {
        store,
        roots,
        mouse,
        hot,
        active,
        focused,
    } = ctx;

    let mut render_order = Vec::new();
    for &root in roots {
        collect_preorder(store, root, &mut render_order);
    }

    // Hover is granted to at most one node per frame; the first node in
    // input order that qualifies latches it.
    let mut hover_latched = false;

    for &slot in render_order.iter().rev() {
        let Some(node) = store.value(slot) else {
            continue;
        };
        let key = node.key;
        let flags = node.flags;
        let rect = node.rect;
        let clip = node.clip_rect;
        let layout_axis = node.layout_axis;

        let mut sig = Signal {
            mouse: Point::new(mouse.x - rect.x0, mouse.y - rect.y0),
            toggled: node.toggled,
            ..Signal::default()
        };

        if !flags.interactive() {
            if let Some(node) = store.value_mut(slot) {
                sig.drag_start = sig.mouse;
                node.signal = sig;
            }
            continue;
        }

        let visible = rect.intersect(clip);
        let mouse_over =
            visible.width() > 0.0 && visible.height() > 0.0 && visible.contains(mouse);

        let hover_ok =
            mouse_over && !hover_latched && (active.is_none() || *active == Some(key));
        if hover_ok {
            sig.hovering = true;
            hover_latched = true;
            *hot = Some(key);
        } else if *hot == Some(key) {
            *hot = None;
        }

        let mut press_started = false;
        if flags.clickable() && sig.hovering && active.is_none() {
            if events
                .take_first(|e| e.is_mouse_down(MouseButton::Left))
                .is_some()
            {
                sig.pressed = true;
                press_started = true;
                *active = Some(key);
                if flags.contains(NodeFlags::SELECTABLE) {
                    *focused = Some(key);
                } else {
                    *focused = None;
                }
            }
        } else if flags.contains(NodeFlags::SELECTABLE)
            && !flags.clickable()
            && sig.hovering
            && events
                .take_first(|e| e.is_mouse_down(MouseButton::Left))
                .is_some()
        {
            *focused = Some(key);
        }

        // The active node consumes its own release even after being dragged
        // off; only an over-the-node release counts as a click.
        let mut click_time = None;
        if flags.clickable()
            && *active == Some(key)
            && let Some(e) = events.take_first(|e| e.is_mouse_up(MouseButton::Left))
        {
            sig.released = true;
            *active = None;
            if mouse_over {
                sig.clicked = true;
                click_time = Some(e.time_ms);
            }
        }

        sig.held_down = *active == Some(key);
        sig.focused = *focused == Some(key);
        if sig.focused
            && events.take_first(|e| e.is_key_press(Key::Enter)).is_some()
        {
            sig.enter_pressed = true;
        }

        // Scroll is taken by pointer-over, not the hover latch, so a
        // scrollable container still scrolls while the cursor sits on one of
        // its interactive children.
        let mut scroll_delta = None;
        if flags.contains(NodeFlags::SCROLLABLE)
            && mouse_over
            && let Some(e) = events.take_first(Event::is_scroll)
            && let EventKind::Scroll { delta } = e.kind
        {
            let mut d = delta;
            if e.mods.contains(Modifiers::SHIFT) {
                d = Vec2::new(d.y, d.x);
            }
            if layout_axis == Axis::X {
                d = Vec2::new(d.y, d.x);
            }
            sig.scroll = d;
            scroll_delta = Some(d);
        }

        let Some(node) = store.value_mut(slot) else {
            continue;
        };
        if press_started {
            node.drag_origin = mouse;
        }
        if let Some(d) = scroll_delta {
            // New offset is not clamped here; the layout violation pass
            // clamps once overflow is known.
            node.scroll_offset.x -= d.x;
            node.scroll_offset.y += d.y;
        }
        if let Some(t) = click_time {
            if flags.contains(NodeFlags::TOGGLEABLE) {
                node.toggled = !node.toggled;
            }
            if let Some(td) = node.last_double_click_ms
                && t.saturating_sub(td) <= DOUBLE_CLICK_WINDOW_MS
            {
                sig.triple_clicked = true;
                node.last_click_ms = None;
                node.last_double_click_ms = None;
            } else if let Some(tc) = node.last_click_ms
                && t.saturating_sub(tc) <= DOUBLE_CLICK_WINDOW_MS
            {
                sig.double_clicked = true;
                node.last_click_ms = Some(t);
                node.last_double_click_ms = Some(t);
            } else {
                node.last_click_ms = Some(t);
                node.last_double_click_ms = None;
            }
        }
        sig.toggled = node.toggled;
        sig.drag_start = Point::new(node.drag_origin.x - rect.x0, node.drag_origin.y - rect.y0);
        node.signal = sig;
    }
}
