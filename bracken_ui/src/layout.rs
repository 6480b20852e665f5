// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The five-pass constraint layout solver.
//!
//! Sizing runs per axis, x then y, four passes each:
//!
//! 1. **Independent** (pre-order): pixel, em, and text-intrinsic sizes, plus
//!    a text-intrinsic placeholder for percent nodes so children-dependent
//!    ancestors have *some* bound before percent is truly known.
//! 2. **Children-dependent** (post-order): children-sum nodes take the sum
//!    of children along their layout axis, the max across it, plus padding.
//! 3. **Parent-dependent** (pre-order): percent nodes take their fraction of
//!    the parent's available size (size minus both paddings), or of the
//!    screen at a root.
//! 4. **Violation resolution** (pre-order, per parent): overflow against
//!    available space shrinks zero-strictness children to zero first, then
//!    distributes what remains proportionally to `1 - strictness` among
//!    non-rigid children; scroll offsets are clamped to the leftover
//!    overflow range here.
//!
//! The fifth pass positions children sequentially along the layout axis from
//! the padding-plus-scroll origin, computes absolute rects, and propagates
//! clip rects. Floating nodes skip flow on their floating axes but keep
//! their tree links for lifecycle and clipping.
//!
//! All passes are pure functions of the tree; identical inputs give
//! identical rects.

use bracken_store::{KeyedStore, SlotId};
use kurbo::{Point, Rect, Size, Vec2};

use crate::node::Node;
use crate::types::{AXES, Axis, NodeFlags, SizeKind};
use crate::util::children_of;

/// Below this, leftover overflow is considered resolved.
const OVERFLOW_EPSILON: f64 = 1e-6;

/// Solve one root tree against the screen.
pub(crate) fn solve(store: &mut KeyedStore<Node>, root: SlotId, screen: Size) {
    for axis in AXES {
        pass_independent(store, root, axis);
        pass_children_sum(store, root, axis);
        pass_percent(store, root, axis, screen);
        pass_violations(store, root, axis);
    }
    place_root(store, root, screen);
}

fn pass_independent(store: &mut KeyedStore<Node>, slot: SlotId, axis: Axis) {
    if let Some(node) = store.value_mut(slot) {
        let spec = node.size[axis.idx()];
        let text_size = axis.of_size(node.text_rect.size()) + 2.0 * axis.of_vec(node.padding);
        let calc = match spec.kind {
            SizeKind::Pixels => spec.value,
            SizeKind::Em => spec.value * node.font_px,
            SizeKind::TextContent => text_size,
            SizeKind::PercentOfParent => text_size,
            SizeKind::ChildrenSum => 0.0,
        };
        axis.set_vec(&mut node.calc_size, calc.max(0.0));
    }
    for child in children_of(store, slot) {
        pass_independent(store, child, axis);
    }
}

fn pass_children_sum(store: &mut KeyedStore<Node>, slot: SlotId, axis: Axis) {
    let children = children_of(store, slot);
    for &child in &children {
        pass_children_sum(store, child, axis);
    }
    let Some(node) = store.value(slot) else {
        return;
    };
    if node.size[axis.idx()].kind != SizeKind::ChildrenSum {
        return;
    }
    let along = node.layout_axis == axis;
    let padding = axis.of_vec(node.padding);
    let mut total = 0.0_f64;
    let mut max = 0.0_f64;
    for &child in &children {
        let Some(child_node) = store.value(child) else {
            continue;
        };
        if child_node.flags.floating(axis) {
            continue;
        }
        let size = axis.of_vec(child_node.calc_size);
        total += size;
        max = max.max(size);
    }
    let calc = if along { total } else { max } + 2.0 * padding;
    if let Some(node) = store.value_mut(slot) {
        axis.set_vec(&mut node.calc_size, calc.max(0.0));
    }
}

fn pass_percent(store: &mut KeyedStore<Node>, slot: SlotId, axis: Axis, screen: Size) {
    let update = {
        let Some(node) = store.value(slot) else {
            return;
        };
        let spec = node.size[axis.idx()];
        if spec.kind == SizeKind::PercentOfParent {
            let avail = match node.parent {
                Some(parent) => store
                    .value(parent)
                    .map(|p| axis.of_vec(p.calc_size) - 2.0 * axis.of_vec(p.padding))
                    .unwrap_or(0.0),
                None => axis.of_size(screen),
            };
            Some((spec.value * avail.max(0.0)).max(0.0))
        } else {
            None
        }
    };
    if let Some(calc) = update
        && let Some(node) = store.value_mut(slot)
    {
        axis.set_vec(&mut node.calc_size, calc);
    }
    for child in children_of(store, slot) {
        pass_percent(store, child, axis, screen);
    }
}

fn pass_violations(store: &mut KeyedStore<Node>, slot: SlotId, axis: Axis) {
    let children = children_of(store, slot);
    let (avail, along) = {
        let Some(node) = store.value(slot) else {
            return;
        };
        (
            (axis.of_vec(node.calc_size) - 2.0 * axis.of_vec(node.padding)).max(0.0),
            node.layout_axis == axis,
        )
    };

    let leftover = if along {
        resolve_flow_overflow(store, &children, axis, avail)
    } else {
        resolve_cross_overflow(store, &children, axis, avail)
    };

    // Clamp the scroll offset now that overflow is known. Scroll was applied
    // unclamped during signal resolution earlier this frame.
    if let Some(node) = store.value_mut(slot) {
        match axis {
            Axis::X => node.scroll_offset.x = node.scroll_offset.x.clamp(-leftover, 0.0),
            Axis::Y => node.scroll_offset.y = node.scroll_offset.y.clamp(0.0, leftover),
        }
    }

    for child in children {
        pass_violations(store, child, axis);
    }
}

/// Shrink along the layout axis; returns the overflow that could not be
/// resolved (rigid content), which becomes the scroll range.
fn resolve_flow_overflow(
    store: &mut KeyedStore<Node>,
    children: &[SlotId],
    axis: Axis,
    avail: f64,
) -> f64 {
    struct Item {
        slot: SlotId,
        size: f64,
        strictness: f64,
    }
    let mut items = Vec::with_capacity(children.len());
    for &child in children {
        let Some(node) = store.value(child) else {
            continue;
        };
        if node.flags.floating(axis) {
            continue;
        }
        items.push(Item {
            slot: child,
            size: axis.of_vec(node.calc_size),
            strictness: node.size[axis.idx()].strictness.clamp(0.0, 1.0),
        });
    }
    let total: f64 = items.iter().map(|i| i.size).sum();
    let mut overflow = total - avail;
    if overflow > OVERFLOW_EPSILON {
        // Zero-strictness children give up everything before any weighted
        // child loses a pixel.
        let zero_total: f64 = items
            .iter()
            .filter(|i| i.strictness == 0.0)
            .map(|i| i.size)
            .sum();
        if zero_total > 0.0 {
            let take = overflow.min(zero_total);
            for item in items.iter_mut().filter(|i| i.strictness == 0.0) {
                item.size -= item.size / zero_total * take;
            }
            overflow -= take;
        }
        // Remaining overflow is shared proportionally to (1 - strictness);
        // iterate because a child can bottom out at zero mid-distribution.
        while overflow > OVERFLOW_EPSILON {
            let weight_sum: f64 = items
                .iter()
                .filter(|i| i.strictness < 1.0 && i.size > 0.0)
                .map(|i| 1.0 - i.strictness)
                .sum();
            if weight_sum <= 0.0 {
                break;
            }
            let mut consumed = 0.0;
            for item in items
                .iter_mut()
                .filter(|i| i.strictness < 1.0 && i.size > 0.0)
            {
                let share = overflow * (1.0 - item.strictness) / weight_sum;
                let cut = share.min(item.size);
                item.size -= cut;
                consumed += cut;
            }
            if consumed <= OVERFLOW_EPSILON {
                break;
            }
            overflow -= consumed;
        }
        for item in &items {
            if let Some(node) = store.value_mut(item.slot) {
                axis.set_vec(&mut node.calc_size, item.size.max(0.0));
            }
        }
    }
    overflow.max(0.0)
}

/// Shrink each child independently across the layout axis; returns the
/// largest leftover overhang.
fn resolve_cross_overflow(
    store: &mut KeyedStore<Node>,
    children: &[SlotId],
    axis: Axis,
    avail: f64,
) -> f64 {
    let mut leftover = 0.0_f64;
    for &child in children {
        let Some(node) = store.value_mut(child) else {
            continue;
        };
        if node.flags.floating(axis) {
            continue;
        }
        let size = axis.of_vec(node.calc_size);
        let over = size - avail;
        if over > OVERFLOW_EPSILON {
            let strictness = node.size[axis.idx()].strictness.clamp(0.0, 1.0);
            let shrunk = (size - over * (1.0 - strictness)).max(0.0);
            axis.set_vec(&mut node.calc_size, shrunk);
            leftover = leftover.max(shrunk - avail);
        }
    }
    leftover.max(0.0)
}

fn place_root(store: &mut KeyedStore<Node>, root: SlotId, screen: Size) {
    let screen_rect = screen.to_rect();
    if let Some(node) = store.value_mut(root) {
        node.calc_rel_pos = node.rel_pos.to_vec2();
        node.rect = Rect::from_origin_size(node.rel_pos, node.calc_size.to_size());
        node.clip_rect = screen_rect;
    }
    position_children(store, root);
}

fn position_children(store: &mut KeyedStore<Node>, slot: SlotId) {
    let (rect, child_clip, padding, scroll, layout_axis) = {
        let Some(node) = store.value(slot) else {
            return;
        };
        let child_clip = if node.flags.contains(NodeFlags::CLIP_CHILDREN) {
            node.rect
        } else {
            node.clip_rect
        };
        (
            node.rect,
            child_clip,
            node.padding,
            node.scroll_offset,
            node.layout_axis,
        )
    };
    // Flow starts at the padding offset shifted by the scroll offset:
    // x scroll is in [-overflow, 0], y scroll in [0, overflow].
    let flow_origin = Vec2::new(padding.x + scroll.x, padding.y - scroll.y);
    let mut cursor = flow_origin;
    for child in children_of(store, slot) {
        let Some(child_node) = store.value_mut(child) else {
            continue;
        };
        let mut rel = Vec2::ZERO;
        for axis in AXES {
            if child_node.flags.floating(axis) {
                axis.set_vec(&mut rel, axis.of_point(child_node.rel_pos));
            } else if axis == layout_axis {
                axis.set_vec(&mut rel, axis.of_vec(cursor));
            } else {
                axis.set_vec(&mut rel, axis.of_vec(flow_origin));
            }
        }
        child_node.calc_rel_pos = rel;
        child_node.rect = Rect::from_origin_size(
            Point::new(rect.x0 + rel.x, rect.y0 + rel.y),
            child_node.calc_size.to_size(),
        );
        child_node.clip_rect = child_clip;
        if !child_node.flags.floating(layout_axis) {
            let advance = layout_axis.of_vec(child_node.calc_size);
            let next = layout_axis.of_vec(cursor) + advance;
            layout_axis.set_vec(&mut cursor, next);
        }
        position_children(store, child);
    }
}
