// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The UI session: per-frame node graph building and the frame lifecycle.

use bracken_input::{CursorIcon, EventQueue};
use bracken_store::{KeyedStore, SlotId};
use bracken_text::{FontCache, GlyphSource};
use hashbrown::HashSet;
use kurbo::{Point, Rect, Size, Vec2};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::draw::{self, DrawList};
use crate::error::BuildError;
use crate::key::{NodeKey, hash_key, split_label};
use crate::layout;
use crate::node::{Node, NodeRef, Signal};
use crate::signal::{self, ResolveCtx};
use crate::style::{NodeParams, Style};
use crate::types::{NodeFlags, SizeSpec};
use crate::util::link_child;

/// The per-frame node PRNG is reseeded to this constant every frame, so
/// identity-less node hashes are stable within a frame (for caching) but
/// carry no meaning across frames.
const FRAME_RNG_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hash source for the synthetic per-frame root.
const ROOT_KEY: &str = "bracken.root";

/// A UI session: the node table, font cache, interaction state, and the
/// stacks that drive tree building.
///
/// All cross-frame state lives here; there are no module-level globals, so
/// multiple independent sessions can coexist in one process. A frame runs
/// [`Ui::begin_frame`] → node creation via [`Ui::node`] and the parent/style
/// stacks → [`Ui::end_frame`], which prunes, animates, and lays out.
///
/// ```rust
/// use bracken_input::EventQueue;
/// use bracken_text::{FixedMetrics, FontCache, FontTable};
/// use bracken_ui::{NodeFlags, NodeParams, SizeSpec, Ui};
/// use kurbo::{Point, Size};
///
/// let mut ui = Ui::new(FontCache::new(FontTable::with_regular(FixedMetrics::default())));
/// let mut events = EventQueue::new();
///
/// ui.begin_frame(Size::new(800.0, 600.0), Point::ZERO, &mut events, 0);
/// let button = ui.node(
///     NodeFlags::CLICKABLE | NodeFlags::DRAW_BACKGROUND,
///     "Save##save_button",
///     NodeParams {
///         size_x: Some(SizeSpec::px(120.0, 1.0)),
///         size_y: Some(SizeSpec::px(32.0, 1.0)),
///         ..NodeParams::default()
///     },
/// );
/// ui.end_frame(1.0 / 60.0).unwrap();
/// assert_eq!(ui.rect(&button).width(), 120.0);
/// ```
#[derive(Debug)]
pub struct Ui<G: GlyphSource> {
    store: KeyedStore<Node>,
    fonts: FontCache<G>,
    frame: u64,
    screen: Size,
    mouse: Point,
    now_ms: u64,
    hot: Option<NodeKey>,
    active: Option<NodeKey>,
    focused: Option<NodeKey>,
    /// Root trees in render order: main tree first, layers above it after.
    roots: Vec<SlotId>,
    parent_stack: Vec<SlotId>,
    layer_stack: Vec<SlotId>,
    style_stack: Vec<Style>,
    /// Keys created this frame; a repeat is a fatal collision.
    collisions: HashSet<u64>,
    rng: Pcg32,
    first_error: Option<BuildError>,
    in_frame: bool,
}

impl<G: GlyphSource> Ui<G> {
    /// Create a session around a font cache.
    pub fn new(fonts: FontCache<G>) -> Self {
        Self {
            store: KeyedStore::new(),
            fonts,
            frame: 0,
            screen: Size::ZERO,
            mouse: Point::ZERO,
            now_ms: 0,
            hot: None,
            active: None,
            focused: None,
            roots: Vec::new(),
            parent_stack: Vec::new(),
            layer_stack: Vec::new(),
            style_stack: Vec::new(),
            collisions: HashSet::new(),
            rng: Pcg32::seed_from_u64(FRAME_RNG_SEED),
            first_error: None,
            in_frame: false,
        }
    }

    /// Start a frame.
    ///
    /// Resolves signals for the previous frame's trees in reverse render
    /// order, resets the per-frame identity state, prunes the font cache,
    /// and recreates the synthetic root sized to `screen`. Returns the
    /// cursor icon the shell should apply, chosen from the focused, hot, or
    /// active node in that priority order.
    pub fn begin_frame(
        &mut self,
        screen: Size,
        mouse: Point,
        events: &mut EventQueue,
        now_ms: u64,
    ) -> CursorIcon {
        self.frame += 1;
        self.screen = screen;
        self.mouse = mouse;
        self.now_ms = now_ms;

        signal::resolve(
            ResolveCtx {
                store: &mut self.store,
                roots: &self.roots,
                mouse,
                hot: &mut self.hot,
                active: &mut self.active,
                focused: &mut self.focused,
            },
            events,
        );

        self.collisions.clear();
        self.rng = Pcg32::seed_from_u64(FRAME_RNG_SEED);
        self.first_error = None;
        self.fonts.prune(self.frame);

        self.roots.clear();
        let root_key = hash_key(0, ROOT_KEY);
        self.collisions.insert(root_key.raw());
        let frame = self.frame;
        let (root, _) = self
            .store
            .get_or_insert_with(root_key.raw(), || Node::new(root_key, frame));
        if let Some(node) = self.store.value_mut(root) {
            node.display.clear();
            node.flags = NodeFlags::empty();
            NodeParams {
                size_x: Some(SizeSpec::px(screen.width, 1.0)),
                size_y: Some(SizeSpec::px(screen.height, 1.0)),
                ..NodeParams::default()
            }
            .apply(&Style::default(), node);
            node.last_frame = frame;
            node.parent = None;
            node.first = None;
            node.last = None;
            node.next = None;
            node.prev = None;
            node.child_count = 0;
            node.text_rect = Rect::ZERO;
        }
        self.roots.push(root);
        self.parent_stack.clear();
        self.parent_stack.push(root);
        self.layer_stack.clear();
        self.style_stack.clear();
        self.style_stack.push(Style::default());
        self.in_frame = true;

        self.cursor_icon()
    }

    /// Create or reuse the node identified by `label` under the current
    /// parent, returning its handle.
    ///
    /// The label's display part (before [`LABEL_SEPARATOR`]) is shown; the
    /// hash part feeds identity, salted by the parent's key, or by a
    /// per-frame random value for [`NodeFlags::NO_ID`] nodes. A key seen
    /// twice in one frame is a fatal collision: the error is captured, this
    /// call falls back to the root handle, and [`Ui::end_frame`] reports it.
    ///
    /// [`LABEL_SEPARATOR`]: crate::LABEL_SEPARATOR
    pub fn node(&mut self, flags: NodeFlags, label: &str, params: NodeParams) -> NodeRef {
        assert!(self.in_frame, "node() outside begin_frame/end_frame");
        let parent_slot = *self
            .parent_stack
            .last()
            .expect("parent stack holds at least the root");
        let (display, hash_src) = split_label(label);
        let salt = if flags.contains(NodeFlags::NO_ID) {
            self.rng.next_u64()
        } else {
            self.store
                .value(parent_slot)
                .map(|p| p.key.raw())
                .unwrap_or(0)
        };
        let key = hash_key(salt, hash_src);
        if !self.collisions.insert(key.raw()) {
            self.capture_error(BuildError::KeyCollision {
                display: display.to_string(),
            });
            return self.fallback_ref();
        }

        let frame = self.frame;
        let (slot, _existed) = self
            .store
            .get_or_insert_with(key.raw(), || Node::new(key, frame));
        let style = self
            .style_stack
            .last()
            .cloned()
            .unwrap_or_default();
        {
            let node = self
                .store
                .value_mut(slot)
                .expect("slot was just inserted or found");
            node.display.clear();
            node.display.push_str(display);
            node.flags = flags;
            params.apply(&style, node);
            node.last_frame = frame;
            node.first = None;
            node.last = None;
            node.next = None;
            node.prev = None;
            node.child_count = 0;
        }
        let (font, font_px) = {
            let node = self.store.value(slot).expect("node just written");
            (node.font, node.font_px)
        };
        let text_rect = if display.is_empty() {
            Rect::ZERO
        } else {
            self.fonts.text_rect(display, font, font_px)
        };
        if let Some(node) = self.store.value_mut(slot) {
            node.text_rect = text_rect;
        }
        link_child(&mut self.store, parent_slot, slot);
        NodeRef { slot, key }
    }

    /// Push `node` as the parent for subsequently created nodes.
    pub fn push_parent(&mut self, node: NodeRef) {
        self.parent_stack.push(node.slot);
    }

    /// Pop the current parent. Over-popping past the root is captured as an
    /// unbalanced-stack error.
    pub fn pop_parent(&mut self) {
        if self.parent_stack.len() > 1 {
            self.parent_stack.pop();
        } else {
            self.capture_error(BuildError::UnbalancedParentStack { remaining: 0 });
        }
    }

    /// Push a style for subsequently created nodes.
    pub fn push_style(&mut self, style: Style) {
        self.style_stack.push(style);
    }

    /// Pop the current style. Over-popping past the base style is captured
    /// as an unbalanced-stack error.
    pub fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        } else {
            self.capture_error(BuildError::UnbalancedStyleStack { remaining: 0 });
        }
    }

    /// Start a new root tree (window, context menu, tooltip) rendered above
    /// everything built so far. The layer becomes the current parent until
    /// [`Ui::end_layer`].
    ///
    /// Layers render in creation order, so input resolution visits the most
    /// recently created layer first.
    pub fn begin_layer(&mut self, label: &str, params: NodeParams) -> NodeRef {
        assert!(self.in_frame, "begin_layer() outside begin_frame/end_frame");
        let (display, hash_src) = split_label(label);
        let key = hash_key(0, hash_src);
        if !self.collisions.insert(key.raw()) {
            self.capture_error(BuildError::KeyCollision {
                display: display.to_string(),
            });
            return self.fallback_ref();
        }
        let frame = self.frame;
        let (slot, _) = self
            .store
            .get_or_insert_with(key.raw(), || Node::new(key, frame));
        let style = self
            .style_stack
            .last()
            .cloned()
            .unwrap_or_default();
        if let Some(node) = self.store.value_mut(slot) {
            node.display.clear();
            node.display.push_str(display);
            node.flags = NodeFlags::empty();
            params.apply(&style, node);
            node.last_frame = frame;
            node.parent = None;
            node.first = None;
            node.last = None;
            node.next = None;
            node.prev = None;
            node.child_count = 0;
            node.text_rect = Rect::ZERO;
        }
        self.roots.push(slot);
        self.layer_stack.push(slot);
        self.parent_stack.push(slot);
        NodeRef { slot, key }
    }

    /// Close the current layer, restoring the previous parent.
    pub fn end_layer(&mut self) {
        match self.layer_stack.pop() {
            Some(layer) => {
                if self.parent_stack.last() == Some(&layer) {
                    self.parent_stack.pop();
                } else {
                    self.capture_error(BuildError::UnbalancedParentStack {
                        remaining: self.parent_stack.len().saturating_sub(1),
                    });
                }
            }
            None => {
                self.capture_error(BuildError::UnbalancedParentStack { remaining: 0 });
            }
        }
    }

    /// Finish the frame: validate stacks, prune untouched nodes, clear stale
    /// interaction keys, advance animations by `dt` seconds, and run the
    /// layout solver over every root tree.
    ///
    /// Returns the first build error captured during the frame, if any; an
    /// erroring frame built an unreliable tree and should not be rendered.
    pub fn end_frame(&mut self, dt: f64) -> Result<(), BuildError> {
        self.in_frame = false;
        if self.parent_stack.len() != 1 || !self.layer_stack.is_empty() {
            self.capture_error(BuildError::UnbalancedParentStack {
                remaining: self.parent_stack.len().saturating_sub(1) + self.layer_stack.len(),
            });
        }
        if self.style_stack.len() != 1 {
            self.capture_error(BuildError::UnbalancedStyleStack {
                remaining: self.style_stack.len().saturating_sub(1),
            });
        }

        let frame = self.frame;
        let hot = self.hot;
        let active = self.active;
        // Frame-rate independent exponential smoothing toward 1/0 targets.
        let rate = 1.0 - (2.0_f64).powf(-20.0 * dt.max(0.0));
        let mut pruned = 0_usize;
        self.store.retain(|_, node| {
            if node.last_frame != frame {
                pruned += 1;
                return false;
            }
            let hot_target = if hot == Some(node.key) { 1.0 } else { 0.0 };
            let active_target = if active == Some(node.key) { 1.0 } else { 0.0 };
            node.hot_t += (hot_target - node.hot_t) * rate;
            node.active_t += (active_target - node.active_t) * rate;
            true
        });
        if pruned > 0 {
            tracing::debug!(frame, pruned, "pruned untouched nodes");
        }

        // A pruned node must never leave a dangling interaction key.
        for key in [&mut self.hot, &mut self.active, &mut self.focused] {
            if let Some(k) = *key
                && !self.store.contains(k.raw())
            {
                *key = None;
            }
        }

        let roots = self.roots.clone();
        for root in roots {
            layout::solve(&mut self.store, root, self.screen);
        }

        match self.first_error.take() {
            Some(err) => {
                tracing::error!(error = %err, "frame build failed");
                Err(err)
            }
            None => Ok(()),
        }
    }

    /// Build the frame's draw list by walking the laid-out trees in render
    /// order. Call after [`Ui::end_frame`].
    pub fn draw(&mut self) -> DrawList {
        draw::build_list(&self.store, &mut self.fonts, &self.roots)
    }

    /// The signal resolved for `node` this frame.
    pub fn signal(&self, node: &NodeRef) -> Signal {
        self.store
            .value(node.slot)
            .map(|n| n.signal)
            .unwrap_or_default()
    }

    /// The absolute rect solved for `node` at the last `end_frame`.
    pub fn rect(&self, node: &NodeRef) -> Rect {
        self.store
            .value(node.slot)
            .map(|n| n.rect)
            .unwrap_or(Rect::ZERO)
    }

    /// The persistent toggle state of `node`.
    pub fn toggled(&self, node: &NodeRef) -> bool {
        self.store
            .value(node.slot)
            .map(|n| n.toggled)
            .unwrap_or(false)
    }

    /// The persistent scroll offset of `node`.
    pub fn scroll_offset(&self, node: &NodeRef) -> Vec2 {
        self.store
            .value(node.slot)
            .map(|n| n.scroll_offset)
            .unwrap_or(Vec2::ZERO)
    }

    /// Read access to the full node record, or `None` for stale handles.
    pub fn node_data(&self, node: &NodeRef) -> Option<&Node> {
        self.store.value(node.slot)
    }

    /// The font cache.
    pub fn fonts(&self) -> &FontCache<G> {
        &self.fonts
    }

    /// Mutable access to the font cache.
    pub fn fonts_mut(&mut self) -> &mut FontCache<G> {
        &mut self.fonts
    }

    /// The timestamp passed to the current frame's `begin_frame`, for
    /// widget-level timing.
    pub fn time_ms(&self) -> u64 {
        self.now_ms
    }

    /// The current frame index.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of live nodes in the table.
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    /// Key of the node under the cursor, if any.
    pub fn hot_key(&self) -> Option<NodeKey> {
        self.hot
    }

    /// Key of the node holding the active press, if any.
    pub fn active_key(&self) -> Option<NodeKey> {
        self.active
    }

    /// Key of the node holding keyboard focus, if any.
    pub fn focused_key(&self) -> Option<NodeKey> {
        self.focused
    }

    fn cursor_icon(&self) -> CursorIcon {
        for key in [self.focused, self.hot, self.active].into_iter().flatten() {
            if let Some(node) = self.store.get(key.raw()) {
                if let Some(icon) = node.cursor {
                    return icon;
                }
                if node.flags.contains(NodeFlags::SELECTABLE) {
                    return CursorIcon::IBeam;
                }
                if node.flags.clickable() {
                    return CursorIcon::PointingHand;
                }
            }
        }
        CursorIcon::Arrow
    }

    fn fallback_ref(&self) -> NodeRef {
        let slot = *self.roots.first().expect("a frame always has a root");
        let key = self
            .store
            .value(slot)
            .map(|n| n.key)
            .expect("root node is live");
        NodeRef { slot, key }
    }

    fn capture_error(&mut self, err: BuildError) {
        if self.first_error.is_none() {
            tracing::warn!(error = %err, "build error captured; continuing with fallback");
            self.first_error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracken_input::{Event, EventKind, Key, Modifiers, MouseButton};
    use bracken_text::{FixedMetrics, FontTable};
    use crate::draw::DrawHandle;
    use crate::types::{Axis, Rgba};

    const SCREEN: Size = Size::new(800.0, 600.0);
    const DT: f64 = 1.0 / 60.0;

    fn test_ui() -> Ui<FixedMetrics> {
        Ui::new(FontCache::new(FontTable::with_regular(FixedMetrics::default())))
    }

    fn fixed(w: f64, h: f64) -> NodeParams {
        NodeParams {
            size_x: Some(SizeSpec::px(w, 1.0)),
            size_y: Some(SizeSpec::px(h, 1.0)),
            ..NodeParams::default()
        }
    }

    fn left_down(t: u64) -> Event {
        Event::new(
            t,
            EventKind::MouseDown {
                button: MouseButton::Left,
            },
        )
    }

    fn left_up(t: u64) -> Event {
        Event::new(
            t,
            EventKind::MouseUp {
                button: MouseButton::Left,
            },
        )
    }

    #[test]
    fn identity_is_stable_across_frames() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let first = ui.node(NodeFlags::empty(), "panel", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 16);
        let second = ui.node(NodeFlags::empty(), "panel", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        assert_eq!(first.slot, second.slot, "same key, same storage slot");
        assert_eq!(first.key, second.key);
        let node = ui.node_data(&second).unwrap();
        assert_eq!(node.first_frame, 1, "creation frame is preserved");
        assert_eq!(node.last_frame, 2, "touch frame is refreshed");
    }

    #[test]
    fn per_frame_fields_are_overwritten_persistent_kept() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let node = ui.node(NodeFlags::CLICKABLE, "box", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.rect(&node).width(), 100.0);

        // Same identity, different per-frame parameters.
        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 16);
        let node = ui.node(NodeFlags::empty(), "box", fixed(40.0, 40.0));
        ui.end_frame(DT).unwrap();
        let data = ui.node_data(&node).unwrap();
        assert_eq!(data.rect.width(), 40.0, "size inputs fully overwritten");
        assert_eq!(data.flags, NodeFlags::empty(), "flags fully overwritten");
        assert_eq!(data.first_frame, 1, "persistent fields preserved");
    }

    #[test]
    fn sibling_key_collision_is_a_fatal_build_error() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let a = ui.node(NodeFlags::empty(), "dup", fixed(10.0, 10.0));
        let b = ui.node(NodeFlags::empty(), "dup", fixed(10.0, 10.0));
        let err = ui.end_frame(DT).unwrap_err();
        assert_eq!(
            err,
            BuildError::KeyCollision {
                display: "dup".to_string()
            }
        );
        // The colliding call fell back to the root, not a silent overwrite.
        assert_ne!(a.slot, b.slot);
        assert_eq!(b.key, hash_key(0, ROOT_KEY));
    }

    #[test]
    fn no_id_nodes_do_not_collide() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let a = ui.node(NodeFlags::NO_ID, "row", fixed(10.0, 10.0));
        let b = ui.node(NodeFlags::NO_ID, "row", fixed(10.0, 10.0));
        assert!(ui.end_frame(DT).is_ok());
        assert_ne!(a.key, b.key, "random salt separates identical labels");
    }

    #[test]
    fn same_label_under_different_parents_is_distinct() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let left = ui.node(NodeFlags::empty(), "left", NodeParams::default());
        ui.push_parent(left);
        let a = ui.node(NodeFlags::empty(), "item", fixed(10.0, 10.0));
        ui.pop_parent();
        let right = ui.node(NodeFlags::empty(), "right", NodeParams::default());
        ui.push_parent(right);
        let b = ui.node(NodeFlags::empty(), "item", fixed(10.0, 10.0));
        ui.pop_parent();
        assert!(ui.end_frame(DT).is_ok());
        assert_ne!(a.key, b.key, "parent key salts the child hash");
    }

    #[test]
    fn untouched_nodes_are_pruned() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        ui.node(NodeFlags::empty(), "kept", fixed(10.0, 10.0));
        let gone = ui.node(NodeFlags::empty(), "gone", fixed(10.0, 10.0));
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.node_count(), 3, "root + two children");

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 16);
        ui.node(NodeFlags::empty(), "kept", fixed(10.0, 10.0));
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.node_count(), 2, "untouched node swept at frame end");
        assert!(ui.node_data(&gone).is_none(), "stale handle resolves to None");
    }

    #[test]
    fn pruned_focus_key_is_cleared_not_dangling() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::new(50.0, 50.0), &mut events, 0);
        ui.node(NodeFlags::SELECTABLE, "field", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, Point::new(50.0, 50.0), &mut events, 10);
        ui.node(NodeFlags::SELECTABLE, "field", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        assert!(ui.focused_key().is_some(), "press focused the field");

        // Field no longer built: the node is pruned and focus must not dangle.
        ui.begin_frame(SCREEN, Point::new(50.0, 50.0), &mut events, 20);
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.focused_key(), None);
    }

    #[test]
    fn click_spans_two_frames() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        // Frame with the press queued: pressed + held.
        events.push(left_down(10));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let button = ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        let sig = ui.signal(&button);
        assert!(sig.pressed);
        assert!(sig.held_down);
        assert!(!sig.clicked);
        assert!(events.is_empty(), "the press was consumed");

        // Frame with the release queued: released + clicked, no longer held.
        events.push(left_up(20));
        ui.begin_frame(SCREEN, mouse, &mut events, 20);
        let button = ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        let sig = ui.signal(&button);
        assert!(sig.released);
        assert!(sig.clicked);
        assert!(!sig.held_down);
    }

    #[test]
    fn drag_off_node_still_consumes_release_without_click() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::new(50.0, 50.0), &mut events, 0);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, Point::new(50.0, 50.0), &mut events, 10);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        // Mouse dragged off the node before release.
        events.push(left_up(30));
        ui.begin_frame(SCREEN, Point::new(500.0, 500.0), &mut events, 30);
        let button = ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        let sig = ui.signal(&button);
        assert!(sig.released, "active node consumed its own release");
        assert!(!sig.clicked, "off-node release is not a click");
        assert!(events.is_empty());
        assert_eq!(ui.active_key(), None);
    }

    #[test]
    fn release_is_consumed_exactly_once() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        // Two overlapping clickable siblings; the floating one is drawn last
        // and therefore resolves first.
        let build = |ui: &mut Ui<FixedMetrics>| {
            let below = ui.node(NodeFlags::CLICKABLE, "below", fixed(100.0, 100.0));
            let above = ui.node(
                NodeFlags::CLICKABLE | NodeFlags::FLOATING_X | NodeFlags::FLOATING_Y,
                "above",
                fixed(100.0, 100.0),
            );
            (below, above)
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let (below, above) = build(&mut ui);
        ui.end_frame(DT).unwrap();
        assert!(ui.signal(&above).pressed, "topmost node takes the press");
        assert!(!ui.signal(&below).pressed, "event not visible underneath");

        events.push(left_up(20));
        ui.begin_frame(SCREEN, mouse, &mut events, 20);
        let (below, above) = build(&mut ui);
        ui.end_frame(DT).unwrap();
        assert!(ui.signal(&above).clicked);
        assert!(!ui.signal(&below).released, "release consumed exactly once");
        assert!(events.is_empty());
    }

    #[test]
    fn hover_is_granted_to_one_node_per_frame() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let build = |ui: &mut Ui<FixedMetrics>| {
            let below = ui.node(NodeFlags::CLICKABLE, "below", fixed(100.0, 100.0));
            let above = ui.node(
                NodeFlags::CLICKABLE | NodeFlags::FLOATING_X | NodeFlags::FLOATING_Y,
                "above",
                fixed(100.0, 100.0),
            );
            (below, above)
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        ui.begin_frame(SCREEN, mouse, &mut events, 16);
        let (below, above) = build(&mut ui);
        ui.end_frame(DT).unwrap();
        assert!(ui.signal(&above).hovering);
        assert!(!ui.signal(&below).hovering);
        assert_eq!(ui.hot_key(), Some(above.key));
    }

    #[test]
    fn toggle_flips_on_click_and_persists() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::TOGGLEABLE, "check", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        ui.node(NodeFlags::TOGGLEABLE, "check", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(left_up(20));
        ui.begin_frame(SCREEN, mouse, &mut events, 20);
        let check = ui.node(NodeFlags::TOGGLEABLE, "check", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        assert!(ui.signal(&check).clicked);
        assert!(ui.toggled(&check), "click flipped the toggle");

        ui.begin_frame(SCREEN, mouse, &mut events, 40);
        let check = ui.node(NodeFlags::TOGGLEABLE, "check", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        assert!(ui.toggled(&check), "toggle persists across frames");
    }

    #[test]
    fn double_and_triple_click_windows() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let click_at = |ui: &mut Ui<FixedMetrics>, events: &mut EventQueue, t: u64| -> Signal {
            events.push(left_down(t));
            ui.begin_frame(SCREEN, mouse, events, t);
            ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
            ui.end_frame(DT).unwrap();
            events.push(left_up(t + 5));
            ui.begin_frame(SCREEN, mouse, events, t + 5);
            let n = ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
            ui.end_frame(DT).unwrap();
            ui.signal(&n)
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        let first = click_at(&mut ui, &mut events, 100);
        assert!(first.clicked && !first.double_clicked);

        let second = click_at(&mut ui, &mut events, 200);
        assert!(second.clicked && second.double_clicked && !second.triple_clicked);

        let third = click_at(&mut ui, &mut events, 300);
        assert!(third.triple_clicked, "third click inside the window");

        // Past the window the sequence starts over as a single click.
        let fourth = click_at(&mut ui, &mut events, 1000);
        assert!(fourth.clicked && !fourth.double_clicked && !fourth.triple_clicked);
    }

    #[test]
    fn clicks_outside_window_stay_single() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        for t in [100_u64, 600, 1100] {
            events.push(left_down(t));
            ui.begin_frame(SCREEN, mouse, &mut events, t);
            ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
            ui.end_frame(DT).unwrap();
            events.push(left_up(t + 5));
            ui.begin_frame(SCREEN, mouse, &mut events, t + 5);
            let n = ui.node(NodeFlags::CLICKABLE, "target", fixed(100.0, 100.0));
            ui.end_frame(DT).unwrap();
            let sig = ui.signal(&n);
            assert!(sig.clicked);
            assert!(!sig.double_clicked, "500ms apart never doubles");
        }
    }

    #[test]
    fn enter_raises_enter_pressed_on_focused_node() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::SELECTABLE, "field", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        ui.node(NodeFlags::SELECTABLE, "field", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        events.push(Event::new(30, EventKind::KeyDown { key: Key::Enter }));
        ui.begin_frame(SCREEN, mouse, &mut events, 30);
        let field = ui.node(NodeFlags::SELECTABLE, "field", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        let sig = ui.signal(&field);
        assert!(sig.focused);
        assert!(sig.enter_pressed);
        assert!(events.is_empty(), "the key press was consumed");
    }

    #[test]
    fn scroll_applies_then_clamps_in_layout() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let build = |ui: &mut Ui<FixedMetrics>| {
            let pane = ui.node(
                NodeFlags::SCROLLABLE | NodeFlags::CLIP_CHILDREN,
                "pane",
                fixed(100.0, 100.0),
            );
            ui.push_parent(pane);
            ui.node(NodeFlags::empty(), "content", fixed(50.0, 300.0));
            ui.pop_parent();
            pane
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        // A huge wheel delta overshoots; the violation pass clamps it to the
        // overflow range in the same frame.
        events.push(Event::new(
            10,
            EventKind::Scroll {
                delta: Vec2::new(0.0, 500.0),
            },
        ));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let pane = build(&mut ui);
        ui.end_frame(DT).unwrap();

        let sig = ui.signal(&pane);
        assert_eq!(sig.scroll, Vec2::new(0.0, 500.0), "raw delta on the signal");
        assert_eq!(
            ui.scroll_offset(&pane),
            Vec2::new(0.0, 200.0),
            "offset clamped to [0, overflow]"
        );
        assert!(events.is_empty(), "scroll event consumed");
    }

    #[test]
    fn scroll_shifts_children_against_the_offset() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let build = |ui: &mut Ui<FixedMetrics>| {
            let pane = ui.node(
                NodeFlags::SCROLLABLE | NodeFlags::CLIP_CHILDREN,
                "pane",
                fixed(100.0, 100.0),
            );
            ui.push_parent(pane);
            let content = ui.node(NodeFlags::empty(), "content", fixed(50.0, 300.0));
            ui.pop_parent();
            (pane, content)
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        events.push(Event::new(
            10,
            EventKind::Scroll {
                delta: Vec2::new(0.0, 50.0),
            },
        ));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let (_pane, content) = build(&mut ui);
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.rect(&content).y0, -50.0, "content shifted up by the offset");
    }

    #[test]
    fn shift_swaps_scroll_axes() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let build = |ui: &mut Ui<FixedMetrics>| {
            let pane = ui.node(
                NodeFlags::SCROLLABLE,
                "pane",
                fixed(100.0, 100.0),
            );
            ui.push_parent(pane);
            ui.node(NodeFlags::empty(), "content", fixed(300.0, 50.0));
            ui.pop_parent();
            pane
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        events.push(Event::with_mods(
            10,
            EventKind::Scroll {
                delta: Vec2::new(0.0, 30.0),
            },
            Modifiers::SHIFT,
        ));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let pane = build(&mut ui);
        ui.end_frame(DT).unwrap();
        let sig = ui.signal(&pane);
        assert_eq!(sig.scroll, Vec2::new(30.0, 0.0), "shift maps wheel to x");
    }

    #[test]
    fn percent_layout_against_screen_sized_root() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let child = ui.node(
            NodeFlags::empty(),
            "half",
            NodeParams {
                size_x: Some(SizeSpec::percent(0.5, 1.0)),
                size_y: Some(SizeSpec::percent(1.0, 1.0)),
                ..NodeParams::default()
            },
        );
        ui.end_frame(DT).unwrap();
        let rect = ui.rect(&child);
        assert_eq!(rect.width(), 400.0);
        assert_eq!(rect.height(), 600.0);
    }

    #[test]
    fn violation_shrinks_zero_strictness_first() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let row = ui.node(
            NodeFlags::empty(),
            "row",
            NodeParams {
                size_x: Some(SizeSpec::px(100.0, 1.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                layout_axis: Some(Axis::X),
                ..NodeParams::default()
            },
        );
        ui.push_parent(row);
        let loose = ui.node(
            NodeFlags::empty(),
            "loose",
            NodeParams {
                size_x: Some(SizeSpec::px(60.0, 0.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                ..NodeParams::default()
            },
        );
        let medium = ui.node(
            NodeFlags::empty(),
            "medium",
            NodeParams {
                size_x: Some(SizeSpec::px(60.0, 0.5)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                ..NodeParams::default()
            },
        );
        let rigid = ui.node(
            NodeFlags::empty(),
            "rigid",
            NodeParams {
                size_x: Some(SizeSpec::px(60.0, 1.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                ..NodeParams::default()
            },
        );
        ui.pop_parent();
        ui.end_frame(DT).unwrap();

        // 180 requested into 100: the zero-strictness child gives up all 60
        // first, the half-strict child absorbs the remaining 20, the rigid
        // child keeps every pixel.
        assert_eq!(ui.rect(&loose).width(), 0.0);
        assert_eq!(ui.rect(&medium).width(), 40.0);
        assert_eq!(ui.rect(&rigid).width(), 60.0);
        let total =
            ui.rect(&loose).width() + ui.rect(&medium).width() + ui.rect(&rigid).width();
        assert!(total <= 100.0 + 1e-9);
    }

    #[test]
    fn rigid_children_leave_unresolved_overflow() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let row = ui.node(
            NodeFlags::empty(),
            "row",
            NodeParams {
                size_x: Some(SizeSpec::px(100.0, 1.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                layout_axis: Some(Axis::X),
                ..NodeParams::default()
            },
        );
        ui.push_parent(row);
        let a = ui.node(
            NodeFlags::empty(),
            "a",
            NodeParams {
                size_x: Some(SizeSpec::px(80.0, 1.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                ..NodeParams::default()
            },
        );
        let b = ui.node(
            NodeFlags::empty(),
            "b",
            NodeParams {
                size_x: Some(SizeSpec::px(80.0, 1.0)),
                size_y: Some(SizeSpec::px(50.0, 1.0)),
                ..NodeParams::default()
            },
        );
        ui.pop_parent();
        ui.end_frame(DT).unwrap();
        // Strictness 1 never shrinks; content simply overflows.
        assert_eq!(ui.rect(&a).width(), 80.0);
        assert_eq!(ui.rect(&b).width(), 80.0);
    }

    #[test]
    fn children_sum_adds_padding_and_flows() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let column = ui.node(
            NodeFlags::empty(),
            "column",
            NodeParams {
                size_x: Some(SizeSpec::children(1.0)),
                size_y: Some(SizeSpec::children(1.0)),
                padding: Some(Vec2::new(5.0, 5.0)),
                ..NodeParams::default()
            },
        );
        ui.push_parent(column);
        let first = ui.node(NodeFlags::empty(), "first", fixed(100.0, 20.0));
        let second = ui.node(NodeFlags::empty(), "second", fixed(60.0, 30.0));
        ui.pop_parent();
        ui.end_frame(DT).unwrap();

        let rect = ui.rect(&column);
        assert_eq!(rect.width(), 110.0, "max child width plus padding");
        assert_eq!(rect.height(), 60.0, "summed heights plus padding");
        assert_eq!(ui.rect(&first).origin(), Point::new(5.0, 5.0));
        assert_eq!(ui.rect(&second).origin(), Point::new(5.0, 25.0));
    }

    #[test]
    fn em_sizing_scales_with_font_px() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let node = ui.node(
            NodeFlags::empty(),
            "em",
            NodeParams {
                size_x: Some(SizeSpec::em(2.0, 1.0)),
                size_y: Some(SizeSpec::em(1.5, 1.0)),
                font_px: Some(20.0),
                ..NodeParams::default()
            },
        );
        ui.end_frame(DT).unwrap();
        assert_eq!(ui.rect(&node).width(), 40.0);
        assert_eq!(ui.rect(&node).height(), 30.0);
    }

    #[test]
    fn text_content_sizing_uses_shaped_extent() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let label = ui.node(
            NodeFlags::DRAW_TEXT,
            "abcd##label",
            NodeParams {
                size_x: Some(SizeSpec::text(1.0)),
                size_y: Some(SizeSpec::text(1.0)),
                ..NodeParams::default()
            },
        );
        ui.end_frame(DT).unwrap();
        // FixedMetrics: advance 8 at 16px, line advance 16.
        assert_eq!(ui.rect(&label).width(), 32.0);
        assert_eq!(ui.rect(&label).height(), 16.0);
    }

    #[test]
    fn floating_nodes_skip_flow_and_use_rel_pos() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let column = ui.node(
            NodeFlags::empty(),
            "column",
            NodeParams {
                size_x: Some(SizeSpec::children(1.0)),
                size_y: Some(SizeSpec::children(1.0)),
                ..NodeParams::default()
            },
        );
        ui.push_parent(column);
        let flowed = ui.node(NodeFlags::empty(), "flowed", fixed(50.0, 20.0));
        let floated = ui.node(
            NodeFlags::FLOATING_X | NodeFlags::FLOATING_Y,
            "floated",
            NodeParams {
                rel_pos: Some(Point::new(30.0, 40.0)),
                ..fixed(10.0, 10.0)
            },
        );
        let after = ui.node(NodeFlags::empty(), "after", fixed(50.0, 20.0));
        ui.pop_parent();
        ui.end_frame(DT).unwrap();

        assert_eq!(
            ui.rect(&column).height(),
            40.0,
            "floating child excluded from the children sum"
        );
        assert_eq!(ui.rect(&floated).origin(), Point::new(30.0, 40.0));
        assert_eq!(ui.rect(&flowed).y0, 0.0);
        assert_eq!(ui.rect(&after).y0, 20.0, "flow skips the floating child");
    }

    #[test]
    fn clip_rect_inherits_unless_parent_clips() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let clipper = ui.node(
            NodeFlags::CLIP_CHILDREN,
            "clipper",
            fixed(100.0, 100.0),
        );
        ui.push_parent(clipper);
        let child = ui.node(NodeFlags::empty(), "child", fixed(200.0, 200.0));
        ui.push_parent(child);
        let grandchild = ui.node(NodeFlags::empty(), "grandchild", fixed(10.0, 10.0));
        ui.pop_parent();
        ui.pop_parent();
        ui.end_frame(DT).unwrap();

        let clipper_rect = ui.rect(&clipper);
        assert_eq!(
            ui.node_data(&child).unwrap().clip_rect,
            clipper_rect,
            "clipping parent sets the child clip to its own rect"
        );
        assert_eq!(
            ui.node_data(&grandchild).unwrap().clip_rect,
            clipper_rect,
            "non-clipping parent passes its clip through"
        );
    }

    #[test]
    fn layout_is_deterministic_across_identical_frames() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        let build = |ui: &mut Ui<FixedMetrics>| {
            let row = ui.node(
                NodeFlags::empty(),
                "row",
                NodeParams {
                    size_x: Some(SizeSpec::percent(0.75, 1.0)),
                    size_y: Some(SizeSpec::children(0.0)),
                    layout_axis: Some(Axis::X),
                    ..NodeParams::default()
                },
            );
            ui.push_parent(row);
            let a = ui.node(NodeFlags::empty(), "a", fixed(120.0, 40.0));
            let b = ui.node(
                NodeFlags::empty(),
                "b",
                NodeParams {
                    size_x: Some(SizeSpec::percent(0.25, 0.5)),
                    size_y: Some(SizeSpec::px(40.0, 1.0)),
                    ..NodeParams::default()
                },
            );
            ui.pop_parent();
            (row, a, b)
        };

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let refs = build(&mut ui);
        ui.end_frame(DT).unwrap();
        let first = (ui.rect(&refs.0), ui.rect(&refs.1), ui.rect(&refs.2));

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 16);
        let refs = build(&mut ui);
        ui.end_frame(DT).unwrap();
        let second = (ui.rect(&refs.0), ui.rect(&refs.1), ui.rect(&refs.2));

        assert_eq!(first, second);
    }

    #[test]
    fn unbalanced_parent_stack_is_reported() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        let panel = ui.node(NodeFlags::empty(), "panel", fixed(10.0, 10.0));
        ui.push_parent(panel);
        // Missing pop_parent.
        let err = ui.end_frame(DT).unwrap_err();
        assert_eq!(err, BuildError::UnbalancedParentStack { remaining: 1 });
    }

    #[test]
    fn unbalanced_style_stack_is_reported() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        ui.push_style(Style::default());
        let err = ui.end_frame(DT).unwrap_err();
        assert_eq!(err, BuildError::UnbalancedStyleStack { remaining: 1 });
    }

    #[test]
    fn style_stack_feeds_node_defaults() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let red = Rgba::rgb(1.0, 0.0, 0.0);

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        ui.push_style(Style {
            background: red,
            font_px: 24.0,
            ..Style::default()
        });
        let styled = ui.node(NodeFlags::DRAW_BACKGROUND, "styled", fixed(10.0, 10.0));
        ui.pop_style();
        let plain = ui.node(NodeFlags::DRAW_BACKGROUND, "plain", fixed(10.0, 10.0));
        ui.end_frame(DT).unwrap();

        assert_eq!(ui.node_data(&styled).unwrap().background, red);
        assert_eq!(ui.node_data(&styled).unwrap().font_px, 24.0);
        assert_eq!(ui.node_data(&plain).unwrap().background, Rgba::TRANSPARENT);
    }

    #[test]
    fn layers_resolve_input_above_the_main_tree() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let build = |ui: &mut Ui<FixedMetrics>| {
            let main = ui.node(NodeFlags::CLICKABLE, "main", fixed(100.0, 100.0));
            ui.begin_layer("menu", NodeParams::default());
            let item = ui.node(NodeFlags::CLICKABLE, "item", fixed(100.0, 100.0));
            ui.end_layer();
            (main, item)
        };

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        build(&mut ui);
        ui.end_frame(DT).unwrap();

        events.push(left_down(10));
        ui.begin_frame(SCREEN, mouse, &mut events, 10);
        let (main, item) = build(&mut ui);
        ui.end_frame(DT).unwrap();
        assert!(ui.signal(&item).pressed, "layer sits above the main tree");
        assert!(!ui.signal(&main).pressed);
    }

    #[test]
    fn cursor_icon_follows_the_hot_node() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        let icon = ui.begin_frame(SCREEN, mouse, &mut events, 0);
        assert_eq!(icon, CursorIcon::Arrow);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        let icon = ui.begin_frame(SCREEN, mouse, &mut events, 16);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();
        assert_eq!(icon, CursorIcon::PointingHand);
    }

    #[test]
    fn hot_transition_rises_while_hovered() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();
        let mouse = Point::new(50.0, 50.0);

        ui.begin_frame(SCREEN, mouse, &mut events, 0);
        ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
        ui.end_frame(DT).unwrap();

        let mut last = 0.0;
        for t in 1..4_u64 {
            ui.begin_frame(SCREEN, mouse, &mut events, t * 16);
            let button = ui.node(NodeFlags::CLICKABLE, "button", fixed(100.0, 100.0));
            ui.end_frame(DT).unwrap();
            let hot_t = ui.node_data(&button).unwrap().hot_t;
            assert!(hot_t > last, "transition must rise toward 1");
            assert!(hot_t <= 1.0);
            last = hot_t;
        }
    }

    #[test]
    fn draw_list_emits_background_then_text() {
        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        ui.node(
            NodeFlags::DRAW_BACKGROUND | NodeFlags::DRAW_TEXT,
            "hi##label",
            NodeParams {
                size_x: Some(SizeSpec::text(1.0)),
                size_y: Some(SizeSpec::text(1.0)),
                background: Some(Rgba::BLACK),
                ..NodeParams::default()
            },
        );
        ui.end_frame(DT).unwrap();

        let list = ui.draw();
        assert_eq!(list.quads.len(), 3, "one fill plus two glyph quads");
        assert!(list.quads[0].uv.is_none(), "background is untextured");
        assert!(list.quads[1].uv.is_some(), "glyphs carry atlas UVs");
        assert!(list.quads[2].uv.is_some());
    }

    #[test]
    fn custom_draw_capability_appends_quads() {
        use crate::draw::CustomDraw;

        struct Underline;
        impl CustomDraw for Underline {
            fn draw(&self, node: &Node, out: &mut DrawList) {
                let r = node.rect;
                out.push_fill(
                    Rect::new(r.x0, r.y1 - 1.0, r.x1, r.y1),
                    Rgba::WHITE,
                    0.0,
                    node.clip_rect,
                );
            }
        }

        let mut ui = test_ui();
        let mut events = EventQueue::new();

        ui.begin_frame(SCREEN, Point::ZERO, &mut events, 0);
        ui.node(
            NodeFlags::empty(),
            "underlined",
            NodeParams {
                draw: Some(DrawHandle::new(Underline)),
                ..fixed(50.0, 20.0)
            },
        );
        ui.end_frame(DT).unwrap();

        let list = ui.draw();
        assert_eq!(list.quads.len(), 1);
        assert_eq!(list.quads[0].rect, Rect::new(0.0, 19.0, 50.0, 20.0));
    }
}
