// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Input: timestamped input events and a consumable event queue.
//!
//! The shell (window backend) owns an [`EventQueue`], pushes translated OS
//! events into it, and hands it to the UI core once per frame. The core walks
//! interactive nodes in input order and *consumes* the events that trigger
//! them, so an event matched by one node is never seen by a node underneath
//! it in the same frame.
//!
//! The queue supports the four access patterns that consumption needs:
//!
//! - [`EventQueue::first_match`]: pattern-match without removing.
//! - [`EventQueue::take_first`]: fetch-and-remove the first match.
//! - [`EventQueue::remove`]: removal by index.
//! - [`EventQueue::cursor`]: forward iteration with
//!   [`EventCursor::remove_current`] ("remove the one just yielded") that
//!   neither skips nor revisits entries.
//!
//! ## Example
//!
//! ```rust
//! use bracken_input::{Event, EventKind, EventQueue, Modifiers, MouseButton};
//!
//! let mut queue = EventQueue::new();
//! queue.push(Event::new(10, EventKind::MouseDown { button: MouseButton::Left }));
//! queue.push(Event::new(12, EventKind::Char { ch: 'a' }));
//!
//! // Consume the mouse press; the char event stays queued.
//! let down = queue.take_first(|e| e.is_mouse_down(MouseButton::Left));
//! assert!(down.is_some());
//! assert_eq!(queue.len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use kurbo::Vec2;

bitflags::bitflags! {
    /// Keyboard modifier state carried on every event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift is held.
        const SHIFT = 0b0000_0001;
        /// Control is held.
        const CONTROL = 0b0000_0010;
        /// Alt/Option is held.
        const ALT = 0b0000_0100;
        /// Logo/Command is held.
        const META = 0b0000_1000;
    }
}

/// Mouse button identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button / wheel press.
    Middle,
}

/// Non-character keys the core reacts to.
///
/// This is deliberately the small set the core and its text-editing helpers
/// need; shells with richer keyboards map everything else to [`Key::Other`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Return/Enter.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Any key the core has no special handling for, by scan code.
    Other(u32),
}

/// Cursor icon requested from the shell.
///
/// The core picks one of these per frame (from the focused, hot, or active
/// node, in that priority order); applying it is the shell's job.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorIcon {
    /// Default arrow.
    #[default]
    Arrow,
    /// Pointing hand, for clickable elements.
    PointingHand,
    /// Text I-beam, for selectable/editable text.
    IBeam,
    /// Horizontal resize.
    ResizeEw,
    /// Vertical resize.
    ResizeNs,
}

/// The payload of an input event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EventKind {
    /// A mouse button was pressed.
    MouseDown {
        /// Which button went down.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseUp {
        /// Which button came up.
        button: MouseButton,
    },
    /// The scroll wheel / trackpad scrolled.
    Scroll {
        /// Scroll delta in pixels, y-positive scrolling down.
        delta: Vec2,
    },
    /// A key went down.
    KeyDown {
        /// Which key.
        key: Key,
    },
    /// A key came up.
    KeyUp {
        /// Which key.
        key: Key,
    },
    /// A held key repeated.
    KeyRepeat {
        /// Which key.
        key: Key,
    },
    /// Text input produced a character.
    Char {
        /// The character.
        ch: char,
    },
}

/// A timestamped input event with modifier state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Event {
    /// Timestamp in milliseconds, from the shell's monotonic clock.
    pub time_ms: u64,
    /// Modifier keys held when the event fired.
    pub mods: Modifiers,
    /// What happened.
    pub kind: EventKind,
}

impl Event {
    /// Create an event with no modifiers held.
    pub fn new(time_ms: u64, kind: EventKind) -> Self {
        Self {
            time_ms,
            mods: Modifiers::empty(),
            kind,
        }
    }

    /// Create an event with explicit modifier state.
    pub fn with_mods(time_ms: u64, kind: EventKind, mods: Modifiers) -> Self {
        Self {
            time_ms,
            mods,
            kind,
        }
    }

    /// Whether this is a press of `button`.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        matches!(self.kind, EventKind::MouseDown { button: b } if b == button)
    }

    /// Whether this is a release of `button`.
    pub fn is_mouse_up(&self, button: MouseButton) -> bool {
        matches!(self.kind, EventKind::MouseUp { button: b } if b == button)
    }

    /// Whether this is a scroll event.
    pub fn is_scroll(&self) -> bool {
        matches!(self.kind, EventKind::Scroll { .. })
    }

    /// Whether this is a press or repeat of `key`.
    pub fn is_key_press(&self, key: Key) -> bool {
        matches!(
            self.kind,
            EventKind::KeyDown { key: k } | EventKind::KeyRepeat { key: k } if k == key
        )
    }
}

/// An ordered queue of input events for one frame.
///
/// Events are kept in arrival order. The core consumes events by removing
/// them; whatever is left after a frame is the shell's to keep or drop.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event in arrival order.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop all queued events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The queued events, in arrival order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// First event matching `pred`, without removing it.
    pub fn first_match(&self, pred: impl Fn(&Event) -> bool) -> Option<&Event> {
        self.events.iter().find(|e| pred(e))
    }

    /// Remove and return the first event matching `pred`.
    ///
    /// This is the consume-exactly-once primitive: once taken, the event is
    /// invisible to every later match in the same frame.
    pub fn take_first(&mut self, pred: impl Fn(&Event) -> bool) -> Option<Event> {
        let idx = self.events.iter().position(pred)?;
        Some(self.events.remove(idx))
    }

    /// Remove the event at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    pub fn remove(&mut self, idx: usize) -> Event {
        self.events.remove(idx)
    }

    /// Forward cursor over the queue supporting removal of the yielded event.
    pub fn cursor(&mut self) -> EventCursor<'_> {
        EventCursor {
            queue: self,
            next: 0,
            yielded: false,
        }
    }
}

/// Forward iteration over an [`EventQueue`] with mid-walk removal.
///
/// [`EventCursor::next`] yields events in order; [`EventCursor::remove_current`]
/// removes the event most recently yielded without skipping the one after it
/// or revisiting earlier ones.
#[derive(Debug)]
pub struct EventCursor<'a> {
    queue: &'a mut EventQueue,
    next: usize,
    yielded: bool,
}

impl EventCursor<'_> {
    /// Advance to the next event, or `None` at the end of the queue.
    pub fn next(&mut self) -> Option<&Event> {
        if self.next >= self.queue.events.len() {
            self.yielded = false;
            return None;
        }
        let event = &self.queue.events[self.next];
        self.next += 1;
        self.yielded = true;
        Some(event)
    }

    /// Remove the event most recently yielded by [`EventCursor::next`].
    ///
    /// Returns `None` if nothing was yielded since the last removal.
    pub fn remove_current(&mut self) -> Option<Event> {
        if !self.yielded {
            return None;
        }
        self.yielded = false;
        self.next -= 1;
        Some(self.queue.events.remove(self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(t: u64) -> Event {
        Event::new(
            t,
            EventKind::MouseDown {
                button: MouseButton::Left,
            },
        )
    }

    fn up(t: u64) -> Event {
        Event::new(
            t,
            EventKind::MouseUp {
                button: MouseButton::Left,
            },
        )
    }

    #[test]
    fn take_first_removes_exactly_one() {
        let mut queue = EventQueue::new();
        queue.push(down(1));
        queue.push(down(2));
        let taken = queue
            .take_first(|e| e.is_mouse_down(MouseButton::Left))
            .unwrap();
        assert_eq!(taken.time_ms, 1, "earliest match is taken first");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.events()[0].time_ms, 2);
    }

    #[test]
    fn first_match_does_not_remove() {
        let mut queue = EventQueue::new();
        queue.push(up(5));
        assert!(queue.first_match(|e| e.is_mouse_up(MouseButton::Left)).is_some());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn take_first_misses_leave_queue_intact() {
        let mut queue = EventQueue::new();
        queue.push(down(1));
        assert!(queue.take_first(|e| e.is_scroll()).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cursor_walks_in_order() {
        let mut queue = EventQueue::new();
        queue.push(down(1));
        queue.push(up(2));
        queue.push(down(3));
        let mut cursor = queue.cursor();
        let mut times = alloc::vec::Vec::new();
        while let Some(e) = cursor.next() {
            times.push(e.time_ms);
        }
        assert_eq!(times, alloc::vec![1, 2, 3]);
    }

    #[test]
    fn cursor_remove_current_does_not_skip() {
        let mut queue = EventQueue::new();
        queue.push(down(1));
        queue.push(up(2));
        queue.push(down(3));
        let mut cursor = queue.cursor();
        let mut seen = alloc::vec::Vec::new();
        while let Some(e) = cursor.next() {
            let t = e.time_ms;
            seen.push(t);
            if t == 2 {
                let removed = cursor.remove_current().unwrap();
                assert_eq!(removed.time_ms, 2);
            }
        }
        // Every event was yielded exactly once despite the removal.
        assert_eq!(seen, alloc::vec![1, 2, 3]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.events()[0].time_ms, 1);
        assert_eq!(queue.events()[1].time_ms, 3);
    }

    #[test]
    fn cursor_remove_requires_a_yield() {
        let mut queue = EventQueue::new();
        queue.push(down(1));
        let mut cursor = queue.cursor();
        assert!(cursor.remove_current().is_none());
        cursor.next();
        assert!(cursor.remove_current().is_some());
        assert!(cursor.remove_current().is_none(), "no double removal");
    }

    #[test]
    fn key_press_matches_down_and_repeat() {
        let down = Event::new(1, EventKind::KeyDown { key: Key::Enter });
        let repeat = Event::new(2, EventKind::KeyRepeat { key: Key::Enter });
        let other = Event::new(3, EventKind::KeyDown { key: Key::Escape });
        assert!(down.is_key_press(Key::Enter));
        assert!(repeat.is_key_press(Key::Enter));
        assert!(!other.is_key_press(Key::Enter));
    }

    #[test]
    fn modifiers_carried_on_events() {
        let e = Event::with_mods(
            1,
            EventKind::Scroll {
                delta: Vec2::new(0.0, 1.0),
            },
            Modifiers::SHIFT,
        );
        assert!(e.mods.contains(Modifiers::SHIFT));
        assert!(!e.mods.contains(Modifiers::CONTROL));
    }
}
