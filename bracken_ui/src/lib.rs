// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken UI: an immediate-mode UI core with retained per-node state.
//!
//! Call sites rebuild the UI tree from scratch every frame; the core keeps a
//! persistent, hash-keyed node table underneath so that state that must
//! survive frames (scroll offsets, toggles, animation transitions, focus)
//! lives on the nodes themselves. Identity comes from hierarchical string
//! keys: a node's label hashes together with its parent's key, so the same
//! build code produces the same node every frame.
//!
//! ## The frame loop
//!
//! - [`Ui::begin_frame`] resolves interaction signals for the *previous*
//!   frame's trees against the shell's event queue, walking nodes in reverse
//!   render order so the topmost node under the cursor consumes its
//!   triggering event first, exactly once. It then resets per-frame identity
//!   state, prunes the font cache, and recreates the synthetic root.
//! - Build code creates nodes with [`Ui::node`] and shapes the tree with the
//!   parent and style stacks ([`Ui::push_parent`], [`Ui::push_style`]) and
//!   extra root trees via [`Ui::begin_layer`].
//! - [`Ui::end_frame`] prunes nodes that were not re-requested, clears any
//!   interaction key left dangling by pruning, advances hover/press
//!   transitions with frame-rate-independent smoothing, and runs the
//!   five-pass layout solver (see [`SizeSpec`]) over every root tree.
//! - [`Ui::draw`] walks the laid-out trees in render order and emits the
//!   flat [`DrawList`] of quad records the rendering collaborator consumes.
//!
//! ## Errors
//!
//! Structural errors while building (duplicate sibling keys, unbalanced
//! stacks) do not panic and are not returned at the offending call site;
//! the first one is captured, the call falls back to the root node, and
//! [`Ui::end_frame`] returns it. See [`BuildError`].
//!
//! Single-threaded by design: one session owns its node table, font cache,
//! and the frame's mutation window. Sessions are plain values, so several
//! can coexist in one process.

mod draw;
mod error;
mod key;
mod layout;
mod node;
mod signal;
mod style;
mod types;
mod ui;
mod util;

pub use draw::{CustomDraw, DrawHandle, DrawList, DrawQuad};
pub use error::BuildError;
pub use key::{LABEL_SEPARATOR, NodeKey};
pub use node::{Node, NodeRef, Signal};
pub use signal::DOUBLE_CLICK_WINDOW_MS;
pub use style::{NodeParams, Style};
pub use types::{AXES, Axis, NodeFlags, Rgba, SizeKind, SizeSpec};
pub use ui::Ui;
