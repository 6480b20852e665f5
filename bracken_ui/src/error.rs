// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fatal build errors surfaced at the end of a frame.
//!
//! Errors during tree building are not returned at the offending call site;
//! that would force error plumbing onto every line of immediate-mode build
//! code. Instead the first error's context is captured, the offending call
//! returns a harmless fallback (the root node), building continues, and the
//! captured error comes back from [`Ui::end_frame`]. A frame that errored
//! built a structurally unreliable tree, so callers should treat the error
//! as fatal rather than render the result.
//!
//! [`Ui::end_frame`]: crate::Ui::end_frame

use core::fmt;

/// A fatal error detected while building a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// Two nodes created in the same frame resolved to the same key.
    ///
    /// This means two siblings share a hash string; continuing would rebuild
    /// the tree links into a cycle.
    KeyCollision {
        /// Display part of the second node's label.
        display: String,
    },
    /// `push_parent`/`pop_parent` calls did not balance by frame end.
    UnbalancedParentStack {
        /// Stack depth above the root at `end_frame`, or 0 for over-popping.
        remaining: usize,
    },
    /// `push_style`/`pop_style` calls did not balance by frame end.
    UnbalancedStyleStack {
        /// Stack depth above the base style at `end_frame`, or 0 for
        /// over-popping.
        remaining: usize,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyCollision { display } => {
                write!(f, "duplicate node key in one frame (label {display:?})")
            }
            Self::UnbalancedParentStack { remaining } => {
                write!(f, "parent stack unbalanced at end of frame ({remaining} open)")
            }
            Self::UnbalancedStyleStack { remaining } => {
                write!(f, "style stack unbalanced at end of frame ({remaining} open)")
            }
        }
    }
}

impl std::error::Error for BuildError {}
