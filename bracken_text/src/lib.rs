// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Text: glyph rasterization cache and shaped-text measurement.
//!
//! Glyph shaping is too expensive to redo every frame for static strings and
//! too wasteful to keep forever for one-shot formatted strings. This crate
//! resolves that tension with a two-tier cache:
//!
//! - Shaped quads are first written into a frame-parity **arena** that is
//!   reset wholesale every other frame. A string built and drawn once costs
//!   one shaping pass and zero cleanup.
//! - An entry touched again in a *later* frame has proven reuse; at the next
//!   [`FontCache::prune`] its quads are copied out of the arena into a
//!   durable allocation and the entry is marked **permanent**. Permanent
//!   entries are freed explicitly once they go unused for a frame.
//!
//! Rasterization itself is a capability, not an implementation: anything
//! implementing [`GlyphSource`] (per-codepoint metrics, kerning, and a
//! coverage bitmap) can back the cache. [`FixedMetrics`] is a deterministic
//! built-in source for headless layout and tests; a real font adapter for
//! `ab_glyph` is available behind the `ab_glyph_adapter` feature.
//!
//! Rasterized glyphs are shelf-packed into a growable single-channel
//! [`Atlas`]. When the atlas fills up it doubles in size and every cached
//! glyph is repacked, since atlas coordinates are not stable across resizes.
//!
//! ## Example
//!
//! ```rust
//! use bracken_text::{FixedMetrics, FontCache, FontStyle, FontTable};
//!
//! let mut cache = FontCache::new(FontTable::with_regular(FixedMetrics::default()));
//! let shaped = cache.build_text("hello", FontStyle::Regular, 16.0);
//! assert!(shaped.rect.width() > 0.0);
//! assert_eq!(cache.quads(&shaped).len(), 5);
//! ```

mod atlas;
mod cache;
mod source;

pub mod adapters;

pub use atlas::{Atlas, AtlasRegion};
pub use cache::{EntryInfo, FontCache, FontStyle, FontTable, ShapedText, TextQuad};
pub use source::{FixedMetrics, GlyphSource, RasterGlyph, VMetrics};
