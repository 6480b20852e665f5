// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional adapters wiring real rasterizers into [`GlyphSource`].
//!
//! [`GlyphSource`]: crate::GlyphSource

#[cfg(feature = "ab_glyph_adapter")]
pub mod ab_glyph;
