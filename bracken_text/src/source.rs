// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rasterizer capability: per-codepoint metrics and coverage bitmaps.

/// Vertical font metrics at a given pixel size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VMetrics {
    /// Distance from baseline to the top of the tallest glyph, positive up.
    pub ascent: f64,
    /// Distance from baseline to the bottom of the lowest glyph, negative.
    pub descent: f64,
    /// Recommended extra gap between lines.
    pub line_gap: f64,
}

impl VMetrics {
    /// Baseline-to-baseline distance between consecutive lines.
    pub fn line_advance(&self) -> f64 {
        self.ascent - self.descent + self.line_gap
    }
}

/// A rasterized glyph: a coverage bitmap plus placement metrics.
///
/// `bearing_x`/`bearing_y` position the bitmap's top-left corner relative to
/// the pen at the baseline (`bearing_y` is negative for glyphs that rise
/// above the baseline, matching rasterizer conventions).
#[derive(Clone, Debug)]
pub struct RasterGlyph {
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Horizontal offset from the pen to the bitmap's left edge.
    pub bearing_x: f64,
    /// Vertical offset from the baseline to the bitmap's top edge.
    pub bearing_y: f64,
    /// Row-major single-channel coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// The black-box rasterization capability the cache is built on.
///
/// Implementations answer metric queries and rasterize single codepoints at
/// a pixel size. The cache owns packing, caching, and layout; a source never
/// sees the atlas.
pub trait GlyphSource {
    /// Vertical metrics at `px` pixel size.
    fn v_metrics(&self, px: f64) -> VMetrics;

    /// Horizontal advance of `ch` at `px` pixel size.
    fn advance(&self, ch: char, px: f64) -> f64;

    /// Kerning adjustment between `left` and `right` at `px` pixel size.
    fn kern(&self, left: char, right: char, px: f64) -> f64 {
        let _ = (left, right, px);
        0.0
    }

    /// Rasterize `ch` at `px` pixel size, or `None` for glyphs with no ink
    /// (whitespace, unmapped codepoints).
    fn rasterize(&self, ch: char, px: f64) -> Option<RasterGlyph>;
}

/// A deterministic, metrics-only glyph source.
///
/// Every glyph is a solid block with an advance proportional to the pixel
/// size, like a cell-based bitmap font. Useful for headless layout (server-
/// side measurement without font files) and for tests that need exact,
/// platform-independent extents.
#[derive(Copy, Clone, Debug)]
pub struct FixedMetrics {
    /// Advance per glyph, as a fraction of the pixel size.
    pub advance_em: f64,
    /// Ascent as a fraction of the pixel size.
    pub ascent_em: f64,
    /// Descent as a fraction of the pixel size (negative).
    pub descent_em: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            ascent_em: 0.8,
            descent_em: -0.2,
        }
    }
}

impl GlyphSource for FixedMetrics {
    fn v_metrics(&self, px: f64) -> VMetrics {
        VMetrics {
            ascent: self.ascent_em * px,
            descent: self.descent_em * px,
            line_gap: 0.0,
        }
    }

    fn advance(&self, _ch: char, px: f64) -> f64 {
        self.advance_em * px
    }

    fn rasterize(&self, ch: char, px: f64) -> Option<RasterGlyph> {
        if ch.is_whitespace() || ch.is_control() {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Block dimensions are small positive pixel counts."
        )]
        let width = (self.advance_em * px).round().max(1.0) as u32;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Block dimensions are small positive pixel counts."
        )]
        let height = (self.ascent_em * px).round().max(1.0) as u32;
        Some(RasterGlyph {
            width,
            height,
            bearing_x: 0.0,
            bearing_y: -(f64::from(height)),
            coverage: vec![0xFF; (width * height) as usize],
        })
    }
}
