// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`GlyphSource`] implementation for [`ab_glyph`] fonts.
//!
//! The shell loads font bytes once at startup (`FontArc::try_from_vec`) and
//! hands the fonts to the cache; everything after that is per-codepoint
//! metric queries and rasterization, which this adapter forwards to
//! `ab_glyph`'s outline renderer.
//!
//! ```no_run
//! use ab_glyph::FontArc;
//! use bracken_text::{FontCache, FontTable};
//!
//! let bytes = std::fs::read("fonts/body.ttf").unwrap();
//! let font = FontArc::try_from_vec(bytes).unwrap();
//! let cache = FontCache::new(FontTable::with_regular(font));
//! ```

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

use crate::source::{GlyphSource, RasterGlyph, VMetrics};

impl GlyphSource for FontArc {
    fn v_metrics(&self, px: f64) -> VMetrics {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pixel sizes are small; f32 is ab_glyph's native unit."
        )]
        let scaled = self.as_scaled(PxScale::from(px as f32));
        VMetrics {
            ascent: f64::from(scaled.ascent()),
            descent: f64::from(scaled.descent()),
            line_gap: f64::from(scaled.line_gap()),
        }
    }

    fn advance(&self, ch: char, px: f64) -> f64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pixel sizes are small; f32 is ab_glyph's native unit."
        )]
        let scaled = self.as_scaled(PxScale::from(px as f32));
        f64::from(scaled.h_advance(self.glyph_id(ch)))
    }

    fn kern(&self, left: char, right: char, px: f64) -> f64 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pixel sizes are small; f32 is ab_glyph's native unit."
        )]
        let scaled = self.as_scaled(PxScale::from(px as f32));
        f64::from(scaled.kern(self.glyph_id(left), self.glyph_id(right)))
    }

    fn rasterize(&self, ch: char, px: f64) -> Option<RasterGlyph> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pixel sizes are small; f32 is ab_glyph's native unit."
        )]
        let scale = PxScale::from(px as f32);
        let glyph = self
            .glyph_id(ch)
            .with_scale_and_position(scale, ab_glyph::point(0.0, 0.0));
        let outlined = self.outline_glyph(glyph)?;
        let bounds = outlined.px_bounds();
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Glyph bounds are small positive pixel counts."
        )]
        let width = bounds.width().ceil() as u32;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Glyph bounds are small positive pixel counts."
        )]
        let height = bounds.height().ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }
        let mut coverage = vec![0_u8; (width * height) as usize];
        outlined.draw(|x, y, c| {
            if x < width && y < height {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "Coverage is clamped to 0..=1 by ab_glyph."
                )]
                let byte = (c.clamp(0.0, 1.0) * 255.0) as u8;
                coverage[(y * width + x) as usize] = byte;
            }
        });
        Some(RasterGlyph {
            width,
            height,
            bearing_x: f64::from(bounds.min.x),
            bearing_y: f64::from(bounds.min.y),
            coverage,
        })
    }
}
