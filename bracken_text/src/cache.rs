// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font cache: fonts per style, packed glyphs, and the two-tier
//! shaped-text quad cache.

use core::hash::Hasher;

use hashbrown::HashMap;
use kurbo::Rect;
use rustc_hash::FxHasher;

use crate::atlas::{Atlas, AtlasRegion};
use crate::source::{GlyphSource, VMetrics};

/// Default atlas edge length in texels.
const DEFAULT_ATLAS_SIZE: u32 = 512;
/// Atlas growth stops here; a glyph that cannot pack at this size is dropped.
const MAX_ATLAS_SIZE: u32 = 16384;
/// Default cap on cached shaped-text entries.
const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Font style selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Body text.
    Regular,
    /// Bold weight.
    Bold,
    /// Italic slant.
    Italic,
    /// Icon font.
    Icons,
}

/// One glyph source per style, with regular as the fallback.
#[derive(Clone, Debug)]
pub struct FontTable<G> {
    /// Regular style; always present.
    pub regular: G,
    /// Bold, falling back to regular when absent.
    pub bold: Option<G>,
    /// Italic, falling back to regular when absent.
    pub italic: Option<G>,
    /// Icons, falling back to regular when absent.
    pub icons: Option<G>,
}

impl<G> FontTable<G> {
    /// A table with only the regular style populated.
    pub fn with_regular(regular: G) -> Self {
        Self {
            regular,
            bold: None,
            italic: None,
            icons: None,
        }
    }

    /// The source for `style`, falling back to regular.
    pub fn get(&self, style: FontStyle) -> &G {
        let styled = match style {
            FontStyle::Regular => None,
            FontStyle::Bold => self.bold.as_ref(),
            FontStyle::Italic => self.italic.as_ref(),
            FontStyle::Icons => self.icons.as_ref(),
        };
        styled.unwrap_or(&self.regular)
    }
}

/// One textured quad of shaped text.
///
/// `rect` is in pixels relative to the text block's top-left corner; `uv` is
/// a normalized region of the cache's atlas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextQuad {
    /// Quad position relative to the text origin.
    pub rect: Rect,
    /// Normalized atlas coordinates.
    pub uv: Rect,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    style: FontStyle,
    px_bits: u64,
    ch: char,
}

#[derive(Clone, Debug)]
struct PackedGlyph {
    region: AtlasRegion,
    bearing_x: f64,
    bearing_y: f64,
    width: u32,
    height: u32,
    /// Source bitmap, retained so atlas growth can repack without
    /// re-rasterizing.
    coverage: Vec<u8>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct TextKey {
    hash: u64,
    style: FontStyle,
    px_bits: u64,
}

#[derive(Clone, Debug)]
enum QuadStorage {
    /// Range in a frame-parity arena; valid for the creation frame and the
    /// one after it.
    Arena { parity: u8, start: u32, len: u32 },
    /// Durable copy, promoted after proven cross-frame reuse.
    Owned(Box<[TextQuad]>),
}

#[derive(Clone, Debug)]
struct CacheEntry {
    storage: QuadStorage,
    rect: Rect,
    first_frame: u64,
    last_frame: u64,
}

/// Where a [`ShapedText`]'s quads live.
#[derive(Copy, Clone, Debug)]
enum TextSource {
    Cached(TextKey),
    /// Cache was at capacity; quads live only in the frame arena.
    Uncached { parity: u8, start: u32, len: u32 },
}

/// A shaped-text handle: the tight bounding rect plus a reference to the
/// quads held by the cache.
///
/// Handles are cheap copies; resolve the quads with [`FontCache::quads`].
/// A handle held across a prune that freed its entry resolves to an empty
/// quad slice.
#[derive(Copy, Clone, Debug)]
pub struct ShapedText {
    /// Tight bounding rect of the shaped text, origin at top-left.
    pub rect: Rect,
    source: TextSource,
}

/// Cache metadata for one shaped-text entry, exposed for inspection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntryInfo {
    /// Frame the entry was first built in.
    pub first_frame: u64,
    /// Frame the entry was last requested in.
    pub last_frame: u64,
    /// Whether the quads have been promoted to durable storage.
    pub permanent: bool,
}

/// Rasterized font instances plus the shaped-text quad cache.
///
/// See the crate docs for the two-tier arena/permanent lifecycle. All
/// operations are infallible from the caller's view: cache pressure degrades
/// to uncached shaping, and a full atlas grows and repacks transparently.
#[derive(Clone, Debug)]
pub struct FontCache<G> {
    fonts: FontTable<G>,
    atlas: Atlas,
    atlas_generation: u64,
    glyphs: HashMap<GlyphKey, PackedGlyph>,
    entries: HashMap<TextKey, CacheEntry>,
    arenas: [Vec<TextQuad>; 2],
    frame: u64,
    max_entries: usize,
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}

fn arena_slice(arenas: &[Vec<TextQuad>; 2], parity: u8, start: u32, len: u32) -> &[TextQuad] {
    arenas[(parity & 1) as usize]
        .get(start as usize..(start as usize + len as usize))
        .unwrap_or(&[])
}

impl<G: GlyphSource> FontCache<G> {
    /// Create a cache with default atlas size and entry cap.
    pub fn new(fonts: FontTable<G>) -> Self {
        Self::with_limits(fonts, DEFAULT_ATLAS_SIZE, DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache with an explicit initial atlas size and entry cap.
    pub fn with_limits(fonts: FontTable<G>, atlas_size: u32, max_entries: usize) -> Self {
        Self {
            fonts,
            atlas: Atlas::new(atlas_size),
            atlas_generation: 0,
            glyphs: HashMap::new(),
            entries: HashMap::new(),
            arenas: [Vec::new(), Vec::new()],
            frame: 0,
            max_entries,
        }
    }

    /// The glyph source registered for `style` (regular as fallback).
    pub fn font(&self, style: FontStyle) -> &G {
        self.fonts.get(style)
    }

    /// Vertical metrics for `style` at `px`.
    pub fn scaled_metrics(&self, style: FontStyle, px: f64) -> VMetrics {
        self.fonts.get(style).v_metrics(px)
    }

    /// The current glyph atlas.
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    /// Bumped every time the atlas is rebuilt; renderers re-upload on change.
    pub fn atlas_generation(&self) -> u64 {
        self.atlas_generation
    }

    /// Number of distinct glyphs packed in the atlas.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Number of live shaped-text cache entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// The frame index the cache is currently accumulating into.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Cache metadata for `text` at (`style`, `px`), if an entry is live.
    pub fn entry_info(&self, text: &str, style: FontStyle, px: f64) -> Option<EntryInfo> {
        let key = TextKey {
            hash: hash_text(text),
            style,
            px_bits: px.to_bits(),
        };
        self.entries.get(&key).map(|e| EntryInfo {
            first_frame: e.first_frame,
            last_frame: e.last_frame,
            permanent: matches!(e.storage, QuadStorage::Owned(_)),
        })
    }

    /// Tight bounding rect of `text` shaped at (`style`, `px`).
    ///
    /// Delegates to [`FontCache::build_text`]; the shaped quads are cached as
    /// a side effect, so a draw of the same string later in the frame is a
    /// cache hit.
    pub fn text_rect(&mut self, text: &str, style: FontStyle, px: f64) -> Rect {
        self.build_text(text, style, px).rect
    }

    /// Shape `text` at (`style`, `px`), returning a handle to cached quads.
    ///
    /// On a cache hit the entry's last-touched frame is refreshed and no
    /// shaping happens. On a miss the text is shaped into the current frame's
    /// arena; if the entry cap is reached the result is still valid but
    /// bypasses the cache entirely.
    pub fn build_text(&mut self, text: &str, style: FontStyle, px: f64) -> ShapedText {
        let key = TextKey {
            hash: hash_text(text),
            style,
            px_bits: px.to_bits(),
        };
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_frame = self.frame;
            return ShapedText {
                rect: entry.rect,
                source: TextSource::Cached(key),
            };
        }
        let (start, len, rect) = self.shape(text, style, px);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Frame parity is a single bit."
        )]
        let parity = (self.frame % 2) as u8;
        if self.entries.len() >= self.max_entries {
            return ShapedText {
                rect,
                source: TextSource::Uncached { parity, start, len },
            };
        }
        self.entries.insert(
            key,
            CacheEntry {
                storage: QuadStorage::Arena { parity, start, len },
                rect,
                first_frame: self.frame,
                last_frame: self.frame,
            },
        );
        ShapedText {
            rect,
            source: TextSource::Cached(key),
        }
    }

    /// Resolve a handle to its quad slice.
    pub fn quads(&self, shaped: &ShapedText) -> &[TextQuad] {
        match shaped.source {
            TextSource::Cached(key) => match self.entries.get(&key) {
                Some(entry) => match &entry.storage {
                    QuadStorage::Arena { parity, start, len } => {
                        arena_slice(&self.arenas, *parity, *start, *len)
                    }
                    QuadStorage::Owned(quads) => quads,
                },
                None => &[],
            },
            TextSource::Uncached { parity, start, len } => {
                arena_slice(&self.arenas, parity, start, len)
            }
        }
    }

    /// Advance the cache to `frame_idx`: free dead entries, promote reused
    /// ones, and reset the arena the new frame will write into.
    ///
    /// An entry untouched since the frame before last is freed. An entry
    /// touched in a frame later than its creation frame has proven reuse and
    /// its quads are copied out of the arena into durable storage before the
    /// arena flip can invalidate them. Call once per frame, before building.
    pub fn prune(&mut self, frame_idx: u64) {
        let mut freed = 0_usize;
        let mut promoted = 0_usize;
        let Self {
            entries, arenas, ..
        } = self;
        entries.retain(|_, entry| {
            if entry.last_frame + 1 < frame_idx {
                freed += 1;
                false
            } else {
                true
            }
        });
        for entry in entries.values_mut() {
            if entry.last_frame > entry.first_frame
                && let QuadStorage::Arena { parity, start, len } = entry.storage
            {
                let quads = arena_slice(arenas, parity, start, len)
                    .to_vec()
                    .into_boxed_slice();
                entry.storage = QuadStorage::Owned(quads);
                promoted += 1;
            }
        }
        arenas[(frame_idx % 2) as usize].clear();
        self.frame = frame_idx;
        if freed > 0 || promoted > 0 {
            tracing::debug!(frame = frame_idx, freed, promoted, "text cache pruned");
        }
    }

    /// Shape `text` into the active arena, returning (start, len, rect).
    fn shape(&mut self, text: &str, style: FontStyle, px: f64) -> (u32, u32, Rect) {
        let parity = (self.frame % 2) as usize;
        let start = self.arenas[parity].len();
        let metrics = self.fonts.get(style).v_metrics(px);
        let line_advance = metrics.line_advance();
        for (line_idx, line) in text.split('\n').enumerate() {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Line counts are far below f64 precision limits."
            )]
            let baseline = metrics.ascent + line_advance * line_idx as f64;
            let mut pen = 0.0_f64;
            let mut prev: Option<char> = None;
            for ch in line.chars() {
                if let Some(p) = prev {
                    pen += self.fonts.get(style).kern(p, ch, px);
                }
                if let Some(glyph) = self.packed(style, px, ch) {
                    let uv = self.atlas.uv(glyph.region);
                    let x = pen + glyph.bearing_x;
                    let y = baseline + glyph.bearing_y;
                    let rect =
                        Rect::new(x, y, x + f64::from(glyph.width), y + f64::from(glyph.height));
                    self.arenas[parity].push(TextQuad { rect, uv });
                }
                pen += self.fonts.get(style).advance(ch, px);
                prev = Some(ch);
            }
        }
        let rect = self.measure(text, style, px);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Arena quad counts fit 32 bits by construction."
        )]
        (
            start as u32,
            (self.arenas[parity].len() - start) as u32,
            rect,
        )
    }

    /// Tight extent of `text` without shaping quads.
    ///
    /// Multi-line width uses the longest-line-by-bytes heuristic: only the
    /// first, last, and byte-longest lines are actually measured. A long line
    /// of narrow glyphs can visually outmeasure a byte-shorter line of wide
    /// glyphs, so this can under- or over-estimate for highly variable glyph
    /// widths; the trade-off is accepted to avoid measuring every line.
    fn measure(&self, text: &str, style: FontStyle, px: f64) -> Rect {
        let source = self.fonts.get(style);
        let metrics = source.v_metrics(px);
        let mut line_count = 0_usize;
        let mut first = "";
        let mut last = "";
        let mut longest = "";
        for line in text.split('\n') {
            if line_count == 0 {
                first = line;
            }
            last = line;
            if line.len() > longest.len() {
                longest = line;
            }
            line_count += 1;
        }
        let width = [first, last, longest]
            .iter()
            .map(|line| line_width(source, line, px))
            .fold(0.0, f64::max);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Line counts are far below f64 precision limits."
        )]
        let height = line_count.max(1) as f64 * metrics.line_advance();
        Rect::new(0.0, 0.0, width, height)
    }

    /// Look up or rasterize-and-pack one glyph; `None` for inkless glyphs.
    fn packed(&mut self, style: FontStyle, px: f64, ch: char) -> Option<GlyphPlacement> {
        let key = GlyphKey {
            style,
            px_bits: px.to_bits(),
            ch,
        };
        if !self.glyphs.contains_key(&key) {
            let raster = self.fonts.get(style).rasterize(ch, px)?;
            if raster.width == 0 || raster.height == 0 {
                return None;
            }
            let region = loop {
                if let Some(region) = self.atlas.pack(raster.width, raster.height, &raster.coverage)
                {
                    break region;
                }
                if !self.grow_atlas() {
                    return None;
                }
            };
            self.glyphs.insert(
                key,
                PackedGlyph {
                    region,
                    bearing_x: raster.bearing_x,
                    bearing_y: raster.bearing_y,
                    width: raster.width,
                    height: raster.height,
                    coverage: raster.coverage,
                },
            );
        }
        let glyph = &self.glyphs[&key];
        Some(GlyphPlacement {
            region: glyph.region,
            bearing_x: glyph.bearing_x,
            bearing_y: glyph.bearing_y,
            width: glyph.width,
            height: glyph.height,
        })
    }

    /// Double the atlas and repack every cached glyph.
    ///
    /// Coordinates are not stable across resizes, so this is a full repack
    /// from the retained bitmaps, not an incremental move. Returns `false`
    /// once [`MAX_ATLAS_SIZE`] is reached.
    fn grow_atlas(&mut self) -> bool {
        let mut new_size = self.atlas.size() * 2;
        loop {
            if new_size > MAX_ATLAS_SIZE {
                tracing::warn!(size = new_size, "glyph atlas at size limit");
                return false;
            }
            let mut atlas = Atlas::new(new_size);
            let mut placements: Vec<(GlyphKey, AtlasRegion)> =
                Vec::with_capacity(self.glyphs.len());
            let mut all_fit = true;
            for (key, glyph) in &self.glyphs {
                match atlas.pack(glyph.width, glyph.height, &glyph.coverage) {
                    Some(region) => placements.push((*key, region)),
                    None => {
                        all_fit = false;
                        break;
                    }
                }
            }
            if all_fit {
                for (key, region) in placements {
                    self.glyphs
                        .get_mut(&key)
                        .expect("repacked glyph vanished")
                        .region = region;
                }
                self.atlas = atlas;
                self.atlas_generation += 1;
                tracing::debug!(size = new_size, "glyph atlas grown and repacked");
                return true;
            }
            new_size *= 2;
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct GlyphPlacement {
    region: AtlasRegion,
    bearing_x: f64,
    bearing_y: f64,
    width: u32,
    height: u32,
}

fn line_width<G: GlyphSource>(source: &G, line: &str, px: f64) -> f64 {
    let mut width = 0.0_f64;
    let mut prev: Option<char> = None;
    for ch in line.chars() {
        if let Some(p) = prev {
            width += source.kern(p, ch, px);
        }
        width += source.advance(ch, px);
        prev = Some(ch);
    }
    width
}
