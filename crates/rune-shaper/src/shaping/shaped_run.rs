use core::ops::Range;

use swash::GlyphId;

/// One glyph produced by a shaping backend, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph ID in the font.
    pub glyph_id: GlyphId,
    /// Horizontal advance.
    pub x_advance: f32,
    /// Vertical advance.
    pub y_advance: f32,
    /// X offset from the pen position.
    pub x_offset: f32,
    /// Y offset from the pen position (y grows downwards).
    pub y_offset: f32,
    /// Byte offset in the source text of the cluster this glyph belongs to.
    pub cluster: u32,
}

/// A run of text shaped with a single font.
///
/// Glyphs are in logical order with non-decreasing clusters, whatever the
/// run's direction; visual reordering happens when lines are assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRun {
    /// Byte range in source text.
    pub text_range: Range<usize>,
    /// Shaped glyphs.
    pub glyphs: Vec<ShapedGlyph>,
    /// BiDi embedding level.
    pub bidi_level: u8,
    /// Total advance width of the run in pixels.
    pub width: f32,
}

impl ShapedRun {
    pub fn new(text_range: Range<usize>, glyphs: Vec<ShapedGlyph>, bidi_level: u8) -> Self {
        let width = glyphs.iter().map(|g| g.x_advance).sum();
        Self {
            text_range,
            glyphs,
            bidi_level,
            width,
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.bidi_level % 2 == 1
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph indices where a new cluster starts, excluding 0, paired with
    /// the width of the glyphs before that index.
    pub fn cluster_boundaries(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        let mut width = 0.0;
        self.glyphs.windows(2).enumerate().filter_map(move |(i, pair)| {
            width += pair[0].x_advance;
            (pair[0].cluster != pair[1].cluster).then_some((i + 1, width))
        })
    }

    /// Split before glyph `index`, which must start a cluster. The text
    /// range is split at that cluster's byte offset.
    pub fn split_at(mut self, index: usize) -> (ShapedRun, ShapedRun) {
        let tail_glyphs = self.glyphs.split_off(index);
        let split = tail_glyphs
            .first()
            .map_or(self.text_range.end, |g| g.cluster as usize);
        let head = ShapedRun::new(self.text_range.start..split, self.glyphs, self.bidi_level);
        let tail = ShapedRun::new(split..self.text_range.end, tail_glyphs, self.bidi_level);
        (head, tail)
    }

    /// Append a run that directly follows this one in the text.
    pub fn extend(&mut self, other: ShapedRun) {
        debug_assert_eq!(self.text_range.end, other.text_range.start);
        self.text_range.end = other.text_range.end;
        self.width += other.width;
        self.glyphs.extend(other.glyphs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(cluster: u32, advance: f32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id: cluster as GlyphId + 1,
            x_advance: advance,
            y_advance: 0.0,
            x_offset: 0.0,
            y_offset: 0.0,
            cluster,
        }
    }

    #[test]
    fn width_is_sum_of_advances() {
        let run = ShapedRun::new(0..3, vec![glyph(0, 1.5), glyph(1, 2.0), glyph(2, 0.5)], 0);
        assert_eq!(run.width, 4.0);
    }

    #[test]
    fn boundaries_skip_glyphs_of_one_cluster() {
        // Cluster 1 has two glyphs (e.g. base + mark).
        let run = ShapedRun::new(
            0..4,
            vec![glyph(0, 1.0), glyph(1, 1.0), glyph(1, 0.0), glyph(3, 1.0)],
            0,
        );
        let bounds: Vec<_> = run.cluster_boundaries().collect();
        assert_eq!(bounds, vec![(1, 1.0), (3, 2.0)]);
    }

    #[test]
    fn split_divides_text_at_cluster() {
        let run = ShapedRun::new(0..3, vec![glyph(0, 1.0), glyph(1, 2.0), glyph(2, 3.0)], 1);
        let (head, tail) = run.split_at(2);
        assert_eq!(head.text_range, 0..2);
        assert_eq!(head.width, 3.0);
        assert_eq!(tail.text_range, 2..3);
        assert_eq!(tail.width, 3.0);
        assert_eq!(tail.bidi_level, 1);
    }

    #[test]
    fn extend_joins_adjacent_runs() {
        let mut a = ShapedRun::new(0..1, vec![glyph(0, 1.0)], 0);
        a.extend(ShapedRun::new(1..2, vec![glyph(1, 2.0)], 0));
        assert_eq!(a.text_range, 0..2);
        assert_eq!(a.width, 3.0);
        assert_eq!(a.len(), 2);
    }
}
