use tracing::trace;
use unicode_bidi::{BidiInfo, Level};

use super::breaks::LineBreaks;
use crate::Result;
use crate::error::ConfigError;
use crate::font::ScaledFontMetrics;
use crate::handler::{LineInfo, Point, PositionedGlyph, PositionedRun, RunHandler};
use crate::intersect::IntersectedRun;
use crate::shaping::ShapedRun;

/// A shaped run waiting to be placed on a line.
#[derive(Debug, Clone)]
pub(crate) struct LineItem<F> {
    pub class: IntersectedRun<F>,
    pub shaped: ShapedRun,
    pub metrics: ScaledFontMetrics,
    /// A mandatory break follows this item.
    pub hard_break: bool,
}

impl<F: Clone> LineItem<F> {
    pub fn width(&self) -> f32 {
        self.shaped.width
    }

    /// Split before glyph `index`, see [`ShapedRun::split_at`].
    pub fn split_at(self, index: usize) -> (LineItem<F>, LineItem<F>) {
        let (head, tail) = self.shaped.split_at(index);
        let head = LineItem {
            class: IntersectedRun {
                range: head.text_range.clone(),
                ..self.class.clone()
            },
            shaped: head,
            metrics: self.metrics,
            hard_break: false,
        };
        let tail = LineItem {
            class: IntersectedRun {
                range: tail.text_range.clone(),
                ..self.class
            },
            shaped: tail,
            metrics: self.metrics,
            hard_break: self.hard_break,
        };
        (head, tail)
    }

    /// Whether `next` can be folded into this item: same classification and
    /// directly following it in the text.
    pub fn can_merge(&self, next: &LineItem<F>) -> bool
    where
        F: PartialEq,
    {
        self.class.same_class(&next.class) && self.shaped.text_range.end == next.shaped.text_range.start
    }

    pub fn merge(&mut self, next: LineItem<F>) {
        self.class.range.end = next.class.range.end;
        self.shaped.extend(next.shaped);
        self.hard_break = next.hard_break;
    }

    /// Advance of the whitespace glyphs ending this item. It may hang past
    /// the line's width.
    pub fn hanging_width(&self, text: &str) -> f32 {
        self.shaped
            .glyphs
            .iter()
            .rev()
            .take_while(|glyph| is_space(text, glyph.cluster))
            .map(|glyph| glyph.x_advance)
            .sum()
    }

    pub fn is_blank(&self, text: &str) -> bool {
        self.shaped.glyphs.iter().all(|glyph| is_space(text, glyph.cluster))
    }

    /// Last glyph index inside this item that starts at a break opportunity.
    fn last_break(&self, breaks: &LineBreaks) -> Option<usize> {
        let glyphs = &self.shaped.glyphs;
        self.shaped
            .cluster_boundaries()
            .map(|(index, _)| index)
            .filter(|&index| breaks.kind_at(glyphs[index].cluster as usize).is_some())
            .last()
    }
}

/// Whether the cluster at byte `offset` of `text` starts with whitespace.
pub(crate) fn is_space(text: &str, offset: u32) -> bool {
    text.get(offset as usize..)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

/// Runs of the line being filled, in logical order.
#[derive(Debug)]
pub(crate) struct PendingLine<F> {
    items: Vec<LineItem<F>>,
    width: f32,
}

impl<F: Clone + PartialEq> PendingLine<F> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            width: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn push(&mut self, item: LineItem<F>) {
        self.width += item.width();
        self.items.push(item);
    }

    /// Push, folding into the last item when the classification matches.
    pub fn push_merged(&mut self, item: LineItem<F>) {
        self.width += item.width();
        match self.items.last_mut() {
            Some(last) if last.can_merge(&item) => last.merge(item),
            _ => self.items.push(item),
        }
    }

    /// Whether `item` fits after the current content within `width`.
    /// Trailing whitespace of the result is not counted.
    pub fn fits(&self, item: &LineItem<F>, width: f32, text: &str) -> bool {
        let hang = if item.is_blank(text) {
            item.width() + self.hanging_width(text)
        } else {
            item.hanging_width(text)
        };
        self.width + item.width() - hang <= width
    }

    fn hanging_width(&self, text: &str) -> f32 {
        let mut hang = 0.0;
        for item in self.items.iter().rev() {
            hang += item.hanging_width(text);
            if !item.is_blank(text) {
                break;
            }
        }
        hang
    }

    /// Cut the line at its last break opportunity and return what follows
    /// it, in logical order. The start of the first item does not count.
    /// `None` leaves the line untouched.
    pub fn split_at_last_break(&mut self, breaks: &LineBreaks) -> Option<Vec<LineItem<F>>> {
        let (k, index) = self.items.iter().enumerate().rev().find_map(|(k, item)| {
            match item.last_break(breaks) {
                Some(index) => Some((k, Some(index))),
                None if k > 0 && breaks.kind_at(item.class.range.start).is_some() => {
                    Some((k, None))
                }
                None => None,
            }
        })?;

        let mut carried = self.items.split_off(k);
        if let Some(index) = index {
            let (head, tail) = carried.remove(0).split_at(index);
            self.items.push(head);
            carried.insert(0, tail);
        }
        self.width = self.items.iter().map(LineItem::width).sum();
        Some(carried)
    }

    pub fn take(&mut self) -> Vec<LineItem<F>> {
        self.width = 0.0;
        std::mem::take(&mut self.items)
    }
}

/// Places finished lines and forwards them to the run handler.
///
/// Tracks the vertical position: each line starts where the previous one
/// ended, its baseline sits at `top + max ascent`.
pub(crate) struct LineEmitter<'h, F> {
    handler: &'h mut dyn RunHandler<F>,
    line_index: usize,
    top: f32,
    round: bool,
}

impl<'h, F: Clone> LineEmitter<'h, F> {
    pub fn new(handler: &'h mut dyn RunHandler<F>, round: bool) -> Self {
        Self {
            handler,
            line_index: 0,
            top: 0.0,
            round,
        }
    }

    /// Emit one line. Lines with no items are skipped.
    ///
    /// With `reorder`, runs are put in visual order with the UAX #9 L2 rule
    /// over their levels. Glyphs of odd-level runs are always emitted
    /// right to left.
    pub fn emit(&mut self, items: Vec<LineItem<F>>, reorder: bool) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let items = if reorder { visual_order(items)? } else { items };

        let ascent = items.iter().map(|i| i.metrics.ascent).fold(0.0, f32::max);
        let descent = items.iter().map(|i| i.metrics.descent).fold(0.0, f32::max);
        let baseline = self.round_value(self.top + ascent);

        self.handler.begin_line(self.line_index);
        let mut x = 0.0;
        for item in items {
            let run = self.position(item, x, baseline);
            x += run.advance;
            self.handler.run(run);
        }

        let line = LineInfo {
            index: self.line_index,
            top: self.top,
            baseline,
            width: x,
            ascent,
            descent,
        };
        trace!(index = line.index, width = line.width, baseline, "line committed");
        self.handler.commit_line(&line);

        self.top += ascent + descent;
        self.line_index += 1;
        Ok(())
    }

    fn position(&self, item: LineItem<F>, x: f32, baseline: f32) -> PositionedRun<F> {
        let LineItem { class, shaped, .. } = item;
        let rtl = shaped.is_rtl();
        let mut glyphs = shaped.glyphs;
        if rtl {
            glyphs.reverse();
        }

        let mut pen = x;
        let positioned = glyphs
            .iter()
            .map(|glyph| {
                let position = Point::new(
                    self.round_value(pen + glyph.x_offset),
                    self.round_value(baseline + glyph.y_offset),
                );
                pen += glyph.x_advance;
                PositionedGlyph {
                    glyph_id: glyph.glyph_id,
                    position,
                    x_advance: glyph.x_advance,
                    cluster: glyph.cluster,
                }
            })
            .collect();

        PositionedRun {
            font: class.font,
            text_range: shaped.text_range,
            bidi_level: class.bidi_level,
            script: class.script,
            language: class.language,
            line_index: self.line_index,
            origin: Point::new(self.round_value(x), baseline),
            glyphs: positioned,
            advance: shaped.width,
        }
    }

    fn round_value(&self, v: f32) -> f32 {
        if self.round { v.round() } else { v }
    }
}

/// Reorder a line's items from logical to visual order.
fn visual_order<F>(items: Vec<LineItem<F>>) -> Result<Vec<LineItem<F>>> {
    if items.iter().all(|item| item.class.bidi_level == 0) {
        return Ok(items);
    }
    let levels = items
        .iter()
        .map(|item| {
            Level::new(item.class.bidi_level)
                .map_err(|_| ConfigError::InvalidBidiLevel(item.class.bidi_level))
        })
        .collect::<core::result::Result<Vec<_>, _>>()?;
    let order = BidiInfo::reorder_visual(&levels);

    let mut slots: Vec<Option<LineItem<F>>> = items.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|logical| slots[logical].take())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::CollectingHandler;
    use crate::runs::LanguageTag;
    use crate::shaping::ShapedGlyph;
    use unicode_script::Script;

    fn metrics(ascent: f32, descent: f32) -> ScaledFontMetrics {
        ScaledFontMetrics {
            ascent,
            descent,
            line_gap: 0.0,
            font_size: 10.0,
        }
    }

    /// One glyph per byte, advance 1, glyph id = byte offset + 1.
    fn item(range: core::ops::Range<usize>, level: u8) -> LineItem<u8> {
        let glyphs = range
            .clone()
            .map(|i| ShapedGlyph {
                glyph_id: i as u16 + 1,
                x_advance: 1.0,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
                cluster: i as u32,
            })
            .collect();
        LineItem {
            class: IntersectedRun {
                range: range.clone(),
                font: 0,
                bidi_level: level,
                script: Script::Latin,
                language: LanguageTag::new("en"),
            },
            shaped: ShapedRun::new(range, glyphs, level),
            metrics: metrics(8.0, 2.0),
            hard_break: false,
        }
    }

    #[test]
    fn rtl_runs_swap_and_reverse() {
        let mut handler = CollectingHandler::new();
        let mut emitter = LineEmitter::new(&mut handler, false);
        emitter
            .emit(vec![item(0..2, 0), item(2..4, 1), item(4..6, 1), item(6..8, 0)], true)
            .unwrap();
        let ranges: Vec<_> = handler.runs.iter().map(|r| r.text_range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 4..6, 2..4, 6..8]);
        let ids: Vec<_> = handler.runs[1].glyph_ids().collect();
        assert_eq!(ids, vec![6, 5]);
        let xs: Vec<_> = handler.runs.iter().map(|r| r.origin.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn without_reorder_runs_stay_logical() {
        let mut handler = CollectingHandler::new();
        let mut emitter = LineEmitter::new(&mut handler, false);
        emitter.emit(vec![item(0..2, 1), item(2..4, 1)], false).unwrap();
        let ranges: Vec<_> = handler.runs.iter().map(|r| r.text_range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..4]);
    }

    #[test]
    fn lines_stack_by_height() {
        let mut handler = CollectingHandler::new();
        let mut emitter = LineEmitter::new(&mut handler, false);
        let mut tall = item(2..3, 0);
        tall.metrics = metrics(12.0, 4.0);
        emitter.emit(vec![item(0..2, 0), tall], true).unwrap();
        emitter.emit(vec![item(3..4, 0)], true).unwrap();
        emitter.emit(Vec::new(), true).unwrap();
        assert_eq!(handler.lines.len(), 2);

        assert_eq!(handler.lines[0].baseline, 12.0);
        assert_eq!(handler.lines[0].height(), 16.0);
        assert_eq!(handler.lines[1].top, 16.0);
        assert_eq!(handler.lines[1].baseline, 24.0);
        assert_eq!(handler.runs[2].line_index, 1);
    }

    #[test]
    fn rounding_snaps_positions() {
        let mut handler = CollectingHandler::new();
        let mut emitter = LineEmitter::new(&mut handler, true);
        let mut run = item(0..2, 0);
        run.shaped.glyphs[0].x_advance = 0.6;
        run.shaped.glyphs[1].y_offset = 0.4;
        run.shaped.width = 1.6;
        emitter.emit(vec![run], true).unwrap();
        let positions: Vec<_> = handler.runs[0].glyphs.iter().map(|g| g.position).collect();
        assert_eq!(positions, vec![Point::new(0.0, 8.0), Point::new(1.0, 8.0)]);
    }

    #[test]
    fn merge_requires_adjacency_and_class() {
        let a = item(0..2, 0);
        assert!(a.can_merge(&item(2..4, 0)));
        assert!(!a.can_merge(&item(2..4, 1)));
        assert!(!a.can_merge(&item(3..4, 0)));

        let mut line = PendingLine::new();
        line.push_merged(item(0..2, 0));
        line.push_merged(item(2..4, 0));
        assert_eq!(line.width(), 4.0);
        let items = line.take();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].class.range, 0..4);
        assert!(line.is_empty());
    }

    #[test]
    fn trailing_space_hangs_when_fitting() {
        let text = "ab  cd";
        let mut line = PendingLine::new();
        assert!(line.fits(&item(0..3, 0), 2.0, text));
        assert!(!line.fits(&item(0..3, 0), 1.0, text));

        line.push(item(0..3, 0));
        assert!(line.fits(&item(3..4, 0), 2.0, text));
        assert!(!line.fits(&item(4..6, 0), 4.0, text));
        assert!(line.fits(&item(4..6, 0), 5.0, text));
    }

    #[test]
    fn line_retreats_to_last_break() {
        let text = "ab cdef";
        let breaks = LineBreaks::new(text);
        let mut line = PendingLine::new();
        line.push(item(0..5, 0));
        line.push(item(5..6, 1));

        let carried = line.split_at_last_break(&breaks).unwrap();
        let ranges: Vec<_> = carried.iter().map(|i| i.class.range.clone()).collect();
        assert_eq!(ranges, vec![3..5, 5..6]);
        assert_eq!(line.width(), 3.0);
        let items = line.take();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].class.range, 0..3);
    }

    #[test]
    fn line_without_inner_break_is_kept() {
        let text = "abcdef";
        let breaks = LineBreaks::new(text);
        let mut line = PendingLine::new();
        line.push(item(0..4, 0));
        line.push(item(4..6, 1));
        assert!(line.split_at_last_break(&breaks).is_none());
        assert_eq!(line.width(), 6.0);
    }
}
