//! The portable layout passes behind each strategy.

use std::collections::VecDeque;

use unicode_bidi::Level;

use super::breaks::{LineBreaks, split_run};
use super::line::{LineEmitter, LineItem, PendingLine, is_space};
use crate::Result;
use crate::error::{ConfigError, Stream};
use crate::intersect::{IntersectedRun, RunIntersector, intersect_all};
use crate::runs::{ClassifiedRun, RunStreams, default_language};
use crate::shaping::{ShapingBackend, ShapingOptions};

/// One shape call's inputs, shared by the passes.
pub(crate) struct Pass<'a, B: ShapingBackend> {
    pub backend: &'a B,
    pub text: &'a str,
    pub options: &'a ShapingOptions,
}

impl<'a, B: ShapingBackend> Pass<'a, B> {
    fn shape_item(&self, run: IntersectedRun<B::Font>, hard_break: bool) -> Result<LineItem<B::Font>> {
        let slice = self
            .text
            .get(run.range.clone())
            .ok_or_else(|| ConfigError::Misaligned(run.range.clone()))?;
        let shaped = self.backend.shape_run(slice, &run, self.options)?;
        let metrics = self.backend.metrics(&run.font);
        Ok(LineItem {
            class: run,
            shaped,
            metrics,
            hard_break,
        })
    }

    /// Shape the whole text as one run with the first value of each
    /// stream, on one line, in logical run order.
    pub fn primitive(
        &self,
        streams: RunStreams<'_, B::Font>,
        emitter: &mut LineEmitter<'_, B::Font>,
    ) -> Result<()> {
        let RunStreams {
            mut fonts,
            mut bidi,
            mut scripts,
            languages,
        } = streams;
        let font = first_value(fonts.next(), Stream::Font)?;
        let bidi_level = first_value(bidi.next(), Stream::Bidi)?;
        let script = first_value(scripts.next(), Stream::Script)?;
        let language = match languages {
            Some(mut languages) => first_value(languages.next(), Stream::Language)?,
            None => default_language().clone(),
        };
        if Level::new(bidi_level).is_err() {
            return Err(ConfigError::InvalidBidiLevel(bidi_level).into());
        }

        let run = IntersectedRun {
            range: 0..self.text.len(),
            font,
            bidi_level,
            script,
            language,
        };
        let item = self.shape_item(run, false)?;
        emitter.emit(vec![item], false)
    }

    /// Shape every intersected run and emit them all on one line, in
    /// logical order.
    pub fn no_wrap(
        &self,
        streams: RunStreams<'_, B::Font>,
        emitter: &mut LineEmitter<'_, B::Font>,
    ) -> Result<()> {
        let mut items = Vec::new();
        for run in RunIntersector::new(self.text.len(), streams) {
            items.push(self.shape_item(run?, false)?);
        }
        emitter.emit(items, false)
    }

    /// Break before shaping: runs are cut at break opportunities, each
    /// piece is shaped once and pieces are packed greedily.
    pub fn shaper_driven(
        &self,
        streams: RunStreams<'_, B::Font>,
        width: f32,
        emitter: &mut LineEmitter<'_, B::Font>,
    ) -> Result<()> {
        let breaks = LineBreaks::new(self.text);
        let soft = width.is_finite();
        let mut line = PendingLine::new();
        let mut queue = VecDeque::new();

        for run in RunIntersector::new(self.text.len(), streams) {
            for segment in split_run(run?, &breaks, soft) {
                queue.push_back(self.shape_item(segment.run, segment.hard_break)?);
                while let Some(item) = queue.pop_front() {
                    if line.fits(&item, width, self.text) {
                        let hard_break = item.hard_break;
                        line.push_merged(item);
                        if hard_break {
                            emitter.emit(line.take(), true)?;
                        }
                    } else if !line.is_empty() {
                        close_line(&mut line, item, &breaks, &mut queue);
                        emitter.emit(line.take(), true)?;
                    } else if let Some(index) = cluster_split(&item, width, self.text) {
                        // Alone on its line and still too wide: cut between clusters.
                        let (head, tail) = item.split_at(index);
                        line.push_merged(head);
                        emitter.emit(line.take(), true)?;
                        queue.push_front(tail);
                    } else {
                        let hard_break = item.hard_break;
                        line.push_merged(item);
                        if hard_break {
                            emitter.emit(line.take(), true)?;
                        }
                    }
                }
            }
        }
        emitter.emit(line.take(), true)
    }

    /// Shape every run first, then split shaped runs where lines overflow.
    pub fn shape_then_wrap(
        &self,
        streams: RunStreams<'_, B::Font>,
        width: f32,
        emitter: &mut LineEmitter<'_, B::Font>,
    ) -> Result<()> {
        let breaks = LineBreaks::new(self.text);
        let mut queue = VecDeque::new();
        for run in intersect_all(self.text.len(), streams)? {
            for segment in split_run(run, &breaks, false) {
                queue.push_back(self.shape_item(segment.run, segment.hard_break)?);
            }
        }

        let mut line = PendingLine::new();
        while let Some(item) = queue.pop_front() {
            if line.fits(&item, width, self.text) {
                let hard_break = item.hard_break;
                line.push(item);
                if hard_break {
                    emitter.emit(line.take(), true)?;
                }
                continue;
            }

            let room = width - line.width();
            if let Some(index) = break_split(&item, room, &breaks, self.text) {
                let (head, tail) = item.split_at(index);
                line.push(head);
                queue.push_front(tail);
            } else if !line.is_empty() {
                close_line(&mut line, item, &breaks, &mut queue);
            } else if let Some(index) = cluster_split(&item, width, self.text) {
                let (head, tail) = item.split_at(index);
                line.push(head);
                queue.push_front(tail);
            } else {
                line.push(item);
            }
            emitter.emit(line.take(), true)?;
        }
        emitter.emit(line.take(), true)
    }
}

/// `item` does not fit on `line`: requeue it, and when it starts inside
/// a word move the line's end back to its last break opportunity.
fn close_line<F: Clone + PartialEq>(
    line: &mut PendingLine<F>,
    item: LineItem<F>,
    breaks: &LineBreaks,
    queue: &mut VecDeque<LineItem<F>>,
) {
    let mid_word = breaks.kind_at(item.class.range.start).is_none();
    queue.push_front(item);
    if mid_word && let Some(carried) = line.split_at_last_break(breaks) {
        for tail in carried.into_iter().rev() {
            queue.push_front(tail);
        }
    }
}

fn first_value<T>(run: Option<ClassifiedRun<T>>, stream: Stream) -> Result<T> {
    let run = run.ok_or(ConfigError::Exhausted { stream, at: 0 })?;
    if run.range.start != 0 {
        return Err(ConfigError::Gap {
            stream,
            expected: 0,
            found: run.range.start,
        }
        .into());
    }
    Ok(run.value)
}

/// Cluster boundaries of `item` with the width before each one, leaving
/// out whitespace that would hang at the end of the line.
fn boundaries<'t, F>(
    item: &'t LineItem<F>,
    text: &'t str,
) -> impl Iterator<Item = (usize, f32)> + 't {
    let glyphs = &item.shaped.glyphs;
    let mut width = 0.0;
    let mut hang = 0.0;
    glyphs.windows(2).enumerate().filter_map(move |(i, pair)| {
        width += pair[0].x_advance;
        if is_space(text, pair[0].cluster) {
            hang += pair[0].x_advance;
        } else {
            hang = 0.0;
        }
        (pair[0].cluster != pair[1].cluster).then_some((i + 1, width - hang))
    })
}

/// Last cluster boundary that is also a break opportunity and keeps the
/// head within `room`.
fn break_split<F>(
    item: &LineItem<F>,
    room: f32,
    breaks: &LineBreaks,
    text: &str,
) -> Option<usize> {
    let glyphs = &item.shaped.glyphs;
    boundaries(item, text)
        .take_while(|&(_, head)| head <= room)
        .filter(|&(index, _)| breaks.kind_at(glyphs[index].cluster as usize).is_some())
        .last()
        .map(|(index, _)| index)
}

/// Last cluster boundary keeping the head within `width`, or the first
/// boundary when even one cluster does not fit.
fn cluster_split<F>(item: &LineItem<F>, width: f32, text: &str) -> Option<usize> {
    boundaries(item, text)
        .take_while(|&(_, head)| head <= width)
        .last()
        .or_else(|| item.shaped.cluster_boundaries().next())
        .map(|(index, _)| index)
}
