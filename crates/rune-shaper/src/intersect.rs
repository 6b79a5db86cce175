//! Merging of the four classification streams into intersected runs.
//!
//! Each stream keeps a cursor on its current run. The next output boundary
//! is the smallest current end; every cursor whose run ends there advances.
//! Ranges are half-open in all streams, so a boundary shared by several
//! streams belongs to the runs that start there.

use core::ops::Range;

use unicode_bidi::Level;
use unicode_script::Script;

use crate::error::{ConfigError, Stream};
use crate::Result;
use crate::runs::{
    ClassifiedRun, LanguageRun, LanguageTag, RunStreams, TrivialLanguageRuns, default_language,
};

/// Maximal range over which font, bidi level, script and language are all
/// constant.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectedRun<F> {
    pub range: Range<usize>,
    pub font: F,
    pub bidi_level: u8,
    pub script: Script,
    pub language: LanguageTag,
}

impl<F> IntersectedRun<F> {
    pub fn is_rtl(&self) -> bool {
        self.bidi_level % 2 == 1
    }

    /// Same classification values, ignoring the range.
    pub fn same_class(&self, other: &Self) -> bool
    where
        F: PartialEq,
    {
        self.font == other.font
            && self.bidi_level == other.bidi_level
            && self.script == other.script
            && self.language == other.language
    }
}

/// Cursor over one stream, validating that it partitions `0..len`.
struct RunCursor<'a, T> {
    stream: Stream,
    iter: Box<dyn Iterator<Item = ClassifiedRun<T>> + 'a>,
    current: Option<ClassifiedRun<T>>,
    len: usize,
}

impl<'a, T> RunCursor<'a, T> {
    fn new(stream: Stream, iter: Box<dyn Iterator<Item = ClassifiedRun<T>> + 'a>, len: usize) -> Self {
        Self {
            stream,
            iter,
            current: None,
            len,
        }
    }

    /// Pull the run starting at `at`.
    fn advance(&mut self, at: usize) -> Result<()> {
        let stream = self.stream;
        let run = self
            .iter
            .next()
            .ok_or(ConfigError::Exhausted { stream, at })?;
        if run.range.start != at {
            return Err(ConfigError::Gap {
                stream,
                expected: at,
                found: run.range.start,
            }
            .into());
        }
        if run.range.end <= run.range.start {
            return Err(ConfigError::EmptyRun { stream, at }.into());
        }
        if run.range.end > self.len {
            return Err(ConfigError::PastEnd {
                stream,
                end: run.range.end,
                len: self.len,
            }
            .into());
        }
        self.current = Some(run);
        Ok(())
    }

    fn end(&self) -> usize {
        self.current.as_ref().map_or(self.len, |run| run.range.end)
    }

    fn value(&self) -> Option<&T> {
        self.current.as_ref().map(|run| &run.value)
    }
}

/// Lazy sequence of [`IntersectedRun`]s in logical order.
///
/// Yields an error and then stops if any stream fails to partition the
/// text.
pub struct RunIntersector<'a, F> {
    fonts: RunCursor<'a, F>,
    bidi: RunCursor<'a, u8>,
    scripts: RunCursor<'a, Script>,
    languages: RunCursor<'a, LanguageTag>,
    pos: usize,
    len: usize,
    failed: bool,
}

impl<'a, F: Clone> RunIntersector<'a, F> {
    pub fn new(text_len: usize, streams: RunStreams<'a, F>) -> Self {
        let languages: Box<dyn Iterator<Item = LanguageRun> + 'a> = match streams.languages {
            Some(languages) => languages,
            None => Box::new(TrivialLanguageRuns::new(
                text_len,
                default_language().clone(),
            )),
        };
        Self {
            fonts: RunCursor::new(Stream::Font, streams.fonts, text_len),
            bidi: RunCursor::new(Stream::Bidi, streams.bidi, text_len),
            scripts: RunCursor::new(Stream::Script, streams.scripts, text_len),
            languages: RunCursor::new(Stream::Language, languages, text_len),
            pos: 0,
            len: text_len,
            failed: false,
        }
    }

    fn step(&mut self) -> Result<IntersectedRun<F>> {
        let pos = self.pos;
        if pos == 0 {
            self.fonts.advance(0)?;
            self.bidi.advance(0)?;
            self.scripts.advance(0)?;
            self.languages.advance(0)?;
        } else {
            if self.fonts.end() == pos {
                self.fonts.advance(pos)?;
            }
            if self.bidi.end() == pos {
                self.bidi.advance(pos)?;
            }
            if self.scripts.end() == pos {
                self.scripts.advance(pos)?;
            }
            if self.languages.end() == pos {
                self.languages.advance(pos)?;
            }
        }

        let boundary = self
            .fonts
            .end()
            .min(self.bidi.end())
            .min(self.scripts.end())
            .min(self.languages.end());

        let level = *self.bidi.value().ok_or(ConfigError::Exhausted {
            stream: Stream::Bidi,
            at: pos,
        })?;
        if Level::new(level).is_err() {
            return Err(ConfigError::InvalidBidiLevel(level).into());
        }
        let run = IntersectedRun {
            range: pos..boundary,
            font: self.fonts.value().cloned().ok_or(ConfigError::Exhausted {
                stream: Stream::Font,
                at: pos,
            })?,
            bidi_level: level,
            script: *self.scripts.value().ok_or(ConfigError::Exhausted {
                stream: Stream::Script,
                at: pos,
            })?,
            language: self.languages.value().cloned().ok_or(ConfigError::Exhausted {
                stream: Stream::Language,
                at: pos,
            })?,
        };
        self.pos = boundary;
        Ok(run)
    }
}

impl<F: Clone> Iterator for RunIntersector<'_, F> {
    type Item = Result<IntersectedRun<F>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.len {
            return None;
        }
        let result = self.step();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Collect all intersected runs, failing on the first stream error.
pub fn intersect_all<'a, F: Clone>(
    text_len: usize,
    streams: RunStreams<'a, F>,
) -> Result<Vec<IntersectedRun<F>>> {
    RunIntersector::new(text_len, streams).collect()
}
