//! Classification streams consumed by the run intersector.
//!
//! Each stream is a lazy, single-pass sequence of [`ClassifiedRun`]s that
//! partitions the text (UTF-8 byte offsets) in increasing order. The
//! default sources here derive their classifications from the text itself;
//! callers holding their own classifications can feed any iterator, or a
//! [`ListRuns`].

pub mod bidi;
pub mod font;
pub mod language;
pub mod script;

use core::ops::Range;

use unicode_script::Script;

pub use bidi::{BaseDirection, UnicodeBidiRuns};
pub use font::{FontFallbackRuns, FontProvider};
pub use language::{LanguageTag, TrivialLanguageRuns, default_language};
pub use script::UnicodeScriptRuns;

/// A contiguous byte range of the text carrying one classification value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRun<T> {
    /// Half-open byte range in the source text.
    pub range: Range<usize>,
    pub value: T,
}

impl<T> ClassifiedRun<T> {
    pub fn new(range: Range<usize>, value: T) -> Self {
        Self { range, value }
    }
}

/// Font assigned to a range.
pub type FontRun<F> = ClassifiedRun<F>;
/// Bidi embedding level of a range.
pub type BidiRun = ClassifiedRun<u8>;
/// Unicode script of a range.
pub type ScriptRun = ClassifiedRun<Script>;
/// Language of a range.
pub type LanguageRun = ClassifiedRun<LanguageTag>;

/// Stream backed by an explicit list of runs.
#[derive(Debug, Clone)]
pub struct ListRuns<T> {
    runs: std::vec::IntoIter<ClassifiedRun<T>>,
}

impl<T> ListRuns<T> {
    pub fn new(runs: Vec<ClassifiedRun<T>>) -> Self {
        Self {
            runs: runs.into_iter(),
        }
    }

    /// Build contiguous runs from `(byte length, value)` pairs starting at 0.
    pub fn from_lengths(lengths: impl IntoIterator<Item = (usize, T)>) -> Self {
        let mut start = 0;
        let runs = lengths
            .into_iter()
            .map(|(len, value)| {
                let run = ClassifiedRun::new(start..start + len, value);
                start += len;
                run
            })
            .collect();
        Self::new(runs)
    }

    /// One run covering `0..len`, or nothing for empty text.
    pub fn single(len: usize, value: T) -> Self {
        if len == 0 {
            Self::new(Vec::new())
        } else {
            Self::new(vec![ClassifiedRun::new(0..len, value)])
        }
    }
}

impl<T> Iterator for ListRuns<T> {
    type Item = ClassifiedRun<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.runs.next()
    }
}

/// The classification streams handed to one shape call.
///
/// The language stream is optional; when absent the whole text is tagged
/// with [`default_language`].
pub struct RunStreams<'a, F> {
    pub(crate) fonts: Box<dyn Iterator<Item = FontRun<F>> + 'a>,
    pub(crate) bidi: Box<dyn Iterator<Item = BidiRun> + 'a>,
    pub(crate) scripts: Box<dyn Iterator<Item = ScriptRun> + 'a>,
    pub(crate) languages: Option<Box<dyn Iterator<Item = LanguageRun> + 'a>>,
}

impl<'a, F: 'a> RunStreams<'a, F> {
    pub fn new<FI, BI, SI>(fonts: FI, bidi: BI, scripts: SI) -> Self
    where
        FI: IntoIterator<Item = FontRun<F>>,
        FI::IntoIter: 'a,
        BI: IntoIterator<Item = BidiRun>,
        BI::IntoIter: 'a,
        SI: IntoIterator<Item = ScriptRun>,
        SI::IntoIter: 'a,
    {
        Self {
            fonts: Box::new(fonts.into_iter()),
            bidi: Box::new(bidi.into_iter()),
            scripts: Box::new(scripts.into_iter()),
            languages: None,
        }
    }

    pub fn with_languages<LI>(mut self, languages: LI) -> Self
    where
        LI: IntoIterator<Item = LanguageRun>,
        LI::IntoIter: 'a,
    {
        self.languages = Some(Box::new(languages.into_iter()));
        self
    }

    /// Uniform streams: one font, level, script and language for `0..len`.
    pub fn uniform(len: usize, font: F, level: u8, script: Script, language: LanguageTag) -> Self {
        Self::new(
            ListRuns::single(len, font),
            ListRuns::single(len, level),
            ListRuns::single(len, script),
        )
        .with_languages(ListRuns::single(len, language))
    }
}
