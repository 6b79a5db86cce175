use unicode_bidi::{BidiInfo, LTR_LEVEL, Level, RTL_LEVEL};

use super::BidiRun;

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDirection {
    /// Detect paragraph base direction from text (first strong char).
    Auto,
    /// Force overall left-to-right base direction.
    Ltr,
    /// Force overall right-to-left base direction.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }
}

/// Bidi level stream computed with the Unicode Bidirectional Algorithm
/// (UAX #9) via `unicode-bidi`.
///
/// Levels are resolved once for the whole text; runs of equal level are
/// produced on demand.
#[derive(Debug, Clone)]
pub struct UnicodeBidiRuns {
    /// Resolved level for each byte of the text.
    levels: Vec<u8>,
    pos: usize,
}

impl UnicodeBidiRuns {
    pub fn new(text: &str, base_dir: BaseDirection) -> Self {
        let levels = if text.is_empty() {
            Vec::new()
        } else {
            let info = BidiInfo::new(text, base_dir.to_level());
            info.levels.iter().map(|level| level.number()).collect()
        };
        Self { levels, pos: 0 }
    }
}

impl Iterator for UnicodeBidiRuns {
    type Item = BidiRun;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let level = *self.levels.get(start)?;
        let len = self.levels[start..]
            .iter()
            .take_while(|&&l| l == level)
            .count();
        self.pos = start + len;
        Some(BidiRun::new(start..self.pos, level))
    }
}
