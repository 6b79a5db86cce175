use core::ops::Range;

use unicode_linebreak::{BreakOpportunity, linebreaks};

use crate::intersect::IntersectedRun;

/// Kind of line break at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakKind {
    /// Required line break (e.g., explicit newline).
    Mandatory,
    /// Optional line break opportunity.
    Opportunity,
}

/// A line break opportunity in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// Byte offset *after* the break.
    pub offset: usize,
    /// Break kind (mandatory vs optional).
    pub kind: LineBreakKind,
}

/// UAX #14 break opportunities of a text, via `unicode-linebreak`.
///
/// The implicit mandatory break at the end of the text is not included.
#[derive(Debug, Clone, Default)]
pub struct LineBreaks {
    breaks: Vec<LineBreak>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let breaks = linebreaks(text)
            .filter(|&(offset, _)| offset < text.len())
            .map(|(offset, opp)| LineBreak {
                offset,
                kind: match opp {
                    BreakOpportunity::Mandatory => LineBreakKind::Mandatory,
                    BreakOpportunity::Allowed => LineBreakKind::Opportunity,
                },
            })
            .collect();
        Self { breaks }
    }

    pub fn kind_at(&self, offset: usize) -> Option<LineBreakKind> {
        self.breaks
            .binary_search_by_key(&offset, |b| b.offset)
            .ok()
            .map(|i| self.breaks[i].kind)
    }

    pub fn is_mandatory(&self, offset: usize) -> bool {
        self.kind_at(offset) == Some(LineBreakKind::Mandatory)
    }

    /// Breaks strictly inside `range`.
    pub fn within(&self, range: Range<usize>) -> &[LineBreak] {
        let start = self.breaks.partition_point(|b| b.offset <= range.start);
        let end = self.breaks.partition_point(|b| b.offset < range.end);
        &self.breaks[start..end.max(start)]
    }
}

/// A piece of an intersected run, flagged when a mandatory break follows it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Segment<F> {
    pub run: IntersectedRun<F>,
    pub hard_break: bool,
}

/// Split `run` at the mandatory breaks inside it, and at every break
/// opportunity too when `soft` is set.
pub(crate) fn split_run<F: Clone>(
    run: IntersectedRun<F>,
    breaks: &LineBreaks,
    soft: bool,
) -> Vec<Segment<F>> {
    let mut segments = Vec::new();
    let mut start = run.range.start;
    for brk in breaks.within(run.range.clone()) {
        if !soft && brk.kind != LineBreakKind::Mandatory {
            continue;
        }
        segments.push(Segment {
            run: IntersectedRun {
                range: start..brk.offset,
                ..run.clone()
            },
            hard_break: brk.kind == LineBreakKind::Mandatory,
        });
        start = brk.offset;
    }
    let hard_break = breaks.is_mandatory(run.range.end);
    segments.push(Segment {
        run: IntersectedRun {
            range: start..run.range.end,
            ..run
        },
        hard_break,
    });
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::LanguageTag;
    use unicode_script::Script;

    fn run(range: Range<usize>) -> IntersectedRun<u8> {
        IntersectedRun {
            range,
            font: 0,
            bidi_level: 0,
            script: Script::Latin,
            language: LanguageTag::new("en"),
        }
    }

    #[test]
    fn newline_is_mandatory_and_end_is_dropped() {
        let text = "a b \nc";
        let breaks = LineBreaks::new(text);
        assert_eq!(breaks.kind_at(2), Some(LineBreakKind::Opportunity));
        assert!(breaks.is_mandatory(5));
        assert_eq!(breaks.kind_at(text.len()), None);
    }

    #[test]
    fn within_excludes_range_edges() {
        let breaks = LineBreaks::new("aa bb cc");
        let inside: Vec<_> = breaks.within(0..6).iter().map(|b| b.offset).collect();
        assert_eq!(inside, vec![3]);
        assert!(breaks.within(3..6).is_empty());
    }

    #[test]
    fn hard_split_only_at_mandatory_breaks() {
        let text = "ab cd\nef";
        let breaks = LineBreaks::new(text);
        let segments = split_run(run(0..text.len()), &breaks, false);
        let ranges: Vec<_> = segments.iter().map(|s| s.run.range.clone()).collect();
        assert_eq!(ranges, vec![0..6, 6..8]);
        assert!(segments[0].hard_break);
        assert!(!segments[1].hard_break);
    }

    #[test]
    fn soft_split_at_every_opportunity() {
        let text = "ab cd ef";
        let breaks = LineBreaks::new(text);
        let segments = split_run(run(0..text.len()), &breaks, true);
        let ranges: Vec<_> = segments.iter().map(|s| s.run.range.clone()).collect();
        assert_eq!(ranges, vec![0..3, 3..6, 6..8]);
        assert!(segments.iter().all(|s| !s.hard_break));
    }

    #[test]
    fn run_ending_at_newline_is_flagged() {
        let text = "ab\ncd";
        let breaks = LineBreaks::new(text);
        let segments = split_run(run(0..3), &breaks, false);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].hard_break);
    }
}
