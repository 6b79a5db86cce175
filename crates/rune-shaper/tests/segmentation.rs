mod common;

use anyhow::Result;
use common::{Coverage, SingleFallback, TestBackend, TestFont, glyph_for, glyph_ids, ranges};
use rune_shaper::{
    BaseDirection, ClassifiedRun, CollectingHandler, ConfigError, FontFallbackRuns, FontProvider,
    LanguageTag, ListRuns, RunStreams, Script, ShapeError, Shaper, ShapingOptions, Stream,
    UnicodeBidiRuns, UnicodeScriptRuns, intersect_all,
};

const MIXED: &str = "ab\u{5d0}\u{5d1}c";

fn ascii_font() -> TestFont {
    TestFont::covering(1, Coverage::Ascii)
}

fn hebrew_font() -> TestFont {
    TestFont::covering(2, Coverage::NonAscii)
}

#[test]
fn default_streams_partition_mixed_text() -> Result<()> {
    let backend = TestBackend::new();
    let requested = ascii_font();
    let fallback = SingleFallback(hebrew_font());
    let streams = RunStreams::new(
        FontFallbackRuns::new(
            MIXED,
            &backend,
            &requested,
            Some(&fallback as &dyn FontProvider<TestFont>),
        ),
        UnicodeBidiRuns::new(MIXED, BaseDirection::Ltr),
        UnicodeScriptRuns::new(MIXED),
    );
    let runs = intersect_all(MIXED.len(), streams)?;

    let got: Vec<_> = runs
        .iter()
        .map(|run| (run.range.clone(), run.font.id, run.bidi_level, run.script))
        .collect();
    assert_eq!(
        got,
        vec![
            (0..2, 1, 0, Script::Latin),
            (2..6, 2, 1, Script::Hebrew),
            (6..7, 1, 0, Script::Latin),
        ]
    );
    Ok(())
}

#[test]
fn fallback_font_renders_uncovered_text() -> Result<()> {
    let shaper = Shaper::shape_dont_wrap_or_reorder_with_fallback(
        TestBackend::new(),
        SingleFallback(hebrew_font()),
    );
    let mut handler = CollectingHandler::new();
    shaper.shape_with_handler(
        MIXED,
        &ascii_font(),
        &ShapingOptions::default(),
        f32::INFINITY,
        &mut handler,
    )?;
    assert_eq!(ranges(&handler.runs), vec![0..2, 2..6, 6..7]);
    let fonts: Vec<_> = handler.runs.iter().map(|run| run.font.id).collect();
    assert_eq!(fonts, vec![1, 2, 1]);
    // Right-to-left glyphs come out right to left.
    let hebrew: Vec<_> = handler.runs[1].glyph_ids().collect();
    assert_eq!(hebrew, vec![glyph_for('\u{5d1}'), glyph_for('\u{5d0}')]);
    Ok(())
}

#[test]
fn uncovered_text_gets_missing_glyph() -> Result<()> {
    let shaper = Shaper::shape_dont_wrap_or_reorder(TestBackend::new());
    let mut handler = CollectingHandler::new();
    shaper.shape_with_handler(
        MIXED,
        &ascii_font(),
        &ShapingOptions::default(),
        f32::INFINITY,
        &mut handler,
    )?;
    assert!(handler.runs.iter().all(|run| run.font.id == 1));
    let missing = glyph_ids(&handler.runs).into_iter().filter(|&id| id == 0).count();
    assert_eq!(missing, 2);
    Ok(())
}

#[test]
fn builder_fallback_matches_named_constructor() -> Result<()> {
    let named =
        Shaper::shape_then_wrap_with_fallback(TestBackend::new(), SingleFallback(hebrew_font()));
    let built = Shaper::new(TestBackend::new()).with_fallback(SingleFallback(hebrew_font()));
    let font = ascii_font();
    let a = named.shape_text(MIXED, &font)?;
    let b = built.shape_text(MIXED, &font)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn rtl_option_sets_paragraph_direction() -> Result<()> {
    let shaper = Shaper::shape_then_wrap(TestBackend::new());
    let mut handler = CollectingHandler::new();
    shaper.shape_with_handler(
        "ab cd",
        &TestFont::new(1),
        &ShapingOptions::rtl(),
        f32::INFINITY,
        &mut handler,
    )?;
    // Latin in a right-to-left paragraph sits at level 2.
    assert_eq!(ranges(&handler.runs), vec![0..5]);
    assert_eq!(handler.runs[0].bidi_level, 2);
    let ids: Vec<_> = handler.runs[0].glyph_ids().collect();
    assert_eq!(ids, "ab cd".chars().map(glyph_for).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn overlapping_streams_are_rejected() {
    let shaper = Shaper::new(TestBackend::new());
    let streams = RunStreams::new(
        ListRuns::single(4, TestFont::new(1)),
        ListRuns::new(vec![ClassifiedRun::new(0..3, 0u8), ClassifiedRun::new(2..4, 1)]),
        ListRuns::single(4, Script::Latin),
    );
    let mut handler = CollectingHandler::new();
    let err = shaper
        .shape("abcd", streams, &ShapingOptions::default(), 100.0, &mut handler)
        .unwrap_err();
    assert!(matches!(
        err,
        ShapeError::Configuration(ConfigError::Gap {
            stream: Stream::Bidi,
            expected: 3,
            found: 2
        })
    ));
}

#[test]
fn short_language_stream_is_rejected() {
    let shaper = Shaper::shape_dont_wrap_or_reorder(TestBackend::new());
    let streams = RunStreams::new(
        ListRuns::single(6, TestFont::new(1)),
        ListRuns::single(6, 0u8),
        ListRuns::single(6, Script::Latin),
    )
    .with_languages(ListRuns::single(4, LanguageTag::new("fr")));
    let mut handler = CollectingHandler::new();
    let err = shaper
        .shape("abcdef", streams, &ShapingOptions::default(), f32::INFINITY, &mut handler)
        .unwrap_err();
    assert!(matches!(
        err,
        ShapeError::Configuration(ConfigError::Exhausted {
            stream: Stream::Language,
            at: 4
        })
    ));
}

#[test]
fn uniform_streams_yield_one_run() -> Result<()> {
    let streams = RunStreams::uniform(5, TestFont::new(3), 1, Script::Arabic, LanguageTag::new("ar"));
    let runs = intersect_all(5, streams)?;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].range, 0..5);
    assert!(runs[0].is_rtl());
    assert_eq!(runs[0].language.as_str(), "ar");
    Ok(())
}

#[test]
fn misaligned_run_is_rejected() {
    let shaper = Shaper::new(TestBackend::new());
    let text = "\u{e9}a";
    let streams = RunStreams::new(
        ListRuns::from_lengths([(1, TestFont::new(1)), (2, TestFont::new(2))]),
        ListRuns::single(text.len(), 0u8),
        ListRuns::single(text.len(), Script::Latin),
    );
    let mut handler = CollectingHandler::new();
    let err = shaper
        .shape(text, streams, &ShapingOptions::default(), 100.0, &mut handler)
        .unwrap_err();
    assert!(matches!(
        err,
        ShapeError::Configuration(ConfigError::Misaligned(_))
    ));
}
