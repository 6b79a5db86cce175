//! `rune-shape`: shape a string with the configured font and strategy and
//! print the resulting lines.
//!
//! Usage: `rune-shape [TEXT...]`. Settings come from `rune.toml` and the
//! `RUNE_*` environment variables.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use rune_config::{RuneConfig, StrategyName};
use rune_shaper::{
    BlobBuilder, FontCollection, FontFace, FontFeature, FontHandle, HarfrustBackend, LanguageTag,
    Point, Shaper, ShapingOptions, Strategy, TextBlob, TrivialLanguageRuns,
};

const SAMPLE_TEXT: &str = "Hello, world!";

fn main() -> Result<()> {
    env_logger::init();

    let config = RuneConfig::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        SAMPLE_TEXT.to_string()
    } else {
        args.join(" ")
    };

    let font_path = config
        .text
        .font
        .as_ref()
        .context("no font configured: set [text] font in rune.toml or RUNE_TEXT_FONT")?;
    let face = FontFace::from_path(font_path, config.text.font_index)
        .with_context(|| format!("failed to load font {}", font_path.display()))?;
    let font = FontHandle::new(Arc::new(face), config.text.text_size);

    let shaper = build_shaper(&config)?;
    let options = shaping_options(&config);
    let width = config.shaper.width.unwrap_or(f32::INFINITY);
    info!(
        "shaping {} bytes with {} (width {width})",
        text.len(),
        shaper.strategy()
    );

    let mut streams = shaper.default_streams(&text, &font, &options);
    if let Some(tag) = &config.shaper.language {
        let languages = TrivialLanguageRuns::new(text.len(), LanguageTag::new(tag));
        streams = streams.with_languages(languages);
    }
    let offset = Point::new(config.shaper.offset_x, config.shaper.offset_y);
    let mut builder = BlobBuilder::new(offset);
    shaper
        .shape(&text, streams, &options, width, &mut builder)
        .context("shaping failed")?;

    match builder.finish() {
        Some(blob) => print_blob(&blob),
        None => println!("(no glyphs)"),
    }
    Ok(())
}

fn build_shaper(config: &RuneConfig) -> Result<Shaper<HarfrustBackend>> {
    let backend = HarfrustBackend::new();
    let shaper = match strategy_for(config.shaper.strategy) {
        Some(strategy) => Shaper::with_strategy(backend, strategy)?,
        None => Shaper::new(backend),
    };
    if config.text.fallback_families.is_empty() {
        return Ok(shaper);
    }

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let families: Vec<&str> = config.text.fallback_families.iter().map(String::as_str).collect();
    let fallback = FontCollection::from_database(&db, &families)
        .context("failed to resolve fallback families")?;
    Ok(shaper.with_fallback(fallback))
}

fn strategy_for(name: StrategyName) -> Option<Strategy> {
    Some(match name {
        StrategyName::Default => return None,
        StrategyName::Primitive => Strategy::Primitive,
        StrategyName::ShaperDrivenWrap => Strategy::ShaperDrivenWrap,
        StrategyName::ShapeThenWrap => Strategy::ShapeThenWrap,
        StrategyName::ShapeNoWrapNoReorder => Strategy::ShapeNoWrapNoReorder,
        StrategyName::PlatformNative => Strategy::PlatformNative,
    })
}

fn shaping_options(config: &RuneConfig) -> ShapingOptions {
    let features = config
        .shaper
        .features
        .iter()
        .filter_map(|raw| match raw.parse::<FontFeature>() {
            Ok(feature) => Some(feature),
            Err(err) => {
                warn!("skipping feature: {err}");
                None
            }
        });
    ShapingOptions {
        right_to_left: config.shaper.right_to_left,
        ..ShapingOptions::default()
    }
    .with_features(features)
}

fn print_blob(blob: &TextBlob<FontHandle>) {
    for line in blob.lines() {
        println!(
            "line {} y={:.2} width={:.2}",
            line.index, line.baseline, line.width
        );
        for run in blob.runs().iter().filter(|run| run.line_index == line.index) {
            let ids: Vec<String> = run.glyph_ids().map(|id| id.to_string()).collect();
            println!(
                "  {:?} level={} x={:.2}: {}",
                run.text_range,
                run.bidi_level,
                run.origin.x,
                ids.join(" ")
            );
        }
    }
}
