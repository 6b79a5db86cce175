use std::sync::Arc;

use rune_shaper::{FontCache, FontHandle, HarfrustBackend, Shaper, Strategy};

fn main() {
    // Load a font
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/System/Library/Fonts/Helvetica.ttc".to_string());
    let mut font_cache = FontCache::new();
    let face = font_cache.get_or_load(&path, 0).expect("Failed to load font");
    let font = FontHandle::new(Arc::clone(&face), 16.0);

    let text = "Shaping engines wrap, reorder and position glyph runs.";
    let width = 160.0;
    println!("Text: {:?}", text);
    println!("Width: {width}");
    println!();

    for strategy in Strategy::ALL {
        let shaper = match Shaper::with_strategy(HarfrustBackend::new(), strategy) {
            Ok(shaper) => shaper,
            Err(err) => {
                println!("{strategy}: {err}");
                println!();
                continue;
            }
        };
        let blob = shaper
            .shape_text_wrapped(text, &font, width)
            .expect("Failed to shape text")
            .expect("Text produced no glyphs");

        println!("{strategy}: {} lines, {} glyphs", blob.lines().len(), blob.glyph_count());
        for line in blob.lines() {
            let runs: Vec<_> = blob
                .runs()
                .iter()
                .filter(|run| run.line_index == line.index)
                .map(|run| &text[run.text_range.clone()])
                .collect();
            println!("  y={:.2} w={:.2} {:?}", line.baseline, line.width, runs);
        }
        println!();
    }
}
