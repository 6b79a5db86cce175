use std::str::FromStr;

use harfrust::{
    Direction as HbDirection,
    Feature as HbFeature,
    FontRef as HbFontRef,
    Language as HbLanguage,
    Script as HbScript,
    ShaperData,
    ShaperInstance,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};
use tracing::{trace, warn};
use unicode_script::Script;

use crate::font::{FontHandle, ScaledFontMetrics};
use crate::intersect::IntersectedRun;
use crate::{Result, ShapeError};

use super::{FontFeature, ShapedGlyph, ShapedRun, ShapingBackend, ShapingOptions};

/// Shaping backend built on harfrust (pure-Rust HarfBuzz port).
///
/// Stateless: the shaper plan is rebuilt for every run.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarfrustBackend;

impl HarfrustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ShapingBackend for HarfrustBackend {
    type Font = FontHandle;

    fn shape_run(
        &self,
        text: &str,
        run: &IntersectedRun<FontHandle>,
        options: &ShapingOptions,
    ) -> Result<ShapedRun> {
        let face = run.font.face();
        let font_ref = HbFontRef::from_index(face.as_bytes(), face.index())
            .map_err(|err| ShapeError::Backend(format!("unreadable font data: {err}")))?;

        // Shaper configuration with default (no variations) instance.
        let data = ShaperData::new(&font_ref);
        let instance =
            ShaperInstance::from_variations(&font_ref, core::iter::empty::<harfrust::Variation>());
        let shaper = data
            .shaper(&font_ref)
            .instance(Some(&instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(if run.is_rtl() {
            HbDirection::RightToLeft
        } else {
            HbDirection::LeftToRight
        });
        if let Some(script) = hb_script(run.script) {
            buffer.set_script(script);
        }
        match HbLanguage::from_str(run.language.as_str()) {
            Ok(language) => buffer.set_language(language),
            Err(_) => warn!(language = run.language.as_str(), "ignoring unparseable language tag"),
        }
        // Let harfrust fill in any remaining segment properties.
        buffer.guess_segment_properties();

        let features = hb_features(&options.features);
        let glyph_buffer = shaper.shape(buffer, &features);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust uses design units; convert to pixels using the font's
        // units-per-em and requested size.
        let scale = face.metrics().scale(run.font.size());
        let base = run.range.start as u32;
        let mut glyphs: Vec<ShapedGlyph> = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| {
                let glyph_id = match info.glyph_id {
                    0 => run.font.missing_glyph(),
                    id => id as u16,
                };
                ShapedGlyph {
                    glyph_id,
                    x_advance: pos.x_advance as f32 * scale,
                    y_advance: -(pos.y_advance as f32) * scale,
                    x_offset: pos.x_offset as f32 * scale,
                    y_offset: -(pos.y_offset as f32) * scale,
                    cluster: base + info.cluster,
                }
            })
            .collect();

        // Right-to-left output comes back in visual order.
        if run.is_rtl() {
            glyphs.reverse();
        }

        trace!(range = ?run.range, glyphs = glyphs.len(), "shaped run with harfrust");
        Ok(ShapedRun::new(run.range.clone(), glyphs, run.bidi_level))
    }

    fn has_glyph(&self, font: &FontHandle, ch: char) -> bool {
        font.face().has_glyph(ch)
    }

    fn metrics(&self, font: &FontHandle) -> ScaledFontMetrics {
        font.face().scaled_metrics(font.size())
    }
}

/// harfrust script for a Unicode script, via its ISO 15924 code.
fn hb_script(script: Script) -> Option<HbScript> {
    let code: [u8; 4] = script.short_name().as_bytes().try_into().ok()?;
    HbScript::from_iso15924_tag(HbTag::new(&code))
}

fn hb_features(features: &[FontFeature]) -> Vec<HbFeature> {
    features
        .iter()
        .map(|f| HbFeature::new(HbTag::new(&f.tag), f.value, ..))
        .collect()
}
