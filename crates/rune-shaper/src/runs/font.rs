use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};

use super::FontRun;
use crate::shaping::ShapingBackend;

/// Font-resolution service consulted for codepoints the requested font
/// cannot render.
pub trait FontProvider<F> {
    /// A font able to render `ch`, in the style of `requested`.
    fn fallback_for(&self, ch: char, requested: &F) -> Option<F>;
}

/// Font stream resolving a font per grapheme cluster.
///
/// The requested font is used wherever it covers the cluster's first
/// codepoint. Otherwise the font of the run in progress is kept if it
/// covers it, then the provider is asked. Clusters no font covers, and
/// control codepoints, stay with the current font so the backend renders
/// its missing glyph.
pub struct FontFallbackRuns<'a, B: ShapingBackend> {
    graphemes: GraphemeIndices<'a>,
    backend: &'a B,
    requested: &'a B::Font,
    provider: Option<&'a dyn FontProvider<B::Font>>,
    pending: Option<FontRun<B::Font>>,
}

impl<'a, B: ShapingBackend> FontFallbackRuns<'a, B> {
    pub fn new(
        text: &'a str,
        backend: &'a B,
        requested: &'a B::Font,
        provider: Option<&'a dyn FontProvider<B::Font>>,
    ) -> Self {
        Self {
            graphemes: text.grapheme_indices(true),
            backend,
            requested,
            provider,
            pending: None,
        }
    }

    fn resolve(&self, cluster: &str, current: Option<&B::Font>) -> B::Font {
        let Some(ch) = cluster.chars().next() else {
            return self.requested.clone();
        };
        if self.backend.has_glyph(self.requested, ch) {
            return self.requested.clone();
        }
        if let Some(current) = current
            && (ch.is_control() || self.backend.has_glyph(current, ch))
        {
            return current.clone();
        }
        if ch.is_control() {
            return self.requested.clone();
        }
        self.provider
            .and_then(|provider| provider.fallback_for(ch, self.requested))
            .unwrap_or_else(|| current.unwrap_or(self.requested).clone())
    }
}

impl<B: ShapingBackend> Iterator for FontFallbackRuns<'_, B> {
    type Item = FontRun<B::Font>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, cluster)) = self.graphemes.next() {
            let end = idx + cluster.len();
            let font = self.resolve(cluster, self.pending.as_ref().map(|run| &run.value));
            match &mut self.pending {
                Some(run) if run.value == font => run.range.end = end,
                pending => {
                    let finished = pending.replace(FontRun::new(idx..end, font));
                    if finished.is_some() {
                        return finished;
                    }
                }
            }
        }
        self.pending.take()
    }
}
