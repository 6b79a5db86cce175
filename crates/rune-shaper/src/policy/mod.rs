//! Layout strategies and the [`Shaper`] front end.
//!
//! A shaper is built with one [`Strategy`] and keeps it for its lifetime.
//! The strategy decides whether lines are wrapped, whether wrapping
//! happens before or after shaping, and whether runs are reordered into
//! visual order.

pub mod breaks;
mod line;
pub mod platform;
mod wrap;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::error::ConfigError;
use crate::handler::{BlobBuilder, LineBuilder, Point, RunHandler, TextBlob, TextLine};
use crate::intersect::intersect_all;
use crate::runs::{
    BaseDirection, FontFallbackRuns, FontProvider, RunStreams, UnicodeBidiRuns, UnicodeScriptRuns,
};
use crate::shaping::{ShapingBackend, ShapingOptions};

use line::LineEmitter;
use wrap::Pass;

pub use breaks::{LineBreak, LineBreakKind, LineBreaks};
pub use platform::{PlatformTextService, native_service};

/// Layout strategy of a [`Shaper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One run, one line: no intersection, wrapping or reordering.
    Primitive,
    /// Break at opportunities before shaping, pack pieces greedily.
    ShaperDrivenWrap,
    /// Shape complete runs, split them where lines overflow.
    ShapeThenWrap,
    /// Shape intersected runs onto one line in logical order.
    ShapeNoWrapNoReorder,
    /// Delegate to a platform text service.
    PlatformNative,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Primitive,
        Strategy::ShaperDrivenWrap,
        Strategy::ShapeThenWrap,
        Strategy::ShapeNoWrapNoReorder,
        Strategy::PlatformNative,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Primitive => "primitive",
            Strategy::ShaperDrivenWrap => "shaper-driven-wrap",
            Strategy::ShapeThenWrap => "shape-then-wrap",
            Strategy::ShapeNoWrapNoReorder => "shape-no-wrap-no-reorder",
            Strategy::PlatformNative => "platform-native",
        }
    }

    pub fn wraps(self) -> bool {
        matches!(self, Strategy::ShaperDrivenWrap | Strategy::ShapeThenWrap)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shaping strategy {0:?}")]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

type SharedProvider<F> = Arc<dyn FontProvider<F> + Send + Sync>;

/// Text shaper: turns text plus classification streams into positioned
/// glyph runs, delivered to a [`RunHandler`].
///
/// Immutable after construction; one shaper may serve concurrent calls
/// when its backend is `Sync`.
pub struct Shaper<B: ShapingBackend> {
    backend: B,
    strategy: Strategy,
    fallback: Option<SharedProvider<B::Font>>,
    platform: Option<Arc<dyn PlatformTextService<B::Font>>>,
}

impl<B: ShapingBackend> fmt::Debug for Shaper<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shaper")
            .field("strategy", &self.strategy)
            .field("fallback", &self.fallback.is_some())
            .field("platform", &self.platform.as_ref().map(|service| service.name().to_string()))
            .finish()
    }
}

impl<B: ShapingBackend> Shaper<B> {
    fn build(backend: B, strategy: Strategy, fallback: Option<SharedProvider<B::Font>>) -> Self {
        Self {
            backend,
            strategy,
            fallback,
            platform: None,
        }
    }

    /// The default shaper: shape then wrap.
    pub fn new(backend: B) -> Self {
        Self::shape_then_wrap(backend)
    }

    pub fn primitive(backend: B) -> Self {
        Self::build(backend, Strategy::Primitive, None)
    }

    pub fn primitive_with_fallback<P>(backend: B, provider: P) -> Self
    where
        P: FontProvider<B::Font> + Send + Sync + 'static,
    {
        Self::build(backend, Strategy::Primitive, Some(Arc::new(provider)))
    }

    pub fn shaper_driven_wrapper(backend: B) -> Self {
        Self::build(backend, Strategy::ShaperDrivenWrap, None)
    }

    pub fn shaper_driven_wrapper_with_fallback<P>(backend: B, provider: P) -> Self
    where
        P: FontProvider<B::Font> + Send + Sync + 'static,
    {
        Self::build(backend, Strategy::ShaperDrivenWrap, Some(Arc::new(provider)))
    }

    pub fn shape_then_wrap(backend: B) -> Self {
        Self::build(backend, Strategy::ShapeThenWrap, None)
    }

    pub fn shape_then_wrap_with_fallback<P>(backend: B, provider: P) -> Self
    where
        P: FontProvider<B::Font> + Send + Sync + 'static,
    {
        Self::build(backend, Strategy::ShapeThenWrap, Some(Arc::new(provider)))
    }

    pub fn shape_dont_wrap_or_reorder(backend: B) -> Self {
        Self::build(backend, Strategy::ShapeNoWrapNoReorder, None)
    }

    pub fn shape_dont_wrap_or_reorder_with_fallback<P>(backend: B, provider: P) -> Self
    where
        P: FontProvider<B::Font> + Send + Sync + 'static,
    {
        Self::build(backend, Strategy::ShapeNoWrapNoReorder, Some(Arc::new(provider)))
    }

    /// Shaper backed by the platform text service, failing where there is
    /// none.
    pub fn platform_native(backend: B) -> Result<Self> {
        let service = native_service::<B::Font>()
            .ok_or(ConfigError::PlatformUnavailable(Strategy::PlatformNative.name()))?;
        Ok(Self::platform_native_with(backend, service))
    }

    pub fn platform_native_with(backend: B, service: Arc<dyn PlatformTextService<B::Font>>) -> Self {
        Self {
            platform: Some(service),
            ..Self::build(backend, Strategy::PlatformNative, None)
        }
    }

    /// Shaper for `strategy`. Platform-native fails as in [`Shaper::platform_native`].
    pub fn with_strategy(backend: B, strategy: Strategy) -> Result<Self> {
        match strategy {
            Strategy::PlatformNative => Self::platform_native(backend),
            other => Ok(Self::build(backend, other, None)),
        }
    }

    /// Attach a font-resolution service used by the default font stream.
    pub fn with_fallback<P>(mut self, provider: P) -> Self
    where
        P: FontProvider<B::Font> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(provider));
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shape `text` from explicit classification streams.
    ///
    /// `width` must be positive or `f32::INFINITY`. Runs reach `handler`
    /// line by line, each line left to right.
    pub fn shape(
        &self,
        text: &str,
        streams: RunStreams<'_, B::Font>,
        options: &ShapingOptions,
        width: f32,
        handler: &mut dyn RunHandler<B::Font>,
    ) -> Result<()> {
        if width.is_nan() || width <= 0.0 {
            return Err(ConfigError::InvalidWidth(width).into());
        }
        debug!(
            strategy = self.strategy.name(),
            len = text.len(),
            width = width as f64,
            "shaping text"
        );
        if text.is_empty() {
            return Ok(());
        }

        let pass = self.pass(text, options);
        match self.strategy {
            Strategy::PlatformNative => self.shape_platform(text, streams, options, width, handler),
            strategy => {
                let mut emitter = LineEmitter::new(handler, options.round_positions);
                match strategy {
                    Strategy::Primitive => pass.primitive(streams, &mut emitter),
                    Strategy::ShaperDrivenWrap => pass.shaper_driven(streams, width, &mut emitter),
                    Strategy::ShapeThenWrap => pass.shape_then_wrap(streams, width, &mut emitter),
                    _ => pass.no_wrap(streams, &mut emitter),
                }
            }
        }
    }

    fn shape_platform(
        &self,
        text: &str,
        streams: RunStreams<'_, B::Font>,
        options: &ShapingOptions,
        width: f32,
        handler: &mut dyn RunHandler<B::Font>,
    ) -> Result<()> {
        let service = self
            .platform
            .as_ref()
            .ok_or(ConfigError::PlatformUnavailable(Strategy::PlatformNative.name()))?;
        let runs = intersect_all(text.len(), streams)?;
        debug!(service = service.name(), runs = runs.len(), "delegating to platform");
        service.shape(text, &runs, options, width, handler)
    }

    /// The default classification streams for `text` in `font`: font
    /// fallback per grapheme, UAX #9 levels with the options' base
    /// direction, Unicode scripts and the process default language.
    pub fn default_streams<'a>(
        &'a self,
        text: &'a str,
        font: &'a B::Font,
        options: &ShapingOptions,
    ) -> RunStreams<'a, B::Font> {
        let provider = self
            .fallback
            .as_deref()
            .map(|provider| provider as &dyn FontProvider<B::Font>);
        let base = if options.right_to_left {
            BaseDirection::Rtl
        } else {
            BaseDirection::Ltr
        };
        RunStreams::new(
            FontFallbackRuns::new(text, &self.backend, font, provider),
            UnicodeBidiRuns::new(text, base),
            UnicodeScriptRuns::new(text),
        )
    }

    /// Shape with the default classification streams.
    pub fn shape_with_handler(
        &self,
        text: &str,
        font: &B::Font,
        options: &ShapingOptions,
        width: f32,
        handler: &mut dyn RunHandler<B::Font>,
    ) -> Result<()> {
        let streams = self.default_streams(text, font, options);
        self.shape(text, streams, options, width, handler)
    }

    /// Shape into a [`TextBlob`] shifted by `offset`; `None` when no glyph
    /// was produced.
    pub fn shape_blob(
        &self,
        text: &str,
        font: &B::Font,
        options: &ShapingOptions,
        width: f32,
        offset: Point,
    ) -> Result<Option<TextBlob<B::Font>>> {
        let mut builder = BlobBuilder::new(offset);
        self.shape_with_handler(text, font, options, width, &mut builder)?;
        Ok(builder.finish())
    }

    pub fn shape_text(&self, text: &str, font: &B::Font) -> Result<Option<TextBlob<B::Font>>> {
        self.shape_blob(text, font, &ShapingOptions::default(), f32::INFINITY, Point::ZERO)
    }

    pub fn shape_text_wrapped(
        &self,
        text: &str,
        font: &B::Font,
        width: f32,
    ) -> Result<Option<TextBlob<B::Font>>> {
        self.shape_blob(text, font, &ShapingOptions::default(), width, Point::ZERO)
    }

    /// Shape onto a single line, whatever this shaper's strategy.
    ///
    /// Empty text yields an empty line carrying `font`'s metrics.
    pub fn shape_line(
        &self,
        text: &str,
        font: &B::Font,
        options: &ShapingOptions,
    ) -> Result<TextLine<B::Font>> {
        let metrics = self.backend.metrics(font);
        let mut builder = LineBuilder::new(metrics.ascent, metrics.descent);
        if !text.is_empty() {
            let streams = self.default_streams(text, font, options);
            let mut emitter = LineEmitter::new(&mut builder, options.round_positions);
            self.pass(text, options).no_wrap(streams, &mut emitter)?;
        }
        Ok(builder.finish())
    }

    pub fn shape_text_line(&self, text: &str, font: &B::Font) -> Result<TextLine<B::Font>> {
        self.shape_line(text, font, &ShapingOptions::default())
    }

    fn pass<'a>(&'a self, text: &'a str, options: &'a ShapingOptions) -> Pass<'a, B> {
        Pass {
            backend: &self.backend,
            text,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert!("wrap-harder".parse::<Strategy>().is_err());
    }

    #[test]
    fn only_two_strategies_wrap() {
        let wrapping: Vec<_> = Strategy::ALL.into_iter().filter(|s| s.wraps()).collect();
        assert_eq!(wrapping, vec![Strategy::ShaperDrivenWrap, Strategy::ShapeThenWrap]);
    }
}
