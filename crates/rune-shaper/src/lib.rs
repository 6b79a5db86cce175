//! rune-shaper: run segmentation and shaping orchestration.
//!
//! Text comes in with four classification streams (font, bidi level,
//! script, language). The [`intersect`] module merges them into runs over
//! which all four are constant, a [`ShapingBackend`] turns each run into
//! glyphs, and a [`Shaper`] strategy lays the shaped runs out into lines
//! delivered to a [`RunHandler`].
//!
//! - [`runs`]: the stream types and default classification sources
//! - [`shaping`]: backend trait, options, and the harfrust backend
//! - [`policy`]: the five layout strategies
//! - [`handler`]: run sinks, including blob and single-line assembly
//! - [`font`]: font faces, caching and fallback collections

pub mod error;
pub mod font;
pub mod handler;
pub mod intersect;
pub mod policy;
pub mod runs;
pub mod shaping;

pub use error::{ConfigError, Result, ShapeError, Stream};

pub use font::{
    FontCache, FontCollection, FontError, FontFace, FontHandle, FontKey, FontMetrics,
    ScaledFontMetrics,
};

pub use handler::{
    BlobBuilder, CollectingHandler, LineBuilder, LineInfo, Point, PositionedGlyph, PositionedRun,
    Rect, RunHandler, TextBlob, TextLine,
};

pub use intersect::{IntersectedRun, RunIntersector, intersect_all};

pub use policy::{
    ParseStrategyError, PlatformTextService, Shaper, Strategy, native_service,
};

pub use runs::{
    BaseDirection, BidiRun, ClassifiedRun, FontFallbackRuns, FontProvider, FontRun, LanguageRun,
    LanguageTag, ListRuns, RunStreams, ScriptRun, TrivialLanguageRuns, UnicodeBidiRuns,
    UnicodeScriptRuns, default_language,
};

pub use shaping::{
    FontFeature, HarfrustBackend, ParseFeatureError, ShapedGlyph, ShapedRun, ShapingBackend,
    ShapingOptions,
};

pub use unicode_script::Script;
