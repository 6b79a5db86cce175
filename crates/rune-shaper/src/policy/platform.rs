//! Hook for an operating-system text service.

use std::sync::Arc;

use crate::Result;
use crate::handler::RunHandler;
use crate::intersect::IntersectedRun;
use crate::shaping::ShapingOptions;

/// A platform text-shaping service driving the whole layout itself.
///
/// It receives the validated intersected runs and must honour the same
/// output contract as the portable strategies: every glyph delivered once,
/// lines in order, runs in visual order within a line.
pub trait PlatformTextService<F>: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &str;

    fn shape(
        &self,
        text: &str,
        runs: &[IntersectedRun<F>],
        options: &ShapingOptions,
        width: f32,
        handler: &mut dyn RunHandler<F>,
    ) -> Result<()>;
}

/// The platform service compiled into this build.
///
/// No platform bindings ship with this crate, so this is always `None`;
/// callers with their own service use `Shaper::platform_native_with`.
pub fn native_service<F>() -> Option<Arc<dyn PlatformTextService<F>>> {
    None
}
