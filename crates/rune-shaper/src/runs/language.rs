use std::fmt;
use std::sync::{Arc, OnceLock};

use super::LanguageRun;

/// BCP 47 language tag, e.g. `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(Arc<str>);

impl LanguageTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(Arc::from(tag.as_ref()))
    }

    /// Convert a POSIX locale name (`en_US.UTF-8`, `sr_RS@latin`) into a
    /// language tag. `C`, `POSIX` and empty names yield `None`.
    pub fn from_posix_locale(locale: &str) -> Option<Self> {
        let name = locale.split(['.', '@']).next().unwrap_or_default();
        if name.is_empty() || name == "C" || name == "POSIX" {
            return None;
        }
        Some(Self::new(name.replace('_', "-")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide default language, resolved once from the locale
/// environment (`LC_ALL`, `LC_MESSAGES`, `LANG`), falling back to `en`.
pub fn default_language() -> &'static LanguageTag {
    static DEFAULT: OnceLock<LanguageTag> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|value| LanguageTag::from_posix_locale(&value))
            .unwrap_or_else(|| LanguageTag::new("en"))
    })
}

/// Language stream tagging the whole text with one language.
#[derive(Debug, Clone)]
pub struct TrivialLanguageRuns {
    run: Option<LanguageRun>,
}

impl TrivialLanguageRuns {
    pub fn new(text_len: usize, language: LanguageTag) -> Self {
        let run = (text_len > 0).then(|| LanguageRun::new(0..text_len, language));
        Self { run }
    }
}

impl Iterator for TrivialLanguageRuns {
    type Item = LanguageRun;

    fn next(&mut self) -> Option<Self::Item> {
        self.run.take()
    }
}
