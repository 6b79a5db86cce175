use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use tracing::debug;

use crate::font::{FontError, FontFace, FontHandle, Result};
use crate::runs::FontProvider;

/// Key for identifying a font within the cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    /// Path to the font file on disk.
    pub path: PathBuf,
    /// Font index within the file (for collections).
    pub index: u32,
}

impl FontKey {
    pub fn new(path: impl AsRef<Path>, index: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            index: index as u32,
        }
    }
}

/// Simple in-memory font cache keyed by file path and index.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: HashMap<FontKey, Arc<FontFace>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Get a font face from the cache or load it from disk.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>, index: usize) -> Result<Arc<FontFace>> {
        let key = FontKey::new(&path, index);
        if let Some(face) = self.fonts.get(&key) {
            return Ok(face.clone());
        }

        let face = Arc::new(FontFace::from_path(&key.path, index)?);
        self.fonts.insert(key, face.clone());
        Ok(face)
    }
}

/// Ordered list of fallback faces consulted for codepoints the
/// requested font does not cover.
#[derive(Debug, Clone, Default)]
pub struct FontCollection {
    faces: Vec<Arc<FontFace>>,
}

impl FontCollection {
    /// Resolve each family name in `db`, in order, loading the matching
    /// regular face. Unknown families are an error.
    pub fn from_database(db: &fontdb::Database, families: &[&str]) -> Result<Self> {
        let mut faces = Vec::with_capacity(families.len());
        for family in families {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(family)],
                ..fontdb::Query::default()
            };
            let id = db
                .query(&query)
                .ok_or_else(|| FontError::NotFound((*family).to_string()))?;
            let face = db
                .with_face_data(id, |data, index| {
                    FontFace::from_vec(data.to_vec(), index as usize)
                })
                .ok_or_else(|| FontError::NotFound((*family).to_string()))??;
            debug!(family = *family, "loaded fallback face");
            faces.push(Arc::new(face));
        }
        Ok(Self { faces })
    }
}

impl FontProvider<FontHandle> for FontCollection {
    fn fallback_for(&self, ch: char, requested: &FontHandle) -> Option<FontHandle> {
        self.faces
            .iter()
            .find(|face| face.has_glyph(ch))
            .map(|face| FontHandle::new(face.clone(), requested.size()))
    }
}
