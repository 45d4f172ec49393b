//! Image intake: user-provided files and their local previews.

use image::RgbaImage;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// An image handed in by the user, held in memory.
#[derive(Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Whether the file extension is one the intake accepts.
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            matches!(
                ext.as_str(),
                "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif"
            )
        }
        None => false,
    }
}

/// Handle to a preview in a [`PreviewStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewId(u64);

#[derive(Debug)]
pub struct Preview {
    pub name: String,
    /// Decoded thumbnail. `None` until the worker has decoded it, and for
    /// good when the bytes are not a readable image.
    pub image: Option<RgbaImage>,
}

/// Decodes `file` and shrinks it to fit in `max_side`, keeping its aspect.
///
/// Runs on the worker thread; a decode error is logged and yields `None`.
pub fn decode_thumbnail(file: &ImageFile, max_side: u32) -> Option<RgbaImage> {
    match image::load_from_memory(&file.bytes) {
        Ok(img) if img.width() <= max_side && img.height() <= max_side => Some(img.to_rgba8()),
        Ok(img) => Some(img.thumbnail(max_side, max_side).to_rgba8()),
        Err(e) => {
            tracing::warn!("Failed to decode preview for {}: {}", file.name, e);
            None
        }
    }
}

/// Owns previews. Each preview stays alive until revoked.
#[derive(Debug)]
pub struct PreviewStore {
    max_side: u32,
    next_id: u64,
    live: HashMap<PreviewId, Preview>,
}

impl PreviewStore {
    pub fn new(max_side: u32) -> Self {
        Self {
            max_side: max_side.max(1),
            next_id: 0,
            live: HashMap::new(),
        }
    }

    /// Longest side a thumbnail in this store may have.
    pub fn max_side(&self) -> u32 {
        self.max_side
    }

    /// Registers a preview for `file`. Pixels arrive later via [`attach`].
    ///
    /// [`attach`]: PreviewStore::attach
    pub fn create(&mut self, file: &ImageFile) -> PreviewId {
        self.next_id += 1;
        let id = PreviewId(self.next_id);
        self.live.insert(
            id,
            Preview {
                name: file.name.clone(),
                image: None,
            },
        );
        id
    }

    /// Stores the decoded thumbnail. Returns false if the preview was
    /// revoked in the meantime; the image is then dropped.
    pub fn attach(&mut self, id: PreviewId, image: Option<RgbaImage>) -> bool {
        match self.live.get_mut(&id) {
            Some(preview) => {
                preview.image = image;
                true
            }
            None => false,
        }
    }

    /// Releases a preview. Returns false if it was already gone.
    pub fn revoke(&mut self, id: PreviewId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn get(&self, id: PreviewId) -> Option<&Preview> {
        self.live.get(&id)
    }

    pub fn is_live(&self, id: PreviewId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
