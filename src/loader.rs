// Image loading for the foreground (and a background image, if any).
// The widget never loads on its own: it exposes an `ImageRequest` and the
// host hands the decoded result back, so loading may happen wherever suits it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;

use crate::error::{Error, Result};
use crate::options::CrossOrigin;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub reference: String,
    pub cross_origin: CrossOrigin,
}

pub trait ImageLoader {
    fn load(&self, request: &ImageRequest) -> Result<RgbaImage>;
}

/// Treats references as file paths, optionally relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    root: Option<PathBuf>,
}

impl FileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageLoader for FileLoader {
    fn load(&self, request: &ImageRequest) -> Result<RgbaImage> {
        if request.cross_origin != CrossOrigin::Unset {
            // Local files carry no credentials.
            tracing::debug!("cross-origin mode {:?} ignored for file '{}'", request.cross_origin, request.reference);
        }
        let path = self.resolve(&request.reference);
        let img = image::open(&path).map_err(|source| Error::ImageLoad {
            reference: request.reference.clone(),
            source,
        })?;
        tracing::debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img.to_rgba8())
    }
}

/// Where the widget is on its way to becoming interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Waiting for the host to deliver the foreground image.
    AwaitingForeground,
    /// Foreground drawn; the background is revealed (and input enabled) at `due`.
    BackgroundPending { due: Instant },
    Ready,
    /// No foreground was configured. Stays inert forever.
    Inert,
    /// The foreground failed to load. Stays inert forever.
    Failed,
}

impl LoadPhase {
    pub fn is_ready(self) -> bool {
        matches!(self, LoadPhase::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(reference: &str) -> ImageRequest {
        ImageRequest { reference: reference.to_string(), cross_origin: CrossOrigin::Unset }
    }

    #[test]
    fn test_file_loader_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::from_pixel(6, 4, image::Rgba([1, 2, 3, 255]));
        img.save(dir.path().join("front.png")).unwrap();

        let loader = FileLoader::with_root(dir.path());
        let loaded = loader.load(&request("front.png")).unwrap();
        assert_eq!(loaded.dimensions(), (6, 4));
        assert_eq!(loaded.get_pixel(5, 3), &image::Rgba([1, 2, 3, 255]));

        // Absolute paths ignore the root.
        let abs = dir.path().join("front.png");
        let loaded = FileLoader::new().load(&request(abs.to_str().unwrap())).unwrap();
        assert_eq!(loaded.dimensions(), (6, 4));
    }

    #[test]
    fn test_file_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileLoader::with_root(dir.path()).load(&request("nope.png")).unwrap_err();
        match err {
            Error::ImageLoad { reference, .. } => assert_eq!(reference, "nope.png"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
