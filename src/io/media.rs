// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Asset image loading.
//!
//! Images are decoded on short-lived worker threads. Each worker sends one
//! completion over a channel, and the UI thread drains completions at the
//! start of a frame so every completion sees the current scene.

use crate::error::AssetError;
use crate::models::catalog::AssetRef;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Decoded RGBA8 image (straight alpha).
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl LoadedImage {
    /// Wrap an already decoded RGBA buffer.
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }

    #[cfg(test)]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba(image::RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }
}

/// Load and decode an image file into RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(AssetError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(LoadedImage::from_rgba(decoded.to_rgba8()))
}

/// What a finished load should turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Replace the card background.
    Background,
    /// Place a new element on the main layer.
    Element,
    /// Palette preview only.
    Thumbnail,
}

/// Completion message sent by a loader worker.
#[derive(Debug)]
pub struct LoadedAsset {
    pub asset: AssetRef,
    pub purpose: LoadPurpose,
    pub result: Result<Arc<LoadedImage>, AssetError>,
}

/// Background image loader feeding completions back to the UI thread.
pub struct AssetLoader {
    root: PathBuf,
    sender: Sender<LoadedAsset>,
    receiver: Receiver<LoadedAsset>,
    in_flight: usize,
}

impl AssetLoader {
    /// Create a loader resolving asset references against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = channel();
        Self {
            root: root.into(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start loading `asset` on a worker thread.
    pub fn request(&mut self, asset: AssetRef, purpose: LoadPurpose) {
        let path = asset.path(&self.root);
        let sender = self.sender.clone();
        self.in_flight += 1;
        log::debug!("Loading {} for {:?}", path.display(), purpose);

        std::thread::spawn(move || {
            let result = load_image(&path).map(Arc::new);
            let _ = sender.send(LoadedAsset {
                asset,
                purpose,
                result,
            });
        });
    }

    /// Drain every completion that has arrived so far without blocking.
    pub fn poll(&mut self) -> Vec<LoadedAsset> {
        let done: Vec<LoadedAsset> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Whether any request is still waiting for its completion.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll_until_done(loader: &mut AssetLoader) -> Vec<LoadedAsset> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut done = Vec::new();
        while loader.is_loading() && Instant::now() < deadline {
            done.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        done
    }

    #[test]
    fn test_load_image_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_image_reports_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(load_image(&missing), Err(AssetError::Io { .. })));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"not a png").unwrap();
        assert!(matches!(load_image(&corrupt), Err(AssetError::Decode { .. })));
    }

    #[test]
    fn test_loader_delivers_results_through_poll() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bodies")).unwrap();
        image::RgbaImage::new(4, 4)
            .save(dir.path().join("bodies/body_1.png"))
            .unwrap();

        let mut loader = AssetLoader::new(dir.path());
        loader.request(AssetRef::new("bodies", "body_1.png"), LoadPurpose::Element);
        loader.request(AssetRef::new("bodies", "nope.png"), LoadPurpose::Element);

        let done = poll_until_done(&mut loader);
        assert_eq!(done.len(), 2);
        assert!(!loader.is_loading());

        let ok = done.iter().find(|d| d.asset.file == "body_1.png").unwrap();
        assert_eq!(ok.result.as_ref().unwrap().width, 4);
        let failed = done.iter().find(|d| d.asset.file == "nope.png").unwrap();
        assert!(failed.result.is_err());
    }
}
