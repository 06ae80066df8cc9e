//! Size-keyed sprite store.
//!
//! Sprites are pre-scaled once at startup and then looked up by size. Lookups
//! that land close to an existing size reuse it; lookups far from every cached
//! size scale the nearest sprite once and keep the result for good. Nothing is
//! ever evicted, so a handle returned here stays valid and unchanged for the
//! life of the cache.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, warn};

use crate::config::NEAR_HIT_TOLERANCE;
use crate::error::AssetError;

/// Shared, read-only sprite image.
pub type Sprite = Rc<RgbaImage>;

pub fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let img = image::open(path).map_err(|source| AssetError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgba8())
}

pub fn scale(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(src, width.max(1), height.max(1), FilterType::Triangle)
}

/// Where the preloaded sprites came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSource {
    Image,
    Placeholder,
}

#[derive(Default)]
pub struct SpriteCache {
    // Ordered so nearest-size ties resolve to the smaller size
    cache: BTreeMap<u32, Sprite>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the sprite at `path` and caches one scaled copy per entry in `sizes`.
    ///
    /// A missing or undecodable file is not an error for the caller: each size
    /// gets a flat placeholder square instead and a warning is logged, so the
    /// cache is always usable afterwards.
    pub fn preload(&mut self, path: impl AsRef<Path>, sizes: &[u32], placeholder: [u8; 4]) -> SpriteSource {
        let path = path.as_ref();
        match load_image(path) {
            Ok(source) => {
                for &size in sizes {
                    self.cache.insert(size, Rc::new(scale(&source, size, size)));
                }
                debug!("preloaded {} sprite sizes from {}", sizes.len(), path.display());
                SpriteSource::Image
            }
            Err(e) => {
                warn!("{}; using placeholder squares instead", e);
                for &size in sizes {
                    let square = RgbaImage::from_pixel(size, size, Rgba(placeholder));
                    self.cache.insert(size, Rc::new(square));
                }
                SpriteSource::Placeholder
            }
        }
    }

    /// Returns the sprite best suited to `size`, or `None` if nothing was ever preloaded.
    ///
    /// An exact hit or a cached size within [`NEAR_HIT_TOLERANCE`] is returned as
    /// is. Anything further away is scaled from the nearest entry and inserted
    /// under `size`, so the next request for it is an exact hit.
    pub fn get(&mut self, size: u32) -> Option<Sprite> {
        if let Some(sprite) = self.cache.get(&size) {
            return Some(Rc::clone(sprite));
        }

        let (&closest, sprite) = self
            .cache
            .iter()
            .min_by_key(|&(&key, _)| key.abs_diff(size))?;

        if closest.abs_diff(size) <= NEAR_HIT_TOLERANCE {
            return Some(Rc::clone(sprite));
        }

        debug!("sprite cache growing: {} scaled from {}", size, closest);
        let scaled = Rc::new(scale(sprite, size, size));
        self.cache.insert(size, Rc::clone(&scaled));
        Some(scaled)
    }

    #[cfg(test)]
    pub fn sprite_count(&self) -> usize {
        self.cache.len()
    }
}
