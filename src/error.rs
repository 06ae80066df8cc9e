use std::path::PathBuf;

use thiserror::Error;

/// Failure to bring an image asset into memory.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The file is missing, unreadable or not a decodable image.
    #[error("failed to load image '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
