use std::path::{Path, PathBuf};

use log::debug;

use super::resolution;
use crate::DecodeFailure;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A probed image: where it lives plus its native size.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Horizontal dots per inch declared by the file, if any.
    pub dpi: Option<f32>,
}

impl ImageAsset {
    /// Reads dimensions and resolution from the file header without decoding pixels.
    ///
    /// The file is closed again before this returns.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self, DecodeFailure> {
        let path = path.as_ref();
        let failure = |reason: String| DecodeFailure { path: path.to_path_buf(), reason };

        let reader = image::io::Reader::open(path)
            .map_err(|err| failure(err.to_string()))?
            .with_guessed_format()
            .map_err(|err| failure(err.to_string()))?;
        let format = reader.format().ok_or_else(|| failure("unrecognized image format".into()))?;
        let (width, height) = reader.into_dimensions().map_err(|err| failure(err.to_string()))?;

        if width == 0 || height == 0 {
            return Err(failure(format!("image has empty dimensions {width}x{height}")));
        }

        let dpi = resolution::read_dpi(path, format);
        debug!("probed {} ({width}x{height}, dpi {dpi:?})", path.display());

        Ok(Self { path: path.to_path_buf(), width, height, dpi })
    }
}

/// Whether `path` has one of the extensions accepted for slides.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
