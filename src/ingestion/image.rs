//! Raster image loader (feature `image`).
//!
//! Images are decoded with the `image` crate. The format is guessed from the file content first,
//! so a mislabeled extension still decodes. Images are not schema-validated.

use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::collection::{LoadedCollection, LoadedRow};
use crate::error::{DecodeError, LoadResult, LoadingError};
use crate::resolver::resolve_file;

use super::loader::FileLoader;
use super::observability::{LoadContext, LoadObserver, LoadSeverity, Reporter};
use super::unified::LoadFormat;

/// A decoded image and the container format it was read from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
}

impl LoadedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Loads one image file into a single-row collection.
#[derive(Debug, Clone, Default)]
pub struct ImageLoader {
    reporter: Reporter,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.reporter.observer = Some(observer);
        self
    }

    pub fn with_alert_threshold(mut self, severity: LoadSeverity) -> Self {
        self.reporter.alert_at_or_above = severity;
        self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> LoadResult<LoadedCollection<LoadedImage>> {
        let path = path.as_ref();
        let result = decode_image(path);
        self.reporter.report(
            || LoadContext {
                path: path.to_path_buf(),
                format: LoadFormat::Image,
            },
            &result,
            |c| c.len(),
        );
        result
    }
}

fn decode_image(path: &Path) -> LoadResult<LoadedCollection<LoadedImage>> {
    let file = resolve_file(path)?;
    let io_error = |source| LoadingError::Io {
        path: file.clone(),
        source,
    };
    let reader = ImageReader::open(&file)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;
    let format = reader.format();
    let image = reader.decode().map_err(|e| LoadingError::Decode {
        path: file.clone(),
        position: None,
        source: DecodeError::from(e),
    })?;
    Ok(LoadedCollection::new(
        file.clone(),
        vec![LoadedRow::new(file, LoadedImage { image, format })],
    ))
}

impl FileLoader for ImageLoader {
    type Output = LoadedImage;

    fn format(&self) -> LoadFormat {
        LoadFormat::Image
    }

    fn default_extensions(&self) -> &[&'static str] {
        &[".png", ".jpg", ".jpeg"]
    }

    fn load_file(&self, path: &Path) -> LoadResult<LoadedCollection<LoadedImage>> {
        self.load(path)
    }
}
