//! The set of loaded images and which one is being edited.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::decode::{decode_image, DecodeError, Raster};

/// Stable identifier of a loaded image, unique within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(u64);

impl ImageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img-{}", self.0)
    }
}

/// A decoded image. Never modified after ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    id: ImageId,
    name: String,
    raster: Raster,
}

impl SourceImage {
    pub fn new(id: ImageId, name: impl Into<String>, raster: Raster) -> Self {
        Self {
            id,
            name: name.into(),
            raster,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Original filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }
}

/// A file that could not be decoded.
#[derive(Debug)]
pub struct IngestFailure {
    pub name: String,
    pub error: DecodeError,
}

/// Result of one [`ImageCollection::ingest`] call.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Ids of the images that were added, in input order.
    pub added: Vec<ImageId>,
    pub failed: Vec<IngestFailure>,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered list of source images with an active selection.
///
/// The active index is `None` exactly when the collection is empty.
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<SourceImage>,
    active: Option<usize>,
    next_id: u64,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and append files in order.
    ///
    /// Files that fail to decode are reported and skipped; the rest are
    /// still added.
    pub fn ingest<I, N, B>(&mut self, files: I) -> IngestReport
    where
        I: IntoIterator<Item = (N, B)>,
        N: Into<String>,
        B: AsRef<[u8]>,
    {
        let mut report = IngestReport::default();

        for (name, bytes) in files {
            let name = name.into();
            match decode_image(bytes.as_ref()) {
                Ok(raster) => report.added.push(self.push(name, raster)),
                Err(error) => {
                    warn!(file = %name, %error, "Skipping undecodable image");
                    report.failed.push(IngestFailure { name, error });
                }
            }
        }

        info!(
            added = report.added.len(),
            failed = report.failed.len(),
            total = self.images.len(),
            "Ingested images"
        );
        report
    }

    /// Append an already decoded raster.
    pub fn push(&mut self, name: impl Into<String>, raster: Raster) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.images.push(SourceImage::new(id, name, raster));
        if self.active.is_none() {
            self.active = Some(0);
        }
        id
    }

    /// Make the image at `index` active. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.images.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Remove an image by id, keeping the active index valid.
    ///
    /// Removing the active image selects the one that took its place (or the
    /// new last image).
    pub fn remove(&mut self, id: ImageId) -> Option<SourceImage> {
        let index = self.images.iter().position(|img| img.id == id)?;
        let removed = self.images.remove(index);

        self.active = match self.active {
            _ if self.images.is_empty() => None,
            Some(active) if index < active => Some(active - 1),
            Some(active) => Some(active.min(self.images.len() - 1)),
            None => Some(0),
        };
        Some(removed)
    }

    pub fn active(&self) -> Option<&SourceImage> {
        self.active.and_then(|i| self.images.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn get(&self, id: ImageId) -> Option<&SourceImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(SourceImage::name).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
