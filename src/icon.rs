//! Raster icon types.
//!
//! This module provides the in-memory representation of a rendered icon and
//! of a set of icons at several sizes.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::{Error, Result};

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// Validates a requested edge length.
///
/// Every proportional measurement of an icon is derived from this value, so
/// zero is rejected up front.
pub fn check_size(size: u32) -> Result<u32> {
    if size == 0 {
        Err(Error::InvalidSize(size))
    } else {
        Ok(size)
    }
}

/// A single rendered icon image.
///
/// Bundles ship the same artwork at several resolutions. macOS additionally
/// pairs a @1x and a @2x image for each logical size; `scale` records which
/// one this is.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// The image data in RGBA format.
    pub data: RgbaImage,

    /// The display scale factor.
    ///
    /// - 1.0 for standard resolution (@1x)
    /// - 2.0 for retina/HiDPI (@2x)
    ///
    /// The "logical" size of the icon is `dimensions / scale`.
    pub scale: f32,
}

impl IconImage {
    /// Creates a new icon image with the given data and scale.
    pub fn new(data: RgbaImage, scale: f32) -> Self {
        Self { data, scale }
    }

    /// Creates a @1x icon image.
    pub fn standard(data: RgbaImage) -> Self {
        Self::new(data, 1.0)
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the pixel edge length (width) of the image.
    pub fn edge(&self) -> u32 {
        self.data.width()
    }

    /// Returns the logical size of the icon (dimensions / scale).
    ///
    /// For a 64x64 @2x icon, the logical size is 32x32.
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.data.width() as f32 / self.scale,
            self.data.height() as f32 / self.scale,
        )
    }

    /// Resamples the image to `size × size` pixels with a Lanczos filter.
    ///
    /// Returns a clone when the image already has that edge length.
    pub fn resized(&self, size: u32, scale: f32) -> Result<IconImage> {
        check_size(size)?;
        let data = if self.data.width() == size && self.data.height() == size {
            self.data.clone()
        } else {
            imageops::resize(&self.data, size, size, FilterType::Lanczos3)
        };
        Ok(IconImage::new(data, scale))
    }

    /// Encodes the image as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.data
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// A collection of icon images representing a single icon at various sizes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    /// The individual icon images.
    pub images: Vec<IconImage>,
}

impl IconSet {
    /// Creates a new empty icon set.
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Creates an icon set from a vector of images.
    pub fn from_images(images: Vec<IconImage>) -> Self {
        Self { images }
    }

    /// Adds an image to the icon set.
    pub fn add_image(&mut self, image: IconImage) {
        self.images.push(image);
    }

    /// Returns the number of images in the set.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if the icon set contains no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the image whose pixel edge is exactly `size`, if any.
    pub fn get(&self, size: u32) -> Option<&IconImage> {
        self.images.iter().find(|img| img.edge() == size)
    }

    /// Returns the image with the largest pixel edge.
    ///
    /// Smaller derived assets are resampled from this one.
    pub fn largest(&self) -> Option<&IconImage> {
        self.images.iter().max_by_key(|img| img.edge())
    }

    /// Returns an iterator over the icon images.
    pub fn iter(&self) -> impl Iterator<Item = &IconImage> {
        self.images.iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a IconImage;
    type IntoIter = std::slice::Iter<'a, IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
