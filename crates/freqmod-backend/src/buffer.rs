//! Image and channel buffers.
//!
//! All buffers are row-major. `RgbImage` interleaves its three planes per
//! pixel, matching the layout the `png` and `image` crates use.

use crate::error::{FmError, FmResult};

fn check_len(width: u32, height: u32, channels: usize, actual: usize) -> FmResult<()> {
    let expected = width as usize * height as usize * channels;
    if expected != actual {
        return Err(FmError::BufferSize {
            width,
            height,
            channels,
            expected,
            actual,
        });
    }
    Ok(())
}

/// An 8-bit RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGB interleaved, row-major).
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Wraps raw RGB8 bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FmResult<Self> {
        check_len(width, height, 3, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image filled with a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgb.repeat(size),
        }
    }

    /// Assembles an image from three equally sized planes.
    pub fn from_planes(planes: [&GreyImage; 3]) -> FmResult<Self> {
        let [r, g, b] = planes;
        let (width, height) = (r.width, r.height);
        for plane in [r, g, b] {
            check_len(width, height, 1, plane.data.len())?;
        }
        let data = r
            .data
            .iter()
            .zip(&g.data)
            .zip(&b.data)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Extracts one colour plane (0 = red, 1 = green, 2 = blue) as floats.
    pub fn plane(&self, index: usize) -> Channel {
        Channel {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .skip(index)
                .step_by(3)
                .map(|&v| f64::from(v))
                .collect(),
        }
    }

    /// Luminance as the plain average of the three planes, unrounded.
    pub fn luminance(&self) -> Channel {
        Channel {
            width: self.width,
            height: self.height,
            data: self
                .data
                .chunks_exact(3)
                .map(|px| (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0)
                .collect(),
        }
    }
}

/// An 8-bit single channel image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreyImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub data: Vec<u8>,
}

impl GreyImage {
    /// Wraps raw 8-bit bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FmResult<Self> {
        check_len(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an image filled with a value.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = value;
    }

    /// Converts to a float channel.
    pub fn to_channel(&self) -> Channel {
        Channel {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f64::from(v)).collect(),
        }
    }
}

/// A floating-point plane, the working representation between stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Width in samples.
    pub width: u32,
    /// Height in rows.
    pub height: u32,
    /// Sample data (row-major).
    pub data: Vec<f64>,
}

impl Channel {
    /// Wraps float samples, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<f64>) -> FmResult<Self> {
        check_len(width, height, 1, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Minimum and maximum sample, or `None` for an empty channel.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        min_max(&self.data)
    }
}

/// Minimum and maximum of a slice, or `None` when empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Output of the overlay: one plane in greyscale mode, three in colour mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayImage {
    /// Single luminance channel.
    Grey(GreyImage),
    /// Three independently processed channels.
    Rgb(RgbImage),
}

impl OverlayImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            OverlayImage::Grey(img) => img.width,
            OverlayImage::Rgb(img) => img.width,
        }
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            OverlayImage::Grey(img) => img.height,
            OverlayImage::Rgb(img) => img.height,
        }
    }

    /// Values per pixel.
    pub fn channels(&self) -> usize {
        match self {
            OverlayImage::Grey(_) => 1,
            OverlayImage::Rgb(_) => 3,
        }
    }

    /// Raw bytes in row-major (interleaved for RGB) order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OverlayImage::Grey(img) => &img.data,
            OverlayImage::Rgb(img) => &img.data,
        }
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            OverlayImage::Grey(img) => &mut img.data,
            OverlayImage::Rgb(img) => &mut img.data,
        }
    }
}
