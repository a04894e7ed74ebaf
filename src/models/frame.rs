use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::utils::grayscale::rgb_to_grayscale_parallel;

/// Pixel encoding of a [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Single-channel 8-bit intensity
    Luma,
    /// Three-channel 8-bit color, R G B order
    Rgb,
}

impl ChannelLayout {
    /// Number of bytes per pixel
    pub fn channels(&self) -> usize {
        match self {
            ChannelLayout::Luma => 1,
            ChannelLayout::Rgb => 3,
        }
    }
}

/// Rectangular 8-bit pixel buffer with a known channel layout.
///
/// Transforms take `&Frame` and return a new `Frame`; nothing in the crate
/// mutates a frame it did not just create.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Intensity image
    Luma(GrayImage),
    /// Color image
    Rgb(RgbImage),
}

impl Frame {
    /// Wrap raw RGB bytes (3 bytes per pixel, row-major).
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn from_rgb_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Frame::Rgb)
    }

    /// Wrap raw intensity bytes (1 byte per pixel, row-major).
    pub fn from_luma_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        GrayImage::from_raw(width, height, data).map(Frame::Luma)
    }

    /// All-zero frame with the given size and layout
    pub fn blank(width: u32, height: u32, layout: ChannelLayout) -> Self {
        match layout {
            ChannelLayout::Luma => Frame::Luma(GrayImage::new(width, height)),
            ChannelLayout::Rgb => Frame::Rgb(RgbImage::new(width, height)),
        }
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        match self {
            Frame::Luma(img) => img.width(),
            Frame::Rgb(img) => img.width(),
        }
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        match self {
            Frame::Luma(img) => img.height(),
            Frame::Rgb(img) => img.height(),
        }
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Channel layout of the pixel data
    pub fn layout(&self) -> ChannelLayout {
        match self {
            Frame::Luma(_) => ChannelLayout::Luma,
            Frame::Rgb(_) => ChannelLayout::Rgb,
        }
    }

    /// True when the frame has no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Raw pixel bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Frame::Luma(img) => img.as_raw(),
            Frame::Rgb(img) => img.as_raw(),
        }
    }

    /// Intensity view of the frame. Color frames are converted, intensity
    /// frames are copied.
    pub fn to_luma(&self) -> GrayImage {
        match self {
            Frame::Luma(img) => img.clone(),
            Frame::Rgb(img) => {
                let gray = rgb_to_grayscale_parallel(
                    img.as_raw(),
                    img.width() as usize,
                    img.height() as usize,
                );
                // Length always matches: one byte per source pixel.
                GrayImage::from_raw(img.width(), img.height(), gray)
                    .unwrap_or_else(|| GrayImage::new(img.width(), img.height()))
            }
        }
    }

    /// Color view of the frame. Intensity frames are replicated into all
    /// three channels, color frames are copied.
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Frame::Rgb(img) => img.clone(),
            Frame::Luma(img) => gray_to_rgb(img),
        }
    }

    /// Same frame re-expressed with three channels
    pub fn into_rgb(self) -> Frame {
        match self {
            Frame::Luma(img) => Frame::Rgb(gray_to_rgb(&img)),
            rgb => rgb,
        }
    }

    /// Pixel at `(x, y)` as RGB. Intensity is replicated.
    ///
    /// # Panics
    /// Panics if the coordinate is out of bounds.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        match self {
            Frame::Rgb(img) => img.get_pixel(x, y).0,
            Frame::Luma(img) => {
                let Luma([v]) = *img.get_pixel(x, y);
                [v, v, v]
            }
        }
    }
}

fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        Rgb([v, v, v])
    })
}

impl From<RgbImage> for Frame {
    fn from(img: RgbImage) -> Self {
        Frame::Rgb(img)
    }
}

impl From<GrayImage> for Frame {
    fn from(img: GrayImage) -> Self {
        Frame::Luma(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Frame::from_rgb_raw(2, 2, vec![0; 12]).is_some());
        assert!(Frame::from_rgb_raw(2, 2, vec![0; 11]).is_none());
        assert!(Frame::from_luma_raw(3, 1, vec![0; 3]).is_some());
    }

    #[test]
    fn test_luma_to_rgb_replicates() {
        let frame = Frame::from_luma_raw(2, 1, vec![10, 200]).unwrap();
        let rgb = frame.clone().into_rgb();
        assert_eq!(rgb.layout(), ChannelLayout::Rgb);
        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.rgb_at(0, 0), [10, 10, 10]);
        assert_eq!(rgb.rgb_at(1, 0), [200, 200, 200]);
        assert_eq!(frame.layout().channels(), 1);
    }

    #[test]
    fn test_rgb_to_luma_extremes() {
        let frame = Frame::from_rgb_raw(2, 1, vec![0, 0, 0, 255, 255, 255]).unwrap();
        let gray = frame.to_luma();
        assert_eq!(gray.as_raw(), &vec![0, 255]);
    }

    #[test]
    fn test_blank() {
        let frame = Frame::blank(4, 3, ChannelLayout::Rgb);
        assert_eq!(frame.as_raw().len(), 36);
        assert!(frame.as_raw().iter().all(|&v| v == 0));
        assert!(!frame.is_empty());
        assert!(Frame::blank(0, 3, ChannelLayout::Luma).is_empty());
    }
}
