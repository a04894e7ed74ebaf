//! Derived views of a captured frame.
//!
//! One color frame becomes four intensity views, each computed from the
//! previous one: grayscale, Gaussian low-pass, absolute Laplacian high-pass
//! and an adaptive threshold of the high-pass response. All four are
//! returned with three channels so they tile next to the color original.

use image::GrayImage;

use crate::config::PipelineConfig;
use crate::models::Frame;
use crate::utils::binarization::{AdaptiveMethod, adaptive_threshold};
use crate::utils::filter::{BorderMode, gaussian_blur, laplacian_abs};

/// The four derived views of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    /// Color-to-intensity conversion
    pub grayscale: Frame,
    /// Low-pass filtered grayscale
    pub blurred: Frame,
    /// High-pass (edge) response of the blurred view
    pub edges: Frame,
    /// Adaptive threshold of the edge response, strictly 0 or 255
    pub binarized: Frame,
}

impl Preprocessed {
    /// Views in display order
    pub fn views(&self) -> [&Frame; 4] {
        [&self.grayscale, &self.blurred, &self.edges, &self.binarized]
    }
}

/// Stateless frame preprocessor
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    blur_kernel: usize,
    threshold_block: usize,
    threshold_offset: i32,
    threshold_method: AdaptiveMethod,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl Preprocessor {
    /// Create a preprocessor from the filter settings in `config`
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            blur_kernel: config.blur_kernel() as usize,
            threshold_block: config.threshold_block() as usize,
            threshold_offset: config.threshold_offset(),
            threshold_method: config.threshold_method(),
        }
    }

    /// Derive grayscale, blurred, edge and binarized views of `frame`.
    ///
    /// Output dimensions always equal the input's. The same input bytes
    /// always produce the same output bytes.
    pub fn preprocess(&self, frame: &Frame) -> Preprocessed {
        let gray = frame.to_luma();
        let (width, height) = (gray.width(), gray.height());
        let (w, h) = (width as usize, height as usize);

        let blurred = gaussian_blur(
            gray.as_raw(),
            w,
            h,
            self.blur_kernel,
            0.0,
            BorderMode::Reflect101,
        );
        let edges = laplacian_abs(&blurred, w, h, BorderMode::Reflect101);
        let binarized = adaptive_threshold(
            &edges,
            w,
            h,
            self.threshold_block,
            self.threshold_offset,
            self.threshold_method,
        );

        let to_frame = |data: Vec<u8>| {
            GrayImage::from_raw(width, height, data)
                .map(Frame::Luma)
                .unwrap_or_else(|| Frame::Luma(GrayImage::new(width, height)))
                .into_rgb()
        };

        let ((grayscale, blurred), (edges, binarized)) = rayon::join(
            || rayon::join(|| Frame::Luma(gray).into_rgb(), || to_frame(blurred)),
            || rayon::join(|| to_frame(edges), || to_frame(binarized)),
        );

        Preprocessed {
            grayscale,
            blurred,
            edges,
            binarized,
        }
    }
}
