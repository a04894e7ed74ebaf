use std::path::{Path, PathBuf};

use image::Rgb;

use crate::compositor::PANEL_COUNT;
use crate::error::ConfigurationError;
use crate::utils::binarization::AdaptiveMethod;

/// Row-major grid of equally sized tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Tiles per row
    pub columns: u32,
    /// Number of rows
    pub rows: u32,
    /// Width every panel is resized to
    pub tile_width: u32,
    /// Height every panel is resized to
    pub tile_height: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 2,
            tile_width: 320,
            tile_height: 240,
        }
    }
}

impl GridLayout {
    /// Number of cells in the grid
    pub fn cells(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Width of the composed grid
    pub fn grid_width(&self) -> u32 {
        self.columns * self.tile_width
    }

    /// Height of the composed grid
    pub fn grid_height(&self) -> u32 {
        self.rows * self.tile_height
    }
}

/// Constants of the per-frame pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    blur_kernel: u32,
    threshold_block: u32,
    threshold_offset: i32,
    threshold_method: AdaptiveMethod,
    layout: GridLayout,
    outline_color: Rgb<u8>,
    outline_width: u32,
    payload_color: Rgb<u8>,
    payload_scale: f32,
    caption_color: Rgb<u8>,
    caption_scale: f32,
    caption_origin: (i32, i32),
    decode_original_always: bool,
    font_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            threshold_block: 11,
            threshold_offset: 2,
            threshold_method: AdaptiveMethod::Gaussian,
            layout: GridLayout::default(),
            outline_color: Rgb([0, 0, 255]),
            outline_width: 3,
            payload_color: Rgb([255, 255, 0]),
            payload_scale: 15.0,
            caption_color: Rgb([255, 255, 255]),
            caption_scale: 21.0,
            caption_origin: (10, 30),
            decode_original_always: false,
            font_path: None,
        }
    }
}

impl PipelineConfig {
    /// Set the low-pass kernel size (odd)
    pub fn with_blur_kernel(mut self, size: u32) -> Self {
        self.blur_kernel = size;
        self
    }

    /// Set the adaptive threshold block size (odd)
    pub fn with_threshold_block(mut self, size: u32) -> Self {
        self.threshold_block = size;
        self
    }

    /// Set the constant subtracted from the local mean
    pub fn with_threshold_offset(mut self, offset: i32) -> Self {
        self.threshold_offset = offset;
        self
    }

    /// Set how the local mean is weighted
    pub fn with_threshold_method(mut self, method: AdaptiveMethod) -> Self {
        self.threshold_method = method;
        self
    }

    /// Set the grid layout
    pub fn with_layout(mut self, layout: GridLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the symbol outline color and stroke width
    pub fn with_outline(mut self, color: Rgb<u8>, width: u32) -> Self {
        self.outline_color = color;
        self.outline_width = width;
        self
    }

    /// Set the payload text color and pixel height
    pub fn with_payload_text(mut self, color: Rgb<u8>, scale: f32) -> Self {
        self.payload_color = color;
        self.payload_scale = scale;
        self
    }

    /// Set the caption color and pixel height
    pub fn with_caption_text(mut self, color: Rgb<u8>, scale: f32) -> Self {
        self.caption_color = color;
        self.caption_scale = scale;
        self
    }

    /// Decode the raw frame even when the binarized frame already decoded
    pub fn with_decode_original_always(mut self, always: bool) -> Self {
        self.decode_original_always = always;
        self
    }

    /// Draw captions and payload text with this TrueType font instead of the bundled one
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Check every constraint the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.blur_kernel < 3 || self.blur_kernel % 2 == 0 {
            return Err(ConfigurationError::KernelSize(self.blur_kernel));
        }
        if self.threshold_block < 3 || self.threshold_block % 2 == 0 {
            return Err(ConfigurationError::BlockSize(self.threshold_block));
        }
        if self.layout.tile_width == 0 || self.layout.tile_height == 0 {
            return Err(ConfigurationError::EmptyTile);
        }
        if self.layout.cells() < PANEL_COUNT {
            return Err(ConfigurationError::LayoutTooSmall {
                cells: self.layout.cells(),
                panels: PANEL_COUNT,
            });
        }
        Ok(())
    }

    // Getters
    /// Gaussian kernel size
    pub fn blur_kernel(&self) -> u32 {
        self.blur_kernel
    }

    /// Adaptive threshold block size
    pub fn threshold_block(&self) -> u32 {
        self.threshold_block
    }

    /// Constant subtracted from the local mean
    pub fn threshold_offset(&self) -> i32 {
        self.threshold_offset
    }

    /// How the local mean is weighted
    pub fn threshold_method(&self) -> AdaptiveMethod {
        self.threshold_method
    }

    /// Grid layout
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Symbol outline color
    pub fn outline_color(&self) -> Rgb<u8> {
        self.outline_color
    }

    /// Symbol outline width in pixels
    pub fn outline_width(&self) -> u32 {
        self.outline_width
    }

    /// Payload text color
    pub fn payload_color(&self) -> Rgb<u8> {
        self.payload_color
    }

    /// Payload text height in pixels
    pub fn payload_scale(&self) -> f32 {
        self.payload_scale
    }

    /// Caption text color
    pub fn caption_color(&self) -> Rgb<u8> {
        self.caption_color
    }

    /// Caption text height in pixels
    pub fn caption_scale(&self) -> f32 {
        self.caption_scale
    }

    /// Left end of the caption baseline
    pub fn caption_origin(&self) -> (i32, i32) {
        self.caption_origin
    }

    /// Whether the raw frame is decoded even after a binarized hit
    pub fn decode_original_always(&self) -> bool {
        self.decode_original_always
    }

    /// Font overriding the bundled one
    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }
}

/// Settings for a live capture device
#[derive(Clone, Debug)]
pub struct CameraConfig {
    device: String,
    width: u32,
    height: u32,
    fps: u32,
    buffer_count: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 30,
            buffer_count: 4,
        }
    }
}

impl CameraConfig {
    /// Set the device path (e.g., "/dev/video0").
    pub fn with_device(mut self, device: String) -> Self {
        self.device = device;
        self
    }

    /// Set the capture resolution in pixels.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    // Getters
    /// Device path
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Requested frame width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested frame height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Requested frame rate
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of mmap buffers
    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout().grid_width(), 1280);
        assert_eq!(config.layout().grid_height(), 480);
        assert_eq!(config.layout().cells(), 8);
    }

    #[test]
    fn test_rejects_even_kernels() {
        let err = PipelineConfig::default()
            .with_blur_kernel(4)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::KernelSize(4)));

        let err = PipelineConfig::default()
            .with_threshold_block(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::BlockSize(1)));
    }

    #[test]
    fn test_camera_defaults() {
        let camera = CameraConfig::default()
            .with_device("/dev/video2".to_string())
            .with_resolution(1280, 720);
        assert_eq!(camera.device(), "/dev/video2");
        assert_eq!((camera.width(), camera.height()), (1280, 720));
        assert_eq!(camera.fps(), 30);
    }

    #[test]
    fn test_rejects_small_layout() {
        let layout = GridLayout {
            columns: 3,
            rows: 2,
            ..GridLayout::default()
        };
        let err = PipelineConfig::default()
            .with_layout(layout)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::LayoutTooSmall { cells: 6, panels: 7 }
        ));

        let layout = GridLayout {
            tile_width: 0,
            ..GridLayout::default()
        };
        assert!(matches!(
            PipelineConfig::default().with_layout(layout).validate(),
            Err(ConfigurationError::EmptyTile)
        ));
    }
}
