use thiserror::Error;

/// Invalid configuration or a violated compositor contract.
///
/// These indicate a programming error and are not recovered from at runtime.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The compositor was handed the wrong number of panels
    #[error("expected {expected} panels, got {actual}")]
    PanelCount {
        /// Panels a grid holds
        expected: usize,
        /// Panels supplied
        actual: usize,
    },
    /// A panel's channel count differs from the first panel's
    #[error("panel {index} has {actual} channels, expected {expected}")]
    ChannelMismatch {
        /// Position of the offending panel
        index: usize,
        /// Channels of the first panel
        expected: usize,
        /// Channels of the offending panel
        actual: usize,
    },
    /// Even or too small blur kernel
    #[error("blur kernel size {0} must be odd and at least 3")]
    KernelSize(u32),
    /// Even or too small threshold block
    #[error("threshold block size {0} must be odd and at least 3")]
    BlockSize(u32),
    /// A tile dimension is zero
    #[error("grid tiles must have non-zero width and height")]
    EmptyTile,
    /// Fewer grid cells than panels
    #[error("grid has {cells} cells but {panels} panels must fit")]
    LayoutTooSmall {
        /// Cells in the layout
        cells: usize,
        /// Panels to place
        panels: usize,
    },
    /// The font file was unreadable or not a TrueType/OpenType font
    #[error("font could not be loaded: {0}")]
    Font(String),
}

/// The capture source could not produce a frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Opening or configuring the device failed
    #[error("capture device error: {0}")]
    Device(String),
    /// The device stopped delivering buffers
    #[error("capture stream error: {0}")]
    Stream(String),
    /// A captured buffer was not a valid image
    #[error("frame decode error: {0}")]
    Decode(#[from] image::ImageError),
    /// A finite source has no frames left
    #[error("capture source exhausted")]
    Exhausted,
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Device(err.to_string())
    }
}

/// The display sink could not accept a grid.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// The window could not be created or updated
    #[error("window error: {0}")]
    Window(String),
    /// Writing the grid to disk failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The grid could not be encoded for writing
    #[error("grid encode error: {0}")]
    Encode(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "device not found");
        let cap_err: CaptureError = io_err.into();

        match cap_err {
            CaptureError::Device(msg) => assert!(msg.contains("device not found")),
            _ => panic!("Expected CaptureError::Device variant"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::PanelCount {
            expected: 7,
            actual: 6,
        };
        assert_eq!(err.to_string(), "expected 7 panels, got 6");

        let err = ConfigurationError::ChannelMismatch {
            index: 3,
            expected: 3,
            actual: 1,
        };
        assert!(err.to_string().contains("panel 3"));

        assert!(
            CaptureError::Stream("streaming failed".to_string())
                .to_string()
                .contains("streaming failed")
        );
        assert!(
            DisplayError::Window("closed".to_string())
                .to_string()
                .contains("closed")
        );
    }
}
