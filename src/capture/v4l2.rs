use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

use super::FrameSource;
use crate::config::CameraConfig;
use crate::error::CaptureError;
use crate::models::Frame;

/// Synchronous V4L2 capture of MJPEG frames
pub struct V4l2Source {
    config: CameraConfig,
    stream: MmapStream<'static>,
    // Kept open for the lifetime of the stream
    _device: Device,
}

impl std::fmt::Debug for V4l2Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Source")
            .field("config", &self.config)
            .field("device", &"<v4l::Device>")
            .finish()
    }
}

impl V4l2Source {
    /// Open the device, request MJPEG at the configured resolution and
    /// start streaming.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::Device` if the device cannot be opened,
    /// rejects MJPEG, or refuses the format or frame rate.
    pub fn new(config: CameraConfig) -> Result<Self, CaptureError> {
        let device = Device::with_path(config.device())?;

        let mut format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        format = Capture::set_format(&device, &format)?;
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CaptureError::Device(
                "MJPEG format not supported by device".to_string(),
            ));
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, config.buffer_count())?;
        log::info!(
            "opened {} at {}x{} MJPEG, {} fps",
            config.device(),
            format.width,
            format.height,
            config.fps()
        );

        Ok(Self {
            config,
            stream,
            _device: device,
        })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

impl FrameSource for V4l2Source {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let (data, _meta) = CaptureStream::next(&mut self.stream)
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        // The buffer is only valid until the next call, decode it now
        let img = image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)?;
        Ok(Frame::Rgb(img.to_rgb8()))
    }
}
