use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::{DisplaySink, FrameSource};
use crate::compositor::CompositeGrid;
use crate::error::{CaptureError, DisplayError};
use crate::models::Frame;

/// Replays a fixed list of frames once, then reports exhaustion
#[derive(Debug, Default)]
pub struct StillImageSource {
    frames: VecDeque<Frame>,
}

impl StillImageSource {
    /// Source over in-memory frames
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Load each image file as an RGB frame
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self, CaptureError> {
        let mut frames = VecDeque::with_capacity(paths.len());
        for path in paths {
            let img = image::open(path.as_ref())?;
            frames.push_back(Frame::Rgb(img.to_rgb8()));
        }
        Ok(Self { frames })
    }

    /// Frames not yet read
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for StillImageSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.frames.pop_front().ok_or(CaptureError::Exhausted)
    }
}

#[derive(Debug, Clone)]
enum PngTarget {
    File(PathBuf),
    Numbered(PathBuf),
}

/// Writes each grid as a PNG. Never requests cancellation.
#[derive(Debug, Clone)]
pub struct PngSink {
    target: PngTarget,
    written: Vec<PathBuf>,
}

impl PngSink {
    /// Write every grid to `path`, replacing the previous one
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: PngTarget::File(path.into()),
            written: Vec::new(),
        }
    }

    /// Write grids to `dir/grid_0000.png`, `dir/grid_0001.png`, ...
    pub fn numbered(dir: impl Into<PathBuf>) -> Self {
        Self {
            target: PngTarget::Numbered(dir.into()),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn next_path(&self) -> PathBuf {
        match &self.target {
            PngTarget::File(path) => path.clone(),
            PngTarget::Numbered(dir) => dir.join(format!("grid_{:04}.png", self.written.len())),
        }
    }
}

impl DisplaySink for PngSink {
    fn show(&mut self, grid: &CompositeGrid) -> Result<(), DisplayError> {
        let path = self.next_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        match grid.frame() {
            Frame::Rgb(img) => img.save_with_format(&path, image::ImageFormat::Png)?,
            Frame::Luma(img) => img.save_with_format(&path, image::ImageFormat::Png)?,
        }
        log::debug!("wrote grid to {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn cancel_requested(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_still_source_exhausts() {
        let mut source = StillImageSource::from_frames([Frame::Rgb(RgbImage::new(4, 4))]);
        assert_eq!(source.remaining(), 1);
        assert!(source.read_frame().is_ok());
        assert!(matches!(source.read_frame(), Err(CaptureError::Exhausted)));
    }

    #[test]
    fn test_missing_file_is_capture_error() {
        let err = StillImageSource::from_paths(&["/nonexistent/frame.png"]).unwrap_err();
        assert!(matches!(err, CaptureError::Decode(_)));
    }

    #[test]
    fn test_numbered_paths() {
        let sink = PngSink::numbered("/tmp/grids");
        assert_eq!(sink.next_path(), PathBuf::from("/tmp/grids/grid_0000.png"));
        assert!(sink.written().is_empty());
    }
}
