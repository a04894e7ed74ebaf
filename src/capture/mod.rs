//! Capture loop and its I/O collaborators.
//!
//! The loop owns a [`FrameSource`], a [`DisplaySink`] and a
//! [`FramePipeline`]; nothing is global, so tests drive it with fakes.

/// Still images in, PNG files out
pub mod still;
/// Video4Linux camera source
#[cfg(feature = "v4l2")]
pub mod v4l2;
/// Desktop window sink
#[cfg(feature = "window")]
pub mod window;

pub use still::{PngSink, StillImageSource};
#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Source;
#[cfg(feature = "window")]
pub use window::WindowSink;

use crate::compositor::CompositeGrid;
use crate::decoder::SymbolDecoder;
use crate::error::{CaptureError, ConfigurationError, DisplayError};
use crate::models::Frame;
use crate::pipeline::FramePipeline;

/// Produces raw frames, blocking until one is available
pub trait FrameSource {
    /// Next frame, or an error if the source cannot produce one
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Shows composed grids and reports the cancellation signal
pub trait DisplaySink {
    /// Present one grid
    fn show(&mut self, grid: &CompositeGrid) -> Result<(), DisplayError>;

    /// Poll for the cancellation signal; called once after each `show`
    fn cancel_requested(&mut self) -> bool;
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The display reported the cancellation signal
    Cancelled,
    /// The source failed to produce a frame
    CaptureFailed,
    /// The display could not accept a grid
    DisplayFailed,
}

/// Capture loop state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ticks will keep running
    Running,
    /// No further ticks run
    Stopped(StopReason),
}

/// Single-threaded capture → process → display loop
#[derive(Debug)]
pub struct CaptureLoop<S, K, D> {
    source: S,
    sink: K,
    pipeline: FramePipeline<D>,
    state: LoopState,
    ticks: u64,
}

impl<S, K, D> CaptureLoop<S, K, D>
where
    S: FrameSource,
    K: DisplaySink,
    D: SymbolDecoder,
{
    /// Create a loop in the `Running` state
    pub fn new(source: S, sink: K, pipeline: FramePipeline<D>) -> Self {
        Self {
            source,
            sink,
            pipeline,
            state: LoopState::Running,
            ticks: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of ticks that reached the display
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick to completion.
    ///
    /// Does nothing once stopped. A configuration error means the pipeline
    /// itself is broken and is returned to the caller unchanged.
    pub fn tick(&mut self) -> Result<LoopState, ConfigurationError> {
        if self.state != LoopState::Running {
            return Ok(self.state);
        }

        let frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Failed to grab frame: {}", err);
                return Ok(self.stop(StopReason::CaptureFailed));
            }
        };

        let output = self.pipeline.process(&frame)?;

        if let Err(err) = self.sink.show(&output.grid) {
            log::error!("Failed to display grid: {}", err);
            return Ok(self.stop(StopReason::DisplayFailed));
        }
        self.ticks += 1;

        if self.sink.cancel_requested() {
            return Ok(self.stop(StopReason::Cancelled));
        }
        Ok(self.state)
    }

    /// Tick until the loop stops
    pub fn run(&mut self) -> Result<StopReason, ConfigurationError> {
        log::info!("capture loop started");
        loop {
            if let LoopState::Stopped(reason) = self.tick()? {
                log::info!("capture loop stopped after {} ticks: {:?}", self.ticks, reason);
                return Ok(reason);
            }
        }
    }

    /// Give back the collaborators
    pub fn into_parts(self) -> (S, K, FramePipeline<D>) {
        (self.source, self.sink, self.pipeline)
    }

    fn stop(&mut self, reason: StopReason) -> LoopState {
        self.state = LoopState::Stopped(reason);
        self.state
    }
}
