//! Capture loop behaviour with fake sources and sinks
//!
//! No device or window is touched: the source hands out synthetic frames and
//! the sink only counts what it was shown.

use image::{Rgb, RgbImage};
use scan_grid::capture::{CaptureLoop, DisplaySink, FrameSource, LoopState, StopReason};
use scan_grid::compositor::CompositeGrid;
use scan_grid::error::{CaptureError, DisplayError};
use scan_grid::models::{Frame, Symbol};
use scan_grid::{FramePipeline, PipelineConfig, SymbolDecoder, TextRenderer};
use std::sync::Arc;

struct NeverDecoder;

impl SymbolDecoder for NeverDecoder {
    fn decode(&self, _frame: &Frame) -> Vec<Symbol> {
        Vec::new()
    }
}

/// Yields `frames` synthetic frames, then fails like an unplugged camera
struct FakeSource {
    frames: usize,
    reads: usize,
}

impl FakeSource {
    fn new(frames: usize) -> Self {
        Self { frames, reads: 0 }
    }
}

impl FrameSource for FakeSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.reads += 1;
        if self.reads > self.frames {
            return Err(CaptureError::Stream("device went away".to_string()));
        }
        Ok(Frame::Rgb(RgbImage::from_pixel(64, 48, Rgb([10, 200, 90]))))
    }
}

/// Records shown grids and cancels once `cancel_after` grids were shown
#[derive(Default)]
struct FakeSink {
    shown: Vec<(u32, u32)>,
    cancel_after: Option<usize>,
    fail_show: bool,
}

impl DisplaySink for FakeSink {
    fn show(&mut self, grid: &CompositeGrid) -> Result<(), DisplayError> {
        if self.fail_show {
            return Err(DisplayError::Window("no display".to_string()));
        }
        self.shown.push((grid.width(), grid.height()));
        Ok(())
    }

    fn cancel_requested(&mut self) -> bool {
        self.cancel_after.is_some_and(|n| self.shown.len() >= n)
    }
}

fn pipeline() -> FramePipeline<NeverDecoder> {
    FramePipeline::with_text_renderer(
        &PipelineConfig::default(),
        NeverDecoder,
        Arc::new(TextRenderer::bundled().unwrap()),
    )
    .unwrap()
}

#[test]
fn test_capture_failure_stops_without_display() {
    let mut capture = CaptureLoop::new(FakeSource::new(0), FakeSink::default(), pipeline());

    let reason = capture.run().unwrap();
    assert_eq!(reason, StopReason::CaptureFailed);
    assert_eq!(capture.state(), LoopState::Stopped(StopReason::CaptureFailed));
    assert_eq!(capture.ticks(), 0);

    let (_, sink, _) = capture.into_parts();
    assert!(sink.shown.is_empty());
}

#[test]
fn test_cancel_after_three_ticks() {
    let sink = FakeSink {
        cancel_after: Some(3),
        ..FakeSink::default()
    };
    let mut capture = CaptureLoop::new(FakeSource::new(100), sink, pipeline());

    assert_eq!(capture.run().unwrap(), StopReason::Cancelled);
    assert_eq!(capture.ticks(), 3);

    let (source, sink, _) = capture.into_parts();
    assert_eq!(source.reads, 3);
    assert_eq!(sink.shown, vec![(1280, 480); 3]);
}

#[test]
fn test_source_runs_dry_mid_session() {
    let mut capture = CaptureLoop::new(FakeSource::new(2), FakeSink::default(), pipeline());

    assert_eq!(capture.tick().unwrap(), LoopState::Running);
    assert_eq!(capture.tick().unwrap(), LoopState::Running);
    assert_eq!(
        capture.tick().unwrap(),
        LoopState::Stopped(StopReason::CaptureFailed)
    );
    assert_eq!(capture.ticks(), 2);
}

#[test]
fn test_no_tick_after_stop() {
    let sink = FakeSink {
        cancel_after: Some(1),
        ..FakeSink::default()
    };
    let mut capture = CaptureLoop::new(FakeSource::new(10), sink, pipeline());

    assert_eq!(
        capture.tick().unwrap(),
        LoopState::Stopped(StopReason::Cancelled)
    );
    // Stopped is terminal: further ticks neither read nor show
    for _ in 0..3 {
        assert_eq!(
            capture.tick().unwrap(),
            LoopState::Stopped(StopReason::Cancelled)
        );
    }

    let (source, sink, _) = capture.into_parts();
    assert_eq!(source.reads, 1);
    assert_eq!(sink.shown.len(), 1);
}

#[test]
fn test_display_failure_stops() {
    let sink = FakeSink {
        fail_show: true,
        ..FakeSink::default()
    };
    let mut capture = CaptureLoop::new(FakeSource::new(10), sink, pipeline());

    assert_eq!(capture.run().unwrap(), StopReason::DisplayFailed);
    assert_eq!(capture.ticks(), 0);
}
