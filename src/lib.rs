//! scan_grid - live barcode scanning with a multi-panel view
//!
//! Every captured frame is turned into four derived views (grayscale,
//! low-pass, high-pass, adaptive threshold), decoded on the binarized view
//! with a fallback to the raw frame, annotated, captioned and tiled into a
//! single 4×2 grid for display.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Symbol outlines, payload text and text rendering
pub mod annotate;
/// Frame sources, display sinks and the capture loop
pub mod capture;
/// Panel captions and grid composition
pub mod compositor;
/// Pipeline and camera settings
pub mod config;
/// The symbol decoding capability and its zbar and QR backends
pub mod decoder;
/// Error types
pub mod error;
/// Core data structures (Frame, Point, Symbol, etc.)
pub mod models;
/// One tick of processing, independent of I/O
pub mod pipeline;
/// Grayscale, low-pass, high-pass and threshold views
pub mod preprocess;
/// Decode with fallback from the binarized to the raw frame
pub mod strategy;
/// Helpers for the offline tool
pub mod tools;
/// Pixel kernels over flat buffers (grayscale, filters, binarization, geometry)
pub mod utils;

pub use annotate::{AnnotatedFrame, Annotation, Annotator, TextRenderer};
pub use capture::{CaptureLoop, DisplaySink, FrameSource, LoopState, StopReason};
pub use compositor::{CompositeGrid, Compositor, LabeledFrame, Panel, PANEL_COUNT};
pub use config::{CameraConfig, GridLayout, PipelineConfig};
pub use decoder::{DecoderBackend, QrSymbolDecoder, SymbolDecoder, ZbarSymbolDecoder};
pub use error::{CaptureError, ConfigurationError, DisplayError};
pub use models::{BoundingRect, ChannelLayout, Frame, Point, PointI, Symbol, SymbolKind};
pub use pipeline::{FramePipeline, TickOutput};
pub use preprocess::{Preprocessed, Preprocessor};
pub use strategy::{DecodeAttempt, DecodePanels, DecodeStrategy};

/// Run one tick over `frame` with the zbar decoder
///
/// Builds a pipeline from `config` on every call; hold a [`FramePipeline`]
/// when processing a stream.
pub fn process_frame(frame: &Frame, config: &PipelineConfig) -> Result<TickOutput, ConfigurationError> {
    FramePipeline::new(config, ZbarSymbolDecoder::new())?.process(frame)
}
