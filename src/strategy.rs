//! Decode-with-fallback over the binarized and raw views of a frame.

use crate::annotate::{AnnotatedFrame, Annotator};
use crate::decoder::SymbolDecoder;
use crate::models::Frame;

/// Result of decoding and annotating one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeAttempt {
    /// Annotated copy of the frame that was decoded
    pub annotated: AnnotatedFrame,
    /// False when the decoder was skipped and `annotated` is a plain copy
    pub attempted: bool,
}

impl DecodeAttempt {
    /// True if at least one symbol was found
    pub fn found(&self) -> bool {
        !self.annotated.annotations.is_empty()
    }

    /// The annotated pixels
    pub fn frame(&self) -> &Frame {
        &self.annotated.frame
    }
}

/// The two decoding panels of a tick
#[derive(Debug, Clone, PartialEq)]
pub struct DecodePanels {
    /// Decode of the binarized view
    pub processed: DecodeAttempt,
    /// Decode of the raw frame, or a plain copy when skipped
    pub original: DecodeAttempt,
}

/// Runs the decoder on the binarized view first and on the raw frame only
/// when that finds nothing.
#[derive(Debug)]
pub struct DecodeStrategy<D> {
    decoder: D,
    annotator: Annotator,
    decode_original_always: bool,
}

impl<D: SymbolDecoder> DecodeStrategy<D> {
    /// Create a strategy.
    ///
    /// With `decode_original_always` the raw frame is decoded even when the
    /// binarized view already produced symbols.
    pub fn new(decoder: D, annotator: Annotator, decode_original_always: bool) -> Self {
        Self {
            decoder,
            annotator,
            decode_original_always,
        }
    }

    /// The wrapped decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Decode `frame` and annotate a copy of it with whatever was found
    pub fn attempt(&self, frame: &Frame) -> DecodeAttempt {
        let symbols = self.decoder.decode(frame);
        for symbol in &symbols {
            log::info!("Decoded {}: {}", symbol.kind, symbol.text());
        }
        DecodeAttempt {
            annotated: self.annotator.annotate(frame, &symbols),
            attempted: true,
        }
    }

    /// Produce the processed and original decoding panels
    pub fn run(&self, raw: &Frame, binarized: &Frame) -> DecodePanels {
        let processed = self.attempt(binarized);

        let original = if !processed.found() || self.decode_original_always {
            if !processed.found() {
                log::debug!("binarized view decoded nothing, falling back to raw frame");
            }
            self.attempt(raw)
        } else {
            DecodeAttempt {
                annotated: AnnotatedFrame::plain(raw),
                attempted: false,
            }
        };

        DecodePanels {
            processed,
            original,
        }
    }
}
