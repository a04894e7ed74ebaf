use std::sync::Arc;
use std::time::Instant;

use crate::annotate::{Annotator, TextRenderer};
use crate::compositor::{CompositeGrid, Compositor, LabeledFrame, Panel};
use crate::config::PipelineConfig;
use crate::decoder::SymbolDecoder;
use crate::error::ConfigurationError;
use crate::models::Frame;
use crate::preprocess::{Preprocessed, Preprocessor};
use crate::strategy::{DecodePanels, DecodeStrategy};

/// Everything one tick produced
#[derive(Debug, Clone)]
pub struct TickOutput {
    /// Derived views of the raw frame
    pub preprocessed: Preprocessed,
    /// Processed and original decoding panels
    pub panels: DecodePanels,
    /// The composed grid handed to the display
    pub grid: CompositeGrid,
}

/// One frame's worth of data transformation, free of any I/O:
/// preprocess, decode with fallback, caption every panel, compose.
#[derive(Debug)]
pub struct FramePipeline<D> {
    preprocessor: Preprocessor,
    strategy: DecodeStrategy<D>,
    compositor: Compositor,
}

impl<D: SymbolDecoder> FramePipeline<D> {
    /// Validate `config`, load its font and build the pipeline
    pub fn new(config: &PipelineConfig, decoder: D) -> Result<Self, ConfigurationError> {
        let text = Arc::new(TextRenderer::from_config(config)?);
        Self::with_text_renderer(config, decoder, text)
    }

    /// Build the pipeline around an already loaded text renderer
    pub fn with_text_renderer(
        config: &PipelineConfig,
        decoder: D,
        text: Arc<TextRenderer>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let annotator = Annotator::new(config, Arc::clone(&text));
        Ok(Self {
            preprocessor: Preprocessor::new(config),
            strategy: DecodeStrategy::new(decoder, annotator, config.decode_original_always()),
            compositor: Compositor::new(config, text),
        })
    }

    /// The decode strategy, for access to the decoder
    pub fn strategy(&self) -> &DecodeStrategy<D> {
        &self.strategy
    }

    /// Run every transformation of one tick over `frame`
    pub fn process(&self, frame: &Frame) -> Result<TickOutput, ConfigurationError> {
        let start = Instant::now();
        let preprocessed = self.preprocessor.preprocess(frame);
        let preprocess_time = start.elapsed();

        let panels = self.strategy.run(frame, &preprocessed.binarized);
        let decode_time = start.elapsed() - preprocess_time;

        let sources = [
            frame,
            &preprocessed.grayscale,
            &preprocessed.blurred,
            &preprocessed.edges,
            &preprocessed.binarized,
            panels.processed.frame(),
            panels.original.frame(),
        ];
        let labeled: Vec<LabeledFrame> = sources
            .into_iter()
            .zip(Panel::ALL)
            .map(|(f, panel)| self.compositor.label(f.clone().into_rgb(), panel.caption()))
            .collect();
        let grid = self.compositor.compose(&labeled)?;

        log::debug!(
            "tick: preprocess {:?}, decode {:?}, total {:?}",
            preprocess_time,
            decode_time,
            start.elapsed()
        );

        Ok(TickOutput {
            preprocessed,
            panels,
            grid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Symbol;
    use image::{Luma, Rgb, RgbImage};

    #[derive(Debug)]
    struct NeverDecoder;

    impl SymbolDecoder for NeverDecoder {
        fn decode(&self, _frame: &Frame) -> Vec<Symbol> {
            Vec::new()
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
    fn test_process_grid_shape() {
        let frame = Frame::Rgb(RgbImage::from_pixel(640, 480, Rgb([120, 60, 30])));
        let out = pipeline().process(&frame).unwrap();
        assert_eq!((out.grid.width(), out.grid.height()), (1280, 480));
        assert!(!out.panels.processed.found());
        assert!(out.panels.original.attempted);
        // Original panel is the raw frame scaled down
        assert_eq!(out.grid.frame().rgb_at(100, 100), [120, 60, 30]);
    }

    #[test]
    fn test_intensity_input_is_promoted() {
        let frame = Frame::Luma(image::GrayImage::from_pixel(100, 80, Luma([77])));
        let out = pipeline().process(&frame).unwrap();
        assert_eq!(out.grid.frame().rgb_at(5, 5), [77, 77, 77]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig::default().with_blur_kernel(6);
        let text = Arc::new(TextRenderer::bundled().unwrap());
        let err = FramePipeline::with_text_renderer(&config, NeverDecoder, text).unwrap_err();
        assert!(matches!(err, ConfigurationError::KernelSize(6)));

        // the decoder-free path reports the same error
        assert!(matches!(
            FramePipeline::new(&config, NeverDecoder),
            Err(ConfigurationError::KernelSize(6))
        ));
    }
}
