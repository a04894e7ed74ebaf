//! Tiling labeled panels into one fixed-size grid image.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};
use rayon::prelude::*;

use crate::annotate::TextRenderer;
use crate::config::{GridLayout, PipelineConfig};
use crate::error::ConfigurationError;
use crate::models::{Frame, PointI};

/// Number of panels in a composed grid
pub const PANEL_COUNT: usize = 7;

/// The panels of the grid, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// The raw frame
    Original,
    /// Luma of the raw frame
    Grayscale,
    /// Gaussian blur of the grayscale view
    LowPass,
    /// Laplacian of the low-pass view
    HighPass,
    /// Binarized view handed to the decoder
    AdaptiveThreshold,
    /// Decode of the binarized view
    ProcessedDecoding,
    /// Decode of the raw frame
    OriginalDecoding,
}

impl Panel {
    /// Every panel in display order
    pub const ALL: [Panel; PANEL_COUNT] = [
        Panel::Original,
        Panel::Grayscale,
        Panel::LowPass,
        Panel::HighPass,
        Panel::AdaptiveThreshold,
        Panel::ProcessedDecoding,
        Panel::OriginalDecoding,
    ];

    /// Caption burned into the panel
    pub fn caption(&self) -> &'static str {
        match self {
            Panel::Original => "Original",
            Panel::Grayscale => "Grayscale",
            Panel::LowPass => "Low-Pass Filter",
            Panel::HighPass => "High-Pass Filter",
            Panel::AdaptiveThreshold => "Adaptive Threshold",
            Panel::ProcessedDecoding => "Processed Decoding",
            Panel::OriginalDecoding => "Original Decoding",
        }
    }
}

/// A frame with its caption burned into the top-left corner.
///
/// Captioning never changes the frame's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledFrame {
    frame: Frame,
    caption: String,
}

impl LabeledFrame {
    /// Pair a frame with a caption without drawing it
    pub fn unburned(frame: Frame, caption: impl Into<String>) -> Self {
        Self {
            frame,
            caption: caption.into(),
        }
    }

    /// The captioned pixels
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The caption text
    pub fn caption(&self) -> &str {
        &self.caption
    }
}

/// Composed grid image
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeGrid {
    frame: Frame,
    layout: GridLayout,
}

impl CompositeGrid {
    /// The grid pixels
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Take the grid pixels
    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// Layout the grid was composed with
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Grid width in pixels
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    /// Grid height in pixels
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Copy of the tile at `(row, col)`
    pub fn tile(&self, row: u32, col: u32) -> Option<Frame> {
        if row >= self.layout.rows || col >= self.layout.columns {
            return None;
        }
        let (w, h) = (self.layout.tile_width, self.layout.tile_height);
        let (x, y) = (col * w, row * h);
        Some(match &self.frame {
            Frame::Rgb(img) => Frame::Rgb(imageops::crop_imm(img, x, y, w, h).to_image()),
            Frame::Luma(img) => Frame::Luma(imageops::crop_imm(img, x, y, w, h).to_image()),
        })
    }
}

/// Labels, resizes and tiles panels
#[derive(Debug, Clone)]
pub struct Compositor {
    layout: GridLayout,
    text: Arc<TextRenderer>,
    caption_color: Rgb<u8>,
    caption_scale: f32,
    caption_origin: PointI,
}

impl Compositor {
    /// Create a compositor with the layout and caption style from `config`
    pub fn new(config: &PipelineConfig, text: Arc<TextRenderer>) -> Self {
        let (x, y) = config.caption_origin();
        Self {
            layout: config.layout(),
            text,
            caption_color: config.caption_color(),
            caption_scale: config.caption_scale(),
            caption_origin: PointI::new(x, y),
        }
    }

    /// Grid layout
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Burn `caption` into the top-left corner of `frame`
    pub fn label(&self, mut frame: Frame, caption: &str) -> LabeledFrame {
        self.text.draw(
            &mut frame,
            caption,
            self.caption_origin,
            self.caption_scale,
            self.caption_color,
            2,
        );
        LabeledFrame::unburned(frame, caption)
    }

    /// Tile exactly [`PANEL_COUNT`] labeled frames row-major into the grid.
    ///
    /// Every frame is stretched to the tile size. Cells past the last panel
    /// are zero-filled. All tiles must share one channel layout.
    pub fn compose(&self, frames: &[LabeledFrame]) -> Result<CompositeGrid, ConfigurationError> {
        if frames.len() != PANEL_COUNT {
            return Err(ConfigurationError::PanelCount {
                expected: PANEL_COUNT,
                actual: frames.len(),
            });
        }
        let layout = self.layout;
        if layout.cells() < frames.len() {
            return Err(ConfigurationError::LayoutTooSmall {
                cells: layout.cells(),
                panels: frames.len(),
            });
        }

        let tiles: Vec<Frame> = frames
            .par_iter()
            .map(|f| resize_to_tile(f.frame(), layout.tile_width, layout.tile_height))
            .collect();

        let expected = tiles[0].layout();
        if let Some((index, tile)) = tiles
            .iter()
            .enumerate()
            .find(|(_, t)| t.layout() != expected)
        {
            return Err(ConfigurationError::ChannelMismatch {
                index,
                expected: expected.channels(),
                actual: tile.layout().channels(),
            });
        }

        let mut grid = Frame::blank(layout.grid_width(), layout.grid_height(), expected);
        for (i, tile) in tiles.iter().enumerate() {
            let col = i as u32 % layout.columns;
            let row = i as u32 / layout.columns;
            let x = (col * layout.tile_width) as i64;
            let y = (row * layout.tile_height) as i64;
            match (&mut grid, tile) {
                (Frame::Rgb(dst), Frame::Rgb(src)) => imageops::replace(dst, src, x, y),
                (Frame::Luma(dst), Frame::Luma(src)) => imageops::replace(dst, src, x, y),
                // layouts were checked above
                _ => {}
            }
        }

        Ok(CompositeGrid {
            frame: grid,
            layout,
        })
    }
}

fn resize_to_tile(frame: &Frame, width: u32, height: u32) -> Frame {
    if frame.is_empty() {
        return Frame::blank(width, height, frame.layout());
    }
    if frame.dimensions() == (width, height) {
        return frame.clone();
    }
    match frame {
        Frame::Rgb(img) => {
            let out: RgbImage = imageops::resize(img, width, height, FilterType::Triangle);
            Frame::Rgb(out)
        }
        Frame::Luma(img) => {
            let out: GrayImage = imageops::resize(img, width, height, FilterType::Triangle);
            Frame::Luma(out)
        }
    }
}
