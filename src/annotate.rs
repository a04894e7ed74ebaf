//! Drawing located symbols and captions onto frames.

use std::path::Path;
use std::sync::Arc;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Luma, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut, draw_text_mut,
};
use imageproc::point::Point as PixelPoint;

use crate::config::PipelineConfig;
use crate::error::ConfigurationError;
use crate::models::{Frame, Point, PointI, Symbol};
use crate::utils::geometry::outline_polygon;
use crate::utils::grayscale::luminance;

/// DejaVu Sans, drawn when no other font is configured
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Rasterises captions and payload text with a TrueType font.
#[derive(Clone)]
pub struct TextRenderer {
    font: FontArc,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("font", &"<ab_glyph::FontArc>")
            .finish()
    }
}

impl TextRenderer {
    /// Renderer using the font shipped with the crate
    pub fn bundled() -> Result<Self, ConfigurationError> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| ConfigurationError::Font(format!("bundled font: {}", e)))?;
        Ok(Self { font })
    }

    /// Load a TrueType/OpenType font from disk
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let data = std::fs::read(path)
            .map_err(|e| ConfigurationError::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Parse a font from its file contents
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ConfigurationError> {
        let font = FontArc::try_from_vec(data).map_err(|e| ConfigurationError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Renderer for the font named in `config`, or the bundled one
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigurationError> {
        match config.font_path() {
            Some(path) => {
                log::info!("loading font {}", path.display());
                Self::from_file(path)
            }
            None => Self::bundled(),
        }
    }

    /// Draw `text` with its baseline starting at `baseline`.
    ///
    /// `thickness` > 1 overdraws the text shifted right one pixel at a time.
    pub fn draw(
        &self,
        frame: &mut Frame,
        text: &str,
        baseline: PointI,
        scale: f32,
        color: Rgb<u8>,
        thickness: u32,
    ) {
        let font = &self.font;
        let scale = PxScale::from(scale);
        let ascent = font.as_scaled(scale).ascent().round() as i32;
        let top = baseline.y - ascent;

        match frame {
            Frame::Rgb(img) => {
                for dx in 0..thickness.max(1) as i32 {
                    draw_text_mut(img, color, baseline.x + dx, top, scale, font, text);
                }
            }
            Frame::Luma(img) => {
                let Rgb([r, g, b]) = color;
                let luma = Luma([luminance(r, g, b)]);
                for dx in 0..thickness.max(1) as i32 {
                    draw_text_mut(img, luma, baseline.x + dx, top, scale, font, text);
                }
            }
        }
    }
}

/// Text drawn next to a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    /// The text itself
    pub text: String,
    /// Left end of the text baseline
    pub baseline: PointI,
}

/// Everything drawn for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// The symbol as decoded
    pub symbol: Symbol,
    /// Closed polygon actually drawn (hull-reduced when > 4 vertices)
    pub outline: Vec<Point>,
    /// Payload text anchored at the bounding rectangle's top-left corner
    pub label: TextLabel,
}

/// Copy of a frame with symbol annotations burned in
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFrame {
    /// Annotated pixels
    pub frame: Frame,
    /// What was drawn, in symbol order
    pub annotations: Vec<Annotation>,
}

impl AnnotatedFrame {
    /// Unannotated copy of `frame`
    pub fn plain(frame: &Frame) -> Self {
        Self {
            frame: frame.clone(),
            annotations: Vec::new(),
        }
    }
}

/// Draws symbol outlines and payload text
#[derive(Debug, Clone)]
pub struct Annotator {
    text: Arc<TextRenderer>,
    outline_color: Rgb<u8>,
    outline_width: u32,
    payload_color: Rgb<u8>,
    payload_scale: f32,
}

impl Annotator {
    /// Create an annotator with the drawing style from `config`
    pub fn new(config: &PipelineConfig, text: Arc<TextRenderer>) -> Self {
        Self {
            text,
            outline_color: config.outline_color(),
            outline_width: config.outline_width(),
            payload_color: config.payload_color(),
            payload_scale: config.payload_scale(),
        }
    }

    /// Draw every symbol onto a copy of `frame`.
    ///
    /// Intensity frames are promoted to color before drawing. With no
    /// symbols the copy is returned untouched.
    pub fn annotate(&self, frame: &Frame, symbols: &[Symbol]) -> AnnotatedFrame {
        if symbols.is_empty() {
            return AnnotatedFrame::plain(frame);
        }

        let mut canvas = frame.to_rgb();
        let mut annotations = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let outline = outline_polygon(&symbol.polygon);
            draw_closed_polygon(&mut canvas, &outline, self.outline_width, self.outline_color);
            annotations.push(Annotation {
                symbol: symbol.clone(),
                outline,
                label: TextLabel {
                    text: symbol.text().into_owned(),
                    baseline: symbol.rect.top_left(),
                },
            });
        }

        let mut frame = Frame::Rgb(canvas);
        for annotation in &annotations {
            self.text.draw(
                &mut frame,
                &annotation.label.text,
                annotation.label.baseline,
                self.payload_scale,
                self.payload_color,
                2,
            );
        }

        AnnotatedFrame { frame, annotations }
    }
}

/// Connect each vertex to the next, wrapping last to first
pub fn draw_closed_polygon(canvas: &mut RgbImage, polygon: &[Point], width: u32, color: Rgb<u8>) {
    let n = polygon.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        draw_thick_segment(canvas, polygon[i], polygon[(i + 1) % n], width, color);
    }
}

/// Line segment `width` pixels wide with round joints
pub fn draw_thick_segment(canvas: &mut RgbImage, a: Point, b: Point, width: u32, color: Rgb<u8>) {
    draw_line_segment_mut(canvas, (a.x, a.y), (b.x, b.y), color);
    if width <= 1 {
        return;
    }

    let half = width as f32 / 2.0;
    let radius = (half - 0.5).round().max(1.0) as i32;
    let len = a.distance(&b);
    if len >= 1.0 {
        let nx = -(b.y - a.y) / len * half;
        let ny = (b.x - a.x) / len * half;
        let quad = [
            Point::new(a.x + nx, a.y + ny).round(),
            Point::new(b.x + nx, b.y + ny).round(),
            Point::new(b.x - nx, b.y - ny).round(),
            Point::new(a.x - nx, a.y - ny).round(),
        ];
        let quad: Vec<PixelPoint<i32>> = quad.iter().map(|p| PixelPoint::new(p.x, p.y)).collect();
        if quad[0] != quad[quad.len() - 1] {
            draw_polygon_mut(canvas, &quad, color);
        }
    }
    for p in [a.round(), b.round()] {
        draw_filled_circle_mut(canvas, (p.x, p.y), radius, color);
    }
}
