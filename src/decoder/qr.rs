use rqrr::PreparedImage;

use super::SymbolDecoder;
use crate::models::{Frame, Point, Symbol, SymbolKind};

/// QR code decoder backed by `rqrr`
#[derive(Debug, Clone, Copy, Default)]
pub struct QrSymbolDecoder;

impl QrSymbolDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl SymbolDecoder for QrSymbolDecoder {
    fn decode(&self, frame: &Frame) -> Vec<Symbol> {
        if frame.is_empty() {
            return Vec::new();
        }
        let gray = frame.to_luma();
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        let raw = gray.as_raw();

        let mut prepared = PreparedImage::prepare_from_greyscale(w, h, |x, y| raw[y * w + x]);
        let grids = prepared.detect_grids();
        log::trace!("rqrr found {} candidate grids", grids.len());

        grids
            .iter()
            .filter_map(|grid| match grid.decode() {
                Ok((_meta, content)) => Some(symbol_from_corners(
                    grid.bounds.iter().map(|p| (p.x, p.y)),
                    content.into_bytes(),
                )),
                Err(err) => {
                    log::debug!("QR grid located but not decoded: {:?}", err);
                    None
                }
            })
            .collect()
    }
}

/// Build a QR symbol from the decoder's corner points
fn symbol_from_corners(corners: impl Iterator<Item = (i32, i32)>, payload: Vec<u8>) -> Symbol {
    let polygon: Vec<Point> = corners
        .map(|(x, y)| Point::new(x as f32, y as f32))
        .collect();
    Symbol::from_polygon(SymbolKind::QrCode, payload, polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingRect;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_blank_frame_has_no_symbols() {
        let frame = Frame::Rgb(RgbImage::from_pixel(64, 48, Rgb([255, 255, 255])));
        assert!(QrSymbolDecoder::new().decode(&frame).is_empty());
    }

    #[test]
    fn test_empty_frame_has_no_symbols() {
        let frame = Frame::Rgb(RgbImage::new(0, 0));
        assert!(QrSymbolDecoder::new().decode(&frame).is_empty());
    }

    #[test]
    fn test_symbol_from_corners() {
        let corners = [(10, 12), (60, 10), (62, 58), (9, 61)];
        let symbol = symbol_from_corners(corners.into_iter(), b"hello".to_vec());
        assert_eq!(symbol.kind, SymbolKind::QrCode);
        assert_eq!(symbol.polygon.len(), 4);
        assert_eq!(symbol.rect, BoundingRect::new(9, 10, 53, 51));
        assert_eq!(symbol.text(), "hello");
    }
}
