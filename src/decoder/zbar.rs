//! Linear and matrix symbols through the `zedbar` port of zbar.

use zedbar::{DecoderConfig, Image, Scanner, SymbolType};

use super::SymbolDecoder;
use crate::models::{Frame, Point, Symbol, SymbolKind};

/// Barcode decoder backed by `zedbar`.
///
/// Reads EAN-13/8, UPC, Code 39/93/128, Codabar, interleaved 2 of 5 and
/// DataBar as well as QR and SQ codes. A scanner is cheap to build, so one
/// is created per frame and the decoder itself stays shareable.
#[derive(Debug, Clone)]
pub struct ZbarSymbolDecoder {
    config: DecoderConfig,
}

impl ZbarSymbolDecoder {
    /// Decoder with every symbology `zedbar` supports enabled
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::all())
    }

    /// Decoder with a caller-chosen symbology set
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }
}

impl Default for ZbarSymbolDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolDecoder for ZbarSymbolDecoder {
    fn decode(&self, frame: &Frame) -> Vec<Symbol> {
        if frame.is_empty() {
            return Vec::new();
        }
        let gray = frame.to_luma();
        let mut image = match Image::from_gray(gray.as_raw(), gray.width(), gray.height()) {
            Ok(image) => image,
            Err(err) => {
                log::debug!("zbar rejected a {}x{} frame: {}", gray.width(), gray.height(), err);
                return Vec::new();
            }
        };

        let mut scanner = Scanner::with_config(self.config.clone());
        let symbols = scanner.scan(&mut image).into_symbols();
        log::trace!("zbar found {} symbols", symbols.len());

        symbols
            .iter()
            .map(|s| {
                let polygon = s
                    .points()
                    .iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect();
                Symbol::from_polygon(symbol_kind(s.symbol_type()), s.data(), polygon)
            })
            .collect()
    }
}

fn symbol_kind(symbol_type: SymbolType) -> SymbolKind {
    match symbol_type {
        SymbolType::Ean13 => SymbolKind::Ean13,
        SymbolType::Ean8 => SymbolKind::Ean8,
        SymbolType::Upca => SymbolKind::UpcA,
        SymbolType::Upce => SymbolKind::UpcE,
        SymbolType::Code39 => SymbolKind::Code39,
        SymbolType::Code93 => SymbolKind::Code93,
        SymbolType::Code128 => SymbolKind::Code128,
        SymbolType::Codabar => SymbolKind::Codabar,
        SymbolType::I25 => SymbolKind::I25,
        SymbolType::QrCode => SymbolKind::QrCode,
        SymbolType::SqCode => SymbolKind::SqCode,
        other => SymbolKind::Other(other.to_string()),
    }
}
