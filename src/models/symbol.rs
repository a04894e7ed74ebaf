use std::borrow::Cow;
use std::fmt;

use super::{BoundingRect, Point};

/// Symbol family reported by a decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    /// QR code (2-D matrix)
    QrCode,
    /// EAN-13 linear code
    Ean13,
    /// EAN-8 linear code
    Ean8,
    /// UPC-A linear code
    UpcA,
    /// Code 39 linear code
    Code39,
    /// UPC-E linear code
    UpcE,
    /// Code 128 linear code
    Code128,
    /// Code 93 linear code
    Code93,
    /// Codabar linear code
    Codabar,
    /// Interleaved 2 of 5
    I25,
    /// SQ code (2-D matrix)
    SqCode,
    /// Any family this crate has no name for
    Other(String),
}

impl SymbolKind {
    /// True for 2-D matrix families
    pub fn is_matrix(&self) -> bool {
        matches!(self, SymbolKind::QrCode | SymbolKind::SqCode)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::QrCode => f.write_str("QRCODE"),
            SymbolKind::Ean13 => f.write_str("EAN13"),
            SymbolKind::Ean8 => f.write_str("EAN8"),
            SymbolKind::UpcA => f.write_str("UPCA"),
            SymbolKind::Code39 => f.write_str("CODE39"),
            SymbolKind::UpcE => f.write_str("UPCE"),
            SymbolKind::Code128 => f.write_str("CODE128"),
            SymbolKind::Code93 => f.write_str("CODE93"),
            SymbolKind::Codabar => f.write_str("CODABAR"),
            SymbolKind::I25 => f.write_str("I25"),
            SymbolKind::SqCode => f.write_str("SQCODE"),
            SymbolKind::Other(name) => f.write_str(name),
        }
    }
}

/// A located, decoded optical symbol.
///
/// Decoder backends translate their native results into this record so the
/// rest of the crate never sees a backend type.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Symbol family
    pub kind: SymbolKind,
    /// Decoded payload bytes
    pub payload: Vec<u8>,
    /// Locating polygon in frame coordinates, not necessarily convex
    pub polygon: Vec<Point>,
    /// Axis-aligned bounds, used to anchor the payload text
    pub rect: BoundingRect,
}

impl Symbol {
    /// Build a symbol whose bounding rectangle is derived from the polygon
    pub fn from_polygon(kind: SymbolKind, payload: impl Into<Vec<u8>>, polygon: Vec<Point>) -> Self {
        let rect = BoundingRect::enclosing(&polygon).unwrap_or_default();
        Self {
            kind,
            payload: payload.into(),
            polygon,
            rect,
        }
    }

    /// Payload as text; invalid UTF-8 sequences are replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(SymbolKind::QrCode.to_string(), "QRCODE");
        assert_eq!(SymbolKind::Code128.to_string(), "CODE128");
        assert_eq!(SymbolKind::Other("PDF417".into()).to_string(), "PDF417");
        assert!(SymbolKind::SqCode.is_matrix());
        assert_eq!(SymbolKind::I25.to_string(), "I25");
        assert!(!SymbolKind::Ean13.is_matrix());
    }

    #[test]
    fn test_from_polygon_rect() {
        let symbol = Symbol::from_polygon(
            SymbolKind::Ean13,
            "4006381333931",
            vec![
                Point::new(20.0, 30.0),
                Point::new(120.0, 30.0),
                Point::new(120.0, 80.0),
                Point::new(20.0, 80.0),
            ],
        );
        assert_eq!(symbol.rect, BoundingRect::new(20, 30, 100, 50));
        assert_eq!(symbol.text(), "4006381333931");
    }

    #[test]
    fn test_text_lossy() {
        let symbol = Symbol::from_polygon(SymbolKind::QrCode, vec![0x68, 0xff, 0x69], vec![]);
        assert_eq!(symbol.text(), "h\u{fffd}i");
        assert_eq!(symbol.rect, BoundingRect::default());
    }
}
