//! Symbol decoding capability
//!
//! The pipeline only sees [`SymbolDecoder`]: a pure function from pixels to
//! located symbols. Backends translate their native results into
//! [`Symbol`](crate::models::Symbol) records at this boundary.

/// QR-only backend over `rqrr`
pub mod qr;
pub mod zbar;

pub use qr::QrSymbolDecoder;
pub use zbar::ZbarSymbolDecoder;

use std::fmt;
use std::str::FromStr;

use crate::models::{Frame, Symbol};

/// Locates and decodes optical symbols in a frame.
///
/// Implementations must not mutate the frame and should return an empty
/// vector when nothing is found; a miss is not an error.
pub trait SymbolDecoder {
    /// Decode every symbol visible in `frame`
    fn decode(&self, frame: &Frame) -> Vec<Symbol>;
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for &D {
    fn decode(&self, frame: &Frame) -> Vec<Symbol> {
        (**self).decode(frame)
    }
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for Box<D> {
    fn decode(&self, frame: &Frame) -> Vec<Symbol> {
        (**self).decode(frame)
    }
}

/// Decoder engines selectable at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderBackend {
    /// `zedbar`: linear barcodes plus QR and SQ codes
    #[default]
    Zbar,
    /// `rqrr`: QR codes only
    Qr,
}

impl DecoderBackend {
    /// Build the engine
    pub fn build(self) -> Box<dyn SymbolDecoder> {
        match self {
            DecoderBackend::Zbar => Box::new(ZbarSymbolDecoder::new()),
            DecoderBackend::Qr => Box::new(QrSymbolDecoder::new()),
        }
    }
}

impl fmt::Display for DecoderBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderBackend::Zbar => f.write_str("zbar"),
            DecoderBackend::Qr => f.write_str("qr"),
        }
    }
}

impl FromStr for DecoderBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zbar" => Ok(DecoderBackend::Zbar),
            "qr" | "rqrr" => Ok(DecoderBackend::Qr),
            other => Err(format!("unknown decoder '{}', expected zbar or qr", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_backend_parse() {
        assert_eq!("zbar".parse::<DecoderBackend>(), Ok(DecoderBackend::Zbar));
        assert_eq!("QR".parse::<DecoderBackend>(), Ok(DecoderBackend::Qr));
        assert!("pdf417".parse::<DecoderBackend>().is_err());
        assert_eq!(DecoderBackend::default().to_string(), "zbar");
    }

    #[test]
    fn test_boxed_backends_decode_blank() {
        let blank = Frame::Luma(GrayImage::from_pixel(32, 32, Luma([255])));
        for backend in [DecoderBackend::Zbar, DecoderBackend::Qr] {
            assert!(backend.build().decode(&blank).is_empty(), "{}", backend);
        }
    }
}
