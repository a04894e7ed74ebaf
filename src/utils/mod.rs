//! Utility functions for image processing
//!
//! Pixel kernels over flat 8-bit buffers used by the preprocessor:
//! - Grayscale conversion (RGB to luminance)
//! - Linear filters (Gaussian low-pass, Laplacian high-pass)
//! - Binarization (adaptive, plus Otsu and fixed threshold for the tools)
//! - Geometry (convex hull and polygon tests for symbol outlines)

pub mod binarization;
pub mod filter;
pub mod geometry;
pub mod grayscale;
