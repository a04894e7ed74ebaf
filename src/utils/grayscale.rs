//! Convert RGB image to grayscale
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses 14-bit fixed point with rounding: Y = (4899*R + 9617*G + 1868*B + 8192) >> 14
//!
//! The coefficients sum to 1 << 14, so pure white maps to 255 and pure
//! black to 0.
use rayon::prelude::*;

const SHIFT: u32 = 14;
const COEF_R: u32 = 4899;
const COEF_G: u32 = 9617;
const COEF_B: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luma of one RGB pixel
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32 + ROUND) >> SHIFT) as u8
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    rgb_to_grayscale_with_buffer(rgb, width, height, &mut gray);
    gray
}

/// Convert RGB image to grayscale into a caller-provided buffer
///
/// `gray` must hold at least `width * height` bytes.
pub fn rgb_to_grayscale_with_buffer(rgb: &[u8], width: usize, height: usize, gray: &mut [u8]) {
    let pixel_count = width * height;
    for (dst, px) in gray[..pixel_count].iter_mut().zip(rgb.chunks_exact(3)) {
        *dst = luminance(px[0], px[1], px[2]);
    }
}

/// Convert RGB image to grayscale, one rayon task per row
///
/// Output is identical to [`rgb_to_grayscale`].
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }
    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &rgb[y * width * 3..(y + 1) * width * 3];
        for (dst, px) in row.iter_mut().zip(src.chunks_exact(3)) {
            *dst = luminance(px[0], px[1], px[2]);
        }
    });
    gray
}
