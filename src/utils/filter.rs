//! Linear filters over single-channel 8-bit buffers
//!
//! - Gaussian low-pass (separable, kernel chosen from size when sigma <= 0)
//! - 3x3 Laplacian high-pass with absolute, saturated 8-bit output

use rayon::prelude::*;

/// How pixels outside the image are synthesised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    /// `gfedcb|abcdefgh|gfedcba`
    Reflect101,
    /// `aaaaaa|abcdefgh|hhhhhhh`
    Replicate,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate into `0..len`
    #[inline]
    pub fn index(&self, i: isize, len: usize) -> usize {
        let n = len as isize;
        match self {
            BorderMode::Replicate => i.clamp(0, n - 1) as usize,
            BorderMode::Reflect101 => {
                if n == 1 {
                    return 0;
                }
                let mut i = i;
                loop {
                    if i < 0 {
                        i = -i;
                    } else if i >= n {
                        i = 2 * (n - 1) - i;
                    } else {
                        return i as usize;
                    }
                }
            }
        }
    }
}

/// Fixed binomial taps used when sigma is derived from a small kernel size
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Sigma implied by a kernel size when none is given
pub fn sigma_for_kernel(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1-D Gaussian kernel of odd `size`.
///
/// With `sigma <= 0` the sigma comes from the size; sizes up to 7 then use
/// fixed binomial taps.
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 && size % 2 == 1 && size <= 7 {
        return SMALL_KERNELS[size / 2].to_vec();
    }
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        sigma_for_kernel(size)
    };
    let center = (size as f32 - 1.0) * 0.5;
    let scale = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Convolve with `kernel` horizontally then vertically.
///
/// The kernel must have odd length. Output is rounded and clamped to 8 bits.
pub fn convolve_separable(
    src: &[u8],
    width: usize,
    height: usize,
    kernel: &[f32],
    border: BorderMode,
) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return out;
    }
    let radius = (kernel.len() / 2) as isize;

    let mut horizontal = vec![0f32; width * height];
    horizontal
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * width..(y + 1) * width];
            for (x, dst) in row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = border.index(x as isize + k as isize - radius, width);
                    acc += w * src_row[sx] as f32;
                }
                *dst = acc;
            }
        });

    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, dst) in row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &w) in kernel.iter().enumerate() {
                let sy = border.index(y as isize + k as isize - radius, height);
                acc += w * horizontal[sy * width + x];
            }
            *dst = acc.round().clamp(0.0, 255.0) as u8;
        }
    });

    out
}

/// Gaussian low-pass filter with a square `ksize` x `ksize` kernel
pub fn gaussian_blur(
    gray: &[u8],
    width: usize,
    height: usize,
    ksize: usize,
    sigma: f32,
    border: BorderMode,
) -> Vec<u8> {
    let kernel = gaussian_kernel(ksize, sigma);
    convolve_separable(gray, width, height, &kernel, border)
}

/// Absolute response of the 4-neighbour Laplacian `[0 1 0; 1 -4 1; 0 1 0]`.
///
/// The signed response spans `-1020..=1020`; its magnitude is saturated at
/// 255 rather than wrapped.
pub fn laplacian_abs(gray: &[u8], width: usize, height: usize, border: BorderMode) -> Vec<u8> {
    let mut out = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return out;
    }
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let yi = y as isize;
        let up = border.index(yi - 1, height) * width;
        let down = border.index(yi + 1, height) * width;
        let here = y * width;
        for (x, dst) in row.iter_mut().enumerate() {
            let xi = x as isize;
            let left = border.index(xi - 1, width);
            let right = border.index(xi + 1, width);
            let response = gray[up + x] as i32
                + gray[down + x] as i32
                + gray[here + left] as i32
                + gray[here + right] as i32
                - 4 * gray[here + x] as i32;
            *dst = response.unsigned_abs().min(255) as u8;
        }
    });
    out
}
