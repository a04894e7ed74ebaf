//! Binarization of 8-bit intensity buffers.
//!
//! Every function here returns a strictly two-valued buffer: `255` for pixels
//! that pass the test, `0` otherwise.

use super::filter::{BorderMode, convolve_separable, gaussian_blur};

/// Value written for pixels above threshold
pub const WHITE: u8 = 255;
/// Value written for pixels at or below threshold
pub const BLACK: u8 = 0;

/// How the local threshold is computed from the neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveMethod {
    /// Unweighted mean of the block
    Mean,
    /// Gaussian-weighted mean of the block (sigma derived from block size)
    Gaussian,
}

/// Adaptive threshold: a pixel is white when it exceeds the mean of its
/// `block` x `block` neighborhood minus `offset`.
///
/// The local mean is rounded to 8 bits before the comparison and borders
/// replicate the edge pixels. `block` must be odd.
pub fn adaptive_threshold(
    gray: &[u8],
    width: usize,
    height: usize,
    block: usize,
    offset: i32,
    method: AdaptiveMethod,
) -> Vec<u8> {
    let mean = match method {
        AdaptiveMethod::Gaussian => {
            gaussian_blur(gray, width, height, block, 0.0, BorderMode::Replicate)
        }
        AdaptiveMethod::Mean => {
            let kernel = vec![1.0 / block as f32; block];
            convolve_separable(gray, width, height, &kernel, BorderMode::Replicate)
        }
    };

    gray.iter()
        .zip(mean.iter())
        .map(|(&src, &m)| {
            if src as i32 - m as i32 > -offset {
                WHITE
            } else {
                BLACK
            }
        })
        .collect()
}

/// Calculate Otsu's optimal threshold.
///
/// Pixels with `value >= threshold` form the bright class.
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut dark_count = 0f64;
    let mut dark_sum = 0f64;
    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;

    // threshold t puts intensities 0..t in the dark class
    for t in 1..=255usize {
        dark_count += histogram[t - 1] as f64;
        dark_sum += (t - 1) as f64 * histogram[t - 1] as f64;
        let bright_count = total - dark_count;
        if dark_count == 0.0 || bright_count == 0.0 {
            continue;
        }

        let dark_mean = dark_sum / dark_count;
        let bright_mean = (total_sum - dark_sum) / bright_count;
        let variance = (dark_count / total) * (bright_count / total) * (dark_mean - bright_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = t as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], threshold: u8) -> Vec<u8> {
    gray.iter()
        .map(|&v| if v >= threshold { WHITE } else { BLACK })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = vec![100, 150, 200, 50]; // 2x2 image
        let binary = threshold_binarize(&gray, 128);
        assert_eq!(binary, vec![BLACK, WHITE, WHITE, BLACK]);
    }

    #[test]
    fn test_otsu_threshold() {
        // Create a simple two-class image
        let mut gray = vec![50u8; 50]; // Dark class
        gray.extend(vec![200u8; 50]); // Light class

        let threshold = calculate_otsu_threshold(&gray);
        assert!(threshold > 50 && threshold <= 200);

        let binary = threshold_binarize(&gray, threshold);
        assert_eq!(binary[0], BLACK);
        assert_eq!(binary[70], WHITE);
    }

    #[test]
    fn test_adaptive_flat_is_white() {
        // src - mean == 0 > -2 everywhere
        let gray = vec![17u8; 30 * 20];
        for method in [AdaptiveMethod::Gaussian, AdaptiveMethod::Mean] {
            let out = adaptive_threshold(&gray, 30, 20, 11, 2, method);
            assert!(out.iter().all(|&v| v == WHITE));
        }
    }

    #[test]
    fn test_adaptive_is_two_valued_and_tracks_local_contrast() {
        let (w, h) = (40, 40);
        // Left half dim, right half bright, each with a dark dot
        let mut gray: Vec<u8> = (0..w * h)
            .map(|i| if i % w < w / 2 { 60 } else { 220 })
            .collect();
        gray[20 * w + 10] = 20;
        gray[20 * w + 30] = 150;

        let out = adaptive_threshold(&gray, w, h, 11, 2, AdaptiveMethod::Gaussian);
        assert!(out.iter().all(|&v| v == WHITE || v == BLACK));
        // Both dots fall below their own neighborhood despite 150 > 60
        assert_eq!(out[20 * w + 10], BLACK);
        assert_eq!(out[20 * w + 30], BLACK);
        assert_eq!(out[5 * w + 5], WHITE);
        assert_eq!(out[5 * w + 35], WHITE);
    }
}
