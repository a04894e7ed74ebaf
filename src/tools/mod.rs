use std::path::Path;

use image::GenericImageView;

use crate::models::Frame;
use crate::utils::binarization::{WHITE, calculate_otsu_threshold, threshold_binarize};

/// Load an image as an RGB frame, shrinking it to fit `max_dim` if given.
pub fn load_rgb<P: AsRef<Path>>(path: P, max_dim: Option<u32>) -> Result<Frame, image::ImageError> {
    let img = image::open(path)?;
    let rgb = match max_dim {
        Some(max_dim) if max_dim > 0 => {
            let (w, h) = img.dimensions();
            if w.max(h) > max_dim {
                img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
                    .to_rgb8()
            } else {
                img.to_rgb8()
            }
        }
        _ => img.to_rgb8(),
    };
    Ok(Frame::Rgb(rgb))
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a 0/255 binarized buffer.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of foreground (255) pixels.
    pub white_pixels: usize,
    /// Total pixels in the buffer.
    pub total_pixels: usize,
    /// Ratio of foreground pixels to total pixels.
    pub white_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    if gray.is_empty() {
        return GrayStats { min: 0, max: 0, avg: 0 };
    }
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    GrayStats {
        min,
        max,
        avg: (sum / gray.len() as u64) as u8,
    }
}

/// Compute foreground stats for a binarized buffer.
pub fn binary_stats(binary: &[u8]) -> BinaryStats {
    let white = binary.iter().filter(|&&v| v == WHITE).count();
    let total = binary.len();
    let ratio = if total == 0 {
        0.0
    } else {
        white as f64 / total as f64
    };
    BinaryStats {
        white_pixels: white,
        total_pixels: total,
        white_ratio: ratio,
    }
}

/// Global threshold picked by Otsu's method, with the split it produces
#[derive(Debug, Clone, Copy)]
pub struct OtsuStats {
    /// Pixels at or above this value are foreground
    pub threshold: u8,
    /// Foreground stats of the globally thresholded buffer
    pub binary: BinaryStats,
}

/// Binarize `gray` at its Otsu threshold and summarize the result.
///
/// Useful next to the adaptive view to see how much a single global cut
/// loses under uneven lighting.
pub fn otsu_stats(gray: &[u8]) -> OtsuStats {
    let threshold = calculate_otsu_threshold(gray);
    OtsuStats {
        threshold,
        binary: binary_stats(&threshold_binarize(gray, threshold)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_stats() {
        let stats = grayscale_stats(&[10, 20, 30, 40]);
        assert_eq!(stats, GrayStats { min: 10, max: 40, avg: 25 });
        assert_eq!(grayscale_stats(&[]), GrayStats { min: 0, max: 0, avg: 0 });
    }

    #[test]
    fn test_binary_stats() {
        let stats = binary_stats(&[0, 255, 255, 0]);
        assert_eq!(stats.white_pixels, 2);
        assert_eq!(stats.total_pixels, 4);
        assert!((stats.white_ratio - 0.5).abs() < 1e-9);
        assert_eq!(binary_stats(&[]).white_ratio, 0.0);
    }

    #[test]
    fn test_otsu_stats_splits_two_classes() {
        let mut gray = vec![40u8; 75];
        gray.extend(vec![210u8; 25]);
        let stats = otsu_stats(&gray);
        assert!(stats.threshold > 40 && stats.threshold <= 210);
        assert_eq!(stats.binary.white_pixels, 25);
        assert_eq!(stats.binary.total_pixels, 100);
    }

    #[test]
    fn test_load_rgb_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(200, 100).save(&path).unwrap();

        let frame = load_rgb(&path, Some(50)).unwrap();
        assert_eq!(frame.dimensions(), (50, 25));
        let frame = load_rgb(&path, None).unwrap();
        assert_eq!(frame.dimensions(), (200, 100));
    }
}
