// ABOUTME: One-shot downscaling of decoded rasters to the channel's dimension ceiling
// ABOUTME: Pure bounding-box math plus a Lanczos resize that preserves aspect ratio

use image::{imageops::FilterType, DynamicImage};

/// Dimensions that fit `(width, height)` inside a `max × max` box, or `None`
/// when the image already fits.
///
/// The longer edge lands exactly on `max`; the shorter edge is rounded and
/// never collapses below one pixel. A `max` of zero means no cap.
pub fn fit_within(dimensions: (u32, u32), max: u32) -> Option<(u32, u32)> {
    let (width, height) = dimensions;
    if max == 0 || (width <= max && height <= max) {
        return None;
    }

    let scale = |edge: u32, longer: u32| -> u32 {
        ((edge as f64 * max as f64 / longer as f64).round() as u32).clamp(1, max)
    };

    if width >= height {
        Some((max, scale(height, width)))
    } else {
        Some((scale(width, height), max))
    }
}

/// Downscale `img` so neither edge exceeds `max_dimension`. Images already
/// within bounds are returned untouched.
pub fn fit_to_dimension(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    match fit_within((img.width(), img.height()), max_dimension) {
        Some((width, height)) => {
            log::debug!(
                "Scaling image from {}x{} to {}x{}",
                img.width(),
                img.height(),
                width,
                height
            );
            img.resize_exact(width, height, FilterType::Lanczos3)
        }
        None => {
            log::debug!(
                "Image {}x{} already within {}px, skipping resize",
                img.width(),
                img.height(),
                max_dimension
            );
            img
        }
    }
}
