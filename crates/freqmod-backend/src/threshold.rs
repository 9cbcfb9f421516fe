//! Statistical binarization of a normalized channel.

use crate::buffer::GreyImage;

/// Mean and population standard deviation of the channel's pixels.
pub fn channel_stats(image: &GreyImage) -> (f64, f64) {
    if image.data.is_empty() {
        return (0.0, 0.0);
    }
    let n = image.data.len() as f64;
    let mean = image.data.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let variance = image
        .data
        .iter()
        .map(|&v| {
            let diff = f64::from(v) - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

/// Maps pixels above `mean + numdevs * std` to 255 and the rest to 0.
///
/// A non-positive `numdevs` disables the stage and returns the channel as is.
pub fn threshold_distribution(mut image: GreyImage, numdevs: f64) -> GreyImage {
    if numdevs.is_nan() || numdevs <= 0.0 {
        return image;
    }
    let (mean, std) = channel_stats(&image);
    let cut = mean + numdevs * std;
    for v in &mut image.data {
        *v = if f64::from(*v) > cut { 255 } else { 0 };
    }
    image
}
