//! Channel-wide normalization into the displayable 8-bit range.

use crate::buffer::{Channel, GreyImage};
use crate::error::{FmError, FmResult};
use crate::remap::Remap;

/// Value every pixel of a flat channel (min == max) is set to.
pub const FLAT_CHANNEL_VALUE: u8 = 127;

/// Rescales a synthesized channel from its own `[min, max]` onto `[0, 255]`.
///
/// Needs the whole channel: the extremes are channel-wide statistics, so
/// this runs only after every row has been synthesized and filtered.
/// Results are truncated toward zero into the 8-bit range.
pub fn normalize_channel(channel: &Channel) -> FmResult<GreyImage> {
    let (lo, hi) = channel.min_max().ok_or(FmError::EmptyChannel)?;

    if lo == hi {
        return Ok(GreyImage::filled(
            channel.width,
            channel.height,
            FLAT_CHANNEL_VALUE,
        ));
    }

    let map = Remap::new(lo, hi, 0.0, 255.0)?;
    let data = channel
        .data
        .iter()
        .map(|&v| to_u8(map.apply(v)))
        .collect();
    GreyImage::new(channel.width, channel.height, data)
}

/// Clamps a value into the 8-bit range and drops the fractional part.
#[inline]
pub(crate) fn to_u8(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_spans_full_range() {
        let channel = Channel::new(3, 1, vec![-1.0, 0.0, 1.0]).unwrap();
        let out = normalize_channel(&channel).unwrap();
        assert_eq!(out.data, vec![0, 127, 255]);
    }

    #[test]
    fn test_idempotent_on_full_range_channel() {
        let data: Vec<f64> = (0..=255).map(f64::from).collect();
        let channel = Channel::new(16, 16, data).unwrap();
        let once = normalize_channel(&channel).unwrap();
        let twice = normalize_channel(&once.to_channel()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.data, (0..=255).collect::<Vec<u8>>());
    }

    #[test]
    fn test_fractions_truncate() {
        assert_eq!(to_u8(127.5), 127);
        assert_eq!(to_u8(254.999), 254);
        assert_eq!(to_u8(-0.4), 0);
        assert_eq!(to_u8(300.0), 255);
    }

    #[test]
    fn test_flat_channel_fallback() {
        let channel = Channel::new(2, 2, vec![0.42; 4]).unwrap();
        let out = normalize_channel(&channel).unwrap();
        assert_eq!(out.data, vec![FLAT_CHANNEL_VALUE; 4]);
    }

    #[test]
    fn test_single_pixel_is_flat() {
        let channel = Channel::new(1, 1, vec![-3.0]).unwrap();
        assert_eq!(normalize_channel(&channel).unwrap().data, vec![FLAT_CHANNEL_VALUE]);
    }

    #[test]
    fn test_empty_channel_rejected() {
        let channel = Channel::new(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            normalize_channel(&channel),
            Err(FmError::EmptyChannel)
        ));
    }
}
