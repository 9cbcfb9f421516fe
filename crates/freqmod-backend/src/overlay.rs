//! The frequency modulation overlay.
//!
//! Sequences the pipeline stages for one invocation:
//!
//! 1. map normalized parameters once from the image width
//! 2. per channel, synthesize and (optionally) lowpass every row in parallel
//! 3. normalize the channel once all its rows exist
//! 4. optionally threshold the normalized channel
//! 5. assemble the output image
//!
//! Post-quantization is not part of [`FreqModOverlay::apply`]; callers run
//! [`crate::quantize::quantize`] on the result when they want it.

use freqmod_spec::FreqModParams;
use log::{debug, trace};
use rayon::prelude::*;

use crate::buffer::{Channel, GreyImage, OverlayImage, RgbImage};
use crate::error::{FmError, FmResult};
use crate::filter::{design_filter, ButterworthLowpass};
use crate::normalize::normalize_channel;
use crate::params::OverlayParameters;
use crate::synthesis::synthesize_row;
use crate::threshold::threshold_distribution;

/// Number of planes in colour mode.
const RGB_CHANNELS: usize = 3;

/// Receives a notification each time a channel finishes processing.
///
/// In colour mode channels run in parallel, so notifications may arrive in
/// any order and from any thread.
pub trait ChannelObserver: Sync {
    /// Called once channel `index` of `total` is complete.
    fn channel_done(&self, index: usize, total: usize);
}

impl<F> ChannelObserver for F
where
    F: Fn(usize, usize) + Sync,
{
    fn channel_done(&self, index: usize, total: usize) {
        self(index, total)
    }
}

/// Frequency modulation overlay.
#[derive(Debug, Clone, Default)]
pub struct FreqModOverlay {
    params: FreqModParams,
}

impl FreqModOverlay {
    /// Creates an overlay with the given user parameters.
    pub fn new(params: FreqModParams) -> Self {
        Self { params }
    }

    /// The user parameters this overlay runs with.
    pub fn params(&self) -> &FreqModParams {
        &self.params
    }

    /// Runs the overlay on an RGB image.
    pub fn apply(&self, image: &RgbImage) -> FmResult<OverlayImage> {
        self.apply_with_observer(image, None)
    }

    /// Runs the overlay, notifying `observer` after each channel.
    ///
    /// Fails before producing any output if the image is empty or the
    /// lowpass filter cannot be designed. A failure in any channel fails the
    /// whole call.
    pub fn apply_with_observer(
        &self,
        image: &RgbImage,
        observer: Option<&dyn ChannelObserver>,
    ) -> FmResult<OverlayImage> {
        if image.width == 0 || image.height == 0 {
            return Err(FmError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }

        let params = OverlayParameters::from_params(&self.params, image.width)?;
        let filter = design_filter(params.lowpass)?;

        debug!(
            "FreqModOverlay: adjusted omega: {}, adjusted phase: {}, lowpass: {}, pquantize: {}, numdevs: {}",
            params.omega, params.phase, params.lowpass, self.params.pquantize, params.numdevs
        );
        debug!("image shape {}x{}x3", image.height, image.width);

        let notify = |index: usize, total: usize| {
            trace!("channel {} of {} done", index + 1, total);
            if let Some(observer) = observer {
                observer.channel_done(index, total);
            }
        };

        if params.greyscale {
            debug!("greyscale");
            let out = process_channel(&image.luminance(), &params, filter.as_ref())?;
            notify(0, 1);
            return Ok(OverlayImage::Grey(out));
        }

        debug!("colour");
        let planes = (0..RGB_CHANNELS)
            .into_par_iter()
            .map(|index| {
                let out = process_channel(&image.plane(index), &params, filter.as_ref())?;
                notify(index, RGB_CHANNELS);
                Ok(out)
            })
            .collect::<FmResult<Vec<GreyImage>>>()?;

        let rgb = RgbImage::from_planes([&planes[0], &planes[1], &planes[2]])?;
        Ok(OverlayImage::Rgb(rgb))
    }
}

/// Runs synthesis, filtering, normalization and thresholding on one plane.
pub fn process_channel(
    channel: &Channel,
    params: &OverlayParameters,
    filter: Option<&ButterworthLowpass>,
) -> FmResult<GreyImage> {
    let synthesized = synthesize_channel(channel, params, filter)?;
    let normalized = normalize_channel(&synthesized)?;
    Ok(threshold_distribution(normalized, params.numdevs))
}

/// Synthesizes (and filters) every row of a plane in parallel.
pub fn synthesize_channel(
    channel: &Channel,
    params: &OverlayParameters,
    filter: Option<&ButterworthLowpass>,
) -> FmResult<Channel> {
    if channel.width == 0 {
        return Err(FmError::EmptyRow);
    }
    let rows = channel
        .data
        .par_chunks(channel.width as usize)
        .map(|row| {
            let synthesized = synthesize_row(row, params.phase, params.omega, params.source_range)?;
            Ok(match filter {
                Some(filter) => filter.filtfilt(&synthesized),
                None => synthesized,
            })
        })
        .collect::<FmResult<Vec<Vec<f64>>>>()?;

    Channel::new(channel.width, channel.height, rows.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_image() -> RgbImage {
        let mut img = RgbImage::filled(24, 6, [0, 0, 0]);
        for y in 0..6 {
            for x in 0..24 {
                img.set(x, y, [(x * 10) as u8, (y * 40) as u8, ((x + y) * 5) as u8]);
            }
        }
        img
    }

    #[test]
    fn test_greyscale_output_shape() {
        let out = FreqModOverlay::default().apply(&test_image()).unwrap();
        assert!(matches!(out, OverlayImage::Grey(_)));
        assert_eq!((out.width(), out.height(), out.channels()), (24, 6, 1));
    }

    #[test]
    fn test_colour_output_shape() {
        let overlay = FreqModOverlay::new(FreqModParams {
            greyscale: false,
            ..Default::default()
        });
        let out = overlay.apply(&test_image()).unwrap();
        assert!(matches!(out, OverlayImage::Rgb(_)));
        assert_eq!(out.as_bytes().len(), 24 * 6 * 3);
    }

    #[test]
    fn test_observer_sees_every_channel() {
        let seen = AtomicUsize::new(0);
        let observer = |index: usize, total: usize| {
            assert_eq!(total, 3);
            seen.fetch_or(1 << index, Ordering::SeqCst);
        };
        let overlay = FreqModOverlay::new(FreqModParams {
            greyscale: false,
            ..Default::default()
        });
        overlay
            .apply_with_observer(&test_image(), Some(&observer))
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0b111);
    }

    #[test]
    fn test_greyscale_notifies_once() {
        let calls = AtomicUsize::new(0);
        let observer = |index: usize, total: usize| {
            assert_eq!((index, total), (0, 1));
            calls.fetch_add(1, Ordering::SeqCst);
        };
        FreqModOverlay::default()
            .apply_with_observer(&test_image(), Some(&observer))
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = RgbImage::filled(0, 4, [0, 0, 0]);
        let err = FreqModOverlay::default().apply(&img).unwrap_err();
        assert!(matches!(err, FmError::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn test_invalid_lowpass_fails_before_processing() {
        let calls = AtomicUsize::new(0);
        let observer = |_: usize, _: usize| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let overlay = FreqModOverlay::new(FreqModParams {
            lowpass: 0.8,
            ..Default::default()
        });
        let err = overlay
            .apply_with_observer(&test_image(), Some(&observer))
            .unwrap_err();
        assert!(matches!(err, FmError::FilterCutoff { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_synthesize_channel_rows_independent() {
        let params = OverlayParameters::from_params(&FreqModParams::default(), 24).unwrap();
        let img = test_image();
        let lum = img.luminance();
        let all = synthesize_channel(&lum, &params, None).unwrap();
        let width = lum.width as usize;
        for (row, synthesized) in lum.data.chunks_exact(width).zip(all.data.chunks_exact(width)) {
            let single =
                synthesize_row(row, params.phase, params.omega, params.source_range).unwrap();
            assert_eq!(synthesized, single.as_slice());
        }
    }
}
