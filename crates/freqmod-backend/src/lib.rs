//! freqmod image overlay backend
//!
//! Treats each row of an image as a modulating signal and replaces it with a
//! frequency modulated sine wave. The optional stages are a zero-phase
//! Butterworth lowpass, statistical thresholding and posterization.
//!
//! # Pipeline
//!
//! - **Mapping**: normalized `[0, 1]` user parameters become a carrier
//!   frequency and a deviation bound for the image width
//! - **Synthesis**: per-row phase accumulation over the modulating signal
//! - **Lowpass**: 6th-order Butterworth applied forward and backward
//! - **Normalization**: per-channel rescale onto `[0, 255]`
//! - **Threshold**: keep only values above `mean + k * std`
//! - **Quantization**: evenly spaced output levels, run separately
//!
//! # Example
//!
//! ```
//! use freqmod_backend::{quantize, FreqModOverlay, RgbImage};
//! use freqmod_spec::FreqModParams;
//!
//! let image = RgbImage::filled(32, 8, [40, 90, 200]);
//! let overlay = FreqModOverlay::new(FreqModParams::default());
//!
//! let out = overlay.apply(&image).unwrap();
//! assert_eq!(out.channels(), 1);
//!
//! let posterized = quantize(&out, 4).unwrap();
//! assert_eq!(posterized.as_bytes().len(), 32 * 8);
//! ```
//!
//! # Determinism
//!
//! Rows and colour channels run in parallel on the rayon pool, but every
//! stage is a pure function of its inputs, so the output is identical for
//! any thread count.

pub mod buffer;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod overlay;
pub mod params;
pub mod png;
pub mod quantize;
pub mod remap;
pub mod synthesis;
pub mod threshold;

pub use buffer::{Channel, GreyImage, OverlayImage, RgbImage};
pub use error::{FmError, FmResult, Stage};
pub use filter::{design_filter, lowpass_row, ButterworthLowpass};
pub use normalize::normalize_channel;
pub use overlay::{process_channel, ChannelObserver, FreqModOverlay};
pub use params::{map_omega, map_phase, OverlayParameters};
pub use quantize::quantize;
pub use remap::{remap, Remap};
pub use synthesis::synthesize_row;
pub use threshold::threshold_distribution;
