//! Posterization of a finished overlay image.

use crate::buffer::OverlayImage;
use crate::error::{FmError, FmResult};
use crate::normalize::to_u8;
use crate::remap::Remap;

/// Builds the 256-entry lookup table for `quant` levels.
///
/// Each intensity is scaled onto `[0, quant]`, rounded half-to-even to the
/// nearest level, scaled back onto `[0, 255]` and truncated to a byte.
pub fn quantize_lut(quant: u32) -> FmResult<[u8; 256]> {
    if quant == 0 {
        return Err(FmError::InvalidQuantization);
    }
    let levels = f64::from(quant);
    let down = Remap::new(0.0, 255.0, 0.0, levels)?;
    let up = Remap::new(0.0, levels, 0.0, 255.0)?;

    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        let level = down.apply(v as f64).round_ties_even();
        *slot = to_u8(up.apply(level));
    }
    Ok(lut)
}

/// Posterizes raw 8-bit data in place.
pub fn quantize_bytes(data: &mut [u8], quant: u32) -> FmResult<()> {
    let lut = quantize_lut(quant)?;
    for v in data.iter_mut() {
        *v = lut[usize::from(*v)];
    }
    Ok(())
}

/// Returns a posterized copy of an overlay image with `quant + 1` evenly
/// spaced levels per channel.
pub fn quantize(image: &OverlayImage, quant: u32) -> FmResult<OverlayImage> {
    let mut out = image.clone();
    quantize_bytes(out.as_bytes_mut(), quant)?;
    Ok(out)
}
