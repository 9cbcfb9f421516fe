#![no_main]

use freqmod_backend::{quantize, FreqModOverlay, RgbImage};
use freqmod_spec::{FreqModParams, SourceRange};
use libfuzzer_sys::fuzz_target;

/// Header bytes: width, height, omega, phase, lowpass, numdevs, flags, quant.
const HEADER: usize = 8;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER {
        return;
    }
    let (header, pixels) = data.split_at(HEADER);
    let width = u32::from(header[0] % 64) + 1;
    let height = u32::from(header[1] % 16) + 1;
    let needed = (width * height * 3) as usize;
    if pixels.len() < needed {
        return;
    }

    let image = match RgbImage::new(width, height, pixels[..needed].to_vec()) {
        Ok(img) => img,
        Err(_) => return,
    };

    let params = FreqModParams {
        omega: f64::from(header[2]) / 255.0,
        phase: f64::from(header[3]) / 255.0,
        lowpass: f64::from(header[4]) / 255.0,
        numdevs: f64::from(header[5]) / 64.0,
        greyscale: header[6] & 1 == 0,
        source_range: if header[6] & 2 == 0 {
            SourceRange::Observed
        } else {
            SourceRange::Full
        },
        pquantize: u32::from(header[7]),
        ..FreqModParams::default()
    };

    // Filter design rejects cutoffs at or above Nyquist; everything else
    // must succeed and keep the input dimensions.
    let Ok(out) = FreqModOverlay::new(params.clone()).apply(&image) else {
        assert!(params.lowpass >= 0.5);
        return;
    };
    assert_eq!((out.width(), out.height()), (width, height));

    if params.pquantize > 0 {
        let q = quantize(&out, params.pquantize).expect("positive levels");
        assert_eq!(q.as_bytes().len(), out.as_bytes().len());
    }
});
