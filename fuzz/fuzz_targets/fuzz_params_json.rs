#![no_main]

use freqmod_spec::FreqModParams;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(params) = FreqModParams::from_json(text) {
        let result = params.validate();
        if result.is_ok() {
            let json = params.to_json_pretty().expect("serialize valid params");
            let again = FreqModParams::from_json(&json).expect("reparse valid params");
            assert_eq!(again.greyscale, params.greyscale);
            assert_eq!(again.source_range, params.source_range);
            assert_eq!(again.pquantize, params.pquantize);
        }
    }
});
