#![no_main]

use distview::sample_store::{DelayType, SampleSet};
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // First byte picks the delay type, the rest is the file body
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let Ok(delay_type) = DelayType::from_selector(usize::from(selector % 6)) else {
        return;
    };

    // Must return Ok or a FileLoad error, never panic
    let _ = SampleSet::from_reader(Path::new("fuzz.csv"), body, delay_type);
});
