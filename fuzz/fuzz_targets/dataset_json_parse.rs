//! Fuzz target for dataset JSON decoding.
//!
//! This fuzzer feeds arbitrary byte sequences to the layout-detecting
//! decoder (raw corner format and internal format), checking for panics,
//! crashes, or hangs.

#![no_main]

use bbox_buddy::import::decode_dataset_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = decode_dataset_slice(data);
});
