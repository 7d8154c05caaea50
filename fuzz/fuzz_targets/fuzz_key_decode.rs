#![no_main]
use libfuzzer_sys::fuzz_target;
use objxml::{decode_key, encode_key, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        // Decoding must never panic, and every decoded key is encodable.
        if let Ok(key) = decode_key(name) {
            let again = encode_key(&Value::from(key));
            assert!(again.is_ok(), "decoded key from {name:?} failed to encode");
        }
    }
});
