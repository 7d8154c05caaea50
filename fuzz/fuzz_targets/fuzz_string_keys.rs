#![no_main]
use libfuzzer_sys::fuzz_target;
use objxml::{to_string, Value};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Arbitrary string keys and values must either serialize or be
        // rejected with an error, never panic.
        let dict = Value::Dict(vec![
            (Value::str(s), Value::str(s)),
            (Value::str("fixed"), Value::Tuple(vec![Value::str(s)])),
        ]);
        let _ = to_string(&dict, Some(s));
    }
});
