#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Fuzz hand-edited Packer templates - this should never panic
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(content) {
            let _ = vaws::domain::entities::ImageSpec::has_unset_instance_type(&value);
        }
    }
});
