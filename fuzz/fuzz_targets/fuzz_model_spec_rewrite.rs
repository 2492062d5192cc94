#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // A successful rewrite must be stable under a second rewrite
        if let Ok(once) = vaws::domain::services::rewrite_artifact_path(content, Path::new("fuzz.yaml")) {
            let twice = vaws::domain::services::rewrite_artifact_path(&once.content, Path::new("fuzz.yaml"))
                .expect("rewritten document must still parse");
            assert_eq!(once.content, twice.content);
        }
    }
});
