#![no_main]

use eprofiler::ResolverConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Bad input is an error, never a panic; accepted input is valid
        if let Ok(config) = ResolverConfig::from_toml_str(input) {
            assert!(config.validate().is_ok());
            assert!(config.base_offset < config.id_limit);
        }
    }
});
