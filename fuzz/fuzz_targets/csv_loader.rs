#![no_main]

use libfuzzer_sys::fuzz_target;
use stepstat::config::AnalysisConfig;
use stepstat::dataset;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as an export; loading must return an error, never panic
    let config = AnalysisConfig::default();
    if let Ok(dataset) = dataset::from_reader(data, "fuzz.csv", &config) {
        let _ = stepstat::report::build_report(&dataset, None, &config);
    }
});
