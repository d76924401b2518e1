#![no_main]

use libfuzzer_sys::fuzz_target;
use tickscope::event::RawLine;
use tickscope::normalize::normalize;
use tickscope::stream::EventStream;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Any line either normalizes or is dropped, never panics
        let _ = normalize(RawLine::new(1, input));

        let lines = input
            .lines()
            .enumerate()
            .map(|(i, text)| RawLine::new(i + 1, text));
        let _ = EventStream::build(lines);
    }
});
