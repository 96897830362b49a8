#![no_main]

use libfuzzer_sys::fuzz_target;

use pagesift::extractor::{ExtractMode, extract_bytes};

const SPEC: &[u8] = br#"{
    "title": "h1",
    "rows": {"root": "tr", "name": "td:nth-child(1)", "value": "td:nth-child(2)"}
}"#;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as the document, and as the specification.
    let _ = extract_bytes(data, None, SPEC, ExtractMode::Lenient);
    let _ = extract_bytes(data, None, SPEC, ExtractMode::strict());
    let _ = extract_bytes(b"<table><tr><td>x</td></tr></table>", None, data, ExtractMode::Lenient);
});
