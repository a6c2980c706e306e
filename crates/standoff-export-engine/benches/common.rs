// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use standoff_export_engine::{Fragment, TextLayer};

#[allow(dead_code)]
pub fn generate_lines(count: usize) -> Vec<String> {
    let base = "dis manibus sacrum que bixit annos XX menses III dies VII";
    (0..count).map(|_| base.to_string()).collect()
}

/// Three layers with overlapping fragments on every line.
#[allow(dead_code)]
pub fn generate_layers(line_count: usize) -> Vec<TextLayer> {
    let mut words = Vec::new();
    let mut spans = Vec::new();
    let mut chars = Vec::new();
    for y in 1..=line_count {
        words.push(Fragment::at(format!("{y}.2")));
        words.push(Fragment::at(format!("{y}.6")));
        spans.push(Fragment::at(format!("{y}.1@3-{y}.4@2")));
        chars.push(Fragment::at(format!("{y}.5@2-3")));
    }
    if line_count > 1 {
        spans.push(Fragment::at(format!("1.3-{line_count}.9")));
    }
    vec![
        TextLayer::new("words", words),
        TextLayer::new("spans", spans),
        TextLayer::new("chars", chars),
    ]
}
