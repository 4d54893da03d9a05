#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dictbench;

use dictbench::ahocorasick::{AhoCorasick, AhoCorasickLowMem};
use dictbench::matcher::Matcher;
use dictbench::patterns_tree::{self, PatternId};

fn split(data: &[u8]) -> (Vec<Vec<u8>>, &[u8]) {
    let mut chunks: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    let stream = chunks.pop().unwrap_or(&[]);
    let patterns = chunks
        .into_iter()
        .filter(|c| !c.is_empty() && c.len() <= 24)
        .take(8)
        .map(|c| c.to_vec())
        .collect();
    (patterns, stream)
}

fuzz_target!(|data: &[u8]| {
    let (patterns, stream) = split(data);
    if patterns.is_empty() || stream.len() > 4096 {
        return;
    }

    let mut added: Vec<(Vec<u8>, PatternId)> = Vec::new();
    let dict = patterns
        .iter()
        .enumerate()
        .map(|(i, p)| (0u32, i as u32 + 1, p.clone()));
    patterns_tree::build(dict, |bytes: &[u8], id: PatternId| added.push((bytes.to_vec(), id)));

    let mut dense = AhoCorasick::new();
    let mut lowmem = AhoCorasickLowMem::new();
    for (bytes, id) in &added {
        dense.add_pattern(bytes, *id);
        lowmem.add_pattern(bytes, *id);
    }
    dense.compile();
    lowmem.compile();

    for &byte in stream {
        let dense_id = dense.read_char(byte);
        let lowmem_id = lowmem.read_char(byte);
        assert_eq!(dense_id, lowmem_id, "dense and low-memory Aho-Corasick disagree");
    }
});
