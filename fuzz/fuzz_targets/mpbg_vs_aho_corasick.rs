#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dictbench;

use dictbench::ahocorasick::AhoCorasick;
use dictbench::matcher::Matcher;
use dictbench::mpbg::MpBg;
use dictbench::patterns_tree::{self, PatternId, PatternsTree};

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

fn build_from<M: Matcher + Default>(added: &[(Vec<u8>, PatternId)]) -> M {
    let mut engine = M::default();
    for (bytes, id) in added {
        engine.add_pattern(bytes, *id);
    }
    engine.compile();
    engine
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
    let tree: PatternsTree = patterns_tree::build(dict, |bytes: &[u8], id: PatternId| added.push((bytes.to_vec(), id)));

    let mut bg: MpBg = build_from(&added);
    let mut ac: AhoCorasick = build_from(&added);

    for &byte in stream {
        let bg_id = bg.read_char(byte);
        let ac_id = ac.read_char(byte);
        let bg_len = tree.pattern_len(bg_id);
        let ac_len = tree.pattern_len(ac_id);
        // The oracle never misses a real occurrence, so BG can never report
        // a longer match than it.
        assert!(bg_len <= ac_len, "bg reported a longer match than the oracle");
    }
});
