#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dictbench;

use dictbench::matcher::Matcher;
use dictbench::mpbg::MpBg;
use dictbench::patterns_tree::{self, PatternId};

/// Split fuzz input into a handful of short dictionary patterns (separated
/// by `0x00` bytes) and a trailing stream to feed them against.
fn split(data: &[u8]) -> (Vec<Vec<u8>>, &[u8]) {
    let mut chunks: Vec<&[u8]> = data.split(|&b| b == 0).collect();
    let stream = chunks.pop().unwrap_or(&[]);
    let patterns = chunks
        .into_iter()
        .filter(|c| !c.is_empty() && c.len() <= 16)
        .take(6)
        .map(|c| c.to_vec())
        .collect();
    (patterns, stream)
}

fn brute_force_longest(patterns: &[Vec<u8>], text: &[u8]) -> Vec<Option<Vec<u8>>> {
    (1..=text.len())
        .map(|end| {
            patterns
                .iter()
                .filter(|p| end >= p.len() && &text[end - p.len()..end] == p.as_slice())
                .max_by_key(|p| p.len())
                .cloned()
        })
        .collect()
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

    let mut bg = MpBg::new();
    for (bytes, id) in &added {
        bg.add_pattern(bytes, *id);
    }
    bg.compile();

    let want = brute_force_longest(&patterns, stream);
    for (i, &byte) in stream.iter().enumerate() {
        let got = bg.read_char(byte);
        let got_bytes = if got.is_none() {
            None
        } else {
            Some(added.iter().find(|(_, id)| *id == got).unwrap().0.clone())
        };
        assert_eq!(got_bytes, want[i], "mismatch at position {i}");
    }
});
