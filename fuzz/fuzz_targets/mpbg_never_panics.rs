#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dictbench;

use dictbench::matcher::Matcher;
use dictbench::mpbg::MpBg;
use dictbench::patterns_tree::{self, PatternId};

// A single arbitrary pattern fed byte-for-byte as its own stream: the
// trivial case a real-time matcher must never choke on, regardless of how
// periodic or short the pattern is.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 4096 {
        return;
    }

    let mut added: Vec<(Vec<u8>, PatternId)> = Vec::new();
    let dict = std::iter::once((0u32, 1u32, data.to_vec()));
    patterns_tree::build(dict, |bytes: &[u8], id: PatternId| added.push((bytes.to_vec(), id)));

    let mut bg = MpBg::new();
    for (bytes, id) in &added {
        bg.add_pattern(bytes, *id);
    }
    bg.compile();

    for &byte in data {
        bg.read_char(byte);
    }
    bg.reset();
    for &byte in data {
        bg.read_char(byte);
    }
});
