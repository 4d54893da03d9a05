#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate dictbench;

use dictbench::patterns_tree::{self, PatternId};

fn split(data: &[u8]) -> Vec<Vec<u8>> {
    data.split(|&b| b == 0)
        .filter(|c| !c.is_empty() && c.len() <= 24)
        .take(12)
        .map(|c| c.to_vec())
        .collect()
}

/// Every ancestor of a node in the patterns tree must be a genuine proper
/// suffix of that node's pattern, checked the slow way against the bytes
/// the tree itself handed back through `add_pattern`.
fuzz_target!(|data: &[u8]| {
    let patterns = split(data);
    if patterns.is_empty() {
        return;
    }

    let mut added: Vec<(Vec<u8>, PatternId)> = Vec::new();
    let dict = patterns
        .iter()
        .enumerate()
        .map(|(i, p)| (0u32, i as u32 + 1, p.clone()));
    let tree = patterns_tree::build(dict, |bytes: &[u8], id: PatternId| added.push((bytes.to_vec(), id)));

    for (bytes, id) in &added {
        let mut cur = tree.parent(*id);
        while !cur.is_none() {
            let (parent_bytes, _) = added.iter().find(|(_, pid)| pid == &cur).unwrap();
            assert!(
                parent_bytes.len() < bytes.len() && bytes.ends_with(parent_bytes.as_slice()),
                "tree ancestor is not a proper suffix"
            );
            assert!(tree.is_suffix(cur, *id));
            cur = tree.parent(cur);
        }
    }
});
