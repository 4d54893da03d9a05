//! The closed matcher registry: the fixed set of engines the harness binary
//! can race, named by `AlgoTag`.
//!
//! A plain array literal populated once at compile time — no runtime
//! registration, since the set of engines this harness can race is fixed.

use crate::matcher::Matcher;
use crate::mpbg::MpBg;
use crate::ahocorasick::{AhoCorasick, AhoCorasickLowMem};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlgoTag {
    Bg,
    Ac,
    AcLowMem,
}

pub struct AlgoDescriptor {
    pub tag: AlgoTag,
    pub name: &'static str,
    pub construct: fn() -> Box<dyn Matcher>,
}

pub static ALGORITHMS: &[AlgoDescriptor] = &[
    AlgoDescriptor { tag: AlgoTag::Bg, name: "bg", construct: || Box::new(MpBg::new()) },
    AlgoDescriptor { tag: AlgoTag::Ac, name: "ac", construct: || Box::new(AhoCorasick::new()) },
    AlgoDescriptor { tag: AlgoTag::AcLowMem, name: "ac-lowmem", construct: || Box::new(AhoCorasickLowMem::new()) },
];

/// Resolve a CLI-facing algorithm name against the registry.
pub fn find(name: &str) -> Option<&'static AlgoDescriptor> {
    ALGORITHMS.iter().find(|d| d.name == name)
}

/// Comma-joined list of every registered name, for error messages.
pub fn known_names() -> String {
    ALGORITHMS.iter().map(|d| d.name).collect::<Vec<_>>().join(", ")
}
