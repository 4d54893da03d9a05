//! The `Matcher` trait: the common
//! `create`/`add_pattern`/`compile`/`read_char`/`reset`/`total_mem`/`free`
//! surface every matching engine exposes, as a Rust trait object the harness
//! can hold a heterogeneous list of.
//!
//! `create` is each implementor's `Default`; `free` is `Drop` (every
//! implementor here owns plain `Vec`s and needs no explicit teardown, so
//! `Drop` is the compiler-generated one).

use crate::patterns_tree::PatternId;

pub trait Matcher {
    /// Register one dictionary pattern. Must only be called before
    /// [`Matcher::compile`].
    fn add_pattern(&mut self, bytes: &[u8], id: PatternId);

    /// Freeze the engine for matching. Must be called exactly once, after
    /// every `add_pattern` call and before any `read_char`/`reset`.
    fn compile(&mut self);

    /// Feed one byte. Must only be called after `compile`.
    fn read_char(&mut self, byte: u8) -> PatternId;

    /// Return to "no bytes seen yet" for the next stream. Must only be
    /// called after `compile`.
    fn reset(&mut self);

    /// Current heap+stack footprint, for the harness's memory report.
    fn total_mem(&self) -> usize;

    /// Fingerprint collisions logged so far. Zero for engines (AC, KMP)
    /// with no fingerprint ladder to collide in; only `MpBg` overrides
    /// this.
    fn collisions(&self) -> u64 {
        0
    }
}

impl Matcher for crate::mpbg::MpBg {
    fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        crate::mpbg::MpBg::add_pattern(self, bytes, id)
    }
    fn compile(&mut self) {
        crate::mpbg::MpBg::compile(self)
    }
    fn read_char(&mut self, byte: u8) -> PatternId {
        crate::mpbg::MpBg::read_char(self, byte)
    }
    fn reset(&mut self) {
        crate::mpbg::MpBg::reset(self)
    }
    fn total_mem(&self) -> usize {
        crate::mpbg::MpBg::total_mem(self)
    }
    fn collisions(&self) -> u64 {
        crate::mpbg::MpBg::collisions(self)
    }
}

impl Matcher for crate::ahocorasick::AhoCorasick {
    fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        crate::ahocorasick::AhoCorasick::add_pattern(self, bytes, id)
    }
    fn compile(&mut self) {
        crate::ahocorasick::AhoCorasick::compile(self)
    }
    fn read_char(&mut self, byte: u8) -> PatternId {
        crate::ahocorasick::AhoCorasick::read_char(self, byte)
    }
    fn reset(&mut self) {
        crate::ahocorasick::AhoCorasick::reset(self)
    }
    fn total_mem(&self) -> usize {
        crate::ahocorasick::AhoCorasick::total_mem(self)
    }
}

impl Matcher for crate::ahocorasick::AhoCorasickLowMem {
    fn add_pattern(&mut self, bytes: &[u8], id: PatternId) {
        crate::ahocorasick::AhoCorasickLowMem::add_pattern(self, bytes, id)
    }
    fn compile(&mut self) {
        crate::ahocorasick::AhoCorasickLowMem::compile(self)
    }
    fn read_char(&mut self, byte: u8) -> PatternId {
        crate::ahocorasick::AhoCorasickLowMem::read_char(self, byte)
    }
    fn reset(&mut self) {
        crate::ahocorasick::AhoCorasickLowMem::reset(self)
    }
    fn total_mem(&self) -> usize {
        crate::ahocorasick::AhoCorasickLowMem::total_mem(self)
    }
}
