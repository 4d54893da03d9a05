//! The comparison loop: builds the Patterns Tree once, wires the same
//! dictionary into every engine under test plus the Aho-Corasick oracle,
//! then drives streams byte-by-byte, classifying each tested engine's
//! answer against the oracle's.

use std::time::{Duration, Instant};

use crate::ahocorasick::AhoCorasick;
use crate::dictionary::DictEntry;
use crate::matcher::Matcher;
use crate::patterns_tree::{self, PatternId, PatternsTree};
use crate::perf::{CounterReading, CounterSet};
use crate::registry::{self, AlgoTag};
use crate::report::Report;
use crate::stream::StreamSource;
use crate::{HarnessError, Result};

/// Per-byte classification of a tested engine's answer against the oracle's.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The tested engine's id matches the oracle's exactly.
    Success,
    /// The tested engine found a real but shorter suffix match.
    Partial,
    /// The tested engine reported no match where the oracle found one.
    FalseNeg,
    /// Anything else: a wrong, unrelated, or too-long match.
    FalsePos,
}

impl Verdict {
    fn classify(tree: &PatternsTree, algo: PatternId, real: PatternId) -> Self {
        if algo == real {
            Verdict::Success
        } else if tree.is_suffix(algo, real) {
            Verdict::Partial
        } else if algo.is_none() && !real.is_none() {
            Verdict::FalseNeg
        } else {
            Verdict::FalsePos
        }
    }
}

/// Per-engine, per-stream accumulator. Plain-old-data: folding a verdict in
/// never allocates, so it can be updated from inside the hot per-byte loop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub success: u64,
    pub partial: u64,
    pub false_neg: u64,
    pub false_pos: u64,
    pub collisions: u64,
    pub total_mem: usize,
    pub elapsed: Duration,
    pub counters: Option<CounterReading>,
}

impl EngineStats {
    fn fold(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Success => self.success += 1,
            Verdict::Partial => self.partial += 1,
            Verdict::FalseNeg => self.false_neg += 1,
            Verdict::FalsePos => self.false_pos += 1,
        }
    }

    /// Total bytes classified; every boundary test asserts this equals the
    /// stream length.
    pub fn total(&self) -> u64 {
        self.success + self.partial + self.false_neg + self.false_pos
    }
}

struct Engine {
    tag: AlgoTag,
    name: &'static str,
    matcher: Box<dyn Matcher>,
}

/// Owns the compiled Patterns Tree, the Aho-Corasick oracle, and every
/// engine under test, all built from the same dictionary.
pub struct Harness {
    tree: PatternsTree,
    oracle: AhoCorasick,
    engines: Vec<Engine>,
}

impl Harness {
    /// Build the Patterns Tree from `dict`, feeding every distinct pattern
    /// to the oracle and to one matcher per entry of `algos` (resolved
    /// against [`registry::ALGORITHMS`]).
    pub fn build(dict: Vec<DictEntry>, algos: &[AlgoTag]) -> Result<Self> {
        let mut patterns: Vec<(Vec<u8>, PatternId)> = Vec::new();
        let tree = patterns_tree::build(
            dict.into_iter().map(|e| (e.file_index, e.line_index, e.bytes)),
            |bytes: &[u8], id: PatternId| patterns.push((bytes.to_vec(), id)),
        );
        if patterns.is_empty() {
            return Err(HarnessError::EmptyDictionary { path: "<all dictionaries>".into() });
        }

        let mut oracle = AhoCorasick::new();
        for (bytes, id) in &patterns {
            oracle.add_pattern(bytes, *id);
        }
        oracle.compile();

        let mut engines = Vec::with_capacity(algos.len());
        for &tag in algos {
            let descriptor = registry::ALGORITHMS
                .iter()
                .find(|d| d.tag == tag)
                .expect("Harness::build: tag not in registry");
            let mut matcher = (descriptor.construct)();
            for (bytes, id) in &patterns {
                matcher.add_pattern(bytes, *id);
            }
            matcher.compile();
            engines.push(Engine { tag, name: descriptor.name, matcher });
        }

        log::info!(
            "dictbench: patterns tree compiled with {} distinct patterns, {} engines under test",
            patterns.len(),
            engines.len()
        );

        Ok(Harness { tree, oracle, engines })
    }

    /// Run one stream to completion: reset every engine (including the
    /// oracle), then feed it one byte at a time, folding a [`Verdict`] into
    /// each tested engine's [`EngineStats`] and (if `report` is verbose)
    /// writing a line for every non-`Success` verdict.
    pub fn run_stream(
        &mut self,
        stream_index: usize,
        source: &mut StreamSource,
        report: &mut Report<impl std::io::Write>,
    ) -> Result<()> {
        self.oracle.reset();
        for engine in &mut self.engines {
            engine.matcher.reset();
        }

        let mut stats = vec![EngineStats::default(); self.engines.len()];
        let mut counters: Vec<CounterSet> = self.engines.iter().map(|_| CounterSet::new()).collect();
        for c in &mut counters {
            c.start();
        }
        let started = Instant::now();

        let mut position: u64 = 0;
        while let Some(byte) = source.next_byte()? {
            let real = self.oracle.read_char(byte);
            for (i, engine) in self.engines.iter_mut().enumerate() {
                let algo = engine.matcher.read_char(byte);
                let verdict = Verdict::classify(&self.tree, algo, real);
                stats[i].fold(verdict);
                if !matches!(verdict, Verdict::Success) {
                    report.write_mismatch(stream_index, position, engine.name, verdict)?;
                }
            }
            position += 1;
        }

        let elapsed = started.elapsed();
        for (i, engine) in self.engines.iter().enumerate() {
            stats[i].elapsed = elapsed;
            stats[i].total_mem = engine.matcher.total_mem();
            stats[i].collisions = engine.matcher.collisions();
            stats[i].counters = counters[i].stop();
            report.write_summary(stream_index, engine.name, &stats[i])?;
        }

        Ok(())
    }

    pub fn engine_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.engines.iter().map(|e| e.name)
    }
}
