//! Output formatting: a flat `key=value`-per-line text report, picked over
//! a structured serializer because the primary consumer of a dictbench run
//! is a human operator or a `grep`/`awk` pipeline, not another program.

use std::io::Write;

use crate::harness::{EngineStats, Verdict};
use crate::Result;

pub struct Report<W: Write> {
    writer: W,
    verbose: bool,
}

impl<W: Write> Report<W> {
    pub fn new(writer: W, verbose: bool) -> Self {
        Report { writer, verbose }
    }

    /// One line per stream/engine, with verdict counts, elapsed wall time,
    /// hardware counters (if sampled), memory footprint, and any logged
    /// fingerprint collisions.
    pub fn write_summary(&mut self, stream_index: usize, engine: &str, stats: &EngineStats) -> Result<()> {
        let mut line = format!(
            "stream={stream_index} engine={engine} total={} success={} partial={} false_neg={} false_pos={} \
             collisions={} total_mem={} elapsed_us={}",
            stats.total(),
            stats.success,
            stats.partial,
            stats.false_neg,
            stats.false_pos,
            stats.collisions,
            stats.total_mem,
            stats.elapsed.as_micros(),
        );
        if let Some(counters) = stats.counters {
            line.push_str(&format!(" instructions={} cycles={}", counters.instructions, counters.cycles));
        }
        self.write_line(&line)
    }

    /// One line per classified mismatch (anything but `Success`), emitted
    /// only when `-v` is set, for debugging a particular engine/position.
    pub fn write_mismatch(&mut self, stream_index: usize, position: u64, engine: &str, verdict: Verdict) -> Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let verdict = match verdict {
            Verdict::Success => "success",
            Verdict::Partial => "partial",
            Verdict::FalseNeg => "false_neg",
            Verdict::FalsePos => "false_pos",
        };
        self.write_line(&format!("stream={stream_index} position={position} engine={engine} verdict={verdict}"))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|source| crate::HarnessError::Io {
            path: "<report output>".into(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn summary_line_has_every_field() {
        let mut buf = Vec::new();
        let mut report = Report::new(&mut buf, false);
        let stats = EngineStats { success: 3, partial: 1, false_neg: 0, false_pos: 0, collisions: 0, total_mem: 128, elapsed: Duration::from_micros(42), counters: None };
        report.write_summary(0, "bg", &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("engine=bg"));
        assert!(text.contains("total=4"));
        assert!(text.contains("elapsed_us=42"));
    }

    #[test]
    fn mismatch_suppressed_unless_verbose() {
        let mut buf = Vec::new();
        let mut report = Report::new(&mut buf, false);
        report.write_mismatch(0, 7, "bg", Verdict::FalsePos).unwrap();
        assert!(buf.is_empty());

        let mut buf = Vec::new();
        let mut report = Report::new(&mut buf, true);
        report.write_mismatch(0, 7, "bg", Verdict::FalsePos).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("position=7"));
        assert!(text.contains("verdict=false_pos"));
    }
}
