//! A benchmarking harness for multi-pattern streaming dictionary matchers.
//!
//! Given a dictionary of byte patterns and one or more byte streams, this
//! crate reports, for every stream position, the longest dictionary pattern
//! whose last byte ends there. The core is a real-time streaming matcher
//! based on Breslauer-Galil ([`bg`]) composed across a whole dictionary by
//! [`mpbg`], checked against a deterministic Aho-Corasick oracle
//! ([`ahocorasick`]) through the [`patterns_tree`] that indexes the
//! dictionary.
//!
//! # Layout
//!
//! - [`field`], [`fingerprint`]: modular arithmetic and Karp-Rabin
//!   fingerprints the matching engines are built on.
//! - [`kmp`]: real-time Knuth-Morris-Pratt, both a matcher in its own right
//!   (for short patterns) and BG's period oracle.
//! - [`bg`], [`mpbg`]: the Breslauer-Galil engine and its multi-pattern
//!   wrapper.
//! - [`patterns_tree`]: the reverse-suffix tree over a dictionary.
//! - [`ahocorasick`]: the reference (oracle) engine.
//! - [`matcher`], [`registry`]: the common engine trait and the closed set
//!   of engines the harness binary can race.
//! - [`dictionary`], [`stream`]: ambient file I/O.
//! - [`harness`], [`report`], [`perf`]: the comparison loop, output
//!   formatting, and optional hardware counters that the `dictbench` binary
//!   wires together.
//! - [`error`]: the crate's `Result`/error type.

pub mod ahocorasick;
pub mod bg;
pub mod dictionary;
pub mod error;
pub mod field;
pub mod fingerprint;
pub mod harness;
pub mod kmp;
pub mod matcher;
pub mod mpbg;
pub mod patterns_tree;
pub mod perf;
pub mod registry;
pub mod report;
pub mod stream;

pub use error::{HarnessError, Result};
pub use matcher::Matcher;
pub use patterns_tree::{PatternId, PatternsTree};
