//! The Breslauer-Galil real-time single-pattern engine.
//!
//! This is the load-bearing piece of the whole crate: a streaming matcher
//! for one pattern that answers every incoming byte in O(1) amortized work,
//! by running a ladder of "viable occurrence" (VO) progressions alongside a
//! [`crate::kmp::KmpRt`] period oracle that seeds the ladder's first rung.
//!
//! Patterns of length `n <= 8` are not worth the ladder machinery and
//! reduce to a bare [`crate::kmp::KmpRt`] (the `Short` variant below); the
//! full construction only ever runs for `n >= 9`.
//!
//! A handful of index conventions below are only consistent under one
//! reading of "top stage", which is the reading implemented here (see
//! `DESIGN.md` for the resolved ambiguities).

use crate::field::{self, Elem};
use crate::fingerprint::{self, Fp};
use crate::kmp::KmpRt;

/// Default prime field modulus, a Mersenne prime comfortably below 2^32 so
/// any product of two field values fits in a `u64`.
pub const DEFAULT_PRIME: u64 = (1u64 << 31) - 1;

/// Patterns at or below this length skip the VO ladder entirely and are
/// matched by a bare `KmpRt`.
const SHORT_PATTERN_MAX: usize = 8;

#[derive(Copy, Clone, Default)]
struct Vo {
    first_pos: u64,
    first_fp: u64,
    first_r: Elem,
    step_pos: u64,
    step_fp: u64,
    step_r: Elem,
    count: u32,
}

/// The full (non-short) Breslauer-Galil engine state for one pattern.
struct Core {
    p: u64,
    r_elem: Elem,
    pattern_len: usize,
    logn: u32,
    first_stage: u32,
    n_stages: usize,
    need_before_last_stage: bool,

    fps: Vec<Fp>,
    first_stage_r: Elem,

    pp: usize,
    rm: usize,
    n_kmp_period: u64,
    kmp_period: KmpRt,
    kmp_remaining: Option<KmpRt>,

    vos: Vec<Vo>,
    has_last_stage: bool,
    has_before_last_stage: bool,

    last_fps: Vec<u64>,

    current_pos: u64,
    current_fp: u64,
    current_r: Elem,
    current_stage: usize,
    current_n_kmp_period: u64,
    last_kmp_period_match_pos: Option<u64>,

    collisions: u64,
}

/// Length of the prefix a VO has verified once it reaches rung `j`:
/// `min(2^(first_stage + j), n)`. Defined for `j` in `0..=n_stages`; at
/// `j == n_stages` this always equals the full pattern length.
fn stage_length(first_stage: u32, j: usize, n: usize) -> usize {
    let exp = first_stage as u64 + j as u64;
    let pow = if exp >= 63 { u64::MAX } else { 1u64 << exp };
    (pow.min(n as u64)) as usize
}

fn ceil_log2(x: usize) -> u32 {
    if x <= 1 {
        0
    } else {
        (usize::BITS) - (x - 1).leading_zeros()
    }
}

impl Core {
    fn new(pattern: &[u8], p: u64, r: u64) -> Self {
        let n = pattern.len();
        debug_assert!(n > SHORT_PATTERN_MAX, "Core::new: pattern too short for the full ladder");

        let logn = ceil_log2(n);
        let loglogn = ceil_log2(logn as usize) + 1;

        let two_loglogn = (1usize << loglogn).min(n);
        let pp = crate::kmp::period_of(&pattern[..two_loglogn]).max(1);

        let mut k = two_loglogn;
        while k < n && pattern[k] == pattern[k % pp] {
            k += 1;
        }
        let stop_pos = k.max(1);
        let first_stage = (usize::BITS - 1) - stop_pos.leading_zeros();

        let n_stages = (logn as i64 - first_stage as i64).max(0) as usize;

        let first_stage_len = stage_length(first_stage, 0, n) as u64;
        let rm = (first_stage_len % pp as u64) as usize;
        let n_kmp_period = first_stage_len / pp as u64;

        let kmp_period = KmpRt::new(pattern[..pp].to_vec());
        let kmp_remaining = if rm != 0 { Some(KmpRt::new(pattern[..rm].to_vec())) } else { None };

        let r_elem = Elem::new(r, p);
        let first_stage_r = field::pow(r_elem, first_stage_len.saturating_sub(1), p);

        let mut fps = Vec::with_capacity(n_stages + 1);
        fps.push(fingerprint::fp(&pattern[..first_stage_len as usize], r, p));
        for j in 1..=n_stages {
            let prev_len = stage_length(first_stage, j - 1, n);
            let len = stage_length(first_stage, j, n);
            let extended = fingerprint::fp_extend(&pattern[prev_len..len], r, p, fps[j - 1]);
            fps.push(extended);
        }

        let need_before_last_stage = n_stages >= 2
            && (n as i64 - (1i64 << (logn.saturating_sub(1)))) < logn as i64;

        let logn_slots = (logn as usize).max(1);

        Core {
            p,
            r_elem,
            pattern_len: n,
            logn: logn.max(1),
            first_stage,
            n_stages,
            need_before_last_stage,
            fps,
            first_stage_r,
            pp,
            rm,
            n_kmp_period,
            kmp_period,
            kmp_remaining,
            vos: vec![Vo::default(); n_stages],
            has_last_stage: false,
            has_before_last_stage: false,
            last_fps: vec![0u64; logn_slots],
            current_pos: 0,
            current_fp: 0,
            current_r: Elem::new(1, p),
            current_stage: 0,
            current_n_kmp_period: 0,
            last_kmp_period_match_pos: None,
            collisions: 0,
        }
    }

    fn stage_len(&self, j: usize) -> usize {
        stage_length(self.first_stage, j, self.pattern_len)
    }

    fn read_char(&mut self, byte: u8) -> bool {
        let pos = self.current_pos;
        let p = self.p;

        self.current_fp = field::add_mod(self.current_fp, field::mul_mod(byte as u64, self.current_r.val, p), p);
        let logn = self.logn as u64;
        self.last_fps[(pos % logn) as usize] = self.current_fp;

        let mut matched = false;

        // 1. First stage, via the KMP period oracle.
        if let Some(mp) = self.kmp_period.read_char(byte) {
            if self.last_kmp_period_match_pos == Some(mp.wrapping_sub(self.pp as u64)) {
                self.current_n_kmp_period += 1;
            } else {
                self.current_n_kmp_period = 1;
            }
            self.last_kmp_period_match_pos = Some(mp);
        } else if let Some(last) = self.last_kmp_period_match_pos {
            if last + self.pp as u64 <= pos {
                self.current_n_kmp_period = 0;
            }
        }

        let remaining_match = match &mut self.kmp_remaining {
            Some(rem) => rem.read_char(byte) == Some(pos),
            None => true,
        };

        let tail_len = if self.rm != 0 { self.rm as u64 } else { self.pp as u64 };
        let position_ok = self.last_kmp_period_match_pos == Some(pos.wrapping_sub(tail_len));

        let first_stage_match =
            remaining_match && self.current_n_kmp_period >= self.n_kmp_period && position_ok;

        if first_stage_match {
            let first_stage_len = self.stage_len(0) as u64;
            if pos + 1 >= first_stage_len {
                let vo_pos = pos + 1 - first_stage_len;
                let vo_r = field::div(self.current_r, self.first_stage_r, p);
                let vo_fp = fingerprint::fp_prefix(self.current_fp, self.fps[0].val, vo_r.val, p);
                if self.n_stages == 0 {
                    matched = true;
                } else {
                    self.vo_add(0, vo_pos, vo_fp, vo_r);
                }
            }
        }

        // 2. Last-stage(s), checked every character regardless of round robin.
        if self.n_stages >= 2 && self.has_before_last_stage {
            self.upgrade(self.n_stages - 2, pos);
        }
        if self.n_stages >= 1 && self.has_last_stage {
            if self.upgrade(self.n_stages - 1, pos) {
                matched = true;
            }
        }

        // 3. Round-robin over every stage except the top two, strictly
        // decreasing: this drains an aging VO before a fresh one can be
        // promoted into the same stage on the same character. The top two
        // stages (`n_stages - 1`, `n_stages - 2`) are excluded here because
        // they are already checked unconditionally every character in step
        // 2; including one of them here too would drop its leading VO
        // twice on the same byte.
        if self.n_stages > 2 {
            let modulus = self.n_stages - 2;
            self.upgrade(self.current_stage, pos);
            self.current_stage = (self.current_stage + modulus - 1) % modulus;
        }

        // 4. Advance rolling state.
        self.current_r = field::mul(self.current_r, self.r_elem, p);
        self.current_pos += 1;

        matched
    }

    /// Offer a candidate VO `(pos, fp, r)` — where `fp = fp(stream[0..pos))`
    /// and `r = r^pos` — into stage `stage`'s progression.
    fn vo_add(&mut self, stage: usize, pos: u64, fp: u64, r: Elem) {
        let p = self.p;
        let n_stages = self.n_stages;
        let need_before_last = self.need_before_last_stage;
        let is_top = stage + 1 == n_stages;
        let is_before_top = n_stages >= 2 && stage + 2 == n_stages;

        let count = self.vos[stage].count;
        match count {
            0 => {
                {
                    let vo = &mut self.vos[stage];
                    vo.first_pos = pos;
                    vo.first_fp = fp;
                    vo.first_r = r;
                    vo.count = 1;
                }
                if is_top {
                    self.has_last_stage = true;
                }
                if need_before_last && is_before_top {
                    self.has_before_last_stage = true;
                }
            }
            1 => {
                let (first_pos, first_fp, first_r) = {
                    let vo = &self.vos[stage];
                    (vo.first_pos, vo.first_fp, vo.first_r)
                };
                let step_pos = pos - first_pos;
                let step_fp = fingerprint::fp_suffix(fp, first_fp, first_r.inv, p);
                let step_r = field::div(r, first_r, p);
                let vo = &mut self.vos[stage];
                vo.step_pos = step_pos;
                vo.step_fp = step_fp;
                vo.step_r = step_r;
                vo.count = 2;
            }
            _ => {
                let (first_pos, step_pos) = {
                    let vo = &self.vos[stage];
                    (vo.first_pos, vo.step_pos)
                };
                let expected = first_pos + count as u64 * step_pos;
                if pos != expected {
                    log::warn!(
                        "dictbench: fingerprint collision at ladder stage {stage}, stream position {pos}"
                    );
                    self.collisions += 1;
                } else if count < u32::MAX {
                    self.vos[stage].count += 1;
                }
            }
        }
    }

    /// Attempt to extend stage `stage`'s leading VO to rung `stage + 1`.
    /// Returns true exactly when this call completed a full-pattern match
    /// (i.e. `stage` is the top rung and the extension succeeded).
    fn upgrade(&mut self, stage: usize, current_pos: u64) -> bool {
        if self.vos[stage].count == 0 {
            return false;
        }

        let target_len = self.stage_len(stage + 1) as u64;
        let first_pos = self.vos[stage].first_pos;
        let end_pos = first_pos + target_len - 1;

        if current_pos < end_pos {
            return false;
        }

        let logn = self.logn as u64;
        let mut is_match = false;

        if current_pos < end_pos + logn {
            let f = self.last_fps[(end_pos % logn) as usize];
            let (first_fp, first_r) = {
                let vo = &self.vos[stage];
                (vo.first_fp, vo.first_r)
            };
            let block_fp = fingerprint::fp_suffix(f, first_fp, first_r.inv, self.p);
            if block_fp == self.fps[stage + 1].val {
                if stage + 1 == self.n_stages {
                    is_match = true;
                } else {
                    self.vo_add(stage + 1, first_pos, first_fp, first_r);
                }
            }
        }

        self.drop_first(stage);
        is_match
    }

    /// Pop the leading VO out of stage `stage`'s progression, whether or
    /// not it successfully extended.
    fn drop_first(&mut self, stage: usize) {
        let n_stages = self.n_stages;
        let count = self.vos[stage].count;
        if count <= 1 {
            self.vos[stage].count = 0;
            if stage + 1 == n_stages {
                self.has_last_stage = false;
            }
            if n_stages >= 2 && stage + 2 == n_stages {
                self.has_before_last_stage = false;
            }
        } else {
            let p = self.p;
            let (first_fp, first_r, step_fp, step_r, step_pos) = {
                let vo = &self.vos[stage];
                (vo.first_fp, vo.first_r, vo.step_fp, vo.step_r, vo.step_pos)
            };
            let new_first_fp = fingerprint::fp_concat(first_fp, step_fp, first_r.val, p);
            let new_first_r = field::mul(first_r, step_r, p);
            let vo = &mut self.vos[stage];
            vo.first_pos += step_pos;
            vo.first_fp = new_first_fp;
            vo.first_r = new_first_r;
            vo.count -= 1;
        }
    }

    fn reset(&mut self) {
        self.current_pos = 0;
        self.current_fp = 0;
        self.current_r = Elem::new(1, self.p);
        self.current_stage = 0;
        self.current_n_kmp_period = 0;
        self.last_kmp_period_match_pos = None;
        for vo in &mut self.vos {
            *vo = Vo::default();
        }
        self.has_last_stage = false;
        self.has_before_last_stage = false;
        for slot in &mut self.last_fps {
            *slot = 0;
        }
        self.kmp_period.reset();
        if let Some(rem) = &mut self.kmp_remaining {
            rem.reset();
        }
    }

    fn total_mem(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.fps.capacity() * std::mem::size_of::<Fp>()
            + self.vos.capacity() * std::mem::size_of::<Vo>()
            + self.last_fps.capacity() * std::mem::size_of::<u64>()
            + self.kmp_period.total_mem()
            + self.kmp_remaining.as_ref().map_or(0, KmpRt::total_mem)
    }
}

/// A Breslauer-Galil engine for a single pattern, dispatching to a bare
/// [`KmpRt`] for patterns too short to benefit from the VO ladder.
pub enum Bg {
    Short(KmpRt),
    Full(Box<Core>),
}

impl Bg {
    /// Build an engine for `pattern` over the prime field `p`, choosing its
    /// random base `r` deterministically from `seed` so runs and tests are
    /// reproducible.
    pub fn new(pattern: Vec<u8>, p: u64, seed: u64) -> Self {
        assert!(!pattern.is_empty(), "Bg::new: empty pattern");
        if pattern.len() <= SHORT_PATTERN_MAX {
            Bg::Short(KmpRt::new(pattern))
        } else {
            use rand::Rng;
            use rand::SeedableRng;
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
            let r = rng.gen_range(2..p);
            Bg::Full(Box::new(Core::new(&pattern, p, r)))
        }
    }

    pub fn pattern_len(&self) -> usize {
        match self {
            Bg::Short(kmp) => kmp.pattern_len(),
            Bg::Full(core) => core.pattern_len,
        }
    }

    /// Feed one byte. Returns true iff the pattern's full occurrence ends
    /// exactly at this byte.
    pub fn read_char(&mut self, byte: u8) -> bool {
        match self {
            Bg::Short(kmp) => kmp.read_char(byte).is_some(),
            Bg::Full(core) => core.read_char(byte),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Bg::Short(kmp) => kmp.reset(),
            Bg::Full(core) => core.reset(),
        }
    }

    pub fn total_mem(&self) -> usize {
        match self {
            Bg::Short(kmp) => kmp.total_mem(),
            Bg::Full(core) => core.total_mem(),
        }
    }

    /// Number of fingerprint collisions logged so far (always 0 for the
    /// short-pattern path, which has no fingerprint ladder to collide in).
    pub fn collisions(&self) -> u64 {
        match self {
            Bg::Short(_) => 0,
            Bg::Full(core) => core.collisions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_positions(pattern: &[u8], text: &[u8], seed: u64) -> Vec<u64> {
        let mut bg = Bg::new(pattern.to_vec(), DEFAULT_PRIME, seed);
        let mut out = Vec::new();
        for (i, &b) in text.iter().enumerate() {
            if bg.read_char(b) {
                out.push(i as u64);
            }
        }
        out
    }

    fn naive_end_positions(pattern: &[u8], text: &[u8]) -> Vec<u64> {
        let m = pattern.len();
        let n = text.len();
        let mut out = Vec::new();
        if m == 0 || m > n {
            return out;
        }
        for i in 0..=(n - m) {
            if &text[i..i + m] == pattern {
                out.push((i + m - 1) as u64);
            }
        }
        out
    }

    #[test]
    fn single_occurrence_long_pattern() {
        let pattern = b"abcdabdabc"; // n = 10, exercises the full ladder
        let text = b"xxxxxabcdabdabcxxxxxxxxxxxx";
        assert_eq!(match_positions(pattern, text, 1), naive_end_positions(pattern, text));
    }

    #[test]
    fn scenario_one_from_spec() {
        let pattern = b"ABCDABDABC";
        let text = b"ABCDABCDABDABCDABDABCDABBABCDABDABCDABDBADFSG";
        assert_eq!(match_positions(pattern, text, 7), vec![12, 19, 33]);
    }

    #[test]
    fn scenario_three_overlapping_periodic() {
        let pattern = b"aaaaa";
        let text = b"aaaaaaa";
        assert_eq!(match_positions(pattern, text, 3), vec![4, 5, 6]);
    }

    #[test]
    fn scenario_six_highly_periodic_prefix() {
        let pattern = b"AAAAAAAAAAAAAAAAAB";
        let text = b"AAAAAAAAAAAAAAAAABAAAAAABAAAAAAAAAAAAAAAAABAAAAAAA";
        assert_eq!(match_positions(pattern, text, 11), vec![17, 42]);
    }

    #[test]
    fn short_pattern_path_matches_naive() {
        let pattern = b"abc"; // n = 3 <= SHORT_PATTERN_MAX
        let text = b"xxabcxxabcxx";
        assert_eq!(match_positions(pattern, text, 5), naive_end_positions(pattern, text));
    }

    #[test]
    fn no_match_reports_nothing() {
        assert!(match_positions(b"zzz", b"aaaaaaaaaaaaaaaaaaaa", 2).is_empty());
    }

    #[test]
    fn random_texts_agree_with_naive_search() {
        use rand::Rng;
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        for trial in 0..20u64 {
            let alphabet = [b'a', b'b'];
            let pattern: Vec<u8> = (0..13).map(|_| alphabet[rng.gen_range(0..2)]).collect();
            let text: Vec<u8> = (0..200).map(|_| alphabet[rng.gen_range(0..2)]).collect();
            let got = match_positions(&pattern, &text, trial);
            let want = naive_end_positions(&pattern, &text);
            assert_eq!(got, want, "pattern={pattern:?}");
        }
    }

    #[test]
    fn long_aperiodic_pattern_exercises_vo_ladder() {
        // Every other pattern in this file is short enough that
        // `n_stages <= 1`: `first_stage` ends up within one rung of `logn`,
        // so `Core::read_char` only ever takes the `n_stages == 0/1`
        // branches and never drives the round-robin tick or the
        // before-last-stage check. `first_stage` is fully determined by the
        // pattern's first `2^loglogn` bytes, so pinning those to be
        // pairwise distinct (period exactly `2^loglogn`, the "no internal
        // period" boundary case) and breaking the period at the very next
        // byte forces `first_stage` down to `loglogn` and `n_stages` up to
        // `logn - loglogn`, regardless of what the rest of the pattern
        // looks like.
        let mut pattern: Vec<u8> = (0u8..32).collect();
        pattern.extend((32usize..520).map(|i| b'A' + (i % 26) as u8));
        assert_ne!(pattern[32], pattern[0], "must break the period right after the prefix");

        let logn = ceil_log2(pattern.len());
        let loglogn = ceil_log2(logn as usize) + 1;
        let two_loglogn = (1usize << loglogn).min(pattern.len());
        let pp = crate::kmp::period_of(&pattern[..two_loglogn]).max(1);
        assert_eq!(pp, two_loglogn, "the chosen prefix must be fully aperiodic");
        let mut k = two_loglogn;
        while k < pattern.len() && pattern[k] == pattern[k % pp] {
            k += 1;
        }
        let stop_pos = k.max(1);
        let first_stage = (usize::BITS - 1) - stop_pos.leading_zeros();
        let n_stages = (logn as i64 - first_stage as i64).max(0) as usize;
        assert!(
            n_stages >= 3,
            "test setup failed to reach a multi-rung ladder with a round-robin set (n_stages={n_stages})"
        );

        let mut text = Vec::new();
        text.extend_from_slice(b"zzzzzzzzzzz");
        text.extend_from_slice(&pattern);
        text.extend_from_slice(b"qqqqqqqqqqqqqqqqqqqqqqqqqqq");
        text.extend_from_slice(&pattern);
        text.extend_from_slice(b"x");
        text.extend_from_slice(&pattern);

        let got = match_positions(&pattern, &text, 13);
        let want = naive_end_positions(&pattern, &text);
        assert_eq!(got, want);
    }
}
