//! Conformance self-test for the compiled engine.
//!
//! Replays the vocabulary on `ActiveEngine` with deterministic random inputs
//! and compares every lane against `ScalarEngine`:
//!
//! - exact operations (set/load/store, add/sub/mul/div, min/max, logical,
//!   comparison, conversion, integer arithmetic) must match bit for bit;
//! - estimates (`rcp`, `rsqrt`, `sqrt`) must stay within their documented
//!   relative tolerance of the exact value.
//!
//! Inputs are restricted to finite, non-zero, in-range values; NaN handling,
//! signed-zero `min`/`max` and out-of-range conversions are engine-specific
//! and excluded. Samples are split into chunks that run concurrently on a
//! `rayon` pool, each chunk seeded from `seed + chunk_index` so a run is
//! reproducible regardless of thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::error::{ConformanceError, Result};
use crate::lanes::Aligned4;
use crate::simd_abstraction::{
    ActiveEngine, LANES, LaneEngine, RCP_REL_TOLERANCE, SQRT_REL_TOLERANCE, ScalarEngine,
};

/// Magnitude bound of generated float lanes.
const FLOAT_RANGE: f32 = 1.0e4;
/// Smallest magnitude of a divisor or estimate input.
const MIN_MAGNITUDE: f32 = 1.0e-3;
/// Upper bound of inputs to `rcp` / `rsqrt` / `sqrt`.
const ESTIMATE_RANGE: f32 = 1.0e6;

/// Runtime configuration of a conformance run.
#[derive(Debug, Clone)]
pub struct ConformanceConfig {
    /// Number of 4-lane samples per operation
    pub samples: usize,
    /// Base RNG seed
    pub seed: u64,
    /// Samples per parallel work unit
    pub chunk_size: usize,
    /// Worker threads; 0 uses rayon's default
    pub threads: usize,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        Self {
            samples: 100_000,
            seed: 0x5EED_0004_1A4E,
            chunk_size: 4096,
            threads: 0,
        }
    }
}

impl ConformanceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(ConformanceError::InvalidConfig(
                "samples must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConformanceError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn chunk_count(&self) -> usize {
        self.samples.div_ceil(self.chunk_size)
    }
}

/// Outcome of a passing run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceReport {
    /// `LaneEngine::NAME` of the engine under test
    pub backend: &'static str,
    pub samples: usize,
    /// Individual lane comparisons performed
    pub lane_checks: u64,
    /// Worst observed relative error of `rcp`
    pub max_rcp_error: f32,
    /// Worst observed relative error of `rsqrt` / `sqrt`
    pub max_sqrt_error: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct ChunkStats {
    samples: usize,
    lane_checks: u64,
    max_rcp_error: f32,
    max_sqrt_error: f32,
}

impl ChunkStats {
    fn merge(self, other: ChunkStats) -> ChunkStats {
        ChunkStats {
            samples: self.samples + other.samples,
            lane_checks: self.lane_checks + other.lane_checks,
            max_rcp_error: self.max_rcp_error.max(other.max_rcp_error),
            max_sqrt_error: self.max_sqrt_error.max(other.max_sqrt_error),
        }
    }
}

/// Run the conformance suite against `ActiveEngine`.
pub fn run(config: &ConformanceConfig) -> Result<ConformanceReport> {
    config.validate()?;

    log::info!(
        "Conformance: {} samples on {} ({} chunks of {})",
        config.samples,
        ActiveEngine::NAME,
        config.chunk_count(),
        config.chunk_size
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let stats = pool.install(|| {
        (0..config.chunk_count())
            .into_par_iter()
            .map(|chunk| check_chunk::<ActiveEngine>(config, chunk))
            .try_reduce(ChunkStats::default, |a, b| Ok(a.merge(b)))
    });

    let stats = match stats {
        Ok(stats) => stats,
        Err(e) => {
            log::warn!("Conformance failure: {}", e);
            return Err(e);
        }
    };

    log::info!(
        "Conformance passed: {} lane checks, max rcp error {:e}, max sqrt error {:e}",
        stats.lane_checks,
        stats.max_rcp_error,
        stats.max_sqrt_error
    );

    Ok(ConformanceReport {
        backend: ActiveEngine::NAME,
        samples: stats.samples,
        lane_checks: stats.lane_checks,
        max_rcp_error: stats.max_rcp_error,
        max_sqrt_error: stats.max_sqrt_error,
    })
}

/// One sample's worth of inputs.
struct Sample {
    a: [f32; LANES],
    b: [f32; LANES],
    c: [f32; LANES],
    positive: [f32; LANES],
    ia: [i32; LANES],
    ib: [i32; LANES],
}

impl Sample {
    fn generate(rng: &mut StdRng) -> Self {
        let mut nonzero = || {
            let magnitude = rng.gen_range(MIN_MAGNITUDE..FLOAT_RANGE);
            if rng.r#gen::<bool>() { magnitude } else { -magnitude }
        };
        let a = [nonzero(), nonzero(), nonzero(), nonzero()];
        let b = [nonzero(), nonzero(), nonzero(), nonzero()];
        let c = [nonzero(), nonzero(), nonzero(), nonzero()];
        let positive = std::array::from_fn(|_| rng.gen_range(MIN_MAGNITUDE..ESTIMATE_RANGE));
        let ia = std::array::from_fn(|_| rng.r#gen::<i32>());
        let ib = std::array::from_fn(|_| rng.r#gen::<i32>());
        Sample { a, b, c, positive, ia, ib }
    }
}

fn lanes_ps<E: LaneEngine>(v: E::F32x4) -> [f32; LANES] {
    let mut out = Aligned4::splat(0.0f32);
    unsafe { E::store_ps(out.as_mut_ptr(), v) };
    out.0
}

fn lanes_epi32<E: LaneEngine>(v: E::I32x4) -> [i32; LANES] {
    let mut out = Aligned4::splat(0i32);
    unsafe { E::store_epi32(out.as_mut_ptr(), v) };
    out.0
}

fn set_from<E: LaneEngine>(x: [f32; LANES]) -> E::F32x4 {
    E::set_ps(x[0], x[1], x[2], x[3])
}

fn set_from_epi32<E: LaneEngine>(x: [i32; LANES]) -> E::I32x4 {
    E::set_epi32(x[0], x[1], x[2], x[3])
}

struct Checker {
    sample: usize,
    stats: ChunkStats,
}

impl Checker {
    fn exact_bits(
        &mut self,
        op: &'static str,
        expected: [u32; LANES],
        actual: [u32; LANES],
    ) -> Result<()> {
        for lane in 0..LANES {
            self.stats.lane_checks += 1;
            if expected[lane] != actual[lane] {
                return Err(ConformanceError::Mismatch {
                    op,
                    sample: self.sample,
                    lane,
                    expected: expected[lane],
                    actual: actual[lane],
                });
            }
        }
        Ok(())
    }

    fn exact_ps(
        &mut self,
        op: &'static str,
        expected: [f32; LANES],
        actual: [f32; LANES],
    ) -> Result<()> {
        self.exact_bits(op, expected.map(f32::to_bits), actual.map(f32::to_bits))
    }

    fn exact_epi32(
        &mut self,
        op: &'static str,
        expected: [i32; LANES],
        actual: [i32; LANES],
    ) -> Result<()> {
        self.exact_bits(op, expected.map(|x| x as u32), actual.map(|x| x as u32))
    }

    /// Check `actual` against the exact value computed in f64; returns the
    /// worst relative error seen.
    fn within(
        &mut self,
        op: &'static str,
        exact: [f64; LANES],
        actual: [f32; LANES],
        tolerance: f32,
    ) -> Result<f32> {
        let mut worst = 0.0f32;
        for lane in 0..LANES {
            self.stats.lane_checks += 1;
            let error = ((actual[lane] as f64 - exact[lane]) / exact[lane]).abs() as f32;
            if !(error <= tolerance) {
                return Err(ConformanceError::ToleranceExceeded {
                    op,
                    sample: self.sample,
                    lane,
                    expected: exact[lane] as f32,
                    actual: actual[lane],
                    error,
                    tolerance,
                });
            }
            worst = worst.max(error);
        }
        Ok(worst)
    }
}

fn check_chunk<E: LaneEngine>(config: &ConformanceConfig, chunk: usize) -> Result<ChunkStats> {
    type R = ScalarEngine;

    let start = chunk * config.chunk_size;
    let end = (start + config.chunk_size).min(config.samples);
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(chunk as u64));
    let mut checker = Checker {
        sample: start,
        stats: ChunkStats::default(),
    };

    for sample in start..end {
        checker.sample = sample;
        let s = Sample::generate(&mut rng);

        // Construction and memory transfer
        let ea = set_from::<E>(s.a);
        let eb = set_from::<E>(s.b);
        let ec = set_from::<E>(s.c);
        let (ra, rb, rc) = (s.a, s.b, s.c);
        checker.exact_ps("set_ps", s.a, lanes_ps::<E>(ea))?;

        let mut buf = Aligned4(s.a);
        let loaded = unsafe { E::load_ps(buf.as_ptr()) };
        unsafe { E::store_ps(buf.as_mut_ptr(), E::add_ps(loaded, eb)) };
        checker.exact_ps("load_ps/store_ps", R::add_ps(ra, rb), buf.0)?;

        let broadcast = E::set1_ps(s.c[0]);
        checker.exact_ps("set1_ps", R::set1_ps(s.c[0]), lanes_ps::<E>(broadcast))?;

        // Float arithmetic
        checker.exact_ps("add_ps", R::add_ps(ra, rb), lanes_ps::<E>(E::add_ps(ea, eb)))?;
        checker.exact_ps("sub_ps", R::sub_ps(ra, rb), lanes_ps::<E>(E::sub_ps(ea, eb)))?;
        checker.exact_ps("mul_ps", R::mul_ps(ra, rb), lanes_ps::<E>(E::mul_ps(ea, eb)))?;
        checker.exact_ps("div_ps", R::div_ps(ra, rb), lanes_ps::<E>(E::div_ps(ea, eb)))?;
        checker.exact_ps(
            "add_ps x3",
            R::add_ps(R::add_ps(ra, rb), rc),
            lanes_ps::<E>(E::add_ps(E::add_ps(ea, eb), ec)),
        )?;
        checker.exact_ps("min_ps", R::min_ps(ra, rb), lanes_ps::<E>(E::min_ps(ea, eb)))?;
        checker.exact_ps("max_ps", R::max_ps(ra, rb), lanes_ps::<E>(E::max_ps(ea, eb)))?;

        // Estimates
        let ep = set_from::<E>(s.positive);
        let recip = s.positive.map(|x| 1.0 / x as f64);
        let rsqrt = s.positive.map(|x| 1.0 / (x as f64).sqrt());
        let root = s.positive.map(|x| (x as f64).sqrt());
        let err = checker.within("rcp_ps", recip, lanes_ps::<E>(E::rcp_ps(ep)), RCP_REL_TOLERANCE)?;
        checker.stats.max_rcp_error = checker.stats.max_rcp_error.max(err);
        let err = checker.within(
            "rsqrt_ps",
            rsqrt,
            lanes_ps::<E>(E::rsqrt_ps(ep)),
            SQRT_REL_TOLERANCE,
        )?;
        checker.stats.max_sqrt_error = checker.stats.max_sqrt_error.max(err);
        let err = checker.within("sqrt_ps", root, lanes_ps::<E>(E::sqrt_ps(ep)), SQRT_REL_TOLERANCE)?;
        checker.stats.max_sqrt_error = checker.stats.max_sqrt_error.max(err);

        // Comparison masks and float logic
        let egt = E::cmpgt_ps(ea, eb);
        let elt = E::cmplt_ps(ea, eb);
        let rgt = R::cmpgt_ps(ra, rb);
        let rlt = R::cmplt_ps(ra, rb);
        checker.exact_ps("cmpgt_ps", rgt, lanes_ps::<E>(egt))?;
        checker.exact_ps("cmplt_ps", rlt, lanes_ps::<E>(elt))?;
        checker.exact_ps("and_ps", R::and_ps(rgt, rc), lanes_ps::<E>(E::and_ps(egt, ec)))?;
        checker.exact_ps("or_ps", R::or_ps(ra, rb), lanes_ps::<E>(E::or_ps(ea, eb)))?;
        checker.exact_ps("xor_ps", R::xor_ps(ra, rb), lanes_ps::<E>(E::xor_ps(ea, eb)))?;
        checker.exact_ps(
            "andnot_ps",
            R::andnot_ps(rgt, rc),
            lanes_ps::<E>(E::andnot_ps(egt, ec)),
        )?;

        // Integer arithmetic, logic and comparison
        let (ia, ib) = (s.ia, s.ib);
        let eia = set_from_epi32::<E>(ia);
        let eib = set_from_epi32::<E>(ib);
        checker.exact_epi32("set_epi32", ia, lanes_epi32::<E>(eia))?;
        checker.exact_epi32(
            "add_epi32",
            R::add_epi32(ia, ib),
            lanes_epi32::<E>(E::add_epi32(eia, eib)),
        )?;
        checker.exact_epi32(
            "sub_epi32",
            R::sub_epi32(ia, ib),
            lanes_epi32::<E>(E::sub_epi32(eia, eib)),
        )?;
        checker.exact_epi32(
            "mullo_epi32",
            R::mullo_epi32(ia, ib),
            lanes_epi32::<E>(E::mullo_epi32(eia, eib)),
        )?;
        checker.exact_epi32(
            "min_epi32",
            R::min_epi32(ia, ib),
            lanes_epi32::<E>(E::min_epi32(eia, eib)),
        )?;
        checker.exact_epi32(
            "max_epi32",
            R::max_epi32(ia, ib),
            lanes_epi32::<E>(E::max_epi32(eia, eib)),
        )?;
        checker.exact_epi32("and_si", R::and_si(ia, ib), lanes_epi32::<E>(E::and_si(eia, eib)))?;
        checker.exact_epi32("or_si", R::or_si(ia, ib), lanes_epi32::<E>(E::or_si(eia, eib)))?;
        checker.exact_epi32("xor_si", R::xor_si(ia, ib), lanes_epi32::<E>(E::xor_si(eia, eib)))?;
        checker.exact_epi32(
            "andnot_si",
            R::andnot_si(ia, ib),
            lanes_epi32::<E>(E::andnot_si(eia, eib)),
        )?;
        checker.exact_epi32(
            "cmpgt_epi32",
            R::cmpgt_epi32(ia, ib),
            lanes_epi32::<E>(E::cmpgt_epi32(eia, eib)),
        )?;
        checker.exact_epi32(
            "cmplt_epi32",
            R::cmplt_epi32(ia, ib),
            lanes_epi32::<E>(E::cmplt_epi32(eia, eib)),
        )?;

        let mut ibuf = Aligned4(ia);
        let iloaded = unsafe { E::load_epi32(ibuf.as_ptr()) };
        unsafe { E::storeu_epi32(ibuf.as_mut_ptr(), E::sub_epi32(iloaded, eib)) };
        checker.exact_epi32("load_epi32/storeu_epi32", R::sub_epi32(ia, ib), ibuf.0)?;

        // Conversion
        checker.exact_ps(
            "cvtepi32_ps",
            R::cvtepi32_ps(ia),
            lanes_ps::<E>(E::cvtepi32_ps(eia)),
        )?;
        checker.exact_epi32(
            "cvttps_epi32",
            R::cvttps_epi32(ra),
            lanes_epi32::<E>(E::cvttps_epi32(ea)),
        )?;
        checker.exact_ps(
            "cast_ps_si",
            R::cast_si_ps(R::cast_ps_si(ra)),
            lanes_ps::<E>(E::cast_si_ps(E::cast_ps_si(ea))),
        )?;

        checker.stats.samples += 1;
    }

    log::debug!(
        "Chunk {}: samples {}..{} ok ({} lane checks)",
        chunk,
        start,
        end,
        checker.stats.lane_checks
    );

    Ok(checker.stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        let config = ConformanceConfig::new().with_samples(2_000).with_chunk_size(256);
        let report = run(&config).expect("active engine should conform");
        assert_eq!(report.backend, ActiveEngine::NAME);
        assert_eq!(report.samples, 2_000);
        assert!(report.lane_checks > 0);
        assert!(report.max_rcp_error <= RCP_REL_TOLERANCE);
        assert!(report.max_sqrt_error <= SQRT_REL_TOLERANCE);
    }

    #[test]
    fn test_report_independent_of_threads() {
        let base = ConformanceConfig::new()
            .with_samples(1_000)
            .with_chunk_size(100)
            .with_seed(7);
        let one = run(&base.clone().with_threads(1)).unwrap();
        let many = run(&base.with_threads(4)).unwrap();
        assert_eq!(one, many);
    }

    #[test]
    fn test_partial_last_chunk() {
        let config = ConformanceConfig::new().with_samples(1_001).with_chunk_size(500);
        assert_eq!(config.chunk_count(), 3);
        let report = run(&config).unwrap();
        assert_eq!(report.samples, 1_001);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = run(&ConformanceConfig::new().with_samples(0)).unwrap_err();
        assert!(matches!(err, ConformanceError::InvalidConfig(_)));

        let err = run(&ConformanceConfig::new().with_chunk_size(0)).unwrap_err();
        assert!(matches!(err, ConformanceError::InvalidConfig(_)));
    }

    #[test]
    fn test_scalar_engine_is_self_consistent() {
        let config = ConformanceConfig::new().with_samples(500).with_chunk_size(500);
        let stats = check_chunk::<ScalarEngine>(&config, 0).unwrap();
        assert_eq!(stats.samples, 500);
        // Exact reciprocal, only f32 rounding against the f64 reference.
        assert!(stats.max_rcp_error < 1.0e-6);
    }

    #[test]
    fn test_mismatch_reports_lane() {
        let mut checker = Checker {
            sample: 3,
            stats: ChunkStats::default(),
        };
        let err = checker
            .exact_ps("add_ps", [1.0, 2.0, 3.0, 4.0], [1.0, 2.0, 3.5, 4.0])
            .unwrap_err();
        match err {
            ConformanceError::Mismatch { op, sample, lane, .. } => {
                assert_eq!(op, "add_ps");
                assert_eq!(sample, 3);
                assert_eq!(lane, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
