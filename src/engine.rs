use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::prefix::prime_prefix;
use crate::schedule::{Dispatcher, Schedule};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkerCount(usize),
}

/// One invocation of the engine.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    pub bound: u64,
    pub workers: usize,
    pub schedule: Schedule,
    pub chunk: usize,
}

/// Result of one invocation: the full ordered prime list and the wall-clock
/// time of the parallel phase. Prefix construction and the final merge/sort
/// are outside the timed region.
#[derive(Debug)]
pub struct PrimeRun {
    pub primes: Vec<u64>,
    pub elapsed: Duration,
}

impl PrimeRun {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Find all primes up to `config.bound`.
///
/// Phase 1 builds the prefix (primes <= sqrt(bound)) sequentially. Phase 2
/// spawns `config.workers` scoped threads that pull candidate spans from a
/// shared dispatcher and trial-divide each odd candidate against the
/// read-only prefix, collecting survivors in per-worker buckets. The buckets
/// and the prefix are concatenated and sorted after all workers have joined.
///
/// Bounds below 2 produce an empty list with zero elapsed time. Candidate
/// arithmetic is u64 throughout; bounds up to u64::MAX - 2 are representable
/// without wraparound.
pub fn find_primes(config: &RunConfig) -> Result<PrimeRun, EngineError> {
    if config.workers == 0 {
        return Err(EngineError::InvalidWorkerCount(config.workers));
    }

    if config.bound < 2 {
        return Ok(PrimeRun {
            primes: Vec::new(),
            elapsed: Duration::ZERO,
        });
    }

    let prefix = prime_prefix(config.bound);

    // First odd candidate above the prefix boundary. Everything at or below
    // sqrt(bound) was already classified by the sequential phase.
    let start = (config.bound.isqrt() + 1) | 1;
    let total = if config.bound >= start {
        ((config.bound - start) / 2 + 1) as usize
    } else {
        0
    };

    let dispatcher = Dispatcher::new(config.schedule, total, config.workers, config.chunk);

    let mut buckets: Vec<Vec<u64>> = Vec::with_capacity(config.workers);
    let started = Instant::now();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..config.workers)
            .map(|worker| {
                let prefix = &prefix;
                let dispatcher = &dispatcher;
                scope.spawn(move || {
                    let mut bucket = Vec::new();
                    let mut claimed = 0;
                    while let Some(span) = dispatcher.claim(worker, &mut claimed) {
                        for idx in span {
                            let candidate = start + 2 * idx as u64;
                            if survives_trial_division(prefix, candidate) {
                                bucket.push(candidate);
                            }
                        }
                    }
                    bucket
                })
            })
            .collect();

        for handle in handles {
            buckets.push(handle.join().expect("worker thread panicked"));
        }
    });

    let elapsed = started.elapsed();

    // Merge: prefix + buckets, then one full sort. Buckets are internally
    // ascending but interleave arbitrarily relative to each other.
    let mut primes = prefix;
    primes.reserve(buckets.iter().map(Vec::len).sum());
    for mut bucket in buckets {
        primes.append(&mut bucket);
    }
    primes.sort_unstable();

    Ok(PrimeRun { primes, elapsed })
}

/// Trial-divide `candidate` against the prefix primes in increasing order.
///
/// A divisor hit means composite. Once the divisor passes sqrt(candidate)
/// (`candidate / p <= p`, checked after divisibility so exact prime squares
/// are not misread as prime), or the prefix is exhausted, no factor can
/// exist: the prefix covers every prime up to sqrt(bound) >= sqrt(candidate).
fn survives_trial_division(prefix: &[u64], candidate: u64) -> bool {
    for &p in prefix {
        if candidate % p == 0 {
            return false;
        }
        if candidate / p <= p {
            return true;
        }
    }
    true
}
