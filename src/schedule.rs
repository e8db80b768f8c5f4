use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::ValueEnum;

/// How the candidate range is sliced into chunks and handed to workers.
///
/// The policy affects load balance and dispatch overhead only; the set of
/// candidates visited is identical under all three.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Schedule {
    /// Fixed chunks assigned round-robin by worker id, computed up front.
    Static,
    /// Workers pull fixed-size chunks from a shared cursor as they finish.
    Dynamic,
    /// Chunk size shrinks with the remaining range (remaining / workers),
    /// floored at the chunk hint.
    Guided,
}

impl Schedule {
    /// Label used in the benchmark CSV.
    pub fn label(&self) -> &'static str {
        match self {
            Schedule::Static => "Static",
            Schedule::Dynamic => "Dynamic",
            Schedule::Guided => "Guided",
        }
    }
}

/// Hands out disjoint index spans of `[0, total)` to workers.
///
/// Static assignment is derived locally from the worker id and its own claim
/// counter; dynamic and guided share one atomic cursor. Every index is
/// claimed exactly once regardless of policy or thread interleaving.
pub struct Dispatcher {
    schedule: Schedule,
    total: usize,
    workers: usize,
    chunk: usize,
    cursor: AtomicUsize,
}

impl Dispatcher {
    pub fn new(schedule: Schedule, total: usize, workers: usize, chunk: usize) -> Self {
        Self {
            schedule,
            total,
            workers,
            chunk,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Claim the next span for `worker`. `claimed` is the worker's own count
    /// of spans taken so far (only static dispatch reads it). Returns None
    /// once the domain is drained for this worker.
    pub fn claim(&self, worker: usize, claimed: &mut usize) -> Option<Range<usize>> {
        if self.total == 0 {
            return None;
        }

        match self.schedule {
            Schedule::Static => {
                let chunk = self.static_chunk();
                // Worker w owns chunks w, w+T, w+2T, ...
                let lo = (*claimed * self.workers + worker) * chunk;
                if lo >= self.total {
                    return None;
                }
                *claimed += 1;
                Some(lo..(lo + chunk).min(self.total))
            }
            Schedule::Dynamic => {
                let step = self.chunk.max(1);
                let lo = self.cursor.fetch_add(step, Ordering::Relaxed);
                if lo >= self.total {
                    return None;
                }
                Some(lo..(lo + step).min(self.total))
            }
            Schedule::Guided => loop {
                let lo = self.cursor.load(Ordering::Relaxed);
                if lo >= self.total {
                    return None;
                }
                let remaining = self.total - lo;
                let step = (remaining / self.workers)
                    .max(self.chunk.max(1))
                    .min(remaining);
                if self
                    .cursor
                    .compare_exchange_weak(lo, lo + step, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok()
                {
                    return Some(lo..lo + step);
                }
            },
        }
    }

    /// Chunk hint 0 under static scheduling means one even contiguous slice
    /// per worker.
    fn static_chunk(&self) -> usize {
        if self.chunk > 0 {
            self.chunk
        } else {
            self.total.div_ceil(self.workers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drain the dispatcher as if each worker ran to completion, returning
    /// every claimed index. Single-threaded, but cursor interleaving cannot
    /// create gaps or overlaps, so this exercises the same arithmetic.
    fn drain(schedule: Schedule, total: usize, workers: usize, chunk: usize) -> Vec<usize> {
        let dispatcher = Dispatcher::new(schedule, total, workers, chunk);
        let mut indices = Vec::new();
        for worker in 0..workers {
            let mut claimed = 0;
            while let Some(span) = dispatcher.claim(worker, &mut claimed) {
                indices.extend(span);
            }
        }
        indices
    }

    fn assert_exact_cover(mut indices: Vec<usize>, total: usize) {
        indices.sort_unstable();
        let expected: Vec<usize> = (0..total).collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_static_covers_domain_exactly_once() {
        assert_exact_cover(drain(Schedule::Static, 1000, 4, 10), 1000);
        assert_exact_cover(drain(Schedule::Static, 997, 3, 7), 997);
    }

    #[test]
    fn test_static_chunk_zero_splits_evenly() {
        let dispatcher = Dispatcher::new(Schedule::Static, 100, 4, 0);
        let mut claimed = 0;
        assert_eq!(dispatcher.claim(0, &mut claimed), Some(0..25));
        assert_eq!(dispatcher.claim(0, &mut claimed), None);
        let mut claimed = 0;
        assert_eq!(dispatcher.claim(3, &mut claimed), Some(75..100));
        assert_exact_cover(drain(Schedule::Static, 100, 4, 0), 100);
        assert_exact_cover(drain(Schedule::Static, 101, 4, 0), 101);
    }

    #[test]
    fn test_dynamic_covers_domain_exactly_once() {
        assert_exact_cover(drain(Schedule::Dynamic, 1000, 4, 50), 1000);
        // Chunk 0 is treated as 1
        assert_exact_cover(drain(Schedule::Dynamic, 37, 2, 0), 37);
    }

    #[test]
    fn test_guided_covers_domain_exactly_once() {
        assert_exact_cover(drain(Schedule::Guided, 1000, 4, 10), 1000);
        assert_exact_cover(drain(Schedule::Guided, 12345, 8, 50), 12345);
    }

    #[test]
    fn test_guided_spans_shrink() {
        let dispatcher = Dispatcher::new(Schedule::Guided, 1024, 4, 1);
        let mut claimed = 0;
        let first = dispatcher.claim(0, &mut claimed).unwrap();
        let second = dispatcher.claim(0, &mut claimed).unwrap();
        assert_eq!(first.len(), 256);
        assert!(second.len() < first.len());
    }

    #[test]
    fn test_empty_domain_yields_no_spans() {
        for schedule in [Schedule::Static, Schedule::Dynamic, Schedule::Guided] {
            let dispatcher = Dispatcher::new(schedule, 0, 4, 50);
            let mut claimed = 0;
            assert_eq!(dispatcher.claim(0, &mut claimed), None);
        }
    }

    #[test]
    fn test_more_workers_than_candidates() {
        assert_exact_cover(drain(Schedule::Static, 3, 8, 10), 3);
        assert_exact_cover(drain(Schedule::Dynamic, 3, 8, 10), 3);
        assert_exact_cover(drain(Schedule::Guided, 3, 8, 10), 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Schedule::Static.label(), "Static");
        assert_eq!(Schedule::Dynamic.label(), "Dynamic");
        assert_eq!(Schedule::Guided.label(), "Guided");
    }
}
