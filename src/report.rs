use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::engine::{RunConfig, find_primes};
use crate::schedule::Schedule;

/// Worker counts exercised per benchmark row, in column order T1..T12.
pub const WORKER_LADDER: [usize; 5] = [1, 2, 4, 8, 12];

pub const CSV_HEADER: &str = "M,Scheduling,Chunk,T1,T2,T4,T8,T12,S2,S4,S8";

/// One benchmark row: a (bound, schedule, chunk) cell timed across the
/// worker ladder, with speedups relative to the single-worker run.
pub struct BenchRow {
    pub bound: u64,
    pub schedule: Schedule,
    pub chunk: usize,
    pub timings: [f64; WORKER_LADDER.len()],
}

impl BenchRow {
    /// Speedups S2, S4, S8 = T1/T2, T1/T4, T1/T8. A divisor below clock
    /// resolution yields 0.0 rather than inf/NaN so the CSV stays numeric.
    pub fn speedups(&self) -> [f64; 3] {
        let t1 = self.timings[0];
        let ratio = |t: f64| if t > 0.0 { t1 / t } else { 0.0 };
        [
            ratio(self.timings[1]),
            ratio(self.timings[2]),
            ratio(self.timings[3]),
        ]
    }

    pub fn to_csv_line(&self) -> String {
        let mut line = String::new();
        let mut buf = itoa::Buffer::new();
        line.push_str(buf.format(self.bound));
        line.push(',');
        line.push_str(self.schedule.label());
        line.push(',');
        line.push_str(buf.format(self.chunk));
        for t in self.timings {
            line.push(',');
            line.push_str(&format!("{:.6}", t));
        }
        for s in self.speedups() {
            line.push(',');
            line.push_str(&format!("{:.3}", s));
        }
        line
    }
}

/// Run one benchmark cell: the same (bound, schedule, chunk) configuration
/// at every ladder rung, recording the parallel-phase time of each run.
pub fn bench_cell(bound: u64, schedule: Schedule, chunk: usize) -> Result<BenchRow> {
    let mut timings = [0.0; WORKER_LADDER.len()];
    for (slot, &workers) in WORKER_LADDER.iter().enumerate() {
        let result = find_primes(&RunConfig {
            bound,
            workers,
            schedule,
            chunk,
        })?;
        timings[slot] = result.elapsed_seconds();
    }
    Ok(BenchRow {
        bound,
        schedule,
        chunk,
        timings,
    })
}

/// Run the full matrix ({Static, Dynamic, Guided} x chunk sizes) and write
/// the CSV report.
pub fn run_matrix(bound: u64, chunks: &[usize], output: &Path) -> Result<usize> {
    let file = File::create(output)
        .with_context(|| format!("creating report file {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", CSV_HEADER)?;

    let mut rows = 0;
    for schedule in [Schedule::Static, Schedule::Dynamic, Schedule::Guided] {
        for &chunk in chunks {
            let row = bench_cell(bound, schedule, chunk)?;
            writeln!(writer, "{}", row.to_csv_line())?;
            rows += 1;
        }
    }

    writer.flush()?;
    Ok(rows)
}
