mod engine;
mod prefix;
mod report;
mod schedule;
mod storage;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::engine::{RunConfig, find_primes};
use crate::schedule::Schedule;

#[derive(Parser)]
#[command(name = "tdsieve")]
#[command(about = "Parallel trial-division prime finder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Find all prime numbers up to a given limit")]
    Find {
        #[arg(help = "The upper limit to search for primes")]
        limit: u64,
        #[arg(
            short,
            long,
            help = "Number of worker threads (defaults to available parallelism)"
        )]
        workers: Option<usize>,
        #[arg(
            short,
            long,
            value_enum,
            default_value = "dynamic",
            help = "Scheduling policy for distributing candidates to workers"
        )]
        schedule: Schedule,
        #[arg(
            short,
            long,
            default_value = "50",
            help = "Chunk size hint for the scheduling policy (0 = policy default)"
        )]
        chunk: usize,
        #[arg(long, help = "Save the prime list to primes.txt in the data directory")]
        save: bool,
    },
    #[command(about = "Benchmark scheduling policies across 1/2/4/8/12 workers and write a CSV report")]
    Bench {
        #[arg(help = "The upper limit to search for primes")]
        limit: u64,
        #[arg(
            long = "chunk",
            default_values_t = vec![50, 100],
            help = "Chunk sizes to benchmark (repeatable)"
        )]
        chunks: Vec<usize>,
        #[arg(
            short,
            long,
            default_value = "results.csv",
            help = "Path of the CSV report"
        )]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find {
            limit,
            workers,
            schedule,
            chunk,
            save,
        } => {
            let start = Instant::now();

            let workers = workers.unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            });

            println!(
                "Finding primes up to {} ({:?} schedule, chunk {})...",
                limit, schedule, chunk
            );
            println!("Using {} worker threads", workers);

            let result = find_primes(&RunConfig {
                bound: limit,
                workers,
                schedule,
                chunk,
            })?;

            println!("\nTotal: {} primes found", result.primes.len());
            println!(
                "Parallel phase: {}us ({:.6}s)",
                result.elapsed.as_micros(),
                result.elapsed_seconds()
            );

            if save {
                match storage::save_all_primes(&result.primes) {
                    Ok(_) => println!("Saved all primes to primes.txt"),
                    Err(e) => eprintln!("Error saving primes.txt: {}", e),
                }
            }

            let duration = start.elapsed();
            let duration_us = duration.as_micros();

            println!(
                "Total execution time: {}us ({:.2}ms)",
                duration_us,
                duration_us as f64 / 1000.0
            );

            if let Err(e) = storage::log_execution(
                "find",
                &format!("{} w{} {:?} c{}", limit, workers, schedule, chunk),
                duration_us,
            ) {
                eprintln!("Warning: Failed to log execution: {}", e);
            }
        }
        Commands::Bench {
            limit,
            chunks,
            output,
        } => {
            let start = Instant::now();

            if chunks.is_empty() {
                anyhow::bail!("at least one --chunk value is required");
            }

            println!(
                "Benchmarking primes up to {} across {:?} workers...",
                limit,
                report::WORKER_LADDER
            );

            let rows = report::run_matrix(limit, &chunks, &output)?;

            println!("Wrote {} rows to {}", rows, output.display());

            let duration = start.elapsed();
            let duration_us = duration.as_micros();

            println!(
                "Total execution time: {}us ({:.2}ms)",
                duration_us,
                duration_us as f64 / 1000.0
            );

            if let Err(e) = storage::log_execution(
                "bench",
                &format!("{} chunks {:?}", limit, chunks),
                duration_us,
            ) {
                eprintln!("Warning: Failed to log execution: {}", e);
            }
        }
    }

    Ok(())
}
