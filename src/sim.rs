//! Demo, benchmark, and stress runners behind the CLI.

use std::time::Instant;

use crate::error::SchedError;
use crate::log_dev;
use crate::richards::Richards;
use crate::types::IterationReport;

/// Iterations the demo runs.
const DEMO_ITERATIONS: usize = 10;
/// Default iteration count for `bench`.
pub const DEFAULT_BENCH_ITERATIONS: usize = 100;
/// Default iteration sweep for `stress`.
pub const DEFAULT_STRESS_SETS: [usize; 4] = [1, 10, 50, 100];

const CSV_HEADER: &str =
    "iterations,elapsed_ms,iterations_per_s,cpu_user_s,cpu_sys_s,hold_count,qpkt_count,ok";

/// Best-effort CPU user/system time snapshot (seconds) on Unix platforms.
#[cfg(unix)]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    use libc::{RUSAGE_SELF, getrusage, rusage};
    // SAFETY: rusage is plain old data; all-zero is a valid value.
    let mut usage: rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { getrusage(RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return None;
    }
    let user = usage.ru_utime.tv_sec as f64 + (usage.ru_utime.tv_usec as f64 / 1_000_000.0);
    let sys = usage.ru_stime.tv_sec as f64 + (usage.ru_stime.tv_usec as f64 / 1_000_000.0);
    Some((user, sys))
}

/// Stub on non-Unix platforms.
#[cfg(not(unix))]
fn cpu_times_seconds() -> Option<(f64, f64)> {
    None
}

/// Aggregated metrics from a single timed run.
struct BenchResult {
    iterations: usize,
    elapsed_ms: f64,
    throughput: f64,
    cpu_user_s: Option<f64>,
    cpu_sys_s: Option<f64>,
    report: IterationReport,
    ok: bool,
}

impl BenchResult {
    fn csv_row(&self) -> String {
        let cpu_user = self
            .cpu_user_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        let cpu_sys = self
            .cpu_sys_s
            .map(|v| format!("{v:.4}"))
            .unwrap_or_else(|| "NA".to_string());
        format!(
            "{},{:.2},{:.2},{},{},{},{},{}",
            self.iterations,
            self.elapsed_ms,
            self.throughput,
            cpu_user,
            cpu_sys,
            self.report.hold_count,
            self.report.qpkt_count,
            self.ok
        )
    }
}

fn benchmark_once(iterations: usize, trace: bool) -> Result<BenchResult, SchedError> {
    debug_assert!(iterations > 0, "iterations must be > 0");
    let mut richards = Richards::with_tracing(trace);

    let cpu_start = cpu_times_seconds();
    let start = Instant::now();
    let ok = richards.run(iterations)?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let throughput = if elapsed_ms > 0.0 {
        (iterations as f64) / (elapsed_ms / 1000.0)
    } else {
        0.0
    };
    let (cpu_user_s, cpu_sys_s) = match (cpu_start, cpu_times_seconds()) {
        (Some((user_start, sys_start)), Some((user_end, sys_end))) => {
            (Some(user_end - user_start), Some(sys_end - sys_start))
        }
        _ => (None, None),
    };

    Ok(BenchResult {
        iterations,
        elapsed_ms,
        throughput,
        cpu_user_s,
        cpu_sys_s,
        report: richards.last_report().unwrap_or_default(),
        ok,
    })
}

/// Run the default demo and print a summary. Returns true on success.
pub fn run_demo() -> bool {
    log_dev!("[DEMO] start iterations={DEMO_ITERATIONS}");
    let mut richards = Richards::new();
    let start = Instant::now();
    let outcome = richards.run(DEMO_ITERATIONS);
    log_dev!("[DEMO] finished in {}ms", start.elapsed().as_millis());

    let ok = match outcome {
        Ok(ok) => ok,
        Err(err) => {
            eprintln!("demo error: {err}");
            return false;
        }
    };
    let report = richards.last_report().unwrap_or_default();
    let stats = richards.last_stats();
    println!("RICHARDS SUMMARY");
    println!("iterations={DEMO_ITERATIONS}");
    println!("hold_count={}", report.hold_count);
    println!("qpkt_count={}", report.qpkt_count);
    println!("task_runs={} task_skips={}", stats.runs, stats.skips);
    println!("result={}", if ok { "ok" } else { "mismatch" });
    ok
}

/// Run one timed benchmark and print a CSV row. Returns true on success.
pub fn run_benchmark(iterations: Option<usize>, trace: bool) -> bool {
    let iterations = iterations.unwrap_or(DEFAULT_BENCH_ITERATIONS);
    if iterations == 0 {
        eprintln!("benchmark error: iterations must be > 0");
        return false;
    }
    let result = match benchmark_once(iterations, trace) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("benchmark error: {err}");
            return false;
        }
    };
    println!("{CSV_HEADER}");
    println!("{}", result.csv_row());
    if !result.ok {
        eprintln!("# violation,counter_mismatch");
    }
    result.ok
}

/// Sweep several iteration counts and print one CSV row each.
pub fn run_stress(iteration_sets: Option<Vec<usize>>) -> bool {
    let mut iteration_sets = iteration_sets.unwrap_or_else(|| DEFAULT_STRESS_SETS.to_vec());
    if iteration_sets.iter().any(|&n| n == 0) {
        let before = iteration_sets.len();
        iteration_sets.retain(|&n| n > 0);
        let dropped = before.saturating_sub(iteration_sets.len());
        eprintln!("stress warning: ignored {dropped} iteration set(s) <= 0");
        if iteration_sets.is_empty() {
            eprintln!("stress error: iterations must be > 0");
            return false;
        }
    }

    println!("{CSV_HEADER}");
    let mut all_ok = true;
    for iterations in iteration_sets {
        match benchmark_once(iterations, false) {
            Ok(result) => {
                println!("{}", result.csv_row());
                if !result.ok {
                    eprintln!("# violation,counter_mismatch,iterations={iterations}");
                    all_ok = false;
                }
            }
            Err(err) => {
                eprintln!("stress error: {err}");
                return false;
            }
        }
    }
    all_ok
}
