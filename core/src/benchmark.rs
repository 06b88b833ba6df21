use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::session::{Session, SessionOptions};

pub struct BenchmarkParams {
    /// Number of set/get rounds
    pub iterations: usize,
    /// Number of distinct global names cycled through
    pub names: usize,
    pub options: SessionOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkMetrics {
    pub iterations: usize,
    pub operations: usize,
    pub mismatches: usize,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    pub final_stack_depth: i32,
}

impl BenchmarkMetrics {
    /// Fail if any read disagreed with its write or the stack did not drain.
    pub fn verify(&self) -> Result<()> {
        if self.final_stack_depth != 0 {
            bail!(
                "stack depth is {} after the run; accessors leaked values",
                self.final_stack_depth
            );
        }
        if self.mismatches != 0 {
            bail!("{} reads did not return the value just written", self.mismatches);
        }
        Ok(())
    }

    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.operations as f64 / secs
        } else {
            0.0
        }
    }
}

/// Run the churn benchmark in a fresh session and print a report.
pub fn run_benchmark(params: BenchmarkParams) -> Result<BenchmarkMetrics> {
    validate_params(&params)?;

    println!("Starting luax session benchmark");
    println!("----------------------------------------");
    println!("   Iterations: {}", params.iterations);
    println!("   Names: {}", params.names);
    println!("   Standard libraries: {}", params.options.open_libs);

    let mut session = Session::with_options(params.options.clone())?;
    let metrics = run_churn(&mut session, &params)?;
    session.close();

    display_report(&metrics);
    metrics.verify()?;

    Ok(metrics)
}

/// Mixed set/get/type rounds against `session`, verifying every read.
pub fn run_churn(session: &mut Session, params: &BenchmarkParams) -> Result<BenchmarkMetrics> {
    validate_params(params)?;

    let names: Vec<String> = (0..params.names).map(|i| format!("bench_{}", i)).collect();
    let mut operations = 0;
    let mut mismatches = 0;

    let start = Instant::now();
    for i in 0..params.iterations {
        let name = &names[i % names.len()];
        let n = i32::try_from(i % 1_000_000)?;

        let matched = match i % 4 {
            0 => {
                session.set_integer(name, n)?;
                session.get_integer(name, -1)? == n
            }
            1 => {
                let value = f64::from(n) + 0.5;
                session.set_double(name, value)?;
                session.get_double(name, f64::NAN)? == value
            }
            2 => {
                let value = n.to_string();
                session.set_string(name, &value)?;
                session.get_string(name, "")? == value
            }
            _ => {
                let value = n % 2 == 0;
                session.set_boolean(name, value)?;
                session.get_type(name)?.is_scalar() && session.get_boolean(name, !value)? == value
            }
        };

        operations += if i % 4 == 3 { 3 } else { 2 };
        if !matched {
            mismatches += 1;
        }
    }
    let duration = start.elapsed();

    Ok(BenchmarkMetrics {
        iterations: params.iterations,
        operations,
        mismatches,
        duration,
        final_stack_depth: session.stack_depth()?,
    })
}

fn validate_params(params: &BenchmarkParams) -> Result<()> {
    if params.iterations == 0 {
        return Err(anyhow!("Must run at least 1 iteration"));
    }

    if params.names == 0 {
        return Err(anyhow!("Must cycle through at least 1 name"));
    }

    Ok(())
}

fn display_report(metrics: &BenchmarkMetrics) {
    println!("\nResults:");
    println!("   Operations: {}", metrics.operations);
    println!("   Duration: {:.3}s", metrics.duration.as_secs_f64());
    println!("   Throughput: {:.0} ops/sec", metrics.ops_per_sec());
    println!("   Mismatched reads: {}", metrics.mismatches);
    println!("   Final stack depth: {}", metrics.final_stack_depth);
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
    }
}
