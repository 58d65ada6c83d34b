// crate modules
use crate::analysis::{Analysis, Job};
use crate::error::Result;
use crate::report::{Report, Section};

// external crates
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A job that could not be completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skipped {
    /// Name of the job
    pub job: String,
    /// Why it was skipped
    pub reason: String,
}

/// Everything that came out of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Sections of every successful job, in job order
    pub report: Report,
    /// Jobs that failed, in job order
    pub skipped: Vec<Skipped>,
}

/// Run independent analysis jobs in parallel
///
/// Jobs share nothing but the read-only [Analysis]. A failed job, for
/// example with a missing input table, is logged and recorded as skipped
/// without affecting any other job.
///
/// ```rust, no_run
/// # use gtools_compare::{run_batch, Analysis, AnalysisConfig, Job};
/// let analysis = Analysis::new(AnalysisConfig::default());
/// let jobs = vec![
///     Job::Energy { table: "energy_water.csv".into(), material: "water".into() },
///     Job::Material { table: "materials.csv".into() },
/// ];
///
/// let batch = run_batch(&analysis, &jobs);
/// println!("{}", batch.report);
/// ```
pub fn run_batch(analysis: &Analysis, jobs: &[Job]) -> Batch {
    info!("Running {} analyses", jobs.len());

    let outcomes: Vec<(String, Result<Section>)> = jobs
        .par_iter()
        .map(|job| (job.name(), analysis.run(job)))
        .collect();

    let mut batch = Batch::default();
    for (job, outcome) in outcomes {
        match outcome {
            Ok(section) => batch.report.push(section),
            Err(e) => {
                warn!("Skipping {job}: {e}");
                batch.skipped.push(Skipped {
                    job,
                    reason: e.to_string(),
                });
            }
        }
    }
    batch
}
