//! Report Driver.
//!
//! Evaluates each listed pod and writes one line per failed check, in the
//! order pods were listed and checks were evaluated. Nothing is buffered,
//! deduplicated or aggregated across pods.

pub mod formatter;

pub use formatter::{Violation, format_line};

use crate::config::{Level, OutputFormat};
use crate::error::{EXIT_OK, EXIT_VIOLATIONS, Result};
use crate::policy::Evaluator;
use k8s_openapi::api::core::v1::{Pod, PodSpec};
use std::io::Write;

/// What a completed run found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub pods_scanned: usize,
    /// Failed checks across all pods.
    pub violations: usize,
}

impl RunOutcome {
    pub fn any_violation_found(&self) -> bool {
        self.violations > 0
    }

    /// 2 when any violation was found, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.any_violation_found() {
            EXIT_VIOLATIONS
        } else {
            EXIT_OK
        }
    }
}

/// Evaluate `pods` at `level` and write a line per violation to `out`.
///
/// A write failure aborts the report.
pub fn report_violations<W: Write>(
    pods: &[Pod],
    evaluator: &Evaluator,
    level: Level,
    format: OutputFormat,
    out: &mut W,
) -> Result<RunOutcome> {
    let empty_spec = PodSpec::default();
    let mut outcome = RunOutcome::default();

    for pod in pods {
        let namespace = pod.metadata.namespace.as_deref().unwrap_or_default();
        let name = pod.metadata.name.as_deref().unwrap_or_default();
        let spec = pod.spec.as_ref().unwrap_or(&empty_spec);

        let results = evaluator.evaluate_pod(level, &pod.metadata, spec);
        log::trace!("Evaluated {} check(s) for {}/{}", results.len(), namespace, name);

        for result in results.iter().filter(|r| !r.allowed) {
            let violation = Violation {
                namespace,
                name,
                level,
                check: result.check,
                reason: &result.reason,
                detail: &result.detail,
            };
            writeln!(out, "{}", format_line(&violation, format))?;
            outcome.violations += 1;
        }

        outcome.pods_scanned += 1;
    }

    out.flush()?;
    Ok(outcome)
}
