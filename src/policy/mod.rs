//! Standards Evaluator: Pod Security Standards checks for pod specs.
//!
//! An [`Evaluator`] holds a validated set of [`Check`]s and evaluates a pod's
//! metadata and spec against a [`Level`], always using the latest revision of
//! the standards. Each applicable check yields exactly one [`CheckResult`].
//!
//! # Levels
//!
//! - `baseline` runs every baseline check.
//! - `restricted` runs the baseline checks plus the restricted ones, except
//!   baseline checks that a stricter restricted check replaces.
//!
//! # Example
//!
//! ```rust,ignore
//! use psa_checker::policy::Evaluator;
//! use psa_checker::config::Level;
//!
//! let evaluator = Evaluator::with_default_checks()?;
//! for result in evaluator.evaluate_pod(Level::Restricted, &pod.metadata, &spec) {
//!     if !result.allowed {
//!         println!("{}: {}", result.check, result.detail);
//!     }
//! }
//! ```

pub mod checks;
pub mod extract;

use crate::config::Level;
use crate::error::{CheckerError, Result};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of a single check against a pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Forbidden {
        /// Short description of the rule that failed.
        reason: String,
        /// What in the pod violated it.
        detail: String,
    },
}

impl Verdict {
    pub fn forbidden(reason: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
            detail: detail.into(),
        }
    }
}

/// A single Pod Security Standards control.
pub trait Check: Send + Sync {
    /// Unique check identifier (e.g., "hostNamespaces").
    fn id(&self) -> &'static str;

    /// Lowest level this check applies to.
    fn level(&self) -> Level;

    /// Checks this one replaces when both apply.
    fn overrides(&self) -> &'static [&'static str] {
        &[]
    }

    /// Evaluate the pod. Must be a pure function of its inputs.
    fn evaluate(&self, metadata: &ObjectMeta, spec: &PodSpec) -> Verdict;
}

/// Result of one applicable check for one pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Identifier of the check that produced this result.
    pub check: &'static str,
    pub allowed: bool,
    /// Empty when allowed.
    pub reason: String,
    /// Empty when allowed.
    pub detail: String,
}

impl CheckResult {
    fn from_verdict(check: &'static str, verdict: Verdict) -> Self {
        match verdict {
            Verdict::Allowed => Self {
                check,
                allowed: true,
                reason: String::new(),
                detail: String::new(),
            },
            Verdict::Forbidden { reason, detail } => Self {
                check,
                allowed: false,
                reason,
                detail,
            },
        }
    }
}

/// Evaluates pods against a validated rule set.
pub struct Evaluator {
    checks: Vec<Box<dyn Check>>,
    baseline: Vec<usize>,
    restricted: Vec<usize>,
}

impl Evaluator {
    /// Assemble an evaluator from a set of checks.
    ///
    /// Fails when two checks share an identifier, or when a check overrides
    /// an identifier that is not in the set.
    pub fn new(mut checks: Vec<Box<dyn Check>>) -> Result<Self> {
        checks.sort_by_key(|c| c.id());

        let mut ids = HashSet::new();
        for check in &checks {
            if !ids.insert(check.id()) {
                return Err(CheckerError::Configuration(format!(
                    "duplicate policy check {:?}",
                    check.id()
                )));
            }
        }

        for check in &checks {
            for overridden in check.overrides() {
                if !ids.contains(overridden) {
                    return Err(CheckerError::Configuration(format!(
                        "policy check {:?} overrides unknown check {:?}",
                        check.id(),
                        overridden
                    )));
                }
            }
        }

        let baseline = applicable(&checks, Level::Baseline);
        let restricted = applicable(&checks, Level::Restricted);
        log::debug!(
            "Policy evaluator ready: {} baseline check(s), {} restricted check(s)",
            baseline.len(),
            restricted.len()
        );

        Ok(Self {
            checks,
            baseline,
            restricted,
        })
    }

    /// Evaluator with the built-in Pod Security Standards checks.
    pub fn with_default_checks() -> Result<Self> {
        Self::new(checks::default_checks())
    }

    /// Identifiers of the checks applied at `level`, in evaluation order.
    pub fn check_ids(&self, level: Level) -> Vec<&'static str> {
        self.indices(level)
            .iter()
            .map(|&i| self.checks[i].id())
            .collect()
    }

    /// Evaluate a pod, producing one result per applicable check ordered by
    /// check identifier.
    pub fn evaluate_pod(
        &self,
        level: Level,
        metadata: &ObjectMeta,
        spec: &PodSpec,
    ) -> Vec<CheckResult> {
        self.indices(level)
            .iter()
            .map(|&i| {
                let check = &self.checks[i];
                CheckResult::from_verdict(check.id(), check.evaluate(metadata, spec))
            })
            .collect()
    }

    fn indices(&self, level: Level) -> &[usize] {
        match level {
            Level::Baseline => &self.baseline,
            Level::Restricted => &self.restricted,
        }
    }
}

/// Indices of the checks that apply at `level`, after overrides.
fn applicable(checks: &[Box<dyn Check>], level: Level) -> Vec<usize> {
    let overridden: HashSet<&str> = checks
        .iter()
        .filter(|c| c.level() <= level)
        .flat_map(|c| c.overrides().iter().copied())
        .collect();

    checks
        .iter()
        .enumerate()
        .filter(|(_, c)| c.level() <= level && !overridden.contains(c.id()))
        .map(|(i, _)| i)
        .collect()
}
