//! Host orchestrator: the thin composition root.
//!
//! Sequences scanner → loader → registry → executor and condenses the run
//! into a [`RunReport`] an operator can diagnose without digging through
//! logs.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::HostConfig;
use crate::error::Result;
use crate::executor::{self, RunOutcome};
use crate::loader;
use crate::registry::PluginRegistry;
use crate::scanner;

/// One candidate that failed to load and was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    /// Path of the skipped candidate.
    pub path: PathBuf,
    /// Diagnostic from the loader.
    pub error: String,
}

/// Summary of one complete run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Candidate libraries found by the scanner.
    pub found: usize,
    /// Candidates successfully loaded.
    pub loaded: usize,
    /// Plugins that ran to completion.
    pub completed: usize,
    /// Plugins whose run failed.
    pub failed: usize,
    /// Candidates skipped at load time.
    pub load_failures: Vec<LoadFailure>,
    /// Terminal outcome of every launched plugin.
    pub outcomes: Vec<RunOutcome>,
}

impl RunReport {
    /// Whether every candidate loaded and every plugin completed.
    pub fn is_clean(&self) -> bool {
        self.load_failures.is_empty() && self.failed == 0
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "candidates: {} found, {} loaded, {} skipped",
            self.found,
            self.loaded,
            self.load_failures.len()
        )?;
        write!(f, "runs: {} completed, {} failed", self.completed, self.failed)?;
        for failure in &self.load_failures {
            write!(f, "\n  skipped {}: {}", failure.path.display(), failure.error)?;
        }
        Ok(())
    }
}

/// The plugin host.
#[derive(Debug, Default)]
pub struct Host {
    config: HostConfig,
}

impl Host {
    /// Create a host from configuration.
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    /// Execute one full run: discover, load, run concurrently, join, report.
    ///
    /// Only a missing or unreadable plugin directory is an error; per-unit
    /// load and run failures are recorded in the report and logged.
    pub async fn run(&self) -> Result<RunReport> {
        let candidates = scanner::scan(&self.config.plugin_dir)?;
        info!(
            dir = %self.config.plugin_dir.display(),
            count = candidates.len(),
            "discovered plugin candidates"
        );

        let mut registry = PluginRegistry::new();
        let mut load_failures = Vec::new();
        for path in &candidates {
            match loader::load(path) {
                Ok(plugin) => registry.register(plugin),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping candidate");
                    load_failures.push(LoadFailure {
                        path: path.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let loaded = registry.len();
        let outcomes = executor::run_all(registry.into_entries()).await;
        let completed = outcomes.iter().filter(|o| o.status.is_completed()).count();

        let report = RunReport {
            found: candidates.len(),
            loaded,
            completed,
            failed: outcomes.len() - completed,
            load_failures,
            outcomes,
        };
        info!(
            found = report.found,
            loaded = report.loaded,
            completed = report.completed,
            failed = report.failed,
            "run finished"
        );
        Ok(report)
    }
}
