use crate::domain::{HostProbe, RequirementReport};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub const TABLE_LOG_NAME: &str = "system_reqs_table.log";
pub const DETAILS_LOG_NAME: &str = "system_reqs_results.log";

/// Gates the image load on the host meeting the suite's requirements
pub struct RequirementService {
    probe: Arc<dyn HostProbe>,
    log_dir: PathBuf,
}

impl RequirementService {
    pub fn new(probe: Arc<dyn HostProbe>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            probe,
            log_dir: log_dir.into(),
        }
    }

    pub fn table_log(&self) -> PathBuf {
        self.log_dir.join(TABLE_LOG_NAME)
    }

    pub fn details_log(&self) -> PathBuf {
        self.log_dir.join(DETAILS_LOG_NAME)
    }

    /// Runs every check, then fails if any hard requirement is missing.
    ///
    /// The logs stay on disk after a failure and are removed after a pass.
    pub fn verify(&self) -> Result<RequirementReport> {
        info!("🔍 Checking system requirements...");
        let facts = self.probe.facts()?;
        let report = RequirementReport::evaluate(&facts);

        write_log(&self.table_log(), &report.render_table())?;
        write_log(&self.details_log(), &report.render_details())?;

        if report.has_errors() {
            println!("{}", report.render_table());
            println!(
                "❌ System requirements not met. Details in {:?}",
                self.details_log()
            );
            let missing: Vec<&str> = report
                .failures()
                .iter()
                .map(|r| r.component.as_str())
                .collect();
            bail!("unmet system requirements: {}", missing.join(", "));
        }

        for w in report.warnings() {
            warn!("⚠️  {}", w.detail_line());
        }

        remove_log(&self.table_log());
        remove_log(&self.details_log());
        info!("✅ System requirements satisfied");
        Ok(report)
    }
}

fn write_log(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("writing {:?}", path))
}

fn remove_log(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove {:?}: {}", path, e);
    }
}
