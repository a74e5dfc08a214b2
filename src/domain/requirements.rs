use std::collections::BTreeSet;
use std::fmt;

pub const MIN_RAM_GB: u64 = 16;
pub const RECOMMENDED_RAM_GB: u64 = 32;
pub const REQUIRED_ARCH: &str = "x86_64";
pub const REQUIRED_CPU_FLAGS: &[&str] = &["avx", "avx2", "sse4_1", "sse4_2", "fma"];
pub const MIN_GPU_DRIVER: u32 = 525;
pub const SUPPORTED_OS: &[(&str, &str)] = &[("ubuntu", "20.04"), ("ubuntu", "22.04")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Found,
    Missing,
    Warning,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::Missing => write!(f, "missing"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
}

/// Snapshot of what the host offers, gathered once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub ram_gb: u64,
    pub arch: String,
    pub cpu_flags: BTreeSet<String>,
    /// `None` when no NVIDIA GPU (or `nvidia-smi`) is present
    pub gpu_driver: Option<String>,
    pub os: Option<OsRelease>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub component: String,
    pub required: String,
    pub detected: String,
    pub status: CheckStatus,
}

impl CheckResult {
    fn new(
        component: impl Into<String>,
        required: impl Into<String>,
        detected: impl Into<String>,
        status: CheckStatus,
    ) -> Self {
        Self {
            component: component.into(),
            required: required.into(),
            detected: detected.into(),
            status,
        }
    }

    pub fn detail_line(&self) -> String {
        format!(
            "[{}] {}: {} (required: {})",
            self.status, self.component, self.detected, self.required
        )
    }
}

pub fn check_ram(ram_gb: u64) -> CheckResult {
    let status = if ram_gb < MIN_RAM_GB {
        CheckStatus::Missing
    } else if ram_gb < RECOMMENDED_RAM_GB {
        CheckStatus::Warning
    } else {
        CheckStatus::Found
    };

    CheckResult::new(
        "RAM",
        format!("{MIN_RAM_GB} GB (recommended {RECOMMENDED_RAM_GB} GB)"),
        format!("{ram_gb} GB"),
        status,
    )
}

pub fn check_arch(arch: &str) -> CheckResult {
    let status = if arch == REQUIRED_ARCH {
        CheckStatus::Found
    } else {
        CheckStatus::Missing
    };

    CheckResult::new("CPU architecture", REQUIRED_ARCH, arch, status)
}

/// One row per required flag
pub fn check_cpu_flags(flags: &BTreeSet<String>) -> Vec<CheckResult> {
    REQUIRED_CPU_FLAGS
        .iter()
        .map(|flag| {
            let (detected, status) = if flags.contains(*flag) {
                ("present", CheckStatus::Found)
            } else {
                ("absent", CheckStatus::Missing)
            };
            CheckResult::new(format!("CPU flag {flag}"), "present", detected, status)
        })
        .collect()
}

pub fn check_gpu(driver: Option<&str>) -> CheckResult {
    let required = format!("driver >= {MIN_GPU_DRIVER} (optional)");

    let Some(version) = driver else {
        return CheckResult::new("GPU", required, "no NVIDIA GPU", CheckStatus::Warning);
    };

    let status = match driver_major(version) {
        Some(major) if major >= MIN_GPU_DRIVER => CheckStatus::Found,
        _ => CheckStatus::Warning,
    };

    CheckResult::new("GPU", required, format!("driver {version}"), status)
}

pub fn check_os(os: Option<&OsRelease>) -> CheckResult {
    let required = SUPPORTED_OS
        .iter()
        .map(|(id, version)| format!("{id} {version}"))
        .collect::<Vec<_>>()
        .join(" / ");

    let Some(os) = os else {
        return CheckResult::new("OS", required, "unknown", CheckStatus::Warning);
    };

    let supported = SUPPORTED_OS
        .iter()
        .any(|(id, version)| os.id == *id && os.version_id == *version);
    let status = if supported {
        CheckStatus::Found
    } else {
        CheckStatus::Warning
    };

    CheckResult::new(
        "OS",
        required,
        format!("{} {}", os.id, os.version_id),
        status,
    )
}

fn driver_major(version: &str) -> Option<u32> {
    version.trim().split('.').next()?.parse().ok()
}

/// Outcome of the whole check pass, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementReport {
    pub results: Vec<CheckResult>,
}

impl RequirementReport {
    pub fn evaluate(facts: &HostFacts) -> Self {
        let mut results = vec![check_ram(facts.ram_gb), check_arch(&facts.arch)];
        results.extend(check_cpu_flags(&facts.cpu_flags));
        results.push(check_gpu(facts.gpu_driver.as_deref()));
        results.push(check_os(facts.os.as_ref()));
        Self { results }
    }

    pub fn has_errors(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.status == CheckStatus::Missing)
    }

    pub fn failures(&self) -> Vec<&CheckResult> {
        self.with_status(CheckStatus::Missing)
    }

    pub fn warnings(&self) -> Vec<&CheckResult> {
        self.with_status(CheckStatus::Warning)
    }

    fn with_status(&self, status: CheckStatus) -> Vec<&CheckResult> {
        self.results.iter().filter(|r| r.status == status).collect()
    }

    pub fn render_table(&self) -> String {
        let headers = ["Component", "Requirement", "Detected", "Status"];
        let width = |s: &str| s.chars().count();
        let mut widths = [width(headers[0]), width(headers[1]), width(headers[2])];

        for r in &self.results {
            widths[0] = widths[0].max(width(&r.component));
            widths[1] = widths[1].max(width(&r.required));
            widths[2] = widths[2].max(width(&r.detected));
        }

        let mut out = format!(
            "{:<w0$} | {:<w1$} | {:<w2$} | {}\n",
            headers[0],
            headers[1],
            headers[2],
            headers[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        out.push_str(&format!(
            "{}-+-{}-+-{}-+-{}\n",
            "-".repeat(widths[0]),
            "-".repeat(widths[1]),
            "-".repeat(widths[2]),
            "-".repeat(width(headers[3])),
        ));

        for r in &self.results {
            out.push_str(&format!(
                "{:<w0$} | {:<w1$} | {:<w2$} | {}\n",
                r.component,
                r.required,
                r.detected,
                r.status,
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            ));
        }

        out
    }

    pub fn render_details(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}\n", r.detail_line()))
            .collect()
    }
}
