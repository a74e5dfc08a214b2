use crate::domain::{ContainerRuntime, HostProbe, LaunchAction, LaunchConfig};
use crate::infra::config::{ensure_host_dirs, load_suite_config};
use crate::infra::host_probe::nvidia_driver_version;
use crate::infra::xauth::prepare_xauthority;
use crate::infra::{DockerAdapter, ProcHostProbe};
use crate::services::{LauncherService, RequirementService};
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchArgs {
    /// Resume the existing container instead of creating a new one
    #[arg(long)]
    pub resume: bool,

    /// Stop and remove the existing container, then create a new one
    #[arg(long = "override")]
    pub override_existing: bool,

    /// Start the HailoRT service inside the container
    #[arg(long)]
    pub hailort_enable_service: bool,

    /// Enable the HailoRT monitor (HAILO_MONITOR=1)
    #[arg(long)]
    pub service_enable_monitor: bool,

    /// Path inside the container where HailoRT writes its logs
    #[arg(long, value_name = "PATH")]
    pub service_hailort_logger_path: Option<String>,
}

impl LaunchArgs {
    pub fn action(&self) -> LaunchAction {
        LaunchAction::from_flags(self.resume, self.override_existing)
    }
}

/// Values taken from the invoking shell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    pub display: Option<String>,
    pub xdg_runtime_dir: Option<String>,
    pub user: Option<String>,
}

impl HostEnv {
    pub fn from_process() -> Self {
        Self {
            display: std::env::var("DISPLAY").ok(),
            xdg_runtime_dir: std::env::var("XDG_RUNTIME_DIR").ok(),
            user: std::env::var("USER").ok(),
        }
    }
}

/// Merges defaults, `suite.toml`, the command line and the environment.
///
/// Relative host directories are anchored at `cwd`, since docker treats a
/// relative `-v` source as a named volume.
pub fn resolve_config(
    args: &LaunchArgs,
    config_dir: &Path,
    cwd: &Path,
    env: HostEnv,
    gpu_available: bool,
) -> Result<LaunchConfig> {
    let mut config = LaunchConfig::default();
    load_suite_config(config_dir)?.apply_to(&mut config);

    config.image_tarball = anchor(cwd, &config.image_tarball);
    config.shared_dir = anchor(cwd, &config.shared_dir);
    config.logs_dir = anchor(cwd, &config.logs_dir);

    config.enable_service = args.hailort_enable_service;
    config.enable_monitor = args.service_enable_monitor;
    if let Some(path) = &args.service_hailort_logger_path {
        config.logger_path = path.clone();
    }

    config.display = env.display;
    config.xdg_runtime_dir = env.xdg_runtime_dir;
    config.user = env.user;
    config.gpu_available = gpu_available;

    Ok(config)
}

fn anchor(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Wires the launcher to its runtime and walks the startup pipeline
pub struct Launcher {
    service: LauncherService,
}

impl Launcher {
    pub fn with_runtime(
        config: LaunchConfig,
        runtime: Arc<dyn ContainerRuntime>,
        probe: Arc<dyn HostProbe>,
        log_dir: &Path,
    ) -> Self {
        let requirements = Arc::new(RequirementService::new(probe, log_dir));
        Self {
            service: LauncherService::new(runtime, requirements, config),
        }
    }

    pub fn service(&self) -> &LauncherService {
        &self.service
    }

    pub fn run(&self, action: LaunchAction) -> Result<()> {
        let config = self.service.config();

        self.service.preflight()?;
        ensure_host_dirs(config)?;
        prepare_xauthority(&config.xauth_path, config.display.as_deref())?;

        self.service.dispatch(action)
    }
}

pub fn run(args: LaunchArgs, config_dir: &Path) -> Result<()> {
    let cwd = std::env::current_dir().context("reading current directory")?;
    let gpu_available = nvidia_driver_version().is_some();
    let config = resolve_config(&args, config_dir, &cwd, HostEnv::from_process(), gpu_available)?;

    info!(
        "Container {} from image {}",
        config.container_name, config.image_name
    );

    let launcher = Launcher::with_runtime(
        config,
        Arc::new(DockerAdapter::new()),
        Arc::new(ProcHostProbe::new()),
        &cwd,
    );
    launcher.run(args.action())
}
