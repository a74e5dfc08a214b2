use std::path::PathBuf;

pub const DEFAULT_IMAGE_NAME: &str = "hailo_ai_sw_suite:latest";
pub const DEFAULT_IMAGE_TARBALL: &str = "hailo_ai_sw_suite.tar.gz";
pub const DEFAULT_CONTAINER_NAME: &str = "hailo_ai_sw_suite_container";
pub const DEFAULT_XAUTH_PATH: &str = "/tmp/hailo_docker.xauth";
pub const DEFAULT_SHARED_DIR: &str = "shared_with_docker";
pub const DEFAULT_LOGS_DIR: &str = "hailort_logs";
pub const DEFAULT_LOGGER_PATH: &str = "/var/log/hailo";

/// Where the shared directory shows up inside the container
pub const CONTAINER_SHARED_DIR: &str = "/local/shared_with_docker";
pub const CONTAINER_XAUTH_PATH: &str = "/home/hailo/.Xauthority";
pub const CONTAINER_SHELL: &str = "/bin/bash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction {
    New,
    Resume,
    Override,
}

impl LaunchAction {
    /// Resume takes precedence when both flags are given.
    pub fn from_flags(resume: bool, override_existing: bool) -> Self {
        if resume {
            Self::Resume
        } else if override_existing {
            Self::Override
        } else {
            Self::New
        }
    }
}

/// Resolved settings for one invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub container_name: String,
    pub image_name: String,
    pub image_tarball: PathBuf,
    pub xauth_path: PathBuf,
    pub shared_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub logger_path: String,
    pub enable_service: bool,
    pub enable_monitor: bool,
    pub display: Option<String>,
    pub xdg_runtime_dir: Option<String>,
    pub user: Option<String>,
    pub gpu_available: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            container_name: DEFAULT_CONTAINER_NAME.into(),
            image_name: DEFAULT_IMAGE_NAME.into(),
            image_tarball: PathBuf::from(DEFAULT_IMAGE_TARBALL),
            xauth_path: PathBuf::from(DEFAULT_XAUTH_PATH),
            shared_dir: PathBuf::from(DEFAULT_SHARED_DIR),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            logger_path: DEFAULT_LOGGER_PATH.into(),
            enable_service: false,
            enable_monitor: false,
            display: None,
            xdg_runtime_dir: None,
            user: None,
            gpu_available: false,
        }
    }
}

impl LaunchConfig {
    /// `-e` values for the suite services, shared by the run and resume paths
    pub fn service_env(&self) -> Vec<String> {
        vec![
            format!(
                "hailort_enable_service={}",
                if self.enable_service { "yes" } else { "no" }
            ),
            format!(
                "HAILO_MONITOR={}",
                if self.enable_monitor { "1" } else { "0" }
            ),
            format!("HAILORT_LOGGER_PATH={}", self.logger_path),
        ]
    }

    pub fn display_env(&self) -> String {
        format!("DISPLAY={}", self.display.as_deref().unwrap_or_default())
    }

    /// Environment re-asserted when attaching to an existing container
    pub fn resume_env(&self) -> Vec<String> {
        let mut env = vec![self.display_env()];
        env.extend(self.service_env());
        env
    }
}
