use super::{ContainerSpec, HostFacts};
use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// Trait for container runtime operations
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Fail if the runtime CLI is not installed
    fn ensure_installed(&self) -> Result<()>;

    /// Fail if the current user cannot talk to the daemon
    fn ensure_daemon_access(&self) -> Result<()>;

    /// Whether a container with this name exists (running or stopped)
    fn container_exists(&self, name: &str) -> Result<bool>;

    /// Whether the image is present in the local image store
    fn image_exists(&self, image: &str) -> Result<bool>;

    /// Load an image tarball into the local image store
    fn load_image(&self, tarball: &Path) -> Result<()>;

    /// Create and run a new container, attached to the terminal
    fn run_container(&self, spec: &ContainerSpec) -> Result<()>;

    /// Start a stopped container
    fn start_container(&self, name: &str) -> Result<()>;

    /// Attach an interactive session to a running container
    fn exec_interactive(&self, name: &str, env: &[String], command: &str) -> Result<()>;

    /// Stop a container
    fn stop_container(&self, name: &str) -> Result<()>;

    /// Remove a container
    fn remove_container(&self, name: &str) -> Result<()>;
}

/// Source of the host capabilities the requirement checks look at
pub trait HostProbe: Send + Sync + Debug {
    fn facts(&self) -> Result<HostFacts>;
}
