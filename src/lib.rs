pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    ContainerRuntime, ContainerSpec, HostFacts, HostProbe, LaunchAction, LaunchConfig,
    RequirementReport,
};
pub use infra::{DockerAdapter, ProcHostProbe};
pub use services::{LauncherService, RequirementService};
