mod container;
pub mod launch;
pub mod requirements;
pub mod traits;

pub use container::ContainerSpec;
pub use launch::{LaunchAction, LaunchConfig};
pub use requirements::{CheckResult, CheckStatus, HostFacts, OsRelease, RequirementReport};
pub use traits::{ContainerRuntime, HostProbe};
