pub mod launch;

pub use launch::{HostEnv, LaunchArgs, Launcher};
