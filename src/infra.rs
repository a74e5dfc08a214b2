pub mod config;
pub mod docker_adapter;
pub mod host_probe;
pub mod xauth;

pub use docker_adapter::DockerAdapter;
pub use host_probe::ProcHostProbe;
