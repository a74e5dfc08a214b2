use anyhow::Result;
use clap::Parser;
use hailo_suite::cli::{self, LaunchArgs};
use hailo_suite::infra::config::default_config_dir;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hailo-suite",
    about = "Launch, resume or replace the Hailo AI Software Suite container"
)]
struct Cli {
    /// Directory holding suite.toml (default: ~/.config/hailo-suite)
    #[arg(long, env = "HAILO_SUITE_CONFIG_DIR", default_value_os_t = default_config_dir())]
    config_dir: std::path::PathBuf,

    #[command(flatten)]
    launch: LaunchArgs,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    cli::launch::run(cli.launch, &cli.config_dir)
}
