use anyhow::Result;
use hailo_suite::cli::Launcher;
use hailo_suite::domain::{LaunchAction, LaunchConfig};
use hailo_suite::test_support::{MockHostProbe, MockRuntime};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn config_in(dir: &Path) -> LaunchConfig {
    LaunchConfig {
        container_name: "pipeline_container".into(),
        image_name: "suite:pipeline".into(),
        image_tarball: dir.join("suite.tar.gz"),
        xauth_path: dir.join("suite.xauth"),
        shared_dir: dir.join("shared_with_docker"),
        logs_dir: dir.join("hailort_logs"),
        ..LaunchConfig::default()
    }
}

fn launcher(dir: &Path) -> (Launcher, Arc<MockRuntime>) {
    let mock = Arc::new(MockRuntime::new());
    let launcher = Launcher::with_runtime(
        config_in(dir),
        mock.clone(),
        Arc::new(MockHostProbe::with_ram(64)),
        dir,
    );
    (launcher, mock)
}

#[test]
fn test_pipeline_prepares_host_before_dispatch() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (launcher, mock) = launcher(temp.path());
    mock.add_image("suite:pipeline");

    launcher.run(LaunchAction::New)?;

    assert!(temp.path().join("shared_with_docker").is_dir());
    assert!(temp.path().join("hailort_logs").is_dir());
    assert!(temp.path().join("suite.xauth").is_file());

    let commands = mock.get_commands();
    assert_eq!(commands[0], "ensure_installed");
    assert_eq!(commands[1], "ensure_daemon_access");
    assert_eq!(commands.last().map(String::as_str), Some("run:pipeline_container"));
    Ok(())
}

#[test]
fn test_daemon_permission_error_stops_everything() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (launcher, mock) = launcher(temp.path());
    mock.set_fail_on("ensure_daemon_access");

    assert!(launcher.run(LaunchAction::New).is_err());

    assert_eq!(
        mock.get_commands(),
        vec!["ensure_installed", "ensure_daemon_access"]
    );
    assert!(!temp.path().join("shared_with_docker").exists());
    Ok(())
}

#[test]
fn test_docker_missing_stops_everything() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (launcher, mock) = launcher(temp.path());
    mock.set_fail_on("ensure_installed");

    assert!(launcher.run(LaunchAction::Resume).is_err());
    assert_eq!(mock.get_commands(), vec!["ensure_installed"]);
    Ok(())
}

#[test]
fn test_xauth_directory_aborts_before_container_lookup() -> Result<()> {
    let temp = tempfile::tempdir()?;
    fs::create_dir(temp.path().join("suite.xauth"))?;
    let (launcher, mock) = launcher(temp.path());

    let err = launcher.run(LaunchAction::New).unwrap_err();

    assert!(err.to_string().contains("is a directory"));
    assert!(temp.path().join("suite.xauth").is_dir());
    assert!(
        !mock
            .get_commands()
            .iter()
            .any(|c| c.starts_with("container_exists:"))
    );
    Ok(())
}

#[test]
fn test_launcher_exposes_resolved_config() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (launcher, _mock) = launcher(temp.path());

    let config = launcher.service().config();
    assert_eq!(config.container_name, "pipeline_container");
    assert_eq!(config.xauth_path, temp.path().join("suite.xauth"));
    Ok(())
}
