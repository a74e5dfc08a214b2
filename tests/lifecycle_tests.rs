use anyhow::Result;
use hailo_suite::domain::{LaunchAction, LaunchConfig};
use hailo_suite::services::{LauncherService, RequirementService, TABLE_LOG_NAME};
use hailo_suite::test_support::{MockHostProbe, MockRuntime};
use std::fs;
use std::path::Path;
use std::sync::Arc;

const NAME: &str = "suite_test_container";
const IMAGE: &str = "suite:test";

fn config_in(dir: &Path) -> LaunchConfig {
    LaunchConfig {
        container_name: NAME.into(),
        image_name: IMAGE.into(),
        image_tarball: dir.join("suite.tar.gz"),
        xauth_path: dir.join("suite.xauth"),
        shared_dir: dir.join("shared_with_docker"),
        logs_dir: dir.join("hailort_logs"),
        display: Some(":0".into()),
        ..LaunchConfig::default()
    }
}

fn launcher(dir: &Path, ram_gb: u64) -> (LauncherService, Arc<MockRuntime>) {
    let mock = Arc::new(MockRuntime::new());
    let requirements = Arc::new(RequirementService::new(
        Arc::new(MockHostProbe::with_ram(ram_gb)),
        dir,
    ));
    let service = LauncherService::new(mock.clone(), requirements, config_in(dir));
    (service, mock)
}

#[test]
fn test_new_with_existing_container_never_runs() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_container(NAME);
    mock.add_image(IMAGE);

    let err = service.dispatch(LaunchAction::New).unwrap_err();

    assert!(err.to_string().contains("--resume"));
    assert!(err.to_string().contains("--override"));
    assert!(mock.get_actions().is_empty(), "{:?}", mock.get_commands());
    Ok(())
}

#[test]
fn test_new_with_image_present_skips_requirements() -> Result<()> {
    let temp = tempfile::tempdir()?;
    // RAM would fail the check, but the image is already there
    let (service, mock) = launcher(temp.path(), 8);
    mock.add_image(IMAGE);

    service.dispatch(LaunchAction::New)?;

    assert_eq!(mock.get_actions(), vec![format!("run:{NAME}")]);
    assert!(!temp.path().join(TABLE_LOG_NAME).exists());

    let args = mock.last_run_args().unwrap();
    assert_eq!(args.last().map(String::as_str), Some(IMAGE));
    assert!(args.windows(2).any(|w| w == ["-e", "DISPLAY=:0"]));
    Ok(())
}

#[test]
fn test_low_ram_blocks_image_load() -> Result<()> {
    let temp = tempfile::tempdir()?;
    fs::write(temp.path().join("suite.tar.gz"), "tar")?;
    let (service, mock) = launcher(temp.path(), 8);

    let err = service.dispatch(LaunchAction::New).unwrap_err();

    assert!(err.to_string().contains("RAM"));
    assert!(mock.get_actions().is_empty(), "{:?}", mock.get_commands());
    assert!(temp.path().join(TABLE_LOG_NAME).exists());
    Ok(())
}

#[test]
fn test_medium_and_high_ram_load_then_run() -> Result<()> {
    for ram in [24, 64] {
        let temp = tempfile::tempdir()?;
        let tarball = temp.path().join("suite.tar.gz");
        fs::write(&tarball, "tar")?;
        let (service, mock) = launcher(temp.path(), ram);

        service.dispatch(LaunchAction::New)?;

        assert_eq!(
            mock.get_actions(),
            vec![
                format!("load_image:{}", tarball.display()),
                format!("run:{NAME}"),
            ],
            "{ram} GB"
        );
        assert!(!temp.path().join(TABLE_LOG_NAME).exists());
    }
    Ok(())
}

#[test]
fn test_missing_tarball_aborts_after_checks() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);

    let err = service.dispatch(LaunchAction::New).unwrap_err();

    assert!(err.to_string().contains("tarball"));
    assert!(mock.get_actions().is_empty());
    Ok(())
}

#[test]
fn test_resume_without_container_aborts() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);

    let err = service.dispatch(LaunchAction::Resume).unwrap_err();

    assert!(err.to_string().contains("no container"));
    assert!(mock.get_actions().is_empty());
    Ok(())
}

#[test]
fn test_resume_starts_and_attaches_with_service_env() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_container(NAME);

    service.dispatch(LaunchAction::Resume)?;

    assert_eq!(
        mock.get_actions(),
        vec![format!("start:{NAME}"), format!("exec:{NAME}:/bin/bash")]
    );
    let env = mock.last_exec_env().unwrap();
    assert_eq!(env[0], "DISPLAY=:0");
    assert!(env.iter().any(|e| e.starts_with("hailort_enable_service=")));
    assert!(env.iter().any(|e| e.starts_with("HAILO_MONITOR=")));
    assert!(env.iter().any(|e| e.starts_with("HAILORT_LOGGER_PATH=")));
    // Mounts were fixed when the container was created
    assert!(mock.last_run_args().is_none());
    Ok(())
}

#[test]
fn test_override_removes_before_running() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_container(NAME);
    mock.add_image(IMAGE);

    service.dispatch(LaunchAction::Override)?;

    assert_eq!(
        mock.get_actions(),
        vec![
            format!("stop:{NAME}"),
            format!("remove:{NAME}"),
            format!("run:{NAME}"),
        ]
    );
    assert!(mock.has_container(NAME));
    Ok(())
}

#[test]
fn test_override_removes_even_when_new_path_fails() -> Result<()> {
    let temp = tempfile::tempdir()?;
    // No image and no tarball: the new-container path will fail
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_container(NAME);

    assert!(service.dispatch(LaunchAction::Override).is_err());

    assert_eq!(
        mock.get_actions(),
        vec![format!("stop:{NAME}"), format!("remove:{NAME}")]
    );
    assert!(!mock.has_container(NAME));
    Ok(())
}

#[test]
fn test_override_without_container_behaves_like_new() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_image(IMAGE);

    service.dispatch(LaunchAction::Override)?;

    assert_eq!(mock.get_actions(), vec![format!("run:{NAME}")]);
    Ok(())
}

#[test]
fn test_failed_stop_aborts_override() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let (service, mock) = launcher(temp.path(), 64);
    mock.add_container(NAME);
    mock.add_image(IMAGE);
    mock.set_fail_on("stop");

    assert!(service.dispatch(LaunchAction::Override).is_err());

    let actions = mock.get_actions();
    assert!(!actions.contains(&format!("remove:{NAME}")));
    assert!(!actions.contains(&format!("run:{NAME}")));
    Ok(())
}
