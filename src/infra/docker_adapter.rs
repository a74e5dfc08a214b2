use crate::domain::{ContainerRuntime, ContainerSpec};
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

#[derive(Debug)]
pub struct DockerAdapter;

impl DockerAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for DockerAdapter {
    fn ensure_installed(&self) -> Result<()> {
        let installed = Command::new("docker")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if !installed {
            bail!("docker is not installed or not on PATH. Install Docker and try again.");
        }
        Ok(())
    }

    fn ensure_daemon_access(&self) -> Result<()> {
        let status = Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("running docker info")?;

        if !status.success() {
            bail!("cannot reach the docker daemon (not running, or permission denied)");
        }
        Ok(())
    }

    fn container_exists(&self, name: &str) -> Result<bool> {
        let filter = format!("name={name}");
        let output = docker_output(
            ["ps", "-a", "-q", "-f", filter.as_str()],
            &format!("looking up container {name}"),
        )?;
        let count = output.lines().filter(|l| !l.trim().is_empty()).count();
        debug!("{count} container(s) match {name}");
        Ok(count > 0)
    }

    fn image_exists(&self, image: &str) -> Result<bool> {
        let output = docker_output(
            ["images", "-q", image],
            &format!("looking up image {image}"),
        )?;
        Ok(!output.trim().is_empty())
    }

    fn load_image(&self, tarball: &Path) -> Result<()> {
        docker(
            [OsStr::new("load"), OsStr::new("-i"), tarball.as_os_str()],
            &format!("loading image from {:?}", tarball),
        )
    }

    fn run_container(&self, spec: &ContainerSpec) -> Result<()> {
        docker(spec.run_args(), &format!("running container {}", spec.name))
    }

    fn start_container(&self, name: &str) -> Result<()> {
        docker(["start", name], &format!("starting container {name}"))
    }

    fn exec_interactive(&self, name: &str, env: &[String], command: &str) -> Result<()> {
        let mut args: Vec<String> = vec!["exec".into(), "-it".into()];
        for var in env {
            args.push("-e".into());
            args.push(var.clone());
        }
        args.push(name.into());
        args.push(command.into());

        docker(args, &format!("attaching to {name}"))
    }

    fn stop_container(&self, name: &str) -> Result<()> {
        docker(["stop", name], &format!("stopping container {name}"))
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        docker(["rm", name], &format!("removing container {name}"))
    }
}

fn docker<I, S>(args: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = docker_status(args, context)?;
    ensure_success(status, context)
}

fn docker_status<I, S>(args: I, context: &str) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new("docker")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .status()
        .with_context(|| context.to_string())
}

fn docker_output<I, S>(args: I, context: &str) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("docker")
        .args(args.into_iter().map(|item| item.as_ref().to_os_string()))
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| context.to_string())?;

    ensure_success(output.status, context)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("docker returned status {:?} ({context})", status)
}
