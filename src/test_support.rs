use crate::domain::requirements::REQUIRED_CPU_FLAGS;
use crate::domain::{ContainerRuntime, ContainerSpec, HostFacts, HostProbe, OsRelease};
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

/// In-memory runtime that records every call as `operation:target`
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<HashSet<String>>,
    images: RwLock<HashSet<String>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
    last_run_args: RwLock<Option<Vec<String>>>,
    last_exec_env: RwLock<Option<Vec<String>>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashSet::new()),
            images: RwLock::new(HashSet::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
            last_run_args: RwLock::new(None),
            last_exec_env: RwLock::new(None),
        }
    }

    pub fn add_container(&self, name: &str) {
        self.containers.write().unwrap().insert(name.to_string());
    }

    pub fn add_image(&self, image: &str) {
        self.images.write().unwrap().insert(image.to_string());
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Commands that change state, without the existence lookups
    pub fn get_actions(&self) -> Vec<String> {
        self.get_commands()
            .into_iter()
            .filter(|c| !c.starts_with("container_exists:") && !c.starts_with("image_exists:"))
            .collect()
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.containers.read().unwrap().contains(name)
    }

    pub fn last_run_args(&self) -> Option<Vec<String>> {
        self.last_run_args.read().unwrap().clone()
    }

    pub fn last_exec_env(&self) -> Option<Vec<String>> {
        self.last_exec_env.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn ensure_installed(&self) -> Result<()> {
        self.record_command("ensure_installed");
        self.check_fail("ensure_installed")
    }

    fn ensure_daemon_access(&self) -> Result<()> {
        self.record_command("ensure_daemon_access");
        self.check_fail("ensure_daemon_access")
    }

    fn container_exists(&self, name: &str) -> Result<bool> {
        self.record_command(&format!("container_exists:{}", name));
        self.check_fail("container_exists")?;
        Ok(self.has_container(name))
    }

    fn image_exists(&self, image: &str) -> Result<bool> {
        self.record_command(&format!("image_exists:{}", image));
        self.check_fail("image_exists")?;
        Ok(self.images.read().unwrap().contains(image))
    }

    fn load_image(&self, tarball: &Path) -> Result<()> {
        self.record_command(&format!("load_image:{}", tarball.display()));
        self.check_fail("load_image")
    }

    fn run_container(&self, spec: &ContainerSpec) -> Result<()> {
        self.record_command(&format!("run:{}", spec.name));
        self.check_fail("run")?;

        *self.last_run_args.write().unwrap() = Some(spec.run_args());
        self.add_container(spec.name);
        Ok(())
    }

    fn start_container(&self, name: &str) -> Result<()> {
        self.record_command(&format!("start:{}", name));
        self.check_fail("start")
    }

    fn exec_interactive(&self, name: &str, env: &[String], command: &str) -> Result<()> {
        self.record_command(&format!("exec:{}:{}", name, command));
        self.check_fail("exec")?;

        *self.last_exec_env.write().unwrap() = Some(env.to_vec());
        Ok(())
    }

    fn stop_container(&self, name: &str) -> Result<()> {
        self.record_command(&format!("stop:{}", name));
        self.check_fail("stop")
    }

    fn remove_container(&self, name: &str) -> Result<()> {
        self.record_command(&format!("remove:{}", name));
        self.check_fail("remove")?;

        self.containers.write().unwrap().remove(name);
        Ok(())
    }
}

/// Host probe returning fixed facts
#[derive(Debug, Clone)]
pub struct MockHostProbe {
    facts: HostFacts,
}

impl MockHostProbe {
    pub fn new(facts: HostFacts) -> Self {
        Self { facts }
    }

    /// A supported Ubuntu x86_64 host with a recent GPU driver
    pub fn with_ram(ram_gb: u64) -> Self {
        Self::new(HostFacts {
            ram_gb,
            arch: "x86_64".into(),
            cpu_flags: REQUIRED_CPU_FLAGS.iter().map(|f| f.to_string()).collect(),
            gpu_driver: Some("535.104.05".into()),
            os: Some(OsRelease {
                id: "ubuntu".into(),
                version_id: "22.04".into(),
            }),
        })
    }
}

impl HostProbe for MockHostProbe {
    fn facts(&self) -> Result<HostFacts> {
        Ok(self.facts.clone())
    }
}
