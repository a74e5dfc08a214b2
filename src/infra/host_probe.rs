use crate::domain::{HostFacts, HostProbe, OsRelease};
use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::fs;
use std::process::{Command, Stdio};
use tracing::debug;

/// Reads host capabilities from procfs and a few system tools
#[derive(Debug, Default)]
pub struct ProcHostProbe;

impl ProcHostProbe {
    pub fn new() -> Self {
        Self
    }
}

impl HostProbe for ProcHostProbe {
    fn facts(&self) -> Result<HostFacts> {
        let meminfo = fs::read_to_string("/proc/meminfo").context("reading /proc/meminfo")?;
        let cpuinfo = fs::read_to_string("/proc/cpuinfo").context("reading /proc/cpuinfo")?;
        let os = fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release(&content));

        let ram_gb =
            parse_mem_total_gb(&meminfo).context("MemTotal not found in /proc/meminfo")?;

        let facts = HostFacts {
            ram_gb,
            arch: machine_arch()?,
            cpu_flags: parse_cpu_flags(&cpuinfo),
            gpu_driver: nvidia_driver_version(),
            os,
        };
        debug!("host facts: {:?}", facts);
        Ok(facts)
    }
}

/// `MemTotal` floored to whole GiB, matching `free -g`
pub fn parse_mem_total_gb(meminfo: &str) -> Option<u64> {
    meminfo.lines().find_map(|line| {
        let rest = line.strip_prefix("MemTotal:")?;
        let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
        Some(kb / 1024 / 1024)
    })
}

/// Flags of the first processor entry
pub fn parse_cpu_flags(cpuinfo: &str) -> BTreeSet<String> {
    cpuinfo
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "flags").then_some(value)
        })
        .map(|flags| flags.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn parse_os_release(content: &str) -> Option<OsRelease> {
    let mut id = None;
    let mut version_id = None;

    for line in content.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"').to_string();
            match key.trim() {
                "ID" => id = Some(value),
                "VERSION_ID" => version_id = Some(value),
                _ => {}
            }
        }
    }

    Some(OsRelease {
        id: id?,
        version_id: version_id.unwrap_or_default(),
    })
}

fn machine_arch() -> Result<String> {
    let output = Command::new("uname")
        .arg("-m")
        .output()
        .context("running uname -m")?;

    if !output.status.success() {
        bail!("uname -m returned status {:?}", output.status);
    }
    parse_machine_arch(&String::from_utf8_lossy(&output.stdout))
}

pub fn parse_machine_arch(stdout: &str) -> Result<String> {
    let arch = stdout.trim();
    if arch.is_empty() {
        bail!("uname -m printed no architecture");
    }
    Ok(arch.to_string())
}

pub fn nvidia_driver_version() -> Option<String> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=driver_version", "--format=csv,noheader"])
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
