use anyhow::{Context, Result, bail};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Makes sure `path` holds an X11 cookie usable from inside the container.
///
/// Entries for `display` are copied from the user's authority with the
/// family wildcarded, so the cookie matches whatever hostname the
/// container reports. A directory at `path` is left alone and reported.
pub fn prepare_xauthority(path: &Path, display: Option<&str>) -> Result<()> {
    if path.is_dir() {
        println!("❌ {:?} is a directory, but it must be an X authority file.", path);
        println!("💡 Remove it manually and run again:");
        println!("   sudo rm -rf {}", path.display());
        bail!("X authority path {:?} is a directory", path);
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("creating {:?}", path))?;

    let Some(display_name) = display.filter(|d| !d.is_empty()) else {
        warn!("DISPLAY is not set; GUI tools inside the container will not reach X");
        return Ok(());
    };

    if !xauth_available() {
        warn!("xauth not found; {:?} left without a cookie", path);
        return Ok(());
    }

    let output = Command::new("xauth")
        .args(["nlist", display_name])
        .stderr(Stdio::null())
        .output()
        .context("running xauth nlist")?;

    let entries: String = String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| format!("{}\n", wildcard_family(l)))
        .collect();

    if entries.is_empty() {
        warn!("xauth has no entries for {display_name}");
        return Ok(());
    }

    merge_entries(path, &entries)?;
    info!("X authority for {display_name} written to {:?}", path);
    Ok(())
}

/// Replaces the 4-hex-digit family at the start of an `xauth nlist` line
/// with `ffff`.
pub fn wildcard_family(line: &str) -> String {
    match line.char_indices().nth(4) {
        Some((idx, _)) => format!("ffff{}", &line[idx..]),
        None => "ffff".to_string(),
    }
}

fn merge_entries(path: &Path, entries: &str) -> Result<()> {
    let mut child = Command::new("xauth")
        .arg("-f")
        .arg(path)
        .args(["nmerge", "-"])
        .stdin(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("running xauth nmerge")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(entries.as_bytes())
            .context("feeding xauth nmerge")?;
    }

    let status = child.wait().context("waiting for xauth nmerge")?;
    if !status.success() {
        bail!("xauth nmerge returned status {:?}", status);
    }
    debug!("merged {} xauth entries", entries.lines().count());
    Ok(())
}

fn xauth_available() -> bool {
    Command::new("xauth")
        .arg("-V")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
