/// "Show in Folder": open the platform file browser with a file selected.
///
/// Best effort only. Failures come back as errors for the status line and
/// never touch library or viewer state.
use log::{info, warn};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

pub fn reveal_in_file_browser(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let result = reveal_platform(path);
    match &result {
        Ok(()) => info!("📂 Revealed {}", path.display()),
        Err(e) => warn!("⚠️  Could not reveal {}: {}", path.display(), e),
    }
    result
}

/// Spawn a detached child without inheriting stdio
fn spawn(program: &str, args: &[&std::ffi::OsStr]) -> std::io::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "windows")]
fn reveal_platform(path: &Path) -> Result<()> {
    let mut select = std::ffi::OsString::from("/select,");
    select.push(path.as_os_str());
    spawn("explorer", &[select.as_os_str()]).map_err(|e| Error::Reveal(e.to_string()))
}

#[cfg(target_os = "macos")]
fn reveal_platform(path: &Path) -> Result<()> {
    spawn("open", &["-R".as_ref(), path.as_os_str()]).map_err(|e| Error::Reveal(e.to_string()))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_platform(path: &Path) -> Result<()> {
    // File managers that can highlight a file, in order of preference
    for program in ["nautilus", "dolphin"] {
        match spawn(program, &["--select".as_ref(), path.as_os_str()]) {
            Ok(()) => return Ok(()),
            Err(e) => info!("{program} unavailable: {e}"),
        }
    }

    // Last resort: open the containing folder without a selection
    let folder = path.parent().unwrap_or(path);
    open::that_detached(folder).map_err(|e| Error::Reveal(e.to_string()))
}
