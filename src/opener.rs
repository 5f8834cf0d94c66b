//! Opening the saved ledger in the system's default application.

use crate::error::Result;
use log::info;
use std::path::Path;
use std::process::Command;

/// Capability to show a file to the user.
pub trait FileOpener {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Launches the platform's default handler for the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    #[cfg(target_os = "macos")]
    fn command(path: &Path) -> Command {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    }

    #[cfg(target_os = "windows")]
    fn command(path: &Path) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    fn command(path: &Path) -> Command {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> Result<()> {
        info!("Opening {} with the default application", path.display());
        Self::command(path).spawn()?;
        Ok(())
    }
}

/// Opener for environments without a desktop; only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOpener;

impl FileOpener for NoopOpener {
    fn open(&self, path: &Path) -> Result<()> {
        info!("Not opening {}: no viewer available", path.display());
        Ok(())
    }
}

/// Picks the opener for this platform.
pub fn default_opener() -> Box<dyn FileOpener> {
    if cfg!(any(target_os = "macos", target_os = "windows", target_os = "linux")) {
        Box::new(SystemOpener)
    } else {
        Box::new(NoopOpener)
    }
}
