//! Where the archive comes from and where it goes.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Settings;
use crate::console::{CROSS, Console};

/// Steam app id VRChat runs under when launched through Proton
#[cfg(not(windows))]
const VRCHAT_STEAM_APP_ID: &str = "438100";

/// Directory that bundled files are resolved against
pub trait BaseDir {
    fn base_dir(&self) -> PathBuf;
}

/// Packaged build: data files ship next to the executable
#[derive(Debug, Clone)]
pub struct ExecutableDir {
    dir: PathBuf,
}

impl ExecutableDir {
    /// `None` when the running executable cannot be located
    pub fn locate() -> Option<Self> {
        let exe = std::env::current_exe().ok()?;
        let dir = exe.parent()?.to_path_buf();
        Some(Self { dir })
    }
}

impl BaseDir for ExecutableDir {
    fn base_dir(&self) -> PathBuf {
        self.dir.clone()
    }
}

/// Running from a checkout: data files live in the working directory
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkingDir;

impl BaseDir for WorkingDir {
    fn base_dir(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Pick the executable's directory if any of `markers` sits beside it,
/// otherwise the working directory.
pub fn select_base_dir(markers: &[&str]) -> Box<dyn BaseDir> {
    if let Some(exe_dir) = ExecutableDir::locate()
        && markers.iter().any(|m| exe_dir.dir.join(m).exists())
    {
        debug!(dir = %exe_dir.dir.display(), "using executable directory");
        return Box::new(exe_dir);
    }
    debug!("using working directory");
    Box::new(WorkingDir)
}

/// Absolute location of a bundled file. Does not touch the filesystem.
pub fn resolve_archive_path(base: &dyn BaseDir, relative_name: &str) -> PathBuf {
    base.base_dir().join(relative_name)
}

/// VRChat's data folder under the per-user LocalLow directory
#[cfg(windows)]
pub fn default_cache_root() -> Option<PathBuf> {
    // %APPDATA% is AppData\Roaming, LocalLow is its sibling
    let roaming = dirs::data_dir()?;
    Some(roaming.parent()?.join("LocalLow").join("VRChat").join("VRChat"))
}

/// VRChat's data folder inside the Steam Proton prefix
#[cfg(not(windows))]
pub fn default_cache_root() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(
        home.join(".steam/steam/steamapps/compatdata")
            .join(VRCHAT_STEAM_APP_ID)
            .join("pfx/drive_c/users/steamuser/AppData/LocalLow/VRChat/VRChat"),
    )
}

/// Ask for the VRChat cache folder until an existing one is given.
/// Empty input selects `default`. Fails only if input is closed.
pub fn prompt_cache_root<C: Console + ?Sized>(
    console: &mut C,
    default: Option<&Path>,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf> {
    loop {
        console.print_line("VRChat Cache Folder Location (press Enter for default):");
        match default {
            Some(path) => console.print_line(&format!("Default: {}", path.display())),
            None => console.print_line("Default: (not available on this system)"),
        }

        let Some(input) = console
            .prompt("> ")
            .context("Failed to read cache folder location")?
        else {
            bail!("Input closed before a cache folder was chosen");
        };

        let input = input.trim();
        let candidate = if input.is_empty() {
            default.map(Path::to_path_buf)
        } else {
            Some(PathBuf::from(input))
        };

        match candidate {
            Some(path) if exists(&path) => return Ok(path),
            _ => console.print_line(&format!(
                "{CROSS}VRChat Cache folder not found. Please try again."
            )),
        }
    }
}

/// `root/<cache_dir>/<cache_namespace>/<content_id>`
pub fn build_extraction_target_path(root: &Path, settings: &Settings) -> PathBuf {
    root.join(&settings.cache_dir)
        .join(&settings.cache_namespace)
        .join(&settings.content_id)
}
