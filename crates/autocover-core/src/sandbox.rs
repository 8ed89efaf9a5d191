//! Isolated, disposable filesystem roots — one per execution attempt.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AutocoverError, Result};

/// RAII guard over a uniquely-named sandbox directory.
///
/// The directory is created on construction and removed when the guard is
/// dropped, so cleanup happens on the success path, the handled-failure
/// path, and the unwind path alike. Call [`Sandbox::cleanup`] to remove it
/// eagerly and observe removal errors. Sandboxes are never shared: each
/// attempt owns its own root, and concurrent attempts are isolated purely
/// by name uniqueness.
#[derive(Debug)]
pub struct Sandbox {
    root: PathBuf,
    keep: bool,
    defused: bool,
}

impl Sandbox {
    /// Create a fresh sandbox root under `base` (the system temp directory
    /// when `None`), named `<prefix><random suffix>`.
    ///
    /// With `keep = true` the directory survives the guard — a debugging
    /// escape hatch; the default executor never sets it.
    pub fn create(prefix: &str, base: Option<&Path>, keep: bool) -> Result<Self> {
        let base = base
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let root = base.join(format!("{prefix}{}", Uuid::new_v4().simple()));

        std::fs::create_dir_all(&root).map_err(|e| {
            AutocoverError::sandbox_io(format!("failed to create sandbox at {}", root.display()), e)
        })?;
        debug!(root = %root.display(), "created sandbox");

        Ok(Self {
            root,
            keep,
            defused: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the sandbox now, reporting any filesystem error.
    pub fn cleanup(mut self) -> Result<()> {
        self.defused = true;
        if self.keep {
            debug!(root = %self.root.display(), "keeping sandbox");
            return Ok(());
        }
        std::fs::remove_dir_all(&self.root).map_err(|e| {
            AutocoverError::sandbox_io(
                format!("failed to remove sandbox at {}", self.root.display()),
                e,
            )
        })
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        if self.defused || self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if self.root.exists() {
                warn!(root = %self.root.display(), error = %e, "sandbox cleanup failed on drop");
            }
        }
    }
}
