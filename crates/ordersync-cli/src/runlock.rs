//! Guards the report file against overlapping pipeline runs.
//!
//! Nothing else prevents two invocations from interleaving their overwrites
//! of the report, so runs that write it take a lock file first. The lock is
//! advisory: a crash can leave it behind, in which case the error message
//! tells the operator what to remove.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub(crate) struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquires the lock for the given report file, failing fast if another
    /// run already holds it.
    pub(crate) fn acquire(report_path: &Path) -> anyhow::Result<Self> {
        let path = report_path.with_extension("lock");
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                let _ = write!(file, "{}", std::process::id());
                tracing::debug!(path = %path.display(), "acquired run lock");
                Ok(Self { path })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(anyhow::anyhow!(
                "another run appears to be in progress (lock file {} exists); \
                 remove it if the previous run crashed",
                path.display()
            )),
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove run lock"
            );
        }
    }
}
