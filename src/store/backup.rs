//! Online snapshots.

use super::error::report;
use super::{NoteStore, StoreError, StoreResult};
use std::fs;
use std::path::Path;
use tracing::info;

impl NoteStore {
    /// Writes a consistent snapshot of the database to `dest`.
    ///
    /// The snapshot is produced with `VACUUM INTO` in a temporary directory
    /// next to `dest` and then renamed into place, so `dest` is either the
    /// previous file or a complete snapshot. Writers on other connections
    /// may continue meanwhile.
    pub fn backup_to(&self, dest: &Path) -> StoreResult<()> {
        self.backup_inner(dest).inspect_err(|e| report("backup", e))
    }

    fn backup_inner(&self, dest: &Path) -> StoreResult<()> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StoreError::Io { path, source }
        };

        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let staging_dir = tempfile::Builder::new()
            .prefix(".quire-backup-")
            .tempdir_in(dir)
            .map_err(io_err(dir))?;
        let staging = staging_dir.path().join("snapshot.sqlite");
        let staging_str = staging.to_str().ok_or_else(|| StoreError::Io {
            path: staging.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "backup path is not valid UTF-8",
            ),
        })?;

        self.conn.execute("VACUUM INTO ?1", [staging_str])?;
        fs::rename(&staging, dest).map_err(io_err(dest))?;

        let size = fs::metadata(dest).map(|m| m.len()).unwrap_or_default();
        info!(dest = %dest.display(), size, "store: backup written");
        Ok(())
    }
}
