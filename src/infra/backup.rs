// ============================================================
// Layer 6 — Backup Writer
// ============================================================
// Takes a timestamped copy of the catalog resource before every
// mutating operation commits. Snapshots are write-once and never
// pruned by the system; the backup directory is the recovery
// path when a mutation goes wrong.
//
// File naming convention:
//   backups/
//     backup_2026-08-30_14-05.csv    ← first snapshot that minute
//     backup_2026-08-30_14-05_2.csv  ← second snapshot, same minute
//     backup_2026-08-30_14-06.csv
//
// The timestamp has minute resolution; the numeric suffix keeps
// "one snapshot per mutation" true when two mutations land in
// the same minute.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::Result;

pub struct BackupWriter {
    dir: PathBuf,
}

impl BackupWriter {
    /// Create a BackupWriter targeting the given directory.
    /// The directory is created on the first snapshot, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the backup area and return the snapshot
    /// path. The copy happens BEFORE the caller mutates the source;
    /// callers must not write the new state until this returns Ok.
    pub fn snapshot(&self, source: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv");
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M").to_string();

        let mut target = self.dir.join(format!("backup_{stamp}.{ext}"));
        let mut n = 2u32;
        while target.exists() {
            target = self.dir.join(format!("backup_{stamp}_{n}.{ext}"));
            n += 1;
        }

        fs::copy(source, &target)?;
        tracing::debug!("Backup snapshot written: '{}'", target.display());
        Ok(target)
    }

    /// Number of snapshots currently in the backup area.
    pub fn count(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut n = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with("backup_")
            {
                n += 1;
            }
        }
        Ok(n)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_snapshot_copies_current_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dados.csv");
        fs::write(&source, "id,titulo\n1,abc\n").unwrap();

        let backups = BackupWriter::new(dir.path().join("backups"));
        let snap = backups.snapshot(&source).unwrap();

        assert_eq!(fs::read_to_string(&snap).unwrap(), "id,titulo\n1,abc\n");
        let name = snap.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("backup_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_same_minute_snapshots_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("dados.csv");
        fs::write(&source, "a\n").unwrap();

        let backups = BackupWriter::new(dir.path().join("backups"));
        let first = backups.snapshot(&source).unwrap();
        fs::write(&source, "b\n").unwrap();
        let second = backups.snapshot(&source).unwrap();

        assert_ne!(first, second);
        assert_eq!(backups.count().unwrap(), 2);
        // Each snapshot kept the state at its own point in time
        assert_eq!(fs::read_to_string(&first).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "b\n");
    }
}
