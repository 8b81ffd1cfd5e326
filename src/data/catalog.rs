// ============================================================
// Layer 4 — Catalog Store
// ============================================================
// Owns the on-disk catalog: a single CSV with the fixed header
//   id,titulo,autor,genero,ano_publicacao,paginas,avaliacao,preco,estoque
//
// Every other component reads the catalog through list() and
// mutates it through create/update/delete — nobody else touches
// the file. The active path is a constructor parameter, so a
// bulk import can point the store at a replacement resource
// without code changes.
//
// Three rules every mutation follows, in order:
//   1. Validate the incoming fields (bad input fails here,
//      before anything is written anywhere)
//   2. Snapshot the current file into the backup area
//   3. Rewrite the whole file via temp-file-then-rename, so an
//      interrupted write can never truncate the catalog
//
// Mutations serialise on one mutex around the whole
// backup + read-modify-write cycle; the same mutex guards the
// id high-water mark. list() takes no lock — the atomic rename
// means a reader always sees a complete file.
//
// Id assignment: max(existing) + 1 at open, and monotonically
// increasing afterwards. Deleting the highest record does not
// hand its id back; a fresh id is a fresh id.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::domain::error::{Error, Result};
use crate::domain::record::{Record, RecordDraft, RecordPatch};
use crate::infra::backup::BackupWriter;

pub struct CatalogStore {
    path: PathBuf,
    backups: BackupWriter,
    /// When true, a missing resource is initialised empty instead
    /// of failing with StoreUnavailable.
    create_missing: bool,
    /// Id high-water mark, doubling as the mutation lock.
    next_id: Mutex<u64>,
}

impl CatalogStore {
    /// Open a store over the given catalog path.
    ///
    /// With `create_missing` the resource is initialised as a
    /// header-only CSV when absent; without it, reads fail with
    /// StoreUnavailable until someone provides the file.
    pub fn open(
        path: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        create_missing: bool,
    ) -> Result<Self> {
        let path = path.into();
        let store = Self {
            path,
            backups: BackupWriter::new(backup_dir),
            create_missing,
            next_id: Mutex::new(1),
        };

        if store.path.exists() {
            // Seed the high-water mark from what's already there
            let max_id = store
                .read_all()?
                .iter()
                .map(|r| r.id)
                .max()
                .unwrap_or(0);
            *store.lock() = max_id + 1;
        } else if create_missing {
            store.write_all(&[])?;
            tracing::info!("Initialised empty catalog at '{}'", store.path.display());
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups(&self) -> &BackupWriter {
        &self.backups
    }

    /// Load and parse the full catalog.
    pub fn list(&self) -> Result<Vec<Record>> {
        self.read_all()
    }

    /// Validate, assign the next id, append, persist.
    pub fn create(&self, draft: &RecordDraft) -> Result<Record> {
        let mut next = self.lock();
        let mut records = self.read_all()?;

        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        let id = (*next).max(max_id + 1);

        // Validation happens before the backup: a rejected draft
        // must leave no trace anywhere
        let record = Record::from_draft(id, draft)?;

        self.snapshot_current()?;
        records.push(record.clone());
        self.write_all(&records)?;
        *next = id + 1;

        tracing::info!("Created record {} ('{}')", record.id, record.titulo);
        Ok(record)
    }

    /// Overwrite the named fields of an existing record in place.
    pub fn update(&self, id: u64, patch: &RecordPatch) -> Result<Record> {
        let _next = self.lock();
        let mut records = self.read_all()?;

        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound(id))?;

        // Patch a copy first so a validation failure can't leave
        // the stored row half-edited
        let mut updated = records[pos].clone();
        patch.apply(&mut updated)?;

        self.snapshot_current()?;
        records[pos] = updated.clone();
        self.write_all(&records)?;

        tracing::info!("Updated record {}", id);
        Ok(updated)
    }

    /// Remove a record. Its id is never handed out again.
    pub fn delete(&self, id: u64) -> Result<()> {
        let _next = self.lock();
        let mut records = self.read_all()?;

        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound(id))?;

        self.snapshot_current()?;
        records.remove(pos);
        self.write_all(&records)?;

        tracing::info!("Deleted record {}", id);
        Ok(())
    }

    /// Replace the whole catalog with the given records (used by
    /// the synthetic generator). One mutation, one backup.
    pub fn replace_all(&self, records: &[Record]) -> Result<()> {
        let mut next = self.lock();
        self.snapshot_current()?;
        self.write_all(records)?;
        let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        *next = (*next).max(max_id + 1);
        tracing::info!("Catalog replaced with {} records", records.len());
        Ok(())
    }

    /// Bulk import: validate that `source` parses as a catalog
    /// with unique ids, then swap it in as the active resource.
    /// The previous state is backed up first; a file that fails
    /// validation changes nothing.
    pub fn import_from(&self, source: &Path) -> Result<usize> {
        let incoming = read_catalog_file(source).map_err(|e| {
            tracing::warn!("Rejected import of '{}': {}", source.display(), e);
            Error::validation(
                "file",
                format!("'{}' is not a valid catalog CSV", source.display()),
            )
        })?;

        let mut seen = HashSet::with_capacity(incoming.len());
        for record in &incoming {
            if !seen.insert(record.id) {
                tracing::warn!(
                    "Rejected import of '{}': duplicate id {}",
                    source.display(),
                    record.id
                );
                return Err(Error::validation(
                    "id",
                    format!("duplicate id {} in '{}'", record.id, source.display()),
                ));
            }
        }

        let mut next = self.lock();
        self.snapshot_current()?;
        self.write_all(&incoming)?;
        let max_id = incoming.iter().map(|r| r.id).max().unwrap_or(0);
        *next = (*next).max(max_id + 1);

        tracing::info!(
            "Imported {} records from '{}'",
            incoming.len(),
            source.display()
        );
        Ok(incoming.len())
    }

    // ─── Internals ────────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, u64> {
        // A poisoned lock means a writer panicked mid-cycle; the
        // file itself is still whole (temp-then-rename), so recover.
        self.next_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot the current file before a mutation commits.
    fn snapshot_current(&self) -> Result<()> {
        if self.path.exists() {
            self.backups.snapshot(&self.path)?;
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            if self.create_missing {
                return Ok(Vec::new());
            }
            return Err(Error::StoreUnavailable(self.path.clone()));
        }
        read_catalog_file(&self.path).map_err(|e| {
            tracing::warn!("Catalog '{}' is unreadable: {}", self.path.display(), e);
            Error::StoreUnavailable(self.path.clone())
        })
    }

    /// Whole-file rewrite through a temp file in the same
    /// directory, renamed into place once fully written.
    fn write_all(&self, records: &[Record]) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = tempfile::NamedTempFile::new_in(
            if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            },
        )?;
        {
            let mut wtr = csv::Writer::from_writer(&mut tmp);
            if records.is_empty() {
                // serde only emits the header alongside a row, so an
                // empty catalog writes it explicitly
                wtr.write_record([
                    "id",
                    "titulo",
                    "autor",
                    "genero",
                    "ano_publicacao",
                    "paginas",
                    "avaliacao",
                    "preco",
                    "estoque",
                ])?;
            }
            for record in records {
                wtr.serialize(record)?;
            }
            wtr.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Parse any CSV file with the catalog header into records.
fn read_catalog_file(path: &Path) -> std::result::Result<Vec<Record>, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<Record>() {
        records.push(row?);
    }
    Ok(records)
}
