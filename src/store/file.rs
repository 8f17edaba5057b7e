use super::options::{CompressionMode, StoreOptions};
use super::{SnapshotStore, StoreError, StoreResult, Tables};
use crate::snapshot::Snapshot;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Store that keeps every drawing in one JSON document on disk.
///
/// Reads hold a shared lock on `drawings.lock` and writes an exclusive one,
/// so several processes can use the same directory. Each write goes to a
/// temporary file first and is renamed over the previous document. When the
/// document is missing but a backup exists, the backup is read instead.
#[derive(Debug, Clone)]
pub struct FileStore {
    options: StoreOptions,
}

enum LockKind {
    Shared,
    Exclusive,
}

impl FileStore {
    pub fn new(options: StoreOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Reads the whole table set under a shared lock.
    pub fn read_tables(&self) -> StoreResult<Tables> {
        let Some(path) = self.source_path() else {
            return Ok(Tables::new());
        };
        self.with_lock(LockKind::Shared, || self.read_tables_inner(&path))
    }

    /// The file to read from: the data file, or its backup when only that
    /// survived an interrupted write.
    fn source_path(&self) -> Option<PathBuf> {
        let data_path = self.options.data_file_path();
        if data_path.exists() {
            return Some(data_path);
        }
        let backup_path = self.options.backup_file_path();
        if backup_path.exists() {
            warn!(
                "Drawing file {} is missing; reading backup {}",
                data_path.display(),
                backup_path.display()
            );
            return Some(backup_path);
        }
        None
    }

    /// Runs `mutate` against the current tables and writes them back when it
    /// reports a change, all under one exclusive lock.
    fn modify<T>(
        &self,
        mutate: impl FnOnce(&mut Tables) -> StoreResult<(T, bool)>,
    ) -> StoreResult<T> {
        fs::create_dir_all(&self.options.base_dir).map_err(StoreError::io(format!(
            "failed to create drawing directory {}",
            self.options.base_dir.display()
        )))?;

        self.with_lock(LockKind::Exclusive, || {
            let mut tables = match self.source_path() {
                Some(path) => self.read_tables_inner(&path)?,
                None => Tables::new(),
            };
            let (value, changed) = mutate(&mut tables)?;
            if changed {
                self.write_tables_inner(&tables)?;
            }
            Ok(value)
        })
    }

    fn with_lock<T>(
        &self,
        kind: LockKind,
        body: impl FnOnce() -> StoreResult<T>,
    ) -> StoreResult<T> {
        let lock_path = self.options.lock_file_path();
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(StoreError::io(format!(
                "failed to open drawing lock file {}",
                lock_path.display()
            )))?;

        match kind {
            LockKind::Shared => lock_file.lock_shared(),
            LockKind::Exclusive => lock_file.lock_exclusive(),
        }
        .map_err(StoreError::io(format!(
            "failed to lock drawing file {}",
            lock_path.display()
        )))?;

        let result = body();

        lock_file.unlock().unwrap_or_else(|err| {
            warn!(
                "failed to unlock drawing file {}: {}",
                lock_path.display(),
                err
            )
        });

        result
    }

    fn read_tables_inner(&self, path: &Path) -> StoreResult<Tables> {
        let metadata = fs::metadata(path).map_err(StoreError::io(format!(
            "failed to stat drawing file {}",
            path.display()
        )))?;
        if metadata.len() > self.options.max_file_size_bytes {
            warn!(
                "Drawing file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
                path.display(),
                metadata.len(),
                self.options.max_file_size_bytes
            );
            return Err(StoreError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.options.max_file_size_bytes,
            });
        }

        let mut file_bytes = Vec::new();
        {
            let mut file = File::open(path).map_err(StoreError::io(format!(
                "failed to open drawing file {}",
                path.display()
            )))?;
            file.read_to_end(&mut file_bytes)
                .map_err(StoreError::io("failed to read drawing file"))?;
        }

        let decompressed = if is_gzip(&file_bytes) {
            let mut decoder = GzDecoder::new(&file_bytes[..]);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(StoreError::io("failed to decompress drawing file"))?;
            out
        } else {
            file_bytes
        };

        let mut tables: Tables = serde_json::from_slice(&decompressed)?;
        tables.prune_orphans();
        tables.repair_counters();
        Ok(tables)
    }

    fn write_tables_inner(&self, tables: &Tables) -> StoreResult<()> {
        let data_path = self.options.data_file_path();
        let backup_path = self.options.backup_file_path();

        let mut json_bytes = serde_json::to_vec_pretty(tables)?;

        if json_bytes.len() as u64 > self.options.max_file_size_bytes {
            warn!(
                "Drawing data size {} bytes exceeds the configured limit of {} bytes; not saving",
                json_bytes.len(),
                self.options.max_file_size_bytes
            );
            return Err(StoreError::TooLarge {
                path: data_path,
                size: json_bytes.len() as u64,
                limit: self.options.max_file_size_bytes,
            });
        }

        let should_compress = match self.options.compression {
            CompressionMode::Off => false,
            CompressionMode::On => true,
            CompressionMode::Auto => {
                (json_bytes.len() as u64) >= self.options.auto_compress_threshold_bytes
            }
        };

        if should_compress {
            json_bytes = compress_bytes(&json_bytes)?;
        }

        let tmp_path = temp_path(&data_path);
        {
            let mut tmp_file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp_path)
                .map_err(StoreError::io(format!(
                    "failed to open temporary drawing file {}",
                    tmp_path.display()
                )))?;
            tmp_file
                .write_all(&json_bytes)
                .map_err(StoreError::io("failed to write drawing payload"))?;
            tmp_file
                .sync_all()
                .map_err(StoreError::io("failed to sync temporary drawing file"))?;
        }

        // The previous document stays in place until the final rename.
        if data_path.exists() && self.options.backup_retention > 0 {
            fs::copy(&data_path, &backup_path).map_err(StoreError::io(format!(
                "failed to back up previous drawing file {} -> {}",
                data_path.display(),
                backup_path.display()
            )))?;
        }

        fs::rename(&tmp_path, &data_path).map_err(StoreError::io(format!(
            "failed to move temporary drawing file {} -> {}",
            tmp_path.display(),
            data_path.display()
        )))?;

        info!(
            "Drawings saved to {} ({} bytes, compression={})",
            data_path.display(),
            json_bytes.len(),
            should_compress
        );

        Ok(())
    }

    fn check_shape_limit(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let limit = self.options.max_shapes_per_drawing;
        if snapshot.shape_count() > limit {
            return Err(StoreError::TooManyShapes {
                name: snapshot.name.clone(),
                count: snapshot.shape_count(),
                limit,
            });
        }
        Ok(())
    }

    /// Trims drawings stored before the limit was lowered.
    fn enforce_shape_limit(&self, snapshot: &mut Snapshot) {
        let max_shapes = self.options.max_shapes_per_drawing;
        if snapshot.shapes.len() > max_shapes {
            warn!(
                "Drawing '{}' contains {} shapes which exceeds the limit of {}; truncating",
                snapshot.name,
                snapshot.shapes.len(),
                max_shapes
            );
            snapshot.shapes.truncate(max_shapes);
        }
    }
}

impl SnapshotStore for FileStore {
    fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.read_tables()?.exists(name))
    }

    fn save(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        Tables::validate(snapshot)?;
        self.check_shape_limit(snapshot)?;
        self.modify(|tables| {
            tables.upsert(snapshot)?;
            Ok(((), true))
        })?;
        debug!(
            "Stored drawing '{}' with {} shapes",
            snapshot.name,
            snapshot.shape_count()
        );
        Ok(())
    }

    fn load(&self, name: &str) -> StoreResult<Option<Snapshot>> {
        let Some(mut snapshot) = self.read_tables()?.load(name) else {
            debug!("No drawing named '{name}' in {}", self.options.base_dir.display());
            return Ok(None);
        };
        self.enforce_shape_limit(&mut snapshot);
        Ok(Some(snapshot))
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.read_tables()?.list())
    }

    fn delete(&mut self, name: &str) -> StoreResult<bool> {
        if self.source_path().is_none() {
            return Ok(false);
        }
        self.modify(|tables| {
            let removed = tables.delete(name);
            Ok((removed, removed))
        })
    }
}

fn compress_bytes(data: &[u8]) -> StoreResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(StoreError::io("failed to compress drawing payload"))?;
    encoder
        .finish()
        .map_err(StoreError::io("failed to finalise compressed drawing payload"))
}

pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}
