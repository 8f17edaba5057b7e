//! Persistence gateway for named drawings.
//!
//! Every backend stores drawings as header rows plus shape rows keyed by the
//! header (see [`Tables`]). The in-memory backend keeps the tables in a struct;
//! the file backend serialises them to `drawings.json` with locking, optional
//! compression, and backup rotation.

mod file;
mod memory;
mod options;
mod tables;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, StoreOptions, options_from_config,
};
pub use tables::{DrawingRow, ShapeRow, Tables};

use crate::config::{StorageBackend, StorageConfig};
use crate::snapshot::Snapshot;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by a [`SnapshotStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Drawing name must not be blank")]
    InvalidName,

    #[error("Drawing '{name}' has more than one shape with order {order}")]
    DuplicateOrder { name: String, order: u32 },

    #[error("Drawing '{name}' has a non-finite coordinate in shape {order}")]
    InvalidCoordinate { name: String, order: u32 },

    #[error("Drawing '{name}' has {count} shapes, over the limit of {limit}")]
    TooManyShapes {
        name: String,
        count: usize,
        limit: usize,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode or decode drawing data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store file {} is {size} bytes, over the {limit} byte limit", .path.display())]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let context = context.into();
        move |source| StoreError::Io { context, source }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Named-drawing persistence.
///
/// `save` is an upsert keyed by name that replaces the full shape set in one
/// step. `list` returns names with the most recently modified drawing first.
pub trait SnapshotStore {
    fn exists(&self, name: &str) -> StoreResult<bool>;
    fn save(&mut self, snapshot: &Snapshot) -> StoreResult<()>;
    fn load(&self, name: &str) -> StoreResult<Option<Snapshot>>;
    fn list(&self) -> StoreResult<Vec<String>>;
    fn delete(&mut self, name: &str) -> StoreResult<bool>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for Box<T> {
    fn exists(&self, name: &str) -> StoreResult<bool> {
        (**self).exists(name)
    }

    fn save(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn load(&self, name: &str) -> StoreResult<Option<Snapshot>> {
        (**self).load(name)
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        (**self).list()
    }

    fn delete(&mut self, name: &str) -> StoreResult<bool> {
        (**self).delete(name)
    }
}

/// Opens the backend selected in `storage`.
///
/// `data_dir` overrides the configured location for the file backend.
pub fn open_store(
    storage: &StorageConfig,
    config_dir: &Path,
    data_dir: Option<&Path>,
) -> anyhow::Result<Box<dyn SnapshotStore>> {
    match storage.backend {
        StorageBackend::Memory => {
            log::debug!("Using in-memory drawing store");
            Ok(Box::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            let mut options = options_from_config(storage, config_dir)?;
            if let Some(dir) = data_dir {
                options.base_dir = dir.to_path_buf();
            }
            log::debug!("Using drawing store at {}", options.base_dir.display());
            Ok(Box::new(FileStore::new(options)))
        }
    }
}
