use super::{SnapshotStore, StoreResult, Tables};
use crate::snapshot::Snapshot;

/// Store that keeps its tables in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}

impl SnapshotStore for MemoryStore {
    fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.tables.exists(name))
    }

    fn save(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        self.tables.upsert(snapshot)
    }

    fn load(&self, name: &str) -> StoreResult<Option<Snapshot>> {
        Ok(self.tables.load(name))
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.tables.list())
    }

    fn delete(&mut self, name: &str) -> StoreResult<bool> {
        Ok(self.tables.delete(name))
    }
}
