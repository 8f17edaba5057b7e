//! Library exports for the easel drawing engine.
//!
//! Exposes the history engine, notification bus, snapshot codec, stores, and
//! configuration so the `easel` binary and external tools share one
//! implementation of every rule about ordering, colors, and persistence.

pub mod config;
pub mod draw;
pub mod events;
pub mod history;
pub mod script;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod util;

pub use config::Config;
pub use events::{Event, NotificationBus, Subscriber};
pub use history::{DrawOperation, History};
pub use session::{Session, StatusLevel, StatusMessage};
pub use snapshot::{Snapshot, from_snapshot, to_snapshot};
pub use store::{FileStore, MemoryStore, SnapshotStore, StoreError};
