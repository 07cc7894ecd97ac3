//! Snapshot module - per-day provider artifacts on disk.

mod snapshot_store;

pub use snapshot_store::SnapshotStore;
