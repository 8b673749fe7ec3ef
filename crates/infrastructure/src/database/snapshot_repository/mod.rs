mod in_memory_snapshot_repository;
mod postgres_snapshot_repository;

pub use in_memory_snapshot_repository::InMemoryTallySnapshotRepository;
pub use postgres_snapshot_repository::PostgresTallySnapshotRepository;
