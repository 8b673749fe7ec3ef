use async_trait::async_trait;
use domain::tally::{PageRequest, SnapshotPage, SnapshotQuery, TallySnapshotRepository};
use domain::{DomainError, TallySnapshot};
use tokio::sync::RwLock;

/// Snapshot store held in process memory
///
/// Used when no database is configured, and in tests.
#[derive(Default)]
pub struct InMemoryTallySnapshotRepository {
    snapshots: RwLock<Vec<TallySnapshot>>,
}

impl InMemoryTallySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshots(snapshots: Vec<TallySnapshot>) -> Self {
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }
}

#[async_trait]
impl TallySnapshotRepository for InMemoryTallySnapshotRepository {
    async fn find_snapshots(
        &self,
        query: &SnapshotQuery,
        page: Option<PageRequest>,
    ) -> Result<SnapshotPage, DomainError> {
        let snapshots = self.snapshots.read().await;
        let mut matching: Vec<TallySnapshot> = snapshots
            .iter()
            .filter(|snapshot| query.matches(snapshot))
            .cloned()
            .collect();
        matching.sort_by_key(|snapshot| snapshot.snapshot_date);

        let total = matching.len() as u64;
        let items = match page {
            Some(page) => matching
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => matching,
        };
        Ok(SnapshotPage { items, total })
    }

    async fn save(&self, snapshot: &TallySnapshot) -> Result<(), DomainError> {
        let mut snapshots = self.snapshots.write().await;
        match snapshots.iter_mut().find(|existing| existing.id == snapshot.id) {
            Some(existing) => *existing = snapshot.clone(),
            None => snapshots.push(snapshot.clone()),
        }
        Ok(())
    }
}
