// ── Generic reactive entity collection ──
//
// Concurrent storage keyed by the backend's opaque string ids, with
// push-based change notification via `watch` channels. Refreshes replace
// the whole collection (the client re-fetches lists rather than patching
// them), so `replace_all` is the hot path.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

/// A reactive collection for a single entity type.
///
/// Every mutation rebuilds the snapshot that subscribers receive; reads
/// are cheap `Arc` clones of the current snapshot.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    by_id: DashMap<String, Arc<T>>,
    /// Insertion order of the latest refresh, so snapshots preserve the
    /// backend's list ordering instead of map iteration order.
    order: std::sync::RwLock<Vec<String>>,
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_id: DashMap::new(),
            order: std::sync::RwLock::new(Vec::new()),
            snapshot,
        }
    }

    /// Replace the entire collection with a fresh server list.
    pub(crate) fn replace_all(&self, entries: Vec<(String, T)>) {
        self.by_id.clear();
        let mut order = Vec::with_capacity(entries.len());
        for (id, entity) in entries {
            order.push(id.clone());
            self.by_id.insert(id, Arc::new(entity));
        }
        *self.order.write().expect("order lock poisoned") = order;
        self.rebuild_snapshot();
    }

    /// Look up an entity by id.
    pub(crate) fn get(&self, id: &str) -> Option<Arc<T>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Current snapshot (cheap `Arc` clone), in server list order.
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    /// Drop everything (offline / logout).
    pub(crate) fn clear(&self) {
        self.by_id.clear();
        self.order.write().expect("order lock poisoned").clear();
        self.rebuild_snapshot();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    fn rebuild_snapshot(&self) {
        let order = self.order.read().expect("order lock poisoned");
        let values: Vec<Arc<T>> = order
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|r| Arc::clone(r.value())))
            .collect();
        drop(order);
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(values));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn replace_all_preserves_server_order() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.replace_all(vec![
            ("z".into(), "last".into()),
            ("a".into(), "first".into()),
        ]);

        let snap = col.snapshot();
        assert_eq!(*snap[0], "last");
        assert_eq!(*snap[1], "first");
    }

    #[test]
    fn get_by_id() {
        let col: EntityCollection<u32> = EntityCollection::new();
        col.replace_all(vec![("x".into(), 7)]);
        assert_eq!(*col.get("x").unwrap(), 7);
        assert!(col.get("y").is_none());
    }

    #[test]
    fn replace_all_drops_stale_entries() {
        let col: EntityCollection<u32> = EntityCollection::new();
        col.replace_all(vec![("a".into(), 1), ("b".into(), 2)]);
        col.replace_all(vec![("b".into(), 3)]);

        assert_eq!(col.len(), 1);
        assert!(col.get("a").is_none());
        assert_eq!(*col.get("b").unwrap(), 3);
    }

    #[test]
    fn clear_empties_snapshot() {
        let col: EntityCollection<u32> = EntityCollection::new();
        col.replace_all(vec![("a".into(), 1)]);
        col.clear();
        assert!(col.snapshot().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let col: EntityCollection<u32> = EntityCollection::new();
        let mut rx = col.subscribe();

        col.replace_all(vec![("a".into(), 1)]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
