//! Bounded history of reversible uploads.

use std::collections::VecDeque;

use pu_core::ports::UndoAction;
use tokio::sync::Mutex;
use tracing::debug;

/// Stable handle of a ledger entry, valid until the entry is taken or evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoEntryId(u64);

struct Entry {
    id: UndoEntryId,
    action: UndoAction,
}

struct Inner {
    next_id: u64,
    entries: VecDeque<Entry>,
}

/// FIFO of undo actions capped at `capacity`; the oldest entry is evicted first.
///
/// Every operation takes the single lock, so concurrent pipeline runs see
/// append, evict and remove as atomic steps.
pub struct UndoLedger {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl UndoLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                next_id: 0,
                entries: VecDeque::with_capacity(capacity),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an action, returning the titles of evicted entries.
    pub async fn record(&self, action: UndoAction) -> Vec<String> {
        let mut inner = self.inner.lock().await;
        let id = UndoEntryId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push_back(Entry { id, action });

        let mut evicted = Vec::new();
        while inner.entries.len() > self.capacity {
            if let Some(old) = inner.entries.pop_front() {
                debug!(title = %old.action.title, "evicting undo entry");
                evicted.push(old.action.title);
            }
        }
        evicted
    }

    /// `(id, title)` of every entry, oldest first.
    pub async fn entries(&self) -> Vec<(UndoEntryId, String)> {
        let inner = self.inner.lock().await;
        inner
            .entries
            .iter()
            .map(|e| (e.id, e.action.title.clone()))
            .collect()
    }

    /// Remove an entry wherever it sits. `None` if it was already taken or evicted.
    pub async fn take(&self, id: UndoEntryId) -> Option<UndoAction> {
        let mut inner = self.inner.lock().await;
        let pos = inner.entries.iter().position(|e| e.id == id)?;
        inner.entries.remove(pos).map(|e| e.action)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(title: &str) -> UndoAction {
        UndoAction::new(title, || async { Ok(()) })
    }

    async fn titles(ledger: &UndoLedger) -> Vec<String> {
        ledger.entries().await.into_iter().map(|(_, t)| t).collect()
    }

    #[tokio::test]
    async fn evicts_oldest_beyond_capacity() {
        let ledger = UndoLedger::new(2);
        assert!(ledger.record(action("a")).await.is_empty());
        assert!(ledger.record(action("b")).await.is_empty());
        assert_eq!(ledger.record(action("c")).await, vec!["a".to_string()]);

        assert_eq!(titles(&ledger).await, vec!["b", "c"]);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn zero_capacity_keeps_nothing() {
        let ledger = UndoLedger::new(0);
        assert_eq!(ledger.record(action("a")).await, vec!["a".to_string()]);
        assert!(ledger.is_empty().await);
    }

    #[tokio::test]
    async fn take_removes_from_any_position() {
        let ledger = UndoLedger::new(5);
        for t in ["a", "b", "c"] {
            ledger.record(action(t)).await;
        }
        let middle = ledger.entries().await[1].0;

        let taken = ledger.take(middle).await.expect("entry present");
        assert_eq!(taken.title, "b");
        assert_eq!(titles(&ledger).await, vec!["a", "c"]);
        assert!(ledger.take(middle).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_records_never_exceed_capacity() {
        let ledger = std::sync::Arc::new(UndoLedger::new(3));
        let mut handles = Vec::new();
        for i in 0..32 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.record(action(&format!("upload {i}"))).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(ledger.len().await, 3);
    }
}
