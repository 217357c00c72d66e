//! # Repository
//!
//! Storage seam for every entity type. The only backend is process memory: records live in an
//! insertion-ordered map and vanish on restart. Each store receives its own instance, so tests
//! build fresh repositories instead of resetting shared state.
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

pub trait Repository<T>: Send + Sync {
    fn get(&self, id: &str) -> Option<T>;

    /// All records in insertion order.
    fn list(&self) -> Vec<T>;

    fn keys(&self) -> Vec<String>;

    fn put(&self, id: String, item: T);

    fn delete(&self, id: &str) -> bool;

    /// Read-modify-write of one record under a single lock. Returning `None` removes the record.
    fn update(&self, id: &str, apply: &mut dyn FnMut(Option<T>) -> Option<T>);
}

pub struct MemoryRepository<T> {
    items: RwLock<IndexMap<String, T>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(IndexMap::new()),
        }
    }
}

/// Fresh, empty repository ready to hand to a store.
pub fn in_memory<T>() -> Arc<dyn Repository<T>>
where
    T: Clone + Send + Sync + 'static,
{
    Arc::new(MemoryRepository::<T>::new())
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> for MemoryRepository<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self, id: &str) -> Option<T> {
        self.items.read().get(id).cloned()
    }

    fn list(&self) -> Vec<T> {
        self.items.read().values().cloned().collect()
    }

    fn keys(&self) -> Vec<String> {
        self.items.read().keys().cloned().collect()
    }

    fn put(&self, id: String, item: T) {
        self.items.write().insert(id, item);
    }

    fn delete(&self, id: &str) -> bool {
        self.items.write().shift_remove(id).is_some()
    }

    fn update(&self, id: &str, apply: &mut dyn FnMut(Option<T>) -> Option<T>) {
        let mut items = self.items.write();

        match apply(items.get(id).cloned()) {
            Some(item) => {
                items.insert(id.to_string(), item);
            }
            None => {
                items.shift_remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Barrier, thread};

    use super::{MemoryRepository, Repository};

    #[test]
    fn test_insertion_order() {
        let repo = MemoryRepository::new();
        repo.put("b".to_string(), 2);
        repo.put("a".to_string(), 1);
        repo.put("c".to_string(), 3);

        assert_eq!(repo.list(), vec![2, 1, 3]);
        assert!(repo.delete("a"));
        assert_eq!(repo.keys(), vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_put_replaces() {
        let repo = MemoryRepository::new();
        repo.put("x".to_string(), "old");
        repo.put("x".to_string(), "new");

        assert_eq!(repo.get("x"), Some("new"));
        assert_eq!(repo.list().len(), 1);
    }

    #[test]
    fn test_delete_missing() {
        let repo: MemoryRepository<u32> = MemoryRepository::default();
        assert!(!repo.delete("nothing"));
        assert_eq!(repo.get("nothing"), None);
    }

    #[test]
    fn test_update_removes_on_none() {
        let repo = MemoryRepository::new();
        repo.put("a".to_string(), 1);
        repo.put("b".to_string(), 2);

        repo.update("a", &mut |current| current.map(|n| n + 10));
        repo.update("b", &mut |_| None);
        repo.update("c", &mut |current| Some(current.unwrap_or(7)));

        assert_eq!(repo.list(), vec![11, 7]);
    }

    #[test]
    fn test_concurrent_updates_keep_every_write() {
        const WRITERS: usize = 16;

        for _ in 0..200 {
            let repo: MemoryRepository<Vec<usize>> = MemoryRepository::new();
            let barrier = Barrier::new(WRITERS);

            thread::scope(|scope| {
                for n in 0..WRITERS {
                    let (repo, barrier) = (&repo, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        repo.update("k", &mut |current| {
                            let mut list = current.unwrap_or_default();
                            list.push(n);
                            Some(list)
                        });
                    });
                }
            });

            assert_eq!(repo.get("k").map(|list| list.len()), Some(WRITERS));
        }
    }
}
