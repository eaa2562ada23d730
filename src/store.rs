use dashmap::DashMap;

/// Id-keyed document collection.
///
/// Stands in for an external document store; the contract the rest of the
/// crate relies on is find/put/remove by numeric id plus highest-id-plus-one
/// allocation, seeded when the collection is empty.
pub struct Documents<T> {
    items: DashMap<i64, T>,
    first_id: i64,
}

impl<T: Clone> Documents<T> {
    pub fn new(first_id: i64) -> Self {
        Self {
            items: DashMap::new(),
            first_id,
        }
    }

    pub fn find(&self, id: i64) -> Option<T> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    /// Inserts or replaces the document stored under `id`.
    pub fn put(&self, id: i64, doc: T) {
        self.items.insert(id, doc);
    }

    pub fn remove(&self, id: i64) -> bool {
        self.items.remove(&id).is_some()
    }

    /// Next id to assign: highest existing id plus one. Allocation and the
    /// subsequent `put` are separate steps, so concurrent creators can race
    /// for the same id.
    pub fn next_id(&self) -> i64 {
        self.items
            .iter()
            .map(|entry| *entry.key())
            .max()
            .map_or(self.first_id, |highest| highest + 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
