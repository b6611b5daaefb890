use std::collections::HashMap;
use std::hash::Hash;

/// Default number of entries kept per memoized lookup.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Bounded least-recently-used cache keyed by lookup input.
///
/// Recency is tracked with a monotonically increasing tick; eviction scans
/// for the smallest tick. A capacity of zero stores nothing.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    map: HashMap<K, (V, u64)>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, tick: 0, map: HashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)) }
    }

    /// Return a clone of the cached value and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let (value, used) = self.map.get_mut(key)?;
        self.tick = self.tick.wrapping_add(1);
        *used = self.tick;
        Some(value.clone())
    }

    pub fn put(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.tick = self.tick.wrapping_add(1);
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            let oldest = self.map.iter().min_by_key(|(_, (_, used))| *used).map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                self.map.remove(&oldest);
            }
        }
        self.map.insert(key, (value, self.tick));
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
