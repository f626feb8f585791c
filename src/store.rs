//! Ordered key/value container.
//!
//! Used for request and response headers, path and query parameters, and the
//! per-request scratch store.

use std::borrow::Borrow;

/// An insertion-ordered mapping backed by a vector.
///
/// Setting an existing key replaces its value in place, so the original
/// position is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueStore<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for KeyValueStore<K, V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<K: PartialEq, V> KeyValueStore<K, V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a key-value pair.
    pub fn set(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(_, v)| v)
    }

    /// Remove a key, returning its value if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        let idx = self.entries.iter().position(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Iterate over all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> KeyValueStore<String, V> {
    /// Look up a key ignoring ASCII case, as header names require.
    pub fn get_ignore_case(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for KeyValueStore<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (k, v) in iter {
            store.set(k, v);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::KeyValueStore;

    #[test]
    fn test_set_replaces_in_place() {
        let mut store = KeyValueStore::new();
        store.set("a".to_string(), 1);
        store.set("b".to_string(), 2);
        store.set("a".to_string(), 3);

        let pairs: Vec<_> = store.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(pairs, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_delete_and_has() {
        let mut store: KeyValueStore<String, String> =
            [("x".to_string(), "1".to_string())].into_iter().collect();
        assert!(store.has("x"));
        assert_eq!(store.delete("x"), Some("1".to_string()));
        assert!(!store.has("x"));
        assert!(store.is_empty());
        assert_eq!(store.delete("x"), None);
    }

    #[test]
    fn test_get_ignore_case() {
        let mut store = KeyValueStore::new();
        store.set("Content-Type".to_string(), "text/plain");
        assert_eq!(store.get("content-type"), None);
        assert_eq!(store.get_ignore_case("content-type"), Some(&"text/plain"));
    }
}
