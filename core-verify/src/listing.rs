//! Listing maps: canonical path → size, one per side of a pair.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which side of a pair a listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// One file after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub canonical_path: String,
    pub size: u64,
}

/// What happened while a listing was collected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    /// Raw entries reported by the store, markers included
    pub entries_seen: u64,
    /// Folder placeholders skipped
    pub directory_markers: u64,
    /// Keys outside the requested prefix, kept unmodified
    pub prefix_anomalies: u64,
    /// Canonical paths reported more than once
    pub duplicates: u64,
}

/// Canonical path → size, in the order the store reported the paths
///
/// Keys are unique. Re-inserting a path keeps its original position and
/// overwrites the size (last-seen wins); the repeat is counted in
/// [`ListingStats::duplicates`].
#[derive(Debug, Clone, Default)]
pub struct ListingMap {
    entries: Vec<ObjectEntry>,
    index: HashMap<String, usize>,
    stats: ListingStats,
}

impl ListingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path; returns the previous size when the path was already present
    pub fn insert(&mut self, canonical_path: String, size: u64) -> Option<u64> {
        if let Some(&position) = self.index.get(&canonical_path) {
            self.stats.duplicates += 1;
            let entry = &mut self.entries[position];
            let previous = entry.size;
            entry.size = size;
            return Some(previous);
        }

        self.index.insert(canonical_path.clone(), self.entries.len());
        self.entries.push(ObjectEntry {
            canonical_path,
            size,
        });
        None
    }

    pub fn get(&self, canonical_path: &str) -> Option<u64> {
        self.index
            .get(canonical_path)
            .map(|&position| self.entries[position].size)
    }

    pub fn contains(&self, canonical_path: &str) -> bool {
        self.index.contains_key(canonical_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(path, size)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.canonical_path.as_str(), entry.size))
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    /// Total bytes across all entries
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    pub fn stats(&self) -> ListingStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ListingStats {
        &mut self.stats
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ListingMap {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut map = ListingMap::new();
        for (path, size) in iter {
            map.insert(path.into(), size);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_preserved() {
        let map: ListingMap = [("z.txt", 1), ("a.txt", 2), ("m.txt", 3)]
            .into_iter()
            .collect();

        let paths: Vec<_> = map.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, ["z.txt", "a.txt", "m.txt"]);
        assert_eq!(map.total_size(), 6);
    }

    #[test]
    fn test_duplicate_keeps_position_and_last_size() {
        let mut map = ListingMap::new();
        assert_eq!(map.insert("a.txt".into(), 1), None);
        assert_eq!(map.insert("b.txt".into(), 2), None);
        assert_eq!(map.insert("a.txt".into(), 10), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a.txt"), Some(10));
        assert_eq!(map.iter().next(), Some(("a.txt", 10)));
        assert_eq!(
            map.entries()[0],
            ObjectEntry {
                canonical_path: "a.txt".to_string(),
                size: 10
            }
        );
        assert_eq!(map.stats().duplicates, 1);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let map: ListingMap = [("File.txt", 1), ("file.txt", 2)].into_iter().collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("File.txt"), Some(1));
        assert_eq!(map.get("file.txt"), Some(2));
        assert!(!map.contains("FILE.txt"));
    }

    #[test]
    fn test_zero_byte_entries_are_kept() {
        let map: ListingMap = [("empty.txt", 0)].into_iter().collect();

        assert!(!map.is_empty());
        assert_eq!(map.get("empty.txt"), Some(0));
    }
}
