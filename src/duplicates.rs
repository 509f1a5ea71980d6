//! Per-run registry of content hashes already seen.

use crate::content_hash::ContentHash;
use std::collections::HashMap;

/// Result of checking a file against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// First file with this content; it is now registered.
    Unique,
    /// Same content as an earlier file, named here.
    DuplicateOf(String),
}

/// Maps each content hash to the first file name observed with it.
///
/// One registry belongs to one organizer run and is dropped with it.
#[derive(Debug, Default)]
pub struct DuplicateRegistry {
    seen: HashMap<ContentHash, String>,
}

impl DuplicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `hash` and registers it against `file_name` when unseen.
    ///
    /// # Examples
    ///
    /// ```
    /// use declutter::content_hash::hash_reader;
    /// use declutter::duplicates::{DuplicateCheck, DuplicateRegistry};
    ///
    /// let mut registry = DuplicateRegistry::new();
    /// let hash = hash_reader(&b"same bytes"[..]).unwrap();
    ///
    /// assert_eq!(registry.check_and_register(hash.clone(), "a.pdf"), DuplicateCheck::Unique);
    /// assert_eq!(
    ///     registry.check_and_register(hash, "a_copy.pdf"),
    ///     DuplicateCheck::DuplicateOf("a.pdf".to_string())
    /// );
    /// ```
    pub fn check_and_register(&mut self, hash: ContentHash, file_name: &str) -> DuplicateCheck {
        match self.seen.get(&hash) {
            Some(original) => DuplicateCheck::DuplicateOf(original.clone()),
            None => {
                self.seen.insert(hash, file_name.to_string());
                DuplicateCheck::Unique
            }
        }
    }

    /// Name of the first file registered with `hash`, if any.
    pub fn original_of(&self, hash: &ContentHash) -> Option<&str> {
        self.seen.get(hash).map(String::as_str)
    }

    /// Number of distinct contents registered.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
