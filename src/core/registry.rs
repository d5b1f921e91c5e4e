// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Name-keyed interning registry.
//!
//! Entries are append-only: the first registration of a name wins and later
//! registrations under the same name are discarded. Lookups try the exact
//! name first, then a package-qualified suffix match (`Header` finds
//! `std_msgs/Header`).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Thread-safe, append-only registry of named entries.
///
/// Uses RwLock for concurrent read access with exclusive write access.
/// Once population is complete the registry is only read.
pub struct TypeRegistry<T> {
    inner: RwLock<HashMap<String, T>>,
}

/// Outcome of [`TypeRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration<T> {
    /// The entry was stored under the name
    Inserted(T),
    /// The name was already taken; this is the entry that was kept
    Existing(T),
}

impl<T> Registration<T> {
    /// The entry now registered under the name.
    pub fn into_inner(self) -> T {
        match self {
            Registration::Inserted(v) | Registration::Existing(v) => v,
        }
    }

    /// Whether this call stored a new entry.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Registration::Inserted(_))
    }
}

impl<T: Clone> TypeRegistry<T> {
    /// Create a new empty type registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an entry unless the name is already taken.
    pub fn register(&self, name: impl Into<String>, value: T) -> Registration<T> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let name = name.into();
        match inner.get(&name) {
            Some(existing) => Registration::Existing(existing.clone()),
            None => {
                inner.insert(name, value.clone());
                Registration::Inserted(value)
            }
        }
    }

    /// Get an entry by exact name.
    pub fn get(&self, name: &str) -> Option<T> {
        self.read().get(name).cloned()
    }

    /// Get an entry by exact name, falling back to a suffix match.
    ///
    /// A suffix match requires the key to end with `/name`. When several keys
    /// match, the lexicographically smallest one is used so lookups are
    /// deterministic.
    pub fn resolve(&self, name: &str) -> Option<T> {
        let inner = self.read();
        if let Some(value) = inner.get(name) {
            return Some(value.clone());
        }
        if name.is_empty() {
            return None;
        }
        let suffix = format!("/{name}");
        inner
            .iter()
            .filter(|(key, _)| key.ends_with(&suffix))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, value)| value.clone())
    }

    /// Check if a name is registered exactly.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Get all registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
