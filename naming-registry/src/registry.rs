//! Name-to-object bindings with duplicate protection
//!
//! `NamingRegistry<V>` maps logical names to bound objects. Names are unique
//! at any instant: binding a name that is already taken fails, and callers
//! must unbind it explicitly before binding something else under it.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{NamingError, Result};

/// A single binding, as returned by [`NamingRegistry::entries`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingEntry<V> {
    /// Logical name the object is bound under
    pub name: String,
    /// The bound object
    pub object: V,
}

/// Thread-safe registry of named bindings
///
/// Values are handed out by clone, so bind `Arc`s (or enums of `Arc`s) when
/// callers need to observe the identical instance that was bound.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use naming_registry::NamingRegistry;
///
/// let registry = NamingRegistry::<Arc<String>>::new();
/// let factory = Arc::new("in-vm".to_string());
///
/// registry.bind("java:/ConnectionFactory", Arc::clone(&factory)).unwrap();
///
/// let found = registry.lookup("java:/ConnectionFactory").unwrap();
/// assert!(Arc::ptr_eq(&found, &factory));
/// ```
pub struct NamingRegistry<V> {
    bindings: RwLock<HashMap<String, V>>,
}

impl<V: Clone> NamingRegistry<V> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `object` under `name`
    ///
    /// Fails with [`NamingError::AlreadyBound`] if the name is taken and with
    /// [`NamingError::EmptyName`] for `""`.
    pub fn bind(&self, name: impl Into<String>, object: V) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(NamingError::EmptyName);
        }

        let mut bindings = self.bindings.write();
        if bindings.contains_key(&name) {
            return Err(NamingError::AlreadyBound(name));
        }

        tracing::trace!("Bound {}", name);
        bindings.insert(name, object);
        Ok(())
    }

    /// Look up the object bound under `name`
    pub fn lookup(&self, name: &str) -> Option<V> {
        self.bindings.read().get(name).cloned()
    }

    /// Resolve the first candidate name whose binding passes `select`
    ///
    /// Candidates are tried in order; a name that is unbound, or whose object
    /// `select` rejects, is skipped. Returns `None` when nothing resolves.
    pub fn lookup_first<I, S, T, F>(&self, names: I, select: F) -> Option<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&V) -> Option<T>,
    {
        let bindings = self.bindings.read();
        names
            .into_iter()
            .find_map(|name| bindings.get(name.as_ref()).and_then(&select))
    }

    /// Remove the binding for `name`, returning the object that was bound
    ///
    /// Unbinding an absent name is a no-op.
    pub fn unbind(&self, name: &str) -> Option<V> {
        let removed = self.bindings.write().remove(name);
        if removed.is_some() {
            tracing::trace!("Unbound {}", name);
        }
        removed
    }

    /// Remove the binding for `name` only if `matches` accepts the bound object
    ///
    /// The check and the removal happen under one write lock, so a binding
    /// replaced by another caller is never removed by mistake.
    pub fn unbind_if<F>(&self, name: &str, matches: F) -> Option<V>
    where
        F: FnOnce(&V) -> bool,
    {
        let mut bindings = self.bindings.write();
        if !bindings.get(name).is_some_and(matches) {
            return None;
        }

        let removed = bindings.remove(name);
        tracing::trace!("Unbound {}", name);
        removed
    }

    /// Check whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    /// All bound names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of every binding, sorted by name
    pub fn entries(&self) -> Vec<NamingEntry<V>> {
        let mut entries: Vec<NamingEntry<V>> = self
            .bindings
            .read()
            .iter()
            .map(|(name, object)| NamingEntry {
                name: name.clone(),
                object: object.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Check if the registry has no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Remove every binding, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut bindings = self.bindings.write();
        let count = bindings.len();
        bindings.clear();
        count
    }
}

impl<V: Clone> Default for NamingRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for NamingRegistry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingRegistry")
            .field("binding_count", &self.bindings.read().len())
            .finish()
    }
}
