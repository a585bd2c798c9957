//! Identifier-keyed entity store

use std::borrow::Borrow;
use std::collections::hash_map::{self, Entry, HashMap};
use std::hash::Hash;

use crate::value_objects::Snowflake;

/// Mapping from identifier to entity.
///
/// Holds at most one live instance per identifier; `set` overwrites. There is no
/// eviction, so the cache grows with whatever the gateway streams in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache<T> {
    entries: HashMap<Snowflake, T>,
}

impl<T> Cache<T> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up an entity by identifier
    pub fn get<Q>(&self, id: &Q) -> Option<&T>
    where
        Snowflake: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id)
    }

    /// Look up an entity mutably by identifier
    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut T>
    where
        Snowflake: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(id)
    }

    /// Insert or overwrite an entity, returning the stored value
    pub fn set(&mut self, id: impl Into<Snowflake>, value: T) -> &mut T {
        match self.entries.entry(id.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Remove an entity; returns `true` if something was removed
    pub fn delete<Q>(&mut self, id: &Q) -> bool
    where
        Snowflake: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(id).is_some()
    }

    /// Remove an entity, handing it back to the caller
    pub fn remove<Q>(&mut self, id: &Q) -> Option<T>
    where
        Snowflake: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(id)
    }

    /// Check whether an identifier is present
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        Snowflake: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(id)
    }

    /// Number of cached entities
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Alias of [`Cache::size`]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> hash_map::Keys<'_, Snowflake, T> {
        self.entries.keys()
    }

    pub fn values(&self) -> hash_map::Values<'_, Snowflake, T> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> hash_map::ValuesMut<'_, Snowflake, T> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Snowflake, T> {
        self.entries.iter()
    }

    /// Keep only the entries matching the predicate
    pub fn retain(&mut self, f: impl FnMut(&Snowflake, &mut T) -> bool) {
        self.entries.retain(f);
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(Snowflake, T)> for Cache<T> {
    fn from_iter<I: IntoIterator<Item = (Snowflake, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<(Snowflake, T)> for Cache<T> {
    fn extend<I: IntoIterator<Item = (Snowflake, T)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a, T> IntoIterator for &'a Cache<T> {
    type Item = (&'a Snowflake, &'a T);
    type IntoIter = hash_map::Iter<'a, Snowflake, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
