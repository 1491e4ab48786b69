//! Ordered, duplicate-free collection

use serde::{Deserialize, Serialize};

use crate::error::CollectionError;

/// An element that can be checked for identity (duplicate) equivalence.
///
/// `PartialEq` on the implementor is the full equivalence.
pub trait Entry: Clone + PartialEq {
    fn same_identity(&self, other: &Self) -> bool;
}

/// An ordered list with no two identity-equivalent elements.
///
/// Plain value type: no history, no observers. See [`crate::history::History`]
/// for the versioned wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueList<T> {
    items: Vec<T>,
}

impl<T> Default for UniqueList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entry> UniqueList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list, rejecting identity duplicates.
    pub fn from_items(items: Vec<T>) -> Result<Self, CollectionError> {
        let mut list = Self::new();
        for item in items {
            list.add(item)?;
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Identity-equivalence membership test
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing.same_identity(item))
    }

    /// Full-equivalence membership test
    pub fn contains_exact(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    /// Position of a fully-equivalent element
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|existing| existing == item)
    }

    /// Position of an identity-equivalent element
    pub fn position_by_identity(&self, item: &T) -> Option<usize> {
        self.items
            .iter()
            .position(|existing| existing.same_identity(item))
    }

    pub fn add(&mut self, item: T) -> Result<(), CollectionError> {
        let end = self.items.len();
        self.add_at(item, end)
    }

    /// Insert at `index` (clamped to the end of the list).
    pub fn add_at(&mut self, item: T, index: usize) -> Result<(), CollectionError> {
        if self.contains(&item) {
            return Err(CollectionError::DuplicateEntity);
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove the first fully-equivalent element, returning its former position.
    pub fn remove(&mut self, item: &T) -> Result<usize, CollectionError> {
        let index = self.position(item).ok_or(CollectionError::EntityNotFound)?;
        self.items.remove(index);
        Ok(index)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Replace `target` with `replacement` in place.
    pub fn replace(&mut self, target: &T, replacement: T) -> Result<(), CollectionError> {
        let index = self
            .position(target)
            .ok_or(CollectionError::EntityNotFound)?;
        let clashes = self
            .items
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.same_identity(&replacement));
        if clashes {
            return Err(CollectionError::DuplicateEntity);
        }
        self.items[index] = replacement;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T> IntoIterator for &'a UniqueList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
