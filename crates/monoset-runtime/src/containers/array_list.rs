//! Growable list backed by a contiguous buffer.
//!
//! This file is also the generic source the specializer rewrites, so it only
//! uses public paths through `crate::` and keeps `E` as its sole parameter.

use crate::traits::{AbstractList, Element};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayList<E> {
    elements: Vec<E>,
}

impl<E: Element> ArrayList<E> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Copy the elements of another collection, keeping their order.
    pub fn from_vec(elements: Vec<E>) -> Self {
        Self { elements }
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }
}

impl<E: Element> Default for ArrayList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> AbstractList<E> for ArrayList<E> {
    fn type_name(&self) -> &'static str {
        stringify!(ArrayList)
    }

    fn add(&mut self, element: E) {
        self.elements.push(element);
    }

    fn insert(&mut self, index: usize, element: E) -> bool {
        if index > self.elements.len() {
            return false;
        }
        self.elements.insert(index, element);
        true
    }

    fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    fn set(&mut self, index: usize, element: E) -> Option<E> {
        let slot = self.elements.get_mut(index)?;
        Some(std::mem::replace(slot, element))
    }

    fn remove(&mut self, index: usize) -> Option<E> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.elements.len()
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn index_of(&self, element: &E) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &E> + '_> {
        Box::new(self.elements.iter())
    }

    fn add_all(&mut self, elements: Vec<E>) {
        self.elements.extend(elements);
    }
}
