// O(1) average lookup from an order id to where it rests in the book.
//
// Cancel and amend only ever receive an `OrderId` from the caller, so the
// book needs a way back to the side, price level, and pool slot without
// scanning. The locator is that index.

use std::collections::HashMap;

use common::{OrderId, Price, Side};

#[derive(Debug, Clone, Copy)]
pub struct Locator {
    pub side: Side,
    pub price: Price,
    pub pool_index: usize,
}

pub struct OrderLocator {
    entries: HashMap<OrderId, Locator>,
}

impl OrderLocator {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Records where `id` rests. Returns the previous entry, if `id` was
    /// already known (a duplicate id).
    pub fn insert(&mut self, id: OrderId, locator: Locator) -> Option<Locator> {
        self.entries.insert(id, locator)
    }

    pub fn get(&self, id: OrderId) -> Option<Locator> {
        self.entries.get(&id).copied()
    }

    pub fn remove(&mut self, id: OrderId) -> Option<Locator> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for OrderLocator {
    fn default() -> Self {
        Self::new()
    }
}
