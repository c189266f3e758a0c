// Price-ordered index from price to PriceLevel, one per side.
//
// Backed by a BTreeMap for O(log n) insert/erase and O(log n) best-price
// access (the teacher's HashMap + `.keys().max()`/`.keys().min()` scan is
// O(n) per lookup; this replaces that with the ordered map the design
// actually calls for).

use std::collections::BTreeMap;

use common::{Price, Side};

use crate::price_level::PriceLevel;

pub struct SideIndex {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl SideIndex {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Returns the existing level at `price`, or creates and inserts an
    /// empty one.
    pub fn find_or_create(&mut self, price: Price) -> &mut PriceLevel {
        self.levels.entry(price).or_insert_with(|| PriceLevel::new(price))
    }

    pub fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub fn remove(&mut self, price: Price) {
        self.levels.remove(&price);
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// The best (highest bid / lowest ask) resting price, if any.
    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Bid => self.levels.keys().next_back().copied(),
            Side::Ask => self.levels.keys().next().copied(),
        }
    }

    pub fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        }
    }

    /// Iterates price levels best-first: descending for bids, ascending
    /// for asks.
    pub fn iter_best_first(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        }
    }
}
