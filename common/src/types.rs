// Core type definitions shared across the workspace

// Type aliases
pub type OrderId = u64;
pub type Price = i64; // Fixed-point ticks; caller owns the scale
pub type Qty = u64;
pub type Timestamp = u64;

/// Represents the side of an order (bid or ask)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}
