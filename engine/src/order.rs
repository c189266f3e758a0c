// The resting order record stored in the pool.

use common::{OrderId, Price, Qty, Side, Timestamp};

/// A live order resting in the book.
///
/// `prev`/`next` link the order into its price level's FIFO queue as a
/// doubly-linked list over pool indices, giving O(1) removal given the
/// pool index stored in the locator.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Qty,
    pub timestamp: Timestamp,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl Order {
    pub fn new(id: OrderId, side: Side, price: Price, quantity: Qty, timestamp: Timestamp) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            timestamp,
            prev: None,
            next: None,
        }
    }
}
