// One price's resting FIFO queue of orders.

use common::{Price, Qty};

/// A price bucket: the head/tail pool indices of its doubly-linked FIFO
/// queue plus the incrementally-maintained aggregate quantity.
///
/// The queue itself lives in the `OrderPool` (via each `Order`'s `prev`/
/// `next` links); `PriceLevel` only tracks the ends and the running totals.
pub struct PriceLevel {
    price: Price,
    total_quantity: Qty,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    #[inline]
    pub fn total_quantity(&self) -> Qty {
        self.total_quantity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn set_head(&mut self, head: Option<usize>) {
        self.head = head;
    }

    pub(crate) fn set_tail(&mut self, tail: Option<usize>) {
        self.tail = tail;
    }

    pub(crate) fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub(crate) fn increment(&mut self, qty: Qty) {
        self.total_quantity += qty;
        self.len += 1;
    }

    pub(crate) fn decrement(&mut self, qty: Qty) {
        self.total_quantity -= qty;
        self.len -= 1;
    }

    /// Reduces the aggregate quantity by a fill, without changing the
    /// order count. Used by the crossing loop, which removes a head
    /// order separately once its remaining quantity reaches zero.
    pub(crate) fn reduce_quantity(&mut self, qty: Qty) {
        self.total_quantity -= qty;
    }

    /// Drops one order from the count without touching `total_quantity`.
    /// Used by the crossing loop when a head order is fully filled: its
    /// quantity was already folded into `total_quantity` via
    /// `reduce_quantity`, so only the count needs to move.
    pub(crate) fn remove_filled_head(&mut self) {
        self.len -= 1;
    }

    /// Adjusts the aggregate quantity by a signed delta without changing
    /// the order count. Used by the quantity-only amend path.
    pub(crate) fn adjust_quantity(&mut self, old_qty: Qty, new_qty: Qty) {
        if new_qty >= old_qty {
            self.total_quantity += new_qty - old_qty;
        } else {
            self.total_quantity -= old_qty - new_qty;
        }
    }
}
