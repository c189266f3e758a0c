// Plain error enums for the engine's fallible operations.
//
// The workspace does not use thiserror anywhere; errors here follow the
// same hand-rolled Display convention as the rest of the stack.

use std::fmt;

use common::OrderId;

/// Why `add_order` rejected a new order before it ever touched the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    ZeroQuantity,
    DuplicateOrderId(OrderId),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ZeroQuantity => write!(f, "order quantity must be greater than zero"),
            RejectReason::DuplicateOrderId(id) => write!(f, "order id {} already resting", id),
        }
    }
}

/// Why `amend_order` could not apply the requested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmendError {
    NotFound(OrderId),
    ZeroQuantity,
}

impl fmt::Display for AmendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmendError::NotFound(id) => write!(f, "no resting order with id {}", id),
            AmendError::ZeroQuantity => write!(f, "amended quantity must be greater than zero"),
        }
    }
}

/// Why `cancel_order` could not find the order to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelError(pub OrderId);

impl fmt::Display for CancelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no resting order with id {}", self.0)
    }
}
