// Trade reporting.

use common::{OrderId, Price, Qty};

/// A single fill produced by the crossing loop. Price is always the
/// resting (passive) side's price, never the aggressor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEvent {
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub quantity: Qty,
    pub price: Price,
}
