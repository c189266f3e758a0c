// Price-time priority order book.
//
// Ties together the order pool, the two side indices, and the order
// locator into the public matching engine surface: add/cancel/amend and
// the crossing loop that runs at the end of add and quantity-increasing
// amend.

use common::{log_debug, logging::Logger, OrderId, Price, Qty, Side, Timestamp};

use crate::error::{AmendError, CancelError, RejectReason};
use crate::locator::{Locator, OrderLocator};
use crate::order::Order;
use crate::pool::OrderPool;
use crate::side_index::SideIndex;
use crate::stats::Statistics;
use crate::trade::TradeEvent;

pub struct OrderBook {
    pool: OrderPool<Order>,
    bids: SideIndex,
    asks: SideIndex,
    locator: OrderLocator,
    stats: Statistics,
    logger: Option<Logger>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_block_capacity(OrderPool::<Order>::DEFAULT_BLOCK_CAPACITY)
    }

    pub fn with_block_capacity(block_capacity: usize) -> Self {
        Self {
            pool: OrderPool::new(block_capacity),
            bids: SideIndex::new(Side::Bid),
            asks: SideIndex::new(Side::Ask),
            locator: OrderLocator::new(),
            stats: Statistics::new(),
            logger: None,
        }
    }

    /// Attaches a logger; accepted operations and emitted trades are
    /// logged at debug level from then on.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    fn side_index(&self, side: Side) -> &SideIndex {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_index_mut(&mut self, side: Side) -> &mut SideIndex {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Links `new_idx` onto the tail of `level`'s queue, writing both the
    /// new order's `prev` and the old tail's `next` through the pool.
    fn link_tail(&mut self, level_side: Side, price: Price, new_idx: usize) {
        let old_tail = self.side_index_mut(level_side).find_or_create(price).tail();
        if let Some(old_tail_idx) = old_tail {
            self.pool.get_mut(old_tail_idx).next = Some(new_idx);
            self.pool.get_mut(new_idx).prev = Some(old_tail_idx);
        } else {
            self.side_index_mut(level_side).find_or_create(price).set_head(Some(new_idx));
        }
        let level = self.side_index_mut(level_side).find_or_create(price);
        level.set_tail(Some(new_idx));
    }

    /// Unlinks `idx` from its level's queue, fixing up the neighbors and
    /// the level's head/tail. Does not touch the level's aggregate
    /// quantity or erase an emptied level — callers do that.
    fn unlink(&mut self, level_side: Side, price: Price, idx: usize) {
        let order = self.pool.get(idx);
        let prev = order.prev;
        let next = order.next;

        match prev {
            Some(prev_idx) => self.pool.get_mut(prev_idx).next = next,
            None => {
                if let Some(level) = self.side_index_mut(level_side).get_mut(price) {
                    level.set_head(next);
                }
            }
        }

        match next {
            Some(next_idx) => self.pool.get_mut(next_idx).prev = prev,
            None => {
                if let Some(level) = self.side_index_mut(level_side).get_mut(price) {
                    level.set_tail(prev);
                }
            }
        }
    }

    fn erase_level_if_empty(&mut self, side: Side, price: Price) {
        let empty = self
            .side_index(side)
            .get(price)
            .map(|l| l.is_empty())
            .unwrap_or(false);
        if empty {
            self.side_index_mut(side).remove(price);
        }
    }

    /// Adds a new order to the book and runs the crossing loop.
    ///
    /// Rejects zero-quantity orders and duplicate ids without mutating
    /// any state.
    pub fn add_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Qty,
        timestamp: Timestamp,
    ) -> Result<Vec<TradeEvent>, RejectReason> {
        if quantity == 0 {
            return Err(RejectReason::ZeroQuantity);
        }
        if self.locator.contains(id) {
            return Err(RejectReason::DuplicateOrderId(id));
        }

        let order = Order::new(id, side, price, quantity, timestamp);
        let idx = self.pool.acquire(order);

        self.link_tail(side, price, idx);
        self.side_index_mut(side).find_or_create(price).increment(quantity);
        self.locator.insert(
            id,
            Locator {
                side,
                price,
                pool_index: idx,
            },
        );
        self.stats.total_orders_added += 1;

        if let Some(logger) = &self.logger {
            log_debug!(logger, "order added", id);
        }

        Ok(self.run_crossing_loop(side))
    }

    /// Cancels a resting order. Returns an error if the id is not live.
    /// Never triggers the crossing loop.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<(), CancelError> {
        let locator = self.locator.remove(id).ok_or(CancelError(id))?;

        self.unlink(locator.side, locator.price, locator.pool_index);
        let quantity = self.pool.get(locator.pool_index).quantity;
        if let Some(level) = self.side_index_mut(locator.side).get_mut(locator.price) {
            level.decrement(quantity);
        }
        self.pool.release(locator.pool_index);
        self.erase_level_if_empty(locator.side, locator.price);
        self.stats.total_orders_cancelled += 1;

        if let Some(logger) = &self.logger {
            log_debug!(logger, "order cancelled", id);
        }

        Ok(())
    }

    /// Amends a resting order's price and/or quantity.
    ///
    /// A same-price amend updates quantity in place and preserves queue
    /// priority; a price change is a cancel followed by a re-add at the
    /// tail of the new level, carrying the original timestamp and losing
    /// priority. The crossing loop runs whenever liquidity could have
    /// increased: on a same-price quantity increase, or unconditionally
    /// on a price change (handled by the re-add).
    pub fn amend_order(
        &mut self,
        id: OrderId,
        new_price: Price,
        new_quantity: Qty,
    ) -> Result<Vec<TradeEvent>, AmendError> {
        if new_quantity == 0 {
            return Err(AmendError::ZeroQuantity);
        }
        let locator = self.locator.get(id).ok_or(AmendError::NotFound(id))?;

        if new_price == locator.price {
            let old_quantity = self.pool.get(locator.pool_index).quantity;
            self.pool.get_mut(locator.pool_index).quantity = new_quantity;
            if let Some(level) = self.side_index_mut(locator.side).get_mut(locator.price) {
                level.adjust_quantity(old_quantity, new_quantity);
            }

            if let Some(logger) = &self.logger {
                log_debug!(logger, "order amended in place", id);
            }

            if new_quantity > old_quantity {
                return Ok(self.run_crossing_loop(locator.side));
            }
            return Ok(Vec::new());
        }

        let side = locator.side;
        let timestamp = self.pool.get(locator.pool_index).timestamp;
        self.cancel_order(id).map_err(|_| AmendError::NotFound(id))?;
        self.add_order(id, side, new_price, new_quantity, timestamp)
            .map_err(|_| AmendError::NotFound(id))
    }

    /// Runs the crossing loop, pricing each trade at the resting
    /// (passive) side rather than unconditionally at the ask.
    fn run_crossing_loop(&mut self, aggressor_side: Side) -> Vec<TradeEvent> {
        let mut trades = Vec::new();

        loop {
            let best_bid_price = match self.bids.best_price() {
                Some(p) => p,
                None => break,
            };
            let best_ask_price = match self.asks.best_price() {
                Some(p) => p,
                None => break,
            };
            if best_bid_price < best_ask_price {
                break;
            }

            let buy_idx = match self.bids.get_mut(best_bid_price).and_then(|l| l.head()) {
                Some(idx) => idx,
                None => break,
            };
            let sell_idx = match self.asks.get_mut(best_ask_price).and_then(|l| l.head()) {
                Some(idx) => idx,
                None => break,
            };

            let buy_id = self.pool.get(buy_idx).id;
            let sell_id = self.pool.get(sell_idx).id;
            let buy_qty = self.pool.get(buy_idx).quantity;
            let sell_qty = self.pool.get(sell_idx).quantity;
            let trade_qty = buy_qty.min(sell_qty);
            let trade_price = match aggressor_side {
                Side::Bid => best_ask_price,
                Side::Ask => best_bid_price,
            };

            let trade = TradeEvent {
                buy_order_id: buy_id,
                sell_order_id: sell_id,
                quantity: trade_qty,
                price: trade_price,
            };
            if let Some(logger) = &self.logger {
                log_debug!(logger, "trade emitted", trade_qty);
            }
            trades.push(trade);
            self.stats.total_orders_matched += 1;

            self.pool.get_mut(buy_idx).quantity -= trade_qty;
            self.pool.get_mut(sell_idx).quantity -= trade_qty;
            if let Some(level) = self.bids.get_mut(best_bid_price) {
                level.reduce_quantity(trade_qty);
            }
            if let Some(level) = self.asks.get_mut(best_ask_price) {
                level.reduce_quantity(trade_qty);
            }

            if self.pool.get(buy_idx).quantity == 0 {
                self.unlink(Side::Bid, best_bid_price, buy_idx);
                if let Some(level) = self.bids.get_mut(best_bid_price) {
                    level.remove_filled_head();
                }
                self.locator.remove(buy_id);
                self.pool.release(buy_idx);
                self.erase_level_if_empty(Side::Bid, best_bid_price);
            }
            if self.pool.get(sell_idx).quantity == 0 {
                self.unlink(Side::Ask, best_ask_price, sell_idx);
                if let Some(level) = self.asks.get_mut(best_ask_price) {
                    level.remove_filled_head();
                }
                self.locator.remove(sell_id);
                self.pool.release(sell_idx);
                self.erase_level_if_empty(Side::Ask, best_ask_price);
            }
        }

        trades
    }

    pub fn best_bid(&self) -> Option<(Price, Qty)> {
        self.bids.best_level().map(|l| (l.price(), l.total_quantity()))
    }

    pub fn best_ask(&self) -> Option<(Price, Qty)> {
        self.asks.best_level().map(|l| (l.price(), l.total_quantity()))
    }

    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Copies at most `depth` `(price, total_quantity)` pairs from each
    /// side, best-first. Pure: never mutates the book.
    pub fn snapshot(&self, depth: usize) -> (Vec<(Price, Qty)>, Vec<(Price, Qty)>) {
        let bids = self
            .bids
            .iter_best_first()
            .take(depth)
            .map(|l| (l.price(), l.total_quantity()))
            .collect();
        let asks = self
            .asks
            .iter_best_first()
            .take(depth)
            .map(|l| (l.price(), l.total_quantity()))
            .collect();
        (bids, asks)
    }

    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Drops all resting orders and resets the statistics counters.
    /// Preserves the block capacity and any attached logger.
    pub fn clear(&mut self) {
        let logger = self.logger.take();
        let mut fresh = Self::with_block_capacity(self.pool.block_capacity());
        fresh.logger = logger;
        *self = fresh;
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_prices(book: &OrderBook, depth: usize) -> (Vec<Price>, Vec<Price>) {
        let (bids, asks) = book.snapshot(depth);
        (
            bids.into_iter().map(|(p, _)| p).collect(),
            asks.into_iter().map(|(p, _)| p).collect(),
        )
    }

    // S1 — basic add and cancel.
    #[test]
    fn s1_basic_add_and_cancel() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 50, 1).unwrap();
        book.add_order(2, Side::Bid, 995, 100, 2).unwrap();
        book.add_order(3, Side::Bid, 990, 75, 3).unwrap();
        book.add_order(4, Side::Ask, 1010, 60, 4).unwrap();
        book.add_order(5, Side::Ask, 1015, 80, 5).unwrap();
        book.add_order(6, Side::Ask, 1020, 90, 6).unwrap();

        let (bids, asks) = book.snapshot(5);
        assert_eq!(bids, vec![(1000, 50), (995, 100), (990, 75)]);
        assert_eq!(asks, vec![(1010, 60), (1015, 80), (1020, 90)]);

        assert!(book.cancel_order(2).is_ok());
        let (bid_prices, _) = snapshot_prices(&book, 5);
        assert_eq!(bid_prices, vec![1000, 990]);

        assert!(book.cancel_order(2).is_err());
    }

    // S2 — aggressive buy crosses multiple levels and rests with no
    // remainder once fully consumed.
    #[test]
    fn s2_aggressive_buy_crosses_multiple_levels() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 50, 1).unwrap();
        book.add_order(3, Side::Bid, 990, 75, 3).unwrap();
        book.add_order(4, Side::Ask, 1010, 60, 4).unwrap();
        book.add_order(5, Side::Ask, 1015, 80, 5).unwrap();
        book.add_order(6, Side::Ask, 1020, 90, 6).unwrap();

        let trades = book.add_order(105, Side::Bid, 1020, 200, 7).unwrap();
        assert_eq!(
            trades,
            vec![
                TradeEvent { buy_order_id: 105, sell_order_id: 4, quantity: 60, price: 1010 },
                TradeEvent { buy_order_id: 105, sell_order_id: 5, quantity: 80, price: 1015 },
                TradeEvent { buy_order_id: 105, sell_order_id: 6, quantity: 60, price: 1020 },
            ]
        );

        let (bid_prices, ask_prices) = snapshot_prices(&book, 5);
        assert_eq!(bid_prices, vec![1000, 990]);
        assert!(ask_prices.is_empty());
    }

    // S3 — FIFO priority within a level.
    #[test]
    fn s3_fifo_within_a_level() {
        let mut book = OrderBook::new();
        book.add_order(201, Side::Bid, 1000, 50, 1).unwrap();
        book.add_order(202, Side::Bid, 1000, 75, 2).unwrap();
        book.add_order(203, Side::Bid, 1000, 100, 3).unwrap();

        let trades = book.add_order(204, Side::Ask, 1000, 100, 4).unwrap();
        assert_eq!(
            trades,
            vec![
                TradeEvent { buy_order_id: 201, sell_order_id: 204, quantity: 50, price: 1000 },
                TradeEvent { buy_order_id: 202, sell_order_id: 204, quantity: 50, price: 1000 },
            ]
        );

        let (bids, asks) = book.snapshot(5);
        assert_eq!(bids, vec![(1000, 125)]);
        assert!(asks.is_empty());
        assert!(!book.locator.contains(201));
        assert!(book.locator.contains(202));
        assert!(book.locator.contains(203));
    }

    // S4 — quantity-only amend preserves priority.
    #[test]
    fn s4_quantity_only_amend_preserves_priority() {
        let mut book = OrderBook::new();
        book.add_order(301, Side::Bid, 1000, 10, 1).unwrap();
        book.add_order(302, Side::Bid, 1000, 10, 2).unwrap();

        let trades = book.amend_order(301, 1000, 1000).unwrap();
        assert!(trades.is_empty());

        let trades = book.add_order(303, Side::Ask, 1000, 10, 3).unwrap();
        assert_eq!(
            trades,
            vec![TradeEvent { buy_order_id: 301, sell_order_id: 303, quantity: 10, price: 1000 }]
        );

        let loc = book.locator.get(301).unwrap();
        assert_eq!(book.pool.get(loc.pool_index).quantity, 990);
        let level = book.bids.get_mut(1000).unwrap();
        assert_eq!(level.head(), Some(loc.pool_index));
    }

    // S5 — price amend loses priority.
    #[test]
    fn s5_price_amend_loses_priority() {
        let mut book = OrderBook::new();
        book.add_order(401, Side::Bid, 1000, 10, 1).unwrap();
        book.add_order(402, Side::Bid, 1000, 10, 2).unwrap();

        book.amend_order(401, 995, 10).unwrap();

        let (bid_prices, _) = snapshot_prices(&book, 5);
        assert_eq!(bid_prices, vec![1000, 995]);
        let level_1000 = book.bids.get_mut(1000).unwrap();
        assert_eq!(level_1000.len(), 1);
    }

    #[test]
    fn aggressor_side_sets_trade_price_for_incoming_sell() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 50, 1).unwrap();

        let trades = book.add_order(2, Side::Ask, 990, 50, 2).unwrap();
        assert_eq!(
            trades,
            vec![TradeEvent { buy_order_id: 1, sell_order_id: 2, quantity: 50, price: 1000 }]
        );
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let mut book = OrderBook::new();
        assert_eq!(book.add_order(1, Side::Bid, 1000, 0, 1), Err(RejectReason::ZeroQuantity));
    }

    #[test]
    fn duplicate_id_add_is_rejected() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 10, 1).unwrap();
        assert_eq!(
            book.add_order(1, Side::Bid, 995, 10, 2),
            Err(RejectReason::DuplicateOrderId(1))
        );
    }

    #[test]
    fn zero_quantity_amend_is_rejected() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 10, 1).unwrap();
        assert_eq!(book.amend_order(1, 1000, 0), Err(AmendError::ZeroQuantity));
    }

    #[test]
    fn amend_of_unknown_id_fails() {
        let mut book = OrderBook::new();
        assert_eq!(book.amend_order(1, 1000, 10), Err(AmendError::NotFound(1)));
    }

    #[test]
    fn larger_aggressor_rests_with_remainder() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Ask, 1000, 10, 1).unwrap();
        let trades = book.add_order(2, Side::Bid, 1000, 30, 2).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 10);

        let (bids, asks) = book.snapshot(5);
        assert_eq!(bids, vec![(1000, 20)]);
        assert!(asks.is_empty());
    }

    #[test]
    fn clear_resets_book_and_counters() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 10, 1).unwrap();
        book.cancel_order(1).unwrap();
        assert_eq!(book.statistics().total_orders_added, 1);

        book.clear();
        assert_eq!(book.statistics().total_orders_added, 0);
        assert_eq!(book.bid_levels(), 0);
        assert!(book.best_bid().is_none());
    }

    #[test]
    fn snapshot_is_pure() {
        let mut book = OrderBook::new();
        book.add_order(1, Side::Bid, 1000, 10, 1).unwrap();
        let first = book.snapshot(5);
        let second = book.snapshot(5);
        assert_eq!(first, second);
    }
}
