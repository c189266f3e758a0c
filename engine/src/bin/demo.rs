//! Scenario runner for the order book engine.
//!
//! Drives a scripted sequence of adds/cancels/amends (or a random stream)
//! through an `OrderBook` and prints the resulting snapshot and
//! statistics. Not part of the engine's contract — a convenience driver,
//! the way `exchange`'s `main.rs` once drove the wire-protocol gateway.

use clap::Parser;
use common::Side;
use engine::OrderBook;

/// Order book scenario runner
#[derive(Parser, Debug)]
#[command(name = "engine-demo")]
#[command(about = "Drives scripted or random order flow through the CLOB engine")]
struct Args {
    /// Snapshot depth to print after the run
    #[arg(short, long, default_value_t = 5)]
    depth: usize,

    /// Run N random add/cancel operations instead of the scripted scenario
    #[arg(short, long)]
    random: Option<u64>,

    /// Order pool block capacity
    #[arg(long, default_value_t = engine::pool::OrderPool::<()>::DEFAULT_BLOCK_CAPACITY)]
    block_capacity: usize,
}

fn main() {
    let args = Args::parse();
    let mut book = OrderBook::with_block_capacity(args.block_capacity);

    match args.random {
        Some(n) => run_random(&mut book, n),
        None => run_scripted(&mut book),
    }

    let (bids, asks) = book.snapshot(args.depth);
    println!("bids: {:?}", bids);
    println!("asks: {:?}", asks);

    let stats = book.statistics();
    println!(
        "added={} cancelled={} matched={}",
        stats.total_orders_added, stats.total_orders_cancelled, stats.total_orders_matched
    );
}

fn run_scripted(book: &mut OrderBook) {
    let orders = [
        (1, Side::Bid, 1000, 50),
        (2, Side::Bid, 995, 100),
        (3, Side::Bid, 990, 75),
        (4, Side::Ask, 1010, 60),
        (5, Side::Ask, 1015, 80),
        (6, Side::Ask, 1020, 90),
    ];

    for (i, &(id, side, price, quantity)) in orders.iter().enumerate() {
        if let Err(reason) = book.add_order(id, side, price, quantity, i as u64) {
            eprintln!("order {} rejected: {}", id, reason);
        }
    }

    if book.cancel_order(2).is_ok() {
        println!("cancelled order 2");
    }

    match book.add_order(105, Side::Bid, 1020, 200, orders.len() as u64) {
        Ok(trades) => {
            for trade in trades {
                println!(
                    "trade buy={} sell={} qty={} price={}",
                    trade.buy_order_id, trade.sell_order_id, trade.quantity, trade.price
                );
            }
        }
        Err(reason) => eprintln!("aggressive order rejected: {}", reason),
    }
}

fn run_random(book: &mut OrderBook, n: u64) {
    // A simple xorshift keeps this demo free of an extra rand dependency
    // while still varying price, side, and quantity across the run.
    let mut state: u64 = 0x9E3779B97F4A7C15 ^ n;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let mut live_ids = Vec::new();
    for i in 0..n {
        let roll = next();
        if !live_ids.is_empty() && roll % 3 == 0 {
            let pick = (roll as usize / 3) % live_ids.len();
            let id: u64 = live_ids.swap_remove(pick);
            let _ = book.cancel_order(id);
            continue;
        }

        let side = if roll % 2 == 0 { Side::Bid } else { Side::Ask };
        let price = 990 + (roll % 21) as i64;
        let quantity = 1 + (roll % 100);
        match book.add_order(i + 1, side, price, quantity, i) {
            Ok(_) => live_ids.push(i + 1),
            Err(_) => continue,
        }
    }
}
