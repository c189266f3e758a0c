// Shared types and low-latency infrastructure used by the engine crate.

pub mod lf_queue;
pub mod logging;
pub mod time;
pub mod types;

pub use types::*;
