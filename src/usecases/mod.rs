//! Use-case layer — orchestration over the pure domain.
//!
//! Trade preview/execution and lifecycle transitions live here; the domain
//! stays free of sequencing and logging concerns.

pub mod lifecycle;
pub mod simulator;

pub use lifecycle::{redeem_position, resolve_market, stop_market, sweep_unredeemed};
pub use simulator::{apply_trade, simulate_trade, TradeReceipt, TradeRequest, TradeSimulation};
