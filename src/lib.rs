//! LMSR Market Core — Library Root
//!
//! Deterministic pricing, guarding, and settlement engine for binary
//! prediction markets. All operations are pure functions over explicit
//! state; hosts own persistence, clocks, and transport.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod usecases;
