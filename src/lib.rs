//! Inventory Value: carried and banked item valuation with session profit
//! tracking.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod prices;
pub mod game;
pub mod containers;
pub mod engine;
pub mod display;
pub mod replay;
