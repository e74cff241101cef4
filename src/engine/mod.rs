//! Core engine: item valuation, profit reconciliation and event intake.

pub mod valuation;
pub mod tracker;
pub mod session;
