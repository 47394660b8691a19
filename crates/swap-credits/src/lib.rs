//! Credit valuation and offer ranking for vacation-week exchanges.
//!
//! The [`valuation`] module turns listing attributes into a guardrailed credit price and a
//! desirability score. The [`offers`] module compares an offer against a listing's credit value
//! and produces a fairness badge. Both are pure; the service layer wires them to the stores.

pub mod config;
pub mod error;
pub mod offers;
pub mod telemetry;
pub mod valuation;
