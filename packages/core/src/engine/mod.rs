//! Ride Profitability Engine
//!
//! Pure computation over a single trip offer: fee and operating cost
//! deductions, traffic-adjusted hourly rate, and a four-way accept/reject
//! recommendation. Nothing in here performs I/O or knows about locales.

pub mod calculator;
pub mod error;
pub mod presets;
pub mod recommendation;
pub mod traffic;
pub mod types;


pub use calculator::{compute_metrics, evaluate, validate_input};
pub use error::EngineError;
pub use presets::{FeeTable, Platform, PlatformPreset};
pub use recommendation::get_recommendation;
pub use traffic::TrafficLevel;
pub use types::*;
