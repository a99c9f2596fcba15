// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::calendar::types::{EconomicEvent, Impact, Snapshot};
pub use crate::calendar::{CalendarBatch, CalendarService};
