// src/calendar/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a calendar entry, derived from the markers in the impact cell.
/// Classification precedence is High over Medium over Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub time: String,     // source-formatted time-of-day or date label, passed through
    pub currency: String, // e.g., "USD", "EUR"
    pub title: String,
    pub impact: Impact,
    pub actual: Option<String>,
    pub forecast: Option<String>,
    pub previous: Option<String>,
}

/// The single most-recently captured event set plus its capture time.
/// Stores hold at most one of these; a new save fully replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub events: Vec<EconomicEvent>,
    pub captured_at: DateTime<Utc>,
}
