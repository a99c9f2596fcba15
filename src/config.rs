// src/config.rs
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SOURCE_URL: &str = "https://www.forexfactory.com/calendar";
const DEFAULT_FRESHNESS_MINUTES: u64 = 15;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8080,http://localhost:8082";
const DEFAULT_SNAPSHOT_PATH: &str = "data/calendar_snapshot.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_FETCH_DELAY_MS: RangeInclusive<u64> = 1000..=3000;

/// Runtime configuration, read once at startup from the environment.
/// `.env` files are honored via dotenvy in the binary entrypoint.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub source_url: String,
    pub freshness_minutes: u64,
    pub fetch_timeout: Duration,
    pub allowed_origins: Vec<String>,
    pub snapshot_path: PathBuf,
    pub bind_addr: String,
    pub fetch_delay_ms: RangeInclusive<u64>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            source_url: env_or("CALENDAR_SOURCE_URL", DEFAULT_SOURCE_URL),
            freshness_minutes: env_u64("CALENDAR_FRESHNESS_MINUTES", DEFAULT_FRESHNESS_MINUTES),
            fetch_timeout: Duration::from_secs(env_u64(
                "CALENDAR_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            allowed_origins: parse_origins(&env_or(
                "CALENDAR_ALLOWED_ORIGINS",
                DEFAULT_ALLOWED_ORIGINS,
            )),
            snapshot_path: PathBuf::from(env_or("CALENDAR_SNAPSHOT_PATH", DEFAULT_SNAPSHOT_PATH)),
            bind_addr: env_or("CALENDAR_BIND_ADDR", DEFAULT_BIND_ADDR),
            fetch_delay_ms: std::env::var("CALENDAR_FETCH_DELAY_MS")
                .ok()
                .and_then(|raw| parse_delay_range(&raw))
                .unwrap_or(DEFAULT_FETCH_DELAY_MS),
        }
    }

    /// Freshness window as a chrono duration for snapshot-age comparisons.
    pub fn freshness(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.freshness_minutes as i64)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `min-max` millisecond range, e.g. `1000-3000`. `0-0` disables the
/// pre-request delay.
fn parse_delay_range(raw: &str) -> Option<RangeInclusive<u64>> {
    let (min, max) = raw.split_once('-')?;
    let min: u64 = min.trim().parse().ok()?;
    let max: u64 = max.trim().parse().ok()?;
    if min > max {
        tracing::warn!(value = %raw, "inverted delay range, using default");
        return None;
    }
    Some(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let v = parse_origins(" http://localhost:8080 , ,http://localhost:8082");
        assert_eq!(
            v,
            vec![
                "http://localhost:8080".to_string(),
                "http://localhost:8082".to_string()
            ]
        );
    }

    #[test]
    fn empty_origin_list_parses_to_empty_vec() {
        assert!(parse_origins("  ").is_empty());
    }

    #[test]
    fn delay_range_accepts_min_max_form() {
        assert_eq!(parse_delay_range("1000-3000"), Some(1000..=3000));
        assert_eq!(parse_delay_range("0-0"), Some(0..=0));
    }

    #[test]
    fn delay_range_rejects_garbage_and_inverted_bounds() {
        assert_eq!(parse_delay_range("fast"), None);
        assert_eq!(parse_delay_range("3000-1000"), None);
    }
}
