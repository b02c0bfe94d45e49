use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PROMOTION_BATCH_LIMIT: usize = 10;
pub const DEFAULT_FALLBACK_SERVICE_DURATION_MINUTES: i64 = 30;

/// Engine tunables. Everything has a sensible default, so a bare environment
/// still yields a working configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Upper bound on queue promotions attempted in one pass.
    pub promotion_batch_limit: usize,
    /// Duration assumed for bookings whose service can no longer be resolved.
    pub fallback_service_duration_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut promotion_batch_limit = numeric_env(
            "PROMOTION_BATCH_LIMIT",
            DEFAULT_PROMOTION_BATCH_LIMIT,
        );
        if promotion_batch_limit == 0 {
            warn!(
                "PROMOTION_BATCH_LIMIT of 0 would disable promotion, using default {}",
                DEFAULT_PROMOTION_BATCH_LIMIT
            );
            promotion_batch_limit = DEFAULT_PROMOTION_BATCH_LIMIT;
        }

        let mut fallback_service_duration_minutes = numeric_env(
            "FALLBACK_SERVICE_DURATION_MINUTES",
            DEFAULT_FALLBACK_SERVICE_DURATION_MINUTES,
        );
        if fallback_service_duration_minutes < 1 {
            warn!(
                "FALLBACK_SERVICE_DURATION_MINUTES must be at least 1, using default {}",
                DEFAULT_FALLBACK_SERVICE_DURATION_MINUTES
            );
            fallback_service_duration_minutes = DEFAULT_FALLBACK_SERVICE_DURATION_MINUTES;
        }

        Self {
            promotion_batch_limit,
            fallback_service_duration_minutes,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            promotion_batch_limit: DEFAULT_PROMOTION_BATCH_LIMIT,
            fallback_service_duration_minutes: DEFAULT_FALLBACK_SERVICE_DURATION_MINUTES,
        }
    }
}

fn numeric_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("{} is not numeric ({:?}), using default {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
