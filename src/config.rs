// src/config.rs
use once_cell::sync::Lazy;
use std::env;

/// Days after delivery before a fully-terminal delivered order auto-closes.
/// The business value is inferred from historical billing runs and has not
/// been confirmed by the domain owner, so it stays overridable via the
/// `AUTO_CLOSE_GRACE_DAYS` environment variable.
pub const DEFAULT_AUTO_CLOSE_GRACE_DAYS: i64 = 30;

/// Default gap between the end of one DOS period and the start of the next.
pub const DEFAULT_BILLING_GAP_DAYS: i64 = 1;

#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub auto_close_grace_days: i64,
    pub billing_gap_days: i64,
}

impl BillingConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        BillingConfig {
            auto_close_grace_days: env::var("AUTO_CLOSE_GRACE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUTO_CLOSE_GRACE_DAYS),
            billing_gap_days: env::var("BILLING_GAP_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BILLING_GAP_DAYS),
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        BillingConfig {
            auto_close_grace_days: DEFAULT_AUTO_CLOSE_GRACE_DAYS,
            billing_gap_days: DEFAULT_BILLING_GAP_DAYS,
        }
    }
}

static CONFIG: Lazy<BillingConfig> = Lazy::new(BillingConfig::from_env);

/// Process-wide configuration, loaded once from the environment.
pub fn get() -> &'static BillingConfig {
    &CONFIG
}
