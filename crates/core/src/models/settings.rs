use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

use super::index::PRIMARY_INDEX;
use super::period::Period;
use crate::errors::CoreError;

pub const ENV_BASE_URL: &str = "DASHBOARD_BASE_URL";
pub const ENV_DEFAULT_INDEX: &str = "DASHBOARD_DEFAULT_INDEX";
pub const ENV_DEFAULT_PERIOD: &str = "DASHBOARD_DEFAULT_PERIOD";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "DASHBOARD_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_CHART_LABELS: &str = "DASHBOARD_MAX_CHART_LABELS";

/// Runtime configuration of the dashboard core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Origin serving the static JSON resources (no trailing slash needed).
    pub base_url: String,

    /// Index selected at startup.
    pub default_index: String,

    /// Chart period selected at startup.
    pub default_period: Period,

    /// HTTP client timeout, native targets only.
    pub request_timeout_secs: u64,

    /// Upper bound on non-empty x-axis labels.
    pub max_chart_labels: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4200".to_string(),
            default_index: PRIMARY_INDEX.to_string(),
            default_period: Period::OneMonth,
            request_timeout_secs: 30,
            max_chart_labels: 15,
        }
    }
}

impl DashboardSettings {
    /// Defaults overridden by `DASHBOARD_*` environment variables.
    ///
    /// A variable that does not parse is logged and its default kept.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: get_env_or_default(ENV_BASE_URL, defaults.base_url),
            default_index: get_env_or_default(ENV_DEFAULT_INDEX, defaults.default_index),
            default_period: get_env_or_default(ENV_DEFAULT_PERIOD, defaults.default_period),
            request_timeout_secs: get_env_or_default(
                ENV_REQUEST_TIMEOUT_SECS,
                defaults.request_timeout_secs,
            ),
            max_chart_labels: get_env_or_default(ENV_MAX_CHART_LABELS, defaults.max_chart_labels),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if self.default_index.trim().is_empty() {
            return Err(CoreError::Config("default_index must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.max_chart_labels == 0 {
            return Err(CoreError::Config(
                "max_chart_labels must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}
