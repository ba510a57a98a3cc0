use std::{path::PathBuf, str::FromStr};

use crate::{mindmap::LayoutConfig, session::ResponsePolicy};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub state_dir: PathBuf,
    pub layout: LayoutConfig,
    pub response_policy: ResponsePolicy,
}

pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("tldw")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            state_dir: default_state_dir(),
            layout: LayoutConfig::default(),
            response_policy: ResponsePolicy::default(),
        }
    }
}

fn parsed<T: FromStr>(name: &str, raw: Option<String>, fallback: T) -> T {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(setting = name, value = %raw, "Ignoring malformed setting");
            fallback
        }),
        None => fallback,
    }
}

impl Config {
    /// Read `TLDW_*` environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            backend_url: non_empty("TLDW_BACKEND_URL").unwrap_or(defaults.backend_url),
            state_dir: non_empty("TLDW_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_dir),
            layout: LayoutConfig {
                gap_x: parsed("TLDW_GAP_X", non_empty("TLDW_GAP_X"), defaults.layout.gap_x),
                gap_y: parsed("TLDW_GAP_Y", non_empty("TLDW_GAP_Y"), defaults.layout.gap_y),
            },
            response_policy: parsed(
                "TLDW_RESPONSE_POLICY",
                non_empty("TLDW_RESPONSE_POLICY"),
                defaults.response_policy,
            ),
        }
    }
}
