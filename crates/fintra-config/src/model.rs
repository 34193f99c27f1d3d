use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stores deployment-configurable preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_summary_window_months")]
    pub summary_window_months: u32,
    #[serde(default = "Config::default_insights_enabled")]
    pub insights_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for ledger data files. Defaults to a
    /// `fintra` folder in the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            summary_window_months: Self::default_summary_window_months(),
            insights_enabled: Self::default_insights_enabled(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_summary_window_months() -> u32 {
        3
    }

    pub fn default_insights_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("fintra")
    }
}
