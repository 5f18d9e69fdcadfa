use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// How the rolling windows walk the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmaGrouping {
    /// One window across the whole file in row order. This matches the
    /// original dashboard, which lets adjacent symbols bleed into each
    /// other's averages. The loader warns when this runs over more than
    /// one symbol.
    Global,
    /// Windows restart for each distinct stock symbol.
    PerStock,
}

impl SmaGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmaGrouping::Global => "global",
            SmaGrouping::PerStock => "per-stock",
        }
    }
}

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigYaml {
    pub data_file: String,
    pub port: u16,
    pub environment: String,
    pub sma_grouping: Option<SmaGrouping>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_file: String,
    pub port: u16,
    pub environment: String,
    pub sma_grouping: SmaGrouping,
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> Self {
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    // Load configuration from YAML file
    pub fn from_yaml(file_path: &str) -> Self {
        let yaml_content = fs::read_to_string(file_path)
            .unwrap_or_else(|e| panic!("Failed to read config file {}: {}", file_path, e));

        let yaml_config: ConfigYaml = serde_yaml::from_str(&yaml_content)
            .unwrap_or_else(|e| panic!("Failed to parse YAML config: {}", e));

        Self {
            data_file: yaml_config.data_file,
            port: yaml_config.port,
            environment: yaml_config.environment,
            sma_grouping: yaml_config.sma_grouping.unwrap_or(SmaGrouping::Global),
        }
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // Load .env file if present

        let data_file = env::var("DATA_FILE")
            .unwrap_or_else(|_| "Stocks_2025.csv".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8888); // Default to 8888

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string());

        let sma_grouping = match env::var("SMA_GROUPING").as_deref() {
            Ok("per-stock") => SmaGrouping::PerStock,
            _ => SmaGrouping::Global,
        };

        Self {
            data_file,
            port,
            environment,
            sma_grouping,
        }
    }
}
