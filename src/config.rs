//! # Pipeline Configuration
//!
//! Endpoints for the remote fallback tier, timing budgets, and raster
//! resolution. Every field has a default, so an empty JSON object (or no file
//! at all) is a valid configuration.
//!
//! ```
//! use estock_labels::config::LabelConfig;
//!
//! let config: LabelConfig = serde_json::from_str(r#"{"raster_scale": 6}"#).unwrap();
//! assert_eq!(config.raster_scale, 6);
//! assert_eq!(config.surface_poll_attempts, 10);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::LabelError;

/// Runtime configuration for rendering and composing labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// QR image service base (queried with `size` and `data`).
    pub qr_service_url: String,
    /// 1D barcode image service base (`<base>/<symbology>/<data>`).
    pub barcode_service_url: String,
    /// Timeout for remote image downloads, in milliseconds.
    pub http_timeout_ms: u64,
    /// How many times to poll for a drawing surface before giving up.
    pub surface_poll_attempts: u32,
    /// Delay between surface polls, in milliseconds.
    pub surface_poll_interval_ms: u64,
    /// Bitmap pixels per PDF point for embedded codes.
    pub raster_scale: u32,
    /// How long a print handoff file lives before removal, in milliseconds.
    pub print_cleanup_delay_ms: u64,
    /// User agent for remote requests.
    pub user_agent: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            qr_service_url: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            barcode_service_url: "https://barcodeapi.org/api".to_string(),
            http_timeout_ms: 5000,
            surface_poll_attempts: 10,
            surface_poll_interval_ms: 100,
            raster_scale: 4,
            print_cleanup_delay_ms: 1000,
            user_agent: concat!("estock-labels/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl LabelConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, LabelError> {
        let raw = std::fs::read_to_string(path)?;
        let config: LabelConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, LabelError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), LabelError> {
        if self.raster_scale == 0 || self.raster_scale > 16 {
            return Err(LabelError::Config(format!(
                "raster_scale must be between 1 and 16, got {}",
                self.raster_scale
            )));
        }
        for (name, url) in [
            ("qr_service_url", &self.qr_service_url),
            ("barcode_service_url", &self.barcode_service_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| LabelError::Config(format!("{} '{}': {}", name, url, e)))?;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn surface_poll_interval(&self) -> Duration {
        Duration::from_millis(self.surface_poll_interval_ms)
    }

    pub fn print_cleanup_delay(&self) -> Duration {
        Duration::from_millis(self.print_cleanup_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LabelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.surface_poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: LabelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LabelConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = LabelConfig {
            raster_scale: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LabelError::Config(_))));

        let config = LabelConfig {
            qr_service_url: "not a url".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LabelError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("estock-config-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"{"http_timeout_ms": 250}"#).unwrap();
        let config = LabelConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.http_timeout(), Duration::from_millis(250));
        assert_eq!(config.raster_scale, 4);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("estock-config-does-not-exist.json");
        assert!(matches!(LabelConfig::load(&path), Err(LabelError::Io(_))));
    }
}
