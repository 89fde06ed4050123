//! Application settings.
//!
//! A browser build has no process environment, so overrides are baked in at
//! compile time through `MOTIF_STUDIO_API_URL` and `MOTIF_STUDIO_THROTTLE_MS`.

use std::time::Duration;

use log::warn;
use thiserror::Error;

use crate::studio::throttle::ThrottleConfig;

/// Rejected override value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// `MOTIF_STUDIO_API_URL` is not an absolute URL.
	#[error("invalid API base URL {0:?}")]
	ApiUrl(String),
	/// `MOTIF_STUDIO_THROTTLE_MS` is not a number of milliseconds.
	#[error("invalid throttle interval {0:?}, expected milliseconds")]
	Throttle(String),
}

/// Settings shared by the shell and the editor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Base URL of the parse/execute/hosts service, without trailing slash.
	pub api_base_url: String,
	/// Minimum spacing between remote parse calls.
	pub throttle: Duration,
	/// Storage key of the saved-motif dictionary.
	pub store_key: String,
	/// Storage key of the last edited text.
	pub last_text_key: String,
	/// Result rows rendered in the interactive table.
	pub row_cap: usize,
	/// Base dwell time of notifications.
	pub notification_ttl: Duration,
	/// External volumetric viewer used for result deep links.
	pub viewer_base_url: String,
	/// Text shown when nothing else can be restored.
	pub example_motif: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:5000".into(),
			throttle: Duration::from_millis(1000),
			store_key: "savedMotifs".into(),
			last_text_key: "motifText".into(),
			row_cap: 100,
			notification_ttl: Duration::from_secs(4),
			viewer_base_url: "https://neuroglancer-demo.appspot.com/".into(),
			example_motif: "# My Example Motif\n\nNeuron_A -> Neuron_2".into(),
		}
	}
}

impl Config {
	/// Defaults with compile-time overrides applied. Invalid overrides are
	/// logged and ignored.
	pub fn from_build_env() -> Self {
		let api = option_env!("MOTIF_STUDIO_API_URL");
		let throttle = option_env!("MOTIF_STUDIO_THROTTLE_MS");
		Self::with_overrides(api, throttle).unwrap_or_else(|err| {
			warn!("ignoring build-time configuration: {err}");
			Self::default()
		})
	}

	/// Defaults with the given overrides applied.
	pub fn with_overrides(api_base_url: Option<&str>, throttle_ms: Option<&str>) -> Result<Self, ConfigError> {
		let mut config = Self::default();
		if let Some(raw) = api_base_url {
			let parsed = url::Url::parse(raw).map_err(|_| ConfigError::ApiUrl(raw.to_owned()))?;
			if parsed.cannot_be_a_base() {
				return Err(ConfigError::ApiUrl(raw.to_owned()));
			}
			config.api_base_url = raw.trim_end_matches('/').to_owned();
		}
		if let Some(raw) = throttle_ms {
			let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::Throttle(raw.to_owned()))?;
			config.throttle = Duration::from_millis(ms);
		}
		Ok(config)
	}

	/// Parse throttle tuning.
	pub fn throttle_config(&self) -> ThrottleConfig {
		ThrottleConfig {
			interval: self.throttle,
			leading: false,
		}
	}

	/// Absolute URL of a service endpoint such as `/parse`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
	}
}
