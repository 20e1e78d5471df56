//! Migration configuration and its startup validation.
//!
//! Every value the migration endpoint needs is fixed for the whole run, so it is collected into
//! a single [`MigrationConfig`] and validated before any token is signed or any request is sent.

// std
use std::path::Path;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, oauth1::TimestampMode};

/// Migration endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.xero.com/oauth/migrate";

/// Fixed values shared by every migration request in a run.
#[derive(Clone, Debug)]
pub struct MigrationConfig {
	/// OAuth 1.0a consumer key sent as `oauth_consumer_key`.
	pub consumer_key: String,
	/// OAuth 2.0 scopes requested for the migrated credentials.
	pub scope: String,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: Secret,
	/// Migration endpoint; also the URI signed into the base string.
	pub endpoint: Url,
	/// Per-request timeout; `None` waits indefinitely.
	pub timeout: Option<Duration>,
	/// Timestamp policy for `oauth_timestamp`.
	pub timestamp: TimestampMode,
}
impl MigrationConfig {
	/// Starts a builder with the default endpoint, no timeout, and per-call timestamps.
	pub fn builder() -> MigrationConfigBuilder {
		MigrationConfigBuilder::default()
	}
}

/// Builder for [`MigrationConfig`] values.
#[derive(Debug, Default)]
pub struct MigrationConfigBuilder {
	consumer_key: Option<String>,
	scope: Option<String>,
	client_id: Option<String>,
	client_secret: Option<Secret>,
	endpoint: Option<Url>,
	timeout: Option<Duration>,
	timestamp: TimestampMode,
}
impl MigrationConfigBuilder {
	/// Sets the OAuth 1.0a consumer key.
	pub fn consumer_key(mut self, value: impl Into<String>) -> Self {
		self.consumer_key = Some(value.into());

		self
	}

	/// Sets the requested OAuth 2.0 scopes.
	pub fn scope(mut self, value: impl Into<String>) -> Self {
		self.scope = Some(value.into());

		self
	}

	/// Sets the OAuth 2.0 client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the OAuth 2.0 client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(value));

		self
	}

	/// Overrides the migration endpoint.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Sets an optional request timeout.
	pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the timestamp policy.
	pub fn timestamp(mut self, mode: TimestampMode) -> Self {
		self.timestamp = mode;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<MigrationConfig, ConfigError> {
		let consumer_key = require("consumer_key", self.consumer_key)?;
		let scope = require("scope", self.scope)?;
		let client_id = require("client_id", self.client_id)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.is_blank())
			.ok_or(ConfigError::MissingValue { field: "client_secret" })?;
		let endpoint = match self.endpoint {
			Some(url) => url,
			None => Url::parse(DEFAULT_ENDPOINT)
				.map_err(|_| ConfigError::UnsupportedEndpoint { url: DEFAULT_ENDPOINT.into() })?,
		};

		if !matches!(endpoint.scheme(), "https" | "http") {
			return Err(ConfigError::UnsupportedEndpoint { url: endpoint.to_string() });
		}
		if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(MigrationConfig {
			consumer_key,
			scope,
			client_id,
			client_secret,
			endpoint,
			timeout: self.timeout,
			timestamp: self.timestamp,
		})
	}
}

/// Rejects an empty path for a required file setting.
pub fn require_path(field: &'static str, path: &Path) -> Result<(), ConfigError> {
	if path.as_os_str().is_empty() {
		Err(ConfigError::MissingValue { field })
	} else {
		Ok(())
	}
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	value.filter(|v| !v.trim().is_empty()).ok_or(ConfigError::MissingValue { field })
}
