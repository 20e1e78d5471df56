//! Fixed OAuth 1.0a protocol parameters and their canonical string form.

// crates.io
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::OAuth1Token,
	oauth1::{OAUTH_VERSION, SIGNATURE_METHOD, TENANT_TYPE},
};

/// Order in which the provider expects the parameter string.
///
/// The provider compares against this exact sequence; it is not derived by sorting.
pub const PARAM_ORDER: [&str; 7] = [
	"oauth_consumer_key",
	"oauth_nonce",
	"oauth_signature_method",
	"oauth_timestamp",
	"oauth_token",
	"oauth_version",
	"tenantType",
];

/// Key under which the encoded signature is appended after signing.
pub const SIGNATURE_KEY: &str = "oauth_signature";

/// How `oauth_timestamp` is produced for each request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampMode {
	/// Read the clock for every request.
	#[default]
	PerCall,
	/// Reuse one timestamp (seconds since the Unix epoch) for every request in the run.
	Fixed(i64),
}
impl TimestampMode {
	/// Captures the current instant so the whole run shares it.
	pub fn fixed_now() -> Self {
		Self::Fixed(OffsetDateTime::now_utc().unix_timestamp())
	}

	/// Returns the timestamp to sign with, as a decimal string.
	pub fn resolve(self) -> String {
		match self {
			Self::PerCall => OffsetDateTime::now_utc().unix_timestamp().to_string(),
			Self::Fixed(secs) => secs.to_string(),
		}
	}
}

/// Ordered OAuth parameters for one migration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthParams {
	entries: Vec<(&'static str, String)>,
}
impl OAuthParams {
	/// Builds the seven fixed parameters with a fresh random nonce.
	pub fn generate(token: &OAuth1Token, consumer_key: &str, timestamp: impl Into<String>) -> Self {
		Self::with_nonce(token, consumer_key, Uuid::new_v4().to_string(), timestamp)
	}

	/// Builds the seven fixed parameters with a caller-supplied nonce.
	pub fn with_nonce(
		token: &OAuth1Token,
		consumer_key: &str,
		nonce: impl Into<String>,
		timestamp: impl Into<String>,
	) -> Self {
		let entries = vec![
			("oauth_consumer_key", consumer_key.to_owned()),
			("oauth_nonce", nonce.into()),
			("oauth_signature_method", SIGNATURE_METHOD.to_owned()),
			("oauth_timestamp", timestamp.into()),
			("oauth_token", token.to_string()),
			("oauth_version", OAUTH_VERSION.to_owned()),
			("tenantType", TENANT_TYPE.to_owned()),
		];

		Self { entries }
	}

	/// Looks up a parameter by key.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
	}

	/// Iterates over parameters in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
		self.entries.iter().map(|(k, v)| (*k, v.as_str()))
	}

	/// Number of parameters currently held.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when no parameters are held.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Renders `key=value` pairs in [`PARAM_ORDER`], joined by `&`, without encoding values.
	pub fn to_param_string(&self) -> String {
		PARAM_ORDER
			.iter()
			.map(|key| format!("{key}={}", self.get(key).unwrap_or_default()))
			.collect::<Vec<_>>()
			.join("&")
	}

	/// Appends the already percent-encoded signature as the final parameter.
	pub fn push_signature(&mut self, encoded_signature: impl Into<String>) {
		self.entries.retain(|(k, _)| *k != SIGNATURE_KEY);
		self.entries.push((SIGNATURE_KEY, encoded_signature.into()));
	}
}
