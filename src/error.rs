//! Migration error types shared across signing, transport, and batch processing.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, auth::TokenError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical migration error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal before any request is sent.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Signing key could not be loaded or the base string could not be signed.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Migration endpoint answered with a body that is not JSON.
	#[error(transparent)]
	ResponseParse(#[from] ResponseParseError),
	/// Migration endpoint answered with a non-success status.
	#[error(transparent)]
	Rejected(#[from] RejectedError),
	/// An input token cannot be sent to the endpoint.
	#[error(transparent)]
	InvalidToken(#[from] TokenError),
	/// Token input or migration output could not be read or written.
	#[error(transparent)]
	Storage(#[from] StorageError),
}
impl Error {
	/// Returns `true` when the failure is scoped to a single token and a batch may continue.
	///
	/// Configuration and storage failures affect every remaining token, so they never are.
	pub fn is_per_token(&self) -> bool {
		matches!(
			self,
			Self::Signing(_)
				| Self::Transport(_)
				| Self::ResponseParse(_)
				| Self::Rejected(_)
				| Self::InvalidToken(_)
		)
	}
}

/// Configuration and validation failures raised before migration starts.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required value was never supplied or is blank.
	#[error("Required configuration value `{field}` is not set.")]
	MissingValue {
		/// Name of the missing field.
		field: &'static str,
	},
	/// Migration endpoint does not use an HTTP(S) scheme.
	#[error("Migration endpoint must use HTTP or HTTPS: {url}.")]
	UnsupportedEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Two file settings point at the same path.
	#[error("`{first}` and `{second}` must not share the path {}.", .path.display())]
	ConflictingPaths {
		/// First setting.
		first: &'static str,
		/// Second setting.
		second: &'static str,
		/// Shared path.
		path: PathBuf,
	},
	/// Configured timeout is zero.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Migration request body could not be serialized.
	#[error("Migration request body could not be serialized.")]
	RequestBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// RSA-SHA1 signing failures.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// The private key file could not be read.
	#[error("Unable to read the private key at {}.", .path.display())]
	KeyRead {
		/// Path of the key file.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The PEM document is neither a PKCS#1 nor a PKCS#8 RSA private key.
	#[error("Private key is not a valid PKCS#1 or PKCS#8 RSA PEM document.")]
	KeyParse {
		/// PKCS#8 decoding failure (the last format attempted).
		#[source]
		source: rsa::pkcs8::Error,
	},
	/// The RSA primitive rejected the signing request.
	#[error("Unable to sign the signature base string.")]
	Sign {
		/// Underlying RSA failure.
		#[source]
		source: rsa::Error,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the migration endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the migration endpoint.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the migration endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured cause.
	#[error("HTTP client error occurred while calling the migration endpoint: {message}.")]
	Other {
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

/// Migration endpoint responded with a body that is not valid JSON.
#[derive(Debug, ThisError)]
#[error("Migration endpoint returned malformed JSON (HTTP {status}).")]
pub struct ResponseParseError {
	/// JSON parsing failure.
	#[source]
	pub source: serde_json::Error,
	/// HTTP status code of the response.
	pub status: u16,
}

/// Migration endpoint answered with a non-success HTTP status and a JSON body.
#[derive(Debug, ThisError)]
#[error("Migration endpoint rejected the token with HTTP {status}: {body}")]
pub struct RejectedError {
	/// HTTP status code of the response.
	pub status: u16,
	/// Provider error document, verbatim.
	pub body: serde_json::Value,
}

/// Input/output failures for token files.
#[derive(Debug, ThisError)]
pub enum StorageError {
	/// File could not be read, created, written, or renamed.
	#[error("Failed to {action} {}.", .path.display())]
	Io {
		/// Operation that failed.
		action: &'static str,
		/// File involved in the operation.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Token input is not a JSON array of `{"token": string}` objects.
	#[error("Token input {} is malformed.", .path.display())]
	MalformedInput {
		/// Input file path.
		path: PathBuf,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Output could not be serialized.
	#[error("Failed to serialize migration output.")]
	Serialization(#[source] serde_json::Error),
}
