//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	path::PathBuf,
	pin::Pin,
	sync::Arc,
	time::Duration,
};
// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{StatusCode, header::AUTHORIZATION},
};
use parking_lot::Mutex;
// self
use oauth1_migrate::{
	client::{
		MigrationClient, ReqwestMigrationClient, ReqwestTransportErrorMapper, TransportErrorMapper,
	},
	config::MigrationConfig,
	error::{Error, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	oauth1::{SigningKey, TimestampMode},
	reqwest::Client as ReqwestClient,
	url::Url,
};

pub const CONSUMER_KEY: &str = "consumer-key";
pub const SCOPE: &str = "offline_access accounting.transactions";
pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const FIXED_TIMESTAMP: i64 = 1_700_000_000;

pub fn fixture_path(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

pub fn test_signing_key() -> Arc<SigningKey> {
	Arc::new(
		SigningKey::from_file(fixture_path("privatekey.pem"))
			.expect("Fixture private key should load."),
	)
}

pub fn test_config(endpoint: &str) -> MigrationConfig {
	MigrationConfig::builder()
		.consumer_key(CONSUMER_KEY)
		.scope(SCOPE)
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.endpoint(Url::parse(endpoint).expect("Test endpoint should parse."))
		.timestamp(TimestampMode::Fixed(FIXED_TIMESTAMP))
		.build()
		.expect("Test configuration should build.")
}

/// Builds a reqwest transport that accepts the self-signed certificates served by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	test_reqwest_http_client_with_timeout(None)
}

/// Same as [`test_reqwest_http_client`], with an optional per-request timeout.
pub fn test_reqwest_http_client_with_timeout(timeout: Option<Duration>) -> ReqwestHttpClient {
	let mut builder = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(oauth1_migrate::reqwest::redirect::Policy::none());

	if let Some(timeout) = timeout {
		builder = builder.timeout(timeout);
	}

	ReqwestHttpClient::with_client(
		builder.build().expect("Failed to build insecure Reqwest client for tests."),
	)
}

pub fn build_reqwest_test_client(endpoint: &str) -> ReqwestMigrationClient {
	MigrationClient::with_http_client(
		test_config(endpoint),
		test_signing_key(),
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	)
}

/// Reply the scripted transport gives to one request.
#[derive(Clone, Debug)]
pub enum Scripted {
	Respond { status: u16, body: String },
	Unreachable,
}
impl Scripted {
	pub fn json(body: &str) -> Self {
		Self::Respond { status: 200, body: body.to_owned() }
	}

	pub fn status_json(status: u16, body: &str) -> Self {
		Self::Respond { status, body: body.to_owned() }
	}

	pub fn html(status: u16) -> Self {
		Self::Respond { status, body: String::from("<html><body>Bad Gateway</body></html>") }
	}
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub authorization: String,
	pub body: Vec<u8>,
}
impl RecordedRequest {
	/// Value of one `key='value'` entry in the recorded `Authorization` header.
	pub fn oauth_param(&self, key: &str) -> Option<String> {
		let entries = self.authorization.strip_prefix("OAuth ")?;

		entries.split(',').find_map(|entry| {
			let (name, value) = entry.split_once('=')?;

			(name == key).then(|| value.trim_matches('\'').to_owned())
		})
	}
}

#[derive(Debug)]
pub struct ScriptedTransportError;
impl Display for ScriptedTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Connection refused.")
	}
}
impl StdError for ScriptedTransportError {}

/// In-process transport that records every request and answers from a script.
///
/// Requests beyond the end of the script fail as unreachable.
#[derive(Clone, Default)]
pub struct ScriptedHttpClient {
	script: Arc<Mutex<VecDeque<Scripted>>>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}
impl ScriptedHttpClient {
	pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
		Self {
			script: Arc::new(Mutex::new(script.into_iter().collect())),
			requests: Arc::default(),
		}
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	pub fn sent_tokens(&self) -> Vec<String> {
		self.requests()
			.iter()
			.map(|request| request.oauth_param("oauth_token").unwrap_or_default())
			.collect()
	}
}
impl TokenHttpClient for ScriptedHttpClient {
	type Handle = ScriptedHandle;
	type TransportError = ScriptedTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ScriptedHandle { client: self.clone(), slot }
	}
}

pub struct ScriptedHandle {
	client: ScriptedHttpClient,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<ScriptedTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();

			let authorization = request
				.headers()
				.get(AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.unwrap_or_default()
				.to_owned();

			let body = request.into_body();

			client.requests.lock().push(RecordedRequest { authorization, body });

			let next = client.script.lock().pop_front();

			match next {
				Some(Scripted::Respond { status, body }) => {
					slot.store(ResponseMetadata { status: Some(status) });

					let mut response = HttpResponse::new(body.into_bytes());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");

					Ok(response)
				},
				Some(Scripted::Unreachable) | None =>
					Err(HttpClientError::Reqwest(Box::new(ScriptedTransportError))),
			}
		})
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedMapper;
impl TransportErrorMapper<ScriptedTransportError> for ScriptedMapper {
	fn map_transport_error(
		&self,
		_metadata: Option<&ResponseMetadata>,
		error: HttpClientError<ScriptedTransportError>,
	) -> Error {
		TransportError::network(error).into()
	}
}

pub type ScriptedMigrationClient = MigrationClient<ScriptedHttpClient, ScriptedMapper>;

pub fn build_scripted_client(transport: &ScriptedHttpClient) -> ScriptedMigrationClient {
	MigrationClient::with_http_client(
		test_config("https://api.xero.com/oauth/migrate"),
		test_signing_key(),
		transport.clone(),
		ScriptedMapper,
	)
}
