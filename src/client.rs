//! Single-token migration: sign, post, and parse one OAuth 1.0a token exchange.

pub mod mapper;
pub mod request;

pub use mapper::*;
pub use request::*;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{
		Method, Request,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{MigratedToken, OAuth1Token},
	config::MigrationConfig,
	error::{ConfigError, RejectedError, ResponseParseError, SigningError},
	http::{ResponseMetadataSlot, TokenHttpClient},
	oauth1::{self, OAuthParams, SigningKey},
	obs,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Migration client specialized for the crate's default reqwest transport stack.
pub type ReqwestMigrationClient = MigrationClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

const HTTP_METHOD: &str = "POST";

/// A parsed endpoint answer together with its HTTP status.
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationResponse {
	/// HTTP status code of the response.
	pub status: u16,
	/// Response body, verbatim.
	pub document: MigratedToken,
}
impl MigrationResponse {
	/// Returns `true` for a 2xx status.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Keeps 2xx documents and turns any other status into [`Error::Rejected`].
	pub fn into_result(self) -> Result<MigratedToken> {
		if self.is_success() {
			Ok(self.document)
		} else {
			Err(RejectedError { status: self.status, body: self.document.into_json() }.into())
		}
	}
}

/// Performs one end-to-end migration per call against the configured endpoint.
///
/// The client owns the run-wide configuration, the shared signing key, and the transport. Each
/// [`migrate`](MigrationClient::migrate) call is a single linear request/response with no
/// retries.
#[derive(Clone)]
pub struct MigrationClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Values shared by every request in the run.
	pub config: MigrationConfig,
	/// RSA key loaded once and borrowed for every signature.
	pub signing_key: Arc<SigningKey>,
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
}
impl<C, M> MigrationClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: MigrationConfig,
		signing_key: Arc<SigningKey>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config,
			signing_key,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
		}
	}

	/// Builds the signed `Authorization` header value for `token`.
	pub fn authorization_header(&self, token: &OAuth1Token) -> Result<String, SigningError> {
		let params = OAuthParams::generate(
			token,
			&self.config.consumer_key,
			self.config.timestamp.resolve(),
		);

		self.sign_params(params)
	}

	/// Signs prepared parameters and serializes the header value.
	pub fn sign_params(&self, mut params: OAuthParams) -> Result<String, SigningError> {
		let base =
			oauth1::base_string(HTTP_METHOD, self.config.endpoint.as_str(), &params.to_param_string());
		let signature = self.signing_key.sign(&base)?;

		params.push_signature(oauth1::percent_encode(&signature));

		Ok(oauth1::authorization_header(&params))
	}

	/// Builds the complete HTTP request for `token`.
	pub fn build_request(&self, token: &OAuth1Token) -> Result<HttpRequest> {
		let authorization = self.authorization_header(token)?;
		let body = serde_json::to_vec(&MigrationRequestBody {
			scope: &self.config.scope,
			client_id: &self.config.client_id,
			client_secret: self.config.client_secret.expose(),
		})
		.map_err(|source| ConfigError::RequestBody { source })?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.config.endpoint.as_str())
			.header(CONTENT_TYPE, "application/json")
			.header(AUTHORIZATION, authorization)
			.body(body)
			.map_err(ConfigError::from)?;

		Ok(request)
	}

	/// Migrates a single token and returns the provider's JSON response verbatim, whatever the
	/// HTTP status.
	///
	/// Fails with [`Error::Signing`], [`Error::Transport`], or [`Error::ResponseParse`]; nothing
	/// is retried.
	pub async fn migrate(&self, token: &OAuth1Token) -> Result<MigratedToken> {
		Ok(self.exchange(token).await?.document)
	}

	/// Like [`migrate`](MigrationClient::migrate), but keeps the HTTP status so callers can tell
	/// issued credentials from provider rejections.
	pub async fn exchange(&self, token: &OAuth1Token) -> Result<MigrationResponse> {
		let request = self.build_request(token)?;
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(meta.take().as_ref(), err))?;
		let status = meta
			.take()
			.and_then(|value| value.status)
			.unwrap_or_else(|| response.status().as_u16());

		obs::trace_response_status(status);

		let document = parse_response(response.body(), status)?;

		Ok(MigrationResponse { status, document })
	}
}
#[cfg(feature = "reqwest")]
impl MigrationClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client with its own reqwest transport honoring the configured timeout.
	pub fn new(config: MigrationConfig, signing_key: Arc<SigningKey>) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout)?;

		Ok(Self::with_http_client(config, signing_key, http_client, ReqwestTransportErrorMapper))
	}
}
impl<C, M> Debug for MigrationClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MigrationClient")
			.field("endpoint", &self.config.endpoint.as_str())
			.field("client_id", &self.config.client_id)
			.finish()
	}
}

/// Parses the endpoint's body as JSON, whatever its shape.
pub(crate) fn parse_response(body: &[u8], status: u16) -> Result<MigratedToken> {
	let value: serde_json::Value =
		serde_json::from_slice(body).map_err(|source| ResponseParseError { source, status })?;

	Ok(MigratedToken::new(value))
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::HttpClientError;
	// self
	use super::*;
	use crate::{
		error::TransportError,
		http::{ResponseMetadata, TokenHttpClient},
		oauth1::TimestampMode,
	};

	const PKCS1_PEM: &str = include_str!("../tests/fixtures/privatekey.pem");

	#[derive(Debug)]
	struct Unreachable;
	impl Display for Unreachable {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("Endpoint unreachable.")
		}
	}
	impl StdError for Unreachable {}

	struct OfflineClient;
	impl TokenHttpClient for OfflineClient {
		type Handle = OfflineHandle;
		type TransportError = Unreachable;

		fn with_metadata(&self, _slot: ResponseMetadataSlot) -> Self::Handle {
			OfflineHandle
		}
	}

	struct OfflineHandle;
	impl<'c> AsyncHttpClient<'c> for OfflineHandle {
		type Error = HttpClientError<Unreachable>;
		type Future = Pin<
			Box<dyn Future<Output = Result<oauth2::HttpResponse, Self::Error>> + 'c + Send + Sync>,
		>;

		fn call(&'c self, _request: HttpRequest) -> Self::Future {
			Box::pin(async { Err(HttpClientError::Reqwest(Box::new(Unreachable))) })
		}
	}

	struct NetworkMapper;
	impl TransportErrorMapper<Unreachable> for NetworkMapper {
		fn map_transport_error(
			&self,
			_metadata: Option<&ResponseMetadata>,
			error: HttpClientError<Unreachable>,
		) -> Error {
			TransportError::network(error).into()
		}
	}

	fn client() -> MigrationClient<OfflineClient, NetworkMapper> {
		let config = MigrationConfig::builder()
			.consumer_key("ck")
			.scope("offline_access")
			.client_id("cid")
			.client_secret("secret")
			.timestamp(TimestampMode::Fixed(1_700_000_000))
			.build()
			.expect("Test configuration should build.");
		let key = SigningKey::from_pem(PKCS1_PEM).expect("Fixture key should parse.");

		MigrationClient::with_http_client(config, Arc::new(key), OfflineClient, NetworkMapper)
	}

	fn token() -> OAuth1Token {
		OAuth1Token::new("token-a").expect("Token fixture should be valid.")
	}

	#[test]
	fn request_carries_headers_and_body() {
		let request = client().build_request(&token()).expect("Request should build.");
		let headers = request.headers();
		let authorization = headers
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.expect("Authorization header should be present.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri(), "https://api.xero.com/oauth/migrate");
		assert_eq!(
			headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/json")
		);
		assert!(authorization.starts_with("OAuth oauth_consumer_key='ck',oauth_nonce='"));
		assert!(authorization.contains(",oauth_timestamp='1700000000',oauth_token='token-a',"));
		assert_eq!(
			request.body().as_slice(),
			br#"{"scope":"offline_access","client_id":"cid","client_secret":"secret"}"#
		);
	}

	#[test]
	fn signatures_in_the_header_are_percent_encoded() {
		let header = client().authorization_header(&token()).expect("Header should build.");
		let signature = header
			.rsplit_once("oauth_signature='")
			.map(|(_, rest)| rest.trim_end_matches('\''))
			.expect("Signature entry should be last.");

		assert!(!signature.contains(['+', '/', '=']));
	}

	#[test]
	fn sign_params_is_deterministic_for_fixed_inputs() {
		let client = client();
		let params = OAuthParams::with_nonce(&token(), "ck", "nonce", "1700000000");

		assert_eq!(
			client.sign_params(params.clone()).expect("Signing should succeed."),
			client.sign_params(params).expect("Signing should succeed."),
		);
	}

	#[tokio::test]
	async fn transport_failures_propagate() {
		let err = client().migrate(&token()).await.expect_err("Offline transport must fail.");

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	}

	#[test]
	fn non_json_bodies_are_parse_errors() {
		let err = parse_response(b"<html>bad gateway</html>", 502)
			.expect_err("HTML must not parse.");

		assert!(matches!(err, Error::ResponseParse(ResponseParseError { status: 502, .. })));

		let token = parse_response(br#"{"access_token":"a"}"#, 200)
			.expect("JSON bodies should parse.");

		assert_eq!(token.as_json()["access_token"], "a");
	}

	#[test]
	fn non_success_statuses_become_rejections() {
		let issued = MigrationResponse {
			status: 200,
			document: parse_response(br#"{"access_token":"a"}"#, 200)
				.expect("JSON bodies should parse."),
		};
		let rejected = MigrationResponse {
			status: 401,
			document: parse_response(br#"{"Title":"Unauthorized"}"#, 401)
				.expect("JSON bodies should parse."),
		};

		assert!(issued.into_result().is_ok());

		let err = rejected.into_result().expect_err("HTTP 401 must be a rejection.");

		assert!(matches!(err, Error::Rejected(RejectedError { status: 401, .. })));
		assert!(err.is_per_token());
	}
}
