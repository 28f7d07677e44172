//! Authenticated dispatch with a bounded wait and a uniform error contract.

// crates.io
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::{TokenManager, TokenSecret},
	error::{ConfigError, TransportError},
	http::{RequestOptions, ResponseBody, ResponseShape, api_error_detail},
	obs::{self, RequestKind},
};

/// Issues authenticated calls against the configured API base endpoint.
///
/// Each call asks the [`TokenManager`] for a bearer token first, then sends the request with a
/// per-call timeout that covers connecting through reading the full body. When the timeout
/// elapses the in-flight request is dropped and [`Error::Timeout`] is returned; the timer lives
/// inside the request future, so it is released on every exit path.
#[derive(Clone)]
pub struct Dispatcher {
	http_client: ReqwestClient,
	tokens: Arc<TokenManager>,
	timeout: Duration,
}
impl Dispatcher {
	/// Creates a dispatcher sharing `tokens` and `http_client`.
	pub fn new(http_client: ReqwestClient, tokens: Arc<TokenManager>, timeout: Duration) -> Self {
		Self { http_client, tokens, timeout }
	}

	/// Token manager feeding this dispatcher.
	pub fn token_manager(&self) -> &Arc<TokenManager> {
		&self.tokens
	}

	/// Per-call timeout.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Sends one authenticated call and decodes the body as `options.shape`.
	pub async fn send(&self, path: &str, options: RequestOptions) -> Result<ResponseBody> {
		obs::observe(RequestKind::Dispatch, "send", self.dispatch(path, options)).await
	}

	/// Sends one authenticated call and deserializes the JSON body into `T`.
	pub async fn send_json<T>(&self, path: &str, options: RequestOptions) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let body = self.send(path, options.with_shape(ResponseShape::Json)).await?;

		Ok(body.into_json()?)
	}

	/// Builds the absolute URL for `path` plus `query`.
	pub fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
		let base = self.tokens.credentials().base_url.as_str().trim_end_matches('/');
		let raw = if path.starts_with('/') {
			format!("{base}{path}")
		} else {
			format!("{base}/{path}")
		};
		let mut url = Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidUrl { url: raw.clone(), source })?;

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		Ok(url)
	}

	async fn dispatch(&self, path: &str, options: RequestOptions) -> Result<ResponseBody> {
		let token = self.tokens.ensure_valid_token().await?;
		let url = self.endpoint_url(path, &options.query)?;
		let headers = build_headers(&token, &options.headers)?;
		let mut request = self
			.http_client
			.request(options.method.clone(), url)
			.headers(headers)
			.timeout(self.timeout.unsigned_abs());

		if let Some(body) = options.body {
			request = request.body(body);
		}

		let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
		let status = response.status();

		obs::record_http_status(status);

		let bytes = response.bytes().await.map_err(|e| self.map_transport_error(e))?;

		if !status.is_success() {
			let detail = api_error_detail(status, &bytes);

			#[cfg(feature = "tracing")]
			tracing::warn!(status = status.as_u16(), %detail, "API call failed.");

			return Err(Error::Api { status: status.as_u16(), detail });
		}
		if status == StatusCode::NO_CONTENT {
			return Ok(ResponseBody::empty(options.shape));
		}

		Ok(ResponseBody::decode(options.shape, bytes.to_vec())?)
	}

	fn map_transport_error(&self, err: ReqwestError) -> Error {
		if err.is_timeout() {
			#[cfg(feature = "tracing")]
			tracing::warn!(timeout_ms = self.timeout.whole_milliseconds() as u64, "API call timed out.");

			return Error::Timeout { timeout: self.timeout };
		}
		if err.is_builder() {
			return ConfigError::http_client_build(err).into();
		}

		TransportError::from(err).into()
	}
}
impl Debug for Dispatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("tokens", &self.tokens)
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Layers the bearer token, the JSON content type, and then caller headers (caller wins).
fn build_headers(token: &TokenSecret, extra: &[(String, String)]) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, token.bearer_header()?);
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	for (name, value) in extra {
		let invalid = || ConfigError::InvalidHeader { name: name.clone() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		headers.insert(header_name, header_value);
	}

	Ok(headers)
}
