//! Client-credentials exchange with a single cached token per client.
//!
//! [`TokenManager::ensure_valid_token`] serves the cached bearer token while it is unexpired and
//! only calls the token endpoint when the slot is empty or stale. By default concurrent callers
//! that all observe a stale slot each run their own exchange and the last response wins; enable
//! single-flight to make them share one exchange instead.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Credentials, TokenErrorResponse, TokenResponse, TokenSecret},
	http::status_text,
	obs::{self, RequestKind},
};

/// Owns the credentials and the one cache slot of a client.
///
/// This is the only type that writes the slot, and it always replaces the whole value.
pub struct TokenManager {
	credentials: Credentials,
	scope: String,
	http_client: ReqwestClient,
	cache: Mutex<Option<CachedToken>>,
	refresh_guard: Option<AsyncMutex<()>>,
}
impl TokenManager {
	/// Creates a manager with an empty cache.
	///
	/// Empty credentials are accepted; the exchange is still attempted and the token endpoint's
	/// rejection surfaces as [`Error::Authentication`].
	pub fn new(
		credentials: Credentials,
		scope: impl Into<String>,
		http_client: ReqwestClient,
		single_flight: bool,
	) -> Self {
		#[cfg(feature = "tracing")]
		if credentials.is_incomplete() {
			tracing::warn!(
				"Client ID or secret not provided; API calls requiring authentication will fail."
			);
		}

		Self {
			credentials,
			scope: scope.into(),
			http_client,
			cache: Mutex::new(None),
			refresh_guard: single_flight.then(|| AsyncMutex::new(())),
		}
	}

	/// Credentials this manager exchanges.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Scopes requested from the token endpoint.
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Returns `true` when refreshes are serialized.
	pub fn is_single_flight(&self) -> bool {
		self.refresh_guard.is_some()
	}

	/// Snapshot of the cache slot.
	pub fn cached_token(&self) -> Option<CachedToken> {
		self.cache.lock().clone()
	}

	/// Empties the cache slot so the next call authenticates again.
	pub fn invalidate(&self) {
		*self.cache.lock() = None;
	}

	/// Returns a bearer token that is valid now, authenticating when the cache is empty or stale.
	pub async fn ensure_valid_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.cached_access_token(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		match &self.refresh_guard {
			Some(guard) => {
				let _singleflight = guard.lock().await;

				// Another caller may have refreshed while this one waited.
				if let Some(token) = self.cached_access_token(OffsetDateTime::now_utc()) {
					return Ok(token);
				}

				self.authenticate().await
			},
			None => self.authenticate().await,
		}
	}

	fn cached_access_token(&self, now: OffsetDateTime) -> Option<TokenSecret> {
		let token = self
			.cache
			.lock()
			.as_ref()
			.filter(|cached| cached.is_valid_at(now))
			.map(|cached| cached.access_token.clone());

		#[cfg(feature = "tracing")]
		if token.is_some() {
			tracing::debug!("Serving bearer token from cache.");
		}

		token
	}

	async fn authenticate(&self) -> Result<TokenSecret> {
		obs::observe(RequestKind::Authenticate, "client_credentials", self.exchange()).await
	}

	async fn exchange(&self) -> Result<TokenSecret> {
		let form = [
			("grant_type", "client_credentials"),
			("client_id", self.credentials.client_id.as_str()),
			("client_secret", self.credentials.client_secret.expose()),
			("scope", self.scope.as_str()),
		];
		let response = self
			.http_client
			.post(self.credentials.auth_url.clone())
			.form(&form)
			.send()
			.await
			.map_err(|e| Error::authentication_with_source(e.to_string(), e))?;
		let status = response.status();

		obs::record_http_status(status);

		let body =
			response.bytes().await.map_err(|e| Error::authentication_with_source(e.to_string(), e))?;

		if !status.is_success() {
			return Err(Error::authentication(token_error_reason(status, &body)));
		}

		let issued_at = OffsetDateTime::now_utc();
		let payload: TokenResponse =
			serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(&body))
				.map_err(|e| {
					let reason = format!("token endpoint returned malformed JSON at `{}`", e.path());

					Error::authentication_with_source(reason, e.into_inner())
				})?;
		let cached = CachedToken::from_response(payload, issued_at).ok_or_else(|| {
			Error::authentication("token endpoint returned an out-of-range expires_in")
		})?;
		let token = cached.access_token.clone();

		#[cfg(feature = "tracing")]
		tracing::debug!(expires_at = %cached.expires_at, "Cached a fresh bearer token.");

		*self.cache.lock() = Some(cached);

		Ok(token)
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("credentials", &self.credentials)
			.field("scope", &self.scope)
			.field("cached", &self.cache.lock().is_some())
			.field("single_flight", &self.is_single_flight())
			.finish()
	}
}

/// Description, then error code, then status text; non-JSON bodies use the status text.
fn token_error_reason(status: StatusCode, body: &[u8]) -> String {
	serde_json::from_slice::<TokenErrorResponse>(body)
		.ok()
		.and_then(|error| error.reason().map(str::to_owned))
		.unwrap_or_else(|| status_text(status))
}
