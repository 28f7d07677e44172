//! Client configuration: credentials, endpoints, timeout, and environment tag.
//!
//! Values come either from the [`ClientConfig`] builder or from `NUVEM_FISCAL_*` environment
//! variables via [`ClientConfig::from_env`]. Missing credentials are tolerated here; the token
//! exchange fails later with the provider's own message.

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Production API base endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.nuvemfiscal.com.br";
/// OAuth 2.0 token endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://auth.nuvemfiscal.com.br/oauth/token";
/// Scopes requested by the client-credentials grant.
pub const DEFAULT_SCOPE: &str = "empresa nfce";
/// Per-call timeout applied to resource requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::milliseconds(30_000);

const ENV_CLIENT_ID: &str = "NUVEM_FISCAL_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "NUVEM_FISCAL_CLIENT_SECRET";
const ENV_BASE_URL: &str = "NUVEM_FISCAL_BASE_URL";
const ENV_AUTH_URL: &str = "NUVEM_FISCAL_AUTH_URL";
const ENV_TIMEOUT_MS: &str = "NUVEM_FISCAL_TIMEOUT_MS";
const ENV_ENVIRONMENT: &str = "NUVEM_FISCAL_ENVIRONMENT";

/// Upstream deployment targeted by the client.
///
/// The tag travels with the config for callers and payloads; the request pipeline itself does
/// not branch on it. Pick the deployment through [`ClientConfig::with_base_url`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
	/// Homologation deployment (`homologacao`).
	#[serde(rename = "homologacao")]
	Sandbox,
	/// Production deployment (`producao`).
	#[default]
	#[serde(rename = "producao")]
	Production,
}
impl Environment {
	/// Returns the wire label used by the API.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Sandbox => "homologacao",
			Environment::Production => "producao",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"homologacao" | "sandbox" => Ok(Self::Sandbox),
			"producao" | "production" => Ok(Self::Production),
			_ => Err(ConfigError::InvalidEnv { name: ENV_ENVIRONMENT, value: s.to_owned() }),
		}
	}
}

/// Settings consumed by [`Client::new`](crate::Client::new).
#[derive(Clone)]
pub struct ClientConfig {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Base endpoint every resource path is appended to.
	pub base_url: Url,
	/// Token endpoint used by the client-credentials grant.
	pub auth_url: Url,
	/// Space-delimited scopes requested from the token endpoint.
	pub scope: String,
	/// Per-call timeout for resource requests.
	pub timeout: Duration,
	/// Deployment tag.
	pub environment: Option<Environment>,
	/// Serializes concurrent token refreshes when enabled.
	pub single_flight: bool,
	/// Caller-supplied HTTP client; a default one is built when absent.
	pub http_client: Option<ReqwestClient>,
}
impl ClientConfig {
	/// Creates a config with production endpoints and the default timeout.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			base_url: default_url(DEFAULT_BASE_URL),
			auth_url: default_url(DEFAULT_AUTH_URL),
			scope: DEFAULT_SCOPE.into(),
			timeout: DEFAULT_TIMEOUT,
			environment: None,
			single_flight: false,
			http_client: None,
		}
	}

	/// Reads the config from `NUVEM_FISCAL_*` environment variables.
	///
	/// Absent credentials become empty strings. Malformed URLs, timeouts, or environment tags are
	/// rejected.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let mut config = Self::new(
			read(ENV_CLIENT_ID).unwrap_or_default(),
			read(ENV_CLIENT_SECRET).unwrap_or_default(),
		);

		if let Some(raw) = read(ENV_BASE_URL) {
			config.base_url = parse_url(&raw)?;
		}
		if let Some(raw) = read(ENV_AUTH_URL) {
			config.auth_url = parse_url(&raw)?;
		}
		if let Some(raw) = read(ENV_TIMEOUT_MS) {
			let millis = raw
				.trim()
				.parse::<i64>()
				.ok()
				.filter(|value| *value > 0)
				.ok_or(ConfigError::InvalidEnv { name: ENV_TIMEOUT_MS, value: raw.clone() })?;

			config.timeout = Duration::milliseconds(millis);
		}
		if let Some(raw) = read(ENV_ENVIRONMENT) {
			config.environment = Some(raw.parse()?);
		}

		Ok(config)
	}

	/// Overrides the API base endpoint.
	pub fn with_base_url(mut self, url: Url) -> Self {
		self.base_url = url;

		self
	}

	/// Overrides the token endpoint.
	pub fn with_auth_url(mut self, url: Url) -> Self {
		self.auth_url = url;

		self
	}

	/// Overrides the requested scopes.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Overrides the per-call timeout (defaults to 30 seconds).
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Tags the config with a deployment.
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);

		self
	}

	/// Enables or disables single-flight token refreshes.
	///
	/// Disabled by default: concurrent callers that all find the cache empty each run their own
	/// exchange and the last response wins.
	pub fn with_single_flight(mut self, enabled: bool) -> Self {
		self.single_flight = enabled;

		self
	}

	/// Reuses an existing reqwest client for both the token exchange and resource calls.
	pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Returns `true` when both credentials are present.
	pub fn has_credentials(&self) -> bool {
		!self.client_id.is_empty() && !self.client_secret.expose().is_empty()
	}

	pub(crate) fn validate(&self) -> Result<(), ConfigError> {
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(())
	}
}
impl Debug for ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientConfig")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("base_url", &self.base_url.as_str())
			.field("auth_url", &self.auth_url.as_str())
			.field("scope", &self.scope)
			.field("timeout", &self.timeout)
			.field("environment", &self.environment)
			.field("single_flight", &self.single_flight)
			.finish()
	}
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { url: raw.to_owned(), source })
}

fn default_url(raw: &'static str) -> Url {
	// Both defaults are compile-time constants that always parse.
	Url::parse(raw).unwrap_or_else(|_| unreachable!("built-in endpoint `{raw}` must parse"))
}
