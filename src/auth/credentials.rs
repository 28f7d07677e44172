//! Immutable client credentials and the endpoints they are exchanged against.

// self
use crate::{_prelude::*, auth::TokenSecret, config::ClientConfig};

/// Client identifier/secret pair plus the token and API endpoints.
///
/// Built once from a [`ClientConfig`] and never mutated afterwards.
#[derive(Clone)]
pub struct Credentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Token endpoint for the client-credentials grant.
	pub auth_url: Url,
	/// Base endpoint for resource calls.
	pub base_url: Url,
}
impl Credentials {
	/// Creates credentials from raw parts.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		auth_url: Url,
		base_url: Url,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			auth_url,
			base_url,
		}
	}

	/// Returns `true` if either half of the pair is empty.
	pub fn is_incomplete(&self) -> bool {
		self.client_id.is_empty() || self.client_secret.is_empty()
	}
}
impl From<&ClientConfig> for Credentials {
	fn from(config: &ClientConfig) -> Self {
		Self {
			client_id: config.client_id.clone(),
			client_secret: config.client_secret.clone(),
			auth_url: config.auth_url.clone(),
			base_url: config.base_url.clone(),
		}
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("auth_url", &self.auth_url.as_str())
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}
