//! Cached bearer token and the token endpoint's wire payloads.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Safety margin subtracted from the server-declared lifetime so a token never expires
/// mid-request.
pub const EXPIRY_MARGIN: Duration = Duration::seconds(60);

/// Successful token endpoint payload.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Opaque bearer token.
	pub access_token: String,
	/// Token type, usually `Bearer`.
	#[serde(default)]
	pub token_type: String,
	/// Lifetime in seconds.
	pub expires_in: i64,
	/// Granted scopes.
	#[serde(default)]
	pub scope: String,
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("scope", &self.scope)
			.finish()
	}
}

/// Error payload returned by the token endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenErrorResponse {
	/// OAuth error code.
	#[serde(default)]
	pub error: Option<String>,
	/// Human-readable description.
	#[serde(default)]
	pub error_description: Option<String>,
}
impl TokenErrorResponse {
	/// Picks the description, then the error code, skipping empty values.
	pub fn reason(&self) -> Option<&str> {
		[self.error_description.as_deref(), self.error.as_deref()]
			.into_iter()
			.flatten()
			.find(|value| !value.is_empty())
	}
}

/// Immutable bearer token held in the client's single cache slot.
///
/// Refreshes replace the whole value; fields are never patched in place.
#[derive(Clone)]
pub struct CachedToken {
	/// Bearer token sent in the `Authorization` header.
	pub access_token: TokenSecret,
	/// Token type reported by the provider.
	pub token_type: String,
	/// Scopes granted by the provider.
	pub scope: String,
	/// Instant the token response was received.
	pub issued_at: OffsetDateTime,
	/// Instant after which the token is no longer served from cache (lifetime minus
	/// [`EXPIRY_MARGIN`]).
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a cached token from a response received at `issued_at`.
	///
	/// Returns `None` when `expires_in` pushes the expiry outside the representable range.
	pub fn from_response(response: TokenResponse, issued_at: OffsetDateTime) -> Option<Self> {
		let expires_at = Duration::seconds(response.expires_in)
			.checked_sub(EXPIRY_MARGIN)
			.and_then(|lifetime| issued_at.checked_add(lifetime))?;

		Some(Self {
			access_token: TokenSecret::new(response.access_token),
			token_type: response.token_type,
			scope: response.scope,
			issued_at,
			expires_at,
		})
	}

	/// Returns `true` while `instant` is strictly before the expiry.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Returns `true` if the token can still be served at the current UTC instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Time left before the token stops being served from cache.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		if self.is_valid_at(instant) { self.expires_at - instant } else { Duration::ZERO }
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn response(expires_in: i64) -> TokenResponse {
		TokenResponse {
			access_token: "T1".into(),
			token_type: "Bearer".into(),
			expires_in,
			scope: "empresa nfce".into(),
		}
	}

	#[test]
	fn expiry_subtracts_margin() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::from_response(response(3600), issued)
			.expect("One hour lifetime should be representable.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:59 UTC));
		assert!(token.is_valid_at(macros::datetime!(2025-01-01 00:58:59 UTC)));
		assert!(!token.is_valid_at(macros::datetime!(2025-01-01 00:59 UTC)));
		assert_eq!(token.remaining_at(issued), Duration::minutes(59));
		assert_eq!(token.remaining_at(macros::datetime!(2025-01-01 02:00 UTC)), Duration::ZERO);
	}

	#[test]
	fn lifetime_shorter_than_margin_is_already_expired() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::from_response(response(30), issued)
			.expect("Short lifetime should still build.");

		assert!(!token.is_valid_at(issued));
	}

	#[test]
	fn unrepresentable_expiry_is_rejected() {
		assert!(CachedToken::from_response(response(i64::MAX), OffsetDateTime::now_utc()).is_none());
	}

	#[test]
	fn error_reason_prefers_description() {
		let both = TokenErrorResponse {
			error: Some("invalid_client".into()),
			error_description: Some("Client authentication failed".into()),
		};
		let code_only = TokenErrorResponse {
			error: Some("invalid_client".into()),
			error_description: Some(String::new()),
		};

		assert_eq!(both.reason(), Some("Client authentication failed"));
		assert_eq!(code_only.reason(), Some("invalid_client"));
		assert_eq!(TokenErrorResponse::default().reason(), None);
	}

	#[test]
	fn debug_output_redacts_token() {
		let token = CachedToken::from_response(response(3600), OffsetDateTime::now_utc())
			.expect("Token should build.");

		assert!(!format!("{token:?}").contains("T1"));
		assert!(!format!("{:?}", response(1)).contains("T1"));
	}
}
