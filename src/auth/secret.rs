//! Redacting wrapper for client secrets and access tokens.

// crates.io
use reqwest::header::{AUTHORIZATION, HeaderValue};
// self
use crate::{_prelude::*, error::ConfigError};

/// Secret string that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` if the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Builds the `Authorization: Bearer ..` value, flagged sensitive so HTTP debug output hides it.
	pub fn bearer_header(&self) -> Result<HeaderValue, ConfigError> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0))
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.to_string() })?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
