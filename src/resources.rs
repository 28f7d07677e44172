//! Typed resource handles layered over the dispatcher.
//!
//! Each handle borrows the [`Client`](crate::Client), validates its payload before touching the
//! network, routes to a fixed endpoint, and decodes the response into serde models. Unknown
//! response fields are preserved in each model's `extra` map.

pub mod certificado;
pub mod empresa;
pub mod nfce;

pub use certificado::*;
pub use empresa::*;
pub use nfce::*;

// self
use crate::{_prelude::*, error::ValidationError, http::RequestOptions};

/// Paged list envelope returned by list endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Items in this page.
	pub data: Vec<T>,
	/// Total item count, when the API reports it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub count: Option<u64>,
}

/// Paging and search parameters for empresa listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListParams {
	/// Maximum number of items (`$top`).
	pub top: Option<u32>,
	/// Items to skip (`$skip`).
	pub skip: Option<u32>,
	/// Free-text search (`q`).
	pub q: Option<String>,
}
impl ListParams {
	/// Limits the page size.
	pub fn with_top(mut self, top: u32) -> Self {
		self.top = Some(top);

		self
	}

	/// Skips leading items.
	pub fn with_skip(mut self, skip: u32) -> Self {
		self.skip = Some(skip);

		self
	}

	/// Filters by free text.
	pub fn with_query(mut self, q: impl Into<String>) -> Self {
		self.q = Some(q.into());

		self
	}

	pub(crate) fn apply(&self, options: RequestOptions) -> RequestOptions {
		apply_paging(options, self.top, self.skip)
			.with_query_opt("q", self.q.as_deref().filter(|q| !q.is_empty()))
	}
}

/// Zero and absent paging values are both omitted from the query.
pub(crate) fn apply_paging(
	options: RequestOptions,
	top: Option<u32>,
	skip: Option<u32>,
) -> RequestOptions {
	options
		.with_query_opt("$top", top.filter(|value| *value > 0))
		.with_query_opt("$skip", skip.filter(|value| *value > 0))
}

/// CPF/CNPJ values travel unmasked: digits only.
pub(crate) fn validate_cpf_cnpj(value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::Empty { field: "cpf_cnpj" });
	}
	if !value.chars().all(|c| c.is_ascii_digit()) {
		return Err(ValidationError::NonDigitCpfCnpj { value: value.to_owned() });
	}

	Ok(())
}

/// Identifiers end up as path segments.
pub(crate) fn validate_id(value: &str) -> Result<(), ValidationError> {
	if value.is_empty() {
		return Err(ValidationError::Empty { field: "id" });
	}
	if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
		return Err(ValidationError::InvalidId { value: value.to_owned() });
	}

	Ok(())
}

pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() { Err(ValidationError::Empty { field }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn list_params_skip_zero_and_empty_values() {
		let options = ListParams::default().with_top(10).with_skip(0).with_query("").apply(
			RequestOptions::get(),
		);

		assert_eq!(options.query, vec![("$top".to_owned(), "10".to_owned())]);

		let options =
			ListParams::default().with_skip(20).with_query("acme").apply(RequestOptions::get());

		assert_eq!(
			options.query,
			vec![("$skip".to_owned(), "20".to_owned()), ("q".to_owned(), "acme".to_owned())]
		);
	}

	#[test]
	fn cpf_cnpj_must_be_digits() {
		assert!(validate_cpf_cnpj("12345678000190").is_ok());
		assert_eq!(validate_cpf_cnpj(""), Err(ValidationError::Empty { field: "cpf_cnpj" }));
		assert!(matches!(
			validate_cpf_cnpj("12.345.678/0001-90"),
			Err(ValidationError::NonDigitCpfCnpj { .. })
		));
	}

	#[test]
	fn ids_must_be_path_safe() {
		assert!(validate_id("nfc_31b4a1c2-77").is_ok());
		assert!(validate_id("").is_err());
		assert!(matches!(validate_id("../empresas"), Err(ValidationError::InvalidId { .. })));
		assert!(require("senha", "  ").is_err());
	}

	#[test]
	fn page_tolerates_missing_count() {
		let page: Page<JsonValue> =
			serde_json::from_str(r#"{"data":[{"id":"a"}]}"#).expect("Page should deserialize.");

		assert_eq!(page.data.len(), 1);
		assert_eq!(page.count, None);
	}
}
