//! Per-call request options.

// self
use crate::{_prelude::*, error::ConfigError};

/// Representation the caller expects the response body in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseShape {
	/// JSON document.
	#[default]
	Json,
	/// UTF-8 text (e.g. XML).
	Text,
	/// Raw bytes (e.g. PDF).
	Binary,
}
impl ResponseShape {
	/// Returns a stable label for messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResponseShape::Json => "json",
			ResponseShape::Text => "text",
			ResponseShape::Binary => "binary",
		}
	}
}

/// Transient description of one outbound call.
///
/// Defaults to `GET` with no body and a JSON response.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// HTTP method.
	pub method: Method,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
	/// Extra headers layered over the defaults; later entries win.
	pub headers: Vec<(String, String)>,
	/// Query pairs appended to the URL in order.
	pub query: Vec<(String, String)>,
	/// Expected response representation.
	pub shape: ResponseShape,
}
impl RequestOptions {
	/// Creates options for the provided method.
	pub fn new(method: Method) -> Self {
		Self { method, ..Default::default() }
	}

	/// `GET` request.
	pub fn get() -> Self {
		Self::new(Method::GET)
	}

	/// `POST` request.
	pub fn post() -> Self {
		Self::new(Method::POST)
	}

	/// `PUT` request.
	pub fn put() -> Self {
		Self::new(Method::PUT)
	}

	/// `DELETE` request.
	pub fn delete() -> Self {
		Self::new(Method::DELETE)
	}

	/// Sets a raw body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes `payload` as the JSON body.
	pub fn with_json<T>(self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(payload).map_err(ConfigError::BodySerialize)?;

		Ok(self.with_body(body))
	}

	/// Adds a header; it replaces any default header with the same name.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Appends a query pair.
	pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query pair when `value` is present.
	pub fn with_query_opt<V>(self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: ToString,
	{
		match value {
			Some(value) => self.with_query(key, value),
			None => self,
		}
	}

	/// Declares the expected response representation.
	pub fn with_shape(mut self, shape: ResponseShape) -> Self {
		self.shape = shape;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_to_json_get() {
		let options = RequestOptions::default();

		assert_eq!(options.method, Method::GET);
		assert_eq!(options.shape, ResponseShape::Json);
		assert!(options.body.is_none());
	}

	#[test]
	fn builders_accumulate_state() {
		let options = RequestOptions::post()
			.with_json(&serde_json::json!({ "justificativa": "Cliente desistiu da compra" }))
			.expect("JSON payload should serialize.")
			.with_header("X-Trace", "abc")
			.with_query("$top", 5)
			.with_query_opt("q", None::<&str>)
			.with_shape(ResponseShape::Text);

		assert_eq!(options.method, Method::POST);
		assert_eq!(
			options.body.as_deref(),
			Some(br#"{"justificativa":"Cliente desistiu da compra"}"#.as_slice())
		);
		assert_eq!(options.headers, vec![("X-Trace".to_owned(), "abc".to_owned())]);
		assert_eq!(options.query, vec![("$top".to_owned(), "5".to_owned())]);
		assert_eq!(options.shape, ResponseShape::Text);
	}
}
