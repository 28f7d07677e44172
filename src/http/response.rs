//! Decoded response bodies and API error detail extraction.

// self
use crate::{
	_prelude::*,
	error::DecodeError,
	http::{ResponseShape, status_text},
};

/// Successful response body decoded according to the requested [`ResponseShape`].
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
	/// Parsed JSON document.
	Json(JsonValue),
	/// UTF-8 text.
	Text(String),
	/// Raw bytes.
	Binary(Vec<u8>),
}
impl ResponseBody {
	/// Empty value of the given shape: `{}`, `""`, or no bytes.
	pub fn empty(shape: ResponseShape) -> Self {
		match shape {
			ResponseShape::Json => Self::Json(JsonValue::Object(JsonMap::new())),
			ResponseShape::Text => Self::Text(String::new()),
			ResponseShape::Binary => Self::Binary(Vec::new()),
		}
	}

	/// Decodes raw bytes as `shape`. An empty JSON body decodes to `{}`.
	pub fn decode(shape: ResponseShape, bytes: Vec<u8>) -> Result<Self, DecodeError> {
		match shape {
			ResponseShape::Json if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Self::empty(shape)),
			ResponseShape::Json => {
				let mut de = serde_json::Deserializer::from_slice(&bytes);
				let value: JsonValue = serde_path_to_error::deserialize(&mut de)?;

				de.end().map_err(|source| DecodeError::Json { path: ".".into(), source })?;

				Ok(Self::Json(value))
			},
			ResponseShape::Text => String::from_utf8(bytes).map(Self::Text).map_err(DecodeError::Text),
			ResponseShape::Binary => Ok(Self::Binary(bytes)),
		}
	}

	/// Shape this body was decoded as.
	pub fn shape(&self) -> ResponseShape {
		match self {
			Self::Json(_) => ResponseShape::Json,
			Self::Text(_) => ResponseShape::Text,
			Self::Binary(_) => ResponseShape::Binary,
		}
	}

	/// Returns `true` for `{}`, `""`, or an empty byte buffer.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Json(JsonValue::Object(map)) => map.is_empty(),
			Self::Json(_) => false,
			Self::Text(text) => text.is_empty(),
			Self::Binary(bytes) => bytes.is_empty(),
		}
	}

	/// Deserializes a JSON body into `T`.
	pub fn into_json<T>(self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		match self {
			Self::Json(value) => Ok(serde_path_to_error::deserialize(value)?),
			other => Err(other.mismatch(ResponseShape::Json)),
		}
	}

	/// Returns a text body.
	pub fn into_text(self) -> Result<String, DecodeError> {
		match self {
			Self::Text(text) => Ok(text),
			other => Err(other.mismatch(ResponseShape::Text)),
		}
	}

	/// Returns a binary body.
	pub fn into_bytes(self) -> Result<Vec<u8>, DecodeError> {
		match self {
			Self::Binary(bytes) => Ok(bytes),
			other => Err(other.mismatch(ResponseShape::Binary)),
		}
	}

	fn mismatch(&self, expected: ResponseShape) -> DecodeError {
		DecodeError::ShapeMismatch { expected: expected.as_str(), actual: self.shape().as_str() }
	}
}

/// Derives the detail string carried by [`Error::Api`].
///
/// A JSON body yields its `message`, else its `error_description`, else the whole document
/// re-serialized. Anything that is not JSON falls back to the status text.
pub fn api_error_detail(status: StatusCode, body: &[u8]) -> String {
	match serde_json::from_slice::<JsonValue>(body) {
		Ok(JsonValue::Null) | Err(_) => status_text(status),
		Ok(value) => field_text(&value, "message")
			.or_else(|| field_text(&value, "error_description"))
			.unwrap_or_else(|| value.to_string()),
	}
}

fn field_text(value: &JsonValue, key: &str) -> Option<String> {
	match value.get(key)? {
		JsonValue::Null | JsonValue::Bool(false) => None,
		JsonValue::String(text) if text.is_empty() => None,
		JsonValue::String(text) => Some(text.clone()),
		other => Some(other.to_string()),
	}
}
