//! Client-level error types shared by the token manager, the dispatcher, and resources.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant propagates unchanged to the caller; nothing in the pipeline retries.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The client-credentials exchange failed.
	#[error("Authentication failed: {reason}")]
	Authentication {
		/// Server-provided description, OAuth error code, or HTTP status text.
		reason: String,
		/// Underlying transport or decoding failure, when one exists.
		#[source]
		source: Option<BoxError>,
	},
	/// The API answered a resource call with a non-2xx status.
	#[error("API Error {status}: {detail}")]
	Api {
		/// Numeric HTTP status.
		status: u16,
		/// Best-effort detail extracted from the response body.
		detail: String,
	},
	/// The call did not complete within the configured window and was aborted.
	#[error("Request timed out after {} ms.", .timeout.whole_milliseconds())]
	Timeout {
		/// Window that elapsed.
		timeout: Duration,
	},
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Network(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A successful response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// A payload was rejected before reaching the network.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// A certificate upload was refused for a recognizable reason.
	#[error(transparent)]
	Certificate(#[from] CertificateError),
}
impl Error {
	pub(crate) fn authentication(reason: impl Into<String>) -> Self {
		Self::Authentication { reason: reason.into(), source: None }
	}

	pub(crate) fn authentication_with_source(
		reason: impl Into<String>,
		source: impl 'static + Send + Sync + StdError,
	) -> Self {
		Self::Authentication { reason: reason.into(), source: Some(Box::new(source)) }
	}

	/// Returns the HTTP status carried by [`Error::Api`].
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Short class label used in span fields and metric labels.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Authentication { .. } => "authentication",
			Self::Api { .. } => "api",
			Self::Timeout { .. } => "timeout",
			Self::Network(_) => "network",
			Self::Config(_) => "config",
			Self::Decode(_) => "decode",
			Self::Validation(_) => "validation",
			Self::Certificate(_) => "certificate",
		}
	}

	/// Returns `true` when the call was aborted by the timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}

/// Configuration and validation failures raised while building or using the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// A configured or derived URL is invalid.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request header name or value is invalid.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// The timeout must be strictly positive.
	#[error("The request timeout must be positive.")]
	NonPositiveTimeout,
	/// An environment variable carried an unusable value.
	#[error("Environment variable `{name}` has an invalid value: {value}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value read from the environment.
		value: String,
	},
	/// A request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// A 2xx response body did not match the requested shape or type.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON or does not match the target type.
	#[error("Response body does not match the expected JSON shape at `{path}`.")]
	Json {
		/// JSON path where decoding failed.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Body is not valid UTF-8 text.
	#[error("Response body is not valid UTF-8 text.")]
	Text(#[source] std::string::FromUtf8Error),
	/// Caller asked for a different representation than the one that was decoded.
	#[error("Response body was decoded as {actual}, not {expected}.")]
	ShapeMismatch {
		/// Requested representation.
		expected: &'static str,
		/// Representation that was actually decoded.
		actual: &'static str,
	},
}
impl From<serde_path_to_error::Error<serde_json::Error>> for DecodeError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Json { path, source: e.into_inner() }
	}
}

/// Payload checks performed by resources before any request is sent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was empty.
	#[error("Field `{field}` cannot be empty.")]
	Empty {
		/// Field name.
		field: &'static str,
	},
	/// A CPF/CNPJ contained non-digit characters.
	#[error("CPF/CNPJ `{value}` must contain digits only.")]
	NonDigitCpfCnpj {
		/// Rejected value.
		value: String,
	},
	/// An identifier contained characters that cannot appear in a path segment.
	#[error("Identifier `{value}` may only contain letters, digits, `-`, and `_`.")]
	InvalidId {
		/// Rejected value.
		value: String,
	},
	/// A text field was shorter than allowed.
	#[error("Field `{field}` must have at least {min} characters.")]
	TooShort {
		/// Field name.
		field: &'static str,
		/// Minimum character count.
		min: usize,
	},
}

/// Certificate upload failures recognized from the API's error detail.
#[derive(Debug, ThisError)]
pub enum CertificateError {
	/// Certificate was issued for a different CPF/CNPJ than the empresa.
	#[error(
		"Certificate validation failed: The certificate's CNPJ does not match the company's CNPJ ({cpf_cnpj})."
	)]
	CnpjMismatch {
		/// Empresa the upload targeted.
		cpf_cnpj: String,
		/// Original API error.
		#[source]
		source: Box<Error>,
	},
	/// Certificate password was rejected.
	#[error("Certificate upload failed: Invalid password.")]
	InvalidPassword {
		/// Original API error.
		#[source]
		source: Box<Error>,
	},
	/// Certificate file is invalid or corrupted.
	#[error("Certificate upload failed: The certificate file is invalid or corrupted.")]
	InvalidFile {
		/// Original API error.
		#[source]
		source: Box<Error>,
	},
}
