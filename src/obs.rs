//! Optional observability helpers for the request pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every pipeline stage inside a span named `nuvem_fiscal.request` with
//!   the `kind` (authenticate/dispatch) and `stage` (call site) fields, and to emit cache and
//!   failure events.
//! - Enable `metrics` to increment the `nuvem_fiscal_request_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`, and
//!   `nuvem_fiscal_request_errors_total` labeled by `kind` + `error` class.
//!
//! With tracing on, the span also records `http.status` once a response arrives, plus the final
//! `outcome` and, on failure, the `error` class (`timeout`, `api`, `network`, ...).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Client-credentials exchange against the token endpoint.
	Authenticate,
	/// Authenticated resource call.
	Dispatch,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Authenticate => "authenticate",
			RequestKind::Dispatch => "dispatch",
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a pipeline stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the attempt, runs `fut` inside a span, then records its outcome.
pub(crate) async fn observe<T, Fut>(kind: RequestKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = RequestSpan::new(kind, stage);

	record_request_outcome(kind, RequestOutcome::Attempt);

	let result = span.instrument(fut).await;

	span.record_result(&result);

	match &result {
		Ok(_) => record_request_outcome(kind, RequestOutcome::Success),
		Err(e) => {
			record_request_outcome(kind, RequestOutcome::Failure);
			record_request_error(kind, e.kind());
		},
	}

	result
}
