// self
use crate::obs::{RequestKind, RequestOutcome};

/// Increments `nuvem_fiscal_request_total{kind, outcome}` (when enabled).
pub fn record_request_outcome(kind: RequestKind, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"nuvem_fiscal_request_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Increments `nuvem_fiscal_request_errors_total{kind, error}` so timeouts, API rejections, and
/// auth failures can be told apart (when enabled).
pub fn record_request_error(kind: RequestKind, error: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"nuvem_fiscal_request_errors_total",
			"kind" => kind.as_str(),
			"error" => error
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, error);
	}
}
