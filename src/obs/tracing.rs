// self
#[cfg(feature = "tracing")] use crate::obs::RequestOutcome;
use crate::{_prelude::*, obs::RequestKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span wrapping one pipeline stage.
///
/// The span opens with `kind` and `stage`; `http.status`, `outcome`, and `error` are filled in as
/// the call progresses.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Opens the span for `kind` at `stage`.
	pub fn new(kind: RequestKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"nuvem_fiscal.request",
				kind = kind.as_str(),
				stage,
				http.status = tracing::field::Empty,
				outcome = tracing::field::Empty,
				error = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Stamps the terminal outcome; failures also carry the error class (`timeout`, `api`, ...).
	pub fn record_result<T>(&self, result: &Result<T>) {
		#[cfg(feature = "tracing")]
		match result {
			Ok(_) => {
				self.span.record("outcome", RequestOutcome::Success.as_str());
			},
			Err(e) => {
				self.span.record("outcome", RequestOutcome::Failure.as_str());
				self.span.record("error", e.kind());
			},
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = result;
		}
	}
}

/// Records the HTTP status on the span of the stage currently running.
pub fn record_http_status(status: StatusCode) {
	#[cfg(feature = "tracing")]
	{
		tracing::Span::current().record("http.status", status.as_u16());
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = status;
	}
}
