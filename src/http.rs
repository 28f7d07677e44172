//! Authenticated request pipeline: per-call options, decoded response bodies, and the
//! [`Dispatcher`] that ties them to the token manager.
//!
//! Every call follows `Idle -> AwaitingToken -> Dispatched -> {Succeeded | Failed | TimedOut}`.
//! There are no retries; each terminal state is final for that call.

pub mod dispatch;
pub mod request;
pub mod response;

pub use dispatch::*;
pub use request::*;
pub use response::*;

// self
use crate::_prelude::*;

/// Returns the canonical reason phrase for `status`, or its numeric form when none exists.
pub(crate) fn status_text(status: StatusCode) -> String {
	status.canonical_reason().map(str::to_owned).unwrap_or_else(|| status.as_str().to_owned())
}
