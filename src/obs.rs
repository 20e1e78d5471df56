//! Optional observability helpers for migration runs.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth1_migrate.token` with the `stage` (call
//!   site) and `index` (position in the batch) fields, plus per-token outcome events.
//! - Enable `metrics` to increment the `oauth1_migrate_token_total` counter for every
//!   attempt/success/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
	/// A migration request is about to be signed and sent.
	Attempt,
	/// The endpoint returned JSON credentials.
	Success,
	/// Signing, transport, or parsing failed.
	Failure,
}
impl TokenOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOutcome::Attempt => "attempt",
			TokenOutcome::Success => "success",
			TokenOutcome::Failure => "failure",
		}
	}
}
impl Display for TokenOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
