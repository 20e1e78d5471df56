// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedToken<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedToken<F> = F;

/// A span builder used around each token migration.
#[derive(Clone, Debug)]
pub struct TokenSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl TokenSpan {
	/// Creates a new span tagged with the call-site stage and the token's batch index.
	pub fn new(stage: &'static str, index: usize) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth1_migrate.token", stage, index);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, index);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedToken<Fut>
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
}

/// Emits a debug event with the migration endpoint's HTTP status.
pub fn trace_response_status(status: u16) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(status, "migration endpoint responded");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = status;
	}
}

/// Emits the per-token outcome event.
pub fn trace_token_result<T>(index: usize, result: &Result<T>) {
	#[cfg(feature = "tracing")]
	{
		match result {
			Ok(_) => tracing::info!(index, "token migrated"),
			Err(e) => tracing::warn!(index, error = %e, "token migration failed"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (index, result);
	}
}

/// Emits the end-of-batch summary event.
pub fn trace_batch_summary(processed: usize, migrated: usize, failed: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(processed, migrated, failed, "migration batch finished");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (processed, migrated, failed);
	}
}
