//! Sequential batch migration over a token input file.
//!
//! [`BatchRunner`] reads the token list, migrates each token in input order (one request in
//! flight at a time), and persists the results. Two [`FailurePolicy`] values decide what a failed
//! token does to the rest of the batch:
//!
//! - [`FailurePolicy::Abort`] stops at the first failure and writes nothing; on success the raw
//!   provider responses are written once at the end, whatever their HTTP status.
//! - [`FailurePolicy::Continue`] records every token's [`OutcomeRecord`] and rewrites the output
//!   after each one, so an interrupted run keeps everything finished so far. Non-2xx answers,
//!   unusable token values, and transport failures count as failed tokens, which can also be
//!   written in input format to a separate file for a targeted re-run.

pub mod input;
pub mod output;

pub use input::*;
pub use output::*;

// std
use std::path::PathBuf;
// self
use crate::{
	_prelude::*,
	auth::{MigratedToken, OAuth1Token},
	client::{MigrationClient, TransportErrorMapper},
	config,
	error::ConfigError,
	http::TokenHttpClient,
	obs::{self, TokenOutcome, TokenSpan},
};

/// What a per-token failure does to the rest of the batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
	/// Stop at the first failure without writing any output.
	Abort,
	/// Record the failure, keep going, and persist after every token.
	#[default]
	Continue,
}

/// File locations and policy for one batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
	/// JSON array of `{"token": ...}` objects.
	pub input: PathBuf,
	/// Destination for migration results.
	pub output: PathBuf,
	/// Optional destination for failed tokens, in input format.
	pub failed_output: Option<PathBuf>,
	/// Failure handling.
	pub policy: FailurePolicy,
}
impl BatchOptions {
	/// Creates options with the default [`FailurePolicy`] and no failed-token file.
	pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
		Self {
			input: input.into(),
			output: output.into(),
			failed_output: None,
			policy: FailurePolicy::default(),
		}
	}

	/// Overrides the failure policy.
	pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Writes failed tokens to `path` (only honored by [`FailurePolicy::Continue`]).
	pub fn with_failed_output(mut self, path: impl Into<PathBuf>) -> Self {
		self.failed_output = Some(path.into());

		self
	}

	/// Rejects empty paths and settings that share a file.
	pub fn validate(&self) -> Result<(), ConfigError> {
		config::require_path("input", &self.input)?;
		config::require_path("output", &self.output)?;

		let mut paths = vec![("input", &self.input), ("output", &self.output)];

		if let Some(path) = &self.failed_output {
			config::require_path("failed_output", path)?;

			paths.push(("failed_output", path));
		}

		for (i, (first, path)) in paths.iter().enumerate() {
			if let Some((second, _)) = paths[i + 1..].iter().find(|(_, other)| other == path) {
				return Err(ConfigError::ConflictingPaths {
					first: *first,
					second: *second,
					path: path.to_path_buf(),
				});
			}
		}

		Ok(())
	}
}

/// Summary of a finished batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
	/// Tokens attempted.
	pub processed: usize,
	/// Tokens migrated successfully.
	pub migrated: usize,
	/// Tokens that failed (always zero under [`FailurePolicy::Abort`]).
	pub failed: usize,
	/// The pretty-printed JSON written to the output file.
	pub rendered: String,
}
impl BatchReport {
	/// Returns `true` when every token was migrated.
	pub fn is_complete(&self) -> bool {
		self.failed == 0
	}
}

/// Drives a [`MigrationClient`] over a token file.
pub struct BatchRunner<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: MigrationClient<C, M>,
	options: BatchOptions,
}
impl<C, M> BatchRunner<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Pairs a client with batch options.
	pub fn new(client: MigrationClient<C, M>, options: BatchOptions) -> Self {
		Self { client, options }
	}

	/// Batch options in effect.
	pub fn options(&self) -> &BatchOptions {
		&self.options
	}

	/// Reads the input, migrates every token, and persists the output.
	pub async fn run(&self) -> Result<BatchReport> {
		self.options.validate()?;

		let tokens = input::read_tokens(&self.options.input)?;
		let report = match self.options.policy {
			FailurePolicy::Abort => self.run_abort(&tokens).await?,
			FailurePolicy::Continue => self.run_continue(&tokens).await?,
		};

		obs::trace_batch_summary(report.processed, report.migrated, report.failed);

		Ok(report)
	}

	async fn run_abort(&self, tokens: &[String]) -> Result<BatchReport> {
		let mut migrated = Vec::with_capacity(tokens.len());

		for (index, token) in tokens.iter().enumerate() {
			migrated.push(self.migrate_one(index, token).await?);
		}

		let rendered = output::render(&migrated)?;

		output::write_atomic(&self.options.output, &rendered)?;

		Ok(BatchReport { processed: tokens.len(), migrated: migrated.len(), failed: 0, rendered })
	}

	async fn run_continue(&self, tokens: &[String]) -> Result<BatchReport> {
		let mut records = Vec::with_capacity(tokens.len());

		for (index, token) in tokens.iter().enumerate() {
			match self.migrate_one(index, token).await {
				Ok(response) =>
					records.push(OutcomeRecord::Migrated { token: token.clone(), response }),
				Err(e) if e.is_per_token() => {
					records.push(OutcomeRecord::Failed {
						token: token.clone(),
						error: output::error_chain(&e),
					});

					self.persist_failed(&records)?;
				},
				Err(e) => return Err(e),
			}

			output::write_atomic(&self.options.output, &output::render(&records)?)?;
		}

		let rendered = output::render(&records)?;

		output::write_atomic(&self.options.output, &rendered)?;
		self.persist_failed(&records)?;

		let failed = records.iter().filter(|record| record.is_failed()).count();

		Ok(BatchReport {
			processed: records.len(),
			migrated: records.len() - failed,
			failed,
			rendered,
		})
	}

	async fn migrate_one(&self, index: usize, token: &str) -> Result<MigratedToken> {
		let span = TokenSpan::new("migrate", index);

		obs::record_token_outcome(TokenOutcome::Attempt);

		let result = span
			.instrument(async {
				let result = self.exchange(token).await;

				obs::trace_token_result(index, &result);

				result
			})
			.await;

		match &result {
			Ok(_) => obs::record_token_outcome(TokenOutcome::Success),
			Err(_) => obs::record_token_outcome(TokenOutcome::Failure),
		}

		result
	}

	/// Validates one raw token and exchanges it. Only [`FailurePolicy::Abort`] keeps non-2xx
	/// documents as migrated.
	async fn exchange(&self, raw: &str) -> Result<MigratedToken> {
		let token = OAuth1Token::new(raw)?;
		let response = self.client.exchange(&token).await?;

		match self.options.policy {
			FailurePolicy::Abort => Ok(response.document),
			FailurePolicy::Continue => response.into_result(),
		}
	}

	fn persist_failed(&self, records: &[OutcomeRecord]) -> Result<()> {
		if let Some(path) = &self.options.failed_output {
			let failed = records
				.iter()
				.filter(|record| record.is_failed())
				.map(|record| TokenEntry { token: record.token().to_owned() })
				.collect::<Vec<_>>();

			output::write_atomic(path, &output::render(&failed)?)?;
		}

		Ok(())
	}
}
