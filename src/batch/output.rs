//! Migration output: rendering and atomic persistence.

// std
use std::{fs, io::Write, path::Path};
// crates.io
use tempfile::NamedTempFile;
// self
use crate::{_prelude::*, auth::MigratedToken, error::StorageError};

/// Per-token outcome persisted when a batch continues past failures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeRecord {
	/// The endpoint returned credentials for the token.
	Migrated {
		/// Source token.
		token: String,
		/// Provider response, verbatim.
		response: MigratedToken,
	},
	/// The token could not be migrated.
	Failed {
		/// Source token, as written in the input.
		token: String,
		/// Rendered error chain.
		error: String,
	},
}
impl OutcomeRecord {
	/// Source token for this outcome.
	pub fn token(&self) -> &str {
		match self {
			Self::Migrated { token, .. } | Self::Failed { token, .. } => token,
		}
	}

	/// Returns `true` for [`OutcomeRecord::Failed`].
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}
}

/// Pretty-prints `value` as JSON.
pub fn render<T>(value: &T) -> Result<String, StorageError>
where
	T: ?Sized + Serialize,
{
	serde_json::to_string_pretty(value).map_err(StorageError::Serialization)
}

/// Replaces `path` with `contents` (plus a trailing newline) via a synced sibling temp file.
///
/// The temp file gets a unique name in the destination directory and is removed if any step
/// before the final rename fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StorageError> {
	let io_err = |action, path: &Path| {
		let path = path.to_owned();

		move |source| StorageError::Io { action, path, source }
	};
	let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
		Some(parent) => {
			fs::create_dir_all(parent).map_err(io_err("create directory", parent))?;

			parent
		},
		None => Path::new("."),
	};
	let mut file = NamedTempFile::new_in(parent).map_err(io_err("create a temp file in", parent))?;

	file.write_all(contents.as_bytes()).map_err(io_err("write", file.path()))?;
	file.write_all(b"\n").map_err(io_err("write", file.path()))?;
	file.as_file().sync_all().map_err(io_err("sync", file.path()))?;
	file.persist(path).map_err(|e| StorageError::Io {
		action: "replace",
		path: path.to_owned(),
		source: e.error,
	})?;

	Ok(())
}

/// Renders an error and its sources as `outer: inner: ...`.
pub fn error_chain(err: &dyn StdError) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();

	while let Some(inner) = source {
		rendered.truncate(rendered.trim_end_matches('.').len());
		rendered.push_str(": ");
		rendered.push_str(&inner.to_string());

		source = inner.source();
	}

	rendered
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{Error, TransportError};

	#[test]
	fn outcome_records_are_tagged_by_status() {
		let record = OutcomeRecord::Failed { token: "b".into(), error: "boom".into() };
		let json = serde_json::to_value(&record).expect("Record should serialize.");

		assert_eq!(json, serde_json::json!({ "status": "failed", "token": "b", "error": "boom" }));
		assert!(record.is_failed());
		assert_eq!(record.token(), "b");
	}

	#[test]
	fn write_atomic_replaces_contents_and_cleans_up() {
		let dir = tempfile::tempdir().expect("Temp dir should be created.");
		let path = dir.path().join("nested").join("oauth2_tokens.json");

		write_atomic(&path, "[1]").expect("First write should succeed.");
		write_atomic(&path, "[2]").expect("Second write should succeed.");

		assert_eq!(fs::read_to_string(&path).expect("Output should be readable."), "[2]\n");

		let siblings = fs::read_dir(path.parent().expect("Output should have a parent."))
			.expect("Output directory should be listable.")
			.count();

		assert_eq!(siblings, 1);
	}

	#[test]
	fn failed_replace_removes_the_temp_file() {
		let dir = tempfile::tempdir().expect("Temp dir should be created.");
		let blocked = dir.path().join("oauth2_tokens.json");

		fs::create_dir_all(blocked.join("child")).expect("Blocking directory should be created.");

		let err = write_atomic(&blocked, "[]").expect_err("Replacing a directory must fail.");

		assert!(matches!(err, StorageError::Io { action: "replace", .. }));
		assert_eq!(fs::read_dir(dir.path()).expect("Temp dir should be listable.").count(), 1);
	}

	#[test]
	fn error_chain_includes_sources() {
		let err = Error::from(TransportError::network(std::io::Error::other("connection refused")));

		assert_eq!(
			error_chain(&err),
			"Network error occurred while calling the migration endpoint: connection refused"
		);
	}
}
