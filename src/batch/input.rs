//! Token input: a JSON array of objects carrying at least a `token` string.
//!
//! Only the document shape is checked here. Token values are validated one at a time by the
//! runner, so a single unusable token fails on its own instead of rejecting the whole file.

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, error::StorageError};

/// One entry of the token input; fields other than `token` are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
	/// Token to migrate, as written in the input.
	pub token: String,
}

/// Reads the raw token list in file order.
pub fn read_tokens(path: &Path) -> Result<Vec<String>, StorageError> {
	let bytes = fs::read(path).map_err(|source| StorageError::Io {
		action: "read",
		path: path.to_owned(),
		source,
	})?;

	parse_tokens(&bytes)
		.map_err(|source| StorageError::MalformedInput { path: path.to_owned(), source })
}

fn parse_tokens(bytes: &[u8]) -> Result<Vec<String>, serde_path_to_error::Error<serde_json::Error>> {
	let mut de = serde_json::Deserializer::from_slice(bytes);
	let entries: Vec<TokenEntry> = serde_path_to_error::deserialize(&mut de)?;

	Ok(entries.into_iter().map(|entry| entry.token).collect())
}
