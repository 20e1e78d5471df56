//! OAuth 1.0a token identifiers and the opaque OAuth 2.0 credentials they migrate to.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Error returned when an OAuth 1.0a token fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum TokenError {
	/// The token was empty.
	#[error("OAuth 1.0a token cannot be empty.")]
	Empty,
	/// The token contains control characters, which cannot travel in an HTTP header.
	#[error("OAuth 1.0a token contains control characters.")]
	InvalidCharacter,
}

/// An existing, already authorized OAuth 1.0a access token.
///
/// The value is opaque: only empty strings and control characters are rejected. Values are
/// validated on construction and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OAuth1Token(String);
impl OAuth1Token {
	/// Creates a new token after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, TokenError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for OAuth1Token {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for OAuth1Token {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<OAuth1Token> for String {
	fn from(value: OAuth1Token) -> Self {
		value.0
	}
}
impl TryFrom<String> for OAuth1Token {
	type Error = TokenError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for OAuth1Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "OAuth1Token({})", self.0)
	}
}
impl Display for OAuth1Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for OAuth1Token {
	type Err = TokenError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// OAuth 2.0 credentials returned by the migration endpoint.
///
/// The provider owns the shape of this document; it is kept verbatim (including key order) and
/// only required to be valid JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigratedToken(serde_json::Value);
impl MigratedToken {
	/// Wraps a provider response document.
	pub fn new(value: serde_json::Value) -> Self {
		Self(value)
	}

	/// Borrows the raw provider document.
	pub fn as_json(&self) -> &serde_json::Value {
		&self.0
	}

	/// Consumes the wrapper and returns the raw provider document.
	pub fn into_json(self) -> serde_json::Value {
		self.0
	}
}

fn validate_view(view: &str) -> Result<(), TokenError> {
	if view.is_empty() {
		return Err(TokenError::Empty);
	}
	if view.chars().any(char::is_control) {
		return Err(TokenError::InvalidCharacter);
	}

	Ok(())
}
