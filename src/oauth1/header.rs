//! `Authorization` header serialization.

// self
use crate::oauth1::OAuthParams;

/// Serializes `params` as `OAuth k1='v1',k2='v2',...` in insertion order.
///
/// Values are written as-is; the signature must already be percent-encoded.
pub fn authorization_header(params: &OAuthParams) -> String {
	let pairs = params.iter().map(|(key, value)| format!("{key}='{value}'")).collect::<Vec<_>>();

	format!("OAuth {}", pairs.join(","))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{auth::OAuth1Token, oauth1::percent_encode};

	fn signed_params() -> OAuthParams {
		let token = OAuth1Token::new("token-a").expect("Token fixture should be valid.");
		let mut params = OAuthParams::with_nonce(&token, "ck", "nonce-1", "1700000000");

		params.push_signature(percent_encode("ab+c/d=="));

		params
	}

	#[test]
	fn header_matches_wire_format() {
		assert_eq!(
			authorization_header(&signed_params()),
			"OAuth oauth_consumer_key='ck',oauth_nonce='nonce-1',oauth_signature_method='RSA-SHA1',\
			 oauth_timestamp='1700000000',oauth_token='token-a',oauth_version='1.0',\
			 tenantType='ORGANISATION',oauth_signature='ab%2Bc%2Fd%3D%3D'"
		);
	}

	#[test]
	fn header_has_eight_quoted_entries_without_trailing_comma() {
		let header = authorization_header(&signed_params());
		let body = header.strip_prefix("OAuth ").expect("Header must start with `OAuth `.");
		let entries: Vec<&str> = body.split(',').collect();

		assert_eq!(entries.len(), 8);
		assert!(!body.ends_with(','));
		assert!(!body.contains(", "));

		for entry in entries {
			let (key, value) = entry.split_once('=').expect("Entry must be key=value.");

			assert!(!key.is_empty());
			assert!(value.starts_with('\'') && value.ends_with('\''), "Unquoted entry: {entry}.");
		}
	}
}
