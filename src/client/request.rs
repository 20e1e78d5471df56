//! JSON body posted to the migration endpoint.

// self
use crate::_prelude::*;

/// OAuth 2.0 client registration the migrated credentials are issued to.
///
/// Field order is the wire order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MigrationRequestBody<'a> {
	/// Requested OAuth 2.0 scopes.
	pub scope: &'a str,
	/// OAuth 2.0 client identifier.
	pub client_id: &'a str,
	/// OAuth 2.0 client secret.
	pub client_secret: &'a str,
}
