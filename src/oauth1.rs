//! OAuth 1.0a request signing for the migration endpoint.
//!
//! The provider verifies a single RSA-SHA1 signature per request, so this module only covers
//! what that contract needs:
//!
//! - [`OAuthParams`] holds the seven fixed protocol parameters in insertion order and renders the
//!   canonical parameter string.
//! - [`base_string`] combines the HTTP method, endpoint, and parameter string.
//! - [`SigningKey`] signs the base string with RSASSA-PKCS1-v1_5 over SHA-1.
//! - [`authorization_header`] serializes the signed parameters into the `Authorization` header.

pub mod encode;
pub mod header;
pub mod params;
pub mod signature;

pub use encode::*;
pub use header::*;
pub use params::*;
pub use signature::*;

/// Signature method advertised in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "RSA-SHA1";
/// Protocol version advertised in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";
/// Tenant scope advertised in `tenantType`.
pub const TENANT_TYPE: &str = "ORGANISATION";
