//! Signature base string construction and RSA-SHA1 signing.

// std
use std::{fs, path::Path};
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use rsa::{
	Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey, pkcs1::DecodeRsaPrivateKey, pkcs8::DecodePrivateKey,
};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, error::SigningError, oauth1::percent_encode};

/// Builds `METHOD&encoded(endpoint)&encoded(param_string)`.
pub fn base_string(http_method: &str, endpoint: &str, param_string: &str) -> String {
	format!(
		"{}&{}&{}",
		http_method.to_ascii_uppercase(),
		percent_encode(endpoint),
		percent_encode(param_string)
	)
}

/// RSA private key used to sign every request in a run.
///
/// Load it once and share it behind an [`Arc`]; signing only borrows the key.
#[derive(Clone)]
pub struct SigningKey(RsaPrivateKey);
impl SigningKey {
	/// Parses a PEM document holding a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) key.
	pub fn from_pem(pem: &str) -> Result<Self, SigningError> {
		if let Ok(key) = RsaPrivateKey::from_pkcs1_pem(pem) {
			return Ok(Self(key));
		}

		RsaPrivateKey::from_pkcs8_pem(pem)
			.map(Self)
			.map_err(|source| SigningError::KeyParse { source })
	}

	/// Reads and parses a PEM key file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SigningError> {
		let path = path.as_ref();
		let pem = fs::read_to_string(path)
			.map_err(|source| SigningError::KeyRead { path: path.to_owned(), source })?;

		Self::from_pem(&pem)
	}

	/// Signs `base_string` with RSASSA-PKCS1-v1_5 over SHA-1 and returns padded base64.
	pub fn sign(&self, base_string: &str) -> Result<String, SigningError> {
		let digest = Sha1::digest(base_string.as_bytes());
		let signature = self
			.0
			.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)
			.map_err(|source| SigningError::Sign { source })?;

		Ok(STANDARD.encode(signature))
	}

	/// Public half of the key, for verifying signatures.
	pub fn public_key(&self) -> RsaPublicKey {
		self.0.to_public_key()
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SigningKey(<redacted>)")
	}
}
