//! Token models: validated OAuth 1.0a identifiers, opaque OAuth 2.0 responses, and redacted secrets.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
