//! Batch-migrate OAuth 1.0a access tokens to OAuth 2.0 credentials: sign every token with
//! RSA-SHA1, post it to the provider's migration endpoint, and collect the issued credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth1;
pub mod obs;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(feature = "cli")] use {clap as _, color_eyre as _, tokio as _, tracing_subscriber as _};
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
