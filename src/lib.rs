//! Async Rust client for the Nuvem Fiscal API.
//!
//! Authentication uses a cached client-credentials token. Every resource call goes through one
//! authenticated request pipeline, and typed empresa, certificado, and NFC-e handles sit on top.
//!
//! ```no_run
//! # async fn demo() -> nuvem_fiscal::error::Result<()> {
//! use nuvem_fiscal::{Client, ClientConfig, resources::ListParams};
//!
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let empresas = client.empresas().list(&ListParams::default().with_top(5)).await?;
//!
//! println!("{} empresas", empresas.data.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod resources;
#[doc(hidden)]
pub mod _preludet {
	//! Test-only fixtures for integration tests pointing the client at a local mock server.
	//!
	//! Not part of the supported API. The helpers panic on malformed input, which is what a test
	//! wants and what production code must never call.

	pub use crate::_prelude::*;

	// self
	use crate::{Client, ClientConfig};

	/// Client identifier used by test fixtures.
	pub const TEST_CLIENT_ID: &str = "test-client-id";
	/// Client secret used by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

	/// Test-only: builds a config whose auth endpoint is `{base}/oauth/token` and whose API base
	/// is `base`.
	///
	/// # Panics
	///
	/// Panics when `base` is not an absolute URL.
	pub fn test_config(base: &str, client_id: &str, client_secret: &str) -> ClientConfig {
		let base = Url::parse(base).expect("Mock server base URL should parse.");
		let auth = base.join("/oauth/token").expect("Mock token endpoint should join.");

		ClientConfig::new(client_id, client_secret).with_base_url(base).with_auth_url(auth)
	}

	/// Test-only: constructs a [`Client`] wired to a mock server with the fixture credentials.
	///
	/// # Panics
	///
	/// Panics when `base` is not an absolute URL.
	pub fn build_test_client(base: &str) -> Client {
		Client::new(test_config(base, TEST_CLIENT_ID, TEST_CLIENT_SECRET))
			.expect("Test client should build.")
	}

}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method, StatusCode};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};

pub use crate::{
	client::Client,
	config::{ClientConfig, Environment},
	error::{Error, Result},
	http::{RequestOptions, ResponseBody, ResponseShape},
};
