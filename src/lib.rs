//! Rust’s turnkey authenticated request gateway—bearer injection, proactive expiry checks, and
//! transparent refresh-and-retry in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod obs;
pub mod service;
pub mod store;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests against reqwest-backed
	//! gateways; not intended for production wiring.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{
		auth::SessionId,
		flows::Gateway,
		http::ReqwestHttpClient,
		service::ServiceDescriptor,
		store::{MemoryStore, SessionStore},
	};

	/// Gateway type alias used by reqwest-backed integration tests.
	pub type ReqwestTestGateway = Gateway<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that tolerates the self-signed certificates local mock
	/// servers present, so tests can run against either plain or TLS endpoints.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Gateway`] backed by an in-memory store and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_gateway(
		service: ServiceDescriptor,
		session: SessionId,
	) -> (ReqwestTestGateway, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let gateway =
			Gateway::with_http_client(store, service, session, test_reqwest_http_client());

		(gateway, store_backend)
	}

	/// Forges an unsigned JWT-shaped access token whose payload carries the provided `exp`
	/// instant, so tests can drive the proactive expiry path without a real issuer.
	pub fn forge_access_token(expires_at: OffsetDateTime) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD
			.encode(format!(r#"{{"exp":{}}}"#, expires_at.unix_timestamp()).as_bytes());

		format!("{header}.{payload}.sig")
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
