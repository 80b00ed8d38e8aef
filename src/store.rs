//! Storage contracts and built-in store implementations for session token pairs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{SessionId, TokenPair},
};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for per-session token pairs.
///
/// The store is the crate's analogue of per-tab browser storage: two credential strings held
/// under a session key, always written and cleared together. Because the unit of persistence
/// is a whole [`TokenPair`], implementations can never surface an access token without its
/// refresh companion.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the pair held for the session.
	fn save<'a>(&'a self, session: &'a SessionId, pair: TokenPair) -> StoreFuture<'a, ()>;

	/// Fetches the pair held for the session, if present.
	fn load<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<TokenPair>>;

	/// Removes the pair held for the session, returning the evicted value.
	fn clear<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<TokenPair>>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_gateway_error_with_source() {
		let store_error = StoreError::Backend { message: "snapshot unreadable".into() };
		let gateway_error: Error = store_error.clone().into();

		assert!(matches!(gateway_error, Error::Storage(_)));
		assert!(gateway_error.to_string().contains("snapshot unreadable"));

		let source = StdError::source(&gateway_error)
			.expect("Gateway error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
