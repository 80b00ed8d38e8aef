//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{SessionId, TokenPair},
	store::{SessionStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<SessionId, TokenPair>>>;

/// Thread-safe storage backend that keeps pairs in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	fn save_now(map: StoreMap, session: SessionId, pair: TokenPair) -> Result<(), StoreError> {
		map.write().insert(session, pair);

		Ok(())
	}

	fn load_now(map: StoreMap, session: SessionId) -> Option<TokenPair> {
		map.read().get(&session).cloned()
	}

	fn clear_now(map: StoreMap, session: SessionId) -> Option<TokenPair> {
		map.write().remove(&session)
	}
}
impl SessionStore for MemoryStore {
	fn save<'a>(&'a self, session: &'a SessionId, pair: TokenPair) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let session = session.to_owned();

		Box::pin(async move { Self::save_now(map, session, pair) })
	}

	fn load<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<TokenPair>> {
		let map = self.0.clone();
		let session = session.to_owned();

		Box::pin(async move { Ok(Self::load_now(map, session)) })
	}

	fn clear<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<TokenPair>> {
		let map = self.0.clone();
		let session = session.to_owned();

		Box::pin(async move { Ok(Self::clear_now(map, session)) })
	}
}
