#![cfg(feature = "reqwest")]

// std
use std::{
	env, fs, process,
	sync::Mutex,
};
// self
use token_gateway::{
	_preludet::*,
	auth::{SessionId, TokenPair},
	ext::{SessionEndHook, SessionEndReason},
	service::ServiceDescriptor,
	store::{FileStore, MemoryStore, SessionStore},
};

fn session(value: &str) -> SessionId {
	SessionId::new(value).expect("Session fixture should be valid.")
}

fn pair(access: &str, refresh: &str) -> TokenPair {
	TokenPair::new(access, refresh)
}

async fn exercise_store(store: Arc<dyn SessionStore>) {
	let alice = session("session-alice");
	let bob = session("session-bob");

	assert!(store.load(&alice).await.expect("Load should succeed on an empty store.").is_none());

	store
		.save(&alice, pair("access-a", "refresh-a"))
		.await
		.expect("Saving a fresh pair should succeed.");
	store
		.save(&bob, pair("access-b", "refresh-b"))
		.await
		.expect("Saving a second session should succeed.");

	let held = store
		.load(&alice)
		.await
		.expect("Load should succeed after save.")
		.expect("Saved pair should be held.");

	assert_eq!(held.access.expose(), "access-a");
	assert_eq!(held.refresh.expose(), "refresh-a");

	// Replacement is whole-pair; the previous secrets vanish together.
	store
		.save(&alice, pair("access-a2", "refresh-a2"))
		.await
		.expect("Replacing a held pair should succeed.");

	let replaced = store
		.load(&alice)
		.await
		.expect("Load should succeed after replacement.")
		.expect("Replaced pair should be held.");

	assert_eq!(replaced.access.expose(), "access-a2");
	assert_eq!(replaced.refresh.expose(), "refresh-a2");

	let evicted = store
		.clear(&alice)
		.await
		.expect("Clear should succeed.")
		.expect("Clear should return the evicted pair.");

	assert_eq!(evicted.refresh.expose(), "refresh-a2");
	assert!(store.load(&alice).await.expect("Load should succeed after clear.").is_none());
	assert!(
		store.clear(&alice).await.expect("Clearing an empty session should succeed.").is_none(),
	);
	// Other sessions are untouched throughout.
	assert!(store.load(&bob).await.expect("Load should succeed for the other session.").is_some());
}

#[tokio::test]
async fn memory_store_honors_the_trait_contract() {
	exercise_store(Arc::new(MemoryStore::default())).await;
}

#[tokio::test]
async fn file_store_honors_the_trait_contract() {
	let path = env::temp_dir().join(format!(
		"token_gateway_store_session_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	));

	exercise_store(Arc::new(
		FileStore::open(&path).expect("File store should open at a fresh path."),
	))
	.await;

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store snapshot {}: {e}", path.display())
	});
}

#[derive(Default)]
struct RecordingHook(Mutex<Vec<(SessionId, SessionEndReason)>>);
impl SessionEndHook for RecordingHook {
	fn on_session_end(&self, session: &SessionId, reason: SessionEndReason) {
		self.0
			.lock()
			.expect("Hook mutex should not be poisoned.")
			.push((session.clone(), reason));
	}
}

#[tokio::test]
async fn gateway_token_accessors_drive_the_store() {
	let service = ServiceDescriptor::builder(
		Url::parse("https://cal.example.com").expect("Service base URL should parse."),
	)
	.build()
	.expect("Service descriptor should build successfully.");
	let hook = Arc::new(RecordingHook::default());
	let (gateway, _store) = build_reqwest_test_gateway(service, session("tab-accessors"));
	let gateway = gateway.with_session_end_hook(hook.clone());

	assert!(gateway.tokens().await.expect("Reading an empty session should succeed.").is_none());

	gateway
		.set_tokens(pair("access-1", "refresh-1"))
		.await
		.expect("Storing a pair should succeed.");

	let held = gateway
		.tokens()
		.await
		.expect("Reading the held pair should succeed.")
		.expect("Stored pair should be held.");

	assert_eq!(held.access.expose(), "access-1");

	gateway.logout().await.expect("Logout should succeed.");

	assert!(gateway.tokens().await.expect("Reading after logout should succeed.").is_none());

	// A second logout finds nothing to clear and must not notify again.
	gateway.logout().await.expect("Logout of an empty session should succeed.");

	let events = hook.0.lock().expect("Hook mutex should not be poisoned.").clone();

	assert_eq!(events, vec![(session("tab-accessors"), SessionEndReason::LoggedOut)]);
}
