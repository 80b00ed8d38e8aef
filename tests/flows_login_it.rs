#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use token_gateway::{
	_preludet::*,
	auth::SessionId,
	error::Error,
	flows::{Credentials, LoginOutcome, UserProfile},
	service::ServiceDescriptor,
	store::SessionStore,
};

fn build_service(server: &MockServer) -> ServiceDescriptor {
	ServiceDescriptor::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully."),
	)
	.build()
	.expect("Service descriptor should build successfully.")
}

fn session(value: &str) -> SessionId {
	SessionId::new(value).expect("Session identifier should be valid for login tests.")
}

#[tokio::test]
async fn successful_login_stores_the_pair_and_returns_the_profile() {
	let server = MockServer::start_async().await;
	let tab = session("tab-login");
	let (gateway, store) = build_reqwest_test_gateway(build_service(&server), tab.clone());
	// serde_json serializes object keys in sorted order, hence password before username.
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login")
				.header("content-type", "application/json")
				.body(r#"{"password":"hunter2","username":"alice"}"#);
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-1","refresh_token":"refresh-1","user":{"username":"alice","role":"Editor"}}"#,
			);
		})
		.await;
	let outcome = gateway
		.login(Credentials::new("alice", "hunter2"))
		.await
		.expect("Login exchange should succeed.");

	login.assert_async().await;

	assert_eq!(
		outcome,
		LoginOutcome::Authenticated {
			user: UserProfile { username: "alice".into(), role: Some("Editor".into()) },
		},
	);

	let held = store
		.load(&tab)
		.await
		.expect("Store load should succeed.")
		.expect("Login should persist the pair.");

	assert_eq!(held.access.expose(), "access-1");
	assert_eq!(held.refresh.expose(), "refresh-1");
}

#[tokio::test]
async fn totp_challenge_stores_nothing_until_the_second_round() {
	let server = MockServer::start_async().await;
	let tab = session("tab-totp");
	let (gateway, store) = build_reqwest_test_gateway(build_service(&server), tab.clone());
	let challenge = server
		.mock_async(|when, then| {
			when.method(POST).path("/login").body(r#"{"password":"hunter2","username":"bob"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"requires_totp":true}"#);
		})
		.await;
	let second_round = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/login")
				.body(r#"{"password":"hunter2","totp_code":"123456","username":"bob"}"#);
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"access-1","refresh_token":"refresh-1","user":{"username":"bob"}}"#,
			);
		})
		.await;
	let credentials = Credentials::new("bob", "hunter2");
	let outcome =
		gateway.login(credentials.clone()).await.expect("First login round should succeed.");

	challenge.assert_async().await;

	assert_eq!(outcome, LoginOutcome::TotpRequired);
	assert!(
		store.load(&tab).await.expect("Store load should succeed.").is_none(),
		"A TOTP challenge must not persist credentials.",
	);

	let outcome = gateway
		.login(credentials.with_totp_code("123456"))
		.await
		.expect("Second login round should succeed.");

	second_round.assert_async().await;

	assert_eq!(
		outcome,
		LoginOutcome::Authenticated {
			user: UserProfile { username: "bob".into(), role: None },
		},
	);
	assert!(store.load(&tab).await.expect("Store load should succeed.").is_some());
}

#[tokio::test]
async fn rejected_credentials_surface_the_server_detail() {
	let server = MockServer::start_async().await;
	let tab = session("tab-denied");
	let (gateway, store) = build_reqwest_test_gateway(build_service(&server), tab.clone());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"detail":"Invalid credentials"}"#);
		})
		.await;

	let err = gateway
		.login(Credentials::new("mallory", "guess"))
		.await
		.expect_err("Rejected credentials should fail.");

	assert!(matches!(err, Error::CredentialsRejected { reason } if reason == "Invalid credentials"));
	assert!(store.load(&tab).await.expect("Store load should succeed.").is_none());
}

#[tokio::test]
async fn login_response_missing_tokens_is_transient() {
	let server = MockServer::start_async().await;
	let tab = session("tab-partial");
	let (gateway, store) = build_reqwest_test_gateway(build_service(&server), tab.clone());

	server
		.mock_async(|when, then| {
			when.method(POST).path("/login");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"access-1"}"#);
		})
		.await;

	let err = gateway
		.login(Credentials::new("carol", "hunter2"))
		.await
		.expect_err("Partial login response should fail.");

	assert!(matches!(err, Error::Transient(_)));
	assert!(store.load(&tab).await.expect("Store load should succeed.").is_none());
}
