//! Credential login exchange, including the optional TOTP second factor.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::TransportError,
	flows::Gateway,
	http::{GatewayHttpClient, OutboundRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Credentials submitted to the login endpoint.
#[derive(Clone)]
pub struct Credentials {
	/// Account username.
	pub username: String,
	/// Account password.
	pub password: String,
	/// Time-based one-time code, required once the server signals a second factor.
	pub totp_code: Option<String>,
}
impl Credentials {
	/// Creates first-factor credentials.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into(), totp_code: None }
	}

	/// Attaches the TOTP code for the second-factor round.
	pub fn with_totp_code(mut self, code: impl Into<String>) -> Self {
		self.totp_code = Some(code.into());

		self
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.field("totp_code_set", &self.totp_code.is_some())
			.finish()
	}
}

/// Signed-in user profile returned by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Account username.
	pub username: String,
	/// Role label, when the server reports one.
	#[serde(default)]
	pub role: Option<String>,
}

/// Outcome of a login exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
	/// Credentials were accepted and the returned pair has been stored.
	Authenticated {
		/// Profile of the signed-in user.
		user: UserProfile,
	},
	/// The server requires a TOTP code; resubmit with
	/// [`Credentials::with_totp_code`]. Nothing was stored.
	TotpRequired,
}

#[derive(Deserialize)]
struct LoginWire {
	#[serde(default)]
	requires_totp: bool,
	access_token: Option<String>,
	refresh_token: Option<String>,
	user: Option<UserProfile>,
	detail: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Exchanges credentials for a token pair at the service's login endpoint.
	///
	/// On success the returned pair is persisted for this session. A `requires_totp` response
	/// yields [`LoginOutcome::TotpRequired`] without storing anything; a rejection surfaces
	/// as [`Error::CredentialsRejected`] carrying the server's `detail` when present.
	pub async fn login(&self, credentials: Credentials) -> Result<LoginOutcome> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.service.login_url()?;
				let mut body = serde_json::json!({
					"username": credentials.username,
					"password": credentials.password,
				});

				if let Some(code) = &credentials.totp_code {
					body["totp_code"] = code.as_str().into();
				}

				let mut request = OutboundRequest::post(url).json(body);

				request.apply_default_content_type();

				let response = self
					.http_client
					.execute(request)
					.await
					.map_err(|err| Error::from(TransportError::network(err)))?;
				let status = response.status;

				if !response.is_ok() {
					let reason = response
						.json::<LoginWire>()
						.ok()
						.and_then(|wire| wire.detail)
						.unwrap_or_else(|| format!("login endpoint returned status {status}"));

					return Err(Error::CredentialsRejected { reason });
				}

				let wire: LoginWire = response.json()?;

				if wire.requires_totp {
					return Ok(LoginOutcome::TotpRequired);
				}

				let (Some(access), Some(refresh), Some(user)) =
					(wire.access_token, wire.refresh_token, wire.user)
				else {
					return Err(crate::error::TransientError::Endpoint {
						message: "login response omitted tokens or user profile".into(),
						status: Some(status),
					}
					.into());
				};

				self.store.save(&self.session, TokenPair::new(access, refresh)).await?;

				Ok(LoginOutcome::Authenticated { user })
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
