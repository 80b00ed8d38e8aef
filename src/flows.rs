//! High-level gateway operations: authenticated dispatch, refresh, login.

pub mod login;
pub mod refresh;
pub mod send;

pub use login::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::{SessionId, TokenPair},
	ext::{SessionEndHook, SessionEndReason},
	http::GatewayHttpClient,
	service::ServiceDescriptor,
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

pub(crate) const AUTHORIZATION: &str = "authorization";

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport stack.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Coordinates authenticated requests for a single user session.
///
/// The gateway owns the HTTP client, the session store, the service descriptor, and the
/// session identifier so individual operations can focus on their own logic (bearer
/// injection, the 401 retry cycle, token exchanges). One gateway serves one session; spin up
/// a gateway per signed-in user rather than sharing one across sessions.
pub struct Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Session store implementation that persists the token pair.
	pub store: Arc<dyn SessionStore>,
	/// Service descriptor naming the consumed endpoints.
	pub service: ServiceDescriptor,
	/// Session this gateway holds credentials for.
	pub session: SessionId,
	/// Shared metrics recorder for refresh flow outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	session_end_hook: Option<Arc<dyn SessionEndHook>>,
	refresh_guard: Arc<AsyncMutex<()>>,
	preemptive_window: Duration,
}
impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn SessionStore>,
		service: ServiceDescriptor,
		session: SessionId,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			service,
			session,
			refresh_metrics: Default::default(),
			session_end_hook: None,
			refresh_guard: Default::default(),
			preemptive_window: Duration::ZERO,
		}
	}

	/// Registers a hook observing irrecoverable credential loss and explicit logouts.
	pub fn with_session_end_hook(mut self, hook: Arc<dyn SessionEndHook>) -> Self {
		self.session_end_hook = Some(hook);

		self
	}

	/// Widens the proactive expiry check so tokens refresh shortly before they lapse.
	///
	/// Defaults to zero, matching the strict already-expired rule. Negative durations clamp
	/// to zero.
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Returns the token pair currently held for this session, if any.
	pub async fn tokens(&self) -> Result<Option<TokenPair>> {
		Ok(self.store.load(&self.session).await?)
	}

	/// Stores a token pair for this session, replacing any held pair.
	pub async fn set_tokens(&self, pair: TokenPair) -> Result<()> {
		Ok(self.store.save(&self.session, pair).await?)
	}

	/// Clears the held pair and notifies the session-end hook.
	pub async fn logout(&self) -> Result<()> {
		if self.store.clear(&self.session).await?.is_some() {
			self.notify_session_end(SessionEndReason::LoggedOut);
		}

		Ok(())
	}

	pub(crate) fn preemptive_window(&self) -> Duration {
		self.preemptive_window
	}

	pub(crate) fn refresh_guard(&self) -> &AsyncMutex<()> {
		&self.refresh_guard
	}

	pub(crate) fn notify_session_end(&self, reason: SessionEndReason) {
		if let Some(hook) = &self.session_end_hook {
			hook.on_session_end(&self.session, reason);
		}
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a new gateway for the provided service descriptor and session.
	///
	/// The gateway provisions its own reqwest-backed transport so callers do not need to pass
	/// HTTP handles explicitly. Use [`Gateway::with_http_client`] to supply a preconfigured
	/// client instead.
	pub fn new(
		store: Arc<dyn SessionStore>,
		service: ServiceDescriptor,
		session: SessionId,
	) -> Self {
		Self::with_http_client(store, service, session, ReqwestHttpClient::default())
	}
}
// Manual impl so cloning never demands `C: Clone`; the transport is shared through the `Arc`.
impl<C> Clone for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			service: self.service.clone(),
			session: self.session.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			session_end_hook: self.session_end_hook.clone(),
			refresh_guard: self.refresh_guard.clone(),
			preemptive_window: self.preemptive_window,
		}
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("service", &self.service)
			.field("session", &self.session)
			.field("session_end_hook_set", &self.session_end_hook.is_some())
			.finish()
	}
}
