//! Refresh token exchange with singleflight guarding and rotation persistence.
//!
//! [`Gateway::refresh`] trades the held refresh token for a new pair at the service's
//! token-exchange endpoint, always spending a wire exchange. The send path goes through a
//! guarded variant instead: concurrent sends that observed the same expired pair serialize
//! behind the refresh guard, the first performs the exchange, and the rest adopt the rotated
//! pair without spending another one. The endpoint rotates secrets: the pair persisted after
//! a successful exchange carries whatever refresh token the response returned, falling back
//! to the previous secret only when the response omits one. Every exchange failure (non-2xx
//! status, unparseable body, transport error) clears the held pair before surfacing, so
//! callers can treat any refresh error as "must re-authenticate". Failures raised before the
//! exchange, a missing pair or an unresolvable endpoint, leave the store untouched.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	error::TransportError,
	ext::SessionEndReason,
	flows::Gateway,
	http::{GatewayHttpClient, OutboundRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

#[derive(Deserialize)]
struct RefreshWire {
	access_token: String,
	refresh_token: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Exchanges the held refresh token for a fresh pair, persisting the rotation.
	///
	/// Every call spends a wire exchange; back-to-back calls rotate twice. Fails with
	/// [`Error::NoRefreshToken`] when the session holds no pair. Any exchange failure clears
	/// the held pair as a side effect and notifies the session-end hook.
	pub async fn refresh(&self) -> Result<TokenPair> {
		self.refresh_inner(None).await
	}

	/// Refreshes unless another task already rotated the pair this caller observed.
	///
	/// Sends racing on the same expired pair serialize behind the refresh guard; the winner
	/// performs the exchange and the rest return the rotated pair from the store.
	pub(crate) async fn refresh_unless_rotated(&self, observed: &TokenPair) -> Result<TokenPair> {
		self.refresh_inner(Some(observed)).await
	}

	async fn refresh_inner(&self, observed: Option<&TokenPair>) -> Result<TokenPair> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				// Resolve the endpoint before anything destructive; a local configuration
				// failure must never evict valid credentials.
				let url = self.service.refresh_url().map_err(|err| {
					self.refresh_metrics.record_failure();

					Error::from(err)
				})?;
				let _singleflight = self.refresh_guard().lock().await;
				let current = self.store.load(&self.session).await.map_err(|err| {
					self.refresh_metrics.record_failure();

					Error::from(err)
				})?;
				let Some(current) = current else {
					self.refresh_metrics.record_failure();

					return Err(Error::NoRefreshToken);
				};

				if observed.is_some_and(|observed| current != *observed) {
					// Rotated while this task waited on the guard; adopt the stored pair.
					self.refresh_metrics.record_success();

					return Ok(current);
				}

				match self.exchange_refresh(url, &current).await {
					Ok(rotated) => {
						self.store.save(&self.session, rotated.clone()).await.map_err(|err| {
							self.refresh_metrics.record_failure();

							Error::from(err)
						})?;
						self.refresh_metrics.record_success();

						Ok(rotated)
					},
					Err(err) => {
						// Fail-closed: a session whose refresh token no longer works holds
						// nothing of value, so evict before surfacing.
						let _ = self.store.clear(&self.session).await;

						self.notify_session_end(SessionEndReason::RefreshFailed);
						self.refresh_metrics.record_failure();

						Err(err)
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange_refresh(&self, url: Url, current: &TokenPair) -> Result<TokenPair> {
		let mut request = OutboundRequest::post(url).json(serde_json::json!({
			"refresh_token": current.refresh.expose(),
		}));

		request.apply_default_content_type();

		let response = self
			.http_client
			.execute(request)
			.await
			.map_err(|err| Error::from(TransportError::network(err)))?;

		if !response.is_ok() {
			return Err(Error::RefreshRejected { status: Some(response.status) });
		}

		let wire: RefreshWire = response.json()?;
		let refresh = wire.refresh_token.unwrap_or_else(|| current.refresh.expose().to_owned());

		Ok(TokenPair::new(wire.access_token, refresh))
	}
}
