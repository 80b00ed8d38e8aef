//! Authenticated request dispatch with proactive and reactive refresh.
//!
//! [`Gateway::send`] is the crate's front door. It injects the bearer header when a pair is
//! held, refreshes proactively when the decoded expiry has already passed, and reacts to a
//! 401 with exactly one refresh-and-retry cycle. Credential failures are absorbed here:
//! callers always receive a normal response (possibly still a 401) or a transport error,
//! never a refresh-specific error.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	flows::{AUTHORIZATION, Gateway},
	http::{GatewayHttpClient, OutboundRequest, WireResponse},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Performs the request with current credentials attached, transparently obtaining a new
	/// access token when the held one is expired or rejected.
	///
	/// The caller's request semantics (method, body, headers other than `authorization`)
	/// are preserved verbatim across the retry. At most one refresh is spent per call: a 401 that
	/// recurs after the refreshed retry is returned to the caller as-is.
	pub async fn send(&self, mut request: OutboundRequest) -> Result<WireResponse> {
		const KIND: FlowKind = FlowKind::Send;

		let span = FlowSpan::new(KIND, "send");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				request.apply_default_content_type();

				let now = OffsetDateTime::now_utc();
				let mut refresh_spent = false;
				let mut observed = None;

				if let Some(pair) = self.store.load(&self.session).await? {
					request.set_header(AUTHORIZATION, pair.bearer());

					if pair.is_expired_at(now, self.preemptive_window()) {
						refresh_spent = true;

						match self.refresh_unless_rotated(&pair).await {
							Ok(fresh) => request.set_header(AUTHORIZATION, fresh.bearer()),
							// The pair is already cleared; the primary request still runs,
							// unauthenticated, and the eventual 401 is the caller's to handle.
							Err(_) => request.remove_header(AUTHORIZATION),
						}
					} else {
						observed = Some(pair);
					}
				}

				let response = self
					.http_client
					.execute(request.clone())
					.await
					.map_err(|err| Error::from(TransportError::network(err)))?;

				if !response.is_unauthorized() || refresh_spent {
					return Ok(response);
				}

				// A 401 with no credentials attached is the caller's to handle.
				let Some(observed) = observed else {
					return Ok(response);
				};

				match self.refresh_unless_rotated(&observed).await {
					Ok(fresh) => {
						request.set_header(AUTHORIZATION, fresh.bearer());

						Ok(self
							.http_client
							.execute(request)
							.await
							.map_err(|err| Error::from(TransportError::network(err)))?)
					},
					// An exchange failure already cleared the pair and fired the
					// session-end hook; hand back the original 401 either way.
					Err(_) => Ok(response),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
