//! Session-end hooks that let consuming applications react when credentials
//! become irrecoverable.
//!
//! The gateway never surfaces a distinct "logged out" error; callers receive the final 401
//! (or the refresh error) as usual. Applications that need to tear down session UI state the
//! moment credentials are cleared register a [`SessionEndHook`] instead of polling.

// self
use crate::{_prelude::*, auth::SessionId};

/// Why the gateway ended the session and cleared its credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionEndReason {
	/// The refresh exchange failed; the held pair was cleared and the caller must
	/// re-authenticate.
	RefreshFailed,
	/// The application requested an explicit logout.
	LoggedOut,
}
impl SessionEndReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionEndReason::RefreshFailed => "refresh_failed",
			SessionEndReason::LoggedOut => "logged_out",
		}
	}
}
impl Display for SessionEndReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Callback invoked after the gateway clears a session's credentials.
///
/// The hook runs synchronously on the flow's task after the store has been cleared; keep
/// implementations cheap and never call back into the same gateway from inside the hook.
pub trait SessionEndHook
where
	Self: Send + Sync,
{
	/// Observes the end of the provided session.
	fn on_session_end(&self, session: &SessionId, reason: SessionEndReason);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reason_labels_are_stable() {
		assert_eq!(SessionEndReason::RefreshFailed.as_str(), "refresh_failed");
		assert_eq!(SessionEndReason::LoggedOut.to_string(), "logged_out");
	}
}
