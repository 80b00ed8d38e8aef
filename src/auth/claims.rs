//! Unverified expiry-claim decoding used as a local refresh heuristic.
//!
//! Access tokens are opaque bearer credentials; the gateway never validates them
//! cryptographically. It only peeks at the JWT-shaped payload segment to read the `exp` claim
//! and decide whether a proactive refresh is worthwhile. Decoding failures of any kind resolve
//! to [`ExpiryClaim::Malformed`], which every caller treats as already expired. The heuristic
//! fails toward refreshing, never toward trusting a bad token.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::_prelude::*;

/// Outcome of decoding an access token's expiry claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpiryClaim {
	/// The payload segment decoded cleanly and carried an integer `exp` claim.
	Valid {
		/// Expiry instant parsed from the `exp` seconds-since-epoch value.
		expires_at: OffsetDateTime,
	},
	/// The token could not be decoded; callers must treat it as expired.
	Malformed,
}
impl ExpiryClaim {
	/// Returns `true` when the claim should trigger a refresh at the provided instant.
	///
	/// [`ExpiryClaim::Malformed`] always reports expired. The `window` widens the check so
	/// callers can refresh shortly before the actual expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime, window: Duration) -> bool {
		match self {
			Self::Valid { expires_at } => *expires_at <= now + window,
			Self::Malformed => true,
		}
	}
}

#[derive(Deserialize)]
struct RawClaims {
	exp: Option<i64>,
}

/// Decodes the expiry claim from a JWT-shaped access token.
///
/// The token is split on `.`; tokens with fewer than two segments, invalid base64url in the
/// payload segment, invalid JSON, a missing `exp`, or an `exp` outside the representable
/// range all resolve to [`ExpiryClaim::Malformed`]. This function never fails past its
/// boundary.
pub fn decode_expiry(access_token: &str) -> ExpiryClaim {
	let mut segments = access_token.split('.');
	let Some(payload) = segments.nth(1) else {
		return ExpiryClaim::Malformed;
	};
	let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload) else {
		return ExpiryClaim::Malformed;
	};
	let Ok(claims) = serde_json::from_slice::<RawClaims>(&bytes) else {
		return ExpiryClaim::Malformed;
	};
	let Some(exp) = claims.exp else {
		return ExpiryClaim::Malformed;
	};

	match OffsetDateTime::from_unix_timestamp(exp) {
		Ok(expires_at) => ExpiryClaim::Valid { expires_at },
		Err(_) => ExpiryClaim::Malformed,
	}
}
