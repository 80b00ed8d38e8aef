//! Token pair model and redacting secret wrapper.

// self
use crate::{
	_prelude::*,
	auth::claims::{self, ExpiryClaim},
};

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access/refresh credential pair held for one session.
///
/// The two secrets are always written and cleared together; a session either holds a complete
/// pair or nothing at all. The type makes the half-written state unrepresentable, so stores
/// never observe an access token without its companion refresh token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived bearer credential authorizing API calls.
	pub access: TokenSecret,
	/// Longer-lived credential exchanged for a new access token.
	pub refresh: TokenSecret,
}
impl TokenPair {
	/// Creates a pair from the two credential strings.
	pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
		Self { access: TokenSecret::new(access), refresh: TokenSecret::new(refresh) }
	}

	/// Renders the `Authorization` header value for the held access token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.access.expose())
	}

	/// Decodes the access token's expiry claim.
	pub fn expiry(&self) -> ExpiryClaim {
		claims::decode_expiry(self.access.expose())
	}

	/// Returns `true` when the access token should be refreshed at the provided instant.
	///
	/// Undecodable tokens report expired, matching the fail-closed contract of
	/// [`claims::decode_expiry`].
	pub fn is_expired_at(&self, now: OffsetDateTime, window: Duration) -> bool {
		self.expiry().is_expired_at(now, window)
	}
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access", &"<redacted>")
			.field("refresh", &"<redacted>")
			.finish()
	}
}
