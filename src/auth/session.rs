//! Strongly typed session identifier replacing the ambient per-tab scoping of browser storage.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const SESSION_ID_MAX_LEN: usize = 128;

/// Error returned when session identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum SessionIdError {
	/// The identifier was empty.
	#[error("Session identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Session identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Session identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique identifier for an active user session.
///
/// Each gateway owns exactly one session; stores key persisted token pairs by this value so
/// several sessions can share a backend without observing each other's credentials.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);
impl SessionId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, SessionIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for SessionId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for SessionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<SessionId> for String {
	fn from(value: SessionId) -> Self {
		value.0
	}
}
impl TryFrom<String> for SessionId {
	type Error = SessionIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for SessionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Session({})", self.0)
	}
}
impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for SessionId {
	type Err = SessionIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), SessionIdError> {
	if view.is_empty() {
		return Err(SessionIdError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(SessionIdError::ContainsWhitespace);
	}
	if view.len() > SESSION_ID_MAX_LEN {
		return Err(SessionIdError::TooLong { max: SESSION_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_validate_shape() {
		assert!(SessionId::new(" tab-1").is_err(), "Leading whitespace must be rejected.");
		assert!(SessionId::new("tab-1 ").is_err(), "Trailing whitespace must be rejected.");
		assert!(SessionId::new("").is_err());

		let session = SessionId::new("tab-1").expect("Session fixture should be considered valid.");

		assert_eq!(session.as_ref(), "tab-1");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let session: SessionId =
			serde_json::from_str("\"tab-42\"").expect("Session should deserialize successfully.");

		assert_eq!(session.as_ref(), "tab-42");
		assert!(serde_json::from_str::<SessionId>("\"with space\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("tab{}id", '\u{00A0}');

		assert!(SessionId::new(&nbsp).is_err());

		let exact = "a".repeat(SESSION_ID_MAX_LEN);

		SessionId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(SESSION_ID_MAX_LEN + 1);

		assert!(SessionId::new(&too_long).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<SessionId, u8> = HashMap::from_iter([(
			SessionId::new("tab-1").expect("Session used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("tab-1"), Some(&7));
	}
}
