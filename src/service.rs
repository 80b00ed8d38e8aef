//! Service descriptor naming the endpoints the gateway consumes.

// self
use crate::{_prelude::*, error::ConfigError};

const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_REFRESH_PATH: &str = "/token/refresh";

/// Errors raised while validating a [`ServiceDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ServiceDescriptorError {
	/// Base URL scheme is neither `http` nor `https`.
	#[error("Service base URL uses unsupported scheme `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme string.
		scheme: String,
	},
	/// Base URL cannot serve as a base for joining endpoint paths.
	#[error("Service base URL cannot be a base for endpoint paths.")]
	CannotBeABase,
}

/// Describes the authenticated service a gateway talks to.
///
/// The descriptor carries the base URL plus the login and token-exchange endpoint paths.
/// Defaults match the consumed API: `/login` and `/token/refresh`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDescriptor {
	/// Base URL every endpoint path is joined onto.
	pub base: Url,
	/// Path of the login endpoint.
	pub login_path: String,
	/// Path of the token-exchange endpoint.
	pub refresh_path: String,
}
impl ServiceDescriptor {
	/// Returns a builder for the provided base URL.
	pub fn builder(base: Url) -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder {
			base,
			login_path: DEFAULT_LOGIN_PATH.into(),
			refresh_path: DEFAULT_REFRESH_PATH.into(),
		}
	}

	/// Resolves an arbitrary endpoint path against the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base.join(path).map_err(|source| ConfigError::InvalidEndpoint { source })
	}

	/// Resolves the login endpoint URL.
	pub fn login_url(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.login_path)
	}

	/// Resolves the token-exchange endpoint URL.
	pub fn refresh_url(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.refresh_path)
	}
}

/// Builder for [`ServiceDescriptor`].
#[derive(Clone, Debug)]
pub struct ServiceDescriptorBuilder {
	base: Url,
	login_path: String,
	refresh_path: String,
}
impl ServiceDescriptorBuilder {
	/// Overrides the login endpoint path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the token-exchange endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Validates the base URL and produces the descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, ServiceDescriptorError> {
		if self.base.cannot_be_a_base() {
			return Err(ServiceDescriptorError::CannotBeABase);
		}
		if !matches!(self.base.scheme(), "http" | "https") {
			return Err(ServiceDescriptorError::UnsupportedScheme {
				scheme: self.base.scheme().to_owned(),
			});
		}

		Ok(ServiceDescriptor {
			base: self.base,
			login_path: self.login_path,
			refresh_path: self.refresh_path,
		})
	}
}
