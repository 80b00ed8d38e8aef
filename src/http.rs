//! Transport primitives for authenticated gateway requests.
//!
//! The module exposes [`GatewayHttpClient`] alongside the caller-facing request/response
//! models so downstream crates can integrate custom HTTP clients. The trait acts as the
//! gateway's only dependency on an HTTP stack: implementations receive a fully prepared
//! [`OutboundRequest`] (headers already merged, body already encoded) and must return the raw
//! [`WireResponse`] without interpreting the status. Status handling, including the 401
//! refresh-and-retry cycle, belongs to the flow layer.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type TransportFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing gateway requests.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared across gateway
/// instances behind `Arc<C>` without additional wrappers, and the futures they return must be
/// `Send` for the lifetime of the in-flight request so flow futures can hop executors.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes the prepared request and returns the raw response.
	///
	/// Any HTTP status, including 401, is a successful execution; only network-level failures
	/// may surface as `Err`.
	fn execute(
		&self,
		request: OutboundRequest,
	) -> TransportFuture<'_, WireResponse, Self::TransportError>;
}

/// HTTP method subset supported by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload variants accepted by the gateway.
#[derive(Clone, Debug)]
pub enum RequestBody {
	/// Structured payload serialized as JSON; triggers the automatic JSON content-type.
	Json(serde_json::Value),
	/// Form fields encoded as `application/x-www-form-urlencoded`; never receives the
	/// automatic JSON content-type.
	Form(Vec<(String, String)>),
	/// Raw bytes passed through untouched.
	Bytes(Vec<u8>),
}

/// Outbound request prepared by the gateway for a transport.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved request URL.
	pub url: Url,
	/// Header name/value pairs; names are matched case-insensitively.
	pub headers: Vec<(String, String)>,
	/// Optional payload.
	pub body: Option<RequestBody>,
}
impl OutboundRequest {
	/// Creates a request with the provided method and URL.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Convenience constructor for GET requests.
	pub fn get(url: Url) -> Self {
		Self::new(Method::Get, url)
	}

	/// Convenience constructor for POST requests.
	pub fn post(url: Url) -> Self {
		Self::new(Method::Post, url)
	}

	/// Appends a header, keeping any caller-supplied duplicates intact.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a JSON payload.
	pub fn json(mut self, payload: serde_json::Value) -> Self {
		self.body = Some(RequestBody::Json(payload));

		self
	}

	/// Attaches form fields.
	pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
		self.body = Some(RequestBody::Form(fields));

		self
	}

	/// Attaches a raw byte payload.
	pub fn bytes(mut self, payload: Vec<u8>) -> Self {
		self.body = Some(RequestBody::Bytes(payload));

		self
	}

	/// Returns `true` when a header with the provided name is present (case-insensitive).
	pub fn has_header(&self, name: &str) -> bool {
		self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
	}

	/// Replaces any existing header with the provided name, then appends the new value.
	pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
		self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
		self.headers.push((name.to_owned(), value.into()));
	}

	/// Removes every header with the provided name.
	pub fn remove_header(&mut self, name: &str) {
		self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
	}

	/// Attaches the default content-type implied by the body when the caller set none.
	///
	/// JSON payloads receive `application/json`; form payloads receive the urlencoded type.
	/// Raw byte payloads and caller-supplied content-types pass through untouched.
	pub fn apply_default_content_type(&mut self) {
		if self.has_header(CONTENT_TYPE) {
			return;
		}

		match self.body {
			Some(RequestBody::Json(_)) =>
				self.headers.push((CONTENT_TYPE.into(), JSON_CONTENT_TYPE.into())),
			Some(RequestBody::Form(_)) =>
				self.headers.push((CONTENT_TYPE.into(), FORM_CONTENT_TYPE.into())),
			Some(RequestBody::Bytes(_)) | None => {},
		}
	}

	/// Encodes the body into wire bytes.
	///
	/// JSON serialization of a `serde_json::Value` cannot fail for the value types the
	/// gateway constructs, but the error is still surfaced rather than swallowed.
	pub fn encoded_body(&self) -> Result<Option<Vec<u8>>, serde_json::Error> {
		match &self.body {
			None => Ok(None),
			Some(RequestBody::Json(value)) => Ok(Some(serde_json::to_vec(value)?)),
			Some(RequestBody::Form(fields)) => {
				let mut serializer = url::form_urlencoded::Serializer::new(String::new());

				for (name, value) in fields {
					serializer.append_pair(name, value);
				}

				Ok(Some(serializer.finish().into_bytes()))
			},
			Some(RequestBody::Bytes(bytes)) => Ok(Some(bytes.clone())),
		}
	}
}

/// Raw response captured from a transport.
#[derive(Clone, Debug)]
pub struct WireResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response header name/value pairs.
	pub headers: Vec<(String, String)>,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl WireResponse {
	/// Returns `true` for 2xx statuses.
	pub const fn is_ok(&self) -> bool {
		self.status >= 200 && self.status < 300
	}

	/// Returns `true` when the server rejected the request as unauthenticated.
	pub const fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Deserializes the body as JSON, reporting the failing path on malformed payloads.
	pub fn json<T>(&self) -> Result<T, crate::error::TransientError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			crate::error::TransientError::ResponseParse { source, status: Some(self.status) }
		})
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client follows reqwest's stock redirect policy; configure a custom client via
/// [`ReqwestHttpClient::with_client`] when the consumed API requires different behavior.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: OutboundRequest,
	) -> TransportFuture<'_, WireResponse, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url.clone());

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			// Body encoding only fails on non-string JSON map keys, which the request model
			// cannot express; fall back to an empty body rather than panicking.
			if let Some(bytes) = request.encoded_body().ok().flatten() {
				builder = builder.body(bytes);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.map(|(name, value)| {
					(name.as_str().to_owned(), String::from_utf8_lossy(value.as_bytes()).into_owned())
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(WireResponse { status, headers, body })
		})
	}
}
